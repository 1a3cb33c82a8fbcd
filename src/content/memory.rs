use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::content::{ContentStore, Document, DocumentId, ImageRef, LocalImage};
use crate::error::{AdminError, Result};

/// One call made against a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    FetchFirst(String),
    Fetch(DocumentId),
    List(String),
    Count(String),
    Create(String),
    Patch(DocumentId),
    Delete(DocumentId),
    Upload(String),
}

impl StoreCall {
    pub fn is_write(&self) -> bool {
        matches!(self, StoreCall::Create(_) | StoreCall::Patch(_) | StoreCall::Delete(_))
    }
}

#[derive(Default)]
struct State {
    documents: Vec<Document>,
    calls: Vec<StoreCall>,
    fail_writes: bool,
    fail_reads: bool,
}

/// In-process content store that records every call in order.
///
/// Documents keep insertion order; `list` returns them newest first.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document directly, bypassing the call log
    pub fn seed(&self, doc_type: &str, fields: Map<String, Value>) -> DocumentId {
        let mut state = self.lock();
        let doc = new_document(doc_type, fields, state.documents.len());
        let id = doc.id.clone();
        state.documents.push(doc);
        id
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn documents(&self, doc_type: &str) -> Vec<Document> {
        self.lock()
            .documents
            .iter()
            .filter(|d| d.doc_type == doc_type)
            .cloned()
            .collect()
    }

    /// Makes create, patch, delete and upload fail with a 500 until turned off
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Makes fetches, lists and counts fail with a 500 until turned off
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means another test thread panicked; the data is still usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: StoreCall) -> MutexGuard<'_, State> {
        let mut state = self.lock();
        state.calls.push(call);
        state
    }
}

fn new_document(doc_type: &str, fields: Map<String, Value>, seq: usize) -> Document {
    // Offset by sequence so ordering by creation time is stable within one test
    let created = Utc::now() + Duration::milliseconds(seq as i64);
    Document {
        id: DocumentId::new(Uuid::new_v4().simple().to_string()),
        doc_type: doc_type.to_string(),
        created_at: Some(created),
        updated_at: Some(created),
        fields,
    }
}

fn write_failure() -> AdminError {
    AdminError::status(500, Some("memory store rejected the write".to_string()))
}

fn read_failure() -> AdminError {
    AdminError::status(500, Some("memory store rejected the read".to_string()))
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch_first(&self, doc_type: &str) -> Result<Option<Document>> {
        let state = self.record(StoreCall::FetchFirst(doc_type.to_string()));
        if state.fail_reads {
            return Err(read_failure());
        }
        Ok(state.documents.iter().find(|d| d.doc_type == doc_type).cloned())
    }

    async fn fetch(&self, doc_type: &str, id: &DocumentId) -> Result<Option<Document>> {
        let state = self.record(StoreCall::Fetch(id.clone()));
        if state.fail_reads {
            return Err(read_failure());
        }
        Ok(state
            .documents
            .iter()
            .find(|d| d.doc_type == doc_type && &d.id == id)
            .cloned())
    }

    async fn list(&self, doc_type: &str) -> Result<Vec<Document>> {
        let state = self.record(StoreCall::List(doc_type.to_string()));
        if state.fail_reads {
            return Err(read_failure());
        }
        Ok(state
            .documents
            .iter()
            .rev()
            .filter(|d| d.doc_type == doc_type)
            .cloned()
            .collect())
    }

    async fn count(&self, doc_type: &str) -> Result<usize> {
        let state = self.record(StoreCall::Count(doc_type.to_string()));
        if state.fail_reads {
            return Err(read_failure());
        }
        Ok(state.documents.iter().filter(|d| d.doc_type == doc_type).count())
    }

    async fn create(&self, doc_type: &str, fields: Map<String, Value>) -> Result<Document> {
        let mut state = self.record(StoreCall::Create(doc_type.to_string()));
        if state.fail_writes {
            return Err(write_failure());
        }

        let fields = fields.into_iter().filter(|(_, v)| !v.is_null()).collect();
        let doc = new_document(doc_type, fields, state.documents.len());
        state.documents.push(doc.clone());
        Ok(doc)
    }

    async fn patch(&self, id: &DocumentId, fields: Map<String, Value>) -> Result<Document> {
        let mut state = self.record(StoreCall::Patch(id.clone()));
        if state.fail_writes {
            return Err(write_failure());
        }

        let doc = state
            .documents
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| AdminError::status(404, Some(format!("Document '{}' not found", id))))?;

        for (key, value) in fields {
            if value.is_null() {
                doc.fields.remove(&key);
            } else {
                doc.fields.insert(key, value);
            }
        }
        doc.updated_at = Some(Utc::now());
        Ok(doc.clone())
    }

    async fn delete(&self, id: &DocumentId) -> Result<()> {
        let mut state = self.record(StoreCall::Delete(id.clone()));
        if state.fail_writes {
            return Err(write_failure());
        }
        state.documents.retain(|d| &d.id != id);
        Ok(())
    }

    async fn upload_image(&self, image: &LocalImage) -> Result<ImageRef> {
        let state = self.record(StoreCall::Upload(image.filename.clone()));
        if state.fail_writes {
            return Err(write_failure());
        }

        let digest = Sha256::digest(&image.bytes);
        let sha = format!("{:x}", digest);
        Ok(ImageRef::new(format!("image-{}-0x0-{}", &sha[..40], image.extension())))
    }
}
