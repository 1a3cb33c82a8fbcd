pub mod image;
pub mod memory;
pub mod sanity;

pub use image::{ImageField, ImageRef, ImageRules, LocalImage};
pub use memory::{MemoryStore, StoreCall};
pub use sanity::SanityStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::Result;

/// Identifier assigned by the content store on create
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A stored content document: system attributes plus the entity's own fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "_type")]
    pub doc_type: String,
    #[serde(rename = "_createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "_updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Entity fields with store-internal keys (`_rev` and friends) removed
    pub fn content_fields(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(k, _)| !k.starts_with('_'))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Read/write operations the editors need from the headless content store.
///
/// Reads follow the gateway's GET policy: a failed read is reported as
/// "nothing found" rather than an error.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// First document of `doc_type`, if any
    async fn fetch_first(&self, doc_type: &str) -> Result<Option<Document>>;

    async fn fetch(&self, doc_type: &str, id: &DocumentId) -> Result<Option<Document>>;

    /// All documents of `doc_type`, newest first
    async fn list(&self, doc_type: &str) -> Result<Vec<Document>>;

    async fn count(&self, doc_type: &str) -> Result<usize>;

    async fn create(&self, doc_type: &str, fields: Map<String, Value>) -> Result<Document>;

    /// Partial update. `Value::Null` entries are removed from the document.
    async fn patch(&self, id: &DocumentId, fields: Map<String, Value>) -> Result<Document>;

    async fn delete(&self, id: &DocumentId) -> Result<()>;

    async fn upload_image(&self, image: &LocalImage) -> Result<ImageRef>;
}
