use chrono::{DateTime, Utc};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::content::{ContentStore, DocumentId};
use crate::editor::{reread, report_failure, stage, EditMode};
use crate::error::{AdminError, Result};
use crate::forms::ContentEntity;
use crate::notify::{Notification, Notifier};

/// One stored instance of a multi-instance content type
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<E> {
    pub id: DocumentId,
    pub created_at: Option<DateTime<Utc>>,
    pub value: E,
}

/// Editor for content types with many documents (services, contact submissions)
pub struct CollectionEditor<E: ContentEntity> {
    notifier: Arc<dyn Notifier>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: ContentEntity> CollectionEditor<E> {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            _entity: PhantomData,
        }
    }

    /// Newest first
    pub async fn list(&self, store: &dyn ContentStore) -> Result<Vec<Entry<E>>> {
        let docs = store.list(E::DOC_TYPE).await?;
        docs.iter()
            .map(|doc| {
                Ok(Entry {
                    id: doc.id.clone(),
                    created_at: doc.created_at,
                    value: E::from_document(doc)?,
                })
            })
            .collect()
    }

    pub async fn load(&self, store: &dyn ContentStore, id: &DocumentId) -> Result<Option<Entry<E>>> {
        match store.fetch(E::DOC_TYPE, id).await? {
            Some(doc) => Ok(Some(Entry {
                id: doc.id.clone(),
                created_at: doc.created_at,
                value: E::from_document(&doc)?,
            })),
            None => Ok(None),
        }
    }

    /// Creates or patches one instance and returns it as stored
    pub async fn save(&self, store: &dyn ContentStore, mode: &EditMode, value: &E) -> Result<Entry<E>> {
        let result = async {
            let fields = stage(value, store).await?;
            match mode {
                EditMode::Creating => store.create(E::DOC_TYPE, fields).await,
                EditMode::Editing(id) => store.patch(id, fields).await,
            }
        }
        .await;

        let written = match result {
            Ok(doc) => doc,
            Err(err) => {
                report_failure(self.notifier.as_ref(), E::LABEL, &err);
                return Err(err);
            }
        };

        let verb = if mode.is_creating() { "created" } else { "updated" };
        let (doc, value) = reread::<E>(store, written).await?;
        tracing::info!(doc_type = E::DOC_TYPE, id = %doc.id, "{} {}", E::LABEL, verb);
        self.notifier.notify(Notification::success(
            "Success!",
            format!("{} has been {} successfully.", E::LABEL, verb),
        ));

        Ok(Entry {
            id: doc.id,
            created_at: doc.created_at,
            value,
        })
    }

    pub async fn delete(&self, store: &dyn ContentStore, id: &DocumentId) -> Result<()> {
        if let Err(err) = store.delete(id).await {
            report_failure(self.notifier.as_ref(), E::LABEL, &err);
            return Err(err);
        }
        tracing::info!(doc_type = E::DOC_TYPE, id = %id, "{} deleted", E::LABEL);
        self.notifier.notify(Notification::success(
            "Deleted",
            format!("{} has been deleted.", E::LABEL),
        ));
        Ok(())
    }

    /// Like [`load`](Self::load) but a missing id is an error
    pub async fn require(&self, store: &dyn ContentStore, id: &DocumentId) -> Result<Entry<E>> {
        self.load(store, id)
            .await?
            .ok_or_else(|| AdminError::status(404, Some(format!("{} '{}' not found", E::LABEL, id))))
    }
}
