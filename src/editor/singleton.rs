use std::sync::Arc;

use crate::content::{ContentStore, Document};
use crate::editor::{reread, report_failure, stage, EditMode};
use crate::error::Result;
use crate::forms::ContentEntity;
use crate::notify::{Notification, Notifier};

/// Editor for a content type that holds at most one document
pub struct SingletonEditor<E: ContentEntity> {
    mode: EditMode,
    values: E,
    notifier: Arc<dyn Notifier>,
}

impl<E: ContentEntity> SingletonEditor<E> {
    /// Loads the first document of the type. Found: edit mode with its values.
    /// Not found: create mode with blank defaults.
    pub async fn mount(store: &dyn ContentStore, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let (mode, values) = match store.fetch_first(E::DOC_TYPE).await? {
            Some(doc) => (EditMode::Editing(doc.id.clone()), E::from_document(&doc)?),
            None => (EditMode::Creating, E::default()),
        };
        tracing::debug!(doc_type = E::DOC_TYPE, mode = %mode, "editor mounted");

        Ok(Self { mode, values, notifier })
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn values(&self) -> &E {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut E {
        &mut self.values
    }

    pub fn set_values(&mut self, values: E) {
        self.values = values;
    }

    /// Writes the current values and reloads them from the store.
    ///
    /// On failure the mode and values are exactly as before the call.
    pub async fn submit(&mut self, store: &dyn ContentStore) -> Result<&E> {
        match self.write(store).await {
            Ok(written) => {
                // The write went through, so later submits must patch it even if the reload fails
                self.mode = EditMode::Editing(written.id.clone());
                let (doc, values) = match reread::<E>(store, written).await {
                    Ok(reloaded) => reloaded,
                    Err(err) => {
                        tracing::warn!(doc_type = E::DOC_TYPE, mode = %self.mode, "saved but reload failed: {}", err);
                        self.notifier.notify(Notification::error(
                            "Error",
                            format!("{} was saved but could not be reloaded: {}", E::LABEL, err),
                        ));
                        return Err(err);
                    }
                };
                self.values = values;

                tracing::info!(doc_type = E::DOC_TYPE, id = %doc.id, "singleton saved");
                self.notifier.notify(Notification::success(
                    "Success!",
                    format!("{} saved successfully.", E::LABEL),
                ));
                Ok(&self.values)
            }
            Err(err) => {
                report_failure(self.notifier.as_ref(), E::LABEL, &err);
                Err(err)
            }
        }
    }

    async fn write(&self, store: &dyn ContentStore) -> Result<Document> {
        let fields = stage(&self.values, store).await?;

        match &self.mode {
            EditMode::Editing(id) => store.patch(id, fields).await,
            EditMode::Creating => {
                // Another session may have created the singleton since mount
                match store.fetch_first(E::DOC_TYPE).await? {
                    Some(existing) => {
                        tracing::warn!(doc_type = E::DOC_TYPE, id = %existing.id, "singleton appeared since mount; patching it");
                        store.patch(&existing.id, fields).await
                    }
                    None => store.create(E::DOC_TYPE, fields).await,
                }
            }
        }
    }
}
