//! Generic editors that sync a typed form with the content store.
//!
//! Every write follows the same sequence: validate, upload pending images on a
//! staged copy, write only the fields the form controls, then re-read the
//! stored document. The editor's own values change only after the write
//! succeeds, so a failure leaves the form exactly as the user left it.

pub mod collection;
pub mod singleton;

pub use collection::{CollectionEditor, Entry};
pub use singleton::SingletonEditor;

use std::fmt;

use crate::content::image::resolve_all;
use crate::content::{ContentStore, Document, DocumentId};
use crate::error::{AdminError, Result};
use crate::forms::ContentEntity;
use crate::notify::{Notification, Notifier};

/// Whether the next submit creates a document or patches an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    Creating,
    Editing(DocumentId),
}

impl EditMode {
    pub fn id(&self) -> Option<&DocumentId> {
        match self {
            EditMode::Creating => None,
            EditMode::Editing(id) => Some(id),
        }
    }

    pub fn is_creating(&self) -> bool {
        matches!(self, EditMode::Creating)
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditMode::Creating => write!(f, "creating"),
            EditMode::Editing(id) => write!(f, "editing {}", id),
        }
    }
}

/// Validates and uploads images, returning the field map to write
pub(crate) async fn stage<E: ContentEntity>(
    value: &E,
    store: &dyn ContentStore,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    value.validate()?;

    let mut staged = value.clone();
    resolve_all(staged.image_fields(), store).await?;
    staged.to_fields()
}

/// Re-reads a written document, falling back to the write's own echo
pub(crate) async fn reread<E: ContentEntity>(store: &dyn ContentStore, written: Document) -> Result<(Document, E)> {
    let doc = match store.fetch(E::DOC_TYPE, &written.id).await? {
        Some(doc) => doc,
        None => {
            tracing::warn!(doc_type = E::DOC_TYPE, id = %written.id, "re-read after write found nothing");
            written
        }
    };
    let value = E::from_document(&doc)?;
    Ok((doc, value))
}

/// Surfaces a failed submit. Validation errors stay on the form fields.
pub(crate) fn report_failure(notifier: &dyn Notifier, label: &str, err: &AdminError) {
    match err {
        AdminError::Validation(errors) => {
            tracing::debug!(form = label, errors = errors.len(), "submit blocked by validation");
        }
        other => {
            tracing::warn!(form = label, "submit failed: {}", other);
            notifier.notify(Notification::error("Error", other.to_string()));
        }
    }
}
