//! Image fields and their three states.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::content::ContentStore;
use crate::error::Result;
use crate::validation::Validator;

/// Reference to an uploaded image asset, embedded in documents as
/// `{ "_type": "image", "asset": { "_type": "reference", "_ref": "<id>" } }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub asset_id: String,
}

impl ImageRef {
    pub fn new(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
        }
    }

    /// CDN URL for ids shaped `image-<sha>-<WxH>-<ext>`
    pub fn cdn_url(&self, project_id: &str, dataset: &str) -> Option<String> {
        let parts: Vec<&str> = self.asset_id.split('-').collect();
        match parts.as_slice() {
            ["image", sha, dims, ext] => Some(format!(
                "https://cdn.sanity.io/images/{}/{}/{}-{}.{}",
                project_id, dataset, sha, dims, ext
            )),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct AssetPointer {
    #[serde(rename = "_type", default = "reference_type")]
    kind: String,
    #[serde(rename = "_ref")]
    reference: String,
}

#[derive(Serialize, Deserialize)]
struct ImageObject {
    #[serde(rename = "_type", default = "image_type")]
    kind: String,
    // Absent once the asset has been detached in the studio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    asset: Option<AssetPointer>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawImage {
    Object(ImageObject),
    Bare(String),
}

fn reference_type() -> String {
    "reference".to_string()
}

fn image_type() -> String {
    "image".to_string()
}

impl RawImage {
    fn into_ref(self) -> Option<ImageRef> {
        match self {
            RawImage::Object(obj) => obj.asset.map(|a| ImageRef::new(a.reference)),
            RawImage::Bare(id) => Some(ImageRef::new(id)),
        }
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ImageObject {
            kind: image_type(),
            asset: Some(AssetPointer {
                kind: reference_type(),
                reference: self.asset_id.clone(),
            }),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        RawImage::deserialize(deserializer)?
            .into_ref()
            .ok_or_else(|| serde::de::Error::custom("image object has no asset reference"))
    }
}

/// A file picked locally and not yet uploaded
#[derive(Clone, PartialEq, Eq)]
pub struct LocalImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl LocalImage {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let content_type = content_type_for(path).to_string();
        Ok(Self::new(filename, content_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// File extension implied by the content type
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

impl fmt::Debug for LocalImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalImage")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// State of one image field on a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageField {
    #[default]
    Empty,
    PendingUpload(LocalImage),
    Persisted(ImageRef),
}

impl ImageField {
    pub fn is_empty(&self) -> bool {
        matches!(self, ImageField::Empty)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ImageField::PendingUpload(_))
    }

    pub fn reference(&self) -> Option<&ImageRef> {
        match self {
            ImageField::Persisted(r) => Some(r),
            _ => None,
        }
    }

    /// Uploads a pending file and swaps it for the returned reference.
    /// Persisted references and empty fields are left untouched.
    pub async fn resolve(&mut self, store: &dyn ContentStore) -> Result<()> {
        if let ImageField::PendingUpload(local) = self {
            tracing::debug!(filename = %local.filename, size = local.size(), "uploading image");
            let uploaded = store.upload_image(local).await?;
            *self = ImageField::Persisted(uploaded);
        }
        Ok(())
    }
}

/// Serializes as the image reference or `null`. A pending upload refuses to serialize,
/// so local bytes can never leak into a document write.
impl Serialize for ImageField {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ImageField::Empty => serializer.serialize_none(),
            ImageField::Persisted(r) => r.serialize(serializer),
            ImageField::PendingUpload(local) => Err(serde::ser::Error::custom(format!(
                "image '{}' must be uploaded before it is written",
                local.filename
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ImageField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // An image object without an asset counts as no image
        Ok(match Option::<RawImage>::deserialize(deserializer)?.and_then(RawImage::into_ref) {
            Some(r) => ImageField::Persisted(r),
            None => ImageField::Empty,
        })
    }
}

/// Uploads every pending image in `fields`, one after another
pub async fn resolve_all(fields: Vec<(&'static str, &mut ImageField)>, store: &dyn ContentStore) -> Result<()> {
    for (name, field) in fields {
        field.resolve(store).await.map_err(|e| {
            tracing::warn!(field = name, "image upload failed: {}", e);
            e
        })?;
    }
    Ok(())
}

/// Declarative checks for one image field
#[derive(Debug, Clone, Copy)]
pub struct ImageRules {
    pub required: Option<&'static str>,
    pub allowed_types: &'static [&'static str],
    pub type_message: &'static str,
    pub max_bytes: Option<(usize, &'static str)>,
}

pub const STANDARD_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg", "image/webp"];

impl ImageRules {
    /// Type and size checks only apply to a freshly picked file
    pub fn check(&self, v: &mut Validator, field: &str, image: &ImageField) {
        match image {
            ImageField::Empty => {
                if let Some(message) = self.required {
                    v.add(field, message);
                }
            }
            ImageField::PendingUpload(local) => {
                if !self.allowed_types.contains(&local.content_type.as_str()) {
                    v.add(field, self.type_message);
                }
                if let Some((max, message)) = self.max_bytes {
                    if local.size() > max {
                        v.add(field, message);
                    }
                }
            }
            ImageField::Persisted(_) => {}
        }
    }
}
