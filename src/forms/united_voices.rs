use serde::{Deserialize, Serialize};

use crate::content::{ImageField, ImageRules};
use crate::forms::ContentEntity;
use crate::validation::{ValidationErrors, Validator};

pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

const VOICE_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

const FRONT_RULES: ImageRules = ImageRules {
    required: Some("Front image is required"),
    allowed_types: VOICE_IMAGE_TYPES,
    type_message: "Only JPEG and PNG files are allowed",
    max_bytes: Some((MAX_IMAGE_BYTES, "File size must not exceed 2MB")),
};

const BACK_RULES: ImageRules = ImageRules {
    required: Some("Back image is required"),
    ..FRONT_RULES
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoiceItem {
    pub heading: String,
    pub sub_heading: String,
}

/// Testimonials block with a two-sided card image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitedVoices {
    pub title: String,
    pub sub_title: String,
    pub description: String,
    pub frontimage: ImageField,
    pub backimage: ImageField,
    pub voices: Vec<VoiceItem>,
}

impl ContentEntity for UnitedVoices {
    const DOC_TYPE: &'static str = "unitedVoices";
    const LABEL: &'static str = "United Voices";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        FRONT_RULES.check(&mut v, "frontimage", &self.frontimage);
        BACK_RULES.check(&mut v, "backimage", &self.backimage);
        v.finish()
    }

    fn image_fields(&mut self) -> Vec<(&'static str, &mut ImageField)> {
        vec![("frontimage", &mut self.frontimage), ("backimage", &mut self.backimage)]
    }
}
