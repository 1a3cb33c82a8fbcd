use serde::{Deserialize, Serialize};

use crate::content::image::STANDARD_IMAGE_TYPES;
use crate::content::{ImageField, ImageRules};
use crate::forms::{path, ContentEntity};
use crate::validation::{ValidationErrors, Validator};

const IMAGE_RULES: ImageRules = ImageRules {
    required: Some("Image is required"),
    allowed_types: STANDARD_IMAGE_TYPES,
    type_message: "Only image files are allowed",
    max_bytes: None,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faq {
    pub image: ImageField,
    pub faq: Vec<FaqItem>,
}

impl ContentEntity for Faq {
    const DOC_TYPE: &'static str = "faq";
    const LABEL: &'static str = "FAQ";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();

        IMAGE_RULES.check(&mut v, "image", &self.image);

        v.min_items("faq", self.faq.len(), 1, "At least one FAQ is required");
        for (i, item) in self.faq.iter().enumerate() {
            v.required(&path("faq", i, "question"), &item.question, "Question is required");
            let answer = path("faq", i, "answer");
            if v.required(&answer, &item.answer, "Answer is required") {
                v.min_chars(&answer, &item.answer, 20, "Answer must be at least 20 characters");
            }
        }

        v.finish()
    }

    fn image_fields(&mut self) -> Vec<(&'static str, &mut ImageField)> {
        vec![("image", &mut self.image)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ImageRef, LocalImage};

    #[test]
    fn requires_image_and_one_item() {
        let errors = Faq::default().validate().unwrap_err();
        assert_eq!(errors.get("image"), Some("Image is required"));
        assert_eq!(errors.get("faq"), Some("At least one FAQ is required"));
    }

    #[test]
    fn persisted_image_satisfies_requirement() {
        let faq = Faq {
            image: ImageField::Persisted(ImageRef::new("image-a-10x10-png")),
            faq: vec![FaqItem {
                question: "Who can join?".into(),
                answer: "Anyone over sixteen who lives in the county.".into(),
            }],
        };
        assert!(faq.validate().is_ok());
    }

    #[test]
    fn item_errors_are_indexed() {
        let faq = Faq {
            image: ImageField::PendingUpload(LocalImage::new("q.gif", "image/gif", vec![0])),
            faq: vec![FaqItem {
                question: String::new(),
                answer: "Too short".into(),
            }],
        };
        let errors = faq.validate().unwrap_err();
        assert_eq!(errors.get("image"), Some("Only image files are allowed"));
        assert_eq!(errors.get("faq[0].question"), Some("Question is required"));
        assert_eq!(errors.get("faq[0].answer"), Some("Answer must be at least 20 characters"));
    }
}
