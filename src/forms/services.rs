//! Services are a collection; each one is addressed on the public site by its `link` slug.

use serde::{Deserialize, Serialize};

use crate::content::image::STANDARD_IMAGE_TYPES;
use crate::content::{ImageField, ImageRules};
use crate::forms::{path, ContentEntity};
use crate::validation::{ValidationErrors, Validator};

const IMAGE_RULES: ImageRules = ImageRules {
    required: None,
    allowed_types: STANDARD_IMAGE_TYPES,
    type_message: "Only image files are allowed",
    max_bytes: None,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceItem {
    pub label: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSection {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDetails {
    pub intro: String,
    pub sections: Vec<DetailSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub title: String,
    pub description: String,
    pub image: ImageField,
    pub link: String,
    pub demands: Vec<String>,
    pub demand_text: String,
    pub references: Vec<ReferenceItem>,
    pub details: ServiceDetails,
}

impl Default for Service {
    /// A new service starts with one blank demand row
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            image: ImageField::Empty,
            link: String::new(),
            demands: vec![String::new()],
            demand_text: String::new(),
            references: Vec::new(),
            details: ServiceDetails::default(),
        }
    }
}

impl ContentEntity for Service {
    const DOC_TYPE: &'static str = "services";
    const LABEL: &'static str = "Service";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();

        v.required("title", &self.title, "Title is required");
        v.required("description", &self.description, "Description is required");
        IMAGE_RULES.check(&mut v, "image", &self.image);
        if v.required("link", &self.link, "Link is required") {
            v.slug(
                "link",
                &self.link,
                "Link must be a valid URL slug (lowercase letters, numbers, and hyphens only)",
            );
        }

        v.min_items("demands", self.demands.len(), 1, "At least one demand is required");
        for (i, demand) in self.demands.iter().enumerate() {
            v.required(&format!("demands[{}]", i), demand, "Demand is required");
        }

        for (i, reference) in self.references.iter().enumerate() {
            v.required(&path("references", i, "label"), &reference.label, "Reference label is required");
            v.required(&path("references", i, "link"), &reference.link, "Reference link is required");
        }

        for (i, section) in self.details.sections.iter().enumerate() {
            v.required(&path("details.sections", i, "key"), &section.key, "Section key is required");
        }

        v.finish()
    }

    fn image_fields(&mut self) -> Vec<(&'static str, &mut ImageField)> {
        vec![("image", &mut self.image)]
    }
}
