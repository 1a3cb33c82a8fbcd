use serde::{Deserialize, Serialize};

use crate::forms::{path, ContentEntity};
use crate::validation::{ValidationErrors, Validator};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorySection {
    pub title: String,
    pub content: Vec<String>,
    pub points: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    pub sub_points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OurStory {
    pub sections: Vec<StorySection>,
}

impl ContentEntity for OurStory {
    const DOC_TYPE: &'static str = "ourStory";
    const LABEL: &'static str = "Our Story";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();

        v.min_items("sections", self.sections.len(), 1, "At least one section is required");
        for (i, section) in self.sections.iter().enumerate() {
            v.required(&path("sections", i, "title"), &section.title, "Section title is required");

            let content = path("sections", i, "content");
            v.min_items(&content, section.content.len(), 1, "At least one content item is required");
            for (j, item) in section.content.iter().enumerate() {
                v.required(&format!("{}[{}]", content, j), item, "Content item is required");
            }
        }

        v.finish()
    }
}
