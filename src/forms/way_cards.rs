use serde::{Deserialize, Serialize};

use crate::content::Document;
use crate::error::Result;
use crate::forms::ContentEntity;
use crate::validation::ValidationErrors;

pub const OLD_WAY: &str = "OLD WAY";
pub const NEW_WAY: &str = "NEW WAY";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WayCard {
    pub sub_header: String,
    pub header: String,
    /// One paragraph per entry
    pub description: Vec<String>,
}

impl WayCard {
    fn blank(sub_header: &str) -> Self {
        Self {
            sub_header: sub_header.to_string(),
            header: String::new(),
            description: vec![String::new()],
        }
    }

    fn fill_defaults(&mut self, sub_header: &str) {
        if self.sub_header.is_empty() {
            self.sub_header = sub_header.to_string();
        }
        if self.description.is_empty() {
            self.description.push(String::new());
        }
    }
}

/// "Old way / new way" comparison cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WayCards {
    pub old_way: WayCard,
    pub new_way: WayCard,
}

impl Default for WayCards {
    fn default() -> Self {
        Self {
            old_way: WayCard::blank(OLD_WAY),
            new_way: WayCard::blank(NEW_WAY),
        }
    }
}

impl ContentEntity for WayCards {
    const DOC_TYPE: &'static str = "wayCards";
    const LABEL: &'static str = "Way Cards";

    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Ok(())
    }

    fn from_document(doc: &Document) -> Result<Self> {
        let mut cards: WayCards = serde_json::from_value(serde_json::Value::Object(doc.content_fields()))?;
        cards.old_way.fill_defaults(OLD_WAY);
        cards.new_way.fill_defaults(NEW_WAY);
        Ok(cards)
    }
}
