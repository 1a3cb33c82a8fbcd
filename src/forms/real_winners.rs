use serde::{Deserialize, Serialize};

use crate::forms::{path, ContentEntity};
use crate::validation::{ValidationErrors, Validator};

pub const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinnerItem {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RealWinners {
    pub section_title: String,
    pub section_description: String,
    pub winners_list: Vec<WinnerItem>,
}

impl ContentEntity for RealWinners {
    const DOC_TYPE: &'static str = "realWinners";
    const LABEL: &'static str = "Real Winners";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();

        v.required("sectionTitle", &self.section_title, "Section title is required");
        v.required(
            "sectionDescription",
            &self.section_description,
            "Section description is required",
        );

        v.min_items("winnersList", self.winners_list.len(), 1, "At least one winner is required");
        for (i, winner) in self.winners_list.iter().enumerate() {
            v.required(&path("winnersList", i, "icon"), &winner.icon, "Icon is required");
            v.required(&path("winnersList", i, "title"), &winner.title, "Title is required");
            let description = path("winnersList", i, "description");
            if v.required(&description, &winner.description, "Description is required") {
                v.max_chars(
                    &description,
                    &winner.description,
                    MAX_DESCRIPTION_CHARS,
                    "Description must not exceed 500 characters",
                );
            }
        }

        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winner(description: &str) -> WinnerItem {
        WinnerItem {
            icon: "trophy".into(),
            title: "Community garden".into(),
            description: description.into(),
        }
    }

    #[test]
    fn requires_headings_and_a_winner() {
        let errors = RealWinners::default().validate().unwrap_err();
        assert_eq!(errors.get("sectionTitle"), Some("Section title is required"));
        assert_eq!(errors.get("sectionDescription"), Some("Section description is required"));
        assert_eq!(errors.get("winnersList"), Some("At least one winner is required"));
    }

    #[test]
    fn description_limit_counts_characters() {
        let mut winners = RealWinners {
            section_title: "Real winners".into(),
            section_description: "People who made it happen".into(),
            winners_list: vec![winner(&"é".repeat(MAX_DESCRIPTION_CHARS))],
        };
        assert!(winners.validate().is_ok());

        winners.winners_list.push(winner(&"x".repeat(MAX_DESCRIPTION_CHARS + 1)));
        let errors = winners.validate().unwrap_err();
        assert_eq!(
            errors.get("winnersList[1].description"),
            Some("Description must not exceed 500 characters")
        );
        assert_eq!(errors.len(), 1);
    }
}
