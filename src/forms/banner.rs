use serde::{Deserialize, Serialize};

use crate::forms::ContentEntity;
use crate::validation::ValidationErrors;

/// Hero banner title and subtitle, both optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Banner {
    pub title: String,
    pub sub_title: String,
}

impl ContentEntity for Banner {
    const DOC_TYPE: &'static str = "banner";
    const LABEL: &'static str = "Banner";

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_banner_is_valid() {
        assert!(Banner::default().validate().is_ok());
    }

    #[test]
    fn fields_use_camel_case() {
        let banner = Banner {
            title: "Friends United".into(),
            sub_title: "Stronger together".into(),
        };
        let fields = banner.to_fields().unwrap();
        assert_eq!(fields["subTitle"], json!("Stronger together"));
        assert_eq!(fields.len(), 2);
    }
}
