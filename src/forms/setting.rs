use serde::{Deserialize, Serialize};

use crate::content::{ImageField, ImageRules};
use crate::forms::{path, ContentEntity};
use crate::validation::{ValidationErrors, Validator};

const LOGO_RULES: ImageRules = ImageRules {
    required: None,
    allowed_types: &["image/jpeg", "image/png", "image/jpg", "image/webp", "image/svg+xml"],
    type_message: "Only image files are allowed",
    max_bytes: None,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    /// Icon name understood by the public site, e.g. `FaFacebook`
    pub icon: String,
}

/// Site-wide settings: title, description, logo and contact details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Setting {
    pub site_title: String,
    pub site_description: String,
    pub logo: ImageField,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub social_links: Vec<SocialLink>,
}

impl ContentEntity for Setting {
    const DOC_TYPE: &'static str = "setting";
    const LABEL: &'static str = "Settings";

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();

        v.required("siteTitle", &self.site_title, "Site title is required");
        v.required("siteDescription", &self.site_description, "Site description is required");
        LOGO_RULES.check(&mut v, "logo", &self.logo);
        v.email("email", &self.email, "Invalid email format");

        for (i, link) in self.social_links.iter().enumerate() {
            v.required(&path("socialLinks", i, "platform"), &link.platform, "Platform name is required");
            let url = path("socialLinks", i, "url");
            if v.required(&url, &link.url, "URL is required") {
                v.url(&url, &link.url, "Must be a valid URL");
            }
            v.required(&path("socialLinks", i, "icon"), &link.icon, "Icon is required");
        }

        v.finish()
    }

    fn image_fields(&mut self) -> Vec<(&'static str, &mut ImageField)> {
        vec![("logo", &mut self.logo)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::LocalImage;

    fn valid() -> Setting {
        Setting {
            site_title: "Friends United".into(),
            site_description: "Neighbours helping neighbours".into(),
            ..Default::default()
        }
    }

    #[test]
    fn optional_fields_may_be_blank() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn email_is_checked_only_when_present() {
        let mut setting = valid();
        setting.email = "hello@".into();
        assert_eq!(setting.validate().unwrap_err().get("email"), Some("Invalid email format"));
    }

    #[test]
    fn svg_logo_is_accepted() {
        let mut setting = valid();
        setting.logo = ImageField::PendingUpload(LocalImage::new("logo.svg", "image/svg+xml", vec![b'<']));
        assert!(setting.validate().is_ok());

        setting.logo = ImageField::PendingUpload(LocalImage::new("logo.bmp", "image/bmp", vec![0]));
        assert_eq!(setting.validate().unwrap_err().get("logo"), Some("Only image files are allowed"));
    }

    #[test]
    fn social_links_need_absolute_urls() {
        let mut setting = valid();
        setting.social_links.push(SocialLink {
            platform: "Facebook".into(),
            url: "facebook.com/friendsunited".into(),
            icon: "FaFacebook".into(),
        });
        let errors = setting.validate().unwrap_err();
        assert_eq!(errors.get("socialLinks[0].url"), Some("Must be a valid URL"));
    }
}
