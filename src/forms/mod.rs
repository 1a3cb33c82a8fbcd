//! Typed content entities, one per editor, with their validation rules.

pub mod banner;
pub mod contact;
pub mod faq;
pub mod our_story;
pub mod real_winners;
pub mod services;
pub mod setting;
pub mod united_voices;
pub mod way_cards;

pub use banner::Banner;
pub use contact::Contact;
pub use faq::{Faq, FaqItem};
pub use our_story::{OurStory, StorySection};
pub use real_winners::{RealWinners, WinnerItem};
pub use services::{DetailSection, ReferenceItem, Service, ServiceDetails};
pub use setting::{Setting, SocialLink};
pub use united_voices::{UnitedVoices, VoiceItem};
pub use way_cards::{WayCard, WayCards};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::content::{Document, ImageField};
use crate::error::{AdminError, Result};
use crate::routes::Route;
use crate::validation::ValidationErrors;

/// A form-backed content type stored under one content-store type tag
pub trait ContentEntity: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {
    const DOC_TYPE: &'static str;
    const LABEL: &'static str;

    fn validate(&self) -> std::result::Result<(), ValidationErrors>;

    /// Image fields by name, for upload resolution
    fn image_fields(&mut self) -> Vec<(&'static str, &mut ImageField)> {
        Vec::new()
    }

    /// Every field this form controls, ready for a create or patch
    fn to_fields(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(AdminError::unexpected(format!(
                "{} serialized to {} instead of an object",
                Self::LABEL,
                other
            ))),
        }
    }

    fn from_document(doc: &Document) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(doc.content_fields()))?)
    }
}

/// Every editable content type, in sidebar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Banner,
    OurStory,
    Services,
    UnitedVoices,
    RealWinners,
    Faq,
    WayCards,
    Contact,
    Setting,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Banner,
        EntityKind::OurStory,
        EntityKind::Services,
        EntityKind::UnitedVoices,
        EntityKind::RealWinners,
        EntityKind::Faq,
        EntityKind::WayCards,
        EntityKind::Contact,
        EntityKind::Setting,
    ];

    pub fn doc_type(&self) -> &'static str {
        match self {
            EntityKind::Banner => Banner::DOC_TYPE,
            EntityKind::OurStory => OurStory::DOC_TYPE,
            EntityKind::Services => Service::DOC_TYPE,
            EntityKind::UnitedVoices => UnitedVoices::DOC_TYPE,
            EntityKind::RealWinners => RealWinners::DOC_TYPE,
            EntityKind::Faq => Faq::DOC_TYPE,
            EntityKind::WayCards => WayCards::DOC_TYPE,
            EntityKind::Contact => Contact::DOC_TYPE,
            EntityKind::Setting => Setting::DOC_TYPE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Banner => Banner::LABEL,
            EntityKind::OurStory => OurStory::LABEL,
            EntityKind::Services => Service::LABEL,
            EntityKind::UnitedVoices => UnitedVoices::LABEL,
            EntityKind::RealWinners => RealWinners::LABEL,
            EntityKind::Faq => Faq::LABEL,
            EntityKind::WayCards => WayCards::LABEL,
            EntityKind::Contact => Contact::LABEL,
            EntityKind::Setting => Setting::LABEL,
        }
    }

    /// Singletons hold at most one document per type
    pub fn is_singleton(&self) -> bool {
        !matches!(self, EntityKind::Services | EntityKind::Contact)
    }

    pub fn route(&self) -> Route {
        match self {
            EntityKind::Banner => Route::Banner,
            EntityKind::OurStory => Route::OurStory,
            EntityKind::Services => Route::Services(None),
            EntityKind::UnitedVoices => Route::UnitedVoices,
            EntityKind::RealWinners => Route::RealWinners,
            EntityKind::Faq => Route::Faqs,
            EntityKind::WayCards => Route::WayCards,
            EntityKind::Contact => Route::Contacts,
            EntityKind::Setting => Route::Settings,
        }
    }

    /// Command-line name
    pub fn slug(&self) -> &'static str {
        match self {
            EntityKind::Banner => "banner",
            EntityKind::OurStory => "our-story",
            EntityKind::Services => "services",
            EntityKind::UnitedVoices => "united-voices",
            EntityKind::RealWinners => "real-winners",
            EntityKind::Faq => "faqs",
            EntityKind::WayCards => "way-cards",
            EntityKind::Contact => "contacts",
            EntityKind::Setting => "settings",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        EntityKind::ALL
            .iter()
            .copied()
            .find(|k| k.slug() == wanted || k.doc_type().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = EntityKind::ALL.iter().map(|k| k.slug()).collect();
                format!("unknown content type '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// `sections[2].title` style path for nested field errors
pub(crate) fn path(parent: &str, index: usize, field: &str) -> String {
    format!("{}[{}].{}", parent, index, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kinds_parse_from_slug_and_type_tag() {
        assert_eq!("faqs".parse::<EntityKind>().unwrap(), EntityKind::Faq);
        assert_eq!("ourStory".parse::<EntityKind>().unwrap(), EntityKind::OurStory);
        assert_eq!("Settings".parse::<EntityKind>().unwrap(), EntityKind::Setting);
        assert!("widgets".parse::<EntityKind>().is_err());
    }

    #[test]
    fn only_services_and_contacts_are_collections() {
        let collections: Vec<_> = EntityKind::ALL.iter().filter(|k| !k.is_singleton()).collect();
        assert_eq!(collections, vec![&EntityKind::Services, &EntityKind::Contact]);
    }

    #[test]
    fn every_kind_routes_to_a_protected_view() {
        for kind in EntityKind::ALL {
            assert!(kind.route().is_protected(), "{} should be protected", kind);
        }
    }
}
