//! Landing view: one card per content editor with its document count.

use serde::Serialize;

use crate::content::ContentStore;
use crate::error::Result;
use crate::forms::EntityKind;
use crate::routes::Route;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardCard {
    pub title: &'static str,
    pub route: String,
    pub doc_type: &'static str,
    pub count: usize,
}

impl DashboardCard {
    /// Singletons show whether their document exists yet
    pub fn status(&self, singleton: bool) -> String {
        match (singleton, self.count) {
            (true, 0) => "not set up".to_string(),
            (true, _) => "published".to_string(),
            (false, 1) => "1 document".to_string(),
            (false, n) => format!("{} documents", n),
        }
    }
}

/// Counts are fetched one type at a time, in sidebar order
pub async fn summary(store: &dyn ContentStore) -> Result<Vec<DashboardCard>> {
    let mut cards = Vec::with_capacity(EntityKind::ALL.len());
    for kind in EntityKind::ALL {
        let route: Route = kind.route();
        cards.push(DashboardCard {
            title: route.title(),
            route: route.path(),
            doc_type: kind.doc_type(),
            count: store.count(kind.doc_type()).await?,
        });
    }
    Ok(cards)
}
