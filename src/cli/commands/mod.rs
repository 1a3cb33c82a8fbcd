pub mod auth;
pub mod contacts;
pub mod content;
pub mod dashboard;
pub mod open;
pub mod services;
pub mod users;
