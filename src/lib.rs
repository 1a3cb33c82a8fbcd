pub mod auth;
pub mod cli;
pub mod config;
pub mod content;
pub mod dashboard;
pub mod editor;
pub mod error;
pub mod forms;
pub mod http;
pub mod notify;
pub mod routes;
pub mod session;
pub mod validation;
