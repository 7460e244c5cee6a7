//! Contact management: a REST service over a SQLite store, and a GTK client
//! (behind the `gui` feature) that drives it.

pub mod api;
pub mod app;
pub mod config;
pub mod server;
pub mod store;
#[cfg(feature = "gui")]
pub mod ui;
pub mod utils;
pub mod validation;
