pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod follows;
pub mod guards;
pub mod images;
pub mod models;
pub mod pagination;
pub mod schema;
pub mod shopping_list;
pub mod store;
pub mod telemetry;
pub mod validation;

use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub config: Arc<config::Config>,
}
