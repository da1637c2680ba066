//! customers-server: HTTP CRUD service over a single `customers` table
//!
//! Two layers:
//! - `db`: connection pool, schema bootstrap and the customer repository
//! - `http`: axum router, query/form extractors and error-to-status mapping

pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod state;

pub use error::{Error, Result};
pub use state::AppState;
