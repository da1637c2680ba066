//! Database layer - connection pool, schema and repository
//!
//! # Design Principles
//!
//! - One pooled `PgPool`, cloned into the repository; no Arc<Mutex<Connection>>
//! - Every operation is a single statement; no multi-step transactions
//! - Rely on the `phone` unique constraint for upserts, no check-then-insert
//! - `RETURNING` with an explicit column list for every mutating query

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
