//! Repository implementations for database access
//!
//! Handlers depend on the `CustomerStore` trait; `CustomerRepo` is the
//! Postgres implementation.

pub mod customers;

pub use customers::{CustomerRepo, CustomerStore, DbError};
