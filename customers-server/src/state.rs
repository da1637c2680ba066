//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::{CustomerRepo, CustomerStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    customers: Arc<dyn CustomerStore>,
}

impl AppState {
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { customers }),
        }
    }

    /// State backed by the Postgres repository.
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(CustomerRepo::new(pool)))
    }

    pub fn customers(&self) -> &dyn CustomerStore {
        self.inner.customers.as_ref()
    }
}
