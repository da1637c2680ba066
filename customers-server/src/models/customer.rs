//! Customer record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `customers` table.
///
/// `phone` is unique across rows and doubles as the natural key for
/// idempotent creation. `active == false` means the customer is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub active: bool,
    pub created: DateTime<Utc>,
}
