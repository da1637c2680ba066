//! Customer repository
//!
//! Every method is a single statement:
//! - create: INSERT with ON CONFLICT (phone) DO UPDATE (idempotent by phone)
//! - update/block/unblock/remove: `RETURNING` the full row, zero rows = not found
//! - list: ordered by id, an empty result is an empty Vec

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::Customer;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    fn customer_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "customer",
            id: id.to_string(),
        }
    }
}

/// Storage operations over customers.
///
/// Id-scoped operations return `DbError::NotFound` when no row matches;
/// list operations never do.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn by_id(&self, id: i64) -> Result<Customer, DbError>;

    async fn all(&self) -> Result<Vec<Customer>, DbError>;

    async fn all_active(&self) -> Result<Vec<Customer>, DbError>;

    /// Insert a customer, or rename the existing one holding `phone`.
    async fn create(&self, name: &str, phone: &str) -> Result<Customer, DbError>;

    async fn update(&self, id: i64, name: &str, phone: &str) -> Result<Customer, DbError>;

    /// Delete the row, returning its last values.
    async fn remove_by_id(&self, id: i64) -> Result<Customer, DbError>;

    async fn block_by_id(&self, id: i64) -> Result<Customer, DbError>;

    async fn unblock_by_id(&self, id: i64) -> Result<Customer, DbError>;
}

/// Postgres-backed customer repository
#[derive(Clone)]
pub struct CustomerRepo {
    pool: PgPool,
}

impl CustomerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Customer, DbError> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET active = $1 WHERE id = $2
            RETURNING id, name, phone, active, created
            "#,
        )
        .bind(active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::customer_not_found(id))
    }
}

#[async_trait]
impl CustomerStore for CustomerRepo {
    async fn by_id(&self, id: i64) -> Result<Customer, DbError> {
        sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, active, created FROM customers WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::customer_not_found(id))
    }

    async fn all(&self) -> Result<Vec<Customer>, DbError> {
        let items = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, active, created FROM customers ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn all_active(&self) -> Result<Vec<Customer>, DbError> {
        let items = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, active, created FROM customers
            WHERE active = TRUE
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn create(&self, name: &str, phone: &str) -> Result<Customer, DbError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, phone) VALUES ($1, $2)
            ON CONFLICT (phone) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, phone, active, created
            "#,
        )
        .bind(name)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = customer.id, "customer upserted");
        Ok(customer)
    }

    async fn update(&self, id: i64, name: &str, phone: &str) -> Result<Customer, DbError> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET name = $1, phone = $2 WHERE id = $3
            RETURNING id, name, phone, active, created
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::customer_not_found(id))
    }

    async fn remove_by_id(&self, id: i64) -> Result<Customer, DbError> {
        sqlx::query_as::<_, Customer>(
            r#"
            DELETE FROM customers WHERE id = $1
            RETURNING id, name, phone, active, created
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::customer_not_found(id))
    }

    async fn block_by_id(&self, id: i64) -> Result<Customer, DbError> {
        self.set_active(id, false).await
    }

    async fn unblock_by_id(&self, id: i64) -> Result<Customer, DbError> {
        self.set_active(id, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, schema};

    // Integration tests - run with DATABASE_URL set
    // cargo test -p customers-server -- --ignored

    async fn repo() -> CustomerRepo {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        schema::migrate(&pool).await.expect("migration failed");
        CustomerRepo::new(pool)
    }

    fn unique_phone() -> String {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("test-{nanos}")
    }

    #[test]
    fn not_found_names_the_customer() {
        let err = DbError::customer_not_found(42);
        assert_eq!(err.to_string(), "not found: customer '42'");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_is_idempotent_by_phone() {
        let repo = repo().await;
        let phone = unique_phone();

        let first = repo.create("Alice", &phone).await.unwrap();
        assert!(first.active);
        assert_eq!(first.name, "Alice");

        let second = repo.create("Alicia", &phone).await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.created, first.created);
        assert_eq!(second.name, "Alicia");

        repo.remove_by_id(first.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn block_and_unblock_toggle_active_listing() {
        let repo = repo().await;
        let created = repo.create("Bob", &unique_phone()).await.unwrap();

        let blocked = repo.block_by_id(created.id).await.unwrap();
        assert!(!blocked.active);
        let active = repo.all_active().await.unwrap();
        assert!(active.iter().all(|c| c.active));
        assert!(!active.iter().any(|c| c.id == created.id));
        assert!(repo.all().await.unwrap().iter().any(|c| c.id == created.id));

        let unblocked = repo.unblock_by_id(created.id).await.unwrap();
        assert!(unblocked.active);
        assert!(repo
            .all_active()
            .await
            .unwrap()
            .iter()
            .any(|c| c.id == created.id));

        repo.remove_by_id(created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn remove_twice_is_not_found() {
        let repo = repo().await;
        let created = repo.create("Carol", &unique_phone()).await.unwrap();

        let removed = repo.remove_by_id(created.id).await.unwrap();
        assert_eq!(removed, created);

        let err = repo.remove_by_id(created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        let err = repo.by_id(created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_missing_id_is_not_found() {
        let repo = repo().await;
        let err = repo.update(-1, "Nobody", &unique_phone()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
