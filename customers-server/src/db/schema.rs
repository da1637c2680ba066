//! Schema bootstrap for the customers table

use sqlx::PgPool;

/// Create the `customers` table if it does not exist yet.
///
/// Safe to run on every startup.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running customers migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT NOT NULL UNIQUE,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Customers migrations complete");
    Ok(())
}
