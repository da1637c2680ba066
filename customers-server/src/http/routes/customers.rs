//! Customer endpoints
//!
//! Method-style paths (`/customers.getById?id=1`). Every route accepts GET
//! and POST.

use axum::{extract::State, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::{CustomerId, SaveCommand, SaveForm};
use crate::models::Customer;
use crate::state::AppState;

/// /customers.getById?id=
async fn get_by_id(
    State(state): State<AppState>,
    CustomerId(id): CustomerId,
) -> Result<Json<Customer>, ApiError> {
    let customer = state.customers().by_id(id).await?;
    Ok(Json(customer))
}

/// /customers.getAll
async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    let items = state.customers().all().await?;
    Ok(Json(items))
}

/// /customers.getAllActive
async fn get_all_active(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    let items = state.customers().all_active().await?;
    Ok(Json(items))
}

/// /customers.save - id=0 creates (upsert by phone), any other id updates
async fn save(
    State(state): State<AppState>,
    SaveForm(cmd): SaveForm,
) -> Result<Json<Customer>, ApiError> {
    let customer = match cmd {
        SaveCommand::Create { name, phone } => state.customers().create(&name, &phone).await?,
        SaveCommand::Update { id, name, phone } => {
            state.customers().update(id, &name, &phone).await?
        }
    };

    tracing::info!(id = customer.id, "customer saved");
    Ok(Json(customer))
}

/// /customers.removeById?id=
async fn remove_by_id(
    State(state): State<AppState>,
    CustomerId(id): CustomerId,
) -> Result<Json<Customer>, ApiError> {
    let customer = state.customers().remove_by_id(id).await?;
    tracing::info!(id, "customer removed");
    Ok(Json(customer))
}

/// /customers.blockById?id=
async fn block_by_id(
    State(state): State<AppState>,
    CustomerId(id): CustomerId,
) -> Result<Json<Customer>, ApiError> {
    let customer = state.customers().block_by_id(id).await?;
    tracing::info!(id, "customer blocked");
    Ok(Json(customer))
}

/// /customers.unblockById?id=
async fn unblock_by_id(
    State(state): State<AppState>,
    CustomerId(id): CustomerId,
) -> Result<Json<Customer>, ApiError> {
    let customer = state.customers().unblock_by_id(id).await?;
    tracing::info!(id, "customer unblocked");
    Ok(Json(customer))
}

/// Customer routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers.getById", get(get_by_id).post(get_by_id))
        .route("/customers.getAll", get(get_all).post(get_all))
        .route("/customers.getAllActive", get(get_all_active).post(get_all_active))
        .route("/customers.save", get(save).post(save))
        .route("/customers.removeById", get(remove_by_id).post(remove_by_id))
        .route("/customers.blockById", get(block_by_id).post(block_by_id))
        .route("/customers.unblockById", get(unblock_by_id).post(unblock_by_id))
}
