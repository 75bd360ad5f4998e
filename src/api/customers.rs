//! Customer endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::customer::{CustomerListResponse, CustomerQuery, CustomerResponse, UpdateCustomer},
    AppState,
};

use super::AdminSession;

/// List customers with their first taxi
#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    params(CustomerQuery),
    responses(
        (status = 200, description = "Customers, newest first", body = CustomerListResponse),
        (status = 401, description = "No admin session", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<CustomerListResponse>> {
    let customers = state.services.customers.list(query.purchased).await?;
    Ok(Json(CustomerListResponse { customers }))
}

/// Mark a customer as purchased and/or edit the purchase note
#[utoipa::path(
    put,
    path = "/customers/{line_user_id}",
    tag = "customers",
    params(("line_user_id" = String, Path, description = "LINE user id")),
    request_body = UpdateCustomer,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 404, description = "Customer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(line_user_id): Path<String>,
    Json(data): Json<UpdateCustomer>,
) -> AppResult<Json<CustomerResponse>> {
    let customer = state
        .services
        .customers
        .update_purchase(&line_user_id, &data)
        .await?;
    Ok(Json(CustomerResponse { customer }))
}
