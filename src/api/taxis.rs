//! Taxi management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        scan::Scan,
        session::SuccessResponse,
        taxi::{CreateTaxi, TaxiListResponse, TaxiQuery, TaxiResponse, UpdateTaxi},
    },
    AppState,
};

use super::AdminSession;

/// List taxis
#[utoipa::path(
    get,
    path = "/taxis",
    tag = "taxis",
    params(TaxiQuery),
    responses(
        (status = 200, description = "Taxis, newest first", body = TaxiListResponse),
        (status = 401, description = "No admin session", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_taxis(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<TaxiQuery>,
) -> AppResult<Json<TaxiListResponse>> {
    let taxis = state.services.taxis.list(query.active).await?;
    Ok(Json(TaxiListResponse { taxis }))
}

/// Create a taxi
#[utoipa::path(
    post,
    path = "/taxis",
    tag = "taxis",
    request_body = CreateTaxi,
    responses(
        (status = 201, description = "Taxi created", body = TaxiResponse),
        (status = 400, description = "Taxi code missing or malformed", body = crate::error::ErrorResponse),
        (status = 409, description = "Taxi code already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_taxi(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(data): Json<CreateTaxi>,
) -> AppResult<(StatusCode, Json<TaxiResponse>)> {
    let taxi = state.services.taxis.create(&data).await?;
    Ok((StatusCode::CREATED, Json(TaxiResponse { taxi })))
}

/// Get taxi by ID
#[utoipa::path(
    get,
    path = "/taxis/{id}",
    tag = "taxis",
    params(("id" = Uuid, Path, description = "Taxi ID")),
    responses(
        (status = 200, description = "Taxi details", body = TaxiResponse),
        (status = 404, description = "Taxi not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_taxi(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TaxiResponse>> {
    let taxi = state.services.taxis.get_by_id(id).await?;
    Ok(Json(TaxiResponse { taxi }))
}

/// Update a taxi
#[utoipa::path(
    put,
    path = "/taxis/{id}",
    tag = "taxis",
    params(("id" = Uuid, Path, description = "Taxi ID")),
    request_body = UpdateTaxi,
    responses(
        (status = 200, description = "Taxi updated", body = TaxiResponse),
        (status = 400, description = "Attempt to change the taxi code", body = crate::error::ErrorResponse),
        (status = 404, description = "Taxi not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_taxi(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTaxi>,
) -> AppResult<Json<TaxiResponse>> {
    let taxi = state.services.taxis.update(id, &data).await?;
    Ok(Json(TaxiResponse { taxi }))
}

/// Delete a taxi
#[utoipa::path(
    delete,
    path = "/taxis/{id}",
    tag = "taxis",
    params(("id" = Uuid, Path, description = "Taxi ID")),
    responses(
        (status = 200, description = "Taxi deleted", body = SuccessResponse),
        (status = 404, description = "Taxi not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_taxi(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse>> {
    state.services.taxis.delete(id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Recent scans of a taxi
#[utoipa::path(
    get,
    path = "/taxis/{id}/scans",
    tag = "taxis",
    params(("id" = Uuid, Path, description = "Taxi ID")),
    responses(
        (status = 200, description = "Latest scans, newest first", body = Vec<Scan>),
        (status = 404, description = "Taxi not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_taxi_scans(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Scan>>> {
    let scans = state.services.taxis.recent_scans(id).await?;
    Ok(Json(scans))
}
