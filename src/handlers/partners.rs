// src/handlers/partners.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermPartnersRead, PermPartnersWrite, RequirePermission},
    },
    models::partner::{Partner, PartnerFilter, PartnerPayload, PartnerStatusPayload},
};

// GET /api/clinicas
#[utoipa::path(
    get,
    path = "/api/clinicas",
    tag = "Parceiros",
    params(PartnerFilter),
    responses((status = 200, description = "Lista de parceiros", body = Vec<Partner>)),
    security(("api_jwt" = []))
)]
pub async fn list_partners(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermPartnersRead>,
    Query(filter): Query<PartnerFilter>,
) -> Result<Json<Vec<Partner>>, ApiError> {
    let partners = app_state
        .partner_service
        .list(&app_state.db_pool, filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(partners))
}

// GET /api/clinicas/{id}
#[utoipa::path(
    get,
    path = "/api/clinicas/{id}",
    tag = "Parceiros",
    params(("id" = Uuid, Path, description = "ID do parceiro")),
    responses(
        (status = 200, description = "Parceiro", body = Partner),
        (status = 404, description = "Parceiro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_partner(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermPartnersRead>,
    Path(id): Path<Uuid>,
) -> Result<Json<Partner>, ApiError> {
    let partner = app_state
        .partner_service
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(partner))
}

// POST /api/clinicas
#[utoipa::path(
    post,
    path = "/api/clinicas",
    tag = "Parceiros",
    request_body = PartnerPayload,
    responses(
        (status = 201, description = "Parceiro criado", body = Partner),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_partner(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermPartnersWrite>,
    Json(payload): Json<PartnerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let partner = app_state
        .partner_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(partner)))
}

// PUT /api/clinicas/{id}
#[utoipa::path(
    put,
    path = "/api/clinicas/{id}",
    tag = "Parceiros",
    request_body = PartnerPayload,
    params(("id" = Uuid, Path, description = "ID do parceiro")),
    responses((status = 200, description = "Parceiro atualizado", body = Partner)),
    security(("api_jwt" = []))
)]
pub async fn update_partner(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermPartnersWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartnerPayload>,
) -> Result<Json<Partner>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let partner = app_state
        .partner_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(partner))
}

// PATCH /api/clinicas/{id}/status
#[utoipa::path(
    patch,
    path = "/api/clinicas/{id}/status",
    tag = "Parceiros",
    request_body = PartnerStatusPayload,
    params(("id" = Uuid, Path, description = "ID do parceiro")),
    responses((status = 200, description = "Status alterado", body = Partner)),
    security(("api_jwt" = []))
)]
pub async fn update_partner_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermPartnersWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartnerStatusPayload>,
) -> Result<Json<Partner>, ApiError> {
    let partner = app_state
        .partner_service
        .update_status(&app_state.db_pool, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(partner))
}

// DELETE /api/clinicas/{id}
#[utoipa::path(
    delete,
    path = "/api/clinicas/{id}",
    tag = "Parceiros",
    params(("id" = Uuid, Path, description = "ID do parceiro")),
    responses((status = 204, description = "Parceiro removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_partner(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermPartnersWrite>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .partner_service
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
