// src/handlers/leads.rs

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
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermLeadsDelete, PermLeadsRead, PermLeadsWrite, RequirePermission},
    },
    models::lead::{Lead, LeadFilter, LeadPayload, LeadStatusPayload, LeadView, PublicLeadPayload},
};

// POST /api/leads/cadastro
#[utoipa::path(
    post,
    path = "/api/leads/cadastro",
    tag = "Leads",
    request_body = PublicLeadPayload,
    responses(
        (status = 201, description = "Lead captado", body = Lead),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn capture_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<PublicLeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lead = app_state
        .lead_service
        .capture(&app_state.db_pool, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Leads",
    params(LeadFilter),
    responses((status = 200, description = "Lista de leads", body = Vec<LeadView>)),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermLeadsRead>,
    Query(filter): Query<LeadFilter>,
) -> Result<Json<Vec<LeadView>>, ApiError> {
    let leads = app_state
        .lead_service
        .list(&app_state.db_pool, &user, filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(leads))
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead", body = LeadView),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermLeadsRead>,
    Path(id): Path<Uuid>,
) -> Result<Json<LeadView>, ApiError> {
    let lead = app_state
        .lead_service
        .get(&app_state.db_pool, &user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(lead))
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Leads",
    request_body = LeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermLeadsWrite>,
    Json(payload): Json<LeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lead = app_state
        .lead_service
        .create(&app_state.db_pool, &user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Leads",
    request_body = LeadPayload,
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Lead de outro consultor")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermLeadsWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeadPayload>,
) -> Result<Json<Lead>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lead = app_state
        .lead_service
        .update(&app_state.db_pool, &user, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(lead))
}

// PATCH /api/clientes/{id}/status
#[utoipa::path(
    patch,
    path = "/api/clientes/{id}/status",
    tag = "Leads",
    request_body = LeadStatusPayload,
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses((status = 200, description = "Status alterado", body = Lead)),
    security(("api_jwt" = []))
)]
pub async fn update_lead_status(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermLeadsWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeadStatusPayload>,
) -> Result<Json<Lead>, ApiError> {
    let lead = app_state
        .lead_service
        .update_status(&app_state.db_pool, &user, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(lead))
}

// DELETE /api/clientes/{id}
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses((status = 204, description = "Lead removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermLeadsDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .lead_service
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
