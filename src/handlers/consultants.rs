// src/handlers/consultants.rs

use axum::{
    extract::{Path, State},
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
        rbac::{PermConsultantsManage, RequirePermission},
    },
    models::consultant::{Consultant, CreateConsultantPayload, UpdateConsultantPayload},
};

// GET /api/consultores
#[utoipa::path(
    get,
    path = "/api/consultores",
    tag = "Consultores",
    responses(
        (status = 200, description = "Lista de consultores", body = Vec<Consultant>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_consultants(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermConsultantsManage>,
) -> Result<Json<Vec<Consultant>>, ApiError> {
    let consultants = app_state
        .consultant_service
        .list(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(consultants))
}

// GET /api/consultores/{id}
#[utoipa::path(
    get,
    path = "/api/consultores/{id}",
    tag = "Consultores",
    params(("id" = Uuid, Path, description = "ID do consultor")),
    responses(
        (status = 200, description = "Consultor", body = Consultant),
        (status = 404, description = "Consultor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_consultant(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermConsultantsManage>,
    Path(id): Path<Uuid>,
) -> Result<Json<Consultant>, ApiError> {
    let consultant = app_state
        .consultant_service
        .get(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(consultant))
}

// POST /api/consultores
#[utoipa::path(
    post,
    path = "/api/consultores",
    tag = "Consultores",
    request_body = CreateConsultantPayload,
    responses(
        (status = 201, description = "Consultor criado", body = Consultant),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_consultant(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermConsultantsManage>,
    Json(payload): Json<CreateConsultantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let consultant = app_state
        .consultant_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(consultant)))
}

// PUT /api/consultores/{id}
#[utoipa::path(
    put,
    path = "/api/consultores/{id}",
    tag = "Consultores",
    request_body = UpdateConsultantPayload,
    params(("id" = Uuid, Path, description = "ID do consultor")),
    responses((status = 200, description = "Consultor atualizado", body = Consultant)),
    security(("api_jwt" = []))
)]
pub async fn update_consultant(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermConsultantsManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateConsultantPayload>,
) -> Result<Json<Consultant>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let consultant = app_state
        .consultant_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(consultant))
}

// DELETE /api/consultores/{id}
#[utoipa::path(
    delete,
    path = "/api/consultores/{id}",
    tag = "Consultores",
    params(("id" = Uuid, Path, description = "ID do consultor")),
    responses((status = 204, description = "Consultor removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_consultant(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermConsultantsManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .consultant_service
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
