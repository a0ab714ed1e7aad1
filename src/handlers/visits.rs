// src/handlers/visits.rs

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
        rbac::{PermVisitsRead, PermVisitsWrite, RequirePermission},
    },
    models::visit::{Visit, VisitFilter, VisitPayload, VisitStatusPayload, VisitView},
};

// GET /api/agendamentos
#[utoipa::path(
    get,
    path = "/api/agendamentos",
    tag = "Agendamentos",
    params(VisitFilter),
    responses((status = 200, description = "Lista de visitas", body = Vec<VisitView>)),
    security(("api_jwt" = []))
)]
pub async fn list_visits(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermVisitsRead>,
    Query(filter): Query<VisitFilter>,
) -> Result<Json<Vec<VisitView>>, ApiError> {
    let visits = app_state
        .visit_service
        .list(&app_state.db_pool, &user, filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(visits))
}

// GET /api/agendamentos/{id}
#[utoipa::path(
    get,
    path = "/api/agendamentos/{id}",
    tag = "Agendamentos",
    params(("id" = Uuid, Path, description = "ID da visita")),
    responses(
        (status = 200, description = "Visita", body = VisitView),
        (status = 404, description = "Visita não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_visit(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermVisitsRead>,
    Path(id): Path<Uuid>,
) -> Result<Json<VisitView>, ApiError> {
    let visit = app_state
        .visit_service
        .get(&app_state.db_pool, &user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(visit))
}

// POST /api/agendamentos
#[utoipa::path(
    post,
    path = "/api/agendamentos",
    tag = "Agendamentos",
    request_body = VisitPayload,
    responses(
        (status = 201, description = "Visita agendada (lead passa para 'agendado')", body = Visit),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_visit(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermVisitsWrite>,
    Json(payload): Json<VisitPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let visit = app_state
        .visit_service
        .create(&app_state.db_pool, &user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(visit)))
}

// PUT /api/agendamentos/{id}
#[utoipa::path(
    put,
    path = "/api/agendamentos/{id}",
    tag = "Agendamentos",
    request_body = VisitPayload,
    params(("id" = Uuid, Path, description = "ID da visita")),
    responses((status = 200, description = "Visita atualizada", body = Visit)),
    security(("api_jwt" = []))
)]
pub async fn update_visit(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermVisitsWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisitPayload>,
) -> Result<Json<Visit>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let visit = app_state
        .visit_service
        .update(&app_state.db_pool, &user, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(visit))
}

// PATCH /api/agendamentos/{id}/status
#[utoipa::path(
    patch,
    path = "/api/agendamentos/{id}/status",
    tag = "Agendamentos",
    request_body = VisitStatusPayload,
    params(("id" = Uuid, Path, description = "ID da visita")),
    responses((status = 200, description = "Status alterado", body = Visit)),
    security(("api_jwt" = []))
)]
pub async fn update_visit_status(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermVisitsWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisitStatusPayload>,
) -> Result<Json<Visit>, ApiError> {
    let visit = app_state
        .visit_service
        .update_status(&app_state.db_pool, &user, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(visit))
}

// DELETE /api/agendamentos/{id}
#[utoipa::path(
    delete,
    path = "/api/agendamentos/{id}",
    tag = "Agendamentos",
    params(("id" = Uuid, Path, description = "ID da visita")),
    responses((status = 204, description = "Visita removida")),
    security(("api_jwt" = []))
)]
pub async fn delete_visit(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermVisitsWrite>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .visit_service
        .delete(&app_state.db_pool, &user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
