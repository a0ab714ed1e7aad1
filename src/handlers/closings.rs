// src/handlers/closings.rs

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
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
        rbac::{PermClosingsRead, PermClosingsWrite, RequirePermission},
    },
    models::closing::{Closing, ClosingPayload, ClosingView, ContractLink, ContractUpload},
};

const CONTRACT_FIELD: &str = "contrato";

// GET /api/fechamentos
#[utoipa::path(
    get,
    path = "/api/fechamentos",
    tag = "Fechamentos",
    responses((status = 200, description = "Lista de fechamentos", body = Vec<ClosingView>)),
    security(("api_jwt" = []))
)]
pub async fn list_closings(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermClosingsRead>,
) -> Result<Json<Vec<ClosingView>>, ApiError> {
    let closings = app_state
        .closing_service
        .list(&app_state.db_pool, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(closings))
}

// GET /api/fechamentos/{id}
#[utoipa::path(
    get,
    path = "/api/fechamentos/{id}",
    tag = "Fechamentos",
    params(("id" = Uuid, Path, description = "ID do fechamento")),
    responses(
        (status = 200, description = "Fechamento", body = ClosingView),
        (status = 404, description = "Fechamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_closing(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermClosingsRead>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClosingView>, ApiError> {
    let closing = app_state
        .closing_service
        .get(&app_state.db_pool, &user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(closing))
}

// POST /api/fechamentos
#[utoipa::path(
    post,
    path = "/api/fechamentos",
    tag = "Fechamentos",
    request_body = ClosingPayload,
    responses(
        (status = 201, description = "Fechamento registrado (lead passa para 'fechado')", body = Closing),
        (status = 400, description = "Valor inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_closing(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermClosingsWrite>,
    Json(payload): Json<ClosingPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let closing = app_state
        .closing_service
        .create(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(closing)))
}

// PUT /api/fechamentos/{id}
#[utoipa::path(
    put,
    path = "/api/fechamentos/{id}",
    tag = "Fechamentos",
    request_body = ClosingPayload,
    params(("id" = Uuid, Path, description = "ID do fechamento")),
    responses((status = 200, description = "Fechamento atualizado (comissão recalculada)", body = Closing)),
    security(("api_jwt" = []))
)]
pub async fn update_closing(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermClosingsWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClosingPayload>,
) -> Result<Json<Closing>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let closing = app_state
        .closing_service
        .update(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(closing))
}

// DELETE /api/fechamentos/{id}
#[utoipa::path(
    delete,
    path = "/api/fechamentos/{id}",
    tag = "Fechamentos",
    params(("id" = Uuid, Path, description = "ID do fechamento")),
    responses((status = 204, description = "Fechamento removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_closing(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermClosingsWrite>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .closing_service
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::InvalidFile("file.too_large")
    } else {
        tracing::debug!("multipart inválido: {}", e);
        AppError::InvalidFile("file.missing")
    }
}

// Lê o campo "contrato" do multipart; os demais campos são ignorados
async fn read_contract(multipart: &mut Multipart) -> Result<(Vec<u8>, Option<String>), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(CONTRACT_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok((bytes.to_vec(), content_type));
    }
    Err(AppError::InvalidFile("file.missing"))
}

// POST /api/fechamentos/{id}/contrato
#[utoipa::path(
    post,
    path = "/api/fechamentos/{id}/contrato",
    tag = "Fechamentos",
    params(("id" = Uuid, Path, description = "ID do fechamento")),
    request_body(
        content = ContractUpload,
        content_type = "multipart/form-data",
        description = "Campo 'contrato' com o PDF (até 10 MB)"
    ),
    responses(
        (status = 200, description = "Contrato anexado", body = Closing),
        (status = 400, description = "Arquivo ausente, não é PDF ou maior que 10 MB"),
        (status = 503, description = "Storage não configurado")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_contract(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermClosingsWrite>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Closing>, ApiError> {
    let (bytes, content_type) = read_contract(&mut multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let closing = app_state
        .closing_service
        .upload_contract(&app_state.db_pool, id, bytes, content_type.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(closing))
}

// GET /api/fechamentos/{id}/contrato
#[utoipa::path(
    get,
    path = "/api/fechamentos/{id}/contrato",
    tag = "Fechamentos",
    params(("id" = Uuid, Path, description = "ID do fechamento")),
    responses(
        (status = 200, description = "URL assinada para download", body = ContractLink),
        (status = 404, description = "Fechamento sem contrato")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_contract_link(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermClosingsRead>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContractLink>, ApiError> {
    let link = app_state
        .closing_service
        .contract_link(&app_state.db_pool, &user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(link))
}
