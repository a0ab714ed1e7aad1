// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{AuthResponse, LoginPayload, VerifyTokenResponse},
};

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Auth",
    responses((status = 200, description = "Serviço no ar"))
)]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok", "timestamp": Utc::now() })))
}

// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "E-mail ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(response))
}

// GET /api/verify-token
#[utoipa::path(
    get,
    path = "/api/verify-token",
    tag = "Auth",
    responses(
        (status = 200, description = "Token válido", body = VerifyTokenResponse),
        (status = 401, description = "Token inválido, expirado ou usuário inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn verify_token(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<Json<VerifyTokenResponse>, ApiError> {
    let session = app_state
        .auth_service
        .load_session(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(VerifyTokenResponse { valid: true, user: session }))
}
