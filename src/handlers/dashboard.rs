// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermDashboardRead, RequirePermission},
    },
    models::dashboard::DashboardSummary,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo de leads, visitas, fechamentos e ranking", body = DashboardSummary)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _: RequirePermission<PermDashboardRead>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = app_state
        .dashboard_service
        .get_summary(&app_state.db_pool, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}
