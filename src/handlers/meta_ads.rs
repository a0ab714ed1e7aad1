// src/handlers/meta_ads.rs

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
        rbac::{PermAdsManage, RequirePermission},
    },
    models::meta_ads::{AdPricing, AdPricingPayload, CampaignInsight, InsightsPeriod, RegionCost},
};

// =============================================================================
//  PREÇOS POR PRAÇA
// =============================================================================

// GET /api/meta-ads/precos
#[utoipa::path(
    get,
    path = "/api/meta-ads/precos",
    tag = "Meta Ads",
    responses((status = 200, description = "Preços por cidade", body = Vec<AdPricing>)),
    security(("api_jwt" = []))
)]
pub async fn list_pricing(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermAdsManage>,
) -> Result<Json<Vec<AdPricing>>, ApiError> {
    let pricing = app_state
        .meta_ads_service
        .list_pricing(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(pricing))
}

// POST /api/meta-ads/precos
#[utoipa::path(
    post,
    path = "/api/meta-ads/precos",
    tag = "Meta Ads",
    request_body = AdPricingPayload,
    responses(
        (status = 201, description = "Preço criado", body = AdPricing),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_pricing(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermAdsManage>,
    Json(payload): Json<AdPricingPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let pricing = app_state
        .meta_ads_service
        .create_pricing(&app_state.db_pool, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(pricing)))
}

// PUT /api/meta-ads/precos/{id}
#[utoipa::path(
    put,
    path = "/api/meta-ads/precos/{id}",
    tag = "Meta Ads",
    request_body = AdPricingPayload,
    params(("id" = Uuid, Path, description = "ID do preço")),
    responses((status = 200, description = "Preço atualizado", body = AdPricing)),
    security(("api_jwt" = []))
)]
pub async fn update_pricing(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermAdsManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdPricingPayload>,
) -> Result<Json<AdPricing>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let pricing = app_state
        .meta_ads_service
        .update_pricing(&app_state.db_pool, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(pricing))
}

// DELETE /api/meta-ads/precos/{id}
#[utoipa::path(
    delete,
    path = "/api/meta-ads/precos/{id}",
    tag = "Meta Ads",
    params(("id" = Uuid, Path, description = "ID do preço")),
    responses((status = 204, description = "Preço removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_pricing(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermAdsManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .meta_ads_service
        .delete_pricing(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  GRAPH API
// =============================================================================

// GET /api/meta-ads/insights
#[utoipa::path(
    get,
    path = "/api/meta-ads/insights",
    tag = "Meta Ads",
    params(InsightsPeriod),
    responses(
        (status = 200, description = "Gasto e leads por campanha", body = Vec<CampaignInsight>),
        (status = 502, description = "Falha na Graph API"),
        (status = 503, description = "Integração não configurada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_insights(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermAdsManage>,
    Query(period): Query<InsightsPeriod>,
) -> Result<Json<Vec<CampaignInsight>>, ApiError> {
    let insights = app_state
        .meta_ads_service
        .insights(&period)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(insights))
}

// GET /api/meta-ads/regioes
#[utoipa::path(
    get,
    path = "/api/meta-ads/regioes",
    tag = "Meta Ads",
    params(InsightsPeriod),
    responses(
        (status = 200, description = "Custo por lead agregado por cidade/UF", body = Vec<RegionCost>),
        (status = 503, description = "Integração não configurada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_regions(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermAdsManage>,
    Query(period): Query<InsightsPeriod>,
) -> Result<Json<Vec<RegionCost>>, ApiError> {
    let regions = app_state
        .meta_ads_service
        .regions(&app_state.db_pool, &period)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(regions))
}

// POST /api/meta-ads/sincronizar
#[utoipa::path(
    post,
    path = "/api/meta-ads/sincronizar",
    tag = "Meta Ads",
    params(InsightsPeriod),
    responses(
        (status = 200, description = "Linhas de preço atualizadas", body = Vec<AdPricing>),
        (status = 503, description = "Integração não configurada")
    ),
    security(("api_jwt" = []))
)]
pub async fn sync_pricing(
    State(app_state): State<AppState>,
    locale: Locale,
    _: RequirePermission<PermAdsManage>,
    Query(period): Query<InsightsPeriod>,
) -> Result<Json<Vec<AdPricing>>, ApiError> {
    let updated = app_state
        .meta_ads_service
        .sync_pricing(&app_state.db_pool, &period)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(updated))
}
