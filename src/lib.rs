// src/lib.rs

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;
use crate::services::closing_service::MAX_CONTRACT_BYTES;

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT_LANGUAGE]);

    match origin.and_then(|o| o.parse::<HeaderValue>().ok()) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

/// Monta o router completo da API.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let public_routes = Router::new()
        .route("/health", get(handlers::auth::health))
        .route("/login", post(handlers::auth::login))
        .route("/leads/cadastro", post(handlers::leads::capture_lead));

    let lead_routes = Router::new()
        .route("/", get(handlers::leads::list_leads).post(handlers::leads::create_lead))
        .route(
            "/{id}",
            get(handlers::leads::get_lead)
                .put(handlers::leads::update_lead)
                .delete(handlers::leads::delete_lead),
        )
        .route("/{id}/status", patch(handlers::leads::update_lead_status));

    let consultant_routes = Router::new()
        .route(
            "/",
            get(handlers::consultants::list_consultants).post(handlers::consultants::create_consultant),
        )
        .route(
            "/{id}",
            get(handlers::consultants::get_consultant)
                .put(handlers::consultants::update_consultant)
                .delete(handlers::consultants::delete_consultant),
        );

    let partner_routes = Router::new()
        .route("/", get(handlers::partners::list_partners).post(handlers::partners::create_partner))
        .route(
            "/{id}",
            get(handlers::partners::get_partner)
                .put(handlers::partners::update_partner)
                .delete(handlers::partners::delete_partner),
        )
        .route("/{id}/status", patch(handlers::partners::update_partner_status));

    let visit_routes = Router::new()
        .route("/", get(handlers::visits::list_visits).post(handlers::visits::create_visit))
        .route(
            "/{id}",
            get(handlers::visits::get_visit)
                .put(handlers::visits::update_visit)
                .delete(handlers::visits::delete_visit),
        )
        .route("/{id}/status", patch(handlers::visits::update_visit_status));

    let closing_routes = Router::new()
        .route("/", get(handlers::closings::list_closings).post(handlers::closings::create_closing))
        .route(
            "/{id}",
            get(handlers::closings::get_closing)
                .put(handlers::closings::update_closing)
                .delete(handlers::closings::delete_closing),
        )
        .route(
            "/{id}/contrato",
            post(handlers::closings::upload_contract).get(handlers::closings::get_contract_link),
        )
        // Folga para o envelope do multipart
        .layer(DefaultBodyLimit::max(MAX_CONTRACT_BYTES + 64 * 1024));

    let meta_ads_routes = Router::new()
        .route("/precos", get(handlers::meta_ads::list_pricing).post(handlers::meta_ads::create_pricing))
        .route(
            "/precos/{id}",
            put(handlers::meta_ads::update_pricing).delete(handlers::meta_ads::delete_pricing),
        )
        .route("/insights", get(handlers::meta_ads::get_insights))
        .route("/regioes", get(handlers::meta_ads::get_regions))
        .route("/sincronizar", post(handlers::meta_ads::sync_pricing));

    // Tudo aqui exige Bearer token
    let protected_routes = Router::new()
        .route("/verify-token", get(handlers::auth::verify_token))
        .route("/dashboard", get(handlers::dashboard::get_summary))
        .nest("/clientes", lead_routes)
        .nest("/consultores", consultant_routes)
        .nest("/clinicas", partner_routes)
        .nest("/agendamentos", visit_routes)
        .nest("/fechamentos", closing_routes)
        .nest("/meta-ads", meta_ads_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let cors = cors_layer(app_state.settings.cors_origin.as_deref());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", public_routes.merge(protected_routes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
