// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::health,
        handlers::auth::login,
        handlers::auth::verify_token,

        // --- Leads ---
        handlers::leads::capture_lead,
        handlers::leads::list_leads,
        handlers::leads::get_lead,
        handlers::leads::create_lead,
        handlers::leads::update_lead,
        handlers::leads::update_lead_status,
        handlers::leads::delete_lead,

        // --- Consultores ---
        handlers::consultants::list_consultants,
        handlers::consultants::get_consultant,
        handlers::consultants::create_consultant,
        handlers::consultants::update_consultant,
        handlers::consultants::delete_consultant,

        // --- Parceiros ---
        handlers::partners::list_partners,
        handlers::partners::get_partner,
        handlers::partners::create_partner,
        handlers::partners::update_partner,
        handlers::partners::update_partner_status,
        handlers::partners::delete_partner,

        // --- Agendamentos ---
        handlers::visits::list_visits,
        handlers::visits::get_visit,
        handlers::visits::create_visit,
        handlers::visits::update_visit,
        handlers::visits::update_visit_status,
        handlers::visits::delete_visit,

        // --- Fechamentos ---
        handlers::closings::list_closings,
        handlers::closings::get_closing,
        handlers::closings::create_closing,
        handlers::closings::update_closing,
        handlers::closings::delete_closing,
        handlers::closings::upload_contract,
        handlers::closings::get_contract_link,

        // --- Meta Ads ---
        handlers::meta_ads::list_pricing,
        handlers::meta_ads::create_pricing,
        handlers::meta_ads::update_pricing,
        handlers::meta_ads::delete_pricing,
        handlers::meta_ads::get_insights,
        handlers::meta_ads::get_regions,
        handlers::meta_ads::sync_pricing,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::LoginPayload,
            models::auth::SessionUser,
            models::auth::AuthResponse,
            models::auth::VerifyTokenResponse,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::LeadView,
            models::lead::LeadPayload,
            models::lead::PublicLeadPayload,
            models::lead::LeadStatusPayload,

            // --- Consultores ---
            models::consultant::Consultant,
            models::consultant::CreateConsultantPayload,
            models::consultant::UpdateConsultantPayload,

            // --- Parceiros ---
            models::partner::PartnerStatus,
            models::partner::Partner,
            models::partner::PartnerPayload,
            models::partner::PartnerStatusPayload,

            // --- Agendamentos ---
            models::visit::VisitStatus,
            models::visit::Visit,
            models::visit::VisitView,
            models::visit::VisitPayload,
            models::visit::VisitStatusPayload,

            // --- Fechamentos ---
            models::closing::Closing,
            models::closing::ClosingView,
            models::closing::ClosingPayload,
            models::closing::ContractLink,
            models::closing::ContractUpload,

            // --- Meta Ads ---
            models::meta_ads::AdPricing,
            models::meta_ads::AdPricingPayload,
            models::meta_ads::CampaignInsight,
            models::meta_ads::RegionCost,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::StatusCount,
            models::dashboard::ConsultantRankingEntry,
        )
    ),
    tags(
        (name = "Auth", description = "Login, verificação de token e health check"),
        (name = "Leads", description = "Clientes captados e carteira dos consultores"),
        (name = "Consultores", description = "Cadastro de consultores (apenas admin)"),
        (name = "Parceiros", description = "Imobiliárias e clínicas parceiras"),
        (name = "Agendamentos", description = "Visitas agendadas"),
        (name = "Fechamentos", description = "Negócios fechados, comissões e contratos"),
        (name = "Meta Ads", description = "Custo por lead por praça (apenas admin)"),
        (name = "Dashboard", description = "Indicadores gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme("api_jwt", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/login",
            "/api/clientes/{id}/status",
            "/api/fechamentos/{id}/contrato",
            "/api/meta-ads/sincronizar",
            "/api/dashboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "rota sem documentação: {path}");
        }
    }
}
