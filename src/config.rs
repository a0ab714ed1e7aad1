// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        AdPricingRepository, ClosingRepository, ConsultantRepository, DashboardRepository, LeadRepository,
        PartnerRepository, UserRepository, VisitRepository,
    },
    services::{
        auth::{AuthService, JwtKeys},
        closing_service::ClosingService,
        consultant_service::ConsultantService,
        dashboard_service::DashboardService,
        lead_service::LeadService,
        meta_ads_client::MetaAdsClient,
        meta_ads_service::MetaAdsService,
        partner_service::PartnerService,
        storage_service::{ObjectStorage, SupabaseStorage},
        visit_service::VisitService,
    },
};

// Configuração lida do ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expires_in_hours: i64,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub supabase: Option<SupabaseSettings>,
    pub meta_ads: Option<MetaAdsSettings>,
}

#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    pub url: String,
    pub service_key: String,
    pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct MetaAdsSettings {
    pub access_token: String,
    pub ad_account_id: String,
    pub api_version: String,
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(name) {
        Some(raw) => raw.parse().with_context(|| format!("{name} inválida: '{raw}'")),
        None => Ok(default),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = optional("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = optional("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let supabase = match (optional("SUPABASE_URL"), optional("SUPABASE_SERVICE_KEY")) {
            (Some(url), Some(service_key)) => Some(SupabaseSettings {
                url,
                service_key,
                bucket: optional("SUPABASE_STORAGE_BUCKET").unwrap_or_else(|| "contratos".to_string()),
            }),
            _ => None,
        };

        let meta_ads = match (optional("META_ACCESS_TOKEN"), optional("META_AD_ACCOUNT_ID")) {
            (Some(access_token), Some(ad_account_id)) => Some(MetaAdsSettings {
                access_token,
                ad_account_id,
                api_version: optional("META_API_VERSION").unwrap_or_else(|| "v18.0".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            jwt_expires_in_hours: parse_or("JWT_EXPIRES_IN_HOURS", 168)?,
            port: parse_or("PORT", 3001)?,
            cors_origin: optional("CORS_ORIGIN"),
            supabase,
            meta_ads,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Arc<Settings>,
    pub i18n_store: I18nStore,
    pub auth_service: AuthService,
    pub lead_service: LeadService,
    pub consultant_service: ConsultantService,
    pub partner_service: PartnerService,
    pub visit_service: VisitService,
    pub closing_service: ClosingService,
    pub meta_ads_service: MetaAdsService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(settings, db_pool))
    }

    // Monta o grafo de dependências sobre um pool já criado
    pub fn with_pool(settings: Settings, db_pool: PgPool) -> Self {
        let http = reqwest::Client::new();

        let user_repo = UserRepository::new();
        let consultant_repo = ConsultantRepository::new();
        let lead_repo = LeadRepository::new();

        let storage: Option<Arc<dyn ObjectStorage>> = match &settings.supabase {
            Some(s) => Some(Arc::new(SupabaseStorage::new(http.clone(), &s.url, &s.service_key, &s.bucket))),
            None => {
                tracing::warn!("Supabase Storage não configurado: upload de contratos desativado");
                None
            }
        };

        let meta_client = match &settings.meta_ads {
            Some(m) => Some(MetaAdsClient::new(http, &m.api_version, &m.access_token, &m.ad_account_id)),
            None => {
                tracing::warn!("Meta Ads não configurado: insights desativados");
                None
            }
        };

        let keys = JwtKeys::new(&settings.jwt_secret, settings.jwt_expires_in_hours);

        Self {
            auth_service: AuthService::new(db_pool.clone(), user_repo.clone(), consultant_repo.clone(), keys),
            lead_service: LeadService::new(lead_repo.clone()),
            consultant_service: ConsultantService::new(consultant_repo, user_repo),
            partner_service: PartnerService::new(PartnerRepository::new()),
            visit_service: VisitService::new(VisitRepository::new(), lead_repo.clone()),
            closing_service: ClosingService::new(ClosingRepository::new(), lead_repo, storage),
            meta_ads_service: MetaAdsService::new(AdPricingRepository::new(), meta_client),
            dashboard_service: DashboardService::new(DashboardRepository::new()),
            i18n_store: I18nStore::new(),
            settings: Arc::new(settings),
            db_pool,
        }
    }
}
