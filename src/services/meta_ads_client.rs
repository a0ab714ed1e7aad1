// src/services/meta_ads_client.rs
//
// Cliente da Graph API do Meta (insights por campanha da conta de anúncios).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::{common::error::AppError, models::meta_ads::CampaignInsight};

const GRAPH_BASE_URL: &str = "https://graph.facebook.com";
const MAX_PAGES: usize = 20;

// Ações contadas como lead, em ordem de preferência
const LEAD_ACTION_TYPES: [&str; 3] = ["lead", "onsite_conversion.lead_grouped", "offsite_conversion.fb_pixel_lead"];

#[derive(Debug, Deserialize)]
struct InsightsPage {
    #[serde(default)]
    data: Vec<RawInsight>,
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInsight {
    campaign_id: String,
    #[serde(default)]
    campaign_name: String,
    // A Graph API manda números como string
    #[serde(default)]
    spend: Option<String>,
    #[serde(default)]
    actions: Vec<RawAction>,
}

#[derive(Debug, Deserialize)]
struct RawAction {
    action_type: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

impl RawInsight {
    fn into_insight(self) -> CampaignInsight {
        let spend = self
            .spend
            .as_deref()
            .and_then(|s| s.parse::<Decimal>().ok())
            .unwrap_or_default();

        let leads = LEAD_ACTION_TYPES
            .iter()
            .find_map(|kind| self.actions.iter().find(|a| a.action_type == *kind))
            .and_then(|a| a.value.parse::<i64>().ok())
            .unwrap_or(0);

        CampaignInsight {
            cost_per_lead: cost_per_lead(spend, leads),
            campaign_id: self.campaign_id,
            campaign_name: self.campaign_name,
            spend,
            leads,
        }
    }
}

pub fn cost_per_lead(spend: Decimal, leads: i64) -> Option<Decimal> {
    (leads > 0).then(|| (spend / Decimal::from(leads)).round_dp(2))
}

#[derive(Clone)]
pub struct MetaAdsClient {
    http: reqwest::Client,
    base_url: String,
    api_version: String,
    access_token: String,
    ad_account_id: String,
}

impl MetaAdsClient {
    pub fn new(http: reqwest::Client, api_version: &str, access_token: &str, ad_account_id: &str) -> Self {
        Self::with_base_url(http, GRAPH_BASE_URL, api_version, access_token, ad_account_id)
    }

    pub fn with_base_url(
        http: reqwest::Client,
        base_url: &str,
        api_version: &str,
        access_token: &str,
        ad_account_id: &str,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
            access_token: access_token.to_string(),
            // Aceita o id com ou sem o prefixo "act_"
            ad_account_id: ad_account_id.trim_start_matches("act_").to_string(),
        }
    }

    /// Insights de todas as campanhas no período, seguindo a paginação.
    pub async fn campaign_insights(&self, since: NaiveDate, until: NaiveDate) -> Result<Vec<CampaignInsight>, AppError> {
        let url = format!("{}/{}/act_{}/insights", self.base_url, self.api_version, self.ad_account_id);
        let time_range = json!({
            "since": since.format("%Y-%m-%d").to_string(),
            "until": until.format("%Y-%m-%d").to_string(),
        })
        .to_string();

        // O token vai no header: a URL aparece nas mensagens de erro do reqwest
        let first = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("level", "campaign"),
                ("fields", "campaign_id,campaign_name,spend,actions"),
                ("time_range", time_range.as_str()),
                ("limit", "500"),
            ])
            .send()
            .await
            .map_err(without_url)?;

        let mut page = Self::read_page(first).await?;
        let mut insights: Vec<CampaignInsight> = Vec::new();
        let mut fetched = 1;

        loop {
            insights.extend(page.data.into_iter().map(RawInsight::into_insight));

            let Some(next) = page.paging.and_then(|p| p.next) else {
                break;
            };
            if fetched == MAX_PAGES {
                tracing::warn!(pages = fetched, campaigns = insights.len(), "insights truncados no limite de páginas");
                break;
            }

            let response = self
                .http
                .get(next)
                .bearer_auth(&self.access_token)
                .send()
                .await
                .map_err(without_url)?;
            page = Self::read_page(response).await?;
            fetched += 1;
        }

        tracing::debug!(campaigns = insights.len(), %since, %until, "insights do Meta Ads carregados");
        Ok(insights)
    }

    async fn read_page(response: reqwest::Response) -> Result<InsightsPage, AppError> {
        if response.status().is_success() {
            return response.json::<InsightsPage>().await.map_err(without_url);
        }

        let status = response.status();
        let message = match response.json::<GraphErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("Graph API respondeu {status}"),
        };
        tracing::warn!(%status, %message, "falha na Graph API");
        Err(AppError::UpstreamError(message))
    }
}

// As URLs de paginação da Graph API trazem o access_token
fn without_url(e: reqwest::Error) -> AppError {
    AppError::HttpError(e.without_url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::Value;
    use std::collections::HashMap;
    use std::str::FromStr;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn raw(value: Value) -> RawInsight {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn lead_count_prefers_plain_lead_action() {
        let insight = raw(json!({
            "campaign_id": "1",
            "campaign_name": "Campinas",
            "spend": "100.50",
            "actions": [
                { "action_type": "link_click", "value": "80" },
                { "action_type": "offsite_conversion.fb_pixel_lead", "value": "9" },
                { "action_type": "lead", "value": "10" }
            ]
        }))
        .into_insight();

        assert_eq!(insight.leads, 10);
        assert_eq!(insight.spend, Decimal::from_str("100.50").unwrap());
        assert_eq!(insight.cost_per_lead, Some(Decimal::from_str("10.05").unwrap()));
    }

    #[test]
    fn campaign_without_leads_has_no_cost() {
        let insight = raw(json!({ "campaign_id": "2", "spend": "30" })).into_insight();
        assert_eq!(insight.leads, 0);
        assert_eq!(insight.cost_per_lead, None);
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer token")
    }

    async fn insights_mock(
        State(base): State<String>,
        headers: HeaderMap,
        Query(q): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        if !authorized(&headers) || q.contains_key("access_token") {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": { "message": "Invalid OAuth access token.", "code": 190 } })),
            );
        }
        if q.get("after").is_some() {
            return (
                StatusCode::OK,
                Json(json!({ "data": [{ "campaign_id": "2", "campaign_name": "B", "spend": "20" }] })),
            );
        }
        assert_eq!(q.get("level").map(String::as_str), Some("campaign"));
        (
            StatusCode::OK,
            Json(json!({
                "data": [{
                    "campaign_id": "1",
                    "campaign_name": "A",
                    "spend": "50",
                    "actions": [{ "action_type": "lead", "value": "5" }]
                }],
                "paging": { "next": format!("{base}/v18.0/act_123/insights?after=abc") }
            })),
        )
    }

    // Sempre aponta para mais uma página
    async fn endless_mock(
        State((base, hits)): State<(String, Arc<AtomicUsize>)>,
        Query(q): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        hits.fetch_add(1, Ordering::SeqCst);
        let page: usize = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
        Json(json!({
            "data": [{ "campaign_id": page.to_string(), "spend": "1" }],
            "paging": { "next": format!("{base}/v18.0/act_999/insights?page={}", page + 1) }
        }))
    }

    async fn spawn_mock() -> (String, Arc<AtomicUsize>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));

        let endless = Router::new()
            .route("/v18.0/act_999/insights", get(endless_mock))
            .with_state((base.clone(), hits.clone()));
        let app = Router::new()
            .route("/v18.0/act_123/insights", get(insights_mock))
            .with_state(base.clone())
            .merge(endless);

        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (base, hits)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[tokio::test]
    async fn follows_pagination() {
        let (base, _) = spawn_mock().await;
        let client = MetaAdsClient::with_base_url(reqwest::Client::new(), &base, "v18.0", "token", "act_123");

        let insights = client.campaign_insights(day(), day()).await.unwrap();
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].leads, 5);
        assert_eq!(insights[1].campaign_id, "2");
    }

    #[tokio::test]
    async fn pagination_stops_at_the_page_limit() {
        let (base, hits) = spawn_mock().await;
        let client = MetaAdsClient::with_base_url(reqwest::Client::new(), &base, "v18.0", "token", "999");

        let insights = client.campaign_insights(day(), day()).await.unwrap();
        assert_eq!(insights.len(), MAX_PAGES);
        assert_eq!(hits.load(Ordering::SeqCst), MAX_PAGES);
    }

    #[tokio::test]
    async fn graph_error_becomes_upstream_error() {
        let (base, _) = spawn_mock().await;
        let client = MetaAdsClient::with_base_url(reqwest::Client::new(), &base, "v18.0", "expired", "123");

        let err = client.campaign_insights(day(), day()).await.unwrap_err();
        match err {
            AppError::UpstreamError(message) => assert_eq!(message, "Invalid OAuth access token."),
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_error_does_not_expose_the_token() {
        // Porta 1: conexão recusada
        let client =
            MetaAdsClient::with_base_url(reqwest::Client::new(), "http://127.0.0.1:1", "v18.0", "SUPER-SECRET-TOKEN", "123");

        let err = client.campaign_insights(day(), day()).await.unwrap_err();
        assert!(matches!(err, AppError::HttpError(_)));

        let logged = err.to_string();
        assert!(!logged.contains("SUPER-SECRET-TOKEN"), "token no erro: {logged}");
        assert!(!logged.contains("127.0.0.1:1"), "url no erro: {logged}");
    }
}
