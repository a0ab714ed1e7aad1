// src/services/meta_ads_service.rs

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::{error::AppError, masks::normalize_state},
    db::AdPricingRepository,
    models::meta_ads::{AdPricing, AdPricingPayload, CampaignInsight, InsightsPeriod, RegionCost},
    services::meta_ads_client::{cost_per_lead, MetaAdsClient},
};

const DEFAULT_PERIOD_DAYS: u64 = 30;

/// Sem datas, usa os últimos 30 dias (contando hoje).
pub fn resolve_period(period: &InsightsPeriod, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), AppError> {
    let until = period.until.unwrap_or(today);
    let since = period
        .since
        .unwrap_or_else(|| until.checked_sub_days(Days::new(DEFAULT_PERIOD_DAYS - 1)).unwrap_or(until));

    if since > until {
        let mut err = ValidationError::new("range");
        err.message = Some("invalid_period".into());
        let mut errors = ValidationErrors::new();
        errors.add("since", err);
        return Err(AppError::ValidationError(errors));
    }
    Ok((since, until))
}

/// Soma gasto e leads por praça, usando o `campaign_id` das linhas de preço.
/// Praças sem campanha ficam de fora.
pub fn summarize_by_region(pricing: &[AdPricing], insights: &[CampaignInsight]) -> Vec<RegionCost> {
    let by_campaign: HashMap<&str, &CampaignInsight> =
        insights.iter().map(|i| (i.campaign_id.as_str(), i)).collect();

    let mut regions: BTreeMap<(String, String), RegionCost> = BTreeMap::new();
    for row in pricing {
        let Some(campaign_id) = row.campaign_id.as_deref() else {
            continue;
        };

        let region = regions
            .entry((row.state.clone(), row.city.clone()))
            .or_insert_with(|| RegionCost {
                city: row.city.clone(),
                state: row.state.clone(),
                campaign_ids: Vec::new(),
                spend: Decimal::ZERO,
                leads: 0,
                cost_per_lead: None,
            });

        if region.campaign_ids.iter().any(|c| c == campaign_id) {
            continue;
        }
        region.campaign_ids.push(campaign_id.to_string());

        if let Some(insight) = by_campaign.get(campaign_id) {
            region.spend += insight.spend;
            region.leads += insight.leads;
        }
    }

    regions
        .into_values()
        .map(|mut region| {
            region.cost_per_lead = cost_per_lead(region.spend, region.leads);
            region
        })
        .collect()
}

/// Novos preços por linha: só campanhas com pelo menos um lead no período.
pub fn pricing_updates(pricing: &[AdPricing], insights: &[CampaignInsight]) -> Vec<(Uuid, Decimal)> {
    pricing
        .iter()
        .filter_map(|row| {
            let campaign_id = row.campaign_id.as_deref()?;
            let insight = insights.iter().find(|i| i.campaign_id == campaign_id)?;
            let price = insight.cost_per_lead?;
            (price != row.price_per_lead).then_some((row.id, price))
        })
        .collect()
}

#[derive(Clone)]
pub struct MetaAdsService {
    repo: AdPricingRepository,
    client: Option<MetaAdsClient>,
}

impl MetaAdsService {
    pub fn new(repo: AdPricingRepository, client: Option<MetaAdsClient>) -> Self {
        Self { repo, client }
    }

    pub async fn list_pricing<'e, E>(&self, executor: E) -> Result<Vec<AdPricing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor).await
    }

    pub async fn create_pricing<'e, E>(&self, executor: E, mut payload: AdPricingPayload) -> Result<AdPricing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        normalize_pricing(&mut payload);
        self.repo.create(executor, &payload).await
    }

    pub async fn update_pricing<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        mut payload: AdPricingPayload,
    ) -> Result<AdPricing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        normalize_pricing(&mut payload);
        self.repo.update(executor, id, &payload).await
    }

    pub async fn delete_pricing<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete(executor, id).await?;
        Ok(())
    }

    pub async fn insights(&self, period: &InsightsPeriod) -> Result<Vec<CampaignInsight>, AppError> {
        let client = self.client()?;
        let (since, until) = resolve_period(period, Utc::now().date_naive())?;
        client.campaign_insights(since, until).await
    }

    pub async fn regions<'e, E>(&self, executor: E, period: &InsightsPeriod) -> Result<Vec<RegionCost>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let insights = self.insights(period).await?;
        let pricing = self.repo.list(executor).await?;
        Ok(summarize_by_region(&pricing, &insights))
    }

    /// Grava o custo por lead do período nas linhas de preço.
    pub async fn sync_pricing<'e, E>(&self, executor: E, period: &InsightsPeriod) -> Result<Vec<AdPricing>, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let insights = self.insights(period).await?;

        let mut tx = executor.begin().await?;
        let pricing = self.repo.list(&mut *tx).await?;

        let mut updated = Vec::new();
        for (id, price) in pricing_updates(&pricing, &insights) {
            updated.push(self.repo.update_price(&mut *tx, id, price).await?);
        }
        tx.commit().await?;

        tracing::info!(updated = updated.len(), "preços sincronizados com o Meta Ads");
        Ok(updated)
    }

    fn client(&self) -> Result<&MetaAdsClient, AppError> {
        self.client.as_ref().ok_or(AppError::IntegrationNotConfigured("meta_ads"))
    }
}

fn normalize_pricing(payload: &mut AdPricingPayload) {
    payload.city = payload.city.trim().to_string();
    if let Some(uf) = normalize_state(&payload.state) {
        payload.state = uf;
    }
}
