// src/models/meta_ads.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::masks::validate_state;
use crate::models::{empty_string_as_none, trimmed};

// Preço por lead de cada praça, ligado a uma campanha do Meta Ads
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdPricing {
    pub id: Uuid,
    #[schema(example = "Campinas")]
    pub city: String,
    #[schema(example = "SP")]
    pub state: String,
    #[schema(example = "12.50")]
    pub price_per_lead: Decimal,
    #[schema(example = "120210000000000000")]
    pub campaign_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("invalid_price".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdPricingPayload {
    #[validate(length(min = 1, message = "required"))]
    #[serde(deserialize_with = "trimmed")]
    pub city: String,

    #[validate(custom(function = "validate_state"))]
    pub state: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub price_per_lead: Decimal,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub campaign_id: Option<String>,
}

// Resultado de uma campanha no período
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInsight {
    pub campaign_id: String,
    pub campaign_name: String,
    pub spend: Decimal,
    pub leads: i64,
    pub cost_per_lead: Option<Decimal>,
}

// Custo agregado por praça (cidade/UF)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionCost {
    pub city: String,
    pub state: String,
    pub campaign_ids: Vec<String>,
    pub spend: Decimal,
    pub leads: i64,
    pub cost_per_lead: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InsightsPeriod {
    #[param(value_type = Option<String>, format = Date)]
    pub since: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub until: Option<NaiveDate>,
}
