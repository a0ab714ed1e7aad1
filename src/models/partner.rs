// src/models/partner.rs
//
// Parceiros: imobiliárias ou clínicas, conforme o nicho.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::masks::validate_state;
use crate::models::{empty_string_as_none, trimmed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "partner_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    Ativa,
    Inativa,
    EmAnalise,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: Uuid,
    #[schema(example = "Clínica Sorriso")]
    pub name: String,
    #[schema(example = "Av. Paulista, 1000")]
    pub address: Option<String>,
    #[schema(example = "São Paulo")]
    pub city: String,
    #[schema(example = "SP")]
    pub state: String,
    #[schema(example = "odontologia")]
    pub niche: Option<String>,
    pub status: PartnerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartnerPayload {
    #[validate(length(min = 1, message = "required"))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub address: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    #[serde(deserialize_with = "trimmed")]
    pub city: String,

    #[validate(custom(function = "validate_state"))]
    pub state: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub niche: Option<String>,

    pub status: Option<PartnerStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PartnerStatusPayload {
    pub status: PartnerStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PartnerFilter {
    pub status: Option<PartnerStatus>,
    pub city: Option<String>,
}
