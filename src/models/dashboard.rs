// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::lead::LeadStatus;

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: LeadStatus,
    pub total: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantRankingEntry {
    pub consultant_id: Uuid,
    pub consultant_name: String,
    pub closings: i64,
    pub closed_value: Decimal,
    pub commission: Decimal,
}

// Os cards e o ranking da tela inicial
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_leads: i64,
    pub leads_by_status: Vec<StatusCount>,
    pub visits_today: i64,
    pub upcoming_visits: i64,
    pub closings_count: i64,
    pub closed_value: Decimal,
    pub total_commission: Decimal,
    pub consultant_ranking: Vec<ConsultantRankingEntry>,
}
