// src/models/visit.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::empty_string_as_none;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "visit_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Agendado,
    Confirmado,
    Realizado,
    NaoCompareceu,
    Cancelado,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub consultant_id: Option<Uuid>,
    #[schema(value_type = String, format = Date, example = "2025-03-10")]
    pub visit_date: NaiveDate,
    #[schema(value_type = String, example = "14:30:00")]
    pub visit_time: NaiveTime,
    pub status: VisitStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub visit: Visit,
    pub lead_name: String,
    pub lead_phone: String,
    pub partner_name: Option<String>,
    pub consultant_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitPayload {
    pub lead_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub consultant_id: Option<Uuid>,

    #[schema(value_type = String, format = Date, example = "2025-03-10")]
    pub visit_date: NaiveDate,

    #[schema(value_type = String, example = "14:30")]
    #[serde(deserialize_with = "visit_time_format::deserialize")]
    pub visit_time: NaiveTime,

    pub status: Option<VisitStatus>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VisitStatusPayload {
    pub status: VisitStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VisitFilter {
    pub status: Option<VisitStatus>,
    /// Dia das visitas (YYYY-MM-DD)
    #[param(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
}

// O input type="time" manda "HH:MM"; aceitamos também "HH:MM:SS".
mod visit_time_format {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn time_accepts_hours_and_minutes() {
        let payload: VisitPayload = serde_json::from_value(json!({
            "leadId": Uuid::new_v4(),
            "visitDate": "2025-03-10",
            "visitTime": "14:30"
        }))
        .unwrap();
        assert_eq!(payload.visit_time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());

        let payload: VisitPayload = serde_json::from_value(json!({
            "leadId": Uuid::new_v4(),
            "visitDate": "2025-03-10",
            "visitTime": "09:05:30"
        }))
        .unwrap();
        assert_eq!(payload.visit_time, NaiveTime::from_hms_opt(9, 5, 30).unwrap());
    }

    #[test]
    fn invalid_time_is_rejected() {
        let result = serde_json::from_value::<VisitPayload>(json!({
            "leadId": Uuid::new_v4(),
            "visitDate": "2025-03-10",
            "visitTime": "25:99"
        }));
        assert!(result.is_err());
    }
}
