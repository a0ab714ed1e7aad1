// src/models/closing.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::empty_string_as_none;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Closing {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub consultant_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    #[schema(example = "15000.00")]
    pub value: Decimal,
    #[schema(example = "75.00")]
    pub commission: Decimal,
    #[schema(value_type = String, format = Date, example = "2025-03-15")]
    pub closed_on: NaiveDate,
    // Caminho do PDF no bucket de contratos
    pub contract_path: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosingView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub closing: Closing,
    pub lead_name: String,
    pub consultant_name: Option<String>,
    pub partner_name: Option<String>,
}

fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("invalid_value".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosingPayload {
    pub lead_id: Uuid,
    pub consultant_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "15000.00")]
    pub value: Decimal,

    #[schema(value_type = Option<String>, format = Date, example = "2025-03-15")]
    pub closed_on: Option<NaiveDate>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractLink {
    pub url: String,
    #[schema(example = 3600)]
    pub expires_in: u64,
}

// Só para a documentação do upload (multipart)
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ContractUpload {
    #[schema(value_type = String, format = Binary)]
    pub contrato: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_or_negative_value_is_invalid() {
        for value in [json!(0), json!(-10.5)] {
            let payload: ClosingPayload = serde_json::from_value(json!({
                "leadId": Uuid::new_v4(),
                "value": value
            }))
            .unwrap();
            assert!(payload.validate().is_err());
        }
    }

    #[test]
    fn fractional_value_is_kept_exactly() {
        let payload: ClosingPayload = serde_json::from_value(json!({
            "leadId": Uuid::new_v4(),
            "value": 12500.5
        }))
        .unwrap();
        assert_eq!(payload.value, Decimal::new(125005, 1));
        assert!(payload.validate().is_ok());
    }
}
