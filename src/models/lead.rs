// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::masks::{validate_cpf, validate_phone, validate_state};
use crate::models::{empty_string_as_none, trimmed};

// Mapeia o CREATE TYPE lead_status do banco.
// Não há regra de transição: qualquer status pode vir depois de qualquer outro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Novo,
    EmContato,
    Agendado,
    Compareceu,
    Fechado,
    NaoFechou,
    SemInteresse,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[schema(example = "(11) 91234-5678")]
    pub phone: String,
    #[schema(example = "123.456.789-01")]
    pub cpf: Option<String>,
    #[schema(example = "Lente de contato dental")]
    pub service_type: Option<String>,
    pub city: Option<String>,
    #[schema(example = "SP")]
    pub state: Option<String>,
    pub status: LeadStatus,
    pub consultant_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Lead com os nomes do consultor e do parceiro (JOIN)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lead: Lead,
    pub consultant_name: Option<String>,
    pub partner_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    #[validate(length(min = 1, message = "required"))]
    #[serde(deserialize_with = "trimmed")]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[validate(custom(function = "validate_phone"))]
    #[schema(example = "11912345678")]
    pub phone: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(custom(function = "validate_cpf"))]
    #[schema(example = "12345678901")]
    pub cpf: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub service_type: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub city: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(custom(function = "validate_state"))]
    pub state: Option<String>,

    pub status: Option<LeadStatus>,
    pub consultant_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
}

// Formulário público de captação (sem login)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub service_type: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub city: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(custom(function = "validate_state"))]
    pub state: Option<String>,
}

impl From<PublicLeadPayload> for LeadPayload {
    fn from(p: PublicLeadPayload) -> Self {
        LeadPayload {
            name: p.name,
            phone: p.phone,
            cpf: p.cpf,
            service_type: p.service_type,
            city: p.city,
            state: p.state,
            status: Some(LeadStatus::Novo),
            consultant_id: None,
            partner_id: None,
            notes: None,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeadStatusPayload {
    pub status: LeadStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub consultant_id: Option<Uuid>,
    /// Busca por nome, telefone ou CPF
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_optional_fields_become_none() {
        let payload: LeadPayload = serde_json::from_value(json!({
            "name": "João",
            "phone": "11912345678",
            "cpf": "",
            "state": "  "
        }))
        .unwrap();

        assert!(payload.cpf.is_none());
        assert!(payload.state.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn blank_name_fails_validation() {
        let payload: LeadPayload = serde_json::from_value(json!({
            "name": "   ",
            "phone": "11912345678"
        }))
        .unwrap();

        assert!(payload.name.is_empty());
        assert!(payload.validate().unwrap_err().field_errors().contains_key("name"));

        let public: PublicLeadPayload =
            serde_json::from_value(json!({ "name": "\t\n", "phone": "11912345678" })).unwrap();
        assert!(public.validate().is_err());
    }

    #[test]
    fn bad_phone_and_cpf_fail_validation() {
        let payload: LeadPayload = serde_json::from_value(json!({
            "name": "João",
            "phone": "1234",
            "cpf": "111"
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("cpf"));
    }

    #[test]
    fn status_uses_snake_case_on_the_wire() {
        let status: LeadStatus = serde_json::from_value(json!("nao_fechou")).unwrap();
        assert_eq!(status, LeadStatus::NaoFechou);
        assert_eq!(serde_json::to_value(LeadStatus::EmContato).unwrap(), json!("em_contato"));
    }

    #[test]
    fn public_form_always_starts_as_new() {
        let public = PublicLeadPayload {
            name: "Ana".into(),
            phone: "11912345678".into(),
            cpf: None,
            service_type: Some("Implante".into()),
            city: None,
            state: None,
        };
        let lead: LeadPayload = public.into();
        assert_eq!(lead.status, Some(LeadStatus::Novo));
        assert!(lead.consultant_id.is_none());
    }
}
