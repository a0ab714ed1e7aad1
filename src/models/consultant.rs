// src/models/consultant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::masks::validate_phone;
use crate::models::{empty_string_as_none, trimmed};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    pub id: Uuid,
    #[schema(example = "Carlos Souza")]
    pub name: String,
    #[schema(example = "(21) 99876-5432")]
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,
    // Chave PIX para pagamento de comissão (texto puro)
    #[schema(example = "carlos@pix.com.br")]
    pub pix_key: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultantPayload {
    #[validate(length(min = 1, message = "required"))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub pix_key: Option<String>,

    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConsultantPayload {
    #[validate(length(min = 1, message = "required"))]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(email(message = "invalid_email"))]
    pub email: String,

    // Em branco mantém a senha atual
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub pix_key: Option<String>,

    pub active: Option<bool>,
}
