// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::common::i18n::{I18nStore, DEFAULT_STORE};
use crate::middleware::i18n::Locale;

// Erro interno da aplicação. Os handlers convertem para `ApiError`
// (já traduzido) antes de responder.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Registro duplicado: {0}")]
    Conflict(&'static str),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão '{0}' necessária")]
    Forbidden(String),

    #[error("Registro não encontrado: {0}")]
    NotFound(&'static str),

    #[error("Arquivo inválido: {0}")]
    InvalidFile(&'static str),

    #[error("Integração não configurada: {0}")]
    IntegrationNotConfigured(&'static str),

    #[error("Falha no serviço externo: {0}")]
    UpstreamError(String),

    #[error("Erro de HTTP: {0}")]
    HttpError(#[from] reqwest::Error),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro que vai para o cliente: status + mensagem traduzida (+ detalhes de validação)
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidFile(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::JwtError(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::IntegrationNotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UpstreamError(_) | AppError::HttpError(_) => StatusCode::BAD_GATEWAY,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Traduz o erro para o idioma da requisição.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status();

        let (key, details) = match &self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            let code = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string());
                            store.translate(lang, &code)
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ("error.validation", Some(json!(details)))
            }
            AppError::EmailAlreadyExists => ("error.email_exists", None),
            AppError::Conflict(entity) => ("error.duplicate", Some(json!({ "entity": entity }))),
            AppError::InvalidCredentials => ("error.invalid_credentials", None),
            AppError::InvalidToken | AppError::JwtError(_) => ("error.invalid_token", None),
            AppError::Forbidden(perm) => ("error.forbidden", Some(json!({ "permission": perm }))),
            AppError::NotFound("contract") => ("file.no_contract", None),
            AppError::NotFound(entity) => ("error.not_found", Some(json!({ "entity": entity }))),
            AppError::InvalidFile(code) => (*code, None),
            AppError::IntegrationNotConfigured(name) => {
                ("error.integration_off", Some(json!({ "integration": name })))
            }
            AppError::UpstreamError(_) | AppError::HttpError(_) => ("error.upstream", None),
            _ => ("error.internal", None),
        };

        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        ApiError {
            status,
            error: store.translate(lang, key),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Usado pelo middleware, que não tem acesso ao idioma da requisição.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &DEFAULT_STORE).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    fn locale(lang: &str) -> Locale {
        Locale(lang.to_string())
    }

    #[test]
    fn row_not_found_is_a_server_error() {
        let err = AppError::DatabaseError(sqlx::Error::RowNotFound);
        let api = err.to_api_error(&locale("pt"), &DEFAULT_STORE);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "Ocorreu um erro inesperado.");
    }

    #[test]
    fn validation_details_are_translated_per_field() {
        let mut errors = ValidationErrors::new();
        let mut phone = ValidationError::new("phone");
        phone.message = Some("invalid_phone".into());
        errors.add("phone", phone);

        let api = AppError::ValidationError(errors).to_api_error(&locale("en"), &DEFAULT_STORE);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("details");
        assert_eq!(
            details["phone"][0],
            "Phone must have 10 or 11 digits including area code."
        );
    }

    #[test]
    fn auth_and_role_errors_map_to_4xx() {
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Forbidden("consultants:write".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::NotFound("lead").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("ad_pricing").status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::IntegrationNotConfigured("meta_ads").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
