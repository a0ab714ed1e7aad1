// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Consultor,
}

impl Role {
    // Tokens emitidos pelo Supabase Auth chegam com role "authenticated":
    // esses usuários são os administradores do painel. Qualquer outro valor
    // ("anon", "service_role", vazio) não abre sessão.
    pub fn from_claim(value: &str) -> Option<Self> {
        match value {
            "admin" | "authenticated" => Some(Role::Admin),
            "consultor" => Some(Role::Consultor),
            _ => None,
        }
    }

    pub fn as_claim(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Consultor => "consultor",
        }
    }
}

// Administrador do painel (tabela users)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "admin@empresa.com.br")]
    pub email: String,
    #[validate(length(min = 1, message = "required"))]
    pub password: String,
}

// Usuário da sessão, seja admin ou consultor
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub user: SessionUser,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}
