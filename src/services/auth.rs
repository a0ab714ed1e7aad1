// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{ConsultantRepository, UserRepository},
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, Claims, Role, SessionUser},
};

// Chaves HS256 compartilhadas com o Supabase Auth (JWT secret do projeto)
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, session: &SessionUser) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: session.id,
            email: session.email.clone(),
            role: session.role.as_claim().to_string(),
            exp: (now + self.ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens do Supabase trazem aud = "authenticated"
        validation.validate_aud = false;

        let token_data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|_| AppError::InvalidToken)?;

        let role = Role::from_claim(&token_data.claims.role).ok_or(AppError::InvalidToken)?;

        Ok(AuthenticatedUser {
            id: token_data.claims.sub,
            email: token_data.claims.email,
            role,
        })
    }
}

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();

    // Executa a verificação em um thread separado
    let is_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

    Ok(is_valid)
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    user_repo: UserRepository,
    consultant_repo: ConsultantRepository,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(
        pool: PgPool,
        user_repo: UserRepository,
        consultant_repo: ConsultantRepository,
        keys: JwtKeys,
    ) -> Self {
        Self { pool, user_repo, consultant_repo, keys }
    }

    /// Login único: procura primeiro entre os administradores, depois entre os consultores ativos.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let email = email.trim();

        let (session, password_hash) =
            if let Some(user) = self.user_repo.find_by_email(&self.pool, email).await? {
                let session = SessionUser { id: user.id, name: user.name, email: user.email, role: Role::Admin };
                (session, user.password_hash)
            } else {
                let consultant = self
                    .consultant_repo
                    .find_by_email(&self.pool, email)
                    .await?
                    .filter(|c| c.active)
                    .ok_or(AppError::InvalidCredentials)?;
                let session = SessionUser {
                    id: consultant.id,
                    name: consultant.name,
                    email: consultant.email,
                    role: Role::Consultor,
                };
                (session, consultant.password_hash)
            };

        if !verify_password(password, &password_hash).await? {
            tracing::info!(email = %email, "tentativa de login com senha inválida");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.keys.issue(&session)?;
        tracing::info!(user_id = %session.id, role = ?session.role, "login efetuado");

        Ok(AuthResponse { token, user: session })
    }

    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        self.keys.verify(token)
    }

    /// Relê o perfil do dono do token (usado pelo verify-token).
    pub async fn load_session(&self, user: &AuthenticatedUser) -> Result<SessionUser, AppError> {
        match user.role {
            Role::Admin => {
                let admin = self
                    .user_repo
                    .find_by_id(&self.pool, user.id)
                    .await?
                    .ok_or(AppError::InvalidToken)?;
                Ok(SessionUser { id: admin.id, name: admin.name, email: admin.email, role: Role::Admin })
            }
            Role::Consultor => {
                let consultant = self
                    .consultant_repo
                    .find_by_id(&self.pool, user.id)
                    .await?
                    .filter(|c| c.active)
                    .ok_or(AppError::InvalidToken)?;
                Ok(SessionUser {
                    id: consultant.id,
                    name: consultant.name,
                    email: consultant.email,
                    role: Role::Consultor,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session(role: Role) -> SessionUser {
        SessionUser { id: Uuid::new_v4(), name: "Teste".into(), email: "teste@crm.com".into(), role }
    }

    #[test]
    fn issued_token_round_trips() {
        let keys = JwtKeys::new("segredo-de-teste", 1);
        let consultor = session(Role::Consultor);

        let token = keys.issue(&consultor).unwrap();
        let user = keys.verify(&token).unwrap();

        assert_eq!(user.id, consultor.id);
        assert_eq!(user.email, "teste@crm.com");
        assert_eq!(user.role, Role::Consultor);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = JwtKeys::new("outro-segredo", 1).issue(&session(Role::Admin)).unwrap();
        let result = JwtKeys::new("segredo-de-teste", 1).verify(&token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = JwtKeys::new("segredo-de-teste", -2);
        let token = keys.issue(&session(Role::Admin)).unwrap();
        assert!(matches!(keys.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn supabase_session_token_is_an_admin() {
        #[derive(serde::Serialize)]
        struct SupabaseClaims<'a> {
            sub: Uuid,
            email: &'a str,
            role: &'a str,
            aud: &'a str,
            exp: usize,
            iat: usize,
        }

        let now = Utc::now().timestamp() as usize;
        let claims = SupabaseClaims {
            sub: Uuid::new_v4(),
            email: "dono@crm.com",
            role: "authenticated",
            aud: "authenticated",
            exp: now + 3600,
            iat: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"segredo-de-teste"),
        )
        .unwrap();

        let user = JwtKeys::new("segredo-de-teste", 1).verify(&token).unwrap();
        assert_eq!(user.id, claims.sub);
        assert_eq!(user.role, Role::Admin);
    }

    fn token_with_role(role: Option<&str>) -> String {
        let now = Utc::now().timestamp() as usize;
        let mut claims = serde_json::json!({
            "sub": Uuid::new_v4(),
            "email": "x@crm.com",
            "exp": now + 3600,
            "iat": now,
        });
        if let Some(role) = role {
            claims["role"] = role.into();
        }
        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(b"segredo-de-teste")).unwrap()
    }

    #[test]
    fn unknown_roles_do_not_authenticate() {
        let keys = JwtKeys::new("segredo-de-teste", 1);
        for role in [Some("anon"), Some("service_role"), Some(""), Some("CONSULTOR"), None] {
            let result = keys.verify(&token_with_role(role));
            assert!(matches!(result, Err(AppError::InvalidToken)), "role {role:?} foi aceito");
        }
        assert_eq!(keys.verify(&token_with_role(Some("admin"))).unwrap().role, Role::Admin);
        assert_eq!(keys.verify(&token_with_role(Some("consultor"))).unwrap().role, Role::Consultor);
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hashed = hash_password("senha123").await.unwrap();
        assert!(verify_password("senha123", &hashed).await.unwrap());
        assert!(!verify_password("senha124", &hashed).await.unwrap());
    }
}
