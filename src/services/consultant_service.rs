// src/services/consultant_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, masks::format_phone},
    db::{consultant_repo::ConsultantRecord, ConsultantRepository, UserRepository},
    models::consultant::{Consultant, CreateConsultantPayload, UpdateConsultantPayload},
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct ConsultantService {
    repo: ConsultantRepository,
    user_repo: UserRepository,
}

impl ConsultantService {
    pub fn new(repo: ConsultantRepository, user_repo: UserRepository) -> Self {
        Self { repo, user_repo }
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Consultant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor).await
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Consultant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.find_by_id(executor, id).await?.ok_or(AppError::NotFound("consultant"))
    }

    pub async fn create<'e, E>(&self, executor: E, payload: CreateConsultantPayload) -> Result<Consultant, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        let phone = format_phone(&payload.phone).unwrap_or(payload.phone);
        let email = payload.email.trim().to_lowercase();
        self.ensure_not_admin_email(&mut *conn, &email).await?;
        let password_hash = hash_password(&payload.password).await?;

        let record = ConsultantRecord {
            name: payload.name.trim(),
            phone: &phone,
            email: &email,
            pix_key: payload.pix_key.as_deref(),
            active: payload.active,
        };

        let consultant = self.repo.create(&mut *conn, &record, &password_hash).await?;
        tracing::info!(consultant_id = %consultant.id, "consultor cadastrado");
        Ok(consultant)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: UpdateConsultantPayload,
    ) -> Result<Consultant, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        let phone = format_phone(&payload.phone).unwrap_or(payload.phone);
        let email = payload.email.trim().to_lowercase();
        self.ensure_not_admin_email(&mut *conn, &email).await?;
        let password_hash = match payload.password.as_deref() {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let record = ConsultantRecord {
            name: payload.name.trim(),
            phone: &phone,
            email: &email,
            pix_key: payload.pix_key.as_deref(),
            active: payload.active,
        };

        self.repo.update(&mut *conn, id, &record, password_hash.as_deref()).await
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let removed = self.repo.delete(executor, id).await?;
        tracing::info!(consultant_id = %id, removed, "consultor removido");
        Ok(())
    }

    // O login procura administradores primeiro: um consultor com o mesmo e-mail nunca entraria
    async fn ensure_not_admin_email<'e, E>(&self, executor: E, email: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if self.user_repo.find_by_email(executor, email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }
        Ok(())
    }
}
