// src/db/consultant_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::map_unique_violation,
    models::consultant::Consultant,
};

// Dados já normalizados pelo service (telefone com máscara, senha em hash)
pub struct ConsultantRecord<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub pix_key: Option<&'a str>,
    pub active: Option<bool>,
}

#[derive(Clone, Default)]
pub struct ConsultantRepository;

impl ConsultantRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Consultant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let consultants = sqlx::query_as::<_, Consultant>("SELECT * FROM consultants ORDER BY name ASC")
            .fetch_all(executor)
            .await?;

        Ok(consultants)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Consultant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let consultant = sqlx::query_as::<_, Consultant>("SELECT * FROM consultants WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(consultant)
    }

    pub async fn find_by_email<'e, E>(&self, executor: E, email: &str) -> Result<Option<Consultant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let consultant = sqlx::query_as::<_, Consultant>(
            "SELECT * FROM consultants WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(executor)
        .await?;

        Ok(consultant)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        record: &ConsultantRecord<'_>,
        password_hash: &str,
    ) -> Result<Consultant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Consultant>(
            r#"
            INSERT INTO consultants (name, phone, email, password_hash, pix_key, active)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE))
            RETURNING *
            "#,
        )
        .bind(record.name)
        .bind(record.phone)
        .bind(record.email)
        .bind(password_hash)
        .bind(record.pix_key)
        .bind(record.active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, AppError::EmailAlreadyExists))
    }

    /// `password_hash` None mantém a senha atual.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        record: &ConsultantRecord<'_>,
        password_hash: Option<&str>,
    ) -> Result<Consultant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Consultant>(
            r#"
            UPDATE consultants
            SET name = $2,
                phone = $3,
                email = $4,
                pix_key = $5,
                active = COALESCE($6, active),
                password_hash = COALESCE($7, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(record.name)
        .bind(record.phone)
        .bind(record.email)
        .bind(record.pix_key)
        .bind(record.active)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, AppError::EmailAlreadyExists))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM consultants WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
