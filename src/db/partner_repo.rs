// src/db/partner_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::partner::{Partner, PartnerPayload, PartnerStatus},
};

#[derive(Clone, Default)]
pub struct PartnerRepository;

impl PartnerRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        status: Option<PartnerStatus>,
        city: Option<&str>,
    ) -> Result<Vec<Partner>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let partners = sqlx::query_as::<_, Partner>(
            r#"
            SELECT * FROM partners
            WHERE ($1::partner_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR city ILIKE $2)
            ORDER BY name ASC
            "#,
        )
        .bind(status)
        .bind(city.map(str::trim))
        .fetch_all(executor)
        .await?;

        Ok(partners)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Partner>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let partner = sqlx::query_as::<_, Partner>("SELECT * FROM partners WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(partner)
    }

    pub async fn create<'e, E>(&self, executor: E, input: &PartnerPayload) -> Result<Partner, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let partner = sqlx::query_as::<_, Partner>(
            r#"
            INSERT INTO partners (name, address, city, state, niche, status)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'EM_ANALISE'::partner_status))
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.niche)
        .bind(input.status)
        .fetch_one(executor)
        .await?;

        Ok(partner)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, input: &PartnerPayload) -> Result<Partner, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let partner = sqlx::query_as::<_, Partner>(
            r#"
            UPDATE partners
            SET name = $2,
                address = $3,
                city = $4,
                state = $5,
                niche = $6,
                status = COALESCE($7, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.niche)
        .bind(input.status)
        .fetch_one(executor)
        .await?;

        Ok(partner)
    }

    pub async fn update_status<'e, E>(&self, executor: E, id: Uuid, status: PartnerStatus) -> Result<Partner, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let partner = sqlx::query_as::<_, Partner>(
            "UPDATE partners SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(partner)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM partners WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
