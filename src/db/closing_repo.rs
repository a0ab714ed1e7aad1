// src/db/closing_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::closing::{Closing, ClosingPayload, ClosingView},
};

const CLOSING_VIEW_SELECT: &str = r#"
    SELECT
        f.id, f.lead_id, f.consultant_id, f.partner_id,
        f.value, f.commission, f.closed_on, f.contract_path, f.notes,
        f.created_at, f.updated_at,
        l.name AS lead_name,
        c.name AS consultant_name,
        p.name AS partner_name
    FROM closings f
    JOIN leads l ON l.id = f.lead_id
    LEFT JOIN consultants c ON c.id = f.consultant_id
    LEFT JOIN partners p ON p.id = f.partner_id
"#;

#[derive(Clone, Default)]
pub struct ClosingRepository;

impl ClosingRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, consultant_id: Option<Uuid>) -> Result<Vec<ClosingView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{CLOSING_VIEW_SELECT}
            WHERE ($1::uuid IS NULL OR f.consultant_id = $1)
            ORDER BY f.closed_on DESC, f.created_at DESC
            "#
        );

        let closings = sqlx::query_as::<_, ClosingView>(&sql)
            .bind(consultant_id)
            .fetch_all(executor)
            .await?;

        Ok(closings)
    }

    pub async fn find_view<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<ClosingView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{CLOSING_VIEW_SELECT} WHERE f.id = $1");
        let closing = sqlx::query_as::<_, ClosingView>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(closing)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Closing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let closing = sqlx::query_as::<_, Closing>("SELECT * FROM closings WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(closing)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        input: &ClosingPayload,
        commission: Decimal,
    ) -> Result<Closing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let closing = sqlx::query_as::<_, Closing>(
            r#"
            INSERT INTO closings (
                lead_id, consultant_id, partner_id, value, commission, closed_on, notes
            )
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, CURRENT_DATE), $7)
            RETURNING *
            "#,
        )
        .bind(input.lead_id)
        .bind(input.consultant_id)
        .bind(input.partner_id)
        .bind(input.value)
        .bind(commission)
        .bind(input.closed_on)
        .bind(&input.notes)
        .fetch_one(executor)
        .await?;

        Ok(closing)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &ClosingPayload,
        commission: Decimal,
    ) -> Result<Closing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let closing = sqlx::query_as::<_, Closing>(
            r#"
            UPDATE closings
            SET lead_id = $2,
                consultant_id = $3,
                partner_id = $4,
                value = $5,
                commission = $6,
                closed_on = COALESCE($7, closed_on),
                notes = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.lead_id)
        .bind(input.consultant_id)
        .bind(input.partner_id)
        .bind(input.value)
        .bind(commission)
        .bind(input.closed_on)
        .bind(&input.notes)
        .fetch_one(executor)
        .await?;

        Ok(closing)
    }

    pub async fn set_contract_path<'e, E>(&self, executor: E, id: Uuid, path: &str) -> Result<Closing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let closing = sqlx::query_as::<_, Closing>(
            "UPDATE closings SET contract_path = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(path)
        .fetch_one(executor)
        .await?;

        Ok(closing)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM closings WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
