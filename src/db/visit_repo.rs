// src/db/visit_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::visit::{Visit, VisitPayload, VisitStatus, VisitView},
};

const VISIT_VIEW_SELECT: &str = r#"
    SELECT
        v.id, v.lead_id, v.partner_id, v.consultant_id,
        v.visit_date, v.visit_time, v.status, v.notes,
        v.created_at, v.updated_at,
        l.name AS lead_name,
        l.phone AS lead_phone,
        p.name AS partner_name,
        c.name AS consultant_name
    FROM visits v
    JOIN leads l ON l.id = v.lead_id
    LEFT JOIN partners p ON p.id = v.partner_id
    LEFT JOIN consultants c ON c.id = v.consultant_id
"#;

#[derive(Clone, Default)]
pub struct VisitRepository;

impl VisitRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        status: Option<VisitStatus>,
        date: Option<NaiveDate>,
        consultant_id: Option<Uuid>,
    ) -> Result<Vec<VisitView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{VISIT_VIEW_SELECT}
            WHERE ($1::visit_status IS NULL OR v.status = $1)
              AND ($2::date IS NULL OR v.visit_date = $2)
              AND ($3::uuid IS NULL OR v.consultant_id = $3 OR l.consultant_id = $3)
            ORDER BY v.visit_date ASC, v.visit_time ASC
            "#
        );

        let visits = sqlx::query_as::<_, VisitView>(&sql)
            .bind(status)
            .bind(date)
            .bind(consultant_id)
            .fetch_all(executor)
            .await?;

        Ok(visits)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<VisitView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{VISIT_VIEW_SELECT} WHERE v.id = $1");
        let visit = sqlx::query_as::<_, VisitView>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(visit)
    }

    pub async fn create<'e, E>(&self, executor: E, input: &VisitPayload) -> Result<Visit, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let visit = sqlx::query_as::<_, Visit>(
            r#"
            INSERT INTO visits (
                lead_id, partner_id, consultant_id, visit_date, visit_time, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'AGENDADO'::visit_status), $7)
            RETURNING *
            "#,
        )
        .bind(input.lead_id)
        .bind(input.partner_id)
        .bind(input.consultant_id)
        .bind(input.visit_date)
        .bind(input.visit_time)
        .bind(input.status)
        .bind(&input.notes)
        .fetch_one(executor)
        .await?;

        Ok(visit)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, input: &VisitPayload) -> Result<Visit, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let visit = sqlx::query_as::<_, Visit>(
            r#"
            UPDATE visits
            SET lead_id = $2,
                partner_id = $3,
                consultant_id = $4,
                visit_date = $5,
                visit_time = $6,
                status = COALESCE($7, status),
                notes = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.lead_id)
        .bind(input.partner_id)
        .bind(input.consultant_id)
        .bind(input.visit_date)
        .bind(input.visit_time)
        .bind(input.status)
        .bind(&input.notes)
        .fetch_one(executor)
        .await?;

        Ok(visit)
    }

    pub async fn update_status<'e, E>(&self, executor: E, id: Uuid, status: VisitStatus) -> Result<Visit, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let visit = sqlx::query_as::<_, Visit>(
            "UPDATE visits SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(visit)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM visits WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
