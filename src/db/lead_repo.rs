// src/db/lead_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{Lead, LeadPayload, LeadStatus, LeadView},
};

// Colunas do lead + nomes resolvidos por JOIN
const LEAD_VIEW_SELECT: &str = r#"
    SELECT
        l.id, l.name, l.phone, l.cpf, l.service_type, l.city, l.state,
        l.status, l.consultant_id, l.partner_id, l.notes,
        l.created_at, l.updated_at,
        c.name AS consultant_name,
        p.name AS partner_name
    FROM leads l
    LEFT JOIN consultants c ON c.id = l.consultant_id
    LEFT JOIN partners p ON p.id = l.partner_id
"#;

#[derive(Clone, Default)]
pub struct LeadRepository;

impl LeadRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        status: Option<LeadStatus>,
        consultant_id: Option<Uuid>,
        search: Option<&str>,
    ) -> Result<Vec<LeadView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let search_term = search.map(|q| format!("%{}%", q.trim()));
        let sql = format!(
            r#"{LEAD_VIEW_SELECT}
            WHERE ($1::lead_status IS NULL OR l.status = $1)
              AND ($2::uuid IS NULL OR l.consultant_id = $2)
              AND ($3::text IS NULL
                   OR l.name ILIKE $3
                   OR l.phone ILIKE $3
                   OR l.cpf ILIKE $3)
            ORDER BY l.created_at DESC
            "#
        );

        let leads = sqlx::query_as::<_, LeadView>(&sql)
            .bind(status)
            .bind(consultant_id)
            .bind(search_term)
            .fetch_all(executor)
            .await?;

        Ok(leads)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<LeadView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{LEAD_VIEW_SELECT} WHERE l.id = $1");
        let lead = sqlx::query_as::<_, LeadView>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(lead)
    }

    /// Dono do lead: `None` se o lead não existe, `Some(None)` se está sem consultor.
    pub async fn owner_of<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Option<Uuid>>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let owner = sqlx::query_scalar::<_, Option<Uuid>>("SELECT consultant_id FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(owner)
    }

    pub async fn create<'e, E>(&self, executor: E, input: &LeadPayload) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (
                name, phone, cpf, service_type, city, state,
                status, consultant_id, partner_id, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'NOVO'::lead_status), $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.cpf)
        .bind(&input.service_type)
        .bind(&input.city)
        .bind(&input.state)
        .bind(input.status)
        .bind(input.consultant_id)
        .bind(input.partner_id)
        .bind(&input.notes)
        .fetch_one(executor)
        .await?;

        Ok(lead)
    }

    // Id inexistente: o fetch_one devolve RowNotFound, que vira 500.
    pub async fn update<'e, E>(&self, executor: E, id: Uuid, input: &LeadPayload) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads
            SET name = $2,
                phone = $3,
                cpf = $4,
                service_type = $5,
                city = $6,
                state = $7,
                status = COALESCE($8, status),
                consultant_id = $9,
                partner_id = $10,
                notes = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.cpf)
        .bind(&input.service_type)
        .bind(&input.city)
        .bind(&input.state)
        .bind(input.status)
        .bind(input.consultant_id)
        .bind(input.partner_id)
        .bind(&input.notes)
        .fetch_one(executor)
        .await?;

        Ok(lead)
    }

    pub async fn update_status<'e, E>(&self, executor: E, id: Uuid, status: LeadStatus) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(
            "UPDATE leads SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(lead)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
