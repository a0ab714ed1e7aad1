// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dashboard::{ConsultantRankingEntry, DashboardSummary, StatusCount},
};

#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    /// Resumo geral. `consultant_id` restringe tudo aos registros do consultor.
    pub async fn get_summary<'e, E>(
        &self,
        executor: E,
        consultant_id: Option<Uuid>,
    ) -> Result<DashboardSummary, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        // Transação para ter um snapshot consistente dos números
        let mut tx = executor.begin().await?;

        // A. Leads por status
        let leads_by_status = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS total
            FROM leads
            WHERE ($1::uuid IS NULL OR consultant_id = $1)
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(consultant_id)
        .fetch_all(&mut *tx)
        .await?;

        let total_leads = leads_by_status.iter().map(|s| s.total).sum();

        // B. Visitas de hoje e próximas
        let (visits_today, upcoming_visits) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE v.visit_date = CURRENT_DATE AND v.status <> 'CANCELADO'),
                COUNT(*) FILTER (WHERE v.visit_date > CURRENT_DATE AND v.status IN ('AGENDADO', 'CONFIRMADO'))
            FROM visits v
            JOIN leads l ON l.id = v.lead_id
            WHERE ($1::uuid IS NULL OR v.consultant_id = $1 OR l.consultant_id = $1)
            "#,
        )
        .bind(consultant_id)
        .fetch_one(&mut *tx)
        .await?;

        // C. Fechamentos
        let (closings_count, closed_value, total_commission) = sqlx::query_as::<_, (i64, Decimal, Decimal)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(value), 0), COALESCE(SUM(commission), 0)
            FROM closings
            WHERE ($1::uuid IS NULL OR consultant_id = $1)
            "#,
        )
        .bind(consultant_id)
        .fetch_one(&mut *tx)
        .await?;

        // D. Ranking dos consultores por valor fechado
        let consultant_ranking = sqlx::query_as::<_, ConsultantRankingEntry>(
            r#"
            SELECT
                c.id AS consultant_id,
                c.name AS consultant_name,
                COUNT(f.id) AS closings,
                COALESCE(SUM(f.value), 0) AS closed_value,
                COALESCE(SUM(f.commission), 0) AS commission
            FROM consultants c
            JOIN closings f ON f.consultant_id = c.id
            WHERE ($1::uuid IS NULL OR c.id = $1)
            GROUP BY c.id, c.name
            ORDER BY closed_value DESC
            LIMIT 10
            "#,
        )
        .bind(consultant_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            total_leads,
            leads_by_status,
            visits_today,
            upcoming_visits,
            closings_count,
            closed_value,
            total_commission,
            consultant_ranking,
        })
    }
}
