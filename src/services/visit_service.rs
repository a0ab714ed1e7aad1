// src/services/visit_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LeadRepository, VisitRepository},
    middleware::auth::AuthenticatedUser,
    models::{
        lead::LeadStatus,
        visit::{Visit, VisitFilter, VisitPayload, VisitStatus, VisitView},
    },
};

/// Agendar uma visita leva o lead para "agendado", exceto quando a visita
/// já nasce realizada, cancelada ou com falta.
pub fn schedules_lead(status: Option<VisitStatus>) -> bool {
    matches!(status, None | Some(VisitStatus::Agendado) | Some(VisitStatus::Confirmado))
}

#[derive(Clone)]
pub struct VisitService {
    repo: VisitRepository,
    lead_repo: LeadRepository,
}

impl VisitService {
    pub fn new(repo: VisitRepository, lead_repo: LeadRepository) -> Self {
        Self { repo, lead_repo }
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        user: &AuthenticatedUser,
        filter: VisitFilter,
    ) -> Result<Vec<VisitView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .list(executor, filter.status, filter.date, user.consultant_scope())
            .await
    }

    pub async fn get<'e, E>(&self, executor: E, user: &AuthenticatedUser, id: Uuid) -> Result<VisitView, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        let visit = self
            .repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::NotFound("visit"))?;

        self.ensure_access(&mut *conn, user, &visit.visit).await?;
        Ok(visit)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user: &AuthenticatedUser,
        mut payload: VisitPayload,
    ) -> Result<Visit, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let owner = self
            .lead_repo
            .owner_of(&mut *tx, payload.lead_id)
            .await?
            .ok_or(AppError::NotFound("lead"))?;

        if let Some(me) = user.consultant_scope() {
            if owner != Some(me) {
                return Err(AppError::Forbidden("visits:write".into()));
            }
            payload.consultant_id = Some(me);
        } else if payload.consultant_id.is_none() {
            payload.consultant_id = owner;
        }

        let visit = self.repo.create(&mut *tx, &payload).await?;

        if schedules_lead(payload.status) {
            self.lead_repo
                .update_status(&mut *tx, payload.lead_id, LeadStatus::Agendado)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(visit_id = %visit.id, lead_id = %visit.lead_id, "visita agendada");
        Ok(visit)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user: &AuthenticatedUser,
        id: Uuid,
        mut payload: VisitPayload,
    ) -> Result<Visit, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        if let Some(me) = user.consultant_scope() {
            if let Some(current) = self.repo.find_by_id(&mut *conn, id).await? {
                self.ensure_access(&mut *conn, user, &current.visit).await?;
            }
            // A visita só pode apontar para um lead do próprio consultor
            self.ensure_lead_owner(&mut *conn, me, payload.lead_id).await?;
            payload.consultant_id = Some(me);
        }

        self.repo.update(&mut *conn, id, &payload).await
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        user: &AuthenticatedUser,
        id: Uuid,
        status: VisitStatus,
    ) -> Result<Visit, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        if user.consultant_scope().is_some() {
            if let Some(current) = self.repo.find_by_id(&mut *conn, id).await? {
                self.ensure_access(&mut *conn, user, &current.visit).await?;
            }
        }

        let visit = self.repo.update_status(&mut *conn, id, status).await?;
        tracing::info!(visit_id = %id, status = ?status, "status da visita alterado");
        Ok(visit)
    }

    pub async fn delete<'e, E>(&self, executor: E, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        if user.consultant_scope().is_some() {
            if let Some(current) = self.repo.find_by_id(&mut *conn, id).await? {
                self.ensure_access(&mut *conn, user, &current.visit).await?;
            }
        }

        self.repo.delete(&mut *conn, id).await?;
        Ok(())
    }

    async fn ensure_lead_owner<'e, E>(&self, executor: E, me: Uuid, lead_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        match self.lead_repo.owner_of(executor, lead_id).await? {
            Some(Some(owner)) if owner == me => Ok(()),
            Some(_) => Err(AppError::Forbidden("visits:write".into())),
            None => Err(AppError::NotFound("lead")),
        }
    }

    // O consultor acessa a visita se ela é dele ou se o lead é dele
    async fn ensure_access<'e, E>(&self, executor: E, user: &AuthenticatedUser, visit: &Visit) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(me) = user.consultant_scope() else {
            return Ok(());
        };
        if visit.consultant_id == Some(me) {
            return Ok(());
        }

        match self.lead_repo.owner_of(executor, visit.lead_id).await? {
            Some(Some(owner)) if owner == me => Ok(()),
            _ => Err(AppError::Forbidden("visits:read".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_open_visits_move_the_lead() {
        assert!(schedules_lead(None));
        assert!(schedules_lead(Some(VisitStatus::Agendado)));
        assert!(schedules_lead(Some(VisitStatus::Confirmado)));
        assert!(!schedules_lead(Some(VisitStatus::Realizado)));
        assert!(!schedules_lead(Some(VisitStatus::Cancelado)));
        assert!(!schedules_lead(Some(VisitStatus::NaoCompareceu)));
    }
}
