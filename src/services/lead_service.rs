// src/services/lead_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        masks::{format_cpf, format_phone, normalize_state},
    },
    db::LeadRepository,
    middleware::auth::AuthenticatedUser,
    models::lead::{Lead, LeadFilter, LeadPayload, LeadStatus, LeadView},
};

/// Aplica as máscaras de telefone/CPF e a UF em maiúsculas.
/// Os campos já passaram pelo `validate()`, então as máscaras não falham.
pub fn normalize_lead(mut payload: LeadPayload) -> LeadPayload {
    payload.name = payload.name.trim().to_string();
    if let Some(phone) = format_phone(&payload.phone) {
        payload.phone = phone;
    }
    payload.cpf = payload.cpf.map(|cpf| format_cpf(&cpf).unwrap_or(cpf));
    payload.state = payload.state.map(|uf| normalize_state(&uf).unwrap_or(uf));
    payload
}

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
}

impl LeadService {
    pub fn new(repo: LeadRepository) -> Self {
        Self { repo }
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        user: &AuthenticatedUser,
        filter: LeadFilter,
    ) -> Result<Vec<LeadView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Consultor só vê a própria carteira, independente do filtro enviado
        let consultant_id = user.consultant_scope().or(filter.consultant_id);
        let search = filter.search.as_deref().filter(|s| !s.trim().is_empty());

        self.repo.list(executor, filter.status, consultant_id, search).await
    }

    pub async fn get<'e, E>(&self, executor: E, user: &AuthenticatedUser, id: Uuid) -> Result<LeadView, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = self.repo.find_by_id(executor, id).await?.ok_or(AppError::NotFound("lead"))?;

        if let Some(me) = user.consultant_scope() {
            if lead.lead.consultant_id != Some(me) {
                return Err(AppError::Forbidden("leads:read".into()));
            }
        }

        Ok(lead)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user: &AuthenticatedUser,
        payload: LeadPayload,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut input = normalize_lead(payload);
        if let Some(me) = user.consultant_scope() {
            input.consultant_id = Some(me);
        }

        let lead = self.repo.create(executor, &input).await?;
        tracing::info!(lead_id = %lead.id, "lead cadastrado");
        Ok(lead)
    }

    /// Cadastro vindo do formulário público.
    pub async fn capture<'e, E>(&self, executor: E, payload: LeadPayload) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut input = normalize_lead(payload);
        input.status = Some(LeadStatus::Novo);
        input.consultant_id = None;

        let lead = self.repo.create(executor, &input).await?;
        tracing::info!(lead_id = %lead.id, "lead captado pelo formulário público");
        Ok(lead)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user: &AuthenticatedUser,
        id: Uuid,
        payload: LeadPayload,
    ) -> Result<Lead, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.ensure_owner(&mut *conn, user, id).await?;

        let mut input = normalize_lead(payload);
        if let Some(me) = user.consultant_scope() {
            input.consultant_id = Some(me);
        }

        self.repo.update(&mut *conn, id, &input).await
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        user: &AuthenticatedUser,
        id: Uuid,
        status: LeadStatus,
    ) -> Result<Lead, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        self.ensure_owner(&mut *conn, user, id).await?;

        let lead = self.repo.update_status(&mut *conn, id, status).await?;
        tracing::info!(lead_id = %id, status = ?status, "status do lead alterado");
        Ok(lead)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let removed = self.repo.delete(executor, id).await?;
        tracing::info!(lead_id = %id, removed, "lead removido");
        Ok(())
    }

    // Lead de outro consultor é proibido. Lead inexistente segue para o UPDATE,
    // que devolve o erro do banco.
    async fn ensure_owner<'e, E>(&self, executor: E, user: &AuthenticatedUser, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(me) = user.consultant_scope() else {
            return Ok(());
        };

        match self.repo.owner_of(executor, id).await? {
            Some(owner) if owner != Some(me) => Err(AppError::Forbidden("leads:write".into())),
            _ => Ok(()),
        }
    }
}
