// src/services/closing_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClosingRepository, LeadRepository},
    middleware::auth::AuthenticatedUser,
    models::{
        closing::{Closing, ClosingPayload, ClosingView, ContractLink},
        lead::LeadStatus,
    },
    services::storage_service::ObjectStorage,
};

pub const MAX_CONTRACT_BYTES: usize = 10 * 1024 * 1024;
pub const CONTRACT_LINK_TTL_SECS: u64 = 3600;

/// Comissão do consultor: 5 por mil do valor fechado, em centavos.
pub fn commission_for(value: Decimal) -> Decimal {
    (value / Decimal::from(1000) * Decimal::from(5)).round_dp(2)
}

/// PDF de verdade começa com "%PDF". O content-type sozinho não basta,
/// mas quando vem diferente de PDF o arquivo é recusado.
pub fn is_pdf(bytes: &[u8], content_type: Option<&str>) -> bool {
    let declared_ok = match content_type {
        Some(ct) => {
            let ct = ct.to_ascii_lowercase();
            ct.starts_with("application/pdf") || ct == "application/octet-stream"
        }
        None => true,
    };
    declared_ok && bytes.starts_with(b"%PDF")
}

pub fn contract_path(closing_id: Uuid, now: DateTime<Utc>) -> String {
    format!("fechamentos/{closing_id}/{}.pdf", now.timestamp_millis())
}

#[derive(Clone)]
pub struct ClosingService {
    repo: ClosingRepository,
    lead_repo: LeadRepository,
    storage: Option<Arc<dyn ObjectStorage>>,
}

impl ClosingService {
    pub fn new(
        repo: ClosingRepository,
        lead_repo: LeadRepository,
        storage: Option<Arc<dyn ObjectStorage>>,
    ) -> Self {
        Self { repo, lead_repo, storage }
    }

    pub async fn list<'e, E>(&self, executor: E, user: &AuthenticatedUser) -> Result<Vec<ClosingView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor, user.consultant_scope()).await
    }

    pub async fn get<'e, E>(&self, executor: E, user: &AuthenticatedUser, id: Uuid) -> Result<ClosingView, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let closing = self.repo.find_view(executor, id).await?.ok_or(AppError::NotFound("closing"))?;

        if let Some(me) = user.consultant_scope() {
            if closing.closing.consultant_id != Some(me) {
                return Err(AppError::Forbidden("closings:read".into()));
            }
        }
        Ok(closing)
    }

    /// Registra o fechamento e marca o lead como "fechado" na mesma transação.
    pub async fn create<'e, E>(&self, executor: E, payload: ClosingPayload) -> Result<Closing, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let commission = commission_for(payload.value);
        let mut tx = executor.begin().await?;

        let closing = self.repo.create(&mut *tx, &payload, commission).await?;
        self.lead_repo
            .update_status(&mut *tx, payload.lead_id, LeadStatus::Fechado)
            .await?;

        tx.commit().await?;

        tracing::info!(
            closing_id = %closing.id,
            lead_id = %closing.lead_id,
            value = %closing.value,
            commission = %closing.commission,
            "fechamento registrado"
        );
        Ok(closing)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: ClosingPayload) -> Result<Closing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let commission = commission_for(payload.value);
        self.repo.update(executor, id, &payload, commission).await
    }

    /// Remove o fechamento e, se houver, o PDF do contrato no storage.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;
        let Some(closing) = self.repo.find_by_id(&mut *conn, id).await? else {
            return Ok(());
        };

        self.repo.delete(&mut *conn, id).await?;
        if let Some(path) = closing.contract_path {
            self.discard_contract(&path).await;
        }
        Ok(())
    }

    pub async fn upload_contract<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<Closing, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        if bytes.len() > MAX_CONTRACT_BYTES {
            return Err(AppError::InvalidFile("file.too_large"));
        }
        if !is_pdf(&bytes, content_type) {
            return Err(AppError::InvalidFile("file.not_pdf"));
        }
        let storage = self.storage()?;

        let mut conn = executor.acquire().await?;
        let previous = self
            .repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::NotFound("closing"))?
            .contract_path;

        let path = contract_path(id, Utc::now());
        storage.upload(&path, bytes, "application/pdf").await?;

        let closing = self.repo.set_contract_path(&mut *conn, id, &path).await?;
        tracing::info!(closing_id = %id, path = %path, "contrato anexado");

        // O arquivo antigo só sai depois que o novo caminho está gravado
        if let Some(old) = previous.filter(|old| *old != path) {
            self.discard_contract(&old).await;
        }
        Ok(closing)
    }

    pub async fn contract_link<'e, E>(
        &self,
        executor: E,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<ContractLink, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let storage = self.storage()?;

        let closing = self.repo.find_by_id(executor, id).await?.ok_or(AppError::NotFound("closing"))?;
        if let Some(me) = user.consultant_scope() {
            if closing.consultant_id != Some(me) {
                return Err(AppError::Forbidden("closings:read".into()));
            }
        }
        let path = closing.contract_path.ok_or(AppError::NotFound("contract"))?;

        let url = storage.signed_url(&path, CONTRACT_LINK_TTL_SECS).await?;
        Ok(ContractLink { url, expires_in: CONTRACT_LINK_TTL_SECS })
    }

    // Falha aqui não desfaz a operação: o objeto fica órfão e vai para o log
    async fn discard_contract(&self, path: &str) {
        let Some(storage) = &self.storage else {
            tracing::warn!(path, "storage não configurado: contrato antigo mantido");
            return;
        };
        if let Err(e) = storage.delete(path).await {
            tracing::warn!(path, error = %e, "falha ao remover contrato do storage");
        }
    }

    fn storage(&self) -> Result<&Arc<dyn ObjectStorage>, AppError> {
        self.storage.as_ref().ok_or(AppError::IntegrationNotConfigured("storage"))
    }
}
