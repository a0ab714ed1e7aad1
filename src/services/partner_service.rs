// src/services/partner_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, masks::normalize_state},
    db::PartnerRepository,
    models::partner::{Partner, PartnerFilter, PartnerPayload, PartnerStatus},
};

fn normalize_partner(mut payload: PartnerPayload) -> PartnerPayload {
    payload.name = payload.name.trim().to_string();
    payload.city = payload.city.trim().to_string();
    if let Some(uf) = normalize_state(&payload.state) {
        payload.state = uf;
    }
    payload
}

#[derive(Clone)]
pub struct PartnerService {
    repo: PartnerRepository,
}

impl PartnerService {
    pub fn new(repo: PartnerRepository) -> Self {
        Self { repo }
    }

    pub async fn list<'e, E>(&self, executor: E, filter: PartnerFilter) -> Result<Vec<Partner>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let city = filter.city.as_deref().filter(|c| !c.trim().is_empty());
        self.repo.list(executor, filter.status, city).await
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Partner, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.find_by_id(executor, id).await?.ok_or(AppError::NotFound("partner"))
    }

    pub async fn create<'e, E>(&self, executor: E, payload: PartnerPayload) -> Result<Partner, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let partner = self.repo.create(executor, &normalize_partner(payload)).await?;
        tracing::info!(partner_id = %partner.id, "parceiro cadastrado");
        Ok(partner)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: PartnerPayload) -> Result<Partner, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.update(executor, id, &normalize_partner(payload)).await
    }

    pub async fn update_status<'e, E>(&self, executor: E, id: Uuid, status: PartnerStatus) -> Result<Partner, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.update_status(executor, id, status).await
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete(executor, id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_is_stored_upper_case() {
        let partner = normalize_partner(PartnerPayload {
            name: " Imobiliária Central ".into(),
            address: None,
            city: " Curitiba".into(),
            state: "pr".into(),
            niche: Some("imobiliaria".into()),
            status: None,
        });
        assert_eq!(partner.name, "Imobiliária Central");
        assert_eq!(partner.city, "Curitiba");
        assert_eq!(partner.state, "PR");
    }
}
