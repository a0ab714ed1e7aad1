// src/services/dashboard_service.rs

use sqlx::{Acquire, Postgres};

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    middleware::auth::AuthenticatedUser,
    models::dashboard::DashboardSummary,
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    /// Admin vê a operação toda; consultor vê só os próprios números.
    pub async fn get_summary<'e, E>(&self, executor: E, user: &AuthenticatedUser) -> Result<DashboardSummary, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        self.repo.get_summary(executor, user.consultant_scope()).await
    }
}
