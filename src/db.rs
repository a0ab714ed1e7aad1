pub mod user_repo;
pub use user_repo::UserRepository;
pub mod consultant_repo;
pub use consultant_repo::ConsultantRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod partner_repo;
pub use partner_repo::PartnerRepository;
pub mod visit_repo;
pub use visit_repo::VisitRepository;
pub mod closing_repo;
pub use closing_repo::ClosingRepository;
pub mod ad_pricing_repo;
pub use ad_pricing_repo::AdPricingRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;

use crate::common::error::AppError;

// Converte violação de chave única em um erro mais amigável
pub(crate) fn map_unique_violation(e: sqlx::Error, on_unique: AppError) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique;
        }
    }
    AppError::DatabaseError(e)
}
