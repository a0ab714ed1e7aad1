pub mod auth;
pub mod closing_service;
pub mod consultant_service;
pub mod dashboard_service;
pub mod lead_service;
pub mod meta_ads_client;
pub mod meta_ads_service;
pub mod partner_service;
pub mod storage_service;
pub mod visit_service;
