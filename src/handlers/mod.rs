pub mod auth;
pub mod closings;
pub mod consultants;
pub mod dashboard;
pub mod leads;
pub mod meta_ads;
pub mod partners;
pub mod visits;
