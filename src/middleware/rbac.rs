// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, middleware::auth::AuthenticatedUser, models::auth::Role};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

// O que o consultor pode fazer. Admin pode tudo.
const CONSULTOR_PERMISSIONS: &[&str] = &[
    "leads:read",
    "leads:write",
    "partners:read",
    "visits:read",
    "visits:write",
    "closings:read",
    "dashboard:read",
];

pub fn role_grants(role: Role, slug: &str) -> bool {
    match role {
        Role::Admin => true,
        Role::Consultor => CONSULTOR_PERMISSIONS.contains(&slug),
    }
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        let required_perm = T::slug();
        if !role_grants(user.role, required_perm) {
            tracing::warn!(user_id = %user.id, permission = required_perm, "acesso negado");
            return Err(AppError::Forbidden(required_perm.to_string()));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission {
    ($name:ident, $slug:literal) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn slug() -> &'static str {
                $slug
            }
        }
    };
}

permission!(PermLeadsRead, "leads:read");
permission!(PermLeadsWrite, "leads:write");
permission!(PermLeadsDelete, "leads:delete");
permission!(PermConsultantsManage, "consultants:manage");
permission!(PermPartnersRead, "partners:read");
permission!(PermPartnersWrite, "partners:write");
permission!(PermVisitsRead, "visits:read");
permission!(PermVisitsWrite, "visits:write");
permission!(PermClosingsRead, "closings:read");
permission!(PermClosingsWrite, "closings:write");
permission!(PermAdsManage, "ads:manage");
permission!(PermDashboardRead, "dashboard:read");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_every_permission() {
        for slug in ["consultants:manage", "ads:manage", "leads:delete", "anything"] {
            assert!(role_grants(Role::Admin, slug));
        }
    }

    #[test]
    fn consultant_cannot_manage_consultants_or_ads() {
        assert!(!role_grants(Role::Consultor, PermConsultantsManage::slug()));
        assert!(!role_grants(Role::Consultor, PermAdsManage::slug()));
        assert!(!role_grants(Role::Consultor, PermClosingsWrite::slug()));
        assert!(!role_grants(Role::Consultor, PermLeadsDelete::slug()));
    }

    #[test]
    fn consultant_works_own_pipeline() {
        assert!(role_grants(Role::Consultor, PermLeadsWrite::slug()));
        assert!(role_grants(Role::Consultor, PermVisitsWrite::slug()));
        assert!(role_grants(Role::Consultor, PermDashboardRead::slug()));
    }
}
