// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

/// 1. O Trait que define um requisito de papel
pub trait RoleRequirement: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
    fn denial() -> &'static str;
}

/// 2. O Extractor (Guardião). Depende do auth_guard já ter pendurado o
/// usuário nos extensions; sem usuário é 401, papel insuficiente é 403.
pub struct RequireRole<T>(pub User, pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleRequirement,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        if !T::allows(user.role) {
            return Err(AppError::Forbidden(T::denial()));
        }

        Ok(RequireRole(user, PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS REQUISITOS (TIPOS)
// ---

pub struct AdminOnly;
impl RoleRequirement for AdminOnly {
    fn allows(role: Role) -> bool {
        role.is_admin()
    }
    fn denial() -> &'static str {
        "Acesso restrito a administradores."
    }
}

pub struct ManagerOrAdmin;
impl RoleRequirement for ManagerOrAdmin {
    fn allows(role: Role) -> bool {
        role.is_manager_or_admin()
    }
    fn denial() -> &'static str {
        "Acesso restrito a gerentes ou administradores."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_only_so_aceita_admin() {
        assert!(AdminOnly::allows(Role::Admin));
        assert!(!AdminOnly::allows(Role::Manager));
        assert!(!AdminOnly::allows(Role::User));
    }

    #[test]
    fn manager_or_admin_aceita_os_dois() {
        assert!(ManagerOrAdmin::allows(Role::Admin));
        assert!(ManagerOrAdmin::allows(Role::Manager));
        assert!(!ManagerOrAdmin::allows(Role::User));
    }
}
