//! Permission extractors.
//!
//! Each extractor wraps [`AuthContext`] and rejects callers that do not meet
//! the requirement, so handlers enforce authorization at the type level.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use parish_core::error::CoreError;
use parish_core::permissions::Permission;
use parish_core::principal::PrincipalKind;

use super::auth::AuthContext;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the catalogue permission `P`. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn list(
///     RequirePermission(ctx, ..): RequirePermission<MembersView>,
/// ) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequirePermission<P: Permission>(pub AuthContext, pub PhantomData<P>);

impl<P: Permission> FromRequestParts<AppState> for RequirePermission<P> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state).await?;
        if !ctx.has_permission(P::NAME) {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Missing permission: {}",
                P::NAME
            ))));
        }
        Ok(RequirePermission(ctx, PhantomData))
    }
}

/// Requires an organization or headquarters token. User tokens get 403
/// whatever their role.
pub struct RequireOrganizationOwner(pub AuthContext);

impl FromRequestParts<AppState> for RequireOrganizationOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state).await?;
        if ctx.kind == PrincipalKind::User {
            return Err(AppError::Core(CoreError::Forbidden(
                "Organization or headquarters account required".into(),
            )));
        }
        Ok(RequireOrganizationOwner(ctx))
    }
}

/// Requires a headquarters token.
pub struct RequireHeadquarters(pub AuthContext);

impl FromRequestParts<AppState> for RequireHeadquarters {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state).await?;
        if ctx.kind != PrincipalKind::Headquarters {
            return Err(AppError::Core(CoreError::Forbidden(
                "Headquarters account required".into(),
            )));
        }
        Ok(RequireHeadquarters(ctx))
    }
}
