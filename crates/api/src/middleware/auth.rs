//! Bearer-token resolution into a tenant-scoped [`AuthContext`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderName;
use parish_core::error::CoreError;
use parish_core::principal::PrincipalKind;
use parish_core::roles::ROLE_ADMIN;
use parish_core::types::DbId;
use parish_db::models::audit::AuditActor;
use parish_db::repositories::{HeadquartersRepo, OrganizationRepo, RoleRepo, UserRepo};
use serde::Serialize;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header a headquarters token uses to act on one of its organizations.
pub static ORGANIZATION_HEADER: HeaderName = HeaderName::from_static("x-organization-id");

/// The resolved caller of a request.
///
/// Use it as an extractor in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(ctx: AuthContext, State(state): State<AppState>) -> AppResult<Json<()>> {
///     let org_id = ctx.organization_id()?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AuthContext {
    pub kind: PrincipalKind,
    /// Id of the user, organization or headquarters named by the token.
    pub principal_id: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<DbId>,
    /// Tenant the request operates on. `None` only for a headquarters token
    /// that selected no organization.
    pub organization_id: Option<DbId>,
    pub headquarters_id: Option<DbId>,
    /// Role name for user tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Granted permission names for user tokens.
    pub permissions: Vec<String>,
    pub full_access: bool,
}

impl AuthContext {
    /// The tenant this request is scoped to.
    pub fn organization_id(&self) -> AppResult<DbId> {
        self.organization_id.ok_or_else(|| {
            AppError::Core(CoreError::OrganizationRequired(format!(
                "Select an organization with the {} header",
                ORGANIZATION_HEADER.as_str()
            )))
        })
    }

    /// Whether the caller holds `name`. Organization and headquarters tokens
    /// and users with the `admin` role hold every permission.
    pub fn has_permission(&self, name: &str) -> bool {
        self.full_access || self.permissions.iter().any(|p| p == name)
    }

    /// Audit-log attribution for this caller.
    pub fn actor(&self) -> AuditActor<'_> {
        AuditActor {
            kind: self.kind.as_str(),
            id: self.principal_id,
        }
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let selected_org = selected_organization(parts)?;
        resolve_claims(state, &claims, selected_org).await
    }
}

/// Parse the optional `X-Organization-Id` header.
fn selected_organization(parts: &Parts) -> AppResult<Option<DbId>> {
    let Some(value) = parts.headers.get(&ORGANIZATION_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<DbId>().ok())
        .map(Some)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "{} must be a numeric organization id",
                ORGANIZATION_HEADER.as_str()
            ))
        })
}

/// Load the principal named by `claims` and build its context.
///
/// A principal that no longer exists or is inactive yields 401.
pub async fn resolve_claims(
    state: &AppState,
    claims: &Claims,
    selected_org: Option<DbId>,
) -> AppResult<AuthContext> {
    let pool = &state.pool;
    match claims.kind {
        PrincipalKind::User => {
            let user = UserRepo::find_by_id(pool, claims.sub)
                .await?
                .filter(|u| u.is_active)
                .ok_or_else(|| unauthorized("User account not found or inactive"))?;
            let org = OrganizationRepo::find_by_id(pool, user.organization_id)
                .await?
                .filter(|o| o.is_active)
                .ok_or_else(|| unauthorized("Organization not found or inactive"))?;
            let role = RoleRepo::find_by_id(pool, org.id, user.role_id)
                .await?
                .ok_or_else(|| unauthorized("User role not found"))?;
            let permissions = RoleRepo::permission_names(pool, role.id).await?;

            Ok(AuthContext {
                kind: PrincipalKind::User,
                principal_id: user.id,
                user_id: Some(user.id),
                organization_id: Some(org.id),
                headquarters_id: org.headquarters_id,
                full_access: role.name == ROLE_ADMIN,
                role: Some(role.name),
                permissions,
            })
        }
        PrincipalKind::Organization => {
            let org = OrganizationRepo::find_by_id(pool, claims.sub)
                .await?
                .filter(|o| o.is_active)
                .ok_or_else(|| unauthorized("Organization not found or inactive"))?;

            Ok(AuthContext {
                kind: PrincipalKind::Organization,
                principal_id: org.id,
                user_id: None,
                organization_id: Some(org.id),
                headquarters_id: org.headquarters_id,
                role: None,
                permissions: Vec::new(),
                full_access: true,
            })
        }
        PrincipalKind::Headquarters => {
            let hq = HeadquartersRepo::find_by_id(pool, claims.sub)
                .await?
                .filter(|h| h.is_active)
                .ok_or_else(|| unauthorized("Headquarters not found or inactive"))?;

            let organization_id = match selected_org {
                Some(org_id) => {
                    let org = OrganizationRepo::find_owned_by(pool, hq.id, org_id)
                        .await?
                        .ok_or_else(|| {
                            AppError::Core(CoreError::Forbidden(format!(
                                "Organization {org_id} does not belong to this headquarters"
                            )))
                        })?;
                    Some(org.id)
                }
                None => None,
            };

            Ok(AuthContext {
                kind: PrincipalKind::Headquarters,
                principal_id: hq.id,
                user_id: None,
                organization_id,
                headquarters_id: Some(hq.id),
                role: None,
                permissions: Vec::new(),
                full_access: true,
            })
        }
    }
}
