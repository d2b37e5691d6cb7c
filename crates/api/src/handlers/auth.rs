//! Handlers for the `/auth` resource: logins, registrations and `me`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use parish_core::error::CoreError;
use parish_core::principal::PrincipalKind;
use parish_core::types::DbId;
use parish_core::validation::{normalize_email, validate_dto};
use parish_db::models::organization::{AccountResponse, CreateAccount, RegisterAccount};
use parish_db::repositories::{HeadquartersRepo, OrganizationRepo, RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::{LOCKOUT_MINUTES, MAX_FAILED_LOGINS, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthContext;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for every login endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub principal: PrincipalInfo,
}

/// Public summary of the authenticated principal.
#[derive(Debug, Serialize)]
pub struct PrincipalInfo {
    #[serde(rename = "type")]
    pub kind: PrincipalKind,
    pub id: DbId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

// ---------------------------------------------------------------------------
// Logins
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Staff user login. Five consecutive failures lock the account for fifteen
/// minutes.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = normalize_email(&input.email);
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".into(),
            )));
        }
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let lock_until = Utc::now() + chrono::Duration::minutes(LOCKOUT_MINUTES);
        let locked =
            UserRepo::record_failed_login(&state.pool, user.id, MAX_FAILED_LOGINS, lock_until)
                .await?;
        if locked {
            tracing::warn!(user_id = user.id, "User account locked after failed logins");
        }

        return Err(invalid_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;

    tracing::info!(user_id = user.id, organization_id = user.organization_id, "User logged in");

    token_response(
        &state,
        PrincipalInfo {
            kind: PrincipalKind::User,
            id: user.id,
            name: user.full_name,
            email: user.email,
            organization_id: Some(user.organization_id),
            role: Some(role),
        },
    )
    .map(Json)
}

/// POST /api/v1/auth/organization/login
pub async fn organization_login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = normalize_email(&input.email);
    let org = OrganizationRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    check_account_password(&input.password, &org.password_hash, org.is_active)?;
    tracing::info!(organization_id = org.id, "Organization logged in");

    token_response(
        &state,
        PrincipalInfo {
            kind: PrincipalKind::Organization,
            id: org.id,
            name: org.name,
            email: org.email,
            organization_id: Some(org.id),
            role: None,
        },
    )
    .map(Json)
}

/// POST /api/v1/auth/headquarters/login
pub async fn headquarters_login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = normalize_email(&input.email);
    let hq = HeadquartersRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    check_account_password(&input.password, &hq.password_hash, hq.is_active)?;
    tracing::info!(headquarters_id = hq.id, "Headquarters logged in");

    token_response(
        &state,
        PrincipalInfo {
            kind: PrincipalKind::Headquarters,
            id: hq.id,
            name: hq.name,
            email: hq.email,
            organization_id: None,
            role: None,
        },
    )
    .map(Json)
}

// ---------------------------------------------------------------------------
// Registrations
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/organization/register
///
/// Create a standalone organization with an `admin` role holding every
/// permission, and log it in.
pub async fn organization_register(
    State(state): State<AppState>,
    Json(input): Json<RegisterAccount>,
) -> AppResult<impl IntoResponse> {
    let account = prepare_account(&input)?;
    let org = OrganizationRepo::create_with_admin_role(&state.pool, None, &account).await?;

    tracing::info!(organization_id = org.id, "Organization registered");

    let response = token_response(
        &state,
        PrincipalInfo {
            kind: PrincipalKind::Organization,
            id: org.id,
            name: org.name,
            email: org.email,
            organization_id: Some(org.id),
            role: None,
        },
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/headquarters/register
pub async fn headquarters_register(
    State(state): State<AppState>,
    Json(input): Json<RegisterAccount>,
) -> AppResult<impl IntoResponse> {
    let account = prepare_account(&input)?;
    let hq = HeadquartersRepo::create(&state.pool, &account).await?;

    tracing::info!(headquarters_id = hq.id, "Headquarters registered");

    let response = token_response(
        &state,
        PrincipalInfo {
            kind: PrincipalKind::Headquarters,
            id: hq.id,
            name: hq.name,
            email: hq.email,
            organization_id: None,
            role: None,
        },
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

// ---------------------------------------------------------------------------
// Me
// ---------------------------------------------------------------------------

/// Response body for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub context: AuthContext,
    /// The organization the request is scoped to, if any.
    pub organization: Option<AccountResponse>,
}

/// GET /api/v1/auth/me
///
/// The resolved auth context plus the active organization's profile.
pub async fn me(ctx: AuthContext, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let organization = match ctx.organization_id {
        Some(org_id) => OrganizationRepo::find_by_id(&state.pool, org_id)
            .await?
            .as_ref()
            .map(AccountResponse::from),
        None => None,
    };

    Ok(Json(DataResponse {
        data: MeResponse {
            context: ctx,
            organization,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate a registration payload and hash its password.
pub(crate) fn prepare_account(input: &RegisterAccount) -> AppResult<CreateAccount> {
    validate_dto(input)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    Ok(CreateAccount {
        name: input.name.trim().to_string(),
        email: normalize_email(&input.email),
        password_hash,
        phone: input.phone.clone(),
        address: input.address.clone(),
    })
}

/// Password and active checks shared by organization and headquarters logins.
fn check_account_password(password: &str, hash: &str, is_active: bool) -> AppResult<()> {
    let valid = verify_password(password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(invalid_credentials());
    }
    if !is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }
    Ok(())
}

fn token_response(state: &AppState, principal: PrincipalInfo) -> AppResult<TokenResponse> {
    let access_token = generate_access_token(principal.kind, principal.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.expires_in_secs(),
        principal,
    })
}
