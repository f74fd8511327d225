use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;

use crate::api::errors::ApiError;
use crate::api::session;
use crate::core::{security, state::AppState};
use crate::db::models::Account;
use crate::db::types::Role;
use crate::repositories;

/// An authenticated account together with the role it signed in as.
#[derive(Debug, Clone)]
pub(crate) struct Principal {
    pub(crate) role: Role,
    pub(crate) account: Account,
}

impl Principal {
    pub(crate) fn id(&self) -> i32 {
        self.account.id
    }
}

pub(crate) struct CurrentAdmin(pub(crate) Account);
pub(crate) struct CurrentTeacher(pub(crate) Account);
pub(crate) struct CurrentStudent(pub(crate) Account);
/// Admin or teacher.
pub(crate) struct CurrentStaff(pub(crate) Principal);
/// Any signed-in role.
pub(crate) struct CurrentPrincipal(pub(crate) Principal);

const STAFF: &[Role] = &[Role::Admin, Role::Teacher];
const EVERYONE: &[Role] = &[Role::Admin, Role::Teacher, Role::Student];

/// Resolves the request's token to a live principal whose role is in
/// `allowed`. The cookie is consulted before the `Authorization` header, and
/// the account row is re-read on every request.
async fn authenticate(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[Role],
) -> Result<Principal, ApiError> {
    let State(app_state) = State::<AppState>::from_request_parts(parts, state)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;
    let settings = app_state.settings();

    let candidates: Vec<String> =
        [session::cookie_token(&parts.headers, &settings.session().name), session::bearer_token(&parts.headers)]
            .into_iter()
            .flatten()
            .collect();
    if candidates.is_empty() {
        return Err(ApiError::Unauthorized("Unauthorized: No token provided".to_string()));
    }

    let claims = candidates
        .iter()
        .find_map(|token| security::verify_token(token, allowed, settings).ok())
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized: Invalid or expired token".to_string()))?;
    let Some(principal_id) = claims.principal_id() else {
        return Err(ApiError::Unauthorized("Unauthorized: Invalid or expired token".to_string()));
    };

    let account = repositories::accounts::find_by_id(app_state.db(), claims.role, principal_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load principal"))?;

    let Some(account) = account else {
        return Err(ApiError::Unauthorized(format!(
            "Unauthorized: {} not found",
            claims.role.label()
        )));
    };

    Ok(Principal { role: claims.role, account })
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state, &[Role::Admin]).await.map(|principal| Self(principal.account))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentTeacher {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state, &[Role::Teacher]).await.map(|principal| Self(principal.account))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state, &[Role::Student]).await.map(|principal| Self(principal.account))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStaff {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state, STAFF).await.map(Self)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state, EVERYONE).await.map(Self)
    }
}
