//! Registration, login and profile handling shared by the three roles. The
//! role modules wire these behind their own guards.

use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::api::errors::ApiError;
use crate::api::response::ApiResponse;
use crate::api::session;
use crate::api::validation::{
    required, validate_age, validate_dob, validate_email, validate_phone, ALL_FIELDS_REQUIRED,
};
use crate::core::{metrics, redis, security, state::AppState};
use crate::db;
use crate::db::models::Account;
use crate::db::types::Role;
use crate::repositories;
use crate::repositories::accounts::AccountFields;
use crate::schemas::account::{AccountResponse, LoginRequest, LoginResponse, ProfileRequest};
use crate::schemas::payload::non_blank;

/// Max attempts per window for login and registration.
const AUTH_RATE_LIMIT: u64 = 10;
/// Rate limit window in seconds.
const AUTH_RATE_WINDOW_SECONDS: u64 = 60;

/// Normalised profile fields common to registration and update.
struct Profile {
    f_name: String,
    m_name: Option<String>,
    l_name: String,
    email: String,
    phone: String,
    password: String,
    dob: Option<time::Date>,
    age: Option<i32>,
}

impl Profile {
    fn parse(role: Role, payload: ProfileRequest) -> Result<Self, ApiError> {
        let ProfileRequest { f_name, m_name, l_name, email, phone, password, dob, age } = payload;
        let f_name = required(non_blank(f_name), ALL_FIELDS_REQUIRED)?;
        let l_name = required(non_blank(l_name), ALL_FIELDS_REQUIRED)?;
        let email = required(non_blank(email), ALL_FIELDS_REQUIRED)?;
        let phone = required(non_blank(phone), ALL_FIELDS_REQUIRED)?;
        let password = required(non_blank(password), ALL_FIELDS_REQUIRED)?;

        let (dob, age) = match role {
            Role::Student => {
                let dob = required(non_blank(dob), ALL_FIELDS_REQUIRED)?;
                let age = required(age, ALL_FIELDS_REQUIRED)?;
                validate_age(age)?;
                (Some(validate_dob(&dob)?), Some(age))
            }
            Role::Admin | Role::Teacher => (None, None),
        };

        validate_phone(&phone)?;

        Ok(Self { f_name, m_name: non_blank(m_name), l_name, email, phone, password, dob, age })
    }

    fn fields(&self, hashed_password: String) -> AccountFields<'_> {
        AccountFields {
            f_name: &self.f_name,
            m_name: self.m_name.as_deref(),
            l_name: &self.l_name,
            email: &self.email,
            phone: &self.phone,
            dob: self.dob,
            age: self.age,
            hashed_password,
        }
    }
}

async fn enforce_rate_limit(
    state: &AppState,
    key: &str,
    message: &'static str,
) -> Result<(), ApiError> {
    let allowed = state
        .redis()
        .rate_limit(key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if allowed {
        Ok(())
    } else {
        Err(ApiError::TooManyRequests(message))
    }
}

pub(super) async fn register(
    state: &AppState,
    role: Role,
    payload: ProfileRequest,
) -> Result<ApiResponse<AccountResponse>, ApiError> {
    let profile = Profile::parse(role, payload)?;

    enforce_rate_limit(
        state,
        &redis::register_key(role, &profile.email),
        "Too many registration attempts, try again later",
    )
    .await?;

    let duplicate = || ApiError::BadRequest(format!("{} already exists with this email", role.label()));

    let taken = repositories::accounts::email_taken(state.db(), role, &profile.email, None)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing account"))?;
    if taken {
        return Err(duplicate());
    }

    let hashed_password = security::hash_password(&profile.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let account = match repositories::accounts::create(state.db(), role, profile.fields(hashed_password)).await {
        Ok(account) => account,
        Err(err) if db::is_unique_violation(&err) => return Err(duplicate()),
        Err(err) => return Err(ApiError::internal(err, "Failed to create account")),
    };

    tracing::info!(
        action = "account_registered",
        role = role.as_str(),
        account_id = account.id,
        "Account registered"
    );

    Ok(ApiResponse::ok(
        AccountResponse::from_db(account),
        format!("{} registered successfully", role.label()),
    ))
}

pub(super) async fn login(
    state: &AppState,
    role: Role,
    payload: LoginRequest,
) -> Result<Response, ApiError> {
    let (Some(email), Some(password)) = (non_blank(payload.email), non_blank(payload.password))
    else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    enforce_rate_limit(
        state,
        &redis::login_key(role, &email),
        "Too many login attempts, try again later",
    )
    .await?;

    let account = repositories::accounts::find_by_email(state.db(), role, &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load account"))?;

    let Some(account) = account else {
        metrics::record_login(role, false);
        return Err(ApiError::Unauthorized(format!(
            "Invalid credentials: {} not found",
            role.label()
        )));
    };

    let verified = security::verify_password(&password, &account.hashed_password)
        .map_err(|e| ApiError::internal(e, "Failed to verify password"))?;
    if !verified {
        metrics::record_login(role, false);
        return Err(ApiError::Unauthorized("Invalid credentials: Incorrect password".to_string()));
    }

    let settings = state.settings();
    let token = security::create_access_token(role, account.id, &account.email, settings, None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;
    let cookie = session::issue_cookie(
        settings.session(),
        &token,
        settings.security().token(role).expire_minutes,
    )?;

    metrics::record_login(role, true);
    tracing::info!(action = "login", role = role.as_str(), account_id = account.id, "Signed in");

    let body = LoginResponse { account: AccountResponse::from_db(account), token };
    Ok(([(header::SET_COOKIE, cookie)], ApiResponse::ok(body, "Successfully logged in"))
        .into_response())
}

pub(super) fn logout(state: &AppState, role: Role, account: &Account) -> Result<Response, ApiError> {
    let cookie = session::clear_cookie(state.settings().session())?;
    tracing::info!(action = "logout", role = role.as_str(), account_id = account.id, "Signed out");

    Ok(([(header::SET_COOKIE, cookie)], ApiResponse::ok((), "Successfully logged out"))
        .into_response())
}

pub(super) fn me(role: Role, account: Account) -> ApiResponse<AccountResponse> {
    ApiResponse::ok(AccountResponse::from_db(account), format!("{} profile", role.label()))
}

pub(super) async fn update(
    state: &AppState,
    role: Role,
    account: Account,
    payload: ProfileRequest,
) -> Result<ApiResponse<AccountResponse>, ApiError> {
    let profile = Profile::parse(role, payload)?;
    // Registration accepts any address; only profile updates check the format.
    validate_email(&profile.email)?;

    let in_use = || ApiError::bad_request("Email already in use");

    let taken =
        repositories::accounts::email_taken(state.db(), role, &profile.email, Some(account.id))
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check email"))?;
    if taken {
        return Err(in_use());
    }

    let hashed_password = security::hash_password(&profile.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let updated = match repositories::accounts::update(
        state.db(),
        role,
        account.id,
        profile.fields(hashed_password),
    )
    .await
    {
        Ok(updated) => updated,
        Err(err) if db::is_unique_violation(&err) => return Err(in_use()),
        Err(err) => return Err(ApiError::internal(err, "Failed to update account")),
    };

    let Some(updated) = updated else {
        return Err(ApiError::NotFound(format!("{} not found", role.label())));
    };

    tracing::info!(
        action = "account_updated",
        role = role.as_str(),
        account_id = updated.id,
        "Account updated"
    );

    Ok(ApiResponse::ok(
        AccountResponse::from_db(updated),
        format!("{} updated successfully", role.label()),
    ))
}
