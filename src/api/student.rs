use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;

use crate::api::accounts;
use crate::api::errors::ApiError;
use crate::api::extract::JsonBody;
use crate::api::guards::CurrentStudent;
use crate::api::response::ApiResponse;
use crate::api::responses;
use crate::core::state::AppState;
use crate::db::types::Role;
use crate::schemas::account::{AccountResponse, LoginRequest, ProfileRequest};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/update", put(update))
        .route("/responses", post(responses::submit).get(responses::list))
        .route("/responses/:id", get(responses::get))
}

async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProfileRequest>,
) -> Result<ApiResponse<AccountResponse>, ApiError> {
    accounts::register(&state, Role::Student, payload).await
}

async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    accounts::login(&state, Role::Student, payload).await
}

async fn logout(
    State(state): State<AppState>,
    CurrentStudent(student): CurrentStudent,
) -> Result<Response, ApiError> {
    accounts::logout(&state, Role::Student, &student)
}

async fn me(CurrentStudent(student): CurrentStudent) -> ApiResponse<AccountResponse> {
    accounts::me(Role::Student, student)
}

async fn update(
    State(state): State<AppState>,
    CurrentStudent(student): CurrentStudent,
    JsonBody(payload): JsonBody<ProfileRequest>,
) -> Result<ApiResponse<AccountResponse>, ApiError> {
    accounts::update(&state, Role::Student, student, payload).await
}
