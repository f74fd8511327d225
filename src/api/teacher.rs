use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;

use crate::api::accounts;
use crate::api::errors::ApiError;
use crate::api::extract::JsonBody;
use crate::api::guards::CurrentTeacher;
use crate::api::response::ApiResponse;
use crate::api::reviews;
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
        .route(
            "/reviewedResponses",
            post(reviews::review_response).get(reviews::list_reviewed_responses),
        )
}

async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProfileRequest>,
) -> Result<ApiResponse<AccountResponse>, ApiError> {
    accounts::register(&state, Role::Teacher, payload).await
}

async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    accounts::login(&state, Role::Teacher, payload).await
}

async fn logout(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
) -> Result<Response, ApiError> {
    accounts::logout(&state, Role::Teacher, &teacher)
}

async fn me(CurrentTeacher(teacher): CurrentTeacher) -> ApiResponse<AccountResponse> {
    accounts::me(Role::Teacher, teacher)
}

async fn update(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    JsonBody(payload): JsonBody<ProfileRequest>,
) -> Result<ApiResponse<AccountResponse>, ApiError> {
    accounts::update(&state, Role::Teacher, teacher, payload).await
}
