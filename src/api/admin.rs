use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;

use crate::api::accounts;
use crate::api::allocations;
use crate::api::errors::ApiError;
use crate::api::extract::JsonBody;
use crate::api::guards::CurrentAdmin;
use crate::api::response::ApiResponse;
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
        .route("/allocate-teachers", post(allocations::allocate_teacher))
        .route("/teacher-allocations", get(allocations::list_teacher_allocations))
        .route("/teacher-allocations/:id", get(allocations::get_teacher_allocation))
        .route("/allocate-students", post(allocations::allocate_student))
        .route("/student-allocations", get(allocations::list_student_allocations))
        .route("/student-allocations/:id", get(allocations::get_student_allocation))
}

async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProfileRequest>,
) -> Result<ApiResponse<AccountResponse>, ApiError> {
    if !state.settings().admin().open_registration {
        return Err(ApiError::Forbidden("Admin registration is closed"));
    }

    accounts::register(&state, Role::Admin, payload).await
}

async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    accounts::login(&state, Role::Admin, payload).await
}

async fn logout(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
) -> Result<Response, ApiError> {
    accounts::logout(&state, Role::Admin, &admin)
}

async fn me(CurrentAdmin(admin): CurrentAdmin) -> ApiResponse<AccountResponse> {
    accounts::me(Role::Admin, admin)
}

async fn update(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    JsonBody(payload): JsonBody<ProfileRequest>,
) -> Result<ApiResponse<AccountResponse>, ApiError> {
    accounts::update(&state, Role::Admin, admin, payload).await
}
