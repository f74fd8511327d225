use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathId};
use crate::api::guards::CurrentStaff;
use crate::api::response::ApiResponse;
use crate::api::validation::required;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::payload::{blob_text, non_blank};
use crate::schemas::question_bank::{
    QuestionBankDeleted, QuestionBankResponse, QuestionBankWrite,
};

const NOT_FOUND: &str = "Question Bank not found";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(fetch).put(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    CurrentStaff(principal): CurrentStaff,
    JsonBody(payload): JsonBody<QuestionBankWrite>,
) -> Result<ApiResponse<QuestionBankResponse>, ApiError> {
    let message = "Title and Questions are required";
    let title = required(non_blank(payload.title), message)?;
    let questions = required(blob_text(payload.questions.as_ref()), message)?;

    let bank = repositories::question_bank::create(state.db(), &title, &questions)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create question bank"))?;

    tracing::info!(
        action = "question_bank_created",
        role = principal.role.as_str(),
        principal_id = principal.id(),
        q_id = bank.q_id,
        "Question bank created"
    );

    Ok(ApiResponse::created(
        QuestionBankResponse::from_db(bank),
        "Question bank created successfully",
    ))
}

async fn list(
    State(state): State<AppState>,
    CurrentStaff(_principal): CurrentStaff,
) -> Result<ApiResponse<Vec<QuestionBankResponse>>, ApiError> {
    let banks = repositories::question_bank::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list question banks"))?;

    Ok(ApiResponse::ok(
        banks.into_iter().map(QuestionBankResponse::from_db).collect(),
        "Question banks fetched successfully",
    ))
}

async fn fetch(
    State(state): State<AppState>,
    CurrentStaff(_principal): CurrentStaff,
    PathId(q_id): PathId,
) -> Result<ApiResponse<QuestionBankResponse>, ApiError> {
    let bank = repositories::question_bank::find_by_id(state.db(), q_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question bank"))?;

    let Some(bank) = bank else {
        return Err(ApiError::not_found(NOT_FOUND));
    };

    Ok(ApiResponse::ok(QuestionBankResponse::from_db(bank), "Question bank fetched successfully"))
}

async fn update(
    State(state): State<AppState>,
    CurrentStaff(principal): CurrentStaff,
    PathId(q_id): PathId,
    JsonBody(payload): JsonBody<QuestionBankWrite>,
) -> Result<ApiResponse<QuestionBankResponse>, ApiError> {
    let title = non_blank(payload.title);
    let questions = blob_text(payload.questions.as_ref());
    if title.is_none() && questions.is_none() {
        return Err(ApiError::bad_request(
            "At least one field (Title or Questions) is required for update",
        ));
    }

    let bank = repositories::question_bank::update(
        state.db(),
        q_id,
        title.as_deref(),
        questions.as_deref(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update question bank"))?;

    let Some(bank) = bank else {
        return Err(ApiError::not_found(NOT_FOUND));
    };

    tracing::info!(
        action = "question_bank_updated",
        role = principal.role.as_str(),
        principal_id = principal.id(),
        q_id,
        "Question bank updated"
    );

    Ok(ApiResponse::ok(QuestionBankResponse::from_db(bank), "Question bank updated successfully"))
}

async fn remove(
    State(state): State<AppState>,
    CurrentStaff(principal): CurrentStaff,
    PathId(q_id): PathId,
) -> Result<ApiResponse<QuestionBankDeleted>, ApiError> {
    let deleted = repositories::question_bank::delete(state.db(), q_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete question bank"))?;
    if !deleted {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    tracing::info!(
        action = "question_bank_deleted",
        role = principal.role.as_str(),
        principal_id = principal.id(),
        q_id,
        "Question bank deleted"
    );

    Ok(ApiResponse::ok(QuestionBankDeleted { q_id }, "Question bank deleted successfully"))
}
