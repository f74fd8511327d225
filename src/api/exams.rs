use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathId};
use crate::api::guards::{CurrentStaff, Principal};
use crate::api::response::ApiResponse;
use crate::api::validation::{required, validate_payload};
use crate::core::state::AppState;
use crate::db::types::Role;
use crate::repositories;
use crate::repositories::exams::{CreateExam, UpdateExam};
use crate::schemas::exam::{ExamCreate, ExamDeleted, ExamResponse, ExamUpdate};
use crate::schemas::payload::{blob_text, non_blank};

const NOT_FOUND: &str = "Exam not found";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(fetch).put(update).delete(remove))
}

/// Admin principals author on their own behalf unless the body names someone.
fn default_author(principal: &Principal, requested: Option<i32>) -> Option<i32> {
    requested.or(match principal.role {
        Role::Admin => Some(principal.id()),
        Role::Teacher | Role::Student => None,
    })
}

async fn create(
    State(state): State<AppState>,
    CurrentStaff(principal): CurrentStaff,
    JsonBody(payload): JsonBody<ExamCreate>,
) -> Result<ApiResponse<ExamResponse>, ApiError> {
    validate_payload(&payload)?;

    let message = "Title, Duration, Marks and Questions are required";
    let title = required(non_blank(payload.title), message)?;
    let duration = required(payload.duration, message)?;
    let marks = required(payload.marks, message)?;

    // A question bank reference freezes a copy of its questions into the exam.
    let questions = match payload.question_bank_id {
        Some(q_id) => {
            let bank = repositories::question_bank::find_by_id(state.db(), q_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to fetch question bank"))?;
            let Some(bank) = bank else {
                return Err(ApiError::not_found("Question Bank not found"));
            };
            bank.questions
        }
        None => required(blob_text(payload.questions.as_ref()), message)?,
    };

    let exam = repositories::exams::create(
        state.db(),
        CreateExam {
            title: &title,
            duration,
            marks,
            questions: &questions,
            created_by_admin: default_author(&principal, payload.created_by_admin),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create exam"))?;

    tracing::info!(
        action = "exam_created",
        role = principal.role.as_str(),
        principal_id = principal.id(),
        exam_id = exam.exam_id,
        "Exam created"
    );

    Ok(ApiResponse::created(ExamResponse::from_db(exam), "Exam created successfully"))
}

async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<ExamResponse>>, ApiError> {
    let exams = repositories::exams::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list exams"))?;

    Ok(ApiResponse::ok(
        exams.into_iter().map(ExamResponse::from_db).collect(),
        "Exams fetched successfully",
    ))
}

async fn fetch(
    State(state): State<AppState>,
    PathId(exam_id): PathId,
) -> Result<ApiResponse<ExamResponse>, ApiError> {
    let exam = repositories::exams::find_by_id(state.db(), exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam"))?;

    let Some(exam) = exam else {
        return Err(ApiError::not_found(NOT_FOUND));
    };

    Ok(ApiResponse::ok(ExamResponse::from_db(exam), "Exam fetched successfully"))
}

async fn update(
    State(state): State<AppState>,
    CurrentStaff(principal): CurrentStaff,
    PathId(exam_id): PathId,
    JsonBody(payload): JsonBody<ExamUpdate>,
) -> Result<ApiResponse<ExamResponse>, ApiError> {
    validate_payload(&payload)?;

    let title = non_blank(payload.title);
    let questions = blob_text(payload.questions.as_ref());

    let exam = repositories::exams::update(
        state.db(),
        exam_id,
        UpdateExam {
            title: title.as_deref(),
            duration: payload.duration,
            marks: payload.marks,
            questions: questions.as_deref(),
            created_by_admin: payload.created_by_admin,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update exam"))?;

    let Some(exam) = exam else {
        return Err(ApiError::not_found(NOT_FOUND));
    };

    tracing::info!(
        action = "exam_updated",
        role = principal.role.as_str(),
        principal_id = principal.id(),
        exam_id,
        "Exam updated"
    );

    Ok(ApiResponse::ok(ExamResponse::from_db(exam), "Exam updated successfully"))
}

async fn remove(
    State(state): State<AppState>,
    CurrentStaff(principal): CurrentStaff,
    PathId(exam_id): PathId,
) -> Result<ApiResponse<ExamDeleted>, ApiError> {
    let deleted = repositories::exams::delete(state.db(), exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete exam"))?;
    if !deleted {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    tracing::info!(
        action = "exam_deleted",
        role = principal.role.as_str(),
        principal_id = principal.id(),
        exam_id,
        "Exam deleted"
    );

    Ok(ApiResponse::ok(ExamDeleted { exam_id }, "Exam deleted successfully"))
}
