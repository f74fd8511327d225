use axum::extract::State;
use axum::routing::get;
use axum::Router;
use time::PrimitiveDateTime;

use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathId};
use crate::api::guards::CurrentAdmin;
use crate::api::response::ApiResponse;
use crate::api::validation::{required, validate_payload};
use crate::core::state::AppState;
use crate::core::time::{parse_timestamp, primitive_now_utc};
use crate::db;
use crate::repositories;
use crate::repositories::generated_exams::{CreateGeneratedExam, UpdateGeneratedExam};
use crate::schemas::generated_exam::{
    GeneratedExamDeleted, GeneratedExamListItem, GeneratedExamResponse, GeneratedExamWrite,
};
use crate::schemas::payload::non_blank;

const NOT_FOUND: &str = "Generated Exam not found";
const CODE_TAKEN: &str = "Exam code already exists.";
const INVALID_SOURCE: &str = "Invalid SourceExamID provided.";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(fetch).put(update).delete(remove))
}

fn parse_schedule(raw: Option<String>) -> Result<Option<PrimitiveDateTime>, ApiError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw).map(Some).ok_or_else(|| {
            ApiError::BadRequest(format!("Invalid ScheduledDateTime: {raw}"))
        }),
    }
}

async fn ensure_code_free(
    state: &AppState,
    code: &str,
    excluding: Option<i32>,
) -> Result<(), ApiError> {
    let taken = repositories::generated_exams::code_taken(state.db(), code, excluding)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check exam code"))?;
    if taken {
        return Err(ApiError::Conflict(CODE_TAKEN.to_string()));
    }
    Ok(())
}

async fn ensure_source_exists(state: &AppState, source_exam_id: i32) -> Result<(), ApiError> {
    let exists = repositories::exams::exists(state.db(), source_exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check source exam"))?;
    if !exists {
        return Err(ApiError::bad_request(INVALID_SOURCE));
    }
    Ok(())
}

/// The store's unique index on `code` backs the pre-check above.
fn map_write_error(err: sqlx::Error, context: &str) -> ApiError {
    if db::is_unique_violation(&err) {
        ApiError::Conflict(CODE_TAKEN.to_string())
    } else {
        ApiError::internal(err, context)
    }
}

async fn create(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    JsonBody(payload): JsonBody<GeneratedExamWrite>,
) -> Result<ApiResponse<GeneratedExamResponse>, ApiError> {
    validate_payload(&payload)?;

    let message = "Title, Code, SourceExamID, Duration and TotalMarks are required";
    let title = required(non_blank(payload.title), message)?;
    let code = required(non_blank(payload.code), message)?;
    let source_exam_id = required(payload.source_exam_id, message)?;
    let duration = required(payload.duration, message)?;
    let total_marks = required(payload.total_marks, message)?;
    let scheduled_date_time = parse_schedule(payload.scheduled_date_time)?;

    ensure_code_free(&state, &code, None).await?;
    ensure_source_exists(&state, source_exam_id).await?;

    let exam = repositories::generated_exams::create(
        state.db(),
        CreateGeneratedExam {
            title: &title,
            code: &code,
            source_exam_id,
            created_by_admin: Some(payload.created_by_admin.unwrap_or(admin.id)),
            duration,
            total_marks,
            scheduled_date_time,
            calculator_allowed: payload.calculator_allowed.unwrap_or(false),
        },
    )
    .await
    .map_err(|e| map_write_error(e, "Failed to create generated exam"))?;

    tracing::info!(
        action = "generated_exam_created",
        admin_id = admin.id,
        generated_exam_id = exam.generated_exam_id,
        code = %exam.code,
        source_exam_id,
        "Generated exam created"
    );

    Ok(ApiResponse::created(
        GeneratedExamResponse::from_db(exam),
        "Generated exam created successfully",
    ))
}

async fn list(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> Result<ApiResponse<Vec<GeneratedExamListItem>>, ApiError> {
    let exams = repositories::generated_exams::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list generated exams"))?;

    Ok(ApiResponse::ok(
        exams.into_iter().map(GeneratedExamListItem::from_db).collect(),
        "Generated exams fetched successfully",
    ))
}

async fn fetch(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    PathId(generated_exam_id): PathId,
) -> Result<ApiResponse<GeneratedExamListItem>, ApiError> {
    let exam = repositories::generated_exams::find_listing(state.db(), generated_exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch generated exam"))?;

    let Some(exam) = exam else {
        return Err(ApiError::not_found(NOT_FOUND));
    };

    Ok(ApiResponse::ok(GeneratedExamListItem::from_db(exam), "Generated exam fetched successfully"))
}

async fn update(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    PathId(generated_exam_id): PathId,
    JsonBody(payload): JsonBody<GeneratedExamWrite>,
) -> Result<ApiResponse<GeneratedExamResponse>, ApiError> {
    validate_payload(&payload)?;

    let exists = repositories::generated_exams::exists(state.db(), generated_exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch generated exam"))?;
    if !exists {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    let title = non_blank(payload.title);
    let code = non_blank(payload.code);
    let scheduled_date_time = parse_schedule(payload.scheduled_date_time)?;

    if let Some(code) = code.as_deref() {
        ensure_code_free(&state, code, Some(generated_exam_id)).await?;
    }
    if let Some(source_exam_id) = payload.source_exam_id {
        ensure_source_exists(&state, source_exam_id).await?;
    }

    let exam = repositories::generated_exams::update(
        state.db(),
        generated_exam_id,
        UpdateGeneratedExam {
            title: title.as_deref(),
            code: code.as_deref(),
            source_exam_id: payload.source_exam_id,
            created_by_admin: payload.created_by_admin,
            duration: payload.duration,
            total_marks: payload.total_marks,
            scheduled_date_time,
            calculator_allowed: payload.calculator_allowed,
        },
        primitive_now_utc(),
    )
    .await
    .map_err(|e| map_write_error(e, "Failed to update generated exam"))?;

    // Deleted between the existence check and the update.
    let Some(exam) = exam else {
        return Err(ApiError::not_found(NOT_FOUND));
    };

    tracing::info!(
        action = "generated_exam_updated",
        admin_id = admin.id,
        generated_exam_id,
        "Generated exam updated"
    );

    Ok(ApiResponse::ok(GeneratedExamResponse::from_db(exam), "Generated exam updated successfully"))
}

async fn remove(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    PathId(generated_exam_id): PathId,
) -> Result<ApiResponse<GeneratedExamDeleted>, ApiError> {
    let deleted = repositories::generated_exams::delete(state.db(), generated_exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete generated exam"))?;
    if !deleted {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    tracing::info!(
        action = "generated_exam_deleted",
        admin_id = admin.id,
        generated_exam_id,
        "Generated exam deleted"
    );

    Ok(ApiResponse::ok(
        GeneratedExamDeleted { generated_exam_id },
        "Generated exam deleted successfully",
    ))
}
