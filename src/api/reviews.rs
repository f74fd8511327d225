use axum::extract::State;

use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, Query};
use crate::api::guards::CurrentTeacher;
use crate::api::response::ApiResponse;
use crate::api::validation::required;
use crate::core::{metrics, state::AppState};
use crate::repositories;
use crate::repositories::responses::ResponseFilter;
use crate::schemas::payload::non_blank;
use crate::schemas::response::{
    ReviewCreate, ReviewQuery, ReviewResult, StudentResponseBody, StudentResponseDetailsBody,
};

/// Moves a response from submitted to reviewed. Reviewed is terminal.
pub(super) async fn review_response(
    State(state): State<AppState>,
    CurrentTeacher(teacher): CurrentTeacher,
    JsonBody(payload): JsonBody<ReviewCreate>,
) -> Result<ApiResponse<ReviewResult>, ApiError> {
    let message = "ResponseID and ReviewedByTeacher are required";
    let response_id = required(payload.response_id, message)?;
    let reviewed_by_teacher = required(payload.reviewed_by_teacher, message)?;

    let existing = repositories::responses::find_by_id(state.db(), response_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student response"))?;
    let Some(existing) = existing else {
        return Err(ApiError::not_found("Student response not found."));
    };
    if existing.is_reviewed {
        return Err(ApiError::Conflict("Student response has already been reviewed".to_string()));
    }

    let reviewed = repositories::responses::review(
        state.db(),
        response_id,
        reviewed_by_teacher,
        payload.final_score,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to review student response"))?;

    // A concurrent reviewer won between the read and the update.
    let Some(reviewed) = reviewed else {
        return Err(ApiError::Conflict("Student response has already been reviewed".to_string()));
    };

    metrics::record_submission(true);
    tracing::info!(
        action = "response_reviewed",
        teacher_id = teacher.id,
        reviewed_by_teacher,
        response_id,
        score = reviewed.score,
        "Student response reviewed"
    );

    Ok(ApiResponse::created(
        ReviewResult {
            response: StudentResponseBody::from_db(reviewed),
            comments: non_blank(payload.comments),
        },
        "Response reviewed successfully",
    ))
}

pub(super) async fn list_reviewed_responses(
    State(state): State<AppState>,
    CurrentTeacher(_teacher): CurrentTeacher,
    Query(params): Query<ReviewQuery>,
) -> Result<ApiResponse<Vec<StudentResponseDetailsBody>>, ApiError> {
    let filters: Vec<ResponseFilter> = [
        Some(ResponseFilter::Reviewed),
        params.teacher_id.map(ResponseFilter::ReviewedBy),
        params.student_id.map(ResponseFilter::Student),
    ]
    .into_iter()
    .flatten()
    .collect();

    let rows = repositories::responses::list(state.db(), &filters)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list reviewed responses"))?;

    Ok(ApiResponse::ok(
        rows.into_iter().map(StudentResponseDetailsBody::from_db).collect(),
        "Reviewed responses fetched successfully",
    ))
}
