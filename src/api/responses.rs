use axum::extract::State;

use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathId, Query};
use crate::api::guards::{CurrentPrincipal, CurrentStudent, Principal};
use crate::api::response::ApiResponse;
use crate::api::validation::required;
use crate::core::{metrics, state::AppState};
use crate::db::types::Role;
use crate::repositories;
use crate::repositories::responses::ResponseFilter;
use crate::schemas::payload::blob_text;
use crate::schemas::response::{
    ResponseCreate, ResponseQuery, StudentResponseBody, StudentResponseDetailsBody,
};

pub(super) async fn submit(
    State(state): State<AppState>,
    CurrentStudent(student): CurrentStudent,
    JsonBody(payload): JsonBody<ResponseCreate>,
) -> Result<ApiResponse<StudentResponseBody>, ApiError> {
    let message = "GeneratedExamID, student_id and Responses are required";
    let generated_exam_id = required(payload.generated_exam_id, message)?;
    let student_id = required(payload.student_id, message)?;
    let responses = required(blob_text(payload.responses.as_ref()), message)?;

    if student_id != student.id {
        return Err(ApiError::Forbidden("Students may only submit their own responses"));
    }

    let exam_exists = repositories::generated_exams::exists(state.db(), generated_exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check generated exam"))?;
    if !exam_exists {
        return Err(ApiError::not_found("Generated Exam not found"));
    }

    let student_exists = repositories::accounts::exists(state.db(), Role::Student, student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check student"))?;
    if !student_exists {
        return Err(ApiError::not_found("Student not found"));
    }

    let response = repositories::responses::create(
        state.db(),
        generated_exam_id,
        student_id,
        &responses,
        payload.score,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to store student response"))?;

    metrics::record_submission(false);
    tracing::info!(
        action = "response_submitted",
        student_id,
        generated_exam_id,
        response_id = response.response_id,
        "Student response submitted"
    );

    Ok(ApiResponse::created(
        StudentResponseBody::from_db(response),
        "Student response submitted successfully",
    ))
}

/// Listing filters for `principal`. Students are always pinned to their own
/// rows whatever the query asks for.
fn scoped_filters(principal: &Principal, query: &ResponseQuery) -> Vec<ResponseFilter> {
    let student_id = match principal.role {
        Role::Student => Some(principal.id()),
        Role::Admin | Role::Teacher => query.student_id,
    };

    [student_id.map(ResponseFilter::Student), query.exam_id.map(ResponseFilter::GeneratedExam)]
        .into_iter()
        .flatten()
        .collect()
}

pub(super) async fn list(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Query(params): Query<ResponseQuery>,
) -> Result<ApiResponse<Vec<StudentResponseDetailsBody>>, ApiError> {
    let filters = scoped_filters(&principal, &params);
    let rows = repositories::responses::list(state.db(), &filters)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list student responses"))?;

    Ok(ApiResponse::ok(
        rows.into_iter().map(StudentResponseDetailsBody::from_db).collect(),
        "Student responses fetched successfully",
    ))
}

pub(super) async fn get(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    PathId(response_id): PathId,
) -> Result<ApiResponse<StudentResponseDetailsBody>, ApiError> {
    let mut filters = scoped_filters(&principal, &ResponseQuery::default());
    filters.push(ResponseFilter::Response(response_id));

    let row = repositories::responses::list(state.db(), &filters)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student response"))?
        .into_iter()
        .next();

    let Some(row) = row else {
        return Err(ApiError::not_found("Student response not found."));
    };

    Ok(ApiResponse::ok(
        StudentResponseDetailsBody::from_db(row),
        "Student response fetched successfully",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Account;
    use time::macros::datetime;

    fn principal(role: Role, id: i32) -> Principal {
        Principal {
            role,
            account: Account {
                id,
                f_name: "F".to_string(),
                m_name: None,
                l_name: "L".to_string(),
                email: "x@example.com".to_string(),
                phone: None,
                dob: None,
                age: None,
                hashed_password: String::new(),
                created_at: datetime!(2025-01-01 00:00:00),
            },
        }
    }

    #[test]
    fn students_only_see_their_own_rows() {
        let query = ResponseQuery { student_id: Some(99), exam_id: Some(4) };
        let filters = scoped_filters(&principal(Role::Student, 7), &query);
        assert_eq!(filters, vec![ResponseFilter::Student(7), ResponseFilter::GeneratedExam(4)]);
    }

    #[test]
    fn staff_filters_follow_the_query() {
        let filters = scoped_filters(&principal(Role::Teacher, 1), &ResponseQuery::default());
        assert!(filters.is_empty());

        let query = ResponseQuery { student_id: Some(3), exam_id: None };
        let filters = scoped_filters(&principal(Role::Admin, 1), &query);
        assert_eq!(filters, vec![ResponseFilter::Student(3)]);
    }
}
