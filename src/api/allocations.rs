use axum::extract::State;

use crate::api::errors::ApiError;
use crate::api::extract::{JsonBody, PathId, Query};
use crate::api::guards::CurrentAdmin;
use crate::api::response::ApiResponse;
use crate::api::validation::required;
use crate::core::state::AppState;
use crate::db;
use crate::repositories;
use crate::repositories::allocations::{StudentAllocationFilter, TeacherAllocationFilter};
use crate::schemas::allocation::{
    AllocationCreated, StudentAllocationCreate, StudentAllocationQuery, StudentAllocationResponse,
    TeacherAllocationCreate, TeacherAllocationQuery, TeacherAllocationResponse,
};
use crate::schemas::payload::blob_text;

const ALREADY_ALLOCATED: &str = "This student has already been allocated to the exam.";

pub(super) async fn allocate_teacher(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    JsonBody(payload): JsonBody<TeacherAllocationCreate>,
) -> Result<ApiResponse<AllocationCreated>, ApiError> {
    let message = "teacher_id, exam_id and AllocatedByAdmin are required";
    let teacher_id = required(payload.teacher_id, message)?;
    let exam_id = required(payload.exam_id, message)?;
    let allocated_by_admin = required(payload.allocated_by_admin, message)?;
    let student_ids = blob_text(payload.allocated_student_ids.as_ref());

    // Unknown teacher or exam ids are rejected by the foreign keys.
    let allocation = repositories::allocations::create_teacher_allocation(
        state.db(),
        teacher_id,
        exam_id,
        allocated_by_admin,
        student_ids.as_deref(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create teacher allocation"))?;

    tracing::info!(
        action = "teacher_allocated",
        admin_id = admin.id,
        allocation_id = allocation.allocation_id,
        teacher_id,
        exam_id,
        "Teacher allocated to exam"
    );

    Ok(ApiResponse::created(
        AllocationCreated { allocation_id: allocation.allocation_id },
        "Teacher exam allocation created successfully",
    ))
}

pub(super) async fn list_teacher_allocations(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Query(params): Query<TeacherAllocationQuery>,
) -> Result<ApiResponse<Vec<TeacherAllocationResponse>>, ApiError> {
    let filters: Vec<TeacherAllocationFilter> = [
        params.teacher_id.map(TeacherAllocationFilter::Teacher),
        params.exam_id.map(TeacherAllocationFilter::Exam),
    ]
    .into_iter()
    .flatten()
    .collect();

    let allocations = repositories::allocations::list_teacher_allocations(state.db(), &filters)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list teacher allocations"))?;

    Ok(ApiResponse::ok(
        allocations.into_iter().map(TeacherAllocationResponse::from_db).collect(),
        "Teacher exam allocations fetched successfully",
    ))
}

pub(super) async fn get_teacher_allocation(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    PathId(allocation_id): PathId,
) -> Result<ApiResponse<TeacherAllocationResponse>, ApiError> {
    let allocation = repositories::allocations::find_teacher_allocation(state.db(), allocation_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch teacher allocation"))?;

    let Some(allocation) = allocation else {
        return Err(ApiError::not_found("Teacher exam allocation not found"));
    };

    Ok(ApiResponse::ok(
        TeacherAllocationResponse::from_db(allocation),
        "Teacher exam allocation fetched successfully",
    ))
}

pub(super) async fn allocate_student(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    JsonBody(payload): JsonBody<StudentAllocationCreate>,
) -> Result<ApiResponse<AllocationCreated>, ApiError> {
    let message = "student_id, exam_id and AllocatedByAdmin are required";
    let student_id = required(payload.student_id, message)?;
    let exam_id = required(payload.exam_id, message)?;
    let allocated_by_admin = required(payload.allocated_by_admin, message)?;

    let exists =
        repositories::allocations::student_allocation_exists(state.db(), student_id, exam_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check student allocation"))?;
    if exists {
        return Err(ApiError::bad_request(ALREADY_ALLOCATED));
    }

    let allocation = match repositories::allocations::create_student_allocation(
        state.db(),
        student_id,
        exam_id,
        allocated_by_admin,
    )
    .await
    {
        Ok(allocation) => allocation,
        Err(err) if db::is_unique_violation(&err) => {
            return Err(ApiError::bad_request(ALREADY_ALLOCATED));
        }
        Err(err) => return Err(ApiError::internal(err, "Failed to create student allocation")),
    };

    tracing::info!(
        action = "student_allocated",
        admin_id = admin.id,
        allocation_id = allocation.allocation_id,
        student_id,
        exam_id,
        "Student allocated to exam"
    );

    Ok(ApiResponse::created(
        AllocationCreated { allocation_id: allocation.allocation_id },
        "Student exam allocation created successfully",
    ))
}

pub(super) async fn list_student_allocations(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    Query(params): Query<StudentAllocationQuery>,
) -> Result<ApiResponse<Vec<StudentAllocationResponse>>, ApiError> {
    let filters: Vec<StudentAllocationFilter> = [
        params.student_id.map(StudentAllocationFilter::Student),
        params.exam_id.map(StudentAllocationFilter::Exam),
    ]
    .into_iter()
    .flatten()
    .collect();

    let allocations = repositories::allocations::list_student_allocations(state.db(), &filters)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list student allocations"))?;

    Ok(ApiResponse::ok(
        allocations.into_iter().map(StudentAllocationResponse::from_db).collect(),
        "Student exam allocations fetched successfully",
    ))
}

pub(super) async fn get_student_allocation(
    State(state): State<AppState>,
    CurrentAdmin(_admin): CurrentAdmin,
    PathId(allocation_id): PathId,
) -> Result<ApiResponse<StudentAllocationResponse>, ApiError> {
    let allocation = repositories::allocations::find_student_allocation(state.db(), allocation_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student allocation"))?;

    let Some(allocation) = allocation else {
        return Err(ApiError::not_found("Student exam allocation not found"));
    };

    Ok(ApiResponse::ok(
        StudentAllocationResponse::from_db(allocation),
        "Student exam allocation fetched successfully",
    ))
}
