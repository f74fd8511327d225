use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::models::{StudentExamAllocation, TeacherExamAllocation};
use crate::schemas::payload::lenient_i32;

#[derive(Debug, Deserialize)]
pub(crate) struct TeacherAllocationCreate {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) teacher_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) exam_id: Option<i32>,
    #[serde(default, rename = "AllocatedByAdmin", deserialize_with = "lenient_i32")]
    pub(crate) allocated_by_admin: Option<i32>,
    #[serde(default, rename = "AllocatedStudentIDs")]
    pub(crate) allocated_student_ids: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentAllocationCreate {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) student_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) exam_id: Option<i32>,
    #[serde(default, rename = "AllocatedByAdmin", deserialize_with = "lenient_i32")]
    pub(crate) allocated_by_admin: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TeacherAllocationQuery {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) teacher_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) exam_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StudentAllocationQuery {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) student_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) exam_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AllocationCreated {
    #[serde(rename = "AllocationID")]
    pub(crate) allocation_id: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct TeacherAllocationResponse {
    #[serde(rename = "AllocationID")]
    pub(crate) allocation_id: i32,
    pub(crate) teacher_id: Option<i32>,
    pub(crate) exam_id: Option<i32>,
    #[serde(rename = "AllocatedByAdmin")]
    pub(crate) allocated_by_admin: Option<i32>,
    #[serde(rename = "AllocatedStudentIDs")]
    pub(crate) allocated_student_ids: Option<String>,
}

impl TeacherAllocationResponse {
    pub(crate) fn from_db(allocation: TeacherExamAllocation) -> Self {
        Self {
            allocation_id: allocation.allocation_id,
            teacher_id: allocation.teacher_id,
            exam_id: allocation.exam_id,
            allocated_by_admin: allocation.allocated_by_admin,
            allocated_student_ids: allocation.allocated_student_ids,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentAllocationResponse {
    #[serde(rename = "AllocationID")]
    pub(crate) allocation_id: i32,
    pub(crate) student_id: Option<i32>,
    pub(crate) exam_id: Option<i32>,
    #[serde(rename = "AllocatedByAdmin")]
    pub(crate) allocated_by_admin: Option<i32>,
}

impl StudentAllocationResponse {
    pub(crate) fn from_db(allocation: StudentExamAllocation) -> Self {
        Self {
            allocation_id: allocation.allocation_id,
            student_id: allocation.student_id,
            exam_id: allocation.exam_id,
            allocated_by_admin: allocation.allocated_by_admin,
        }
    }
}
