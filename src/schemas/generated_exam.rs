use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{GeneratedExam, GeneratedExamListing};
use crate::schemas::payload::{lenient_bool, lenient_i32};

/// Shared by create and update. Create enforces the required subset.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GeneratedExamWrite {
    #[serde(default, rename = "Title")]
    pub(crate) title: Option<String>,
    #[serde(default, rename = "Code")]
    pub(crate) code: Option<String>,
    #[serde(default, rename = "SourceExamID", deserialize_with = "lenient_i32")]
    pub(crate) source_exam_id: Option<i32>,
    #[serde(default, rename = "CreatedByAdmin", deserialize_with = "lenient_i32")]
    pub(crate) created_by_admin: Option<i32>,
    #[serde(default, rename = "Duration", deserialize_with = "lenient_i32")]
    #[validate(range(min = 1, message = "Duration must be a positive number of minutes"))]
    pub(crate) duration: Option<i32>,
    #[serde(default, rename = "TotalMarks", deserialize_with = "lenient_i32")]
    #[validate(range(min = 1, message = "TotalMarks must be positive"))]
    pub(crate) total_marks: Option<i32>,
    #[serde(default, rename = "ScheduledDateTime")]
    pub(crate) scheduled_date_time: Option<String>,
    #[serde(default, rename = "CalculatorAllowed", deserialize_with = "lenient_bool")]
    pub(crate) calculator_allowed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeneratedExamResponse {
    #[serde(rename = "GeneratedExamID")]
    pub(crate) generated_exam_id: i32,
    #[serde(rename = "Title")]
    pub(crate) title: String,
    #[serde(rename = "Code")]
    pub(crate) code: String,
    #[serde(rename = "SourceExamID")]
    pub(crate) source_exam_id: i32,
    #[serde(rename = "CreatedByAdmin")]
    pub(crate) created_by_admin: Option<i32>,
    #[serde(rename = "CreatedAt")]
    pub(crate) created_at: String,
    #[serde(rename = "UpdatedAt")]
    pub(crate) updated_at: String,
    #[serde(rename = "Duration")]
    pub(crate) duration: i32,
    #[serde(rename = "TotalMarks")]
    pub(crate) total_marks: i32,
    #[serde(rename = "ScheduledDateTime")]
    pub(crate) scheduled_date_time: Option<String>,
    #[serde(rename = "CalculatorAllowed")]
    pub(crate) calculator_allowed: bool,
}

impl GeneratedExamResponse {
    pub(crate) fn from_db(exam: GeneratedExam) -> Self {
        Self {
            generated_exam_id: exam.generated_exam_id,
            title: exam.title,
            code: exam.code,
            source_exam_id: exam.source_exam_id,
            created_by_admin: exam.created_by_admin,
            created_at: format_primitive(exam.created_at),
            updated_at: format_primitive(exam.updated_at),
            duration: exam.duration,
            total_marks: exam.total_marks,
            scheduled_date_time: exam.scheduled_date_time.map(format_primitive),
            calculator_allowed: exam.calculator_allowed,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GeneratedExamListItem {
    #[serde(flatten)]
    pub(crate) exam: GeneratedExamResponse,
    #[serde(rename = "SourceExamTitle")]
    pub(crate) source_exam_title: Option<String>,
    #[serde(rename = "CreatedBy")]
    pub(crate) created_by: Option<String>,
}

impl GeneratedExamListItem {
    pub(crate) fn from_db(listing: GeneratedExamListing) -> Self {
        Self {
            exam: GeneratedExamResponse::from_db(listing.exam),
            source_exam_title: listing.source_exam_title,
            created_by: listing.created_by,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GeneratedExamDeleted {
    #[serde(rename = "GeneratedExamID")]
    pub(crate) generated_exam_id: i32,
}
