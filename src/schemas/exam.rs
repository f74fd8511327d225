use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Exam;
use crate::schemas::payload::lenient_i32;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamCreate {
    #[serde(default, rename = "Title")]
    pub(crate) title: Option<String>,
    #[serde(default, rename = "Duration", deserialize_with = "lenient_i32")]
    #[validate(range(min = 1, message = "Duration must be a positive number of minutes"))]
    pub(crate) duration: Option<i32>,
    #[serde(default, rename = "Marks", deserialize_with = "lenient_i32")]
    #[validate(range(min = 1, message = "Marks must be positive"))]
    pub(crate) marks: Option<i32>,
    #[serde(default, rename = "Questions")]
    pub(crate) questions: Option<Value>,
    #[serde(default, rename = "QuestionBankID", alias = "Q_ID", deserialize_with = "lenient_i32")]
    pub(crate) question_bank_id: Option<i32>,
    #[serde(default, rename = "CreatedByAdmin", deserialize_with = "lenient_i32")]
    pub(crate) created_by_admin: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamUpdate {
    #[serde(default, rename = "Title")]
    pub(crate) title: Option<String>,
    #[serde(default, rename = "Duration", deserialize_with = "lenient_i32")]
    #[validate(range(min = 1, message = "Duration must be a positive number of minutes"))]
    pub(crate) duration: Option<i32>,
    #[serde(default, rename = "Marks", deserialize_with = "lenient_i32")]
    #[validate(range(min = 1, message = "Marks must be positive"))]
    pub(crate) marks: Option<i32>,
    #[serde(default, rename = "Questions")]
    pub(crate) questions: Option<Value>,
    #[serde(default, rename = "CreatedByAdmin", deserialize_with = "lenient_i32")]
    pub(crate) created_by_admin: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResponse {
    pub(crate) exam_id: i32,
    #[serde(rename = "Title")]
    pub(crate) title: String,
    #[serde(rename = "Duration")]
    pub(crate) duration: i32,
    #[serde(rename = "Marks")]
    pub(crate) marks: i32,
    #[serde(rename = "Questions")]
    pub(crate) questions: String,
    #[serde(rename = "CreatedAt")]
    pub(crate) created_at: String,
    #[serde(rename = "CreatedByAdmin")]
    pub(crate) created_by_admin: Option<i32>,
}

impl ExamResponse {
    pub(crate) fn from_db(exam: Exam) -> Self {
        Self {
            exam_id: exam.exam_id,
            title: exam.title,
            duration: exam.duration,
            marks: exam.marks,
            questions: exam.questions,
            created_at: format_primitive(exam.created_at),
            created_by_admin: exam.created_by_admin,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamDeleted {
    pub(crate) exam_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_duration_fails_validation() {
        let payload: ExamCreate =
            serde_json::from_value(json!({ "Title": "t", "Duration": 0, "Marks": "10" })).unwrap();
        assert_eq!(payload.marks, Some(10));
        assert!(payload.validate().is_err());
    }

    #[test]
    fn absent_numbers_pass_validation() {
        let payload: ExamUpdate = serde_json::from_value(json!({ "Title": "renamed" })).unwrap();
        assert!(payload.validate().is_ok());
    }
}
