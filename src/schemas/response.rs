use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::time::format_primitive;
use crate::db::models::{StudentResponse, StudentResponseDetails};
use crate::db::types::ResponseStatus;
use crate::schemas::payload::lenient_i32;

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseCreate {
    #[serde(default, rename = "GeneratedExamID", deserialize_with = "lenient_i32")]
    pub(crate) generated_exam_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) student_id: Option<i32>,
    #[serde(default, rename = "Responses")]
    pub(crate) responses: Option<Value>,
    #[serde(default, rename = "Score", deserialize_with = "lenient_i32")]
    pub(crate) score: Option<i32>,
}

/// `exam_id` names the generated exam the responses belong to.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseQuery {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) student_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) exam_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewCreate {
    #[serde(default, rename = "ResponseID", deserialize_with = "lenient_i32")]
    pub(crate) response_id: Option<i32>,
    #[serde(default, rename = "ReviewedByTeacher", deserialize_with = "lenient_i32")]
    pub(crate) reviewed_by_teacher: Option<i32>,
    #[serde(default, rename = "FinalScore", deserialize_with = "lenient_i32")]
    pub(crate) final_score: Option<i32>,
    #[serde(default, rename = "Comments")]
    pub(crate) comments: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReviewQuery {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) teacher_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub(crate) student_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponseBody {
    #[serde(rename = "ResponseID")]
    pub(crate) response_id: i32,
    #[serde(rename = "GeneratedExamID")]
    pub(crate) generated_exam_id: Option<i32>,
    pub(crate) student_id: Option<i32>,
    #[serde(rename = "Responses")]
    pub(crate) responses: Option<String>,
    #[serde(rename = "Score")]
    pub(crate) score: Option<i32>,
    #[serde(rename = "SubmittedAt")]
    pub(crate) submitted_at: String,
    #[serde(rename = "IsReviewed")]
    pub(crate) is_reviewed: bool,
    #[serde(rename = "ReviewedByTeacher")]
    pub(crate) reviewed_by_teacher: Option<i32>,
    #[serde(rename = "Status")]
    pub(crate) status: ResponseStatus,
}

impl StudentResponseBody {
    pub(crate) fn from_db(response: StudentResponse) -> Self {
        Self {
            response_id: response.response_id,
            generated_exam_id: response.generated_exam_id,
            student_id: response.student_id,
            responses: response.responses,
            score: response.score,
            submitted_at: format_primitive(response.submitted_at),
            is_reviewed: response.is_reviewed,
            reviewed_by_teacher: response.reviewed_by_teacher,
            status: ResponseStatus::from_flag(response.is_reviewed),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponseDetailsBody {
    #[serde(flatten)]
    pub(crate) response: StudentResponseBody,
    #[serde(rename = "StudentFName")]
    pub(crate) student_f_name: Option<String>,
    #[serde(rename = "StudentLName")]
    pub(crate) student_l_name: Option<String>,
    #[serde(rename = "ExamTitle")]
    pub(crate) exam_title: Option<String>,
    #[serde(rename = "ReviewedByFName")]
    pub(crate) reviewed_by_f_name: Option<String>,
    #[serde(rename = "ReviewedByLName")]
    pub(crate) reviewed_by_l_name: Option<String>,
}

impl StudentResponseDetailsBody {
    pub(crate) fn from_db(details: StudentResponseDetails) -> Self {
        Self {
            response: StudentResponseBody::from_db(details.response),
            student_f_name: details.student_f_name,
            student_l_name: details.student_l_name,
            exam_title: details.exam_title,
            reviewed_by_f_name: details.reviewed_by_f_name,
            reviewed_by_l_name: details.reviewed_by_l_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewResult {
    #[serde(flatten)]
    pub(crate) response: StudentResponseBody,
    #[serde(rename = "Comments")]
    pub(crate) comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn status_follows_review_flag() {
        let response = StudentResponse {
            response_id: 1,
            generated_exam_id: Some(2),
            student_id: Some(3),
            responses: Some("[]".to_string()),
            score: None,
            submitted_at: datetime!(2025-02-03 04:05:06),
            is_reviewed: true,
            reviewed_by_teacher: Some(9),
        };
        let value = serde_json::to_value(StudentResponseBody::from_db(response)).unwrap();
        assert_eq!(value["Status"], "reviewed");
        assert_eq!(value["Score"], serde_json::Value::Null);
        assert_eq!(value["ReviewedByTeacher"], 9);
    }
}
