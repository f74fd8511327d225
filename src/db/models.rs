use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

/// One row of `admins`, `teachers` or `students`. Admin and teacher queries
/// select NULL for the student-only columns.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct Account {
    pub(crate) id: i32,
    pub(crate) f_name: String,
    pub(crate) m_name: Option<String>,
    pub(crate) l_name: String,
    pub(crate) email: String,
    pub(crate) phone: Option<String>,
    pub(crate) dob: Option<Date>,
    pub(crate) age: Option<i32>,
    pub(crate) hashed_password: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct QuestionBank {
    pub(crate) q_id: i32,
    pub(crate) title: String,
    pub(crate) questions: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Exam {
    pub(crate) exam_id: i32,
    pub(crate) title: String,
    pub(crate) duration: i32,
    pub(crate) marks: i32,
    pub(crate) questions: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) created_by_admin: Option<i32>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct GeneratedExam {
    pub(crate) generated_exam_id: i32,
    pub(crate) title: String,
    pub(crate) code: String,
    pub(crate) source_exam_id: i32,
    pub(crate) created_by_admin: Option<i32>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) duration: i32,
    pub(crate) total_marks: i32,
    pub(crate) scheduled_date_time: Option<PrimitiveDateTime>,
    pub(crate) calculator_allowed: bool,
}

/// Generated exam decorated with its source exam title and creator name.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct GeneratedExamListing {
    #[sqlx(flatten)]
    pub(crate) exam: GeneratedExam,
    pub(crate) source_exam_title: Option<String>,
    pub(crate) created_by: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct TeacherExamAllocation {
    pub(crate) allocation_id: i32,
    pub(crate) teacher_id: Option<i32>,
    pub(crate) exam_id: Option<i32>,
    pub(crate) allocated_by_admin: Option<i32>,
    pub(crate) allocated_student_ids: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct StudentExamAllocation {
    pub(crate) allocation_id: i32,
    pub(crate) student_id: Option<i32>,
    pub(crate) exam_id: Option<i32>,
    pub(crate) allocated_by_admin: Option<i32>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct StudentResponse {
    pub(crate) response_id: i32,
    pub(crate) generated_exam_id: Option<i32>,
    pub(crate) student_id: Option<i32>,
    pub(crate) responses: Option<String>,
    pub(crate) score: Option<i32>,
    pub(crate) submitted_at: PrimitiveDateTime,
    pub(crate) is_reviewed: bool,
    pub(crate) reviewed_by_teacher: Option<i32>,
}

/// Student response joined with student, generated exam and reviewer names.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct StudentResponseDetails {
    #[sqlx(flatten)]
    pub(crate) response: StudentResponse,
    pub(crate) student_f_name: Option<String>,
    pub(crate) student_l_name: Option<String>,
    pub(crate) exam_title: Option<String>,
    pub(crate) reviewed_by_f_name: Option<String>,
    pub(crate) reviewed_by_l_name: Option<String>,
}
