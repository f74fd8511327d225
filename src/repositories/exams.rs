use sqlx::PgPool;

use crate::db::models::Exam;

const COLUMNS: &str = "exam_id, title, duration, marks, questions, created_at, created_by_admin";

pub(crate) struct CreateExam<'a> {
    pub title: &'a str,
    pub duration: i32,
    pub marks: i32,
    pub questions: &'a str,
    pub created_by_admin: Option<i32>,
}

pub(crate) async fn create(pool: &PgPool, params: CreateExam<'_>) -> Result<Exam, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "INSERT INTO exams (title, duration, marks, questions, created_by_admin)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}"
    ))
    .bind(params.title)
    .bind(params.duration)
    .bind(params.marks)
    .bind(params.questions)
    .bind(params.created_by_admin)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams ORDER BY created_at DESC, exam_id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE exam_id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM exams WHERE exam_id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

#[derive(Default)]
pub(crate) struct UpdateExam<'a> {
    pub title: Option<&'a str>,
    pub duration: Option<i32>,
    pub marks: Option<i32>,
    pub questions: Option<&'a str>,
    pub created_by_admin: Option<i32>,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: i32,
    params: UpdateExam<'_>,
) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "UPDATE exams SET
            title = COALESCE($1, title),
            duration = COALESCE($2, duration),
            marks = COALESCE($3, marks),
            questions = COALESCE($4, questions),
            created_by_admin = COALESCE($5, created_by_admin)
         WHERE exam_id = $6
         RETURNING {COLUMNS}"
    ))
    .bind(params.title)
    .bind(params.duration)
    .bind(params.marks)
    .bind(params.questions)
    .bind(params.created_by_admin)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Generated exams and allocations go with the exam through FK cascades.
pub(crate) async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM exams WHERE exam_id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
