use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{GeneratedExam, GeneratedExamListing};

const COLUMNS: &str = "\
    generated_exam_id, title, code, source_exam_id, created_by_admin, created_at, updated_at, \
    duration, total_marks, scheduled_date_time, calculator_allowed";

const LISTING_SELECT: &str = "\
    SELECT g.generated_exam_id, g.title, g.code, g.source_exam_id, g.created_by_admin, \
           g.created_at, g.updated_at, g.duration, g.total_marks, g.scheduled_date_time, \
           g.calculator_allowed, \
           e.title AS source_exam_title, \
           a.f_name || ' ' || a.l_name AS created_by \
    FROM generated_exams g \
    LEFT JOIN exams e ON e.exam_id = g.source_exam_id \
    LEFT JOIN admins a ON a.admin_id = g.created_by_admin";

pub(crate) struct CreateGeneratedExam<'a> {
    pub title: &'a str,
    pub code: &'a str,
    pub source_exam_id: i32,
    pub created_by_admin: Option<i32>,
    pub duration: i32,
    pub total_marks: i32,
    pub scheduled_date_time: Option<PrimitiveDateTime>,
    pub calculator_allowed: bool,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateGeneratedExam<'_>,
) -> Result<GeneratedExam, sqlx::Error> {
    sqlx::query_as::<_, GeneratedExam>(&format!(
        "INSERT INTO generated_exams (
            title, code, source_exam_id, created_by_admin, duration, total_marks,
            scheduled_date_time, calculator_allowed
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
        RETURNING {COLUMNS}"
    ))
    .bind(params.title)
    .bind(params.code)
    .bind(params.source_exam_id)
    .bind(params.created_by_admin)
    .bind(params.duration)
    .bind(params.total_marks)
    .bind(params.scheduled_date_time)
    .bind(params.calculator_allowed)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<GeneratedExamListing>, sqlx::Error> {
    sqlx::query_as::<_, GeneratedExamListing>(&format!(
        "{LISTING_SELECT} ORDER BY g.created_at DESC, g.generated_exam_id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_listing(
    pool: &PgPool,
    id: i32,
) -> Result<Option<GeneratedExamListing>, sqlx::Error> {
    sqlx::query_as::<_, GeneratedExamListing>(&format!(
        "{LISTING_SELECT} WHERE g.generated_exam_id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn exists(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM generated_exams WHERE generated_exam_id = $1)",
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

/// True when `code` is used by a generated exam other than `excluding`.
pub(crate) async fn code_taken(
    pool: &PgPool,
    code: &str,
    excluding: Option<i32>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM generated_exams
            WHERE code = $1 AND ($2::int4 IS NULL OR generated_exam_id <> $2)
        )",
    )
    .bind(code)
    .bind(excluding)
    .fetch_one(pool)
    .await
}

#[derive(Default)]
pub(crate) struct UpdateGeneratedExam<'a> {
    pub title: Option<&'a str>,
    pub code: Option<&'a str>,
    pub source_exam_id: Option<i32>,
    pub created_by_admin: Option<i32>,
    pub duration: Option<i32>,
    pub total_marks: Option<i32>,
    pub scheduled_date_time: Option<PrimitiveDateTime>,
    pub calculator_allowed: Option<bool>,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: i32,
    params: UpdateGeneratedExam<'_>,
    now: PrimitiveDateTime,
) -> Result<Option<GeneratedExam>, sqlx::Error> {
    sqlx::query_as::<_, GeneratedExam>(&format!(
        "UPDATE generated_exams SET
            title = COALESCE($1, title),
            code = COALESCE($2, code),
            source_exam_id = COALESCE($3, source_exam_id),
            created_by_admin = COALESCE($4, created_by_admin),
            duration = COALESCE($5, duration),
            total_marks = COALESCE($6, total_marks),
            scheduled_date_time = COALESCE($7, scheduled_date_time),
            calculator_allowed = COALESCE($8, calculator_allowed),
            updated_at = $9
         WHERE generated_exam_id = $10
         RETURNING {COLUMNS}"
    ))
    .bind(params.title)
    .bind(params.code)
    .bind(params.source_exam_id)
    .bind(params.created_by_admin)
    .bind(params.duration)
    .bind(params.total_marks)
    .bind(params.scheduled_date_time)
    .bind(params.calculator_allowed)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM generated_exams WHERE generated_exam_id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
