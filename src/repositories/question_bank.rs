use sqlx::PgPool;

use crate::db::models::QuestionBank;

const COLUMNS: &str = "q_id, title, questions, created_at";

pub(crate) async fn create(
    pool: &PgPool,
    title: &str,
    questions: &str,
) -> Result<QuestionBank, sqlx::Error> {
    sqlx::query_as::<_, QuestionBank>(&format!(
        "INSERT INTO question_bank (title, questions) VALUES ($1, $2) RETURNING {COLUMNS}"
    ))
    .bind(title)
    .bind(questions)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<QuestionBank>, sqlx::Error> {
    sqlx::query_as::<_, QuestionBank>(&format!(
        "SELECT {COLUMNS} FROM question_bank ORDER BY created_at DESC, q_id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<QuestionBank>, sqlx::Error> {
    sqlx::query_as::<_, QuestionBank>(&format!("SELECT {COLUMNS} FROM question_bank WHERE q_id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Omitted fields keep their stored value.
pub(crate) async fn update(
    pool: &PgPool,
    id: i32,
    title: Option<&str>,
    questions: Option<&str>,
) -> Result<Option<QuestionBank>, sqlx::Error> {
    sqlx::query_as::<_, QuestionBank>(&format!(
        "UPDATE question_bank SET
            title = COALESCE($1, title),
            questions = COALESCE($2, questions)
         WHERE q_id = $3
         RETURNING {COLUMNS}"
    ))
    .bind(title)
    .bind(questions)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM question_bank WHERE q_id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
