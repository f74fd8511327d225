use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::{StudentResponse, StudentResponseDetails};

const COLUMNS: &str = "\
    response_id, generated_exam_id, student_id, responses, score, submitted_at, \
    is_reviewed, reviewed_by_teacher";

const DETAILS_SELECT: &str = "\
    SELECT r.response_id, r.generated_exam_id, r.student_id, r.responses, r.score, \
           r.submitted_at, r.is_reviewed, r.reviewed_by_teacher, \
           s.f_name AS student_f_name, s.l_name AS student_l_name, \
           g.title AS exam_title, \
           t.f_name AS reviewed_by_f_name, t.l_name AS reviewed_by_l_name \
    FROM student_responses r \
    LEFT JOIN students s ON s.student_id = r.student_id \
    LEFT JOIN generated_exams g ON g.generated_exam_id = r.generated_exam_id \
    LEFT JOIN teachers t ON t.teacher_id = r.reviewed_by_teacher";

/// Closed set of listing filters. Every variant maps to a fixed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseFilter {
    Response(i32),
    Student(i32),
    GeneratedExam(i32),
    ReviewedBy(i32),
    Reviewed,
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: ResponseFilter) {
    match filter {
        ResponseFilter::Response(id) => {
            builder.push("r.response_id = ").push_bind(id);
        }
        ResponseFilter::Student(id) => {
            builder.push("r.student_id = ").push_bind(id);
        }
        ResponseFilter::GeneratedExam(id) => {
            builder.push("r.generated_exam_id = ").push_bind(id);
        }
        ResponseFilter::ReviewedBy(id) => {
            builder.push("r.reviewed_by_teacher = ").push_bind(id);
        }
        ResponseFilter::Reviewed => {
            builder.push("r.is_reviewed");
        }
    }
}

fn details_query(filters: &[ResponseFilter]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new(DETAILS_SELECT);
    for (index, filter) in filters.iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        push_filter(&mut builder, *filter);
    }
    builder.push(" ORDER BY r.submitted_at DESC, r.response_id DESC");
    builder
}

pub(crate) async fn create(
    pool: &PgPool,
    generated_exam_id: i32,
    student_id: i32,
    responses: &str,
    score: Option<i32>,
) -> Result<StudentResponse, sqlx::Error> {
    sqlx::query_as::<_, StudentResponse>(&format!(
        "INSERT INTO student_responses (generated_exam_id, student_id, responses, score)
         VALUES ($1,$2,$3,$4)
         RETURNING {COLUMNS}"
    ))
    .bind(generated_exam_id)
    .bind(student_id)
    .bind(responses)
    .bind(score)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    filters: &[ResponseFilter],
) -> Result<Vec<StudentResponseDetails>, sqlx::Error> {
    details_query(filters).build_query_as::<StudentResponseDetails>().fetch_all(pool).await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: i32,
) -> Result<Option<StudentResponse>, sqlx::Error> {
    sqlx::query_as::<_, StudentResponse>(&format!(
        "SELECT {COLUMNS} FROM student_responses WHERE response_id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Marks an unreviewed response as reviewed. Returns `None` when the row is
/// missing or was already reviewed, so concurrent reviews cannot both win.
pub(crate) async fn review(
    pool: &PgPool,
    id: i32,
    reviewed_by_teacher: i32,
    final_score: Option<i32>,
) -> Result<Option<StudentResponse>, sqlx::Error> {
    sqlx::query_as::<_, StudentResponse>(&format!(
        "UPDATE student_responses SET
            is_reviewed = TRUE,
            reviewed_by_teacher = $1,
            score = COALESCE($2, score)
         WHERE response_id = $3 AND NOT is_reviewed
         RETURNING {COLUMNS}"
    ))
    .bind(reviewed_by_teacher)
    .bind(final_score)
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_combines_filters_with_and() {
        let builder = details_query(&[ResponseFilter::Student(4), ResponseFilter::Reviewed]);
        let sql = builder.sql();
        assert!(sql.contains(" WHERE r.student_id = $1 AND r.is_reviewed ORDER BY"));
    }

    #[test]
    fn listing_without_filters_has_no_where() {
        let builder = details_query(&[]);
        assert!(!builder.sql().contains("WHERE"));
        assert!(builder.sql().ends_with("ORDER BY r.submitted_at DESC, r.response_id DESC"));
    }
}
