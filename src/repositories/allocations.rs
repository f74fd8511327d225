use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::{StudentExamAllocation, TeacherExamAllocation};

const TEACHER_COLUMNS: &str =
    "allocation_id, teacher_id, exam_id, allocated_by_admin, allocated_student_ids";
const STUDENT_COLUMNS: &str = "allocation_id, student_id, exam_id, allocated_by_admin";

/// Columns a teacher allocation listing may be narrowed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TeacherAllocationFilter {
    Teacher(i32),
    Exam(i32),
}

impl TeacherAllocationFilter {
    fn split(self) -> (&'static str, i32) {
        match self {
            Self::Teacher(id) => ("teacher_id", id),
            Self::Exam(id) => ("exam_id", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StudentAllocationFilter {
    Student(i32),
    Exam(i32),
}

impl StudentAllocationFilter {
    fn split(self) -> (&'static str, i32) {
        match self {
            Self::Student(id) => ("student_id", id),
            Self::Exam(id) => ("exam_id", id),
        }
    }
}

fn push_filters<'a>(
    builder: &mut QueryBuilder<'a, Postgres>,
    filters: impl IntoIterator<Item = (&'static str, i32)>,
) {
    let mut has_where = false;
    for (column, value) in filters {
        builder.push(if has_where { " AND " } else { " WHERE " });
        has_where = true;
        builder.push(column);
        builder.push(" = ");
        builder.push_bind(value);
    }
}

pub(crate) async fn create_teacher_allocation(
    pool: &PgPool,
    teacher_id: i32,
    exam_id: i32,
    allocated_by_admin: i32,
    allocated_student_ids: Option<&str>,
) -> Result<TeacherExamAllocation, sqlx::Error> {
    sqlx::query_as::<_, TeacherExamAllocation>(&format!(
        "INSERT INTO teacher_exam_allocations
            (teacher_id, exam_id, allocated_by_admin, allocated_student_ids)
         VALUES ($1,$2,$3,$4)
         RETURNING {TEACHER_COLUMNS}"
    ))
    .bind(teacher_id)
    .bind(exam_id)
    .bind(allocated_by_admin)
    .bind(allocated_student_ids)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_teacher_allocations(
    pool: &PgPool,
    filters: &[TeacherAllocationFilter],
) -> Result<Vec<TeacherExamAllocation>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {TEACHER_COLUMNS} FROM teacher_exam_allocations"
    ));
    push_filters(&mut builder, filters.iter().map(|filter| filter.split()));
    builder.push(" ORDER BY allocation_id DESC");

    builder.build_query_as::<TeacherExamAllocation>().fetch_all(pool).await
}

pub(crate) async fn find_teacher_allocation(
    pool: &PgPool,
    allocation_id: i32,
) -> Result<Option<TeacherExamAllocation>, sqlx::Error> {
    sqlx::query_as::<_, TeacherExamAllocation>(&format!(
        "SELECT {TEACHER_COLUMNS} FROM teacher_exam_allocations WHERE allocation_id = $1"
    ))
    .bind(allocation_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn student_allocation_exists(
    pool: &PgPool,
    student_id: i32,
    exam_id: i32,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM student_exam_allocations WHERE student_id = $1 AND exam_id = $2
        )",
    )
    .bind(student_id)
    .bind(exam_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn create_student_allocation(
    pool: &PgPool,
    student_id: i32,
    exam_id: i32,
    allocated_by_admin: i32,
) -> Result<StudentExamAllocation, sqlx::Error> {
    sqlx::query_as::<_, StudentExamAllocation>(&format!(
        "INSERT INTO student_exam_allocations (student_id, exam_id, allocated_by_admin)
         VALUES ($1,$2,$3)
         RETURNING {STUDENT_COLUMNS}"
    ))
    .bind(student_id)
    .bind(exam_id)
    .bind(allocated_by_admin)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_student_allocations(
    pool: &PgPool,
    filters: &[StudentAllocationFilter],
) -> Result<Vec<StudentExamAllocation>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {STUDENT_COLUMNS} FROM student_exam_allocations"
    ));
    push_filters(&mut builder, filters.iter().map(|filter| filter.split()));
    builder.push(" ORDER BY allocation_id DESC");

    builder.build_query_as::<StudentExamAllocation>().fetch_all(pool).await
}

pub(crate) async fn find_student_allocation(
    pool: &PgPool,
    allocation_id: i32,
) -> Result<Option<StudentExamAllocation>, sqlx::Error> {
    sqlx::query_as::<_, StudentExamAllocation>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM student_exam_allocations WHERE allocation_id = $1"
    ))
    .bind(allocation_id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_bind_values_and_join_with_and() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM student_exam_allocations");
        push_filters(
            &mut builder,
            [StudentAllocationFilter::Student(3), StudentAllocationFilter::Exam(9)]
                .iter()
                .map(|filter| filter.split()),
        );

        assert_eq!(
            builder.sql(),
            "SELECT 1 FROM student_exam_allocations WHERE student_id = $1 AND exam_id = $2"
        );
    }

    #[test]
    fn no_filters_leaves_query_untouched() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM teacher_exam_allocations");
        push_filters(&mut builder, std::iter::empty());
        assert_eq!(builder.sql(), "SELECT 1 FROM teacher_exam_allocations");
    }
}
