use sqlx::PgPool;
use time::Date;

use crate::db::models::Account;
use crate::db::types::Role;

/// Table and key column for each role. Only these literals are ever
/// interpolated into account queries.
fn table(role: Role) -> (&'static str, &'static str) {
    match role {
        Role::Admin => ("admins", "admin_id"),
        Role::Teacher => ("teachers", "teacher_id"),
        Role::Student => ("students", "student_id"),
    }
}

fn columns(role: Role) -> String {
    let (_, id_column) = table(role);
    let student_columns = match role {
        Role::Student => "dob, age",
        Role::Admin | Role::Teacher => "NULL::date AS dob, NULL::int4 AS age",
    };

    format!(
        "{id_column} AS id, f_name, m_name, l_name, email, phone, {student_columns}, \
         hashed_password, created_at"
    )
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    role: Role,
    id: i32,
) -> Result<Option<Account>, sqlx::Error> {
    let (table, id_column) = table(role);
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {} FROM {table} WHERE {id_column} = $1",
        columns(role)
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_by_email(
    pool: &PgPool,
    role: Role,
    email: &str,
) -> Result<Option<Account>, sqlx::Error> {
    let (table, _) = table(role);
    sqlx::query_as::<_, Account>(&format!(
        "SELECT {} FROM {table} WHERE lower(email) = lower($1)",
        columns(role)
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn exists(pool: &PgPool, role: Role, id: i32) -> Result<bool, sqlx::Error> {
    let (table, id_column) = table(role);
    sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS(SELECT 1 FROM {table} WHERE {id_column} = $1)"
    ))
    .bind(id)
    .fetch_one(pool)
    .await
}

/// True when another row of the role table already uses `email`, ignoring case.
pub(crate) async fn email_taken(
    pool: &PgPool,
    role: Role,
    email: &str,
    excluding: Option<i32>,
) -> Result<bool, sqlx::Error> {
    let (table, id_column) = table(role);
    sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS(
            SELECT 1 FROM {table}
            WHERE lower(email) = lower($1) AND ($2::int4 IS NULL OR {id_column} <> $2)
        )"
    ))
    .bind(email)
    .bind(excluding)
    .fetch_one(pool)
    .await
}

pub(crate) struct AccountFields<'a> {
    pub f_name: &'a str,
    pub m_name: Option<&'a str>,
    pub l_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub dob: Option<Date>,
    pub age: Option<i32>,
    pub hashed_password: String,
}

pub(crate) async fn create(
    pool: &PgPool,
    role: Role,
    fields: AccountFields<'_>,
) -> Result<Account, sqlx::Error> {
    let (table, _) = table(role);
    let returning = columns(role);

    let query = match role {
        Role::Student => format!(
            "INSERT INTO {table} (f_name, m_name, l_name, email, phone, hashed_password, dob, age)
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
             RETURNING {returning}"
        ),
        Role::Admin | Role::Teacher => format!(
            "INSERT INTO {table} (f_name, m_name, l_name, email, phone, hashed_password)
             VALUES ($1,$2,$3,$4,$5,$6)
             RETURNING {returning}"
        ),
    };

    let mut statement = sqlx::query_as::<_, Account>(&query)
        .bind(fields.f_name)
        .bind(fields.m_name)
        .bind(fields.l_name)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.hashed_password);
    if role == Role::Student {
        statement = statement.bind(fields.dob).bind(fields.age);
    }

    statement.fetch_one(pool).await
}

/// Replaces every profile field. Returns `None` when the row is gone.
pub(crate) async fn update(
    pool: &PgPool,
    role: Role,
    id: i32,
    fields: AccountFields<'_>,
) -> Result<Option<Account>, sqlx::Error> {
    let (table, id_column) = table(role);
    let returning = columns(role);

    let query = match role {
        Role::Student => format!(
            "UPDATE {table} SET
                f_name = $1, m_name = $2, l_name = $3, email = $4, phone = $5,
                hashed_password = $6, dob = $7, age = $8
             WHERE {id_column} = $9
             RETURNING {returning}"
        ),
        Role::Admin | Role::Teacher => format!(
            "UPDATE {table} SET
                f_name = $1, m_name = $2, l_name = $3, email = $4, phone = $5,
                hashed_password = $6
             WHERE {id_column} = $7
             RETURNING {returning}"
        ),
    };

    let mut statement = sqlx::query_as::<_, Account>(&query)
        .bind(fields.f_name)
        .bind(fields.m_name)
        .bind(fields.l_name)
        .bind(fields.email)
        .bind(fields.phone)
        .bind(fields.hashed_password);
    if role == Role::Student {
        statement = statement.bind(fields.dob).bind(fields.age);
    }

    statement.bind(id).fetch_optional(pool).await
}

pub(crate) async fn set_password(
    pool: &PgPool,
    role: Role,
    id: i32,
    hashed_password: &str,
) -> Result<(), sqlx::Error> {
    let (table, id_column) = table(role);
    sqlx::query(&format!("UPDATE {table} SET hashed_password = $1 WHERE {id_column} = $2"))
        .bind(hashed_password)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
