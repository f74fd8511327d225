use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::call;
use crate::db::types::Role;
use crate::test_support;

fn student_profile(email: &str) -> serde_json::Value {
    json!({
        "FName": "Ann",
        "LName": "Lee",
        "Email": email,
        "Phone": "9876543210",
        "password": "s3cret-pass",
        "DOB": "2004-05-06",
        "Age": 20
    })
}

#[tokio::test]
async fn student_registers_logs_in_and_reads_profile_via_cookie() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let (status, body) = call(
        &ctx.app,
        Method::POST,
        "/api/student/register",
        None,
        Some(student_profile("ann@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["Email"], "ann@example.com");
    assert_eq!(body["data"]["DOB"], "2004-05-06");
    assert!(body["data"].get("hashed_password").is_none());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/student/login",
            None,
            Some(json!({ "Email": "ann@example.com", "password": "s3cret-pass" })),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("session cookie")
        .to_string();
    assert!(cookie.starts_with("authToken="));
    assert!(cookie.contains("HttpOnly"));
    let body = test_support::read_json(response).await;
    assert!(body["data"]["token"].as_str().is_some_and(|token| !token.is_empty()));

    let session = cookie.split(';').next().expect("cookie pair").to_string();
    let response = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/student/me")
                .header(header::COOKIE, session)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("me");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["data"]["FName"], "Ann");
    assert_eq!(body["data"]["Age"], 20);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let Some(ctx) = test_support::setup_test_context().await else { return };
    test_support::insert_account(ctx.state.db(), Role::Student, "dup@example.com", "pw-123456")
        .await;

    let (status, body) = call(
        &ctx.app,
        Method::POST,
        "/api/student/register",
        None,
        Some(student_profile("dup@example.com")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Student already exists with this email");
    assert_eq!(body["success"], false);
    assert_eq!(count_rows(ctx.state.db(), "students").await, 1);
}

async fn count_rows(pool: &sqlx::PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("row count")
}

fn teacher_profile(email: &str) -> serde_json::Value {
    json!({
        "FName": "Ann",
        "LName": "Lee",
        "Email": email,
        "Phone": "9876543210",
        "password": "s3cret-pass"
    })
}

#[tokio::test]
async fn email_matching_ignores_case() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let (status, body) = call(
        &ctx.app,
        Method::POST,
        "/api/teacher/register",
        None,
        Some(teacher_profile("Ann@Example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let (status, body) = call(
        &ctx.app,
        Method::POST,
        "/api/teacher/register",
        None,
        Some(teacher_profile("ann@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Teacher already exists with this email");
    assert_eq!(count_rows(ctx.state.db(), "teachers").await, 1);

    let (status, body) = call(
        &ctx.app,
        Method::POST,
        "/api/teacher/login",
        None,
        Some(json!({ "Email": "ann@EXAMPLE.com", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["data"]["Email"], "Ann@Example.com");
}

#[tokio::test]
async fn email_format_is_checked_on_update_only() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let (status, body) = call(
        &ctx.app,
        Method::POST,
        "/api/teacher/register",
        None,
        Some(teacher_profile("ann.lee")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/teacher/login",
            None,
            Some(json!({ "Email": "ann.lee", "password": "s3cret-pass" })),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    let token = body["data"]["token"].as_str().expect("token").to_string();

    let profile = teacher_profile("still.not.an.address");
    let (status, body) =
        call(&ctx.app, Method::PUT, "/api/teacher/update", Some(&token), Some(profile)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email format");
}

#[tokio::test]
async fn student_registration_requires_dob_and_age() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let mut profile = student_profile("nodob@example.com");
    profile.as_object_mut().expect("object").remove("DOB");
    let (status, body) =
        call(&ctx.app, Method::POST, "/api/student/register", None, Some(profile)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");
}

#[tokio::test]
async fn wrong_password_and_unknown_account_are_401_without_cookie() {
    let Some(ctx) = test_support::setup_test_context().await else { return };
    test_support::insert_account(ctx.state.db(), Role::Teacher, "t@example.com", "right-pass")
        .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/teacher/login",
            None,
            Some(json!({ "Email": "t@example.com", "password": "wrong-pass" })),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "Invalid credentials: Incorrect password");

    let (status, body) = call(
        &ctx.app,
        Method::POST,
        "/api/student/login",
        None,
        Some(json!({ "Email": "t@example.com", "password": "right-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials: Student not found");
}

#[tokio::test]
async fn token_of_another_role_is_rejected() {
    let Some(ctx) = test_support::setup_test_context().await else { return };
    let student =
        test_support::insert_account(ctx.state.db(), Role::Student, "s@example.com", "pw-123456")
            .await;
    let token = test_support::bearer_token(Role::Student, &student, ctx.state.settings());

    let (status, body) = call(&ctx.app, Method::GET, "/api/admin/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized: Invalid or expired token");

    let (status, _) = call(&ctx.app, Method::GET, "/api/student/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn token_for_deleted_account_is_rejected() {
    let Some(ctx) = test_support::setup_test_context().await else { return };
    let teacher =
        test_support::insert_account(ctx.state.db(), Role::Teacher, "gone@example.com", "pw-123456")
            .await;
    let token = test_support::bearer_token(Role::Teacher, &teacher, ctx.state.settings());
    sqlx::query("DELETE FROM teachers WHERE teacher_id = $1")
        .bind(teacher.id)
        .execute(ctx.state.db())
        .await
        .expect("delete teacher");

    let (status, body) = call(&ctx.app, Method::GET, "/api/teacher/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized: Teacher not found");
}

#[tokio::test]
async fn update_rejects_email_of_another_account() {
    let Some(ctx) = test_support::setup_test_context().await else { return };
    test_support::insert_account(ctx.state.db(), Role::Admin, "taken@example.com", "pw-123456")
        .await;
    let admin =
        test_support::insert_account(ctx.state.db(), Role::Admin, "me@example.com", "pw-123456")
            .await;
    let token = test_support::bearer_token(Role::Admin, &admin, ctx.state.settings());

    let (status, body) = call(
        &ctx.app,
        Method::PUT,
        "/api/admin/update",
        Some(&token),
        Some(json!({
            "FName": "Me",
            "LName": "Admin",
            "Email": "taken@example.com",
            "Phone": "9876543210",
            "Password": "new-pass-123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already in use");
}

#[tokio::test]
async fn logout_clears_cookie() {
    let Some(ctx) = test_support::setup_test_context().await else { return };
    let admin =
        test_support::insert_account(ctx.state.db(), Role::Admin, "a@example.com", "pw-123456")
            .await;
    let token = test_support::bearer_token(Role::Admin, &admin, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, "/api/admin/logout", Some(&token), None))
        .await
        .expect("logout");

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("cleared cookie");
    assert!(cookie.starts_with("authToken=;"));
    assert!(cookie.contains("Max-Age=0"));
}
