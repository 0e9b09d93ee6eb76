#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use roll_call::config::Config;
use roll_call::service::recognizer::{FaceRecognizer, Recognition};
use roll_call::{AppState, AttendanceStore, app_router};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

/// A scratch SQLite file removed on drop.
pub struct TempDb {
    pub path: PathBuf,
    pub store: AttendanceStore,
}

impl TempDb {
    pub async fn new(label: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "rollcall-{label}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        let store = AttendanceStore::connect(&format!("sqlite:{}", path.display()))
            .await
            .expect("failed to open temp database");
        store.init_schema().await.expect("failed to init schema");
        Self { path, store }
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Ids created by [`seed_fixture`].
#[derive(Debug, Clone)]
pub struct Fixture {
    pub instructor_id: i64,
    pub other_instructor_id: i64,
    pub student_ids: Vec<i64>,
    pub course_id: i64,
    pub empty_course_id: i64,
    pub foreign_course_id: i64,
}

async fn insert_user(
    store: &AttendanceStore,
    username: &str,
    role: &str,
    name: &str,
    student_id: Option<&str>,
) -> i64 {
    sqlx::query(
        "INSERT INTO users (username, password, role, name, student_id) VALUES (?, 'pw', ?, ?, ?)",
    )
    .bind(username)
    .bind(role)
    .bind(name)
    .bind(student_id)
    .execute(store.pool())
    .await
    .expect("insert user")
    .last_insert_rowid()
}

async fn insert_course(store: &AttendanceStore, code: &str, instructor_id: i64) -> i64 {
    sqlx::query(
        "INSERT INTO courses (code, name, instructor_id, schedule, room) VALUES (?, ?, ?, 'Mon 10:00', 'Room 1')",
    )
    .bind(code)
    .bind(format!("Course {code}"))
    .bind(instructor_id)
    .execute(store.pool())
    .await
    .expect("insert course")
    .last_insert_rowid()
}

pub async fn enroll(store: &AttendanceStore, student_id: i64, course_id: i64) {
    sqlx::query("INSERT INTO enrollments (student_id, course_id) VALUES (?, ?)")
        .bind(student_id)
        .bind(course_id)
        .execute(store.pool())
        .await
        .expect("insert enrollment");
}

/// Instructor `prof` (password `pw`) owning a course with five enrolled
/// students `s1..s5`, plus an empty course and a course owned by someone else.
/// On a fresh database the instructor is user 1 and the students are users 2..=6.
pub async fn seed_fixture(store: &AttendanceStore) -> Fixture {
    let instructor_id = insert_user(store, "prof", "instructor", "Prof. Ada", None).await;
    let names = ["Alice Chen", "Bob Rodriguez", "Carol Williams", "David Kim", "Eva Martinez"];
    let mut student_ids = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let id = insert_user(
            store,
            &format!("s{}", i + 1),
            "student",
            name,
            Some(&format!("S100{}", i + 1)),
        )
        .await;
        student_ids.push(id);
    }
    let other_instructor_id = insert_user(store, "other", "instructor", "Prof. Other", None).await;

    let course_id = insert_course(store, "HCI101", instructor_id).await;
    let empty_course_id = insert_course(store, "EMPTY100", instructor_id).await;
    let foreign_course_id = insert_course(store, "OTHER200", other_instructor_id).await;
    for id in &student_ids {
        enroll(store, *id, course_id).await;
    }

    Fixture {
        instructor_id,
        other_instructor_id,
        student_ids,
        course_id,
        empty_course_id,
        foreign_course_id,
    }
}

pub async fn count_records(store: &AttendanceStore, student_id: i64, course_id: i64) -> i64 {
    let rec: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM attendance WHERE student_id = ? AND course_id = ?")
            .bind(student_id)
            .bind(course_id)
            .fetch_one(store.pool())
            .await
            .expect("count attendance");
    rec.0
}

/// Recognizer double returning a canned outcome.
pub struct FixedRecognizer(pub Recognition);

#[async_trait::async_trait]
impl FaceRecognizer for FixedRecognizer {
    async fn detect(&self, _frame: &[u8]) -> Recognition {
        self.0.clone()
    }
}

pub fn test_config(fallback_on_unavailable: bool) -> Config {
    let mut cfg = Config::default();
    cfg.basic.session_secret = "test-secret-test-secret-test-secret-test-secret".to_string();
    cfg.basic.insecure_cookie = true;
    cfg.demo.recognizer_delay_ms = 0;
    cfg.demo.fallback_on_unavailable = fallback_on_unavailable;
    cfg
}

pub fn app_with(store: &AttendanceStore, recognizer: Arc<dyn FaceRecognizer>, cfg: &Config) -> Router {
    app_router(AppState::new(store.clone(), recognizer, cfg))
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not utf-8")
}

pub async fn body_json(resp: Response<Body>) -> Value {
    serde_json::from_str(&body_string(resp).await).expect("response body was not JSON")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::empty()).expect("failed to build request")
}

pub fn post_json(uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

/// Log in through `/login` and return the `name=value` cookie pair to replay.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let resp = send(
        app,
        post_json(
            "/login",
            None,
            serde_json::json!({ "username": username, "password": password }),
        ),
    )
    .await;
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("login did not set a session cookie")
        .to_str()
        .expect("cookie header was not ascii")
        .split(';')
        .next()
        .expect("empty cookie header")
        .to_string();
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    cookie
}
