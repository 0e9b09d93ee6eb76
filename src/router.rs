use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{DefaultBodyLimit, FromRef};
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::db::sqlite::AttendanceStore;
use crate::handlers::{api, auth, instructor, student};
use crate::service::recognizer::FaceRecognizer;

/// Minimum master secret length accepted by cookie key derivation.
const MIN_SECRET_LEN: usize = 32;

/// Camera frames arrive base64-encoded inside JSON.
const MAX_FRAME_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: AttendanceStore,
    pub recognizer: Arc<dyn FaceRecognizer>,
    pub cookie_key: Key,
    pub session_ttl: Duration,
    pub insecure_cookie: bool,
    pub fallback_on_unavailable: bool,
}

impl AppState {
    pub fn new(store: AttendanceStore, recognizer: Arc<dyn FaceRecognizer>, cfg: &Config) -> Self {
        Self {
            store,
            recognizer,
            cookie_key: session_key(&cfg.basic.session_secret),
            session_ttl: cfg.session_ttl(),
            insecure_cookie: cfg.basic.insecure_cookie,
            fallback_on_unavailable: cfg.demo.fallback_on_unavailable,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Derive the cookie key from the configured secret, or generate a throwaway one.
fn session_key(secret: &str) -> Key {
    if secret.len() >= MIN_SECRET_LEN {
        Key::derive_from(secret.as_bytes())
    } else {
        warn!(
            "session_secret shorter than {MIN_SECRET_LEN} bytes; using a random key, sessions will not survive a restart"
        );
        Key::generate()
    }
}

pub fn app_router(state: AppState) -> Router {
    let pages = Router::new()
        .route("/", get(auth::index))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/instructor/dashboard", get(instructor::dashboard))
        .route("/instructor/courses", get(instructor::courses))
        .route("/instructor/students", get(instructor::students))
        .route(
            "/instructor/live-attendance/{course_id}",
            get(instructor::live_attendance),
        )
        .route(
            "/instructor/attendance-history/{course_id}",
            get(instructor::attendance_history),
        )
        .route("/instructor/reports", get(instructor::reports))
        .route("/student/dashboard", get(student::dashboard))
        .route("/student/attendance/{course_id}", get(student::course_attendance));

    let api = Router::new()
        .route("/recognize-face", post(api::recognize_face))
        .route("/manual-attendance", post(api::manual_attendance))
        .route(
            "/attendance-stats/{course_id}/{date}",
            get(api::attendance_stats),
        )
        .route("/export-attendance/{course_id}", get(api::export_attendance))
        .route("/course-stats/{course_id}", get(api::course_stats))
        .layer(DefaultBodyLimit::max(MAX_FRAME_BODY_BYTES));

    pages
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
