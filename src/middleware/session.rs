use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::models::{DbUser, Role};
use crate::error::AppError;
use crate::router::AppState;

pub const SESSION_COOKIE: &str = "rollcall_session";

/// Identity and role carried in the encrypted session cookie.
/// `expires_at` is a unix timestamp checked on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub name: String,
    pub expires_at: i64,
}

impl SessionClaims {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

/// Attach a fresh session for `user` to the jar.
pub fn start_session(
    jar: PrivateCookieJar,
    user: &DbUser,
    state: &AppState,
) -> Result<PrivateCookieJar, AppError> {
    let ttl = state.session_ttl.as_secs() as i64;
    let claims = SessionClaims {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
        name: user.name.clone(),
        expires_at: Utc::now().timestamp() + ttl,
    };
    let value = serde_json::to_string(&claims)?;
    let cookie = Cookie::build(Cookie::new(SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!state.insecure_cookie)
        .max_age(time::Duration::seconds(ttl))
        .build();
    Ok(jar.add(cookie))
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(Cookie::from(SESSION_COOKIE)).path("/").build())
}

/// Decrypt and validate the session cookie. Tampered, malformed or expired
/// sessions read as absent.
pub fn read_session(jar: &PrivateCookieJar) -> Option<SessionClaims> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let claims: SessionClaims = serde_json::from_str(cookie.value()).ok()?;
    if claims.is_expired(Utc::now().timestamp()) {
        debug!(user_id = claims.user_id, "session expired");
        return None;
    }
    Some(claims)
}

async fn session_from_parts(parts: &mut Parts, state: &AppState) -> Option<SessionClaims> {
    let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
        .await
        .unwrap_or_else(|never| match never {});
    read_session(&jar)
}

async fn session_with_role(
    parts: &mut Parts,
    state: &AppState,
    role: Role,
) -> Option<SessionClaims> {
    session_from_parts(parts, state)
        .await
        .filter(|claims| claims.role == role)
}

/// Optional session, for routes open to everyone.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<SessionClaims>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(session_from_parts(parts, state).await))
    }
}

/// Instructor-only page; anyone else is sent back to the login page.
#[derive(Debug, Clone)]
pub struct InstructorPage(pub SessionClaims);

impl FromRequestParts<AppState> for InstructorPage {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session_with_role(parts, state, Role::Instructor)
            .await
            .map(Self)
            .ok_or_else(|| Redirect::to("/").into_response())
    }
}

/// Student-only page; anyone else is sent back to the login page.
#[derive(Debug, Clone)]
pub struct StudentPage(pub SessionClaims);

impl FromRequestParts<AppState> for StudentPage {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session_with_role(parts, state, Role::Student)
            .await
            .map(Self)
            .ok_or_else(|| Redirect::to("/").into_response())
    }
}

/// Instructor-only JSON endpoint; anyone else gets 403 `{"error":"Unauthorized"}`.
#[derive(Debug, Clone)]
pub struct InstructorApi(pub SessionClaims);

impl FromRequestParts<AppState> for InstructorApi {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session_with_role(parts, state, Role::Instructor)
            .await
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized.into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_inclusive() {
        let claims = SessionClaims {
            user_id: 1,
            username: "professor".to_string(),
            role: Role::Instructor,
            name: "Dr. Sarah Johnson".to_string(),
            expires_at: 1_000,
        };
        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1_000));
    }

    #[tokio::test]
    async fn started_session_reads_back_from_jar() {
        use crate::config::Config;
        use crate::db::sqlite::AttendanceStore;
        use crate::service::recognizer::SimulatedRecognizer;
        use std::sync::Arc;
        use std::time::Duration;

        let store = AttendanceStore::connect("sqlite::memory:")
            .await
            .expect("in-memory store");
        let mut cfg = Config::default();
        cfg.basic.session_secret = "unit-secret-unit-secret-unit-secret-0123".to_string();
        let state = AppState::new(
            store,
            Arc::new(SimulatedRecognizer::demo(Duration::ZERO)),
            &cfg,
        );
        let user = DbUser {
            id: 7,
            username: "student3".to_string(),
            role: Role::Student,
            name: "Carol Williams".to_string(),
        };

        let jar = start_session(PrivateCookieJar::new(state.cookie_key.clone()), &user, &state)
            .expect("session cookie");
        let claims = read_session(&jar).expect("session present");
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.role, Role::Student);
        assert_eq!(claims.name, "Carol Williams");
        assert!(claims.expires_at > Utc::now().timestamp());
    }
}
