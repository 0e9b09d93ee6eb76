use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::{info, warn};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::middleware::session::{end_session, start_session};
use crate::router::AppState;
use crate::types::api::{LoginRequest, LoginSuccess};
use crate::views;

/// GET / -> role dashboard when logged in, login page otherwise.
pub async fn index(CurrentUser(session): CurrentUser) -> Response {
    match session {
        Some(claims) => Redirect::to(claims.role.dashboard_path()).into_response(),
        None => views::auth::login_page().into_response(),
    }
}

/// POST /login with `{username, password}`.
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let Some(user) = state
        .store
        .find_user_by_credentials(&req.username, &req.password)
        .await?
    else {
        warn!(username = %req.username, "login rejected");
        return Err(AppError::InvalidCredentials);
    };

    info!(user_id = user.id, role = ?user.role, "login succeeded");
    let jar = start_session(jar, &user, &state)?;
    let body = LoginSuccess {
        success: true,
        redirect: user.role.dashboard_path(),
    };
    Ok((jar, Json(body)).into_response())
}

/// GET /logout
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (end_session(jar), Redirect::to("/"))
}
