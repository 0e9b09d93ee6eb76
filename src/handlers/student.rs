use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::error::AppError;
use crate::middleware::StudentPage;
use crate::router::AppState;
use crate::service::attendance::{format_date, today};
use crate::service::stats::student_summary;
use crate::views;

const HISTORY_LIMIT: i64 = 50;

pub async fn dashboard(
    State(state): State<AppState>,
    StudentPage(me): StudentPage,
) -> Result<Response, AppError> {
    let today = format_date(today());
    let courses = state.store.student_courses(me.user_id, &today).await?;
    Ok(views::student::dashboard(&me.name, &courses, &today).into_response())
}

pub async fn course_attendance(
    State(state): State<AppState>,
    StudentPage(me): StudentPage,
    Path(course_id): Path<i64>,
) -> Result<Response, AppError> {
    let Some(course) = state
        .store
        .find_enrolled_course(me.user_id, course_id)
        .await?
    else {
        return Ok(Redirect::to("/student/dashboard").into_response());
    };

    let history = state
        .store
        .student_history(me.user_id, course_id, HISTORY_LIMIT)
        .await?;
    let summary = student_summary(&history);
    Ok(views::student::attendance_view(&me.name, &course, &history, &summary).into_response())
}
