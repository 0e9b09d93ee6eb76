use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Local;

use crate::error::AppError;
use crate::middleware::InstructorPage;
use crate::router::AppState;
use crate::service::attendance::{format_date, today};
use crate::views;
use crate::views::instructor::{DashboardView, LiveAttendanceView};

const HISTORY_DATE_LIMIT: i64 = 30;
const DASHBOARD: &str = "/instructor/dashboard";

pub async fn dashboard(
    State(state): State<AppState>,
    InstructorPage(me): InstructorPage,
) -> Result<Response, AppError> {
    let courses = state.store.instructor_courses(me.user_id).await?;
    let total_students = state.store.instructor_student_total(me.user_id).await?;
    let today_attendance = state
        .store
        .instructor_attendance_on(me.user_id, &format_date(today()))
        .await?;

    Ok(views::instructor::dashboard(DashboardView {
        name: &me.name,
        courses: &courses,
        total_students,
        today_attendance,
        now: Local::now().naive_local(),
    })
    .into_response())
}

pub async fn courses(
    State(state): State<AppState>,
    InstructorPage(me): InstructorPage,
) -> Result<Response, AppError> {
    let courses = state.store.instructor_courses(me.user_id).await?;
    Ok(views::instructor::courses(&me.name, &courses).into_response())
}

pub async fn students(
    State(state): State<AppState>,
    InstructorPage(me): InstructorPage,
) -> Result<Response, AppError> {
    let students = state.store.instructor_students(me.user_id).await?;
    Ok(views::instructor::students(&me.name, &students).into_response())
}

pub async fn live_attendance(
    State(state): State<AppState>,
    InstructorPage(me): InstructorPage,
    Path(course_id): Path<i64>,
) -> Result<Response, AppError> {
    let Some(course) = state.store.find_owned_course(course_id, me.user_id).await? else {
        return Ok(Redirect::to(DASHBOARD).into_response());
    };

    let today = format_date(today());
    let total_students = state.store.count_enrolled(course_id).await?;
    let students = state.store.course_students(course_id).await?;
    let present_ids = state.store.present_student_ids(course_id, &today).await?;

    Ok(views::instructor::live_attendance(LiveAttendanceView {
        name: &me.name,
        course: &course,
        total_students,
        students: &students,
        present_ids: &present_ids,
        today: &today,
    })
    .into_response())
}

pub async fn attendance_history(
    State(state): State<AppState>,
    InstructorPage(me): InstructorPage,
    Path(course_id): Path<i64>,
) -> Result<Response, AppError> {
    let Some(course) = state.store.find_owned_course(course_id, me.user_id).await? else {
        return Ok(Redirect::to(DASHBOARD).into_response());
    };
    let dates = state
        .store
        .presence_by_date(course_id, HISTORY_DATE_LIMIT)
        .await?;
    Ok(views::instructor::attendance_history(&me.name, &course, &dates).into_response())
}

pub async fn reports(
    State(state): State<AppState>,
    InstructorPage(me): InstructorPage,
) -> Result<Response, AppError> {
    let courses = state.store.instructor_courses(me.user_id).await?;
    Ok(views::instructor::reports(&me.name, &courses).into_response())
}
