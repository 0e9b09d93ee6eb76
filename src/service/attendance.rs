use crate::db::models::Method;
use crate::db::sqlite::AttendanceStore;
use crate::error::AppError;
use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::debug;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Server-local calendar date, the key every attendance record is bucketed by.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Mark a student present for today using the server's local clock.
/// Returns the instant that was recorded.
pub async fn mark_attendance(
    store: &AttendanceStore,
    student_id: i64,
    course_id: i64,
    confidence: Option<f64>,
    method: Method,
) -> Result<NaiveDateTime, AppError> {
    let now = Local::now().naive_local();
    mark_attendance_at(store, student_id, course_id, confidence, method, now).await?;
    Ok(now)
}

/// Ensure exactly one `present` record exists for (student, course, date of `at`),
/// overwriting time, confidence and method when one is already there.
pub async fn mark_attendance_at(
    store: &AttendanceStore,
    student_id: i64,
    course_id: i64,
    confidence: Option<f64>,
    method: Method,
    at: NaiveDateTime,
) -> Result<(), AppError> {
    let date = at.format(DATE_FORMAT).to_string();
    let time = at.format(TIME_FORMAT).to_string();
    store
        .upsert_attendance(student_id, course_id, &date, &time, confidence, method)
        .await?;
    debug!(student_id, course_id, %date, %time, %method, "attendance marked");
    Ok(())
}
