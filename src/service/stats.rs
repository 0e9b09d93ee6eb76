//! Attendance statistics: per-course snapshot for today, per-date reports and
//! a student's own summary.

use crate::db::models::{DailyRecord, STATUS_PRESENT, StudentHistoryEntry};
use crate::db::sqlite::AttendanceStore;
use crate::error::AppError;
use crate::service::attendance::format_date;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseStats {
    pub total_students: i64,
    pub today_present: i64,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateReport {
    pub date: String,
    pub attendance_rate: f64,
    pub present_count: i64,
    pub total_students: i64,
    pub absent_count: i64,
    pub records: Vec<DailyRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentSummary {
    pub total_classes: i64,
    pub present_classes: i64,
    pub attendance_rate: f64,
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Enrolled count, distinct students present on `today`, and the rate to 1 decimal.
/// Present counts every marked student, enrolled or not, so the rate can exceed 100.
pub async fn course_snapshot(
    store: &AttendanceStore,
    course_id: i64,
    today: NaiveDate,
) -> Result<CourseStats, AppError> {
    let total_students = store.count_enrolled(course_id).await?;
    let today_present = store
        .count_present_on(course_id, &format_date(today))
        .await?;
    Ok(CourseStats {
        total_students,
        today_present,
        attendance_rate: round_to(percentage(today_present, total_students), 1),
    })
}

/// Per-student records of one course on one date plus counts; rate to 2 decimals.
/// Records of students outside the enrollment still count as present.
pub async fn date_report(
    store: &AttendanceStore,
    course_id: i64,
    date: &str,
) -> Result<DateReport, AppError> {
    let records = store.daily_records(course_id, date).await?;
    let total_students = store.count_enrolled(course_id).await?;
    let present_count = records
        .iter()
        .filter(|r| r.status == STATUS_PRESENT)
        .count() as i64;

    Ok(DateReport {
        date: date.to_string(),
        attendance_rate: round_to(percentage(present_count, total_students), 2),
        present_count,
        total_students,
        // records of students no longer enrolled must not push this below zero
        absent_count: (total_students - present_count).max(0),
        records,
    })
}

pub fn student_summary(history: &[StudentHistoryEntry]) -> StudentSummary {
    let total_classes = history.len() as i64;
    let present_classes = history
        .iter()
        .filter(|h| h.status == STATUS_PRESENT)
        .count() as i64;
    StudentSummary {
        total_classes,
        present_classes,
        attendance_rate: round_to(percentage(present_classes, total_classes), 1),
    }
}
