use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Role carried by every user row and by the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Instructor,
    Student,
}

impl Role {
    /// Landing page after login.
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Role::Instructor => "/instructor/dashboard",
            Role::Student => "/student/dashboard",
        }
    }
}

/// How an attendance mark was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Method {
    Auto,
    Manual,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Auto => "auto",
            Method::Manual => "manual",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only status the recorder ever writes.
pub const STATUS_PRESENT: &str = "present";

/// Identity stored in the session after a successful login.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DbStudent {
    pub id: i64,
    pub name: String,
    pub student_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DbCourse {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub instructor_id: i64,
    pub schedule: Option<String>,
    pub room: Option<String>,
}

/// Course joined with its distinct enrolled-student count.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct CourseWithCount {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub schedule: Option<String>,
    pub room: Option<String>,
    pub student_count: i64,
}

/// Student row for the instructor roster page.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct StudentOverview {
    pub id: i64,
    pub name: String,
    pub student_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub courses: Option<String>,
    pub course_count: i64,
}

/// One attendance row of a course on a date, joined with the student's identity.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DailyRecord {
    pub student_name: String,
    pub student_id: Option<String>,
    pub status: String,
    pub timestamp: String,
    pub confidence: Option<f64>,
    pub method: String,
}

/// One attendance row of a course across all dates, as exported to CSV.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct ExportRecord {
    pub date: String,
    pub student_name: String,
    pub student_id: Option<String>,
    pub status: String,
    pub timestamp: String,
    pub method: String,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DatePresence {
    pub date: String,
    pub present_count: i64,
}

/// A student's own course with today's status, if any.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct StudentCourse {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub schedule: Option<String>,
    pub room: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct StudentHistoryEntry {
    pub date: String,
    pub status: String,
    pub timestamp: String,
    pub confidence: Option<f64>,
    pub method: String,
}
