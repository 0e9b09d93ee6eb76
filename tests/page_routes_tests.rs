mod common;

use axum::http::StatusCode;
use chrono::{Days, NaiveDate, NaiveDateTime};
use common::{
    Fixture, TempDb, app_with, body_string, enroll, get, login, seed_fixture, send, test_config,
};
use roll_call::AttendanceStore;
use roll_call::db::Method;
use roll_call::service::attendance::{mark_attendance, mark_attendance_at};
use roll_call::service::recognizer::SimulatedRecognizer;
use std::sync::Arc;
use std::time::Duration;

fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S")
        .expect("valid datetime")
}

async fn mark(store: &AttendanceStore, student: i64, course: i64, date: &str, confidence: f64) {
    mark_attendance_at(store, student, course, Some(confidence), Method::Auto, at(date, "09:30:00"))
        .await
        .expect("mark attendance");
}

async fn page(db: &TempDb, user: &str, uri: &str) -> String {
    let app = app_with(
        &db.store,
        Arc::new(SimulatedRecognizer::demo(Duration::ZERO)),
        &test_config(true),
    );
    let cookie = login(&app, user, "pw").await;
    let resp = send(&app, get(uri, Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
    body_string(resp).await
}

/// The `<tr>` of `html` that starts with a cell holding `first_cell`.
fn row<'a>(html: &'a str, first_cell: &str) -> &'a str {
    let start = html
        .find(&format!("<tr><td>{first_cell}</td>"))
        .unwrap_or_else(|| panic!("no row for {first_cell}"));
    let len = html[start..].find("</tr>").expect("unterminated row");
    &html[start..start + len]
}

async fn fixture(db: &TempDb) -> Fixture {
    seed_fixture(&db.store).await
}

#[tokio::test]
async fn instructor_dashboard_shows_totals() {
    let db = TempDb::new("pages-dashboard").await;
    let fx = fixture(&db).await;
    mark_attendance(&db.store, fx.student_ids[0], fx.course_id, None, Method::Manual)
        .await
        .expect("mark attendance");

    let html = page(&db, "prof", "/instructor/dashboard").await;
    assert!(html.contains("Welcome, Prof. Ada"));
    assert!(html.contains(r#"<div class="stat">2</div>Courses"#));
    assert!(html.contains(r#"<div class="stat">5</div>Students"#));
    assert!(html.contains(r#"<div class="stat">1</div>Checked in today"#));
    assert!(!html.contains("OTHER200"));
}

#[tokio::test]
async fn courses_page_lists_owned_courses_with_enrollment() {
    let db = TempDb::new("pages-courses").await;
    let fx = fixture(&db).await;

    let html = page(&db, "prof", "/instructor/courses").await;
    assert!(html.contains("HCI101 &middot; Course HCI101"));
    assert!(html.contains("<p>5 students</p>"));
    assert!(html.contains("<p>0 students</p>"));
    assert!(html.contains(&format!(r#"href="/api/export-attendance/{}""#, fx.course_id)));
    assert!(!html.contains("OTHER200"));
}

#[tokio::test]
async fn students_page_groups_courses_per_student() {
    let db = TempDb::new("pages-students").await;
    let fx = fixture(&db).await;
    enroll(&db.store, fx.student_ids[0], fx.empty_course_id).await;
    // a course of another instructor stays out of the listing
    enroll(&db.store, fx.student_ids[1], fx.foreign_course_id).await;

    let html = page(&db, "prof", "/instructor/students").await;

    let alice = row(&html, "Alice Chen");
    assert!(alice.contains("<td>S1001</td>"));
    assert!(alice.contains("Course HCI101"));
    assert!(alice.contains("Course EMPTY100"));
    assert!(alice.ends_with("<td>2</td>"));

    let bob = row(&html, "Bob Rodriguez");
    assert!(bob.contains("Course HCI101"));
    assert!(bob.ends_with("<td>1</td>"));
    assert!(!html.contains("Course OTHER200"));

    // ordered by name
    let names = ["Alice Chen", "Bob Rodriguez", "Carol Williams", "David Kim", "Eva Martinez"];
    let positions: Vec<usize> = names
        .iter()
        .map(|name| html.find(&format!("<tr><td>{name}</td>")).expect("student row"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn attendance_history_counts_per_date_newest_first() {
    let db = TempDb::new("pages-history").await;
    let fx = fixture(&db).await;
    for student in &fx.student_ids[..3] {
        mark(&db.store, *student, fx.course_id, "2024-01-08", 90.0).await;
    }
    mark(&db.store, fx.student_ids[4], fx.course_id, "2024-01-09", 90.0).await;
    for student in &fx.student_ids {
        mark(&db.store, *student, fx.course_id, "2024-01-10", 90.0).await;
    }

    let html = page(
        &db,
        "prof",
        &format!("/instructor/attendance-history/{}", fx.course_id),
    )
    .await;
    let newest = html.find("<tr><td>2024-01-10</td><td>5</td>").expect("2024-01-10 row");
    let middle = html.find("<tr><td>2024-01-09</td><td>1</td>").expect("2024-01-09 row");
    let oldest = html.find("<tr><td>2024-01-08</td><td>3</td>").expect("2024-01-08 row");
    assert!(newest < middle && middle < oldest);
}

#[tokio::test]
async fn attendance_history_shows_at_most_thirty_dates() {
    let db = TempDb::new("pages-history-limit").await;
    let fx = fixture(&db).await;
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    for offset in 0..35 {
        let day = first + Days::new(offset);
        mark(&db.store, fx.student_ids[0], fx.course_id, &day.format("%Y-%m-%d").to_string(), 90.0)
            .await;
    }

    let html = page(
        &db,
        "prof",
        &format!("/instructor/attendance-history/{}", fx.course_id),
    )
    .await;
    let details = format!("/api/attendance-stats/{}/", fx.course_id);
    assert_eq!(html.matches(&details).count(), 30);
    assert!(html.contains("<td>2024-02-04</td>"));
    assert!(html.contains("<td>2024-01-06</td>"));
    assert!(!html.contains("<td>2024-01-05</td>"));
}

#[tokio::test]
async fn reports_page_lists_enrollment_and_exports() {
    let db = TempDb::new("pages-reports").await;
    let fx = fixture(&db).await;

    let html = page(&db, "prof", "/instructor/reports").await;
    let hci = row(&html, "HCI101");
    assert!(hci.contains("<td>5 enrolled</td>"));
    assert!(hci.contains(&format!("/api/course-stats/{}", fx.course_id)));
    let empty = row(&html, "EMPTY100");
    assert!(empty.contains("<td>0 enrolled</td>"));
    assert!(!html.contains("OTHER200"));
}

#[tokio::test]
async fn student_course_page_shows_history_and_rate() {
    let db = TempDb::new("pages-student").await;
    let fx = fixture(&db).await;
    mark(&db.store, fx.student_ids[0], fx.course_id, "2024-01-09", 88.0).await;
    mark(&db.store, fx.student_ids[0], fx.course_id, "2024-01-10", 90.5).await;
    sqlx::query(
        r#"INSERT INTO attendance (student_id, course_id, date, status, timestamp, method)
           VALUES (?, ?, '2024-01-11', 'absent', '09:00:00', 'manual')"#,
    )
    .bind(fx.student_ids[0])
    .bind(fx.course_id)
    .execute(db.store.pool())
    .await
    .expect("insert absent record");
    // someone else's record stays off the page
    mark(&db.store, fx.student_ids[1], fx.course_id, "2024-01-12", 97.0).await;

    let html = page(&db, "s1", &format!("/student/attendance/{}", fx.course_id)).await;
    assert!(html.contains(r#"<div class="stat">66.7%</div>Attendance rate"#));
    assert!(html.contains(r#"<div class="stat">2/3</div>Classes attended"#));
    assert!(html.contains("<td>90.5%</td>"));
    assert!(!html.contains("2024-01-12"));

    let newest = html.find("<tr><td>2024-01-11</td>").expect("absent row");
    let oldest = html.find("<tr><td>2024-01-09</td>").expect("first present row");
    assert!(newest < oldest);
}

#[tokio::test]
async fn student_course_page_keeps_latest_fifty_entries() {
    let db = TempDb::new("pages-student-limit").await;
    let fx = fixture(&db).await;
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    for offset in 0..55 {
        let day = first + Days::new(offset);
        mark(&db.store, fx.student_ids[2], fx.course_id, &day.format("%Y-%m-%d").to_string(), 91.0)
            .await;
    }

    let html = page(&db, "s3", &format!("/student/attendance/{}", fx.course_id)).await;
    assert!(html.contains(r#"<div class="stat">50/50</div>"#));
    assert!(html.contains(r#"<div class="stat">100%</div>"#));
    assert!(html.contains("<td>2024-02-24</td>"));
    assert!(!html.contains("<td>2024-01-05</td>"));
}
