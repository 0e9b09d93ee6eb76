use axum::response::Html;

use super::{Nav, confidence_cell, escape, layout, opt};
use crate::db::models::{DbCourse, StudentCourse, StudentHistoryEntry};
use crate::service::stats::StudentSummary;

pub fn dashboard(name: &str, courses: &[StudentCourse], today: &str) -> Html<String> {
    let rows: String = courses
        .iter()
        .map(|c| {
            let status = match c.status.as_deref() {
                Some(s) => format!(r#"<span class="present">{}</span>"#, escape(s)),
                None => r#"<span class="absent">not marked</span>"#.to_string(),
            };
            format!(
                r#"<tr><td>{code}</td><td>{title}</td><td>{schedule}</td><td>{room}</td><td>{status}</td>
<td><a href="/student/attendance/{id}">History</a></td></tr>"#,
                code = escape(&c.code),
                title = escape(&c.name),
                schedule = opt(c.schedule.as_deref()),
                room = opt(c.room.as_deref()),
                id = c.id,
            )
        })
        .collect();
    let body = format!(
        r#"<h1>Hello, {name}</h1>
<p class="muted">Today is {today}</p>
<table><tr><th>Code</th><th>Course</th><th>Schedule</th><th>Room</th><th>Today</th><th></th></tr>
{rows}</table>"#,
        name = escape(name),
        today = escape(today),
    );
    layout("My courses", Nav::Student(name), &body)
}

pub fn attendance_view(
    name: &str,
    course: &DbCourse,
    history: &[StudentHistoryEntry],
    summary: &StudentSummary,
) -> Html<String> {
    let rows: String = history
        .iter()
        .map(|h| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&h.date),
                escape(&h.status),
                escape(&h.timestamp),
                escape(&h.method),
                confidence_cell(h.confidence),
            )
        })
        .collect();
    let body = format!(
        r#"<h1>{code} &middot; {title}</h1>
<div class="cards">
  <div class="card"><div class="stat">{rate}%</div>Attendance rate</div>
  <div class="card"><div class="stat">{present}/{total}</div>Classes attended</div>
</div>
<h2>History</h2>
<table><tr><th>Date</th><th>Status</th><th>Time</th><th>Method</th><th>Confidence</th></tr>
{rows}</table>"#,
        code = escape(&course.code),
        title = escape(&course.name),
        rate = summary.attendance_rate,
        present = summary.present_classes,
        total = summary.total_classes,
    );
    layout("Attendance", Nav::Student(name), &body)
}
