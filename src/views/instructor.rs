use axum::response::Html;
use chrono::NaiveDateTime;

use super::{Nav, escape, layout, opt};
use crate::db::models::{CourseWithCount, DatePresence, DbCourse, DbStudent, StudentOverview};

pub struct DashboardView<'a> {
    pub name: &'a str,
    pub courses: &'a [CourseWithCount],
    pub total_students: i64,
    pub today_attendance: i64,
    pub now: NaiveDateTime,
}

pub fn dashboard(view: DashboardView<'_>) -> Html<String> {
    let rows: String = view
        .courses
        .iter()
        .map(|c| {
            format!(
                r#"<tr><td>{code}</td><td>{name}</td><td>{schedule}</td><td>{room}</td><td>{count}</td>
<td><a class="button" href="/instructor/live-attendance/{id}">Take attendance</a>
<a href="/instructor/attendance-history/{id}">History</a></td></tr>"#,
                code = escape(&c.code),
                name = escape(&c.name),
                schedule = opt(c.schedule.as_deref()),
                room = opt(c.room.as_deref()),
                count = c.student_count,
                id = c.id,
            )
        })
        .collect();
    let body = format!(
        r#"<h1>Welcome, {name}</h1>
<p class="muted">{now}</p>
<div class="cards">
  <div class="card"><div class="stat">{courses}</div>Courses</div>
  <div class="card"><div class="stat">{total}</div>Students</div>
  <div class="card"><div class="stat">{today}</div>Checked in today</div>
</div>
<h2>Your courses</h2>
<table><tr><th>Code</th><th>Name</th><th>Schedule</th><th>Room</th><th>Enrolled</th><th></th></tr>
{rows}</table>"#,
        name = escape(view.name),
        now = view.now.format("%A, %B %-d, %Y %H:%M"),
        courses = view.courses.len(),
        total = view.total_students,
        today = view.today_attendance,
    );
    layout("Dashboard", Nav::Instructor(view.name), &body)
}

pub fn courses(name: &str, courses: &[CourseWithCount]) -> Html<String> {
    let cards: String = courses
        .iter()
        .map(|c| {
            format!(
                r#"<div class="card"><h2>{code} &middot; {title}</h2>
<p>{schedule}<br>{room}</p><p>{count} students</p>
<a class="button" href="/instructor/live-attendance/{id}">Take attendance</a>
<a href="/instructor/attendance-history/{id}">History</a>
<a href="/api/export-attendance/{id}">Export CSV</a></div>"#,
                code = escape(&c.code),
                title = escape(&c.name),
                schedule = opt(c.schedule.as_deref()),
                room = opt(c.room.as_deref()),
                count = c.student_count,
                id = c.id,
            )
        })
        .collect();
    let body = format!(r#"<h1>Courses</h1><div class="cards">{cards}</div>"#);
    layout("Courses", Nav::Instructor(name), &body)
}

pub fn students(name: &str, students: &[StudentOverview]) -> Html<String> {
    let rows: String = students
        .iter()
        .map(|s| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&s.name),
                opt(s.student_id.as_deref()),
                opt(s.email.as_deref()),
                opt(s.phone.as_deref()),
                opt(s.courses.as_deref()),
                s.course_count,
            )
        })
        .collect();
    let body = format!(
        r#"<h1>Students</h1>
<table><tr><th>Name</th><th>Student ID</th><th>Email</th><th>Phone</th><th>Courses</th><th>#</th></tr>
{rows}</table>"#
    );
    layout("Students", Nav::Instructor(name), &body)
}

pub struct LiveAttendanceView<'a> {
    pub name: &'a str,
    pub course: &'a DbCourse,
    pub total_students: i64,
    pub students: &'a [DbStudent],
    pub present_ids: &'a [i64],
    pub today: &'a str,
}

const LIVE_SCRIPT: &str = r#"
<script>
const courseId = Number(document.getElementById('live').dataset.courseId);
const video = document.getElementById('camera');
const log = document.getElementById('recognition-log');
navigator.mediaDevices?.getUserMedia({ video: true }).then((stream) => { video.srcObject = stream; }).catch(() => {});

function markRow(userId) {
  const cell = document.querySelector(`[data-student="${userId}"] .status`);
  if (cell) { cell.textContent = 'present'; cell.className = 'status present'; }
}

async function capture() {
  const canvas = document.createElement('canvas');
  canvas.width = video.videoWidth || 320;
  canvas.height = video.videoHeight || 240;
  canvas.getContext('2d').drawImage(video, 0, 0, canvas.width, canvas.height);
  const resp = await fetch('/api/recognize-face', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ image: canvas.toDataURL('image/jpeg'), course_id: courseId }),
  });
  const data = await resp.json();
  for (const face of data.recognized_faces || []) {
    markRow(face.user_id);
    const li = document.createElement('li');
    li.textContent = `${face.timestamp} ${face.name} (${face.student_id}) ${face.confidence}%`;
    log.prepend(li);
  }
}

async function markManual(studentId) {
  const resp = await fetch('/api/manual-attendance', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ student_id: studentId, course_id: courseId }),
  });
  if (resp.ok) { markRow(studentId); }
}

document.getElementById('capture').addEventListener('click', capture);
document.querySelectorAll('[data-mark]').forEach((btn) =>
  btn.addEventListener('click', () => markManual(Number(btn.dataset.mark))));
</script>
"#;

pub fn live_attendance(view: LiveAttendanceView<'_>) -> Html<String> {
    let rows: String = view
        .students
        .iter()
        .map(|s| {
            let present = view.present_ids.contains(&s.id);
            let (class, label) = if present {
                ("status present", "present")
            } else {
                ("status absent", "not yet")
            };
            format!(
                r#"<tr data-student="{id}"><td>{name}</td><td>{sid}</td><td class="{class}">{label}</td>
<td><button data-mark="{id}">Mark present</button></td></tr>"#,
                id = s.id,
                name = escape(&s.name),
                sid = opt(s.student_id.as_deref()),
            )
        })
        .collect();
    let body = format!(
        r#"<div id="live" data-course-id="{id}">
<h1>{code} &middot; {title}</h1>
<p class="muted">{today} &middot; {total} enrolled &middot; {room}</p>
<div class="cards">
  <div class="card"><video id="camera" autoplay playsinline width="320" height="240"></video><br>
  <button id="capture">Scan faces</button></div>
  <div class="card"><h2>Recognized</h2><ul id="recognition-log"></ul></div>
</div>
<h2>Roster</h2>
<table><tr><th>Name</th><th>Student ID</th><th>Status</th><th></th></tr>
{rows}</table>
</div>
{script}"#,
        id = view.course.id,
        code = escape(&view.course.code),
        title = escape(&view.course.name),
        today = escape(view.today),
        total = view.total_students,
        room = opt(view.course.room.as_deref()),
        script = LIVE_SCRIPT,
    );
    layout("Live attendance", Nav::Instructor(view.name), &body)
}

pub fn attendance_history(name: &str, course: &DbCourse, dates: &[DatePresence]) -> Html<String> {
    let rows: String = dates
        .iter()
        .map(|d| {
            format!(
                r#"<tr><td>{date}</td><td>{count}</td>
<td><a href="/api/attendance-stats/{id}/{date}">Details</a></td></tr>"#,
                date = escape(&d.date),
                count = d.present_count,
                id = course.id,
            )
        })
        .collect();
    let body = format!(
        r#"<h1>{code} &middot; attendance history</h1>
<p><a class="button" href="/api/export-attendance/{id}">Export CSV</a></p>
<table><tr><th>Date</th><th>Present</th><th></th></tr>
{rows}</table>"#,
        code = escape(&course.code),
        id = course.id,
    );
    layout("Attendance history", Nav::Instructor(name), &body)
}

pub fn reports(name: &str, courses: &[CourseWithCount]) -> Html<String> {
    let rows: String = courses
        .iter()
        .map(|c| {
            format!(
                r#"<tr><td>{code}</td><td>{title}</td>
<td>{count} enrolled</td>
<td><a href="/api/course-stats/{id}">Today's stats</a>
<a class="button" href="/api/export-attendance/{id}">Export CSV</a></td></tr>"#,
                code = escape(&c.code),
                title = escape(&c.name),
                count = c.student_count,
                id = c.id,
            )
        })
        .collect();
    let body = format!(
        r#"<h1>Reports</h1>
<table><tr><th>Code</th><th>Name</th><th>Enrolled</th><th></th></tr>
{rows}</table>"#
    );
    layout("Reports", Nav::Instructor(name), &body)
}
