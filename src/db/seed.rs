//! Demo dataset: one instructor, five students, two courses and a few days of
//! randomized attendance. Only ever applied to an empty `users` table.

use crate::db::models::Method;
use crate::db::sqlite::AttendanceStore;
use crate::error::AppError;
use chrono::{Days, NaiveDate};
use rand::Rng;
use tracing::info;

pub const DEMO_PASSWORD: &str = "password";

struct SeedStudent {
    username: &'static str,
    name: &'static str,
    email: &'static str,
    student_id: &'static str,
    phone: &'static str,
}

const STUDENTS: [SeedStudent; 5] = [
    SeedStudent {
        username: "student1",
        name: "Alice Chen",
        email: "alice.chen@student.edu",
        student_id: "S1001",
        phone: "+1-555-0102",
    },
    SeedStudent {
        username: "student2",
        name: "Bob Rodriguez",
        email: "bob.rodriguez@student.edu",
        student_id: "S1002",
        phone: "+1-555-0103",
    },
    SeedStudent {
        username: "student3",
        name: "Carol Williams",
        email: "carol.williams@student.edu",
        student_id: "S1003",
        phone: "+1-555-0104",
    },
    SeedStudent {
        username: "student4",
        name: "David Kim",
        email: "david.kim@student.edu",
        student_id: "S1004",
        phone: "+1-555-0105",
    },
    SeedStudent {
        username: "student5",
        name: "Eva Martinez",
        email: "eva.martinez@student.edu",
        student_id: "S1005",
        phone: "+1-555-0106",
    },
];

/// (code, name, schedule, room)
const COURSES: [(&str, &str, &str, &str); 2] = [
    (
        "CAP5178",
        "Human-Computer Interaction",
        "Mon/Wed 10:00-11:30",
        "Room 301",
    ),
    ("CIS4930", "Advanced HCI", "Tue/Thu 14:00-15:30", "Room 205"),
];

const HISTORY_DAYS: u64 = 5;
const PRESENCE_PROBABILITY: f64 = 0.8;

struct PlannedMark {
    student_index: usize,
    date: String,
    time: String,
    confidence: f64,
}

/// Seed demo data if the store holds no users. Returns whether anything was written.
pub async fn seed_demo(store: &AttendanceStore, today: NaiveDate) -> Result<bool, AppError> {
    if store.user_count().await? > 0 {
        info!("store already populated; skipping demo seed");
        return Ok(false);
    }

    let plan = plan_history(today);
    let mut tx = store.pool().begin().await?;

    let instructor_id = sqlx::query(
        r#"INSERT INTO users (username, password, role, name, email, phone)
           VALUES (?, ?, 'instructor', ?, ?, ?)"#,
    )
    .bind("professor")
    .bind(DEMO_PASSWORD)
    .bind("Dr. Sarah Johnson")
    .bind("s.johnson@university.edu")
    .bind("+1-555-0101")
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    let mut student_ids = Vec::with_capacity(STUDENTS.len());
    for s in STUDENTS.iter() {
        let id = sqlx::query(
            r#"INSERT INTO users (username, password, role, name, email, student_id, phone)
               VALUES (?, ?, 'student', ?, ?, ?, ?)"#,
        )
        .bind(s.username)
        .bind(DEMO_PASSWORD)
        .bind(s.name)
        .bind(s.email)
        .bind(s.student_id)
        .bind(s.phone)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        student_ids.push(id);
    }

    let mut course_ids = Vec::with_capacity(COURSES.len());
    for (code, name, schedule, room) in COURSES {
        let id = sqlx::query(
            r#"INSERT INTO courses (code, name, instructor_id, schedule, room)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(code)
        .bind(name)
        .bind(instructor_id)
        .bind(schedule)
        .bind(room)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        course_ids.push(id);
    }

    // Everyone takes the first course; all but the last student take the second.
    for (i, student_id) in student_ids.iter().enumerate() {
        let courses = if i + 1 < student_ids.len() {
            &course_ids[..]
        } else {
            &course_ids[..1]
        };
        for course_id in courses {
            sqlx::query("INSERT OR IGNORE INTO enrollments (student_id, course_id) VALUES (?, ?)")
                .bind(*student_id)
                .bind(*course_id)
                .execute(&mut *tx)
                .await?;
        }
    }

    for mark in &plan {
        sqlx::query(
            r#"INSERT OR IGNORE INTO attendance (
                   student_id, course_id, date, status, timestamp, recognized_confidence, method
               ) VALUES (?, ?, ?, 'present', ?, ?, ?)"#,
        )
        .bind(student_ids[mark.student_index])
        .bind(course_ids[0])
        .bind(&mark.date)
        .bind(&mark.time)
        .bind(mark.confidence)
        .bind(Method::Auto.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(
        students = student_ids.len(),
        courses = course_ids.len(),
        attendance_records = plan.len(),
        "demo data seeded"
    );
    Ok(true)
}

/// Roll the randomized attendance history up front so no RNG is held across awaits.
fn plan_history(today: NaiveDate) -> Vec<PlannedMark> {
    let mut rng = rand::thread_rng();
    let mut plan = Vec::new();
    for back in 0..HISTORY_DAYS {
        let Some(day) = today.checked_sub_days(Days::new(back)) else {
            continue;
        };
        let date = day.format("%Y-%m-%d").to_string();
        for student_index in 0..STUDENTS.len() {
            if rng.gen_bool(PRESENCE_PROBABILITY) {
                plan.push(PlannedMark {
                    student_index,
                    date: date.clone(),
                    time: format!(
                        "{:02}:{:02}:{:02}",
                        rng.gen_range(9..=11),
                        rng.gen_range(10..=59),
                        rng.gen_range(10..=59)
                    ),
                    confidence: rng.gen_range(85.0..=98.0),
                });
            }
        }
    }
    plan
}
