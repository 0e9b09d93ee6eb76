use crate::db::models::{
    CourseWithCount, DailyRecord, DatePresence, DbCourse, DbStudent, DbUser, ExportRecord, Method,
    StudentCourse, StudentHistoryEntry, StudentOverview,
};
use crate::db::schema::SQLITE_INIT;
use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, Pool, Row, Sqlite};
use std::str::FromStr;
use subtle::ConstantTimeEq;

pub type SqlitePool = Pool<Sqlite>;

/// Query surface over the attendance database. Cheap to clone.
#[derive(Clone)]
pub struct AttendanceStore {
    pool: SqlitePool,
}

impl AttendanceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating the file if needed) a pool for `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        // sqlx::query runs a single statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn user_count(&self) -> Result<i64, AppError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    /// Look up a user by username and check the stored plain-text password.
    pub async fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<DbUser>, AppError> {
        let row = sqlx::query("SELECT id, username, role, name, password FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let stored: String = row.try_get("password")?;
        if !bool::from(stored.as_bytes().ct_eq(password.as_bytes())) {
            return Ok(None);
        }
        Ok(Some(DbUser::from_row(&row)?))
    }

    /// Fetch a user only if it has the student role.
    pub async fn find_student(&self, id: i64) -> Result<Option<DbStudent>, AppError> {
        let student = sqlx::query_as::<_, DbStudent>(
            "SELECT id, name, student_id, email FROM users WHERE id = ? AND role = 'student'",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    /// Insert-or-update the single `present` record for (student, course, date).
    /// One statement against the UNIQUE(student_id, course_id, date) constraint,
    /// so concurrent marks for the same triple cannot produce duplicates.
    pub async fn upsert_attendance(
        &self,
        student_id: i64,
        course_id: i64,
        date: &str,
        time: &str,
        confidence: Option<f64>,
        method: Method,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO attendance (
                student_id, course_id, date, status, timestamp, recognized_confidence, method
            ) VALUES (?, ?, ?, 'present', ?, ?, ?)
            ON CONFLICT(student_id, course_id, date) DO UPDATE SET
                status='present',
                timestamp=excluded.timestamp,
                recognized_confidence=excluded.recognized_confidence,
                method=excluded.method
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .bind(date)
        .bind(time)
        .bind(confidence)
        .bind(method.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn count_enrolled(&self, course_id: i64) -> Result<i64, AppError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE course_id = ?")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    /// Distinct students marked present in `course_id` on `date`.
    pub async fn count_present_on(&self, course_id: i64, date: &str) -> Result<i64, AppError> {
        let rec: (i64,) = sqlx::query_as(
            r#"SELECT COUNT(DISTINCT student_id) FROM attendance
               WHERE course_id = ? AND date = ? AND status = 'present'"#,
        )
        .bind(course_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(rec.0)
    }

    pub async fn daily_records(
        &self,
        course_id: i64,
        date: &str,
    ) -> Result<Vec<DailyRecord>, AppError> {
        let rows = sqlx::query_as::<_, DailyRecord>(
            r#"SELECT u.name AS student_name, u.student_id, a.status, a.timestamp,
                      a.recognized_confidence AS confidence, a.method
               FROM attendance a
               JOIN users u ON a.student_id = u.id
               WHERE a.course_id = ? AND a.date = ?
               ORDER BY u.name"#,
        )
        .bind(course_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Courses owned by an instructor, newest first, with enrolled counts.
    pub async fn instructor_courses(
        &self,
        instructor_id: i64,
    ) -> Result<Vec<CourseWithCount>, AppError> {
        let rows = sqlx::query_as::<_, CourseWithCount>(
            r#"SELECT c.id, c.code, c.name, c.schedule, c.room,
                      COUNT(DISTINCT e.student_id) AS student_count
               FROM courses c
               LEFT JOIN enrollments e ON c.id = e.course_id
               WHERE c.instructor_id = ?
               GROUP BY c.id
               ORDER BY c.created_at DESC, c.id DESC"#,
        )
        .bind(instructor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The course, only if `instructor_id` owns it.
    pub async fn find_owned_course(
        &self,
        course_id: i64,
        instructor_id: i64,
    ) -> Result<Option<DbCourse>, AppError> {
        let course = sqlx::query_as::<_, DbCourse>(
            r#"SELECT id, code, name, instructor_id, schedule, room
               FROM courses WHERE id = ? AND instructor_id = ?"#,
        )
        .bind(course_id)
        .bind(instructor_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(course)
    }

    /// Distinct students enrolled in any of the instructor's courses.
    pub async fn instructor_student_total(&self, instructor_id: i64) -> Result<i64, AppError> {
        let rec: (i64,) = sqlx::query_as(
            r#"SELECT COUNT(DISTINCT student_id) FROM enrollments
               WHERE course_id IN (SELECT id FROM courses WHERE instructor_id = ?)"#,
        )
        .bind(instructor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(rec.0)
    }

    /// Distinct students with a record on `date` in any of the instructor's courses.
    pub async fn instructor_attendance_on(
        &self,
        instructor_id: i64,
        date: &str,
    ) -> Result<i64, AppError> {
        let rec: (i64,) = sqlx::query_as(
            r#"SELECT COUNT(DISTINCT student_id) FROM attendance
               WHERE date = ? AND course_id IN (
                   SELECT id FROM courses WHERE instructor_id = ?
               )"#,
        )
        .bind(date)
        .bind(instructor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(rec.0)
    }

    pub async fn instructor_students(
        &self,
        instructor_id: i64,
    ) -> Result<Vec<StudentOverview>, AppError> {
        let rows = sqlx::query_as::<_, StudentOverview>(
            r#"SELECT u.id, u.name, u.student_id, u.email, u.phone,
                      GROUP_CONCAT(c.name, ', ') AS courses,
                      COUNT(DISTINCT c.id) AS course_count
               FROM users u
               JOIN enrollments e ON u.id = e.student_id
               JOIN courses c ON e.course_id = c.id
               WHERE u.role = 'student' AND c.instructor_id = ?
               GROUP BY u.id
               ORDER BY u.name"#,
        )
        .bind(instructor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn course_students(&self, course_id: i64) -> Result<Vec<DbStudent>, AppError> {
        let rows = sqlx::query_as::<_, DbStudent>(
            r#"SELECT u.id, u.name, u.student_id, u.email
               FROM users u
               JOIN enrollments e ON u.id = e.student_id
               WHERE e.course_id = ? AND u.role = 'student'
               ORDER BY u.name"#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn present_student_ids(
        &self,
        course_id: i64,
        date: &str,
    ) -> Result<Vec<i64>, AppError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"SELECT student_id FROM attendance
               WHERE course_id = ? AND date = ? AND status = 'present'"#,
        )
        .bind(course_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }

    /// Present counts per recorded date, newest first.
    pub async fn presence_by_date(
        &self,
        course_id: i64,
        limit: i64,
    ) -> Result<Vec<DatePresence>, AppError> {
        let rows = sqlx::query_as::<_, DatePresence>(
            r#"SELECT date, COUNT(DISTINCT student_id) AS present_count
               FROM attendance
               WHERE course_id = ?
               GROUP BY date
               ORDER BY date DESC
               LIMIT ?"#,
        )
        .bind(course_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn student_courses(
        &self,
        student_id: i64,
        date: &str,
    ) -> Result<Vec<StudentCourse>, AppError> {
        let rows = sqlx::query_as::<_, StudentCourse>(
            r#"SELECT c.id, c.code, c.name, c.schedule, c.room,
                      (SELECT status FROM attendance
                       WHERE student_id = ? AND course_id = c.id AND date = ?) AS status
               FROM courses c
               JOIN enrollments e ON c.id = e.course_id
               WHERE e.student_id = ?
               ORDER BY c.name"#,
        )
        .bind(student_id)
        .bind(date)
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The course, only if `student_id` is enrolled in it.
    pub async fn find_enrolled_course(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<DbCourse>, AppError> {
        let course = sqlx::query_as::<_, DbCourse>(
            r#"SELECT c.id, c.code, c.name, c.instructor_id, c.schedule, c.room
               FROM enrollments e
               JOIN courses c ON e.course_id = c.id
               WHERE e.student_id = ? AND e.course_id = ?"#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(course)
    }

    pub async fn student_history(
        &self,
        student_id: i64,
        course_id: i64,
        limit: i64,
    ) -> Result<Vec<StudentHistoryEntry>, AppError> {
        let rows = sqlx::query_as::<_, StudentHistoryEntry>(
            r#"SELECT date, status, timestamp, recognized_confidence AS confidence, method
               FROM attendance
               WHERE student_id = ? AND course_id = ?
               ORDER BY date DESC
               LIMIT ?"#,
        )
        .bind(student_id)
        .bind(course_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn export_records(&self, course_id: i64) -> Result<Vec<ExportRecord>, AppError> {
        let rows = sqlx::query_as::<_, ExportRecord>(
            r#"SELECT a.date, u.name AS student_name, u.student_id, a.status, a.timestamp,
                      a.method, a.recognized_confidence AS confidence
               FROM attendance a
               JOIN users u ON a.student_id = u.id
               WHERE a.course_id = ?
               ORDER BY a.date DESC, u.name"#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
