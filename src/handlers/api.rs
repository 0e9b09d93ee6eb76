use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::db::models::Method;
use crate::error::AppError;
use crate::middleware::InstructorApi;
use crate::router::AppState;
use crate::service::attendance::{TIME_FORMAT, mark_attendance, today};
use crate::service::export::{export_filename, render_csv};
use crate::service::recognizer::{Recognition, RecognizedFace, decode_image_payload, demo_recognition};
use crate::service::stats::{CourseStats, DateReport, course_snapshot, date_report};
use crate::types::api::{
    ManualAttendanceRequest, ManualAttendanceResponse, RecognizeFaceRequest,
    RecognizeFaceResponse, RecognizedFaceOut,
};

const MANUAL_CONFIDENCE: f64 = 100.0;

/// POST /api/recognize-face
/// Runs the frame through the recognizer and marks every recognized student present.
pub async fn recognize_face(
    State(state): State<AppState>,
    InstructorApi(me): InstructorApi,
    Json(req): Json<RecognizeFaceRequest>,
) -> Result<Json<RecognizeFaceResponse>, AppError> {
    let frame = decode_image_payload(&req.image);
    let faces: Vec<RecognizedFace> = match state.recognizer.detect(&frame).await {
        Recognition::Recognized(faces) => faces,
        Recognition::NoneDetected => Vec::new(),
        Recognition::Unavailable { reason } => {
            if state.fallback_on_unavailable {
                warn!(%reason, "recognizer unavailable; substituting demo recognition");
                vec![demo_recognition()]
            } else {
                warn!(%reason, "recognizer unavailable");
                Vec::new()
            }
        }
    };

    let mut recognized_faces = Vec::with_capacity(faces.len());
    for face in faces {
        mark_attendance(
            &state.store,
            face.user_id,
            req.course_id,
            Some(face.confidence),
            Method::Auto,
        )
        .await?;
        recognized_faces.push(RecognizedFaceOut::from(face));
    }

    info!(
        instructor_id = me.user_id,
        course_id = req.course_id,
        count = recognized_faces.len(),
        "recognition pass complete"
    );
    Ok(Json(RecognizeFaceResponse { recognized_faces }))
}

/// POST /api/manual-attendance
pub async fn manual_attendance(
    State(state): State<AppState>,
    InstructorApi(me): InstructorApi,
    Json(req): Json<ManualAttendanceRequest>,
) -> Result<Json<ManualAttendanceResponse>, AppError> {
    let student = state
        .store
        .find_student(req.student_id)
        .await?
        .ok_or(AppError::NotFound("Student"))?;

    let marked_at = mark_attendance(
        &state.store,
        student.id,
        req.course_id,
        Some(MANUAL_CONFIDENCE),
        Method::Manual,
    )
    .await?;

    info!(
        instructor_id = me.user_id,
        student_id = student.id,
        course_id = req.course_id,
        "manual attendance recorded"
    );
    Ok(Json(ManualAttendanceResponse {
        success: true,
        student_name: student.name,
        student_id: student.student_id,
        timestamp: marked_at.format(TIME_FORMAT).to_string(),
    }))
}

/// GET /api/attendance-stats/{course_id}/{date}
pub async fn attendance_stats(
    State(state): State<AppState>,
    InstructorApi(_me): InstructorApi,
    Path((course_id, date)): Path<(i64, String)>,
) -> Result<Json<DateReport>, AppError> {
    let report = date_report(&state.store, course_id, &date).await?;
    Ok(Json(report))
}

/// GET /api/export-attendance/{course_id} -> CSV attachment.
pub async fn export_attendance(
    State(state): State<AppState>,
    InstructorApi(me): InstructorApi,
    Path(course_id): Path<i64>,
) -> Result<Response, AppError> {
    let course = state
        .store
        .find_owned_course(course_id, me.user_id)
        .await?
        .ok_or(AppError::NotFound("Course"))?;

    let records = state.store.export_records(course_id).await?;
    let filename = export_filename(&course.code, today());
    info!(course_id, rows = records.len(), %filename, "attendance exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        render_csv(&records),
    )
        .into_response())
}

/// GET /api/course-stats/{course_id}
pub async fn course_stats(
    State(state): State<AppState>,
    InstructorApi(_me): InstructorApi,
    Path(course_id): Path<i64>,
) -> Result<Json<CourseStats>, AppError> {
    let stats = course_snapshot(&state.store, course_id, today()).await?;
    Ok(Json(stats))
}
