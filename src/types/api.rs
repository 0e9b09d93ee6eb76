use serde::{Deserialize, Serialize};

use crate::service::recognizer::RecognizedFace;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginSuccess {
    pub success: bool,
    pub redirect: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct RecognizeFaceRequest {
    /// Base64 frame, optionally as a `data:` URL.
    #[serde(default)]
    pub image: String,
    pub course_id: i64,
}

/// A recognized face as reported to the browser (no bounding box).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedFaceOut {
    pub user_id: i64,
    pub name: String,
    pub student_id: String,
    pub confidence: f64,
    pub eyes_detected: bool,
    pub timestamp: String,
}

impl From<RecognizedFace> for RecognizedFaceOut {
    fn from(face: RecognizedFace) -> Self {
        Self {
            user_id: face.user_id,
            name: face.name,
            student_id: face.student_id,
            confidence: face.confidence,
            eyes_detected: face.eyes_detected,
            timestamp: face.timestamp,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecognizeFaceResponse {
    pub recognized_faces: Vec<RecognizedFaceOut>,
}

#[derive(Debug, Deserialize)]
pub struct ManualAttendanceRequest {
    pub student_id: i64,
    pub course_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ManualAttendanceResponse {
    pub success: bool,
    pub student_name: String,
    pub student_id: Option<String>,
    pub timestamp: String,
}
