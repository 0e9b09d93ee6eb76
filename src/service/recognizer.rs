use async_trait::async_trait;
use base64::Engine;
use chrono::Local;
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

use crate::service::attendance::TIME_FORMAT;

pub const MIN_CONFIDENCE: f64 = 85.0;
pub const MAX_CONFIDENCE: f64 = 98.0;
pub const MAX_FACES_PER_FRAME: usize = 2;

/// One student picked out of a camera frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizedFace {
    pub user_id: i64,
    pub name: String,
    pub student_id: String,
    pub confidence: f64,
    /// (x, y, width, height)
    pub location: (u32, u32, u32, u32),
    pub eyes_detected: bool,
    pub timestamp: String,
}

/// Outcome of running a frame through a recognizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Recognition {
    Recognized(Vec<RecognizedFace>),
    NoneDetected,
    Unavailable { reason: String },
}

impl Recognition {
    fn from_faces(faces: Vec<RecognizedFace>) -> Self {
        if faces.is_empty() {
            Recognition::NoneDetected
        } else {
            Recognition::Recognized(faces)
        }
    }
}

/// Turns an image frame into recognized students.
#[async_trait]
pub trait FaceRecognizer: Send + Sync {
    async fn detect(&self, frame: &[u8]) -> Recognition;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub user_id: i64,
    pub name: String,
    pub student_id: String,
}

impl RosterEntry {
    fn new(user_id: i64, name: &str, student_id: &str) -> Self {
        Self {
            user_id,
            name: name.to_string(),
            student_id: student_id.to_string(),
        }
    }
}

/// The five demo students, by the user ids the demo seed assigns them.
pub fn demo_roster() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new(2, "Alice Chen", "S1001"),
        RosterEntry::new(3, "Bob Rodriguez", "S1002"),
        RosterEntry::new(4, "Carol Williams", "S1003"),
        RosterEntry::new(5, "David Kim", "S1004"),
        RosterEntry::new(6, "Eva Martinez", "S1005"),
    ]
}

/// Canned recognition shown when no recognizer is available.
pub fn demo_recognition() -> RecognizedFace {
    RecognizedFace {
        user_id: 2,
        name: "Alice Chen".to_string(),
        student_id: "S1001".to_string(),
        confidence: 92.3,
        location: (100, 100, 200, 200),
        eyes_detected: true,
        timestamp: Local::now().format(TIME_FORMAT).to_string(),
    }
}

/// Stand-in recognizer: never looks at pixels, waits a bit, then reports
/// between zero and two random roster students. An empty or garbled frame is
/// treated like any other.
pub struct SimulatedRecognizer {
    roster: Vec<RosterEntry>,
    delay: Duration,
}

impl SimulatedRecognizer {
    pub fn new(roster: Vec<RosterEntry>, delay: Duration) -> Self {
        Self { roster, delay }
    }

    pub fn demo(delay: Duration) -> Self {
        Self::new(demo_roster(), delay)
    }

    fn pick_faces(&self) -> Vec<RecognizedFace> {
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(0..=MAX_FACES_PER_FRAME);
        let timestamp = Local::now().format(TIME_FORMAT).to_string();
        (0..count)
            .map(|i| {
                // with replacement: the same student can show up twice
                let entry = &self.roster[rng.gen_range(0..self.roster.len())];
                let confidence = rng.gen_range(MIN_CONFIDENCE..=MAX_CONFIDENCE);
                RecognizedFace {
                    user_id: entry.user_id,
                    name: entry.name.clone(),
                    student_id: entry.student_id.clone(),
                    confidence: (confidence * 10.0).round() / 10.0,
                    location: (100 + i as u32 * 50, 100, 200, 200),
                    eyes_detected: true,
                    timestamp: timestamp.clone(),
                }
            })
            .collect()
    }
}

#[async_trait]
impl FaceRecognizer for SimulatedRecognizer {
    async fn detect(&self, _frame: &[u8]) -> Recognition {
        if self.roster.is_empty() {
            return Recognition::Unavailable {
                reason: "recognizer roster is empty".to_string(),
            };
        }
        tokio::time::sleep(self.delay).await;
        Recognition::from_faces(self.pick_faces())
    }
}

/// Decode a browser capture: bare base64 or a `data:<mime>;base64,<payload>` URL.
/// Anything undecodable yields an empty frame.
pub fn decode_image_payload(payload: &str) -> Vec<u8> {
    let encoded = match payload.split_once(',') {
        Some((header, body)) if header.starts_with("data:") => body,
        _ => payload,
    };
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_recognizer_stays_within_bounds() {
        let recognizer = SimulatedRecognizer::demo(Duration::ZERO);
        let roster_ids: Vec<i64> = demo_roster().iter().map(|r| r.user_id).collect();
        for _ in 0..200 {
            match recognizer.detect(b"frame").await {
                Recognition::Recognized(faces) => {
                    assert!(!faces.is_empty() && faces.len() <= MAX_FACES_PER_FRAME);
                    for face in faces {
                        assert!(face.confidence >= MIN_CONFIDENCE);
                        assert!(face.confidence <= MAX_CONFIDENCE);
                        assert!(roster_ids.contains(&face.user_id));
                        assert!(face.eyes_detected);
                    }
                }
                Recognition::NoneDetected => {}
                Recognition::Unavailable { reason } => panic!("unexpected unavailable: {reason}"),
            }
        }
    }

    #[tokio::test]
    async fn empty_frame_still_runs_the_simulation() {
        let recognizer = SimulatedRecognizer::demo(Duration::ZERO);
        for _ in 0..50 {
            assert!(!matches!(
                recognizer.detect(&[]).await,
                Recognition::Unavailable { .. }
            ));
        }
    }

    #[tokio::test]
    async fn empty_roster_reports_unavailable() {
        let recognizer = SimulatedRecognizer::new(Vec::new(), Duration::ZERO);
        assert!(matches!(
            recognizer.detect(b"frame").await,
            Recognition::Unavailable { .. }
        ));
    }

    #[test]
    fn decodes_data_url_and_bare_base64() {
        assert_eq!(decode_image_payload("data:image/jpeg;base64,aGk="), b"hi");
        assert_eq!(decode_image_payload("aGk="), b"hi");
        assert!(decode_image_payload("not base64 at all!").is_empty());
    }
}
