pub mod attendance;
pub mod export;
pub mod recognizer;
pub mod stats;
