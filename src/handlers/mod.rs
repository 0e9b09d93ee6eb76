pub mod api;
pub mod auth;
pub mod instructor;
pub mod student;
