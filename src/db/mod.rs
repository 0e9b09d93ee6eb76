//! Database module: schema, row models and queries for the attendance store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `sqlite.rs`: `AttendanceStore`, every query the app issues
//! - `seed.rs`: optional demo dataset

pub mod models;
pub mod schema;
pub mod seed;
pub mod sqlite;

pub use models::{Method, Role};
pub use schema::SQLITE_INIT;
pub use sqlite::{AttendanceStore, SqlitePool};
