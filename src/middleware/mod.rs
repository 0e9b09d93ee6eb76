pub mod session;

pub use session::{CurrentUser, InstructorApi, InstructorPage, SessionClaims, StudentPage};
