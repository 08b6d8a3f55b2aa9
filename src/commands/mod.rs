//! Entry points for the dashboard UI.
//!
//! Each command takes the shared [`AppState`](crate::AppState), checks the
//! session where data is user-scoped, and returns `Result<_, AppError>` so
//! failures reach the UI in one shape.

pub mod auth;
pub mod campaigns;
pub mod dashboard;
pub mod leads;
pub mod system;
pub mod videos;
