pub mod attendance;
pub mod course;
pub mod user;

pub use attendance::*;
pub use course::*;
pub use user::*;

/// `{"message": ...}` body used by most successful writes
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// `{"error": ...}` body used by most failures
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
