use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::models::User;
use crate::utils::AppError;

/// Every collection operation the HTTP routes need.
///
/// Each method maps to exactly one database call; callers own any
/// sequencing (see `AppState::lock_snapshots`).
#[async_trait]
pub trait Repository: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    // ---- courses ----
    async fn list_courses(&self) -> Result<Vec<Document>, AppError>;
    /// Appends to the roster document, creating it on first use
    async fn push_course(&self, course_name: &str) -> Result<(), AppError>;

    // ---- newReg ----
    async fn insert_registration(&self, registration: Document) -> Result<(), AppError>;
    async fn list_registrations(&self) -> Result<Vec<Document>, AppError>;
    async fn clear_registrations(&self) -> Result<u64, AppError>;

    // ---- Users ----
    async fn insert_user(&self, user: &User) -> Result<ObjectId, AppError>;
    async fn list_users(&self) -> Result<Vec<Document>, AppError>;
    /// Fingerprint value of every user (`Bson::Null` when unset)
    async fn user_fingerprints(&self) -> Result<Vec<Bson>, AppError>;
    /// Returns whether a user was removed
    async fn delete_user(&self, id: ObjectId) -> Result<bool, AppError>;
    /// `$set`s the given fields; returns whether anything changed
    async fn update_user(&self, id: ObjectId, changes: Document) -> Result<bool, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<Document>, AppError>;
    async fn find_user_by_fingerprint(&self, fingerprint: &Bson) -> Result<Option<Document>, AppError>;
    /// Students enrolled in the course
    async fn students_in_course(&self, course_name: &str) -> Result<Vec<Document>, AppError>;

    // ---- attendance ----
    async fn insert_attendance(&self, event: Document) -> Result<(), AppError>;
    async fn attendance_for_course(&self, course: &str) -> Result<Vec<Document>, AppError>;

    // ---- studentInfo ----
    async fn delete_snapshots_for_course(&self, course_name: &str) -> Result<u64, AppError>;
    async fn insert_snapshots(&self, snapshots: Vec<Document>) -> Result<u64, AppError>;
    async fn snapshots_for_student(&self, student_id: &str) -> Result<Vec<Document>, AppError>;
}
