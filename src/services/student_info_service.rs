use mongodb::bson::Document;
use serde_json::Value;

use crate::database::Repository;
use crate::models::{CourseRequest, SNAPSHOT_COURSE_FIELD};
use crate::state::AppState;
use crate::utils::AppError;

pub const EMPTY_PAYLOAD: &str = "Invalid or empty student attendance data provided";
pub const INVALID_FORMAT: &str = "Invalid student attendance data format";

/// Result of a replace-for-course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    pub deleted: u64,
    pub inserted: u64,
}

/// How strictly a snapshot batch is checked before it replaces a course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Only the first element's `courseName` is required
    CourseKeyOnly,
    /// Every element must share the course and carry string `name` and `id`
    Strict,
}

/// A validated batch of snapshots for one course
#[derive(Debug)]
pub struct SnapshotBatch {
    pub course_name: String,
    pub snapshots: Vec<Document>,
}

fn non_empty_str<'a>(item: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Checks the request body and converts it into storable documents.
/// Nothing is written here, so a bad batch never clears a course.
pub fn parse_batch(body: Value, validation: Validation) -> Result<SnapshotBatch, AppError> {
    let items = match body {
        Value::Array(items) if !items.is_empty() => items,
        _ => return Err(AppError::InvalidRequest(EMPTY_PAYLOAD.to_string())),
    };

    let course_name = items[0]
        .as_object()
        .and_then(|first| non_empty_str(first, SNAPSHOT_COURSE_FIELD))
        .map(str::to_string)
        .ok_or_else(|| AppError::InvalidRequest(INVALID_FORMAT.to_string()))?;

    let mut snapshots = Vec::with_capacity(items.len());

    for item in items {
        let object = item
            .as_object()
            .ok_or_else(|| AppError::InvalidRequest(INVALID_FORMAT.to_string()))?;

        if validation == Validation::Strict {
            let same_course = object.get(SNAPSHOT_COURSE_FIELD).and_then(Value::as_str)
                == Some(course_name.as_str());

            if !same_course || non_empty_str(object, "name").is_none() || non_empty_str(object, "id").is_none() {
                return Err(AppError::InvalidRequest(INVALID_FORMAT.to_string()));
            }
        }

        let snapshot: Document = serde_json::from_value(item)
            .map_err(|e| AppError::InvalidRequest(format!("{}: {}", INVALID_FORMAT, e)))?;
        snapshots.push(snapshot);
    }

    Ok(SnapshotBatch { course_name, snapshots })
}

/// Deletes every snapshot of the batch's course, then inserts the batch.
/// Runs under the snapshot lock so concurrent replacements serialize.
pub async fn replace_course(state: &AppState, batch: SnapshotBatch) -> Result<Replacement, AppError> {
    let _guard = state.lock_snapshots().await;

    let deleted = state.repo.delete_snapshots_for_course(&batch.course_name).await?;
    log::info!("🗑️  Deleted {} snapshots for course {}", deleted, batch.course_name);

    let inserted = state.repo.insert_snapshots(batch.snapshots).await?;
    log::info!("✅ Inserted {} snapshots for course {}", inserted, batch.course_name);

    Ok(Replacement { deleted, inserted })
}

/// Removes every snapshot of a course; `NotFound` when there were none
pub async fn clear_course(repo: &dyn Repository, request: &CourseRequest) -> Result<u64, AppError> {
    let course_name = request
        .name()
        .ok_or_else(|| AppError::InvalidRequest("courseName is required".to_string()))?;

    match repo.delete_snapshots_for_course(course_name).await? {
        0 => Err(AppError::NotFound("No attendance data found".to_string())),
        deleted => Ok(deleted),
    }
}

pub async fn snapshots_for_student(repo: &dyn Repository, student_id: &str) -> Result<Vec<Document>, AppError> {
    let snapshots = repo.snapshots_for_student(student_id).await?;

    if snapshots.is_empty() {
        return Err(AppError::NotFound("No student data found for this ID".to_string()));
    }

    Ok(snapshots)
}
