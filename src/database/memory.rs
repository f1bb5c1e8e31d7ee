use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::Repository;
use crate::models::{
    User, CATEGORY_STUDENT, EVENT_COURSE_FIELD, ROSTER_FIELD, SNAPSHOT_COURSE_FIELD,
    SNAPSHOT_STUDENT_FIELD,
};
use crate::utils::AppError;

#[derive(Default)]
struct Collections {
    users: Vec<Document>,
    registrations: Vec<Document>,
    attendance: Vec<Document>,
    snapshots: Vec<Document>,
    courses: Vec<Document>,
}

/// In-process stand-in for MongoDB with the same filter semantics the
/// routes rely on. `set_failing(true)` makes every call error out.
#[derive(Default)]
pub struct MemoryRepository {
    collections: Mutex<Collections>,
    failing: AtomicBool,
    delete_delay_ms: AtomicU64,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes `delete_snapshots_for_course` sleep after deleting, so a
    /// concurrent writer gets to run between a delete and its insert.
    pub fn set_delete_delay(&self, delay: Duration) {
        self.delete_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    fn with<R>(&self, f: impl FnOnce(&mut Collections) -> R) -> Result<R, AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("connection refused".to_string()));
        }
        let mut guard = self
            .collections
            .lock()
            .map_err(|_| AppError::Internal("memory store poisoned".to_string()))?;
        Ok(f(&mut guard))
    }

    pub fn snapshots(&self) -> Vec<Document> {
        self.collections.lock().unwrap().snapshots.clone()
    }

    pub fn users(&self) -> Vec<Document> {
        self.collections.lock().unwrap().users.clone()
    }

    pub fn registrations(&self) -> Vec<Document> {
        self.collections.lock().unwrap().registrations.clone()
    }

    pub fn attendance(&self) -> Vec<Document> {
        self.collections.lock().unwrap().attendance.clone()
    }
}

fn with_object_id(mut doc: Document) -> Document {
    if !doc.contains_key("_id") {
        doc.insert("_id", ObjectId::new());
    }
    doc
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

/// Equality the way a MongoDB filter sees it: numbers compare by value
fn field_equals(doc: &Document, key: &str, value: &Bson) -> bool {
    match (doc.get(key), as_number(value)) {
        (Some(stored), Some(wanted)) => as_number(stored) == Some(wanted),
        (stored, _) => stored == Some(value),
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn ping(&self) -> Result<(), AppError> {
        self.with(|_| ())
    }

    async fn list_courses(&self) -> Result<Vec<Document>, AppError> {
        self.with(|c| c.courses.clone())
    }

    async fn push_course(&self, course_name: &str) -> Result<(), AppError> {
        self.with(|c| match c.courses.first_mut() {
            Some(roster) => match roster.get_array_mut(ROSTER_FIELD) {
                Ok(names) => names.push(Bson::from(course_name)),
                Err(_) => {
                    roster.insert(ROSTER_FIELD, vec![course_name]);
                }
            },
            None => c
                .courses
                .push(with_object_id(doc! { ROSTER_FIELD: [course_name] })),
        })
    }

    async fn insert_registration(&self, registration: Document) -> Result<(), AppError> {
        self.with(|c| c.registrations.push(with_object_id(registration)))
    }

    async fn list_registrations(&self) -> Result<Vec<Document>, AppError> {
        self.with(|c| c.registrations.clone())
    }

    async fn clear_registrations(&self) -> Result<u64, AppError> {
        self.with(|c| c.registrations.drain(..).count() as u64)
    }

    async fn insert_user(&self, user: &User) -> Result<ObjectId, AppError> {
        let doc = mongodb::bson::to_document(user)?;
        let doc = with_object_id(doc);
        let id = doc.get_object_id("_id").map_err(|e| AppError::Internal(e.to_string()))?;

        self.with(|c| {
            if c.users.iter().any(|u| u.get_str("email").ok() == Some(user.email.as_str())) {
                return Err(AppError::Conflict("E11000 duplicate key error: email".to_string()));
            }
            c.users.push(doc);
            Ok(id)
        })?
    }

    async fn list_users(&self) -> Result<Vec<Document>, AppError> {
        self.with(|c| c.users.clone())
    }

    async fn user_fingerprints(&self) -> Result<Vec<Bson>, AppError> {
        self.with(|c| {
            c.users
                .iter()
                .map(|u| u.get("fingerprint").cloned().unwrap_or(Bson::Null))
                .collect()
        })
    }

    async fn delete_user(&self, id: ObjectId) -> Result<bool, AppError> {
        let id = Bson::ObjectId(id);
        self.with(|c| {
            let before = c.users.len();
            c.users.retain(|u| !field_equals(u, "_id", &id));
            c.users.len() < before
        })
    }

    async fn update_user(&self, id: ObjectId, changes: Document) -> Result<bool, AppError> {
        let id = Bson::ObjectId(id);
        self.with(|c| {
            let Some(user) = c.users.iter_mut().find(|u| field_equals(u, "_id", &id)) else {
                return false;
            };
            let mut modified = false;
            for (key, value) in changes {
                if user.get(&key) != Some(&value) {
                    user.insert(key, value);
                    modified = true;
                }
            }
            modified
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<Document>, AppError> {
        let email = Bson::from(email);
        self.with(|c| c.users.iter().find(|u| field_equals(u, "email", &email)).cloned())
    }

    async fn find_user_by_fingerprint(&self, fingerprint: &Bson) -> Result<Option<Document>, AppError> {
        self.with(|c| {
            c.users
                .iter()
                .find(|u| field_equals(u, "fingerprint", fingerprint))
                .cloned()
        })
    }

    async fn students_in_course(&self, course_name: &str) -> Result<Vec<Document>, AppError> {
        self.with(|c| {
            c.users
                .iter()
                .filter(|u| u.get_str("category").ok() == Some(CATEGORY_STUDENT))
                .filter(|u| {
                    u.get_array("courses")
                        .map(|courses| courses.iter().any(|name| name.as_str() == Some(course_name)))
                        .unwrap_or(false)
                })
                .cloned()
                .collect()
        })
    }

    async fn insert_attendance(&self, event: Document) -> Result<(), AppError> {
        self.with(|c| c.attendance.push(with_object_id(event)))
    }

    async fn attendance_for_course(&self, course: &str) -> Result<Vec<Document>, AppError> {
        let course = Bson::from(course);
        self.with(|c| {
            c.attendance
                .iter()
                .filter(|e| field_equals(e, EVENT_COURSE_FIELD, &course))
                .cloned()
                .collect()
        })
    }

    async fn delete_snapshots_for_course(&self, course_name: &str) -> Result<u64, AppError> {
        let course = Bson::from(course_name);
        let deleted = self.with(|c| {
            let before = c.snapshots.len();
            c.snapshots.retain(|s| !field_equals(s, SNAPSHOT_COURSE_FIELD, &course));
            (before - c.snapshots.len()) as u64
        })?;

        let delay = self.delete_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        Ok(deleted)
    }

    async fn insert_snapshots(&self, snapshots: Vec<Document>) -> Result<u64, AppError> {
        self.with(|c| {
            let count = snapshots.len() as u64;
            c.snapshots.extend(snapshots.into_iter().map(with_object_id));
            count
        })
    }

    async fn snapshots_for_student(&self, student_id: &str) -> Result<Vec<Document>, AppError> {
        let student_id = Bson::from(student_id);
        self.with(|c| {
            c.snapshots
                .iter()
                .filter(|s| field_equals(s, SNAPSHOT_STUDENT_FIELD, &student_id))
                .cloned()
                .collect()
        })
    }
}
