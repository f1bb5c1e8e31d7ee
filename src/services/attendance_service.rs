use mongodb::bson::{Bson, Document};

use crate::database::Repository;
use crate::models::{CourseAttendance, EVENT_COURSE_FIELD};
use crate::utils::{bson_to_json, documents_to_json, AppError};

pub async fn record_attendance(repo: &dyn Repository, event: Document) -> Result<(), AppError> {
    repo.insert_attendance(event).await
}

/// Every attendance event of a course, plus the distinct course keys seen
pub async fn attendance_for_course(repo: &dyn Repository, course: &str) -> Result<CourseAttendance, AppError> {
    let events = repo.attendance_for_course(course).await?;

    if events.is_empty() {
        return Err(AppError::NotFound(
            "Attendance data not found for the specified course".to_string(),
        ));
    }

    let unique_courses = unique_courses(&events)
        .into_iter()
        .map(bson_to_json)
        .collect();

    Ok(CourseAttendance {
        matched_data: documents_to_json(events),
        unique_courses,
    })
}

/// Distinct `course` values in order of first appearance
fn unique_courses(events: &[Document]) -> Vec<Bson> {
    let mut seen: Vec<Bson> = Vec::new();
    for event in events {
        let course = event.get(EVENT_COURSE_FIELD).cloned().unwrap_or(Bson::Null);
        if !seen.contains(&course) {
            seen.push(course);
        }
    }
    seen
}
