use serde::Serialize;

/// Key tying an attendance event to its course
pub const EVENT_COURSE_FIELD: &str = "course";
/// Key tying a student snapshot to its course
pub const SNAPSHOT_COURSE_FIELD: &str = "courseName";
/// External student id on a snapshot
pub const SNAPSHOT_STUDENT_FIELD: &str = "id";

/// Attendance events for one course
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CourseAttendance {
    #[serde(rename = "matchedData")]
    #[schema(value_type = Vec<Object>)]
    pub matched_data: serde_json::Value,
    #[serde(rename = "uniqueCourses")]
    #[schema(value_type = Vec<String>)]
    pub unique_courses: Vec<serde_json::Value>,
}
