use serde::{Deserialize, Serialize};

/// Name of the array field on the single roster document in `courses`
pub const ROSTER_FIELD: &str = "courses";

/// Body shared by every route that takes a course name
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CourseRequest {
    #[serde(rename = "courseName")]
    pub course_name: Option<String>,
}

impl CourseRequest {
    /// The course name, if present and not blank
    pub fn name(&self) -> Option<&str> {
        self.course_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NextSerialResponse {
    #[serde(rename = "nextSerial")]
    pub next_serial: i64,
}
