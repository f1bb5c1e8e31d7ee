use mongodb::bson::Document;

use crate::database::Repository;
use crate::models::CourseRequest;
use crate::utils::AppError;

pub async fn list_courses(repo: &dyn Repository) -> Result<Vec<Document>, AppError> {
    repo.list_courses().await
}

/// Appends a course name to the roster. Duplicates are not checked.
pub async fn add_course(repo: &dyn Repository, request: &CourseRequest) -> Result<String, AppError> {
    let name = request
        .name()
        .ok_or_else(|| AppError::InvalidRequest("All fields are required for course".to_string()))?;

    repo.push_course(name).await?;

    Ok(name.to_string())
}
