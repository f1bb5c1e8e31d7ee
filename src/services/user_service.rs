use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use crate::database::Repository;
use crate::models::{
    CourseRequest, FingerprintMatch, FingerprintRequest, RegisterUserRequest, UpdateUserRequest,
    User, CATEGORY_TEACHER,
};
use crate::services::auth_service;
use crate::state::AppState;
use crate::utils::{bson_to_json, AppError};

const MISSING_FIELDS: &str = "All fields are required, including courses";

/// Removes the password hash before a user leaves the service
pub fn without_password(mut user: Document) -> Document {
    user.remove("password");
    user
}

fn required(value: Option<String>) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::InvalidRequest(MISSING_FIELDS.to_string()))
}

/// Mirrors "truthy" for loosely typed client fields
fn is_present(value: &Bson) -> bool {
    match value {
        Bson::Null | Bson::Undefined => false,
        Bson::String(s) => !s.trim().is_empty(),
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(f) => *f != 0.0 && !f.is_nan(),
        Bson::Boolean(b) => *b,
        _ => true,
    }
}

fn required_bson(value: Option<Bson>) -> Result<Bson, AppError> {
    value
        .filter(is_present)
        .ok_or_else(|| AppError::InvalidRequest(MISSING_FIELDS.to_string()))
}

fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidRequest("Invalid user id".to_string()))
}

/// Validates the payload, hashes the password and stores the user
pub async fn register_user(state: &AppState, request: RegisterUserRequest) -> Result<ObjectId, AppError> {
    let name = required(request.name)?;
    let email = required(request.email)?;
    let category = required(request.category)?;
    let password = required(request.password)?;
    let courses = request
        .courses
        .ok_or_else(|| AppError::InvalidRequest(MISSING_FIELDS.to_string()))?;
    let mobile = required_bson(request.mobile)?;
    let id = required_bson(request.id)?;

    let password = auth_service::hash_password(password, state.password_cost).await?;

    let user = User {
        object_id: None,
        name,
        email,
        category,
        password,
        fingerprint: request.fingerprint.filter(|f| !matches!(f, Bson::Null)),
        courses,
        mobile,
        id,
    };

    match state.repo.insert_user(&user).await {
        Err(AppError::Conflict(_)) => Err(AppError::Conflict("Email is already registered".to_string())),
        other => other,
    }
}

pub async fn list_users(repo: &dyn Repository) -> Result<Vec<Document>, AppError> {
    let users = repo.list_users().await?;
    Ok(users.into_iter().map(without_password).collect())
}

pub async fn delete_user(repo: &dyn Repository, id: &str) -> Result<bool, AppError> {
    let id = parse_object_id(id)?;
    repo.delete_user(id).await
}

/// Overwrites the provided profile fields. `false` when nothing changed.
pub async fn update_user(repo: &dyn Repository, id: &str, request: UpdateUserRequest) -> Result<bool, AppError> {
    let id = parse_object_id(id)?;

    let mut changes = doc! {};
    if let Some(name) = request.name {
        changes.insert("name", name);
    }
    if let Some(email) = request.email {
        changes.insert("email", email);
    }
    if let Some(mobile) = request.mobile {
        changes.insert("mobile", mobile);
    }
    if let Some(courses) = request.courses {
        changes.insert("courses", courses);
    }

    // MongoDB rejects an empty $set
    if changes.is_empty() {
        return Ok(false);
    }

    repo.update_user(id, changes).await
}

fn course_name(request: &CourseRequest) -> Result<&str, AppError> {
    request
        .name()
        .ok_or_else(|| AppError::InvalidRequest("courseName is required".to_string()))
}

pub async fn students_in_course(repo: &dyn Repository, request: &CourseRequest) -> Result<Vec<Document>, AppError> {
    let students = repo.students_in_course(course_name(request)?).await?;
    Ok(students.into_iter().map(without_password).collect())
}

/// Fingerprint of every student in the course, `null` for unenrolled sensors
pub async fn student_fingerprints(repo: &dyn Repository, request: &CourseRequest) -> Result<Vec<Bson>, AppError> {
    let students = repo.students_in_course(course_name(request)?).await?;

    Ok(students
        .into_iter()
        .map(|mut student| student.remove("fingerprint").unwrap_or(Bson::Null))
        .collect())
}

/// Identifies who touched the sensor. Teachers also get their courses.
pub async fn search_by_fingerprint(
    repo: &dyn Repository,
    request: FingerprintRequest,
) -> Result<FingerprintMatch, AppError> {
    let fingerprint = request
        .fingerprint
        .filter(|f| !matches!(f, Bson::Null))
        .ok_or_else(|| AppError::InvalidRequest("fingerprint is required".to_string()))?;

    let user = repo
        .find_user_by_fingerprint(&fingerprint)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(fingerprint_match(user))
}

fn fingerprint_match(mut user: Document) -> FingerprintMatch {
    let category = user.get_str("category").unwrap_or_default().to_string();

    let courses = if category == CATEGORY_TEACHER {
        Some(
            user.get_array("courses")
                .map(|names| {
                    names
                        .iter()
                        .filter_map(|n| n.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
        )
    } else {
        None
    };

    FingerprintMatch {
        name: user.get_str("name").unwrap_or_default().to_string(),
        category,
        id: bson_to_json(user.remove("id").unwrap_or(Bson::Null)),
        courses,
    }
}
