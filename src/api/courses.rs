use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::{CourseRequest, ErrorResponse, MessageResponse};
use crate::services::course_service;
use crate::state::AppState;
use crate::utils::{documents_to_json, AppError};

/// GET /courses - Lista o roster de cursos
#[utoipa::path(
    get,
    path = "/courses",
    tag = "Courses",
    responses(
        (status = 200, description = "Course roster documents", body = [Object]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn get_courses(state: web::Data<AppState>) -> impl Responder {
    match course_service::list_courses(state.repo.as_ref()).await {
        Ok(courses) => HttpResponse::Ok().json(documents_to_json(courses)),
        Err(e) => {
            log::error!("❌ Error fetching courses: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch courses" }))
        }
    }
}

/// POST /courses - Adiciona um curso ao roster
#[utoipa::path(
    post,
    path = "/courses",
    tag = "Courses",
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Course appended", body = MessageResponse),
        (status = 400, description = "Missing courseName", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn add_course(state: web::Data<AppState>, body: web::Json<CourseRequest>) -> impl Responder {
    match course_service::add_course(state.repo.as_ref(), &body).await {
        Ok(name) => {
            log::info!("✅ Course added successfully: {}", name);
            HttpResponse::Ok().json(json!({ "message": "Course added successfully" }))
        }
        Err(AppError::InvalidRequest(msg)) => HttpResponse::BadRequest().json(json!({ "error": msg })),
        Err(e) => {
            log::error!("❌ Error adding course in MongoDB: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to add course" }))
        }
    }
}
