use actix_web::{web, HttpResponse, Responder};
use serde_json::{json, Value};

use crate::models::{CourseRequest, ErrorResponse, MessageResponse};
use crate::services::student_info_service::{self, Validation};
use crate::state::AppState;
use crate::utils::{documents_to_json, AppError};

/// DELETE /attendance/delete - Apaga os snapshots de um curso
#[utoipa::path(
    delete,
    path = "/attendance/delete",
    tag = "Student Info",
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Snapshots removed", body = MessageResponse),
        (status = 400, description = "Missing courseName", body = ErrorResponse),
        (status = 404, description = "Course had no snapshots", body = MessageResponse),
        (status = 500, description = "Database failure", body = MessageResponse)
    )
)]
pub async fn delete_course_snapshots(state: web::Data<AppState>, body: web::Json<CourseRequest>) -> impl Responder {
    match student_info_service::clear_course(state.repo.as_ref(), &body).await {
        Ok(deleted) => {
            log::info!("🗑️  Deleted {} student snapshots", deleted);
            HttpResponse::Ok().json(json!({ "message": "Attendance data deleted successfully" }))
        }
        Err(AppError::InvalidRequest(msg)) => HttpResponse::BadRequest().json(json!({ "error": msg })),
        Err(AppError::NotFound(msg)) => HttpResponse::NotFound().json(json!({ "message": msg })),
        Err(e) => {
            log::error!("❌ Error deleting student snapshots: {}", e);
            HttpResponse::InternalServerError().json(json!({ "message": "Internal Server Error" }))
        }
    }
}

/// PUT /attendance-student - Substitui os snapshots do curso do primeiro item
#[utoipa::path(
    put,
    path = "/attendance-student",
    tag = "Student Info",
    request_body = [Object],
    responses(
        (status = 200, description = "Course snapshots replaced", body = MessageResponse),
        (status = 400, description = "Empty batch or missing courseName", body = ErrorResponse),
        (status = 500, description = "Database failure", body = Object)
    )
)]
pub async fn put_student_snapshots(state: web::Data<AppState>, body: web::Json<Value>) -> impl Responder {
    let batch = match student_info_service::parse_batch(body.into_inner(), Validation::CourseKeyOnly) {
        Ok(batch) => batch,
        Err(AppError::InvalidRequest(msg)) => return HttpResponse::BadRequest().json(json!({ "error": msg })),
        Err(e) => {
            log::error!("❌ Error reading student snapshots: {}", e);
            return HttpResponse::InternalServerError().json(json!({ "message": "Internal Server Error" }));
        }
    };

    match student_info_service::replace_course(&state, batch).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "message": "Student info updated successfully" })),
        Err(e) => {
            log::error!("❌ Error replacing student snapshots: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error",
                "error": e.to_string()
            }))
        }
    }
}

/// POST /student-att-data - Valida e substitui os snapshots do curso
#[utoipa::path(
    post,
    path = "/student-att-data",
    tag = "Student Info",
    request_body = [Object],
    responses(
        (status = 201, description = "Course snapshots replaced", body = MessageResponse),
        (status = 400, description = "Empty or malformed batch", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn post_student_snapshots(state: web::Data<AppState>, body: web::Json<Value>) -> impl Responder {
    let batch = match student_info_service::parse_batch(body.into_inner(), Validation::Strict) {
        Ok(batch) => batch,
        Err(AppError::InvalidRequest(msg)) => {
            log::warn!("⚠️ Rejected student snapshots: {}", msg);
            return HttpResponse::BadRequest().json(json!({ "error": msg }));
        }
        Err(e) => {
            log::error!("❌ Error handling student attendance data: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to process student attendance data" }));
        }
    };

    match student_info_service::replace_course(&state, batch).await {
        Ok(_) => HttpResponse::Created().json(json!({ "message": "Student attendance data successfully posted" })),
        Err(e) => {
            log::error!("❌ Error handling student attendance data: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to process student attendance data" }))
        }
    }
}

/// GET /get-student-att-data/{id} - Snapshots de um aluno
#[utoipa::path(
    get,
    path = "/get-student-att-data/{id}",
    tag = "Student Info",
    params(("id" = String, Path, description = "External student id")),
    responses(
        (status = 200, description = "Snapshots of the student across courses", body = [Object]),
        (status = 404, description = "No snapshots for the student", body = MessageResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn get_student_snapshots(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let student_id = path.into_inner();

    match student_info_service::snapshots_for_student(state.repo.as_ref(), &student_id).await {
        Ok(snapshots) => HttpResponse::Ok().json(documents_to_json(snapshots)),
        Err(AppError::NotFound(msg)) => HttpResponse::NotFound().json(json!({ "message": msg })),
        Err(e) => {
            log::error!("❌ Error fetching student data from MongoDB: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch student data" }))
        }
    }
}
