use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::Document;
use serde_json::json;

use crate::models::{CourseAttendance, ErrorResponse, MessageResponse};
use crate::services::attendance_service;
use crate::state::AppState;
use crate::utils::AppError;

/// POST /attendance - Registra um evento de presença
#[utoipa::path(
    post,
    path = "/attendance",
    tag = "Attendance",
    request_body = Object,
    responses(
        (status = 201, description = "Event stored", body = MessageResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn post_attendance(state: web::Data<AppState>, body: web::Json<Document>) -> impl Responder {
    let event = body.into_inner();
    log::debug!("📥 Attendance event: {}", event);

    match attendance_service::record_attendance(state.repo.as_ref(), event).await {
        Ok(()) => HttpResponse::Created().json(json!({ "message": "Attendance data successfully posted" })),
        Err(e) => {
            log::error!("❌ Error inserting attendance data into MongoDB: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to post attendance data" }))
        }
    }
}

/// GET /attendance/{course} - Eventos de presença do curso
#[utoipa::path(
    get,
    path = "/attendance/{course}",
    tag = "Attendance",
    params(("course" = String, Path, description = "Course name")),
    responses(
        (status = 200, description = "Events for the course", body = CourseAttendance),
        (status = 404, description = "No events for the course", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn get_course_attendance(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let course = path.into_inner();

    match attendance_service::attendance_for_course(state.repo.as_ref(), &course).await {
        Ok(attendance) => HttpResponse::Ok().json(attendance),
        Err(AppError::NotFound(msg)) => HttpResponse::NotFound().json(json!({ "error": msg })),
        Err(e) => {
            log::error!("❌ Error retrieving attendance data: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to retrieve attendance data" }))
        }
    }
}
