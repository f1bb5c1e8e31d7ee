use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::{CredentialsRequest, ErrorResponse};
use crate::services::auth_service;
use crate::state::AppState;
use crate::utils::{document_to_json, AppError};

/// POST /authenticate - Login por email e senha
#[utoipa::path(
    post,
    path = "/authenticate",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Authenticated user record (no password)", body = Object),
        (status = 400, description = "Email or password missing", body = ErrorResponse),
        (status = 401, description = "Wrong email or password", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn authenticate(state: web::Data<AppState>, body: web::Json<CredentialsRequest>) -> impl Responder {
    match auth_service::authenticate(state.repo.as_ref(), body.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(document_to_json(user)),
        Err(AppError::InvalidRequest(msg)) => HttpResponse::BadRequest().json(json!({ "error": msg })),
        Err(AppError::Unauthorized(msg)) => HttpResponse::Unauthorized().json(json!({ "error": msg })),
        Err(e) => {
            log::error!("❌ Error authenticating user: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Internal Server Error" }))
        }
    }
}
