use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::Document;
use serde_json::json;

use crate::models::{ErrorResponse, MessageResponse, NextSerialResponse};
use crate::services::registration_service;
use crate::state::AppState;
use crate::utils::{documents_to_json, AppError};

/// POST /newReg - Guarda um template de digital pendente
#[utoipa::path(
    post,
    path = "/newReg",
    tag = "Registrations",
    request_body = Object,
    responses(
        (status = 200, description = "Stored", body = String, content_type = "text/plain"),
        (status = 500, description = "Database failure", body = String, content_type = "text/plain")
    )
)]
pub async fn add_registration(state: web::Data<AppState>, body: web::Json<Document>) -> impl Responder {
    match registration_service::add_registration(state.repo.as_ref(), body.into_inner()).await {
        Ok(()) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body("Fingerprint inserted successfully"),
        Err(e) => {
            log::error!("❌ Error inserting fingerprint registration: {}", e);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body("Fingerprint insertion failed")
        }
    }
}

/// GET /newReg - Lista os registros pendentes
#[utoipa::path(
    get,
    path = "/newReg",
    tag = "Registrations",
    responses(
        (status = 200, description = "Pending registrations", body = [Object]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn get_registrations(state: web::Data<AppState>) -> impl Responder {
    match registration_service::list_registrations(state.repo.as_ref()).await {
        Ok(registrations) => HttpResponse::Ok().json(documents_to_json(registrations)),
        Err(e) => {
            log::error!("❌ Error fetching registrations: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch registrations" }))
        }
    }
}

/// DELETE /newReg - Remove todos os registros pendentes
#[utoipa::path(
    delete,
    path = "/newReg",
    tag = "Registrations",
    responses(
        (status = 200, description = "All pending registrations removed", body = MessageResponse),
        (status = 404, description = "Nothing to remove", body = MessageResponse),
        (status = 500, description = "Database failure", body = MessageResponse)
    )
)]
pub async fn clear_registrations(state: web::Data<AppState>) -> impl Responder {
    match registration_service::clear_registrations(state.repo.as_ref()).await {
        Ok(deleted) => {
            log::info!("🗑️  Deleted {} pending registrations", deleted);
            HttpResponse::Ok().json(json!({ "message": "NewPrint data deleted successfully" }))
        }
        Err(AppError::NotFound(msg)) => HttpResponse::NotFound().json(json!({ "message": msg })),
        Err(e) => {
            log::error!("❌ Error clearing registrations: {}", e);
            HttpResponse::InternalServerError().json(json!({ "message": "Internal Server Error" }))
        }
    }
}

/// GET /next-serial - Próximo slot livre no sensor
#[utoipa::path(
    get,
    path = "/next-serial",
    tag = "Registrations",
    responses(
        (status = 200, description = "Lowest unused fingerprint slot", body = NextSerialResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn get_next_serial(state: web::Data<AppState>) -> impl Responder {
    match registration_service::next_serial(state.repo.as_ref()).await {
        Ok(next_serial) => HttpResponse::Ok().json(NextSerialResponse { next_serial }),
        Err(e) => {
            log::error!("❌ Error retrieving next serial: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to retrieve next serial" }))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app_state, seed_user};
    use actix_web::{http::StatusCode, test};
    use mongodb::bson::Bson;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_registration_lifecycle() {
        let (repo, state) = app_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/newReg")
            .set_json(json!({ "newPrint": "AQIDBA==" }))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "Fingerprint inserted successfully");
        assert_eq!(repo.registrations().len(), 1);

        let req = test::TestRequest::get().uri("/newReg").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["newPrint"], "AQIDBA==");

        let req = test::TestRequest::delete().uri("/newReg").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete().uri("/newReg").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "No newPrint data found");
    }

    #[actix_web::test]
    async fn test_next_serial_fills_gap() {
        let (repo, state) = app_state();
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/next-serial").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "nextSerial": 1 }));

        seed_user(&repo, "a@example.com", "Student", Bson::from("1")).await;
        seed_user(&repo, "b@example.com", "Student", Bson::from(3)).await;
        seed_user(&repo, "c@example.com", "Teacher", Bson::Null).await;

        let req = test::TestRequest::get().uri("/next-serial").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "nextSerial": 2 }));
    }

    #[actix_web::test]
    async fn test_non_object_body_rejected() {
        let (repo, state) = app_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/newReg")
            .set_json(json!(["not", "an", "object"]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(repo.registrations().is_empty());
    }

    #[actix_web::test]
    async fn test_insert_failure_is_plain_text() {
        let (repo, state) = app_state();
        let app = test_app!(state);
        repo.set_failing(true);

        let req = test::TestRequest::post()
            .uri("/newReg")
            .set_json(json!({ "fingerprint": 12 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(test::read_body(resp).await, "Fingerprint insertion failed");
        assert!(repo.registrations().is_empty());
    }
}
