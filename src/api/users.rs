use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::models::{
    CourseRequest, ErrorResponse, FingerprintMatch, FingerprintRequest, MessageResponse,
    RegisterUserRequest, UpdateUserRequest,
};
use crate::services::user_service;
use crate::state::AppState;
use crate::utils::{bson_to_json, documents_to_json, AppError};

/// POST /users - Cadastra um usuário
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "User registered", body = MessageResponse),
        (status = 400, description = "A required field is missing", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn register_user(state: web::Data<AppState>, body: web::Json<RegisterUserRequest>) -> impl Responder {
    match user_service::register_user(&state, body.into_inner()).await {
        Ok(id) => {
            log::info!("✅ User registered successfully: {}", id);
            HttpResponse::Ok().json(json!({ "message": "User registered successfully" }))
        }
        Err(AppError::InvalidRequest(msg)) => HttpResponse::BadRequest().json(json!({ "error": msg })),
        Err(AppError::Conflict(msg)) => {
            log::warn!("⚠️ Duplicate registration rejected");
            HttpResponse::Conflict().json(json!({ "error": msg }))
        }
        Err(e) => {
            log::error!("❌ Error inserting user into MongoDB: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to register user" }))
        }
    }
}

/// GET /users - Lista todos os usuários (sem senha)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [Object]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn get_users(state: web::Data<AppState>) -> impl Responder {
    match user_service::list_users(state.repo.as_ref()).await {
        Ok(users) => HttpResponse::Ok().json(documents_to_json(users)),
        Err(e) => {
            log::error!("❌ Error fetching users: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch users" }))
        }
    }
}

/// DELETE /users/{id} - Remove um usuário pelo ObjectId
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (hex)")),
    responses(
        (status = 200, description = "Whether a user was deleted", body = bool),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 500, description = "Database failure", body = String, content_type = "text/plain")
    )
)]
pub async fn delete_user(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match user_service::delete_user(state.repo.as_ref(), &id).await {
        Ok(deleted) => {
            log::info!("🗑️  DELETE /users/{} - deleted: {}", id, deleted);
            HttpResponse::Ok().json(deleted)
        }
        Err(AppError::InvalidRequest(msg)) => HttpResponse::BadRequest().json(json!({ "error": msg })),
        Err(e) => {
            log::error!("❌ Error deleting user: {}", e);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body("Failed to delete user")
        }
    }
}

/// POST /users/{id} - Edita nome, email, celular e cursos
#[utoipa::path(
    post,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (hex)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Whether anything changed", body = bool),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 500, description = "Database failure", body = String, content_type = "text/plain")
    )
)]
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> impl Responder {
    let id = path.into_inner();

    match user_service::update_user(state.repo.as_ref(), &id, body.into_inner()).await {
        Ok(modified) => {
            log::info!("🔧 POST /users/{} - modified: {}", id, modified);
            HttpResponse::Ok().json(modified)
        }
        Err(AppError::InvalidRequest(msg)) => HttpResponse::BadRequest().json(json!({ "error": msg })),
        Err(e) => {
            log::error!("❌ Error updating user: {}", e);
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body("Failed to update user")
        }
    }
}

/// POST /students-by-course - Alunos matriculados no curso
#[utoipa::path(
    post,
    path = "/students-by-course",
    tag = "Users",
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Students enrolled in the course", body = [Object]),
        (status = 400, description = "Missing courseName", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn students_by_course(state: web::Data<AppState>, body: web::Json<CourseRequest>) -> impl Responder {
    match user_service::students_in_course(state.repo.as_ref(), &body).await {
        Ok(students) => HttpResponse::Ok().json(documents_to_json(students)),
        Err(AppError::InvalidRequest(msg)) => HttpResponse::BadRequest().json(json!({ "error": msg })),
        Err(e) => {
            log::error!("❌ Error fetching students: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Internal Server Error" }))
        }
    }
}

/// POST /students-by-course-fID - Digitais dos alunos do curso
#[utoipa::path(
    post,
    path = "/students-by-course-fID",
    tag = "Users",
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Fingerprint of each enrolled student (null when unset)", body = [Object]),
        (status = 400, description = "Missing courseName", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn student_fingerprints(state: web::Data<AppState>, body: web::Json<CourseRequest>) -> impl Responder {
    match user_service::student_fingerprints(state.repo.as_ref(), &body).await {
        Ok(fingerprints) => {
            let fingerprints: Vec<serde_json::Value> = fingerprints.into_iter().map(bson_to_json).collect();
            HttpResponse::Ok().json(fingerprints)
        }
        Err(AppError::InvalidRequest(msg)) => HttpResponse::BadRequest().json(json!({ "error": msg })),
        Err(e) => {
            log::error!("❌ Error fetching student fingerprints: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Internal Server Error" }))
        }
    }
}

/// POST /search-user - Identifica o usuário pela digital
#[utoipa::path(
    post,
    path = "/search-user",
    tag = "Users",
    request_body = FingerprintRequest,
    responses(
        (status = 200, description = "Matched user", body = FingerprintMatch),
        (status = 400, description = "Missing fingerprint", body = ErrorResponse),
        (status = 404, description = "No user has this fingerprint", body = MessageResponse),
        (status = 500, description = "Database failure", body = MessageResponse)
    )
)]
pub async fn search_user(state: web::Data<AppState>, body: web::Json<FingerprintRequest>) -> impl Responder {
    match user_service::search_by_fingerprint(state.repo.as_ref(), body.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(AppError::InvalidRequest(msg)) => HttpResponse::BadRequest().json(json!({ "error": msg })),
        Err(AppError::NotFound(msg)) => HttpResponse::NotFound().json(json!({ "message": msg })),
        Err(e) => {
            log::error!("❌ Error searching for user by fingerprint: {}", e);
            HttpResponse::InternalServerError().json(json!({ "message": "Fingerprint search failed" }))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app_state, seed_user};
    use actix_web::{http::StatusCode, test};
    use mongodb::bson::Bson;
    use serde_json::{json, Value};

    fn registration(email: &str) -> Value {
        json!({
            "name": "Ada",
            "email": email,
            "category": "Student",
            "password": "hunter2",
            "fingerprint": 4,
            "courses": ["CSE101"],
            "mobile": "01700000000",
            "id": "2021-1-60-001"
        })
    }

    #[actix_web::test]
    async fn test_register_and_list_hides_password() {
        let (_repo, state) = app_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(registration("ada@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/users").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["email"], "ada@example.com");
        assert!(body[0].get("password").is_none());
    }

    #[actix_web::test]
    async fn test_register_missing_field() {
        let (_repo, state) = app_state();
        let app = test_app!(state);

        let mut payload = registration("ada@example.com");
        payload.as_object_mut().unwrap().remove("courses");

        let req = test::TestRequest::post().uri("/users").set_json(payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "All fields are required, including courses");
    }

    #[actix_web::test]
    async fn test_duplicate_email_conflicts() {
        let (_repo, state) = app_state();
        let app = test_app!(state);

        for expected in [StatusCode::OK, StatusCode::CONFLICT] {
            let req = test::TestRequest::post()
                .uri("/users")
                .set_json(registration("ada@example.com"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }
    }

    #[actix_web::test]
    async fn test_update_and_delete_by_object_id() {
        let (repo, state) = app_state();
        let app = test_app!(state);
        let id = seed_user(&repo, "ada@example.com", "Student", Bson::from(1)).await;

        let req = test::TestRequest::post()
            .uri(&format!("/users/{}", id.to_hex()))
            .set_json(json!({ "mobile": "01900000000", "courses": ["CSE101", "PHY101"] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!(true));
        assert_eq!(repo.users()[0].get_str("mobile").unwrap(), "01900000000");
        // Fields left out of the body keep their stored value
        assert_eq!(repo.users()[0].get_str("name").unwrap(), "Student user");

        let req = test::TestRequest::delete().uri(&format!("/users/{}", id.to_hex())).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!(true));

        let req = test::TestRequest::delete().uri(&format!("/users/{}", id.to_hex())).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!(false));

        let req = test::TestRequest::delete().uri("/users/zzz").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_course_queries() {
        let (repo, state) = app_state();
        let app = test_app!(state);
        seed_user(&repo, "s1@example.com", "Student", Bson::from(1)).await;
        seed_user(&repo, "s2@example.com", "Student", Bson::Null).await;
        seed_user(&repo, "t1@example.com", "Teacher", Bson::from(3)).await;

        let req = test::TestRequest::post()
            .uri("/students-by-course")
            .set_json(json!({ "courseName": "CSE101" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 2);

        let req = test::TestRequest::post()
            .uri("/students-by-course-fID")
            .set_json(json!({ "courseName": "CSE101" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([1, null]));
    }

    #[actix_web::test]
    async fn test_search_user() {
        let (repo, state) = app_state();
        let app = test_app!(state);
        seed_user(&repo, "t1@example.com", "Teacher", Bson::from(3)).await;

        let req = test::TestRequest::post()
            .uri("/search-user")
            .set_json(json!({ "fingerprint": 3 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["category"], "Teacher");
        assert_eq!(body["courses"], json!(["CSE101"]));

        let req = test::TestRequest::post()
            .uri("/search-user")
            .set_json(json!({ "fingerprint": 42 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_database_failures() {
        let (repo, state) = app_state();
        let app = test_app!(state);
        let id = seed_user(&repo, "ada@example.com", "Student", Bson::from(1)).await;
        repo.set_failing(true);

        let req = test::TestRequest::delete().uri(&format!("/users/{}", id.to_hex())).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(test::read_body(resp).await, "Failed to delete user");

        let req = test::TestRequest::post()
            .uri(&format!("/users/{}", id.to_hex()))
            .set_json(json!({ "name": "Ada L." }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(test::read_body(resp).await, "Failed to update user");

        let req = test::TestRequest::post()
            .uri("/search-user")
            .set_json(json!({ "fingerprint": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Fingerprint search failed" }));
    }
}
