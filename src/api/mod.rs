use actix_web::{error::InternalError, web, HttpResponse, Responder};

/// Builds the full application around an `AppState` for `actix_web::test`
#[cfg(test)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state)
                .app_data(crate::api::json_config())
                .wrap(crate::middleware::RequestMetrics)
                .configure(crate::api::configure),
        )
        .await
    };
}

pub mod attendance;
pub mod auth;
pub mod courses;
pub mod health;
pub mod metrics;
pub mod registrations;
pub mod student_info;
pub mod swagger;
pub mod users;

/// Malformed JSON bodies answer with the same `{"error": ...}` shape as the routes
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(4 * 1024 * 1024)
        .error_handler(|err, _req| {
            let message = format!("Invalid JSON body: {}", err);
            log::warn!("⚠️ {}", message);
            InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
            )
            .into()
        })
}

/// GET / - Sinal de vida
pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("attendance service is running")
}

/// Registers every route. Static segments go before the `{param}`
/// routes that would otherwise capture them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Courses
        .service(
            web::resource("/courses")
                .route(web::get().to(courses::get_courses))
                .route(web::post().to(courses::add_course)),
        )
        // Pending fingerprint registrations
        .service(
            web::resource("/newReg")
                .route(web::get().to(registrations::get_registrations))
                .route(web::post().to(registrations::add_registration))
                .route(web::delete().to(registrations::clear_registrations)),
        )
        .route("/next-serial", web::get().to(registrations::get_next_serial))
        // Users
        .service(
            web::resource("/users")
                .route(web::get().to(users::get_users))
                .route(web::post().to(users::register_user)),
        )
        .service(
            web::resource("/users/{id}")
                .route(web::post().to(users::update_user))
                .route(web::delete().to(users::delete_user)),
        )
        .route("/students-by-course", web::post().to(users::students_by_course))
        .route("/students-by-course-fID", web::post().to(users::student_fingerprints))
        .route("/search-user", web::post().to(users::search_user))
        // Auth
        .route("/authenticate", web::post().to(auth::authenticate))
        // Attendance events and per-course student snapshots
        .route("/attendance", web::post().to(attendance::post_attendance))
        .route("/attendance/delete", web::delete().to(student_info::delete_course_snapshots))
        .route("/attendance/{course}", web::get().to(attendance::get_course_attendance))
        .route("/attendance-student", web::put().to(student_info::put_student_snapshots))
        .route("/student-att-data", web::post().to(student_info::post_student_snapshots))
        .route("/get-student-att-data/{id}", web::get().to(student_info::get_student_snapshots));
}
