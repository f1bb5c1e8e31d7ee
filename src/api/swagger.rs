use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Service API",
        version = "1.0.0",
        description = "HTTP API for the fingerprint attendance system.\n\n**Collections:**\n- Users (students and teachers)\n- Pending fingerprint registrations\n- Attendance events\n- Per-course student snapshots\n- Course roster",
    ),
    paths(
        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Courses
        crate::api::courses::get_courses,
        crate::api::courses::add_course,

        // Registrations
        crate::api::registrations::add_registration,
        crate::api::registrations::get_registrations,
        crate::api::registrations::clear_registrations,
        crate::api::registrations::get_next_serial,

        // Users
        crate::api::users::register_user,
        crate::api::users::get_users,
        crate::api::users::delete_user,
        crate::api::users::update_user,
        crate::api::users::students_by_course,
        crate::api::users::student_fingerprints,
        crate::api::users::search_user,

        // Auth
        crate::api::auth::authenticate,

        // Attendance
        crate::api::attendance::post_attendance,
        crate::api::attendance::get_course_attendance,

        // Student Info
        crate::api::student_info::delete_course_snapshots,
        crate::api::student_info::put_student_snapshots,
        crate::api::student_info::post_student_snapshots,
        crate::api::student_info::get_student_snapshots,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
            crate::models::MessageResponse,
            crate::models::ErrorResponse,
            crate::models::CourseRequest,
            crate::models::NextSerialResponse,
            crate::models::RegisterUserRequest,
            crate::models::UpdateUserRequest,
            crate::models::CredentialsRequest,
            crate::models::FingerprintRequest,
            crate::models::FingerprintMatch,
            crate::models::CourseAttendance,
        )
    ),
    tags(
        (name = "Health", description = "Health check and request counters."),
        (name = "Courses", description = "The single course roster document."),
        (name = "Registrations", description = "Fingerprint templates waiting to be assigned, and the next free sensor slot."),
        (name = "Users", description = "Student and teacher records, course membership and fingerprint lookup."),
        (name = "Auth", description = "Email and password check."),
        (name = "Attendance", description = "Raw attendance events per course."),
        (name = "Student Info", description = "Per-course student snapshots, replaced wholesale per course."),
    )
)]
pub struct ApiDoc;
