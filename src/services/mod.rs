pub mod attendance_service;
pub mod auth_service;
pub mod course_service;
pub mod registration_service;
pub mod student_info_service;
pub mod user_service;
