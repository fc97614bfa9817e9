pub mod activity;
pub mod attendance;
pub mod auth;
pub mod classrooms;
pub mod complaints;
pub mod date_sheets;
pub mod fees;
pub mod leaves;
pub mod notifications;
pub mod parents;
pub mod students;
pub mod subjects;
pub mod system;
pub mod teachers;
pub mod timetable;
pub mod users;

pub use activity::configure_activity_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use classrooms::configure_classroom_routes;
pub use complaints::configure_complaint_routes;
pub use date_sheets::configure_date_sheet_routes;
pub use fees::configure_fee_routes;
pub use leaves::configure_leave_routes;
pub use notifications::configure_notification_routes;
pub use parents::configure_parent_routes;
pub use students::configure_student_routes;
pub use subjects::configure_subject_routes;
pub use system::configure_system_routes;
pub use teachers::configure_teacher_routes;
pub use timetable::configure_timetable_routes;
pub use users::configure_user_routes;

/// 注册全部路由
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    configure_system_routes(cfg);
    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_activity_routes(cfg);
    configure_classroom_routes(cfg);
    configure_subject_routes(cfg);
    configure_student_routes(cfg);
    configure_teacher_routes(cfg);
    configure_parent_routes(cfg);
    configure_attendance_routes(cfg);
    configure_fee_routes(cfg);
    configure_timetable_routes(cfg);
    configure_date_sheet_routes(cfg);
    configure_leave_routes(cfg);
    configure_complaint_routes(cfg);
    configure_notification_routes(cfg);
}
