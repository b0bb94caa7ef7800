pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod utils;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/employees")
            .route(web::get().to(handlers::employee::get_employees))
            .route(web::post().to(handlers::employee::create_employee)),
    )
    .service(
        web::resource("/employees/validate")
            .route(web::post().to(handlers::employee::check_employee)),
    )
    .service(
        web::resource("/employees/{employee_id}")
            .route(web::get().to(handlers::employee::get_employee))
            .route(web::patch().to(handlers::employee::update_employee)),
    )
    .service(
        web::resource("/timesheets")
            .route(web::get().to(handlers::timesheet::get_timesheets))
            .route(web::post().to(handlers::timesheet::create_timesheet)),
    )
    .service(
        web::resource("/timesheets/new")
            .route(web::get().to(handlers::timesheet::new_timesheet)),
    )
    .service(
        web::resource("/timesheets/calendar")
            .route(web::get().to(handlers::timesheet::get_calendar)),
    )
    .service(
        web::resource("/timesheets/validate")
            .route(web::post().to(handlers::timesheet::check_timesheet)),
    )
    .service(
        web::resource("/timesheets/{timesheet_id}")
            .route(web::get().to(handlers::timesheet::get_timesheet))
            .route(web::patch().to(handlers::timesheet::update_timesheet)),
    );
}
