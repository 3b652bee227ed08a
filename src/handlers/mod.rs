pub mod employee;

use actix_cors::Cors;
use actix_web::{error, web};

use crate::errors::AppError;

/// Registers the `/employees` resource, including the body and path
/// extractor configs so malformed input gets the standard error body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| error::Error::from(AppError::BadRequest(err.to_string()))),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| error::Error::from(AppError::BadRequest(err.to_string()))),
    )
    .service(
        web::scope("/employees")
            .route("", web::post().to(employee::create_employee))
            .route("", web::get().to(employee::get_employees))
            .route(
                "/department/{department}",
                web::get().to(employee::get_employees_by_department),
            )
            .route("/status/{status}", web::get().to(employee::get_employees_by_status))
            .route("/{id}", web::get().to(employee::get_employee))
            .route("/{id}", web::put().to(employee::update_employee))
            .route("/{id}", web::delete().to(employee::delete_employee)),
    );
}

/// Cross-origin policy: one allowed origin, the resource's methods, any
/// request header.
pub fn cors(allowed_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allowed_origin)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
