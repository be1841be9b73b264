//! HTTP routes of the JSON API.

use actix_multipart::form::MultipartFormConfig;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::domain::listing::MAX_LISTING_IMAGES;
use crate::dto::api::FailurePayload;
use crate::services::ServiceError;
use crate::services::upload::MAX_IMAGE_BYTES;

pub mod auth;
pub mod listing;
pub mod upload;
pub mod user;

/// Converts a service failure into the JSON failure payload.
pub fn error_response(err: ServiceError) -> HttpResponse {
    let (status, message) = match err {
        ServiceError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        ServiceError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
        ServiceError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            (StatusCode::BAD_REQUEST, message)
        }
        ServiceError::Internal => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    };
    HttpResponse::build(status).json(FailurePayload::new(status.as_u16(), message))
}

fn bad_request(err: impl std::fmt::Display + std::fmt::Debug + 'static) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(FailurePayload::new(400, err.to_string()));
    InternalError::from_response(err, response).into()
}

/// Registers every API route under `/api`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        log::warn!("Rejected JSON body: {err}");
        bad_request(err)
    });
    let multipart_config = MultipartFormConfig::default()
        .total_limit(MAX_LISTING_IMAGES * MAX_IMAGE_BYTES + 64 * 1024)
        .memory_limit(MAX_IMAGE_BYTES)
        .error_handler(|err, _req: &HttpRequest| {
            log::warn!("Rejected upload: {err}");
            bad_request(err)
        });

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .app_data(multipart_config)
            .service(listing::get_listings)
            .service(listing::get_listing)
            .service(listing::create_listing)
            .service(listing::update_listing)
            .service(listing::delete_listing)
            .service(user::user_listings)
            .service(user::update_user)
            .service(user::delete_user)
            .service(user::get_user)
            .service(auth::start_session)
            .service(auth::sign_out)
            .service(upload::upload_images),
    );
}
