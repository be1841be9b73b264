use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, web};

use crate::domain::filter::FilterQuery;
use crate::dto::api::MessagePayload;
use crate::forms::listing::ListingForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::listing as listing_service;

/// Listing search. Query parameters are read leniently; see [`FilterQuery`].
#[get("/listing/get")]
pub async fn get_listings(req: HttpRequest, repo: web::Data<DieselRepository>) -> impl Responder {
    let params = FilterQuery::parse(req.query_string());
    match listing_service::search_listings(repo.get_ref(), &params) {
        Ok(listings) => HttpResponse::Ok().json(listings),
        Err(err) => error_response(err),
    }
}

#[get("/listing/get/{listing_id}")]
pub async fn get_listing(
    listing_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match listing_service::get_listing(repo.get_ref(), listing_id.into_inner()) {
        Ok(listing) => HttpResponse::Ok().json(listing),
        Err(err) => error_response(err),
    }
}

#[post("/listing/create")]
pub async fn create_listing(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ListingForm>,
) -> impl Responder {
    match listing_service::create_listing(repo.get_ref(), &user, form) {
        Ok(listing) => HttpResponse::Created().json(listing),
        Err(err) => error_response(err),
    }
}

#[post("/listing/update/{listing_id}")]
pub async fn update_listing(
    listing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ListingForm>,
) -> impl Responder {
    match listing_service::update_listing(repo.get_ref(), &user, listing_id.into_inner(), form) {
        Ok(listing) => HttpResponse::Ok().json(listing),
        Err(err) => error_response(err),
    }
}

#[delete("/listing/delete/{listing_id}")]
pub async fn delete_listing(
    listing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match listing_service::delete_listing(repo.get_ref(), &user, listing_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(MessagePayload::new("Listing has been deleted!")),
        Err(err) => error_response(err),
    }
}
