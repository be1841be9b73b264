use actix_identity::Identity;
use actix_web::{HttpResponse, Responder, delete, get, post, web};

use crate::dto::api::MessagePayload;
use crate::forms::user::UpdateProfileForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::user as user_service;

#[get("/user/{user_id}")]
pub async fn get_user(user_id: web::Path<i32>, repo: web::Data<DieselRepository>) -> impl Responder {
    match user_service::get_user(repo.get_ref(), user_id.into_inner()) {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => error_response(err),
    }
}

#[post("/user/update/{user_id}")]
pub async fn update_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateProfileForm>,
) -> impl Responder {
    match user_service::update_user(repo.get_ref(), &user, user_id.into_inner(), form) {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(err) => error_response(err),
    }
}

#[delete("/user/delete/{user_id}")]
pub async fn delete_user(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    identity: Option<Identity>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match user_service::delete_user(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(()) => {
            if let Some(identity) = identity {
                identity.logout();
            }
            HttpResponse::Ok().json(MessagePayload::new("User has been deleted!"))
        }
        Err(err) => error_response(err),
    }
}

#[get("/user/listings/{user_id}")]
pub async fn user_listings(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match user_service::list_user_listings(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(listings) => HttpResponse::Ok().json(listings),
        Err(err) => error_response(err),
    }
}
