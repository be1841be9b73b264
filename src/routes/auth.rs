use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};

use crate::dto::api::MessagePayload;
use crate::forms::user::SessionForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::{ServiceError, auth as auth_service};

/// Exchanges a provider-issued token for a session cookie.
#[post("/auth/session")]
pub async fn start_session(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<SessionForm>,
) -> impl Responder {
    let token = form.token.trim().to_string();
    let user = match auth_service::start_session(repo.get_ref(), &token, &server_config.secret) {
        Ok((_, user)) => user,
        Err(err) => return error_response(err),
    };

    match Identity::login(&req.extensions(), token) {
        Ok(_) => HttpResponse::Ok().json(user),
        Err(err) => {
            log::error!("Failed to store the session: {err}");
            error_response(ServiceError::Internal)
        }
    }
}

#[get("/auth/signout")]
pub async fn sign_out(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    HttpResponse::Ok().json(MessagePayload::new("User has been logged out!"))
}
