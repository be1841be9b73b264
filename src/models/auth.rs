//! Identity of the caller as asserted by the external identity provider.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, http::header, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::dto::api::FailurePayload;
use crate::models::config::ServerConfig;

/// Claims carried by the provider-issued HS256 token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Builds claims that expire `ttl_days` from now.
    pub fn new(
        sub: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        ttl_days: i64,
    ) -> Self {
        let exp = (Utc::now() + Duration::days(ttl_days)).timestamp().max(0) as usize;
        Self {
            sub: sub.into(),
            email: email.into(),
            name: name.into(),
            exp,
        }
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

fn unauthorized(message: &'static str) -> actix_web::Error {
    let response = HttpResponse::Unauthorized().json(FailurePayload::new(401, message));
    InternalError::from_response(message, response).into()
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        log::error!("ServerConfig is not registered as app data");
        return Err(actix_web::error::ErrorInternalServerError(
            "server misconfigured",
        ));
    };

    // Session cookie first, then an explicit bearer token.
    let token = req
        .get_identity()
        .ok()
        .and_then(|identity| identity.id().ok())
        .or_else(|| bearer_token(req))
        .ok_or_else(|| unauthorized("Unauthorized"))?;

    AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|err| {
        log::warn!("Rejected identity token: {err}");
        unauthorized("Unauthorized")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip() {
        let user = AuthenticatedUser::new("42", "jane@example.com", "Jane", 1);
        let token = user.to_jwt(SECRET).unwrap();
        assert_eq!(AuthenticatedUser::from_jwt(&token, SECRET).unwrap(), user);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let user = AuthenticatedUser::new("42", "jane@example.com", "Jane", 1);
        let token = user.to_jwt(SECRET).unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = AuthenticatedUser::new("42", "jane@example.com", "Jane", -2);
        let token = user.to_jwt(SECRET).unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, SECRET).is_err());
    }
}
