//! Session start for identity-provider tokens.

use crate::domain::user::User;
use crate::models::auth::AuthenticatedUser;
use crate::repository::UserWriter;
use crate::services::user::resolve_user;
use crate::services::{ServiceError, ServiceResult};

/// Verifies a provider-issued token and makes sure a local user exists for it.
pub fn start_session<R>(
    repo: &R,
    token: &str,
    secret: &str,
) -> ServiceResult<(AuthenticatedUser, User)>
where
    R: UserWriter + ?Sized,
{
    let claims = AuthenticatedUser::from_jwt(token.trim(), secret).map_err(|err| {
        log::warn!("Rejected session token: {err}");
        ServiceError::Unauthorized
    })?;
    let user = resolve_user(repo, &claims)?;
    Ok((claims, user))
}
