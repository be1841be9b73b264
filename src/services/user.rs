//! Services handling user profiles.

use validator::Validate;

use crate::domain::filter::{SortField, SortOrder};
use crate::domain::listing::Listing;
use crate::domain::types::UserId;
use crate::domain::user::{NewUser, User};
use crate::forms::user::UpdateProfileForm;
use crate::forms::validation_message;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{ListingQuery, ListingReader, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

/// Returns the local record for the signed-in identity, creating it on first
/// use.
pub fn resolve_user<R>(repo: &R, auth: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let new_user = NewUser::try_new(auth.email.as_str(), auth.name.as_str())?;
    Ok(repo.create_or_get_user(&new_user)?)
}

/// Resolves the caller and checks that `user_id` is their own account.
fn ensure_self<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    user_id: i32,
    action: &str,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let current = resolve_user(repo, auth)?;
    if current.id.get() != user_id {
        return Err(ServiceError::Forbidden(format!(
            "You can only {action} your own account!"
        )));
    }
    Ok(current)
}

/// Public profile used by the "contact landlord" view.
pub fn get_user<R>(repo: &R, user_id: i32) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    let not_found = || ServiceError::NotFound("User not found!".to_string());
    let id = UserId::new(user_id).map_err(|_| not_found())?;
    repo.get_user_by_id(id)?.ok_or_else(not_found)
}

pub fn update_user<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    user_id: i32,
    form: UpdateProfileForm,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let current = ensure_self(repo, auth, user_id, "update")?;

    if let Err(errors) = form.validate() {
        return Err(ServiceError::Form(validation_message(&errors)));
    }
    let updates = form.to_update()?;

    Ok(repo.update_user(current.id, &updates)?)
}

/// Deletes the caller's account together with all of their listings.
pub fn delete_user<R>(repo: &R, auth: &AuthenticatedUser, user_id: i32) -> ServiceResult<()>
where
    R: UserWriter + ?Sized,
{
    let current = ensure_self(repo, auth, user_id, "delete")?;
    repo.delete_user(current.id)?;
    log::info!("Deleted user {} and their listings", current.id);
    Ok(())
}

/// The caller's own listings, newest first.
pub fn list_user_listings<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    user_id: i32,
) -> ServiceResult<Vec<Listing>>
where
    R: UserWriter + ListingReader + ?Sized,
{
    let current = resolve_user(repo, auth)?;
    if current.id.get() != user_id {
        return Err(ServiceError::Forbidden(
            "You can only view your own listings!".to_string(),
        ));
    }

    let query = ListingQuery::new()
        .owner(current.id)
        .sort(SortField::CreatedAt, SortOrder::Desc);
    Ok(repo.search_listings(&query)?)
}
