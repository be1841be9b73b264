use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::{ImageUrl, TypeConstraintError, Username};
use crate::domain::user::UpdateUser;
use crate::forms::plain_text;

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
/// Form data for updating the caller's profile.
pub struct UpdateProfileForm {
    #[validate(length(min = 1, max = 40, message = "Username must be 1 to 40 characters"))]
    pub username: Option<String>,
    #[validate(url(message = "Avatar must be an absolute URL"))]
    pub avatar: Option<String>,
}

impl UpdateProfileForm {
    pub fn to_update(&self) -> Result<UpdateUser, TypeConstraintError> {
        Ok(UpdateUser {
            username: self
                .username
                .as_deref()
                .map(|name| Username::new(plain_text(name)))
                .transpose()?,
            avatar: self.avatar.as_deref().map(ImageUrl::new).transpose()?,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Provider-issued token exchanged for a session cookie.
pub struct SessionForm {
    pub token: String,
}
