use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ImageUrl, TypeConstraintError, UserEmail, UserId, Username};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
}

/// User record derived from an identity-provider session.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: UserEmail,
    pub username: Username,
}

impl NewUser {
    pub fn try_new(
        email: impl Into<String>,
        username: impl Into<String>,
    ) -> Result<Self, TypeConstraintError> {
        let email = UserEmail::new(email)?;
        // Fall back to the mailbox name when the provider sends no display name.
        let username = match Username::new(username) {
            Ok(name) => name,
            Err(_) => {
                let local = email.as_str().split('@').next().unwrap_or_default();
                Username::new(local)?
            }
        };
        Ok(Self { email, username })
    }
}

/// Profile changes; `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct UpdateUser {
    pub username: Option<Username>,
    pub avatar: Option<ImageUrl>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.avatar.is_none()
    }
}
