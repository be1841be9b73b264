use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{TypeConstraintError, UserId};
use crate::domain::user::{
    NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
/// Only the `Some` fields are written.
pub struct UpdateUser<'a> {
    pub username: Option<&'a str>,
    pub avatar: Option<&'a str>,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(user.id)?,
            email: user.email,
            username: user.username,
            avatar: user.avatar,
            created_at: user.created_at,
        })
    }
}

impl<'a> NewUser<'a> {
    pub fn new(user: &'a DomainNewUser, created_at: NaiveDateTime) -> Self {
        Self {
            email: user.email.as_str(),
            username: user.username.as_str(),
            created_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateUser> for UpdateUser<'a> {
    fn from(update: &'a DomainUpdateUser) -> Self {
        Self {
            username: update.username.as_ref().map(|name| name.as_str()),
            avatar: update.avatar.as_ref().map(|url| url.as_str()),
        }
    }
}
