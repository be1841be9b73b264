//! Repository implementation for marketplace users.

use chrono::Utc;
use diesel::{Connection, prelude::*};

use crate::{
    domain::{
        types::{UserEmail, UserId},
        user::{NewUser, UpdateUser, User},
    },
    models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser},
    repository::{
        DieselRepository, UserReader, UserWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        user.map(User::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        user.map(User::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }
}

impl UserWriter for DieselRepository {
    fn create_or_get_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let insertable = DbNewUser::new(new_user, Utc::now().naive_utc());

        let db_user = conn.transaction::<DbUser, diesel::result::Error, _>(|conn| {
            diesel::insert_into(users::table)
                .values(&insertable)
                .on_conflict(users::email)
                .do_nothing()
                .execute(conn)?;

            users::table
                .filter(users::email.eq(new_user.email.as_str()))
                .first::<DbUser>(conn)
        })?;

        Ok(User::try_from(db_user)?)
    }

    fn update_user(&self, id: UserId, updates: &UpdateUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let db_user = if updates.is_empty() {
            users::table.find(id.get()).first::<DbUser>(&mut conn)?
        } else {
            let changes: DbUpdateUser = updates.into();
            diesel::update(users::table.find(id.get()))
                .set(&changes)
                .get_result::<DbUser>(&mut conn)?
        };

        Ok(User::try_from(db_user)?)
    }

    fn delete_user(&self, id: UserId) -> RepositoryResult<()> {
        use crate::schema::{listings, users};

        let mut conn = self.conn()?;

        let deleted = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            diesel::delete(listings::table.filter(listings::user_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(users::table.find(id.get())).execute(conn)
        })?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
