//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::listing::{Listing, NewListing, UpdateListing};
use crate::domain::types::{ListingId, UserEmail, UserId};
use crate::domain::user::{NewUser, UpdateUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ListingQuery, ListingReader, ListingWriter, UserReader, UserWriter};

mock! {
    pub Repository {}

    impl ListingReader for Repository {
        fn get_listing_by_id(&self, id: ListingId) -> RepositoryResult<Option<Listing>>;
        fn search_listings(&self, query: &ListingQuery) -> RepositoryResult<Vec<Listing>>;
    }

    impl ListingWriter for Repository {
        fn create_listing(&self, new_listing: &NewListing) -> RepositoryResult<Listing>;
        fn update_listing(
            &self,
            id: ListingId,
            updates: &UpdateListing,
        ) -> RepositoryResult<Listing>;
        fn delete_listing(&self, id: ListingId) -> RepositoryResult<()>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
    }

    impl UserWriter for Repository {
        fn create_or_get_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, id: UserId, updates: &UpdateUser) -> RepositoryResult<User>;
        fn delete_user(&self, id: UserId) -> RepositoryResult<()>;
    }
}
