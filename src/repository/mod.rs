use crate::{
    db::{DbConnection, DbPool, get_connection},
    domain::{
        filter::{SortField, SortOrder},
        listing::{Listing, ListingType, NewListing, UpdateListing},
        types::{ListingId, UserEmail, UserId},
        user::{NewUser, UpdateUser, User},
    },
    pagination::PageWindow,
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod listing;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod user;

/// Diesel-backed repository shared by all handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

/// Filters, ordering and window for a listings lookup.
///
/// `None` flags leave the field unconstrained. Results are ordered by
/// `sort`/`order` with insertion order breaking ties, then sliced by
/// `window`; without a window every match is returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub search_term: Option<String>,
    pub listing_type: Option<ListingType>,
    pub parking: Option<bool>,
    pub furnished: Option<bool>,
    pub offer: Option<bool>,
    pub owner: Option<UserId>,
    pub sort: SortField,
    pub order: SortOrder,
    pub window: Option<PageWindow>,
}

impl ListingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn listing_type(mut self, listing_type: ListingType) -> Self {
        self.listing_type = Some(listing_type);
        self
    }

    pub fn parking(mut self, parking: bool) -> Self {
        self.parking = Some(parking);
        self
    }

    pub fn furnished(mut self, furnished: bool) -> Self {
        self.furnished = Some(furnished);
        self
    }

    pub fn offer(mut self, offer: bool) -> Self {
        self.offer = Some(offer);
        self
    }

    pub fn owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn sort(mut self, sort: SortField, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }
}

pub trait ListingReader {
    fn get_listing_by_id(&self, id: ListingId) -> RepositoryResult<Option<Listing>>;
    fn search_listings(&self, query: &ListingQuery) -> RepositoryResult<Vec<Listing>>;
}

pub trait ListingWriter {
    fn create_listing(&self, new_listing: &NewListing) -> RepositoryResult<Listing>;
    fn update_listing(&self, id: ListingId, updates: &UpdateListing) -> RepositoryResult<Listing>;
    fn delete_listing(&self, id: ListingId) -> RepositoryResult<()>;
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    /// Inserts the user unless one with the same email exists; returns the
    /// stored record either way.
    fn create_or_get_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, id: UserId, updates: &UpdateUser) -> RepositoryResult<User>;
    /// Deletes the user together with all of their listings.
    fn delete_user(&self, id: UserId) -> RepositoryResult<()>;
}
