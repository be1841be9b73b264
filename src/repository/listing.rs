//! Repository implementation for listings.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        filter::{SortField, SortOrder},
        listing::{Listing, NewListing, UpdateListing},
        types::ListingId,
    },
    models::listing::{
        Listing as DbListing, NewListing as DbNewListing, UpdateListing as DbUpdateListing,
        search_key,
    },
    repository::{
        DieselRepository, ListingQuery, ListingReader, ListingWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

/// Escapes LIKE wildcards so the term is matched literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in search_key(term).chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn into_domain(rows: Vec<DbListing>) -> RepositoryResult<Vec<Listing>> {
    rows.into_iter()
        .map(|row| Listing::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl ListingReader for DieselRepository {
    fn get_listing_by_id(&self, id: ListingId) -> RepositoryResult<Option<Listing>> {
        use crate::schema::listings;

        let mut conn = self.conn()?;
        let listing = listings::table
            .find(id.get())
            .first::<DbListing>(&mut conn)
            .optional()?;

        listing
            .map(Listing::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn search_listings(&self, query: &ListingQuery) -> RepositoryResult<Vec<Listing>> {
        use crate::schema::listings;

        let mut conn = self.conn()?;

        let mut items = listings::table.into_boxed::<Sqlite>();

        if let Some(term) = query.search_term.as_deref().filter(|t| !t.is_empty()) {
            items = items.filter(listings::name_search.like(like_pattern(term)).escape('\\'));
        }
        if let Some(listing_type) = query.listing_type {
            items = items.filter(listings::listing_type.eq(listing_type.as_str()));
        }
        if let Some(parking) = query.parking {
            items = items.filter(listings::parking.eq(parking));
        }
        if let Some(furnished) = query.furnished {
            items = items.filter(listings::furnished.eq(furnished));
        }
        if let Some(offer) = query.offer {
            items = items.filter(listings::offer.eq(offer));
        }
        if let Some(owner) = query.owner {
            items = items.filter(listings::user_id.eq(owner.get()));
        }

        // Ties keep insertion order whatever the direction, so consecutive
        // pages never overlap.
        items = match (query.sort, query.order) {
            (SortField::RegularPrice, SortOrder::Asc) => {
                items.order((listings::regular_price.asc(), listings::id.asc()))
            }
            (SortField::RegularPrice, SortOrder::Desc) => {
                items.order((listings::regular_price.desc(), listings::id.asc()))
            }
            (SortField::CreatedAt, SortOrder::Asc) => {
                items.order((listings::created_at.asc(), listings::id.asc()))
            }
            (SortField::CreatedAt, SortOrder::Desc) => {
                items.order((listings::created_at.desc(), listings::id.asc()))
            }
        };

        if let Some(window) = &query.window {
            items = items
                .offset(i64::try_from(window.start_index).unwrap_or(i64::MAX))
                .limit(i64::try_from(window.limit).unwrap_or(i64::MAX));
        }

        let rows = items.load::<DbListing>(&mut conn)?;
        into_domain(rows)
    }
}

impl ListingWriter for DieselRepository {
    fn create_listing(&self, new_listing: &NewListing) -> RepositoryResult<Listing> {
        use crate::schema::listings;

        let mut conn = self.conn()?;
        let insertable: DbNewListing = new_listing.into();

        let created = diesel::insert_into(listings::table)
            .values(&insertable)
            .get_result::<DbListing>(&mut conn)?;

        Ok(Listing::try_from(created)?)
    }

    fn update_listing(&self, id: ListingId, updates: &UpdateListing) -> RepositoryResult<Listing> {
        use crate::schema::listings;

        let mut conn = self.conn()?;
        let changes = DbUpdateListing::new(updates, Utc::now().naive_utc());

        let updated = diesel::update(listings::table.find(id.get()))
            .set(&changes)
            .get_result::<DbListing>(&mut conn)?;

        Ok(Listing::try_from(updated)?)
    }

    fn delete_listing(&self, id: ListingId) -> RepositoryResult<()> {
        use crate::schema::listings;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(listings::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards_and_lowercases() {
        assert_eq!(like_pattern("Loft"), "%loft%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }
}
