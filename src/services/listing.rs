//! Listing search and owner-scoped mutations.

use validator::Validate;

use crate::domain::filter::{FilterQuery, SortField, SortOrder, TypeFilter, parse_flag};
use crate::domain::listing::{Listing, NewListing};
use crate::domain::types::ListingId;
use crate::forms::listing::ListingForm;
use crate::forms::validation_message;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::PageWindow;
use crate::repository::{ListingQuery, ListingReader, ListingWriter, UserWriter};
use crate::services::user::resolve_user;
use crate::services::{ServiceError, ServiceResult};

/// Translates raw query parameters into a repository query.
///
/// Never fails: unknown or malformed values leave the corresponding
/// predicate unconstrained or fall back to the default ordering and window.
pub fn listing_query_from_params(params: &FilterQuery) -> ListingQuery {
    let mut query = ListingQuery::new();

    if let Some(term) = params.search_term.as_deref().filter(|t| !t.is_empty()) {
        query = query.search(term);
    }
    query.listing_type = params
        .listing_type
        .as_deref()
        .map(TypeFilter::parse)
        .and_then(TypeFilter::listing_type);
    query.parking = parse_flag(params.parking.as_deref());
    query.furnished = parse_flag(params.furnished.as_deref());
    query.offer = parse_flag(params.offer.as_deref());

    let sort = params
        .sort
        .as_deref()
        .map(SortField::parse)
        .unwrap_or_default();
    let order = params
        .order
        .as_deref()
        .map(SortOrder::parse)
        .unwrap_or_default();
    query = query.sort(sort, order);

    query.window = Some(PageWindow::from_params(
        params.limit.as_deref(),
        params.start_index.as_deref(),
    ));
    query
}

/// One page of listings matching the query parameters.
pub fn search_listings<R>(repo: &R, params: &FilterQuery) -> ServiceResult<Vec<Listing>>
where
    R: ListingReader + ?Sized,
{
    let query = listing_query_from_params(params);
    Ok(repo.search_listings(&query)?)
}

fn listing_not_found() -> ServiceError {
    ServiceError::NotFound("Listing not found!".to_string())
}

pub fn get_listing<R>(repo: &R, listing_id: i32) -> ServiceResult<Listing>
where
    R: ListingReader + ?Sized,
{
    let id = ListingId::new(listing_id).map_err(|_| listing_not_found())?;
    repo.get_listing_by_id(id)?.ok_or_else(listing_not_found)
}

fn validate_form(form: &ListingForm) -> ServiceResult<()> {
    form.validate()
        .map_err(|errors| ServiceError::Form(validation_message(&errors)))
}

/// Creates a listing owned by the caller.
pub fn create_listing<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    form: ListingForm,
) -> ServiceResult<Listing>
where
    R: UserWriter + ListingWriter + ?Sized,
{
    let form = form.sanitized();
    validate_form(&form)?;
    let details = form.to_details()?;

    let owner = resolve_user(repo, auth)?;
    let listing = repo.create_listing(&NewListing::new(owner.id, details))?;
    log::info!("User {} created listing {}", owner.id, listing.id);
    Ok(listing)
}

/// Loads the listing and checks that the caller owns it.
fn owned_listing<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    listing_id: i32,
    action: &str,
) -> ServiceResult<Listing>
where
    R: UserWriter + ListingReader + ?Sized,
{
    let listing = get_listing(repo, listing_id)?;
    let current = resolve_user(repo, auth)?;
    if listing.user_ref != current.id {
        return Err(ServiceError::Forbidden(format!(
            "You can only {action} your own listings!"
        )));
    }
    Ok(listing)
}

pub fn update_listing<R>(
    repo: &R,
    auth: &AuthenticatedUser,
    listing_id: i32,
    form: ListingForm,
) -> ServiceResult<Listing>
where
    R: UserWriter + ListingReader + ListingWriter + ?Sized,
{
    let listing = owned_listing(repo, auth, listing_id, "update")?;

    let form = form.sanitized();
    validate_form(&form)?;
    let details = form.to_details()?;

    Ok(repo.update_listing(listing.id, &details)?)
}

pub fn delete_listing<R>(repo: &R, auth: &AuthenticatedUser, listing_id: i32) -> ServiceResult<()>
where
    R: UserWriter + ListingReader + ListingWriter + ?Sized,
{
    let listing = owned_listing(repo, auth, listing_id, "delete")?;
    repo.delete_listing(listing.id)?;
    log::info!("Deleted listing {}", listing.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListingType;
    use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

    #[test]
    fn empty_query_uses_defaults() {
        let query = listing_query_from_params(&FilterQuery::default());

        assert_eq!(query.search_term, None);
        assert_eq!(query.listing_type, None);
        assert_eq!(query.parking, None);
        assert_eq!(query.furnished, None);
        assert_eq!(query.offer, None);
        assert_eq!(query.sort, SortField::CreatedAt);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.window, Some(PageWindow::new(0, DEFAULT_PAGE_SIZE)));
    }

    #[test]
    fn empty_query_equals_explicit_defaults() {
        let explicit = FilterQuery::parse("sort=createdAt&order=desc&limit=9");
        assert_eq!(
            listing_query_from_params(&FilterQuery::default()),
            listing_query_from_params(&explicit)
        );
    }

    #[test]
    fn flags_are_tri_state() {
        let query = listing_query_from_params(&FilterQuery::parse(
            "parking=false&furnished=yes&offer=true",
        ));
        assert_eq!(query.parking, Some(false));
        assert_eq!(query.furnished, None);
        assert_eq!(query.offer, Some(true));
    }

    #[test]
    fn type_all_and_unknown_are_unconstrained() {
        for raw in ["type=all", "type=villa", "type="] {
            let query = listing_query_from_params(&FilterQuery::parse(raw));
            assert_eq!(query.listing_type, None, "{raw}");
        }
        let query = listing_query_from_params(&FilterQuery::parse("type=sale"));
        assert_eq!(query.listing_type, Some(ListingType::Sale));
    }

    #[test]
    fn window_is_clamped() {
        let query = listing_query_from_params(&FilterQuery::parse("limit=500&startIndex=-3"));
        assert_eq!(query.window, Some(PageWindow::new(0, MAX_PAGE_SIZE)));

        let query = listing_query_from_params(&FilterQuery::parse("limit=abc&startIndex=18"));
        assert_eq!(query.window, Some(PageWindow::new(18, DEFAULT_PAGE_SIZE)));
    }

    #[test]
    fn landing_page_query() {
        let query = listing_query_from_params(&FilterQuery::parse("offer=true&limit=4"));
        assert_eq!(query.offer, Some(true));
        assert_eq!(query.window, Some(PageWindow::new(0, 4)));
    }

    #[test]
    fn created_at_alias_is_accepted() {
        let query = listing_query_from_params(&FilterQuery::parse("sort=created_at&order=asc"));
        assert_eq!(query.sort, SortField::CreatedAt);
        assert_eq!(query.order, SortOrder::Asc);
    }
}
