use crate::client::{ClientError, ListingSource};
use crate::domain::filter::{FilterState, with_start_index};
use crate::domain::listing::Listing;
use crate::pagination::{DEFAULT_PAGE_SIZE, has_more};

/// State of one search page: the filter form, the listings shown so far and
/// whether a "show more" control should be offered.
///
/// Requests carry the location query as it is, so keys a link leaves out
/// stay unconstrained. Only [`SearchSession::submit`] writes every field.
pub struct SearchSession<S> {
    source: S,
    filter: FilterState,
    location: String,
    listings: Vec<Listing>,
    show_more: bool,
}

impl<S: ListingSource> SearchSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            filter: FilterState::default(),
            location: String::new(),
            listings: Vec::new(),
            show_more: false,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn show_more(&self) -> bool {
        self.show_more
    }

    /// Query string the next [`SearchSession::load`] sends.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Moves to a new location query string. The filter form follows it
    /// only when the query has filter keys; otherwise the form is kept and
    /// `false` is returned.
    pub fn apply_location(&mut self, query: &str) -> bool {
        self.location = query.trim_start_matches('?').to_string();
        self.filter.apply_query(query)
    }

    /// Replaces the filter and returns the query string to navigate to.
    pub fn submit(&mut self, filter: FilterState) -> String {
        self.filter = filter.at_index(0);
        self.location = self.filter.encode();
        self.location.clone()
    }

    /// Fetches the first page for the current location, replacing the
    /// results.
    pub async fn load(&mut self) -> Result<&[Listing], ClientError> {
        self.show_more = false;
        let query = with_start_index(&self.location, 0);
        let page = self.source.fetch_page(&query).await?;

        self.show_more = has_more(page.len(), DEFAULT_PAGE_SIZE);
        self.listings = page;
        Ok(&self.listings)
    }

    /// Fetches the page after the listings already shown and appends it.
    /// Returns the number of listings added.
    pub async fn load_more(&mut self) -> Result<usize, ClientError> {
        let start_index = self.listings.len() as u64;
        let query = with_start_index(&self.location, start_index);
        let page = self.source.fetch_page(&query).await?;

        self.show_more = has_more(page.len(), DEFAULT_PAGE_SIZE);
        let added = page.len();
        self.listings.extend(page);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::PagedSource;
    use crate::domain::filter::{SortField, SortOrder};

    #[tokio::test]
    async fn show_more_follows_page_length() {
        let mut session = SearchSession::new(PagedSource::new(12, DEFAULT_PAGE_SIZE));

        assert_eq!(session.load().await.unwrap().len(), 9);
        assert!(session.show_more());

        assert_eq!(session.load_more().await.unwrap(), 3);
        assert_eq!(session.listings().len(), 12);
        assert!(!session.show_more());

        let ids: Vec<i32> = session.listings().iter().map(|l| l.id.get()).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn load_more_sends_current_length_as_cursor() {
        let mut session = SearchSession::new(PagedSource::new(20, DEFAULT_PAGE_SIZE));
        session.load().await.unwrap();
        session.load_more().await.unwrap();

        let queries = session.source.queries.lock().unwrap().clone();
        assert_eq!(queries, vec!["".to_string(), "startIndex=9".to_string()]);
    }

    #[tokio::test]
    async fn location_query_is_sent_as_is() {
        let mut session = SearchSession::new(PagedSource::new(20, DEFAULT_PAGE_SIZE));
        assert!(session.apply_location("?searchTerm=loft"));
        assert!(!session.filter().parking);

        session.load().await.unwrap();
        session.load_more().await.unwrap();

        let queries = session.source.queries.lock().unwrap().clone();
        assert_eq!(
            queries,
            vec![
                "searchTerm=loft".to_string(),
                "searchTerm=loft&startIndex=9".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn submitted_filter_writes_every_field() {
        let mut session = SearchSession::new(PagedSource::new(20, DEFAULT_PAGE_SIZE));
        session.apply_location("searchTerm=loft&startIndex=18");
        let query = session.submit(FilterState {
            search_term: "loft".to_string(),
            ..FilterState::default()
        });
        session.load().await.unwrap();

        let queries = session.source.queries.lock().unwrap().clone();
        assert_eq!(queries, vec![query]);
        assert!(queries[0].contains("parking=false"));
    }

    #[tokio::test]
    async fn short_first_page_hides_show_more() {
        let mut session = SearchSession::new(PagedSource::new(4, DEFAULT_PAGE_SIZE));
        session.load().await.unwrap();
        assert!(!session.show_more());
    }

    #[tokio::test]
    async fn load_restarts_from_the_first_page() {
        let mut session = SearchSession::new(PagedSource::new(20, DEFAULT_PAGE_SIZE));
        session.load().await.unwrap();
        session.load_more().await.unwrap();
        session.load().await.unwrap();
        assert_eq!(session.listings().len(), 9);
    }

    #[test]
    fn location_without_filter_keys_keeps_form() {
        let mut session = SearchSession::new(PagedSource::new(0, DEFAULT_PAGE_SIZE));
        let query = session.submit(FilterState {
            search_term: "loft".to_string(),
            sort: SortField::RegularPrice,
            order: SortOrder::Asc,
            start_index: 18,
            ..FilterState::default()
        });
        assert!(!query.contains("startIndex"));

        assert!(!session.apply_location("utm_source=mail"));
        assert_eq!(session.filter().search_term, "loft");

        assert!(session.apply_location(&query));
        assert_eq!(session.filter().sort, SortField::RegularPrice);
    }
}
