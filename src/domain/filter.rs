//! Listing search filters and their URL query representation.
//!
//! [`FilterQuery`] is the raw, loosely-typed view of a listings query string
//! shared by both sides of the contract. The browser-side [`FilterState`] is
//! decoded from it and encoded back into it; the server interprets the same
//! keys with tri-state booleans (see [`parse_flag`]).

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::domain::listing::ListingType;

/// Listing type selector including the "no constraint" choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ListingType),
}

impl TypeFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Only(listing_type) => listing_type.as_str(),
        }
    }

    /// Unknown values mean "all".
    pub fn parse(value: &str) -> Self {
        value.parse().map(TypeFilter::Only).unwrap_or_default()
    }

    pub fn listing_type(self) -> Option<ListingType> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Only(listing_type) => Some(listing_type),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    RegularPrice,
    #[default]
    CreatedAt,
}

impl SortField {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortField::RegularPrice => "regularPrice",
            SortField::CreatedAt => "createdAt",
        }
    }

    /// Older links carry `created_at`. Unknown values fall back to
    /// [`SortField::CreatedAt`].
    pub fn parse(value: &str) -> Self {
        match value {
            "regularPrice" => SortField::RegularPrice,
            "createdAt" | "created_at" => SortField::CreatedAt,
            _ => SortField::CreatedAt,
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw query string parameters of `GET /api/listing/get`.
///
/// Every field is optional text so that parsing never fails on odd values;
/// interpretation and defaulting happen in [`FilterState::decode`] and in the
/// listing search service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub search_term: Option<String>,
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    pub parking: Option<String>,
    pub furnished: Option<String>,
    pub offer: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<String>,
    pub start_index: Option<String>,
}

impl FilterQuery {
    /// Parses a raw query string, with or without the leading `?`.
    ///
    /// Keys are read one by one: unknown keys are ignored and a repeated key
    /// keeps its last value without affecting the others.
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        for (key, value) in query_pairs(query) {
            let slot = match key.as_str() {
                "searchTerm" => &mut parsed.search_term,
                "type" => &mut parsed.listing_type,
                "parking" => &mut parsed.parking,
                "furnished" => &mut parsed.furnished,
                "offer" => &mut parsed.offer,
                "sort" => &mut parsed.sort,
                "order" => &mut parsed.order,
                "limit" => &mut parsed.limit,
                "startIndex" => &mut parsed.start_index,
                _ => continue,
            };
            *slot = Some(value);
        }
        parsed
    }

    /// Whether any of the user-editable filter keys is present.
    pub fn has_filter_keys(&self) -> bool {
        self.search_term.is_some()
            || self.listing_type.is_some()
            || self.parking.is_some()
            || self.furnished.is_some()
            || self.offer.is_some()
            || self.sort.is_some()
            || self.order.is_some()
    }
}

fn query_pairs(query: &str) -> Vec<(String, String)> {
    serde_html_form::from_str(query.trim_start_matches('?')).unwrap_or_default()
}

/// Rewrites the `startIndex` of a raw query string, keeping every other pair
/// as it was. `0` removes the key.
pub fn with_start_index(query: &str, start_index: u64) -> String {
    let mut pairs: Vec<(String, String)> = query_pairs(query)
        .into_iter()
        .filter(|(key, _)| key != "startIndex")
        .collect();
    if start_index > 0 {
        pairs.push(("startIndex".to_string(), start_index.to_string()));
    }
    serde_html_form::to_string(&pairs).unwrap_or_default()
}

/// Tri-state reading of a boolean query parameter: `Some` only for the exact
/// strings `"true"` and `"false"`, `None` (unconstrained) otherwise.
pub fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Filter form state held by the search page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_term: String,
    pub listing_type: TypeFilter,
    pub parking: bool,
    pub furnished: bool,
    pub offer: bool,
    pub sort: SortField,
    pub order: SortOrder,
    /// Pagination cursor; only sent for "load more" requests.
    pub start_index: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EncodedFilter<'a> {
    search_term: &'a str,
    #[serde(rename = "type")]
    listing_type: &'static str,
    parking: bool,
    furnished: bool,
    offer: bool,
    sort: &'static str,
    order: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    start_index: u64,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl FilterState {
    /// Decodes filter state from a query string.
    ///
    /// Returns `None` when none of the filter keys is present so that callers
    /// can keep their current state instead of resetting it to defaults.
    pub fn decode(query: &str) -> Option<Self> {
        Self::from_query(&FilterQuery::parse(query))
    }

    pub fn from_query(query: &FilterQuery) -> Option<Self> {
        if !query.has_filter_keys() {
            return None;
        }

        Some(Self {
            search_term: query.search_term.clone().unwrap_or_default(),
            listing_type: query
                .listing_type
                .as_deref()
                .map(TypeFilter::parse)
                .unwrap_or_default(),
            parking: query.parking.as_deref() == Some("true"),
            furnished: query.furnished.as_deref() == Some("true"),
            offer: query.offer.as_deref() == Some("true"),
            sort: query
                .sort
                .as_deref()
                .map(SortField::parse)
                .unwrap_or_default(),
            order: query
                .order
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
            start_index: query
                .start_index
                .as_deref()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
        })
    }

    /// Replaces `self` with the state decoded from `query`, if the query
    /// carries any filter key. Returns whether the state was replaced.
    pub fn apply_query(&mut self, query: &str) -> bool {
        match Self::decode(query) {
            Some(state) => {
                *self = state;
                true
            }
            None => false,
        }
    }

    /// Encodes every form field explicitly; `startIndex` only when non-zero.
    pub fn encode(&self) -> String {
        let encoded = EncodedFilter {
            search_term: &self.search_term,
            listing_type: self.listing_type.as_str(),
            parking: self.parking,
            furnished: self.furnished,
            offer: self.offer,
            sort: self.sort.as_str(),
            order: self.order.as_str(),
            start_index: self.start_index,
        };
        serde_html_form::to_string(&encoded)
            .expect("filter fields are plain strings, booleans and integers")
    }

    /// Copy of this state pointing at another page.
    #[must_use]
    pub fn at_index(&self, start_index: u64) -> Self {
        Self {
            start_index,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_states() -> Vec<FilterState> {
        let types = [
            TypeFilter::All,
            TypeFilter::Only(ListingType::Rent),
            TypeFilter::Only(ListingType::Sale),
        ];
        let sorts = [SortField::RegularPrice, SortField::CreatedAt];
        let orders = [SortOrder::Asc, SortOrder::Desc];
        let mut states = Vec::new();
        for listing_type in types {
            for sort in sorts {
                for order in orders {
                    for flags in 0..8u8 {
                        states.push(FilterState {
                            search_term: "2 bed & garden?".to_string(),
                            listing_type,
                            parking: flags & 1 != 0,
                            furnished: flags & 2 != 0,
                            offer: flags & 4 != 0,
                            sort,
                            order,
                            start_index: u64::from(flags) * 9,
                        });
                    }
                }
            }
        }
        states
    }

    #[test]
    fn decode_inverts_encode_for_every_combination() {
        for state in all_states() {
            let encoded = state.encode();
            assert_eq!(FilterState::decode(&encoded), Some(state), "{encoded}");
        }
    }

    #[test]
    fn encode_writes_every_form_field() {
        let encoded = FilterState::default().encode();
        assert_eq!(
            encoded,
            "searchTerm=&type=all&parking=false&furnished=false&offer=false&sort=createdAt&order=desc"
        );
    }

    #[test]
    fn encode_appends_start_index_for_later_pages() {
        let encoded = FilterState::default().at_index(18).encode();
        assert!(encoded.ends_with("&startIndex=18"));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let state = FilterState::decode("offer=true").unwrap();
        assert_eq!(
            state,
            FilterState {
                offer: true,
                ..FilterState::default()
            }
        );
    }

    #[test]
    fn booleans_require_exact_true() {
        let state = FilterState::decode("parking=TRUE&furnished=1&offer=true").unwrap();
        assert!(!state.parking);
        assert!(!state.furnished);
        assert!(state.offer);
    }

    #[test]
    fn query_without_filter_keys_keeps_state() {
        let mut state = FilterState {
            search_term: "loft".to_string(),
            ..FilterState::default()
        };
        assert!(!state.apply_query(""));
        assert!(!state.apply_query("utm_source=mail&startIndex=9"));
        assert_eq!(state.search_term, "loft");

        assert!(state.apply_query("?type=sale"));
        assert_eq!(state.search_term, "");
        assert_eq!(state.listing_type, TypeFilter::Only(ListingType::Sale));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let state = FilterState::decode("type=castle&sort=price&order=up&startIndex=-4").unwrap();
        assert_eq!(state.listing_type, TypeFilter::All);
        assert_eq!(state.sort, SortField::CreatedAt);
        assert_eq!(state.order, SortOrder::Desc);
        assert_eq!(state.start_index, 0);
    }

    #[test]
    fn legacy_created_at_sort_is_accepted() {
        let state = FilterState::decode("sort=created_at&order=asc").unwrap();
        assert_eq!(state.sort, SortField::CreatedAt);
        assert_eq!(state.order, SortOrder::Asc);
    }

    #[test]
    fn flags_are_tri_state_on_the_server() {
        assert_eq!(parse_flag(Some("true")), Some(true));
        assert_eq!(parse_flag(Some("false")), Some(false));
        assert_eq!(parse_flag(Some("yes")), None);
        assert_eq!(parse_flag(None), None);
    }

    #[test]
    fn repeated_key_keeps_last_value_only() {
        let query = FilterQuery::parse("searchTerm=loft&offer=true&type=sale&type=rent");
        assert_eq!(query.search_term.as_deref(), Some("loft"));
        assert_eq!(query.offer.as_deref(), Some("true"));
        assert_eq!(query.listing_type.as_deref(), Some("rent"));
    }

    #[test]
    fn start_index_is_replaced_in_raw_query() {
        assert_eq!(
            with_start_index("?searchTerm=loft&startIndex=9&foo=1", 18),
            "searchTerm=loft&foo=1&startIndex=18"
        );
        assert_eq!(with_start_index("searchTerm=loft&startIndex=9", 0), "searchTerm=loft");
        assert_eq!(with_start_index("", 9), "startIndex=9");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let query = FilterQuery::parse("foo=bar&limit=4&offer=true");
        assert_eq!(query.offer.as_deref(), Some("true"));
        assert_eq!(query.limit.as_deref(), Some("4"));
    }
}
