//! Offset/limit windows over sorted listing results.

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Upper bound for a caller-provided `limit`.
pub const MAX_PAGE_SIZE: usize = 50;

/// A slice `[start_index, start_index + limit)` of a sorted result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub start_index: usize,
    pub limit: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            start_index: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageWindow {
    pub fn new(start_index: usize, limit: usize) -> Self {
        Self {
            start_index,
            limit: clamp_limit(limit),
        }
    }

    /// Builds a window from raw query values.
    ///
    /// Malformed, negative or zero limits fall back to [`DEFAULT_PAGE_SIZE`];
    /// limits above [`MAX_PAGE_SIZE`] are capped. A malformed or negative
    /// `startIndex` becomes `0`.
    pub fn from_params(limit: Option<&str>, start_index: Option<&str>) -> Self {
        let limit = limit
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|limit| *limit > 0)
            .map(|limit| usize::try_from(limit).unwrap_or(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let start_index = start_index
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .and_then(|start| usize::try_from(start).ok())
            .unwrap_or(0);

        Self::new(start_index, limit)
    }
}

fn clamp_limit(limit: usize) -> usize {
    match limit {
        0 => DEFAULT_PAGE_SIZE,
        limit => limit.min(MAX_PAGE_SIZE),
    }
}

/// "More results available" heuristic: a full page suggests another one.
pub fn has_more(page_len: usize, limit: usize) -> bool {
    limit > 0 && page_len >= limit
}
