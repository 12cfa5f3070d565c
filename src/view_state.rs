//! List view state persisted in a URL query string.
//!
//! Search text, page, page size, sort and the domain filters of a list view
//! live in a query string such as `search=cafe&page=2&status=Pending`, so a
//! view can be shared or reproduced. Default values are omitted from the
//! string. Changing the search, a filter or the page size returns to the
//! first page.

use core::fmt::Debug;

use url::form_urlencoded;

use crate::cache::QueryKey;
use crate::filters::OpenFilter;
use crate::models::BusinessStatus;
use crate::table::{DEFAULT_PAGE_SIZE, Pagination, SortDirection, SortState};

/// Query parameter holding the search text.
const SEARCH_PARAM: &str = "search";
/// Query parameter holding the one-based page.
const PAGE_PARAM: &str = "page";
/// Query parameter holding the page size.
const PAGE_SIZE_PARAM: &str = "pageSize";
/// Query parameter holding the sorted column.
const SORT_BY_PARAM: &str = "sortBy";
/// Query parameter holding the sort direction.
const SORT_DIRECTION_PARAM: &str = "sortDirection";

/// Domain-specific filters of a list view.
pub trait ListFilters: Debug + Default + Clone + PartialEq {
    /// First segment of the view's query key.
    const TABLE_KEY: &'static str;

    /// Sets (`Some`) or clears (`None`) the filter named `key`.
    ///
    /// Returns `false` if the key is unknown or the value does not parse;
    /// the filters are unchanged in that case.
    fn apply(&mut self, key: &str, value: Option<&str>) -> bool;

    /// Active filters as `(key, value)` pairs in a fixed order.
    fn active(&self) -> Vec<(&'static str, String)>;
}

/// Filters of the business list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusinessFilters {
    /// Exact review status.
    pub status: Option<BusinessStatus>,
    /// Opening state.
    pub open: Option<OpenFilter>,
}

impl ListFilters for BusinessFilters {
    const TABLE_KEY: &'static str = "business-table-data";

    fn apply(&mut self, key: &str, value: Option<&str>) -> bool {
        let text = value.map(str::trim).filter(|trimmed| !trimmed.is_empty());
        match key {
            "status" => match text.map(str::parse::<BusinessStatus>) {
                None => {
                    self.status = None;
                    true
                }
                Some(Ok(status)) => {
                    self.status = Some(status);
                    true
                }
                Some(Err(_)) => false,
            },
            "open" => match text.map(str::parse::<OpenFilter>) {
                None => {
                    self.open = None;
                    true
                }
                Some(Ok(open)) => {
                    self.open = Some(open);
                    true
                }
                Some(Err(_)) => false,
            },
            _ => false,
        }
    }

    fn active(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);
        if let Some(status) = self.status {
            params.push(("status", status.as_wire().to_owned()));
        }
        if let Some(open) = self.open {
            params.push(("open", open.as_query().to_owned()));
        }
        params
    }
}

/// Defines a filter set for a view with search and sort only.
macro_rules! define_plain_filters {
    ($name:ident, $table_key:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl ListFilters for $name {
            const TABLE_KEY: &'static str = $table_key;

            #[inline]
            fn apply(&mut self, _key: &str, _value: Option<&str>) -> bool {
                false
            }

            #[inline]
            fn active(&self) -> Vec<(&'static str, String)> {
                Vec::new()
            }
        }
    };
}

define_plain_filters!(UserFilters, "user-table-data", "Filters of the user list (none).");
define_plain_filters!(
    CategoryFilters,
    "category-table-data",
    "Filters of a category list (none)."
);

/// State of one list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewState<F> {
    /// Search text.
    search: String,
    /// One-based page.
    page: usize,
    /// Rows per page.
    page_size: usize,
    /// Sorted column key.
    sort_by: Option<String>,
    /// Sort direction.
    sort_direction: SortDirection,
    /// Domain filters.
    filters: F,
}

impl<F: ListFilters> Default for ListViewState<F> {
    #[inline]
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_direction: SortDirection::Ascending,
            filters: F::default(),
        }
    }
}

impl<F: ListFilters> ListViewState<F> {
    /// Parses a query string (a leading `?` is allowed).
    ///
    /// Unknown parameters and unparsable values fall back to defaults.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut state = Self::default();
        let raw = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match &*key {
                SEARCH_PARAM => state.search = value.into_owned(),
                PAGE_PARAM => state.page = parse_positive(&value).unwrap_or(1),
                PAGE_SIZE_PARAM => {
                    state.page_size = parse_positive(&value).unwrap_or(DEFAULT_PAGE_SIZE);
                }
                SORT_BY_PARAM => {
                    state.sort_by = Some(value.into_owned()).filter(|column| !column.is_empty());
                }
                SORT_DIRECTION_PARAM => {
                    state.sort_direction = value.parse().unwrap_or_default();
                }
                other => {
                    if !state.filters.apply(other, Some(&*value)) {
                        tracing::debug!(param = other, "ignoring query parameter");
                    }
                }
            }
        }
        state
    }

    /// Serializes the state, omitting default values.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            _ = serializer.append_pair(SEARCH_PARAM, &self.search);
        }
        if self.page != 1 {
            _ = serializer.append_pair(PAGE_PARAM, &self.page.to_string());
        }
        if self.page_size != DEFAULT_PAGE_SIZE {
            _ = serializer.append_pair(PAGE_SIZE_PARAM, &self.page_size.to_string());
        }
        if let Some(sort_by) = self.sort_by.as_deref() {
            _ = serializer.append_pair(SORT_BY_PARAM, sort_by);
        }
        if self.sort_direction != SortDirection::Ascending {
            _ = serializer.append_pair(SORT_DIRECTION_PARAM, self.sort_direction.as_query());
        }
        for (key, value) in self.filters.active() {
            _ = serializer.append_pair(key, &value);
        }
        serializer.finish()
    }

    /// Returns the search text.
    #[inline]
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns the one-based page.
    #[inline]
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Returns the page size.
    #[inline]
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the sorted column key.
    #[inline]
    #[must_use]
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    /// Returns the sort direction.
    #[inline]
    #[must_use]
    pub const fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Returns the domain filters.
    #[inline]
    #[must_use]
    pub const fn filters(&self) -> &F {
        &self.filters
    }

    /// Returns the table sort state.
    #[inline]
    #[must_use]
    pub fn sort_state(&self) -> SortState {
        SortState::from_parts(self.sort_by(), self.sort_direction)
    }

    /// Builds the pager state for `total` records.
    #[inline]
    #[must_use]
    pub fn pagination(&self, total: usize) -> Pagination {
        Pagination::new(self.page, self.page_size, total)
    }

    /// Sets the search text and returns to the first page.
    #[inline]
    pub fn set_search<S: Into<String>>(&mut self, search: S) {
        self.search = search.into();
        self.page = 1;
    }

    /// Moves to `page` (at least 1).
    #[inline]
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Changes the page size and returns to the first page.
    #[inline]
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Sets or clears a domain filter and returns to the first page.
    ///
    /// Returns `false` if the filter rejected the key or value.
    #[inline]
    pub fn set_filter(&mut self, key: &str, value: Option<&str>) -> bool {
        self.page = 1;
        self.filters.apply(key, value)
    }

    /// Sorts by `column`: the same column flips direction, a new column
    /// starts ascending.
    #[inline]
    pub fn toggle_sort(&mut self, column: &str) {
        if self.sort_by.as_deref() == Some(column) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_by = Some(column.to_owned());
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// Resets every parameter to its default.
    #[inline]
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` if anything differs from the unfiltered first page.
    ///
    /// Page size and sort direction alone never count as active filters.
    #[inline]
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || self.page > 1
            || self.sort_by.is_some()
            || !self.filters.active().is_empty()
    }

    /// Cache key identifying this exact view.
    #[must_use]
    pub fn query_key(&self) -> QueryKey {
        let key = QueryKey::root(F::TABLE_KEY)
            .with(self.search.as_str())
            .with(self.page.to_string())
            .with(self.page_size.to_string())
            .with(self.sort_by.as_deref().unwrap_or_default())
            .with(self.sort_direction.as_query());
        self.filters
            .active()
            .into_iter()
            .fold(key, |acc, (name, value)| acc.with(format!("{name}:{value}")))
    }
}

/// Parses a positive integer.
fn parse_positive(value: &str) -> Option<usize> {
    value.trim().parse().ok().filter(|&number| number > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    type BusinessView = ListViewState<BusinessFilters>;

    #[test]
    fn defaults_produce_empty_query() {
        let state = BusinessView::default();
        assert_eq!(state.to_query(), "");
        assert!(!state.has_active_filters());
        assert_eq!(BusinessView::from_query(""), state);
        assert_eq!(BusinessView::from_query("?"), state);
    }

    #[test]
    fn query_round_trip() {
        let query = "search=caf%C3%A9+luna&page=3&pageSize=20&sortBy=name&sortDirection=desc&status=Acepted&open=closed";
        let state = BusinessView::from_query(query);
        assert_eq!(state.search(), "café luna");
        assert_eq!(state.page(), 3);
        assert_eq!(state.page_size(), 20);
        assert_eq!(state.sort_by(), Some("name"));
        assert_eq!(state.sort_direction(), SortDirection::Descending);
        assert_eq!(state.filters().status, Some(BusinessStatus::Accepted));
        assert_eq!(state.filters().open, Some(OpenFilter::Closed));
        assert_eq!(state.to_query(), query);
    }

    #[test]
    fn open_filter_accepts_booleans() {
        let state = BusinessView::from_query("open=true");
        assert_eq!(state.filters().open, Some(OpenFilter::Open));
        assert_eq!(state.to_query(), "open=open");
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let state = BusinessView::from_query("page=0&pageSize=abc&sortDirection=up&status=Unknown&x=1");
        assert_eq!(state, BusinessView::default());
    }

    #[test]
    fn search_filter_and_page_size_reset_page() {
        let mut state = BusinessView::from_query("page=4");
        state.set_search("pizza");
        assert_eq!(state.page(), 1);

        state.set_page(5);
        assert!(state.set_filter("status", Some("Pending")));
        assert_eq!(state.page(), 1);

        state.set_page(5);
        state.set_page_size(50);
        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), 50);

        state.set_page(2);
        assert!(state.set_filter("status", None));
        assert_eq!(state.page(), 1);
        assert_eq!(state.filters().status, None);
        assert!(!state.set_filter("colour", Some("red")));
    }

    #[test]
    fn toggle_sort_flips_same_column() {
        let mut state = BusinessView::default();
        state.toggle_sort("name");
        assert_eq!(state.sort_state(), SortState::Ascending("name".to_owned()));
        state.toggle_sort("name");
        assert_eq!(state.sort_state(), SortState::Descending("name".to_owned()));
        state.toggle_sort("createdAt");
        assert_eq!(state.sort_state(), SortState::Ascending("createdAt".to_owned()));
    }

    #[test]
    fn clear_all_resets_everything() {
        let mut state = BusinessView::from_query("search=x&page=2&sortBy=name&status=Pending&open=open");
        assert!(state.has_active_filters());
        state.clear_all();
        assert_eq!(state, BusinessView::default());
        assert!(!state.has_active_filters());
    }

    #[test]
    fn each_parameter_counts_as_active() {
        for query in ["search=a", "page=2", "sortBy=name", "status=Rejected", "open=closed"] {
            assert!(BusinessView::from_query(query).has_active_filters(), "{query}");
        }
        assert!(!BusinessView::from_query("pageSize=50").has_active_filters());
        assert!(!BusinessView::from_query("sortDirection=desc").has_active_filters());
    }

    #[test]
    fn query_key_lists_filters() {
        let state = BusinessView::from_query("search=pan&page=2&status=Pending&open=open");
        assert_eq!(
            state.query_key().segments(),
            [
                "business-table-data",
                "pan",
                "2",
                "10",
                "",
                "asc",
                "status:Pending",
                "open:open",
            ]
        );
        let users = ListViewState::<UserFilters>::default();
        assert_eq!(
            users.query_key().segments(),
            ["user-table-data", "", "1", "10", "", "asc"]
        );
    }

    #[test]
    fn pagination_follows_state() {
        let state = ListViewState::<CategoryFilters>::from_query("page=2&pageSize=5");
        let pagination = state.pagination(12);
        assert_eq!(pagination.current_page(), 2);
        assert_eq!(pagination.page_size(), 5);
        assert_eq!(pagination.total(), 12);
    }
}
