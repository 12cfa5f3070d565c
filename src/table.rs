//! Generic list table: sorting, pagination and width-dependent layout.
//!
//! Rows are any `Serialize` type. Column keys address the row's JSON form
//! (camelCase wire names), optionally as dotted paths such as
//! `"owner.email"`. A [`Table`] turns a slice of rows into a [`TableView`]
//! that a front end renders as-is.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::models::ParseEnumError;

/// Terminal width below which rows render as cards.
pub const CARD_BREAKPOINT: u16 = 80;

/// Terminal width below which tablet-hidden columns are dropped.
pub const WIDE_BREAKPOINT: u16 = 120;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the pager.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Pages around the current one shown by [`Pagination::visible_pages`].
const PAGE_WINDOW_DELTA: usize = 2;

/// Page count up to which every page number is listed.
const MAX_PLAIN_PAGES: usize = 7;

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Returns the query-string spelling (`asc` / `desc`).
    #[inline]
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// Returns the opposite direction.
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for SortDirection {
    type Err = ParseEnumError;

    #[inline]
    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(ParseEnumError::new("sort direction", s)),
        }
    }
}

/// Column sort state of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SortState {
    /// Rows keep their source order.
    #[default]
    Unsorted,
    /// Sorted by the column key, smallest first.
    Ascending(String),
    /// Sorted by the column key, largest first.
    Descending(String),
}

impl SortState {
    /// Builds a state from an optional column and a direction.
    #[inline]
    #[must_use]
    pub fn from_parts(column: Option<&str>, direction: SortDirection) -> Self {
        match column.filter(|key| !key.is_empty()) {
            None => Self::Unsorted,
            Some(key) => match direction {
                SortDirection::Ascending => Self::Ascending(key.to_owned()),
                SortDirection::Descending => Self::Descending(key.to_owned()),
            },
        }
    }

    /// Returns the state after a click on `column`'s header.
    ///
    /// Ascending on the same column becomes descending; anything else
    /// becomes ascending on `column`.
    #[must_use]
    pub fn toggle(&self, column: &str) -> Self {
        match *self {
            Self::Ascending(ref current) if current == column => {
                Self::Descending(column.to_owned())
            }
            Self::Unsorted | Self::Ascending(_) | Self::Descending(_) => {
                Self::Ascending(column.to_owned())
            }
        }
    }

    /// Returns the sorted column, if any.
    #[inline]
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match *self {
            Self::Unsorted => None,
            Self::Ascending(ref key) | Self::Descending(ref key) => Some(key),
        }
    }

    /// Returns the sort direction, if sorted.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Option<SortDirection> {
        match *self {
            Self::Unsorted => None,
            Self::Ascending(_) => Some(SortDirection::Ascending),
            Self::Descending(_) => Some(SortDirection::Descending),
        }
    }
}

/// Looks up a dotted path (`"a.b.c"`) in a JSON value.
///
/// Object keys and array indices are followed in order; a missing step
/// yields `None`.
#[must_use]
pub fn resolve_path<'value>(value: &'value Value, path: &str) -> Option<&'value Value> {
    path.split('.').try_fold(value, |current, key| {
        current.get(key).or_else(|| {
            key.parse::<usize>()
                .ok()
                .and_then(|index| current.get(index))
        })
    })
}

/// Orders two resolved values.
///
/// Numbers compare numerically, strings lexicographically and booleans
/// `false < true`. Missing values and mixed types compare equal.
#[must_use]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    if let (Some(x), Some(y)) = (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    if let (Some(x), Some(y)) = (a.and_then(Value::as_str), b.and_then(Value::as_str)) {
        return x.cmp(y);
    }
    if let (Some(x), Some(y)) = (a.and_then(Value::as_bool), b.and_then(Value::as_bool)) {
        return x.cmp(&y);
    }
    Ordering::Equal
}

/// Default text for a resolved value: empty for missing or null.
#[must_use]
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(&Value::Null) => String::new(),
        Some(&Value::String(ref text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Returns row indices in display order for the given sort.
///
/// The sort is stable; rows equal on the sort key are ordered by
/// `tie_break` (ascending) and then by source position.
#[must_use]
pub fn sorted_order(values: &[Value], sort: &SortState, tie_break: Option<&str>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    let (Some(key), Some(direction)) = (sort.column(), sort.direction()) else {
        return order;
    };
    let resolve = |index: usize, path: &str| values.get(index).and_then(|v| resolve_path(v, path));
    order.sort_by(|&left, &right| {
        let primary = compare_values(resolve(left, key), resolve(right, key));
        let directed = match direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        directed.then_with(|| {
            tie_break.map_or(Ordering::Equal, |tie| {
                compare_values(resolve(left, tie), resolve(right, tie))
            })
        })
    });
    order
}

/// Horizontal alignment of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

/// Custom cell renderer: receives the resolved value and the whole row.
pub type CellRenderer<T> = fn(Option<&Value>, &T) -> String;

/// Descriptor of one table column.
#[derive(Debug)]
pub struct Column<T> {
    /// Key or dotted path into the row's JSON form.
    pub key: &'static str,
    /// Header text.
    pub title: &'static str,
    /// Optional cell renderer; the default prints the resolved value.
    pub render: Option<CellRenderer<T>>,
    /// Whether the header toggles sorting.
    pub sortable: bool,
    /// Hidden in the card layout.
    pub hide_on_mobile: bool,
    /// Hidden below [`WIDE_BREAKPOINT`].
    pub hide_on_tablet: bool,
    /// Cell alignment.
    pub align: Align,
}

impl<T> Column<T> {
    /// Creates a plain left-aligned column.
    #[inline]
    #[must_use]
    pub const fn new(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            render: None,
            sortable: false,
            hide_on_mobile: false,
            hide_on_tablet: false,
            align: Align::Left,
        }
    }

    /// Sets a custom renderer.
    #[inline]
    #[must_use]
    pub const fn render(mut self, render: CellRenderer<T>) -> Self {
        self.render = Some(render);
        self
    }

    /// Marks the column sortable.
    #[inline]
    #[must_use]
    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Hides the column in the card layout.
    #[inline]
    #[must_use]
    pub const fn hide_on_mobile(mut self) -> Self {
        self.hide_on_mobile = true;
        self
    }

    /// Hides the column below [`WIDE_BREAKPOINT`].
    #[inline]
    #[must_use]
    pub const fn hide_on_tablet(mut self) -> Self {
        self.hide_on_tablet = true;
        self
    }

    /// Sets the alignment.
    #[inline]
    #[must_use]
    pub const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Renders this column's cell for one row.
    #[inline]
    #[must_use]
    pub fn cell(&self, row: &T, row_value: &Value) -> String {
        let resolved = resolve_path(row_value, self.key);
        match self.render {
            Some(render) => render(resolved, row),
            None => display_value(resolved),
        }
    }

    /// Returns `true` if the column is shown in `layout`.
    #[inline]
    #[must_use]
    pub const fn visible_in(&self, layout: Layout) -> bool {
        match layout {
            Layout::Cards => !self.hide_on_mobile,
            Layout::Medium => !self.hide_on_tablet,
            Layout::Wide => true,
        }
    }
}

/// Layout chosen for a terminal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One card per row, narrow terminals.
    Cards,
    /// Table without tablet-hidden columns.
    Medium,
    /// Table with every column.
    Wide,
}

impl Layout {
    /// Picks the layout for a terminal `width` in columns.
    #[inline]
    #[must_use]
    pub const fn for_width(width: u16) -> Self {
        if width < CARD_BREAKPOINT {
            Self::Cards
        } else if width < WIDE_BREAKPOINT {
            Self::Medium
        } else {
            Self::Wide
        }
    }
}

/// One entry of the pager's page list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A reachable page number.
    Page(usize),
    /// A gap in the page list.
    Ellipsis,
}

/// Pagination state supplied by the caller.
///
/// `total` is the caller's record count and is never recomputed from the
/// rows handed to [`Table::view`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// One-based current page, at least 1.
    current_page: usize,
    /// Rows per page, at least 1.
    page_size: usize,
    /// Total number of records.
    total: usize,
    /// Page sizes offered to the user.
    page_size_options: Vec<usize>,
}

impl Pagination {
    /// Creates a pagination with the default page-size options.
    #[inline]
    #[must_use]
    pub fn new(current_page: usize, page_size: usize, total: usize) -> Self {
        Self {
            current_page: current_page.max(1),
            page_size: page_size.max(1),
            total,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
        }
    }

    /// One-based current page.
    #[inline]
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Rows per page.
    #[inline]
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total number of records.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Page sizes offered to the user.
    #[inline]
    #[must_use]
    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Number of pages, `ceil(total / page_size)`.
    #[inline]
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Zero-based index of the first row on the current page.
    #[inline]
    #[must_use]
    pub const fn start_index(&self) -> usize {
        self.current_page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// One-based number of the first record shown, `0` when empty.
    #[inline]
    #[must_use]
    pub const fn showing_from(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.start_index().saturating_add(1)
        }
    }

    /// One-based number of the last record shown.
    #[inline]
    #[must_use]
    pub fn showing_to(&self) -> usize {
        self.current_page
            .saturating_mul(self.page_size)
            .min(self.total)
    }

    /// The next page, if any.
    #[inline]
    #[must_use]
    pub const fn next(&self) -> Option<usize> {
        if self.current_page < self.total_pages() {
            Some(self.current_page.saturating_add(1))
        } else {
            None
        }
    }

    /// The previous page, if any.
    #[inline]
    #[must_use]
    pub const fn prev(&self) -> Option<usize> {
        if self.current_page > 1 {
            Some(self.current_page.saturating_sub(1))
        } else {
            None
        }
    }

    /// Moves to `page`.
    #[inline]
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.current_page = page.max(1);
        self
    }

    /// Changes the page size and returns to the first page.
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.current_page = 1;
        self
    }

    /// Page list for the pager: every page up to seven, otherwise a window
    /// around the current page with ellipses and the first/last pages.
    #[must_use]
    pub fn visible_pages(&self) -> Vec<PageItem> {
        let total_pages = self.total_pages();
        let current = self.current_page;
        if total_pages <= MAX_PLAIN_PAGES {
            return (1..=total_pages).map(PageItem::Page).collect();
        }
        let mut pages = Vec::with_capacity(MAX_PLAIN_PAGES);
        if current <= 3 {
            pages.extend((1..=5).map(PageItem::Page));
            pages.push(PageItem::Ellipsis);
            pages.push(PageItem::Page(total_pages));
        } else if current >= total_pages - 2 {
            pages.push(PageItem::Page(1));
            pages.push(PageItem::Ellipsis);
            pages.extend((total_pages - 4..=total_pages).map(PageItem::Page));
        } else {
            pages.push(PageItem::Page(1));
            pages.push(PageItem::Ellipsis);
            pages.extend(
                (current - PAGE_WINDOW_DELTA..=current + PAGE_WINDOW_DELTA).map(PageItem::Page),
            );
            pages.push(PageItem::Ellipsis);
            pages.push(PageItem::Page(total_pages));
        }
        pages
    }
}

/// Header of a visible column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnHeader {
    /// Column key.
    pub key: &'static str,
    /// Header text.
    pub title: &'static str,
    /// Cell alignment.
    pub align: Align,
    /// Sort indicator for this column.
    pub sorted: Option<SortDirection>,
}

/// A processed page of rows ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    /// Chosen layout.
    pub layout: Layout,
    /// Visible columns.
    pub headers: Vec<ColumnHeader>,
    /// Cell text per displayed row, one entry per visible column.
    pub rows: Vec<Vec<String>>,
    /// Source index of each displayed row.
    pub source_indices: Vec<usize>,
    /// Pager state, when paginated.
    pub pagination: Option<Pagination>,
}

/// Outcome of [`Table::view`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    /// Data is still loading; nothing was processed.
    Loading,
    /// No rows; carries the pager unless the total is zero.
    Empty {
        /// Pager state to show under the empty message.
        pagination: Option<Pagination>,
    },
    /// Rows to display.
    Rows(RenderedTable),
}

/// A configured table over rows of type `T`.
#[derive(Debug)]
pub struct Table<T> {
    /// Column descriptors.
    columns: Vec<Column<T>>,
    /// Whether data is still loading.
    loading: bool,
    /// Caller-supplied pagination.
    pagination: Option<Pagination>,
    /// Current sort.
    sort: SortState,
    /// Secondary sort key for equal primary keys.
    tie_break: Option<&'static str>,
}

impl<T: Serialize> Table<T> {
    /// Creates an unsorted, unpaginated table.
    #[inline]
    #[must_use]
    pub const fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            loading: false,
            pagination: None,
            sort: SortState::Unsorted,
            tie_break: None,
        }
    }

    /// Marks the data as loading.
    #[inline]
    #[must_use]
    pub const fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Enables pagination.
    #[inline]
    #[must_use]
    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Sets the sort state.
    ///
    /// Sorting on a column that is not sortable is ignored.
    #[inline]
    #[must_use]
    pub fn sort(mut self, sort: SortState) -> Self {
        let allowed = sort.column().is_none_or(|key| {
            self.columns
                .iter()
                .any(|column| column.sortable && column.key == key)
        });
        self.sort = if allowed { sort } else { SortState::Unsorted };
        self
    }

    /// Sets the secondary key used when sort keys are equal.
    #[inline]
    #[must_use]
    pub const fn tie_break(mut self, key: &'static str) -> Self {
        self.tie_break = Some(key);
        self
    }

    /// Returns the effective sort state.
    #[inline]
    #[must_use]
    pub const fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Returns the column descriptors.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Processes `rows` for a terminal of `width` columns.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AdminError::Serialization`] if a row cannot
    /// be converted to JSON.
    pub fn view(&self, rows: &[T], width: u16) -> Result<TableView> {
        if self.loading {
            return Ok(TableView::Loading);
        }
        if rows.is_empty() {
            let pagination = self.pagination.clone().filter(|p| p.total > 0);
            return Ok(TableView::Empty { pagination });
        }

        let values = to_values(rows)?;
        let order = self.display_order(&values);
        let layout = Layout::for_width(width);
        let visible: Vec<&Column<T>> = self
            .columns
            .iter()
            .filter(|column| column.visible_in(layout))
            .collect();

        let headers = visible
            .iter()
            .map(|column| ColumnHeader {
                key: column.key,
                title: column.title,
                align: column.align,
                sorted: if self.sort.column() == Some(column.key) {
                    self.sort.direction()
                } else {
                    None
                },
            })
            .collect();
        let rendered_rows = order
            .iter()
            .filter_map(|&index| Some((rows.get(index)?, values.get(index)?)))
            .map(|(row, value)| visible.iter().map(|column| column.cell(row, value)).collect())
            .collect();

        Ok(TableView::Rows(RenderedTable {
            layout,
            headers,
            rows: rendered_rows,
            source_indices: order,
            pagination: self.pagination.clone(),
        }))
    }

    /// Returns the row displayed at `displayed_index` on the current page.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AdminError::Serialization`] if a row cannot
    /// be converted to JSON.
    pub fn row_at<'rows>(&self, rows: &'rows [T], displayed_index: usize) -> Result<Option<&'rows T>> {
        let values = to_values(rows)?;
        Ok(self
            .display_order(&values)
            .get(displayed_index)
            .and_then(|&index| rows.get(index)))
    }

    /// Sorts, then keeps the current page when paginated.
    fn display_order(&self, values: &[Value]) -> Vec<usize> {
        let order = sorted_order(values, &self.sort, self.tie_break);
        match self.pagination {
            Some(ref pagination) => order
                .into_iter()
                .skip(pagination.start_index())
                .take(pagination.page_size)
                .collect(),
            None => order,
        }
    }
}

/// Serializes every row to JSON.
fn to_values<T: Serialize>(rows: &[T]) -> Result<Vec<Value>> {
    rows.iter()
        .map(|row| serde_json::to_value(row).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Row {
        id: u32,
        name: String,
        score: Option<f64>,
        owner: Owner,
    }

    #[derive(Debug, Clone, Serialize)]
    struct Owner {
        email: String,
    }

    fn row(id: u32, name: &str, score: Option<f64>) -> Row {
        Row {
            id,
            name: name.to_owned(),
            score,
            owner: Owner {
                email: format!("{name}@example.com").to_lowercase(),
            },
        }
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("id", "ID").sortable().align(Align::Right),
            Column::new("name", "Name").sortable(),
            Column::new("score", "Score").sortable().hide_on_tablet(),
            Column::new("owner.email", "Owner").hide_on_mobile(),
            Column::new("actions", "Actions")
                .hide_on_mobile()
                .render(|_, row: &Row| format!("open {}", row.id)),
        ]
    }

    fn rows(count: u32) -> Vec<Row> {
        (1..=count).map(|i| row(i, &format!("Item{i:02}"), None)).collect()
    }

    fn ids(view: &TableView) -> Vec<String> {
        match *view {
            TableView::Rows(ref table) => table
                .rows
                .iter()
                .map(|cells| cells.first().cloned().unwrap_or_default())
                .collect(),
            TableView::Loading | TableView::Empty { .. } => Vec::new(),
        }
    }

    #[test]
    fn toggle_cycles_between_directions() {
        let unsorted = SortState::Unsorted;
        let asc = unsorted.toggle("name");
        assert_eq!(asc, SortState::Ascending("name".to_owned()));
        let desc = asc.toggle("name");
        assert_eq!(desc, SortState::Descending("name".to_owned()));
        assert_eq!(desc.toggle("name"), asc);
        assert_eq!(asc.toggle("id"), SortState::Ascending("id".to_owned()));
        assert_eq!(desc.toggle("id"), SortState::Ascending("id".to_owned()));
    }

    #[test]
    fn ascending_after_descending_matches_first_ascending_pass() {
        let data = vec![row(1, "b", None), row(2, "a", None), row(3, "c", None)];
        let first = SortState::Unsorted.toggle("name");
        let second = first.toggle("name").toggle("name");
        let table = |sort| Table::new(columns()).sort(sort);
        assert_eq!(
            ids(&table(first).view(&data, 200).unwrap()),
            ids(&table(second).view(&data, 200).unwrap())
        );
        assert_eq!(ids(&table(SortState::Ascending("name".to_owned())).view(&data, 200).unwrap()), ["2", "1", "3"]);
    }

    #[test]
    fn resolve_dotted_paths() {
        let value = json!({"a": {"b": {"c": 3}}, "list": [{"x": "first"}], "n": null});
        assert_eq!(resolve_path(&value, "a.b.c"), Some(&json!(3)));
        assert_eq!(resolve_path(&value, "list.0.x"), Some(&json!("first")));
        assert_eq!(resolve_path(&value, "a.missing.c"), None);
        assert_eq!(resolve_path(&value, "n.deeper"), None);
        assert_eq!(display_value(resolve_path(&value, "a.missing")), "");
        assert_eq!(display_value(resolve_path(&value, "n")), "");
    }

    #[test]
    fn compare_mixed_values() {
        assert_eq!(compare_values(Some(&json!(2)), Some(&json!(10))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!("b")), Some(&json!("a"))), Ordering::Greater);
        assert_eq!(compare_values(Some(&json!(false)), Some(&json!(true))), Ordering::Less);
        assert_eq!(compare_values(Some(&json!("a")), Some(&json!(1))), Ordering::Equal);
        assert_eq!(compare_values(None, Some(&json!(1))), Ordering::Equal);
    }

    #[test]
    fn equal_keys_keep_source_order_or_use_tie_break() {
        let data = vec![row(3, "same", None), row(1, "same", None), row(2, "other", None)];
        let sort = SortState::Ascending("name".to_owned());
        let stable = Table::new(columns()).sort(sort.clone());
        assert_eq!(ids(&stable.view(&data, 200).unwrap()), ["2", "3", "1"]);
        let tie = Table::new(columns()).sort(sort).tie_break("id");
        assert_eq!(ids(&tie.view(&data, 200).unwrap()), ["2", "1", "3"]);
    }

    #[test]
    fn unsortable_column_is_ignored() {
        let table = Table::new(columns()).sort(SortState::Ascending("owner.email".to_owned()));
        assert_eq!(table.sort_state(), &SortState::Unsorted);
    }

    #[test]
    fn twelve_rows_in_pages_of_five() {
        let data = rows(12);
        let page = |n| {
            Table::new(columns())
                .pagination(Pagination::new(n, 5, data.len()))
                .view(&data, 200)
                .unwrap()
        };
        assert_eq!(ids(&page(1)), ["1", "2", "3", "4", "5"]);
        assert_eq!(ids(&page(2)), ["6", "7", "8", "9", "10"]);
        assert_eq!(ids(&page(3)), ["11", "12"]);
        let TableView::Rows(table) = page(3) else {
            panic!("expected rows");
        };
        let pagination = table.pagination.unwrap();
        assert_eq!(pagination.total, 12);
        assert_eq!(pagination.total_pages(), 3);
        assert_eq!((pagination.showing_from(), pagination.showing_to()), (11, 12));
    }

    #[test]
    fn next_reaches_every_page_and_slices_match() {
        for (total, size) in [(0, 10), (1, 10), (10, 10), (11, 10), (95, 20)] {
            let data = rows(total);
            let mut pagination = Pagination::new(1, size, data.len());
            let mut visited = 1;
            while let Some(next) = pagination.next() {
                pagination = pagination.with_page(next);
                visited += 1;
            }
            let expected_pages = data.len().div_ceil(size);
            assert_eq!(pagination.total_pages(), expected_pages);
            assert_eq!(visited, expected_pages.max(1));

            for page in 1..=expected_pages {
                let view = Table::new(columns())
                    .pagination(Pagination::new(page, size, data.len()))
                    .view(&data, 200)
                    .unwrap();
                let expected: Vec<String> = data
                    .iter()
                    .skip((page - 1) * size)
                    .take(size)
                    .map(|r| r.id.to_string())
                    .collect();
                assert_eq!(ids(&view), expected);
            }
        }
    }

    #[test]
    fn page_size_change_resets_page() {
        let pagination = Pagination::new(4, 10, 100).with_page_size(20);
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.page_size, 20);
        assert_eq!(pagination.prev(), None);
    }

    #[test]
    fn zero_page_and_size_are_clamped() {
        let pagination = Pagination::new(0, 0, 25);
        assert_eq!(pagination.current_page(), 1);
        assert_eq!(pagination.page_size(), 1);
        assert_eq!(pagination.total_pages(), 25);
        assert_eq!(pagination.page_size_options(), PAGE_SIZE_OPTIONS);

        let resized = Pagination::new(3, 10, 25).with_page_size(0).with_page(0);
        assert_eq!(resized.page_size(), 1);
        assert_eq!(resized.current_page(), 1);
        assert_eq!(resized.total_pages(), 25);
        assert_eq!(resized.showing_to(), 1);
    }

    #[test]
    fn visible_page_windows() {
        use PageItem::{Ellipsis, Page};
        assert_eq!(
            Pagination::new(1, 10, 70).visible_pages(),
            (1..=7).map(Page).collect::<Vec<_>>()
        );
        assert_eq!(
            Pagination::new(2, 10, 200).visible_pages(),
            [Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(20)]
        );
        assert_eq!(
            Pagination::new(10, 10, 200).visible_pages(),
            [Page(1), Ellipsis, Page(8), Page(9), Page(10), Page(11), Page(12), Ellipsis, Page(20)]
        );
        assert_eq!(
            Pagination::new(19, 10, 200).visible_pages(),
            [Page(1), Ellipsis, Page(16), Page(17), Page(18), Page(19), Page(20)]
        );
    }

    #[test]
    fn loading_and_empty_states() {
        let table = Table::new(columns()).loading(true);
        assert_eq!(table.view(&rows(3), 200).unwrap(), TableView::Loading);

        let empty = Table::new(columns()).pagination(Pagination::new(1, 10, 0));
        assert_eq!(
            empty.view(&[], 200).unwrap(),
            TableView::Empty { pagination: None }
        );
        let stale_page = Table::new(columns()).pagination(Pagination::new(3, 10, 25));
        let TableView::Empty { pagination } = stale_page.view(&[], 200).unwrap() else {
            panic!("expected empty view");
        };
        assert_eq!(pagination.unwrap().total, 25);
    }

    #[test]
    fn layout_hides_columns_by_width() {
        let data = rows(1);
        let titles = |width| match Table::new(columns()).view(&data, width).unwrap() {
            TableView::Rows(table) => table.headers.iter().map(|h| h.title).collect::<Vec<_>>(),
            TableView::Loading | TableView::Empty { .. } => Vec::new(),
        };
        assert_eq!(titles(60), ["ID", "Name", "Score"]);
        assert_eq!(titles(100), ["ID", "Name", "Owner", "Actions"]);
        assert_eq!(titles(140), ["ID", "Name", "Score", "Owner", "Actions"]);
        assert_eq!(Layout::for_width(79), Layout::Cards);
        assert_eq!(Layout::for_width(80), Layout::Medium);
        assert_eq!(Layout::for_width(120), Layout::Wide);
    }

    #[test]
    fn renderers_and_nested_cells() {
        let data = vec![row(7, "Zed", Some(4.5))];
        let TableView::Rows(table) = Table::new(columns()).view(&data, 200).unwrap() else {
            panic!("expected rows");
        };
        assert_eq!(table.rows, [["7", "Zed", "4.5", "zed@example.com", "open 7"]]);
    }

    #[test]
    fn row_at_follows_sort_and_page() {
        let data = vec![row(1, "c", None), row(2, "a", None), row(3, "b", None)];
        let table = Table::new(columns())
            .sort(SortState::Descending("name".to_owned()))
            .pagination(Pagination::new(2, 2, 3));
        let picked = table.row_at(&data, 0).unwrap().unwrap();
        assert_eq!(picked.id, 2);
        assert!(table.row_at(&data, 1).unwrap().is_none());
    }
}
