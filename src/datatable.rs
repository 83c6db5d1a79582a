//! Searchable, paginated table derivation.
//!
//! Everything in here is pure: a [`TableFrame`] is derived from the columns,
//! the caller owned records, the [`TableOptions`] and the [`ViewState`] on
//! every draw. Nothing is cached and the records are never mutated.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use derive_setters::Setters;
use ratatui::text::Line;
use tracing::trace;

/// Number of rows shown per page.
pub const PAGE_SIZE: usize = 10;

/// Placeholder shown when no row is visible.
pub const NO_RESULTS: &str = "No results.";

/// A single field value of a [`Record`].
///
/// Only [`Value::Text`] takes part in searching.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Pre-rendered content, e.g. a badge.
    Node(Line<'static>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<u64> {
        match self {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as u64),
            _ => None,
        }
    }

    /// Natural display form used when a column has no cell renderer.
    pub fn display(&self) -> Line<'static> {
        match self {
            Value::Node(line) => line.clone(),
            other => Line::from(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{text}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Node(line) => write!(f, "{line}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Line<'static>> for Value {
    fn from(value: Line<'static>) -> Self {
        Value::Node(value)
    }
}

/// One displayable row, a mapping from field name to [`Value`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    /// The numeric `id` field resource managers key their records by.
    pub fn id(&self) -> Option<u64> {
        self.get("id").and_then(Value::as_id)
    }

    // `needle` must already be lower case
    fn matches(&self, needle: &str) -> bool {
        self.values()
            .filter_map(Value::as_text)
            .any(|text| text.to_lowercase().contains(needle))
    }
}

pub type CellRenderer = Rc<dyn Fn(Option<&Value>) -> Line<'static>>;

/// Describes how one field of a [`Record`] is labeled and rendered.
#[derive(Clone)]
pub struct Column {
    pub header: String,
    pub accessor_key: String,
    cell: Option<CellRenderer>,
}

impl Column {
    pub fn new(header: impl Into<String>, accessor_key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            accessor_key: accessor_key.into(),
            cell: None,
        }
    }

    /// Replaces the default display coercion with a custom renderer. The
    /// renderer receives `None` when the row lacks the accessor key.
    pub fn with_cell<F>(mut self, cell: F) -> Self
    where
        F: Fn(Option<&Value>) -> Line<'static> + 'static,
    {
        self.cell = Some(Rc::new(cell));
        self
    }

    pub fn render(&self, record: &Record) -> Line<'static> {
        let raw = record.get(&self.accessor_key);
        match &self.cell {
            Some(cell) => cell(raw),
            None => raw.map(Value::display).unwrap_or_default(),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("accessor_key", &self.accessor_key)
            .field("cell", &self.cell.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Setters)]
pub struct TableOptions {
    /// Render the search box and apply the query.
    pub searchable: bool,
    /// Render the pager and slice the rows into pages.
    pub pagination: bool,
    pub page_size: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            searchable: true,
            pagination: true,
            page_size: PAGE_SIZE,
        }
    }
}

/// State owned by one table instance. Recreated whenever the table is shown
/// again, never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    search_query: String,
    current_page: usize,
    selected: usize, // Row cursor within the current page
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            current_page: 1,
            selected: 0,
        }
    }
}

impl ViewState {
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Sets the query. A changed query starts over on the first page.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.search_query {
            trace!("Search query {:?} -> {:?}", self.search_query, query);
            self.search_query = query;
            self.current_page = 1;
            self.selected = 0;
        }
    }

    /// Returns false when already on the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            self.selected = 0;
            true
        } else {
            false
        }
    }

    /// Returns false when already on the last page.
    pub fn next_page(&mut self, page_count: usize) -> bool {
        if self.current_page < page_count {
            self.current_page += 1;
            self.selected = 0;
            true
        } else {
            false
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self, visible_rows: usize) {
        if self.selected + 1 < visible_rows {
            self.selected += 1;
        }
    }

    /// Pulls page and cursor back into range after the data shrank.
    pub fn clamp(&mut self, page_count: usize, visible_rows: usize) {
        self.current_page = self.current_page.clamp(1, page_count.max(1));
        self.selected = self.selected.min(visible_rows.saturating_sub(1));
    }
}

/// Rows retained by `query`, in their original order.
///
/// A row matches when any of its text fields contains the query, ignoring
/// case. The query is a literal substring.
pub fn filter_rows<'a>(data: &'a [Record], query: &str) -> Vec<&'a Record> {
    if query.is_empty() {
        return data.iter().collect();
    }
    let needle = query.to_lowercase();
    data.iter().filter(|record| record.matches(&needle)).collect()
}

pub fn page_count(filtered: usize, page_size: usize) -> usize {
    filtered.div_ceil(page_size.max(1))
}

/// The slice of `rows` shown on the 1-based `page`. Empty when out of range.
pub fn paginate<T>(rows: &[T], page: usize, page_size: usize) -> &[T] {
    let size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(size);
    if start >= rows.len() {
        return &[];
    }
    let end = std::cmp::min(start + size, rows.len());
    &rows[start..end]
}

/// Records visible for the given state, after search and pagination.
pub fn visible_records<'a>(
    data: &'a [Record],
    options: &TableOptions,
    state: &ViewState,
) -> (Vec<&'a Record>, usize) {
    let query = if options.searchable {
        state.search_query()
    } else {
        ""
    };
    let filtered = filter_rows(data, query);
    let filtered_count = filtered.len();
    let visible = if options.pagination {
        paginate(&filtered, state.current_page(), options.page_size).to_vec()
    } else {
        filtered
    };
    (visible, filtered_count)
}

/// Everything the UI needs to draw one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableFrame {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Line<'static>>>,
    pub filtered_count: usize,
    pub page_count: usize,
    pub current_page: usize,
    pub selected: usize,
    pub show_search: bool,
    pub show_pager: bool,
    pub search_query: String,
}

impl TableFrame {
    /// No visible row, the "No results." placeholder is shown instead.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count
    }

    pub fn pager_label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.page_count)
    }
}

pub fn derive(
    columns: &[Column],
    data: &[Record],
    options: &TableOptions,
    state: &ViewState,
) -> TableFrame {
    let (visible, filtered_count) = visible_records(data, options, state);
    let page_count = page_count(filtered_count, options.page_size);

    let rows = visible
        .iter()
        .map(|record| columns.iter().map(|c| c.render(record)).collect())
        .collect::<Vec<Vec<Line<'static>>>>();

    trace!(
        "Derived table: {} of {} rows match, page {}/{}, {} visible",
        filtered_count,
        data.len(),
        state.current_page(),
        page_count,
        rows.len()
    );

    TableFrame {
        headers: columns.iter().map(|c| c.header.clone()).collect(),
        rows,
        filtered_count,
        page_count,
        current_page: state.current_page(),
        selected: state.selected(),
        show_search: options.searchable,
        show_pager: options.pagination && page_count > 1,
        search_query: state.search_query().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Stylize;

    fn named_rows(n: usize) -> Vec<Record> {
        (1..=n)
            .map(|i| {
                Record::new()
                    .with("id", i as u64)
                    .with("name", format!("row-{i}"))
            })
            .collect()
    }

    fn names(frame: &TableFrame) -> Vec<String> {
        frame.rows.iter().map(|r| r[0].to_string()).collect()
    }

    fn name_column() -> Vec<Column> {
        vec![Column::new("Name", "name")]
    }

    #[test]
    fn empty_query_keeps_all_rows_in_order() {
        let data = named_rows(5);
        let filtered = filter_rows(&data, "");
        assert_eq!(filtered.len(), 5);
        for (record, original) in filtered.iter().zip(data.iter()) {
            assert!(std::ptr::eq(*record, original));
        }
    }

    #[test]
    fn filter_matches_any_text_field_ignoring_case() {
        let data = vec![
            Record::new().with("name", "Alpha").with("status", "Published"),
            Record::new().with("name", "Beta").with("status", "Draft"),
            Record::new().with("name", "Gamma").with("status", "PUBLISHED"),
        ];
        let filtered = filter_rows(&data, "publ");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].get("name"), Some(&Value::from("Alpha")));
        assert_eq!(filtered[1].get("name"), Some(&Value::from("Gamma")));
    }

    #[test]
    fn filter_ignores_non_text_values() {
        let data = vec![
            Record::new().with("id", 42u64).with("active", true),
            Record::new().with("badge", Line::from("42".green())),
            Record::new().with("title", "Answer 42"),
        ];
        let filtered = filter_rows(&data, "42");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].get("title"), Some(&Value::from("Answer 42")));

        assert!(filter_rows(&data, "true").is_empty());
    }

    #[test]
    fn scenario_b_query_is_case_insensitive() {
        let data = vec![
            Record::new().with("name", "Alpha").with("status", "Published"),
            Record::new().with("name", "Beta").with("status", "Draft"),
        ];
        let filtered = filter_rows(&data, "alpha");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].get("name"), Some(&Value::from("Alpha")));
    }

    #[test]
    fn scenario_d_query_is_a_literal_substring() {
        let data = vec![
            Record::new().with("name", "a.b testing"),
            Record::new().with("name", "axb testing"),
        ];
        let filtered = filter_rows(&data, "a.b");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].get("name"), Some(&Value::from("a.b testing")));

        assert!(filter_rows(&data, "(").is_empty());
        assert!(filter_rows(&data, "a*b").is_empty());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, PAGE_SIZE), 0);
        assert_eq!(page_count(1, PAGE_SIZE), 1);
        assert_eq!(page_count(10, PAGE_SIZE), 1);
        assert_eq!(page_count(11, PAGE_SIZE), 2);
        assert_eq!(page_count(25, PAGE_SIZE), 3);
    }

    #[test]
    fn pages_concatenate_to_the_filtered_set() {
        for n in [1usize, 9, 10, 11, 20, 23] {
            let data = named_rows(n);
            let filtered = filter_rows(&data, "");
            let pages = page_count(filtered.len(), PAGE_SIZE);
            let joined: Vec<&Record> = (1..=pages)
                .flat_map(|p| paginate(&filtered, p, PAGE_SIZE).iter().copied())
                .collect();
            assert_eq!(joined, filtered, "{n} rows");
        }
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let data = named_rows(3);
        assert!(paginate(&data, 2, PAGE_SIZE).is_empty());
    }

    #[test]
    fn scenario_a_two_pages() {
        let data = named_rows(12);
        let columns = name_column();
        let options = TableOptions::default();
        let mut state = ViewState::default();

        let frame = derive(&columns, &data, &options, &state);
        assert_eq!(frame.page_count, 2);
        assert!(frame.show_pager);
        let expected: Vec<String> = (1..=10).map(|i| format!("row-{i}")).collect();
        assert_eq!(names(&frame), expected);

        assert!(state.next_page(frame.page_count));
        let frame = derive(&columns, &data, &options, &state);
        assert_eq!(names(&frame), vec!["row-11", "row-12"]);
        assert_eq!(frame.pager_label(), "Page 2 of 2");
    }

    #[test]
    fn page_navigation_clamps() {
        let mut state = ViewState::default();
        assert!(!state.previous_page());
        assert_eq!(state.current_page(), 1);

        assert!(state.next_page(2));
        assert!(!state.next_page(2));
        assert_eq!(state.current_page(), 2);

        assert!(state.previous_page());
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn pager_reports_disabled_buttons_at_the_edges() {
        let data = named_rows(15);
        let columns = name_column();
        let options = TableOptions::default();
        let mut state = ViewState::default();

        let frame = derive(&columns, &data, &options, &state);
        assert!(!frame.has_previous());
        assert!(frame.has_next());

        state.next_page(frame.page_count);
        let frame = derive(&columns, &data, &options, &state);
        assert!(frame.has_previous());
        assert!(!frame.has_next());
    }

    #[test]
    fn changing_the_query_returns_to_the_first_page() {
        let mut state = ViewState::default();
        state.next_page(3);
        state.select_next(5);
        state.set_search_query("row");
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.selected(), 0);

        // Same query again is not a change
        state.next_page(3);
        state.set_search_query("row");
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn derive_is_idempotent() {
        let data = named_rows(14);
        let columns = name_column();
        let options = TableOptions::default();
        let mut state = ViewState::default();
        state.set_search_query("1");
        state.next_page(2);

        let first = derive(&columns, &data, &options, &state);
        let second = derive(&columns, &data, &options, &state);
        assert_eq!(first, second);
    }

    #[test]
    fn cell_renderer_overrides_raw_value() {
        let data = vec![Record::new().with("status", "Draft")];
        let columns = vec![
            Column::new("Status", "status").with_cell(|_| Line::from("badge")),
            Column::new("Raw", "status"),
        ];
        let frame = derive(&columns, &data, &TableOptions::default(), &ViewState::default());
        assert_eq!(frame.rows[0][0].to_string(), "badge");
        assert_eq!(frame.rows[0][1].to_string(), "Draft");
    }

    #[test]
    fn cell_renderer_sees_missing_fields_as_none() {
        let data = vec![Record::new().with("name", "x")];
        let columns = vec![
            Column::new("Missing", "nope").with_cell(|v| match v {
                Some(_) => Line::from("present"),
                None => Line::from("absent"),
            }),
            Column::new("Plain", "nope"),
        ];
        let frame = derive(&columns, &data, &TableOptions::default(), &ViewState::default());
        assert_eq!(frame.rows[0][0].to_string(), "absent");
        assert_eq!(frame.rows[0][1].to_string(), "");
    }

    #[test]
    fn scenario_c_no_data_keeps_headers() {
        let columns = vec![
            Column::new("Title", "title"),
            Column::new("Slug", "slug"),
            Column::new("Author", "author"),
        ];
        let frame = derive(&columns, &[], &TableOptions::default(), &ViewState::default());
        assert_eq!(frame.headers, vec!["Title", "Slug", "Author"]);
        assert!(frame.is_empty());
        assert_eq!(frame.page_count, 0);
        assert!(!frame.show_pager);
    }

    #[test]
    fn no_columns_is_a_valid_table() {
        let data = named_rows(2);
        let frame = derive(&[], &data, &TableOptions::default(), &ViewState::default());
        assert!(frame.headers.is_empty());
        assert_eq!(frame.rows.len(), 2);
        assert!(frame.rows.iter().all(|r| r.is_empty()));
    }

    #[test]
    fn duplicate_accessor_keys_both_render() {
        let data = vec![Record::new().with("name", "dup")];
        let columns = vec![Column::new("A", "name"), Column::new("B", "name")];
        let frame = derive(&columns, &data, &TableOptions::default(), &ViewState::default());
        assert_eq!(frame.rows[0].len(), 2);
    }

    #[test]
    fn disabled_options_skip_search_and_paging() {
        let data = named_rows(25);
        let columns = name_column();
        let options = TableOptions::default().searchable(false).pagination(false);
        let mut state = ViewState::default();
        state.set_search_query("row-1");

        let frame = derive(&columns, &data, &options, &state);
        assert_eq!(frame.rows.len(), 25);
        assert!(!frame.show_search);
        assert!(!frame.show_pager);
    }

    #[test]
    fn numbers_display_without_trailing_zero() {
        assert_eq!(Value::from(7u64).to_string(), "7");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(false).to_string(), "false");
    }

    #[test]
    fn clamp_after_shrink() {
        let mut state = ViewState::default();
        state.next_page(3);
        state.next_page(3);
        state.select_next(10);
        state.select_next(10);
        state.clamp(1, 1);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.selected(), 0);

        state.clamp(0, 0);
        assert_eq!(state.current_page(), 1);
    }
}
