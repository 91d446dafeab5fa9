//! Generic table view
//!
//! Renders a [`PaginatedResult`] through column descriptors and turns user
//! interactions into [`TableEvent`]s. The view never fetches; the owning
//! screen controller applies the events and re-queries.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::Error;
use crate::error::Result;
use crate::model::TableRow;
use crate::query::SortOrder;

use super::column::Cell;
use super::column::ColumnDescriptor;
use super::export::ExportAction;
use super::export::ExportRequest;
use super::export::ExportScope;
use super::export::build_export_request;
use super::export::offered_columns;
use super::filters::TableState;
use super::pagination::DEFAULT_PAGE_SIZES;
use super::pagination::DEFAULT_PAGE_WINDOW;
use super::pagination::PaginationModel;
use super::result::PaginatedResult;
use super::result::RangeSummary;

/// An interaction the owning controller must act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    SearchSubmitted(String),
    /// A sortable header was clicked. The controller decides the direction.
    SortRequested(String),
    ColumnFilterChanged { key: String, value: String },
    PageRequested(usize),
    PageSizeRequested(usize),
    ExportRequested(ExportRequest),
    PrintRequested,
    ColumnVisibilityToggled(String),
}

/// Header of one visible column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub filterable: bool,
    /// Direction if this column is the active sort.
    pub sort: Option<SortOrder>,
    pub filter: Option<String>,
}

/// Cells of one data row, one per visible column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub id: Option<Uuid>,
    pub cells: Vec<Cell>,
}

/// What the table body shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    /// A fetch is running and no rows are available yet.
    Loading,
    /// Nothing matched.
    Empty,
    Rows(Vec<RenderedRow>),
}

/// "Load more" affordance shown in infinite-scroll mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMore {
    pub next_page: usize,
    pub loading: bool,
}

/// A fully rendered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub headers: Vec<HeaderCell>,
    pub body: TableBody,
    /// Absent in infinite-scroll mode.
    pub pagination: Option<PaginationModel>,
    pub load_more: Option<LoadMore>,
    pub summary: RangeSummary,
    /// "Columns (visible/total)" of the column toggle.
    pub column_count: (usize, usize),
}

/// A table over rows of type `R`.
///
/// # Example
///
/// ```
/// use backoffice_lib::model::Row;
/// use backoffice_lib::table::{ColumnDescriptor, PaginatedResult, TableBody, TableView};
///
/// let view = TableView::new(vec![
///     ColumnDescriptor::<Row>::new("name", "Name").sortable(),
///     ColumnDescriptor::new("email", "Email"),
/// ])
/// .unwrap();
/// let state = view.initial_state(10);
///
/// let empty = view.render(&PaginatedResult::empty(10), &state, false);
/// assert_eq!(empty.body, TableBody::Empty);
///
/// assert!(view.click_header("name").is_some());
/// assert!(view.click_header("email").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct TableView<R> {
    columns: Vec<ColumnDescriptor<R>>,
    infinite_scroll: bool,
    export_enabled: bool,
    column_toggle_enabled: bool,
    page_window: usize,
    page_size_options: Vec<usize>,
}

impl<R: TableRow> TableView<R> {
    /// Creates a view. Fails if two columns share a key.
    pub fn new(columns: Vec<ColumnDescriptor<R>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key()) {
                return Err(Error::DuplicateColumn(column.key().to_string()));
            }
        }
        Ok(Self {
            columns,
            infinite_scroll: false,
            export_enabled: true,
            column_toggle_enabled: true,
            page_window: DEFAULT_PAGE_WINDOW,
            page_size_options: DEFAULT_PAGE_SIZES.to_vec(),
        })
    }

    /// Replaces the pagination bar with a "load more" button.
    pub fn with_infinite_scroll(mut self, enabled: bool) -> Self {
        self.infinite_scroll = enabled;
        self
    }

    pub fn with_export(mut self, enabled: bool) -> Self {
        self.export_enabled = enabled;
        self
    }

    pub fn with_column_toggle(mut self, enabled: bool) -> Self {
        self.column_toggle_enabled = enabled;
        self
    }

    pub fn with_page_window(mut self, window: usize) -> Self {
        self.page_window = window;
        self
    }

    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    pub fn columns(&self) -> &[ColumnDescriptor<R>] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&ColumnDescriptor<R>> {
        self.columns.iter().find(|c| c.key() == key)
    }

    pub fn is_infinite_scroll(&self) -> bool {
        self.infinite_scroll
    }

    /// A fresh state over this view's columns.
    pub fn initial_state(&self, page_size: usize) -> TableState {
        TableState::new(self.columns.iter().map(|c| c.key()), page_size)
    }

    /// Renders headers, body and controls.
    ///
    /// While `loading` with rows already present, the previous rows stay.
    pub fn render(&self, result: &PaginatedResult<R>, state: &TableState, loading: bool) -> RenderedTable {
        let visible: Vec<&ColumnDescriptor<R>> = self
            .columns
            .iter()
            .filter(|c| state.is_visible(c.key()))
            .collect();
        let filters = state.filters();

        let headers = visible
            .iter()
            .map(|c| HeaderCell {
                key: c.key().to_string(),
                label: c.label().to_string(),
                sortable: c.is_sortable(),
                filterable: c.is_filterable(),
                sort: if c.is_sortable() { filters.sort_of(c.key()) } else { None },
                filter: filters.column_filters.get(c.key()).cloned(),
            })
            .collect();

        let body = if result.is_empty() && loading {
            TableBody::Loading
        } else if result.is_empty() {
            TableBody::Empty
        } else {
            TableBody::Rows(
                result
                    .rows()
                    .iter()
                    .map(|row| RenderedRow {
                        id: row.row_id(),
                        cells: visible.iter().map(|c| c.render_cell(row)).collect(),
                    })
                    .collect(),
            )
        };

        let pagination = (!self.infinite_scroll).then(|| {
            PaginationModel::new(result.page(), result.total_pages(), result.page_size(), result.total())
                .with_window(self.page_window)
                .with_page_size_options(self.page_size_options.clone())
                .with_loading(loading)
        });

        let load_more = (self.infinite_scroll && result.has_more()).then_some(LoadMore {
            next_page: result.page() + 1,
            loading,
        });

        RenderedTable {
            headers,
            body,
            pagination,
            load_more,
            summary: result.range_summary(),
            column_count: (visible.len(), self.columns.len()),
        }
    }

    /// Search box submitted.
    pub fn submit_search(&self, text: impl Into<String>) -> TableEvent {
        TableEvent::SearchSubmitted(text.into())
    }

    /// Header clicked. Only sortable columns emit.
    pub fn click_header(&self, key: &str) -> Option<TableEvent> {
        self.column(key)
            .filter(|c| c.is_sortable())
            .map(|c| TableEvent::SortRequested(c.key().to_string()))
    }

    /// Column filter edited. Only filterable columns emit.
    pub fn change_column_filter(&self, key: &str, value: impl Into<String>) -> Option<TableEvent> {
        self.column(key)
            .filter(|c| c.is_filterable())
            .map(|c| TableEvent::ColumnFilterChanged {
                key: c.key().to_string(),
                value: value.into(),
            })
    }

    /// "Load more" clicked. Emits the next page while more rows exist.
    pub fn load_more(&self, result: &PaginatedResult<R>, loading: bool) -> Option<TableEvent> {
        (self.infinite_scroll && result.has_more() && !loading)
            .then(|| TableEvent::PageRequested(result.page() + 1))
    }

    /// Column toggle clicked.
    pub fn toggle_column(&self, key: &str) -> Option<TableEvent> {
        if !self.column_toggle_enabled {
            return None;
        }
        self.column(key)
            .map(|c| TableEvent::ColumnVisibilityToggled(c.key().to_string()))
    }

    /// Columns offered in the export menu.
    pub fn export_columns(&self, state: &TableState) -> Vec<&ColumnDescriptor<R>> {
        offered_columns(&self.columns, state)
    }

    /// Export menu confirmed.
    ///
    /// Columns that are hidden or synthetic are dropped from the request.
    pub fn export<S: AsRef<str>>(
        &self,
        action: ExportAction,
        selected: &[S],
        scope: ExportScope,
        state: &TableState,
    ) -> Option<TableEvent> {
        if !self.export_enabled {
            return None;
        }
        match action {
            ExportAction::Print => Some(TableEvent::PrintRequested),
            ExportAction::Export(format) => {
                let offered: Vec<&str> = self.export_columns(state).iter().map(|c| c.key()).collect();
                let request = build_export_request(selected, &offered, scope, format);
                Some(TableEvent::ExportRequested(request))
            }
        }
    }
}
