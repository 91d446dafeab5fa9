//! Column descriptors

use std::fmt;
use std::sync::Arc;

use crate::model::TableRow;
use crate::model::Value;

/// Key of the synthetic row-actions column.
pub const ACTIONS_KEY: &str = "actions";

/// Display content of one table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Plain text.
    Text(String),
    /// Short status label, shown as a badge.
    Badge(String),
    /// Nothing to show.
    Empty,
}

impl Cell {
    /// Creates a text cell.
    pub fn text(text: impl Into<String>) -> Self {
        Cell::Text(text.into())
    }

    /// Creates a badge cell.
    pub fn badge(label: impl Into<String>) -> Self {
        Cell::Badge(label.into())
    }

    /// Creates a text cell from a value, or an empty cell for null.
    pub fn from_value(value: &Value) -> Self {
        if value.is_null() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }

    /// Returns the text shown in the cell.
    pub fn as_text(&self) -> &str {
        match self {
            Cell::Text(s) | Cell::Badge(s) => s,
            Cell::Empty => "",
        }
    }
}

/// Renders a field value into a display cell.
pub type Renderer<R> = Arc<dyn Fn(&Value, &R) -> Cell + Send + Sync>;

/// Renders a field value into export text.
pub type ExportRenderer<R> = Arc<dyn Fn(&Value, &R) -> String + Send + Sync>;

/// Maps one row field to one table column.
///
/// Built once per screen and never changed afterwards.
///
/// # Example
///
/// ```
/// use backoffice_lib::model::Row;
/// use backoffice_lib::table::{Cell, ColumnDescriptor};
///
/// let name = ColumnDescriptor::<Row>::new("name", "Name").sortable().filterable();
/// let status = ColumnDescriptor::<Row>::new("status", "Status")
///     .render(|value, _| Cell::badge(value.to_string()));
///
/// let row = Row::new().set("name", "Acme").set("status", "active");
/// assert_eq!(name.render_cell(&row), Cell::text("Acme"));
/// assert_eq!(status.render_cell(&row), Cell::badge("active"));
/// ```
pub struct ColumnDescriptor<R> {
    key: String,
    label: String,
    sortable: bool,
    filterable: bool,
    synthetic: bool,
    renderer: Option<Renderer<R>>,
    export_renderer: Option<ExportRenderer<R>>,
}

impl<R: TableRow> ColumnDescriptor<R> {
    /// Creates a plain column for a field.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            filterable: false,
            synthetic: false,
            renderer: None,
            export_renderer: None,
        }
    }

    /// Creates the synthetic row-actions column.
    ///
    /// It has no backing field, never sorts or filters and is never exported.
    pub fn actions(render: impl Fn(&R) -> Cell + Send + Sync + 'static) -> Self {
        let mut column = Self::new(ACTIONS_KEY, "Actions");
        column.synthetic = true;
        column.renderer = Some(Arc::new(move |_: &Value, row: &R| render(row)));
        column
    }

    /// Makes the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = !self.synthetic;
        self
    }

    /// Makes the column filterable.
    pub fn filterable(mut self) -> Self {
        self.filterable = !self.synthetic;
        self
    }

    /// Sets the display renderer.
    pub fn render(mut self, f: impl Fn(&Value, &R) -> Cell + Send + Sync + 'static) -> Self {
        self.renderer = Some(Arc::new(f));
        self
    }

    /// Sets the export renderer.
    pub fn export_with(mut self, f: impl Fn(&Value, &R) -> String + Send + Sync + 'static) -> Self {
        self.export_renderer = Some(Arc::new(f));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    /// Returns `true` for columns without a backing field.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Renders the cell for a row.
    ///
    /// Uses the display renderer if set, the raw field value otherwise.
    pub fn render_cell(&self, row: &R) -> Cell {
        let value = row.field(&self.key);
        match &self.renderer {
            Some(render) => render(&value, row),
            None => Cell::from_value(&value),
        }
    }

    /// Renders the export text for a row.
    ///
    /// Falls back to the display cell's text.
    pub fn export_cell(&self, row: &R) -> String {
        match &self.export_renderer {
            Some(render) => render(&row.field(&self.key), row),
            None => self.render_cell(row).as_text().to_string(),
        }
    }
}

impl<R> Clone for ColumnDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
            synthetic: self.synthetic,
            renderer: self.renderer.clone(),
            export_renderer: self.export_renderer.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("synthetic", &self.synthetic)
            .finish_non_exhaustive()
    }
}
