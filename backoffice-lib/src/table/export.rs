//! Export coordinator
//!
//! Packages what the user chose to export. File generation and any network
//! transfer belong to the caller.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::model::TableRow;

use super::column::ColumnDescriptor;
use super::filters::TableState;

/// File format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rows an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportScope {
    #[default]
    CurrentPage,
    AllPages,
}

/// What the user picked in the export menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportAction {
    /// Export to a file format.
    Export(ExportFormat),
    /// Print the current view. Never produces an [`ExportRequest`].
    Print,
}

/// A packaged export, built right before dispatch and not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub scope: ExportScope,
    /// Column keys, in export order, without duplicates.
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ExportRequest {
    /// Sets the file name.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// The requested file name, or `{base}.{ext}`, always with the
    /// format's extension.
    pub fn file_name(&self, base: &str) -> String {
        let ext = self.format.extension();
        let name = self.filename.as_deref().unwrap_or(base);
        if name.to_lowercase().ends_with(&format!(".{ext}")) {
            name.to_string()
        } else {
            format!("{name}.{ext}")
        }
    }
}

/// Builds an export request from the user's column choice.
///
/// Keys not in `visible` are dropped, as are repeats. Never fails; an
/// empty column list is a valid request.
///
/// # Example
///
/// ```
/// use backoffice_lib::table::{build_export_request, ExportFormat, ExportScope};
///
/// let request = build_export_request(
///     &["name", "salary", "email", "name"],
///     &["name", "email"],
///     ExportScope::AllPages,
///     ExportFormat::Csv,
/// );
/// assert_eq!(request.columns, vec!["name", "email"]);
/// ```
pub fn build_export_request<S, V>(
    selected: &[S],
    visible: &[V],
    scope: ExportScope,
    format: ExportFormat,
) -> ExportRequest
where
    S: AsRef<str>,
    V: AsRef<str>,
{
    let mut columns: Vec<String> = Vec::with_capacity(selected.len());
    for key in selected.iter().map(AsRef::as_ref) {
        let shown = visible.iter().any(|v| v.as_ref() == key);
        if shown && !columns.iter().any(|c| c == key) {
            columns.push(key.to_string());
        }
    }
    ExportRequest {
        format,
        scope,
        columns,
        filename: None,
    }
}

/// Columns the export menu offers: visible and backed by a field.
pub fn offered_columns<'a, R: TableRow>(
    columns: &'a [ColumnDescriptor<R>],
    state: &TableState,
) -> Vec<&'a ColumnDescriptor<R>> {
    columns
        .iter()
        .filter(|c| !c.is_synthetic() && state.is_visible(c.key()))
        .collect()
}

/// Headers and text cells ready to be written to a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportPayload {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportPayload {
    /// Renders `rows` through the requested columns' export renderers.
    ///
    /// Requested keys without a matching, non-synthetic descriptor are
    /// skipped.
    pub fn build<R: TableRow>(columns: &[ColumnDescriptor<R>], request: &ExportRequest, rows: &[R]) -> Self {
        let picked: Vec<&ColumnDescriptor<R>> = request
            .columns
            .iter()
            .filter_map(|key| columns.iter().find(|c| c.key() == key && !c.is_synthetic()))
            .collect();

        Self {
            headers: picked.iter().map(|c| c.label().to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| picked.iter().map(|c| c.export_cell(row)).collect())
                .collect(),
        }
    }

    /// Serializes as CSV with CRLF line endings.
    ///
    /// Fields holding a comma, quote, CR or LF are quoted, with inner quotes
    /// doubled.
    pub fn csv(&self) -> String {
        let mut out = String::new();
        for line in std::iter::once(&self.headers).chain(self.rows.iter()) {
            let fields: Vec<String> = line.iter().map(|f| csv_escape(f)).collect();
            out.push_str(&fields.join(","));
            out.push_str("\r\n");
        }
        out
    }
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
