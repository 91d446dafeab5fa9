//! Generic data table
//!
//! - [`ColumnDescriptor`] - Maps a row field to a column
//! - [`TableFilters`] / [`TableState`] - Search, column filters, sort, page
//! - [`PaginatedResult`] - One page of rows plus the total count
//! - [`TableView`] - Renders a result and emits [`TableEvent`]s
//! - [`PaginationModel`] - Page buttons and previous/next
//! - [`ExportRequest`] / [`ExportPayload`] - Export packaging

mod column;
mod export;
mod filters;
mod pagination;
mod result;
mod view;

pub use column::*;
pub use export::*;
pub use filters::*;
pub use pagination::*;
pub use result::*;
pub use view::*;
