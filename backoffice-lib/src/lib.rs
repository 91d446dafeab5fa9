//! Back-office dashboard core
//!
//! Headless building blocks for an administration dashboard over a remote
//! table store: a generic paginated table with sorting, filtering and
//! export, pure aggregate calculators for bank balances, payroll and roster
//! staffing, and screen controllers that tie them to a [`store::RemoteStore`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use backoffice_lib::config::DashboardConfig;
//! use backoffice_lib::screen::{ClientsController, ClientsScreen, ToastLog};
//! use backoffice_lib::store::InMemoryStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(InMemoryStore::new().with_tables(&["clients"]));
//! let toasts = Arc::new(ToastLog::new());
//! let clients = ClientsController::new(ClientsScreen, store, toasts, DashboardConfig::default()).unwrap();
//!
//! clients.refresh().await;
//! assert!(clients.rows().await.is_empty());
//! # }
//! ```

pub mod calc;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod screen;
pub mod store;
pub mod table;
