//! Screen controllers
//!
//! A [`ScreenController`] owns one screen's table state, fetches pages from
//! a [`RemoteStore`](crate::store::RemoteStore) and applies
//! [`TableEvent`](crate::table::TableEvent)s coming back from the view.
//! Each dashboard screen is a small [`Screen`] impl naming its table,
//! columns and form rules.
//!
//! Fetches are numbered by a [`RequestSequencer`]; a response older than
//! the last one applied never overwrites newer rows. Failures keep the
//! previous rows and raise a [`Toast`] through the [`Notifier`].

mod bank;
mod clients;
mod controller;
mod notifications;
mod notify;
mod payroll;
mod profiles;
mod projects;
mod realtime;
mod rosters;
mod sequence;
mod working_hours;

pub use bank::*;
pub use clients::*;
pub use controller::*;
pub use notifications::*;
pub use notify::*;
pub use payroll::*;
pub use profiles::*;
pub use projects::*;
pub use realtime::*;
pub use rosters::*;
pub use sequence::*;
pub use working_hours::*;
