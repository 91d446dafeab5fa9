//! Rosters (scheduled shifts) and their staff assignments

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::Entity;
use super::Row;
use super::TableRow;
use super::Value;
use super::status::text_enum;
use super::types::Money;
use crate::error::Error;
use crate::error::FieldError;

text_enum! {
    /// Confirmation state of a roster.
    ///
    /// ```text
    /// pending ──▶ confirmed
    ///    ▲            │
    ///    └────────────┘
    /// pending ──▶ cancelled   (terminal)
    /// ```
    pub enum RosterStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Cancelled => "cancelled",
    }
}

impl RosterStatus {
    /// Returns `true` if the status machine allows moving to `next`.
    ///
    /// A confirmed roster must be un-confirmed before it can be cancelled.
    pub fn can_transition_to(self, next: RosterStatus) -> bool {
        use RosterStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Pending)
        )
    }

    /// Moves to `next`, or reports the rejected transition.
    pub fn transition_to(self, next: RosterStatus) -> Result<RosterStatus, Error> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(Error::InvalidTransition {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }

    /// The confirm/un-confirm toggle offered on each roster card.
    pub fn toggle_confirmation(self) -> Result<RosterStatus, Error> {
        match self {
            RosterStatus::Pending => self.transition_to(RosterStatus::Confirmed),
            RosterStatus::Confirmed => self.transition_to(RosterStatus::Pending),
            RosterStatus::Cancelled => self.transition_to(RosterStatus::Pending),
        }
    }

    /// Returns `true` for states with no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        RosterStatus::ALL.iter().all(|next| !self.can_transition_to(*next))
    }
}

/// A scheduled shift for a client/project, staffed by one or more profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    pub id: Uuid,
    pub name: Option<String>,
    pub client_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    /// Lead profile, when a single person is rostered.
    pub profile_id: Option<Uuid>,
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub total_hours: Option<Decimal>,
    pub expected_profiles: Option<i64>,
    /// Rate paid per person per hour; `None` or zero means use each profile's own rate.
    pub per_hour_rate: Option<Money>,
    pub notes: Option<String>,
    pub status: RosterStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Roster {
    fn row_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.into(),
            "name" => self.name.clone().into(),
            "client_id" => self.client_id.into(),
            "project_id" => self.project_id.into(),
            "profile_id" => self.profile_id.into(),
            "date" => self.date.into(),
            "end_date" => self.end_date.into(),
            "start_time" => self.start_time.into(),
            "end_time" => self.end_time.into(),
            "total_hours" => self.total_hours.into(),
            "expected_profiles" => self.expected_profiles.into(),
            "per_hour_rate" => self.per_hour_rate.into(),
            "notes" => self.notes.clone().into(),
            "status" => self.status.into(),
            "created_at" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Roster {
    const TABLE: &'static str = "rosters";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "client_id",
        "project_id",
        "profile_id",
        "date",
        "end_date",
        "start_time",
        "end_time",
        "total_hours",
        "expected_profiles",
        "per_hour_rate",
        "notes",
        "status",
        "created_at",
    ];

    fn from_row(row: &Row) -> Result<Self, FieldError> {
        Ok(Self {
            id: row.require_uuid("id")?,
            name: row.get_text("name")?,
            client_id: row.get_uuid("client_id")?,
            project_id: row.get_uuid("project_id")?,
            profile_id: row.get_uuid("profile_id")?,
            date: row.require_date("date")?,
            end_date: row.get_date("end_date")?,
            start_time: row.get_time("start_time")?,
            end_time: row.get_time("end_time")?,
            total_hours: row.get_decimal("total_hours")?,
            expected_profiles: row.get_i64("expected_profiles")?,
            per_hour_rate: row.get_money("per_hour_rate")?,
            notes: row.get_text("notes")?,
            status: row.get_parsed("status")?.unwrap_or(RosterStatus::Pending),
            created_at: row.get_datetime("created_at")?,
        })
    }
}

/// Links a profile to a roster it is assigned to.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterAssignment {
    pub id: Uuid,
    pub roster_id: Uuid,
    pub profile_id: Uuid,
}

impl TableRow for RosterAssignment {
    fn row_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.into(),
            "roster_id" => self.roster_id.into(),
            "profile_id" => self.profile_id.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for RosterAssignment {
    const TABLE: &'static str = "roster_profiles";
    const FIELDS: &'static [&'static str] = &["id", "roster_id", "profile_id"];

    fn from_row(row: &Row) -> Result<Self, FieldError> {
        Ok(Self {
            id: row.require_uuid("id")?,
            roster_id: row.require_uuid("roster_id")?,
            profile_id: row.require_uuid("profile_id")?,
        })
    }
}
