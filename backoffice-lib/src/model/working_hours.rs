//! Timesheet entries

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
use crate::error::FieldError;

text_enum! {
    /// Approval state of a timesheet entry.
    pub enum WorkingHoursStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// Hours worked by one profile on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingHours {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub client_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub roster_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub total_hours: Option<Decimal>,
    pub hourly_rate: Option<Money>,
    /// Stored snapshot of hours × rate; recompute with
    /// [`payable_amount`](crate::calc::payable_amount) rather than trusting it.
    pub payable_amount: Option<Money>,
    pub notes: Option<String>,
    pub status: WorkingHoursStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for WorkingHours {
    fn row_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.into(),
            "profile_id" => self.profile_id.into(),
            "client_id" => self.client_id.into(),
            "project_id" => self.project_id.into(),
            "roster_id" => self.roster_id.into(),
            "date" => self.date.into(),
            "start_time" => self.start_time.into(),
            "end_time" => self.end_time.into(),
            "total_hours" => self.total_hours.into(),
            "hourly_rate" => self.hourly_rate.into(),
            "payable_amount" => self.payable_amount.into(),
            "notes" => self.notes.clone().into(),
            "status" => self.status.into(),
            "created_at" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for WorkingHours {
    const TABLE: &'static str = "working_hours";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "profile_id",
        "client_id",
        "project_id",
        "roster_id",
        "date",
        "start_time",
        "end_time",
        "total_hours",
        "hourly_rate",
        "payable_amount",
        "notes",
        "status",
        "created_at",
    ];

    fn from_row(row: &Row) -> Result<Self, FieldError> {
        Ok(Self {
            id: row.require_uuid("id")?,
            profile_id: row.require_uuid("profile_id")?,
            client_id: row.get_uuid("client_id")?,
            project_id: row.get_uuid("project_id")?,
            roster_id: row.get_uuid("roster_id")?,
            date: row.require_date("date")?,
            start_time: row.get_time("start_time")?,
            end_time: row.get_time("end_time")?,
            total_hours: row.get_decimal("total_hours")?,
            hourly_rate: row.get_money("hourly_rate")?,
            payable_amount: row.get_money("payable_amount")?,
            notes: row.get_text("notes")?,
            status: row.get_parsed("status")?.unwrap_or(WorkingHoursStatus::Pending),
            created_at: row.get_datetime("created_at")?,
        })
    }
}
