//! Payroll records

use chrono::DateTime;
use chrono::NaiveDate;
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
    /// Payment state of a payroll record.
    pub enum PayrollStatus {
        Pending => "pending",
        Approved => "approved",
        Paid => "paid",
    }
}

/// Pay owed to one profile for one pay period.
///
/// `gross_pay` and `net_pay` are stored snapshots. Figures shown to users are
/// recomputed from hours, rate and deductions by
/// [`PayrollFigures`](crate::calc::PayrollFigures).
#[derive(Debug, Clone, PartialEq)]
pub struct Payroll {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub pay_period_start: NaiveDate,
    pub pay_period_end: NaiveDate,
    pub total_hours: Option<Decimal>,
    pub hourly_rate: Option<Money>,
    pub gross_pay: Option<Money>,
    pub deductions: Option<Money>,
    pub net_pay: Option<Money>,
    pub status: PayrollStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Payroll {
    fn row_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.into(),
            "profile_id" => self.profile_id.into(),
            "pay_period_start" => self.pay_period_start.into(),
            "pay_period_end" => self.pay_period_end.into(),
            "total_hours" => self.total_hours.into(),
            "hourly_rate" => self.hourly_rate.into(),
            "gross_pay" => self.gross_pay.into(),
            "deductions" => self.deductions.into(),
            "net_pay" => self.net_pay.into(),
            "status" => self.status.into(),
            "created_at" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Payroll {
    const TABLE: &'static str = "payroll";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "profile_id",
        "pay_period_start",
        "pay_period_end",
        "total_hours",
        "hourly_rate",
        "gross_pay",
        "deductions",
        "net_pay",
        "status",
        "created_at",
    ];

    fn from_row(row: &Row) -> Result<Self, FieldError> {
        Ok(Self {
            id: row.require_uuid("id")?,
            profile_id: row.require_uuid("profile_id")?,
            pay_period_start: row.require_date("pay_period_start")?,
            pay_period_end: row.require_date("pay_period_end")?,
            total_hours: row.get_decimal("total_hours")?,
            hourly_rate: row.get_money("hourly_rate")?,
            gross_pay: row.get_money("gross_pay")?,
            deductions: row.get_money("deductions")?,
            net_pay: row.get_money("net_pay")?,
            status: row.get_parsed("status")?.unwrap_or(PayrollStatus::Pending),
            created_at: row.get_datetime("created_at")?,
        })
    }
}
