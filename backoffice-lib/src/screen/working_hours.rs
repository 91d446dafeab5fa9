//! Timesheet screen

use uuid::Uuid;

use crate::calc::HoursSummary;
use crate::calc::payable_amount;
use crate::calc::shift_hours;
use crate::error::Result;
use crate::error::ValidationError;
use crate::error::Validator;
use crate::model::Row;
use crate::model::WorkingHours;
use crate::model::WorkingHoursStatus;
use crate::query::OrderBy;
use crate::table::Cell;
use crate::table::ColumnDescriptor;

use super::controller::FormMode;
use super::controller::Screen;
use super::controller::ScreenController;

/// Hours logged by staff against clients and projects.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkingHoursScreen;

pub type WorkingHoursController = ScreenController<WorkingHoursScreen>;

impl Screen for WorkingHoursScreen {
    type Row = WorkingHours;

    fn noun(&self) -> &'static str {
        "Working hours"
    }

    fn plural(&self) -> &'static str {
        "working hours"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["notes"]
    }

    fn default_order(&self) -> Option<OrderBy> {
        Some(OrderBy::desc("date").then_desc("created_at"))
    }

    fn columns(&self) -> Vec<ColumnDescriptor<WorkingHours>> {
        vec![
            ColumnDescriptor::new("date", "Date").sortable(),
            ColumnDescriptor::new("start_time", "Start"),
            ColumnDescriptor::new("end_time", "End"),
            ColumnDescriptor::new("total_hours", "Hours").sortable(),
            ColumnDescriptor::new("hourly_rate", "Rate").sortable(),
            ColumnDescriptor::new("payable_amount", "Payable").sortable(),
            ColumnDescriptor::new("status", "Status")
                .sortable()
                .filterable()
                .render(|v, _| Cell::badge(v.to_string())),
            ColumnDescriptor::new("notes", "Notes").filterable(),
            ColumnDescriptor::actions(|w: &WorkingHours| match w.status {
                WorkingHoursStatus::Pending => Cell::text("Approve"),
                _ => Cell::text("Edit"),
            }),
        ]
    }

    fn validate(&self, form: &Row, _mode: FormMode) -> std::result::Result<(), ValidationError> {
        Validator::new()
            .required_fields(form, &["profile_id", "client_id", "project_id", "date"])
            .check("date", form.get_date("date").is_ok(), "date must be a date")
            .non_negative_field(form, "total_hours")
            .non_negative_field(form, "hourly_rate")
            .finish()
    }

    /// Derives hours from the shift times when no total is given, then the
    /// payable amount from hours and rate.
    fn prepare(&self, mut form: Row, mode: FormMode) -> Row {
        if mode == FormMode::Create && form.value("status").is_null() {
            form.insert("status", WorkingHoursStatus::Pending);
        }
        let mut hours = form.get_decimal("total_hours").ok().flatten();
        if hours.is_none() {
            let start = form.get_time("start_time").ok().flatten();
            let end = form.get_time("end_time").ok().flatten();
            if start.is_some() && end.is_some() {
                let derived = shift_hours(start, end);
                form.insert("total_hours", derived);
                hours = Some(derived);
            }
        }
        let rate = form.get_money("hourly_rate").ok().flatten();
        form.insert("payable_amount", payable_amount(hours, rate));
        form
    }
}

impl WorkingHoursController {
    /// Approves or rejects an entry.
    pub async fn set_status(&self, id: Uuid, status: WorkingHoursStatus) -> Result<WorkingHours> {
        self.patch(id, Row::new().set("status", status)).await
    }

    /// Totals over the displayed entries.
    pub async fn summary(&self) -> HoursSummary {
        HoursSummary::compute(&self.rows().await)
    }
}
