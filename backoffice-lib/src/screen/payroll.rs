//! Payroll screen

use uuid::Uuid;

use crate::calc::PayrollFigures;
use crate::calc::PayrollSummary;
use crate::error::Result;
use crate::error::ValidationError;
use crate::error::Validator;
use crate::model::Payroll;
use crate::model::PayrollStatus;
use crate::model::Row;
use crate::table::Cell;
use crate::table::ColumnDescriptor;

use super::controller::FormMode;
use super::controller::Screen;
use super::controller::ScreenController;

/// Pay runs per staff member and period.
///
/// Gross and net pay are always recomputed on submit; values typed into
/// the form are overwritten.
#[derive(Debug, Default, Clone, Copy)]
pub struct PayrollScreen;

pub type PayrollController = ScreenController<PayrollScreen>;

impl Screen for PayrollScreen {
    type Row = Payroll;

    fn noun(&self) -> &'static str {
        "Payroll record"
    }

    fn plural(&self) -> &'static str {
        "payroll records"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["status"]
    }

    fn columns(&self) -> Vec<ColumnDescriptor<Payroll>> {
        vec![
            ColumnDescriptor::new("pay_period_start", "Period start").sortable(),
            ColumnDescriptor::new("pay_period_end", "Period end").sortable(),
            ColumnDescriptor::new("total_hours", "Hours").sortable(),
            ColumnDescriptor::new("hourly_rate", "Rate"),
            ColumnDescriptor::new("gross_pay", "Gross").sortable(),
            ColumnDescriptor::new("deductions", "Deductions"),
            ColumnDescriptor::new("net_pay", "Net")
                .sortable()
                .render(|_, p: &Payroll| Cell::text(PayrollFigures::for_record(p).net.to_string())),
            ColumnDescriptor::new("status", "Status")
                .sortable()
                .filterable()
                .render(|v, _| Cell::badge(v.to_string())),
            ColumnDescriptor::actions(|p: &Payroll| match p.status {
                PayrollStatus::Paid => Cell::Empty,
                _ => Cell::text("Edit"),
            }),
        ]
    }

    fn validate(&self, form: &Row, _mode: FormMode) -> std::result::Result<(), ValidationError> {
        let period = (
            form.get_date("pay_period_start").ok().flatten(),
            form.get_date("pay_period_end").ok().flatten(),
        );
        Validator::new()
            .required_fields(form, &["profile_id", "pay_period_start", "pay_period_end"])
            .check(
                "pay_period_end",
                !matches!(period, (Some(start), Some(end)) if end < start),
                "pay_period_end must not be before pay_period_start",
            )
            .non_negative_field(form, "total_hours")
            .non_negative_field(form, "hourly_rate")
            .non_negative_field(form, "deductions")
            .finish()
    }

    fn prepare(&self, mut form: Row, mode: FormMode) -> Row {
        if mode == FormMode::Create && form.value("status").is_null() {
            form.insert("status", PayrollStatus::Pending);
        }
        let figures = PayrollFigures::compute(
            form.get_decimal("total_hours").ok().flatten(),
            form.get_money("hourly_rate").ok().flatten(),
            form.get_money("deductions").ok().flatten(),
        );
        form.insert("gross_pay", figures.gross);
        form.insert("net_pay", figures.net);
        form
    }
}

impl PayrollController {
    /// Moves a record to approved or paid.
    pub async fn set_status(&self, id: Uuid, status: PayrollStatus) -> Result<Payroll> {
        self.patch(id, Row::new().set("status", status)).await
    }

    /// Totals over the displayed records.
    pub async fn summary(&self) -> PayrollSummary {
        PayrollSummary::compute(&self.rows().await)
    }
}
