//! Payroll gross/net computation

use rust_decimal::Decimal;

use crate::model::Payroll;
use crate::model::PayrollStatus;
use crate::model::types::Money;

/// Gross and net pay derived from hours, rate and deductions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayrollFigures {
    /// `hours × rate`
    pub gross: Money,
    /// `gross − deductions`; negative when deductions exceed gross.
    pub net: Money,
}

impl PayrollFigures {
    /// Computes the figures. Absent inputs count as zero.
    ///
    /// ```
    /// use backoffice_lib::calc::PayrollFigures;
    /// use backoffice_lib::model::types::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let f = PayrollFigures::compute(
    ///     Some(Decimal::from(40)),
    ///     Some(Money::from_int(25)),
    ///     Some(Money::from_int(100)),
    /// );
    /// assert_eq!(f.gross, Money::from_int(1000));
    /// assert_eq!(f.net, Money::from_int(900));
    /// ```
    pub fn compute(hours: Option<Decimal>, rate: Option<Money>, deductions: Option<Money>) -> Self {
        let gross = rate.unwrap_or_default() * hours.unwrap_or_default();
        Self {
            gross,
            net: gross - deductions.unwrap_or_default(),
        }
    }

    /// Recomputes the figures of a record, ignoring its stored gross and net.
    pub fn for_record(record: &Payroll) -> Self {
        Self::compute(record.total_hours, record.hourly_rate, record.deductions)
    }
}

/// Totals shown above the payroll list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayrollSummary {
    pub pending: usize,
    pub approved: usize,
    pub paid: usize,
    pub total_hours: Decimal,
    pub total_gross: Money,
    pub total_net: Money,
    /// Net pay of records already paid out.
    pub total_paid_net: Money,
}

impl PayrollSummary {
    pub fn compute(records: &[Payroll]) -> Self {
        records.iter().fold(Self::default(), |mut acc, record| {
            let figures = PayrollFigures::for_record(record);
            match record.status {
                PayrollStatus::Pending => acc.pending += 1,
                PayrollStatus::Approved => acc.approved += 1,
                PayrollStatus::Paid => {
                    acc.paid += 1;
                    acc.total_paid_net += figures.net;
                }
            }
            acc.total_hours += record.total_hours.unwrap_or_default();
            acc.total_gross += figures.gross;
            acc.total_net += figures.net;
            acc
        })
    }
}
