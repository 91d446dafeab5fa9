//! Working-hours totals

use rust_decimal::Decimal;

use crate::model::WorkingHours;
use crate::model::WorkingHoursStatus;
use crate::model::types::Money;

/// `hours × rate`, absent inputs counting as zero.
pub fn payable_amount(hours: Option<Decimal>, rate: Option<Money>) -> Money {
    rate.unwrap_or_default() * hours.unwrap_or_default()
}

/// Payable amount of an entry, recomputed from its hours and rate.
pub fn entry_payable(entry: &WorkingHours) -> Money {
    payable_amount(entry.total_hours, entry.hourly_rate)
}

/// Totals shown above the timesheet list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoursSummary {
    pub total_hours: Decimal,
    pub total_payable: Money,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl HoursSummary {
    pub fn compute(entries: &[WorkingHours]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, entry| {
            acc.total_hours += entry.total_hours.unwrap_or_default();
            acc.total_payable += entry_payable(entry);
            match entry.status {
                WorkingHoursStatus::Pending => acc.pending += 1,
                WorkingHoursStatus::Approved => acc.approved += 1,
                WorkingHoursStatus::Rejected => acc.rejected += 1,
            }
            acc
        })
    }
}
