//! Roster staffing aggregates

use chrono::NaiveTime;
use rust_decimal::Decimal;

use crate::model::Profile;
use crate::model::Roster;
use crate::model::types::Money;

fn expected_or_one(expected: Option<i64>) -> usize {
    expected.unwrap_or(1).max(1) as usize
}

/// `min(assigned / max(expected, 1), 1)`.
///
/// Always in `[0, 1]`. An unset expectation counts as one profile.
pub fn staffing_ratio(assigned: usize, expected: Option<i64>) -> f64 {
    let expected = expected_or_one(expected);
    (assigned as f64 / expected as f64).min(1.0)
}

/// Staffing ratio as a percentage.
pub fn progress_percent(assigned: usize, expected: Option<i64>) -> f64 {
    staffing_ratio(assigned, expected) * 100.0
}

/// Profiles still needed.
pub fn unassigned_count(assigned: usize, expected: Option<i64>) -> usize {
    expected_or_one(expected).saturating_sub(assigned)
}

/// Hours between two times of day, rounded to two places.
///
/// Zero when either is missing or the end is not after the start.
pub fn shift_hours(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Decimal {
    match (start, end) {
        (Some(start), Some(end)) if end > start => {
            let seconds = (end - start).num_seconds();
            (Decimal::from(seconds) / Decimal::from(3600)).round_dp(2)
        }
        _ => Decimal::ZERO,
    }
}

/// Hours of one roster shift: the stored total, or derived from its times.
pub fn roster_hours(roster: &Roster) -> Decimal {
    roster
        .total_hours
        .unwrap_or_else(|| shift_hours(roster.start_time, roster.end_time))
}

/// Cost of the assigned profiles for one shift.
///
/// With a roster rate above zero: `assigned × rate × hours`. Otherwise the
/// sum of each profile's own rate × hours, missing rates counting as zero.
pub fn estimated_payable(roster: &Roster, assigned: &[Profile]) -> Money {
    let hours = roster_hours(roster);
    match roster.per_hour_rate {
        Some(rate) if rate.is_positive() => rate * Decimal::from(assigned.len()) * hours,
        _ => assigned
            .iter()
            .map(|p| p.hourly_rate.unwrap_or_default() * hours)
            .sum(),
    }
}

/// Staffing figures of one roster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Staffing {
    pub assigned: usize,
    pub expected: usize,
    pub ratio: f64,
    pub unassigned: usize,
    pub estimated_payable: Money,
}

impl Staffing {
    pub fn for_roster(roster: &Roster, assigned: &[Profile]) -> Self {
        Self {
            assigned: assigned.len(),
            expected: expected_or_one(roster.expected_profiles),
            ratio: staffing_ratio(assigned.len(), roster.expected_profiles),
            unassigned: unassigned_count(assigned.len(), roster.expected_profiles),
            estimated_payable: estimated_payable(roster, assigned),
        }
    }

    pub fn progress_percent(&self) -> f64 {
        self.ratio * 100.0
    }

    pub fn is_fully_staffed(&self) -> bool {
        self.unassigned == 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::model::RosterStatus;

    fn time(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    fn roster(expected: Option<i64>, rate: Option<i64>, hours: Option<i64>) -> Roster {
        Roster {
            id: Uuid::new_v4(),
            name: Some("Night".into()),
            client_id: None,
            project_id: None,
            profile_id: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: None,
            start_time: time(9, 0),
            end_time: time(17, 0),
            total_hours: hours.map(Decimal::from),
            expected_profiles: expected,
            per_hour_rate: rate.map(Money::from_int),
            notes: None,
            status: RosterStatus::Pending,
            created_at: None,
        }
    }

    fn profile(rate: Option<i64>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            full_name: "P".into(),
            email: "p@example.com".into(),
            phone: None,
            role: None,
            hourly_rate: rate.map(Money::from_int),
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_staffing_ratio() {
        assert_eq!(staffing_ratio(2, Some(4)), 0.5);
        assert_eq!(staffing_ratio(0, Some(0)), 0.0);
        assert_eq!(staffing_ratio(6, Some(4)), 1.0);
        assert_eq!(staffing_ratio(3, Some(0)), 1.0);
        assert_eq!(staffing_ratio(1, None), 1.0);
        assert!(staffing_ratio(0, Some(-3)).is_finite());
        assert_eq!(progress_percent(1, Some(4)), 25.0);
        assert_eq!(unassigned_count(1, Some(4)), 3);
        assert_eq!(unassigned_count(9, Some(4)), 0);
    }

    #[test]
    fn test_shift_hours() {
        assert_eq!(shift_hours(time(9, 0), time(17, 30)), Decimal::new(85, 1));
        assert_eq!(shift_hours(time(17, 0), time(9, 0)), Decimal::ZERO);
        assert_eq!(shift_hours(time(9, 0), time(9, 0)), Decimal::ZERO);
        assert_eq!(shift_hours(None, time(9, 0)), Decimal::ZERO);
        assert_eq!(shift_hours(time(9, 0), time(9, 20)), Decimal::new(33, 2));
    }

    #[test]
    fn test_estimated_payable_roster_rate() {
        let r = roster(Some(4), Some(30), Some(8));
        let assigned = [profile(Some(99)), profile(None)];
        assert_eq!(estimated_payable(&r, &assigned), Money::from_int(2 * 30 * 8));
    }

    #[test]
    fn test_estimated_payable_profile_rates() {
        let r = roster(Some(4), None, Some(8));
        let assigned = [profile(Some(20)), profile(None), profile(Some(25))];
        assert_eq!(estimated_payable(&r, &assigned), Money::from_int(45 * 8));

        let zero_rate = roster(Some(4), Some(0), Some(8));
        assert_eq!(estimated_payable(&zero_rate, &assigned), Money::from_int(45 * 8));
    }

    #[test]
    fn test_hours_fall_back_to_times() {
        let r = roster(Some(1), Some(10), None);
        assert_eq!(roster_hours(&r), Decimal::from(8));
        assert_eq!(estimated_payable(&r, &[profile(None)]), Money::from_int(80));
        assert_eq!(estimated_payable(&r, &[]), Money::ZERO);
    }

    #[test]
    fn test_staffing_is_idempotent() {
        let r = roster(Some(3), None, Some(6));
        let assigned = [profile(Some(20)), profile(Some(30))];
        let a = Staffing::for_roster(&r, &assigned);
        let b = Staffing::for_roster(&r, &assigned);
        assert_eq!(a.ratio.to_bits(), b.ratio.to_bits());
        assert_eq!(a, b);
        assert_eq!(a.unassigned, 1);
        assert!(!a.is_fully_staffed());
        assert_eq!(a.estimated_payable, Money::from_int(300));
    }
}
