//! Rosters screen

use chrono::NaiveTime;
use log::debug;
use uuid::Uuid;

use crate::calc::Staffing;
use crate::calc::shift_hours;
use crate::error::Result;
use crate::error::ValidationError;
use crate::error::Validator;
use crate::model::Profile;
use crate::model::Roster;
use crate::model::RosterAssignment;
use crate::model::RosterStatus;
use crate::model::Row;
use crate::query::OrderBy;
use crate::table::Cell;
use crate::table::ColumnDescriptor;

use super::controller::FormMode;
use super::controller::Screen;
use super::controller::ScreenController;
use super::notify::Toast;

/// Scheduled shifts.
///
/// Status is never taken from an edit form; it only moves through
/// [`RostersController::set_status`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RostersScreen;

pub type RostersController = ScreenController<RostersScreen>;

impl Screen for RostersScreen {
    type Row = Roster;

    fn noun(&self) -> &'static str {
        "Roster"
    }

    fn plural(&self) -> &'static str {
        "rosters"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["name", "notes"]
    }

    fn default_order(&self) -> Option<OrderBy> {
        Some(OrderBy::desc("date"))
    }

    fn columns(&self) -> Vec<ColumnDescriptor<Roster>> {
        vec![
            ColumnDescriptor::new("name", "Roster").sortable().filterable(),
            ColumnDescriptor::new("date", "Date").sortable(),
            ColumnDescriptor::new("start_time", "Start"),
            ColumnDescriptor::new("end_time", "End"),
            ColumnDescriptor::new("total_hours", "Hours").sortable(),
            ColumnDescriptor::new("expected_profiles", "Staff"),
            ColumnDescriptor::new("status", "Status")
                .sortable()
                .filterable()
                .render(|v, _| Cell::badge(v.to_string())),
            ColumnDescriptor::actions(|r: &Roster| match r.status {
                RosterStatus::Pending => Cell::text("Confirm"),
                RosterStatus::Confirmed => Cell::text("Unconfirm"),
                RosterStatus::Cancelled => Cell::Empty,
            }),
        ]
    }

    fn validate(&self, form: &Row, _mode: FormMode) -> std::result::Result<(), ValidationError> {
        Validator::new()
            .required_fields(form, &["date", "start_time", "end_time"])
            .check("date", form.get_date("date").is_ok(), "date must be a date")
            .check("start_time", form.get_time("start_time").is_ok(), "start_time must be a time")
            .check("end_time", form.get_time("end_time").is_ok(), "end_time must be a time")
            .non_negative_field(form, "expected_profiles")
            .non_negative_field(form, "per_hour_rate")
            .finish()
    }

    fn prepare(&self, mut form: Row, mode: FormMode) -> Row {
        match mode {
            FormMode::Create => {
                form.insert("status", RosterStatus::Pending);
                let expected = form.get_i64("expected_profiles").ok().flatten().unwrap_or(0);
                if expected < 1 {
                    form.insert("expected_profiles", 1);
                }
            }
            FormMode::Update => {
                if form.remove("status").is_some() {
                    debug!("Ignoring status in roster edit form");
                }
            }
        }
        let time = |field: &str| -> Option<NaiveTime> { form.get_time(field).ok().flatten() };
        let (start, end) = (time("start_time"), time("end_time"));
        if start.is_some() || end.is_some() {
            form.insert("total_hours", shift_hours(start, end));
        }
        form
    }
}

impl RostersController {
    /// Moves a roster through the status machine.
    ///
    /// The current status is read from the store. A rejected transition
    /// raises an error toast and sends no update.
    pub async fn set_status(&self, id: Uuid, target: RosterStatus) -> Result<Roster> {
        let roster = self.load(id).await?;
        let next = roster.status.transition_to(target).inspect_err(|e| {
            self.notify(Toast::error(e.to_string()));
        })?;
        self.patch(id, Row::new().set("status", next)).await
    }

    /// Confirms a pending roster or un-confirms a confirmed one.
    pub async fn toggle_confirmation(&self, id: Uuid) -> Result<Roster> {
        let roster = self.load(id).await?;
        let next = roster.status.toggle_confirmation().inspect_err(|e| {
            self.notify(Toast::error(e.to_string()));
        })?;
        self.patch(id, Row::new().set("status", next)).await
    }

    /// Staffing of one roster from its assignments.
    pub async fn staffing(
        &self,
        id: Uuid,
        assignments: &[RosterAssignment],
        profiles: &[Profile],
    ) -> Result<Staffing> {
        let roster = self.get(id).await?;
        let assigned: Vec<Profile> = assignments
            .iter()
            .filter(|a| a.roster_id == id)
            .filter_map(|a| profiles.iter().find(|p| p.id == a.profile_id))
            .cloned()
            .collect();
        Ok(Staffing::for_roster(&roster, &assigned))
    }
}
