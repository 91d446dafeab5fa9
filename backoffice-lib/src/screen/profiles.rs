//! Staff profiles screen

use crate::error::ValidationError;
use crate::error::Validator;
use crate::model::Profile;
use crate::model::Row;
use crate::table::Cell;
use crate::table::ColumnDescriptor;

use super::controller::FormMode;
use super::controller::Screen;
use super::controller::ScreenController;

/// Staff who can be rostered and paid.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfilesScreen;

pub type ProfilesController = ScreenController<ProfilesScreen>;

impl Screen for ProfilesScreen {
    type Row = Profile;

    fn noun(&self) -> &'static str {
        "Profile"
    }

    fn plural(&self) -> &'static str {
        "profiles"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["full_name", "email", "role"]
    }

    fn columns(&self) -> Vec<ColumnDescriptor<Profile>> {
        vec![
            ColumnDescriptor::new("full_name", "Name").sortable().filterable(),
            ColumnDescriptor::new("email", "Email").sortable().filterable(),
            ColumnDescriptor::new("phone", "Phone"),
            ColumnDescriptor::new("role", "Role").sortable().filterable(),
            ColumnDescriptor::new("hourly_rate", "Rate")
                .sortable()
                .render(|_, p: &Profile| match p.hourly_rate {
                    Some(rate) => Cell::text(format!("${rate}/hr")),
                    None => Cell::Empty,
                }),
            ColumnDescriptor::new("is_active", "Active").render(|_, p: &Profile| {
                Cell::badge(if p.is_active { "active" } else { "inactive" })
            }),
            ColumnDescriptor::actions(|_| Cell::text("Edit")),
        ]
    }

    fn validate(&self, form: &Row, _mode: FormMode) -> Result<(), ValidationError> {
        Validator::new()
            .required_fields(form, &["full_name", "email"])
            .non_negative_field(form, "hourly_rate")
            .finish()
    }

    fn prepare(&self, mut form: Row, mode: FormMode) -> Row {
        if mode == FormMode::Create && form.value("is_active").is_null() {
            form.insert("is_active", true);
        }
        form
    }
}
