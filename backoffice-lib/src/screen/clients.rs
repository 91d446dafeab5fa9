//! Clients screen

use crate::calc::ClientStats;
use crate::calc::project_counts;
use crate::error::ValidationError;
use crate::error::Validator;
use crate::model::Client;
use crate::model::ClientStatus;
use crate::model::Project;
use crate::model::Row;
use crate::table::Cell;
use crate::table::ColumnDescriptor;

use super::controller::FormMode;
use super::controller::Screen;
use super::controller::ScreenController;

/// Client companies and their contacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClientsScreen;

pub type ClientsController = ScreenController<ClientsScreen>;

impl Screen for ClientsScreen {
    type Row = Client;

    fn noun(&self) -> &'static str {
        "Client"
    }

    fn plural(&self) -> &'static str {
        "clients"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["name", "email", "company"]
    }

    fn columns(&self) -> Vec<ColumnDescriptor<Client>> {
        vec![
            ColumnDescriptor::new("company", "Company").sortable().filterable(),
            ColumnDescriptor::new("name", "Contact").sortable().filterable(),
            ColumnDescriptor::new("email", "Email").sortable().filterable(),
            ColumnDescriptor::new("phone", "Phone"),
            ColumnDescriptor::new("status", "Status")
                .sortable()
                .filterable()
                .render(|v, _| Cell::badge(v.to_string())),
            ColumnDescriptor::new("created_at", "Created").sortable(),
            ColumnDescriptor::actions(|_| Cell::text("Edit")),
        ]
    }

    fn validate(&self, form: &Row, _mode: FormMode) -> Result<(), ValidationError> {
        Validator::new()
            .required_fields(form, &["name", "email", "company"])
            .check(
                "status",
                form.get_parsed::<ClientStatus>("status").is_ok(),
                "status must be active or inactive",
            )
            .finish()
    }

    fn prepare(&self, mut form: Row, mode: FormMode) -> Row {
        if mode == FormMode::Create && form.value("status").is_null() {
            form.insert("status", ClientStatus::Active);
        }
        form
    }
}

impl ClientsController {
    /// Counts over the displayed clients, with project counts taken from
    /// `projects`.
    pub async fn stats(&self, projects: &[Project]) -> ClientStats {
        let result = self.result().await;
        ClientStats::compute(result.total(), result.rows(), &project_counts(projects))
    }
}
