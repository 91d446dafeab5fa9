//! Projects screen

use crate::calc::ProjectStats;
use crate::error::ValidationError;
use crate::error::Validator;
use crate::model::Project;
use crate::model::ProjectStatus;
use crate::model::Row;
use crate::table::Cell;
use crate::table::ColumnDescriptor;

use super::controller::FormMode;
use super::controller::Screen;
use super::controller::ScreenController;

/// Projects carried out for clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectsScreen;

pub type ProjectsController = ScreenController<ProjectsScreen>;

impl Screen for ProjectsScreen {
    type Row = Project;

    fn noun(&self) -> &'static str {
        "Project"
    }

    fn plural(&self) -> &'static str {
        "projects"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["name", "description"]
    }

    fn columns(&self) -> Vec<ColumnDescriptor<Project>> {
        vec![
            ColumnDescriptor::new("name", "Project").sortable().filterable(),
            ColumnDescriptor::new("description", "Description"),
            ColumnDescriptor::new("status", "Status")
                .sortable()
                .filterable()
                .render(|v, _| Cell::badge(v.to_string())),
            ColumnDescriptor::new("start_date", "Start").sortable(),
            ColumnDescriptor::new("end_date", "End").sortable(),
            ColumnDescriptor::new("budget", "Budget")
                .sortable()
                .render(|_, p: &Project| match p.budget {
                    Some(budget) => Cell::text(format!("${budget}")),
                    None => Cell::Empty,
                })
                .export_with(|_, p: &Project| p.budget.map(|b| b.to_string()).unwrap_or_default()),
            ColumnDescriptor::actions(|_| Cell::text("Edit")),
        ]
    }

    fn validate(&self, form: &Row, _mode: FormMode) -> Result<(), ValidationError> {
        Validator::new()
            .required_fields(form, &["name", "client_id"])
            .check("client_id", form.get_uuid("client_id").is_ok(), "client_id must be a client")
            .non_negative_field(form, "budget")
            .check(
                "status",
                form.get_parsed::<ProjectStatus>("status").is_ok(),
                "status must be active, completed or on-hold",
            )
            .finish()
    }

    fn prepare(&self, mut form: Row, mode: FormMode) -> Row {
        if mode == FormMode::Create && form.value("status").is_null() {
            form.insert("status", ProjectStatus::Active);
        }
        form
    }
}

impl ProjectsController {
    /// Counts and budget over the displayed projects.
    pub async fn stats(&self) -> ProjectStats {
        let result = self.result().await;
        ProjectStats::compute(result.total(), result.rows())
    }
}
