//! Project records

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use super::Entity;
use super::Row;
use super::TableRow;
use super::Value;
use super::status::text_enum;
use super::types::Money;
use crate::error::FieldError;

text_enum! {
    /// Lifecycle of a project.
    pub enum ProjectStatus {
        Active => "active",
        Completed => "completed",
        OnHold => "on-hold",
    }
}

/// A piece of work carried out for a client.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub client_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub budget: Option<Money>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Project {
    fn row_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "description" => self.description.clone().into(),
            "client_id" => self.client_id.into(),
            "start_date" => self.start_date.into(),
            "end_date" => self.end_date.into(),
            "status" => self.status.into(),
            "budget" => self.budget.into(),
            "created_at" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Project {
    const TABLE: &'static str = "projects";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "client_id",
        "start_date",
        "end_date",
        "status",
        "budget",
        "created_at",
    ];

    fn from_row(row: &Row) -> Result<Self, FieldError> {
        Ok(Self {
            id: row.require_uuid("id")?,
            name: row.require_string("name")?,
            description: row.get_text("description")?,
            client_id: row.require_uuid("client_id")?,
            start_date: row.get_date("start_date")?,
            end_date: row.get_date("end_date")?,
            status: row.get_parsed("status")?.unwrap_or(ProjectStatus::Active),
            budget: row.get_money("budget")?,
            created_at: row.get_datetime("created_at")?,
        })
    }
}
