//! Client records

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::Entity;
use super::Row;
use super::TableRow;
use super::Value;
use super::status::text_enum;
use crate::error::FieldError;

text_enum! {
    /// Whether a client is currently engaged.
    pub enum ClientStatus {
        /// Engaged client.
        Active => "active",
        /// Former or paused client.
        Inactive => "inactive",
    }
}

/// A client company and its contact person.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: Uuid,
    /// Contact name.
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: String,
    pub status: ClientStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Client {
    fn row_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.clone().into(),
            "company" => self.company.as_str().into(),
            "status" => self.status.into(),
            "created_at" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Client {
    const TABLE: &'static str = "clients";
    const FIELDS: &'static [&'static str] =
        &["id", "name", "email", "phone", "company", "status", "created_at"];

    fn from_row(row: &Row) -> Result<Self, FieldError> {
        Ok(Self {
            id: row.require_uuid("id")?,
            name: row.require_string("name")?,
            email: row.get_text("email")?.unwrap_or_default(),
            phone: row.get_text("phone")?,
            company: row.require_string("company")?,
            status: row.get_parsed("status")?.unwrap_or(ClientStatus::Active),
            created_at: row.get_datetime("created_at")?,
        })
    }
}
