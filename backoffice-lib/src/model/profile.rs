//! Staff profiles

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::Entity;
use super::Row;
use super::TableRow;
use super::Value;
use super::types::Money;
use crate::error::FieldError;

/// A member of staff who can be rostered and paid.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub hourly_rate: Option<Money>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for Profile {
    fn row_id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.into(),
            "full_name" => self.full_name.as_str().into(),
            "email" => self.email.as_str().into(),
            "phone" => self.phone.clone().into(),
            "role" => self.role.clone().into(),
            "hourly_rate" => self.hourly_rate.into(),
            "is_active" => self.is_active.into(),
            "created_at" => self.created_at.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Profile {
    const TABLE: &'static str = "profiles";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "full_name",
        "email",
        "phone",
        "role",
        "hourly_rate",
        "is_active",
        "created_at",
    ];

    fn from_row(row: &Row) -> Result<Self, FieldError> {
        Ok(Self {
            id: row.require_uuid("id")?,
            full_name: row.require_string("full_name")?,
            email: row.get_text("email")?.unwrap_or_default(),
            phone: row.get_text("phone")?,
            role: row.get_text("role")?,
            hourly_rate: row.get_money("hourly_rate")?,
            is_active: row.get_bool("is_active")?.unwrap_or(true),
            created_at: row.get_datetime("created_at")?,
        })
    }
}
