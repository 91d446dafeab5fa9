//! Derived notifications
//!
//! Notifications are not persisted. They are rebuilt from pending working
//! hours and rosters by [`NotificationCenter`](crate::screen::NotificationCenter).

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::TableRow;
use super::Value;
use super::status::text_enum;

text_enum! {
    /// What a notification is about.
    pub enum NotificationKind {
        WorkingHoursPending => "working_hours_pending",
        RosterPending => "roster_pending",
        PayrollDue => "payroll_due",
        System => "system",
    }
}

text_enum! {
    /// Urgency of a notification. Ordered from least to most urgent.
    pub enum Priority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Priority {
    /// Sort weight, higher is more urgent.
    pub fn weight(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.weight().cmp(&other.weight())
    }
}

/// One entry in the notification list.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Stable key such as `wh-<uuid>` or `roster-<uuid>`.
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub priority: Priority,
    /// Row the notification refers to, if any.
    pub source_id: Option<Uuid>,
}

impl Notification {
    /// Creates an unread notification.
    pub fn new(
        id: impl Into<String>,
        kind: NotificationKind,
        priority: Priority,
        title: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            message: message.into(),
            created_at,
            read: false,
            priority,
            source_id: None,
        }
    }

    /// Sets the row this notification refers to.
    pub fn with_source(mut self, id: Uuid) -> Self {
        self.source_id = Some(id);
        self
    }
}

impl TableRow for Notification {
    fn row_id(&self) -> Option<Uuid> {
        self.source_id
    }

    fn field(&self, key: &str) -> Value {
        match key {
            "id" => self.id.as_str().into(),
            "type" => self.kind.into(),
            "title" => self.title.as_str().into(),
            "message" => self.message.as_str().into(),
            "created_at" => self.created_at.into(),
            "read" => self.read.into(),
            "priority" => self.priority.into(),
            _ => Value::Null,
        }
    }
}
