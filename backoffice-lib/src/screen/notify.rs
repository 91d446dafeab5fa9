//! Non-blocking user notifications

use std::sync::Mutex;
use std::sync::PoisonError;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A short-lived message for the user.
///
/// # Example
///
/// ```
/// use backoffice_lib::screen::{Toast, ToastLevel};
///
/// let toast = Toast::error("Failed to fetch clients");
/// assert_eq!(toast.level, ToastLevel::Error);
/// assert_eq!(toast.title, "Error");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub description: String,
}

impl Toast {
    fn new(level: ToastLevel, title: &str, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            description: description.into(),
        }
    }

    /// Create an info toast.
    pub fn info(description: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, "Info", description)
    }

    /// Create a success toast.
    pub fn success(description: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, "Success", description)
    }

    /// Create a warning toast.
    pub fn warning(description: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, "Warning", description)
    }

    /// Create an error toast.
    pub fn error(description: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, "Error", description)
    }

    /// Replaces the default title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Receives toasts raised by screen controllers.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Forwards toasts to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Error => log::error!("{}: {}", toast.title, toast.description),
            ToastLevel::Warning => log::warn!("{}: {}", toast.title, toast.description),
            ToastLevel::Info | ToastLevel::Success => {
                log::info!("{}: {}", toast.title, toast.description)
            }
        }
    }
}

/// Keeps every toast in memory, oldest first.
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every toast so far.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Removes and returns every toast so far.
    pub fn take(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of toasts at the given level.
    pub fn count(&self, level: ToastLevel) -> usize {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|t| t.level == level)
            .count()
    }
}

impl Notifier for ToastLog {
    fn notify(&self, toast: Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);
    }
}
