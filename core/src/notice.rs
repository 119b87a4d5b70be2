//! User-facing notifications.
//!
//! The controllers never present anything themselves. Each user-visible
//! outcome becomes one `Notice` handed to a `Notifier`, which the host maps
//! onto whatever it uses for alerts or toasts.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: "Success".to_string(),
            message: message.to_string(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            message: message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

pub const LOAD_FAILED: &str = "Could not load data. Check the server URL.";
pub const DELETE_SUCCEEDED: &str = "Medication deleted.";
pub const DELETE_FAILED: &str = "Could not delete the medication.";
pub const FIELDS_REQUIRED: &str = "All fields are required.";
pub const CREATE_SUCCEEDED: &str = "Medication created!";
pub const UPDATE_SUCCEEDED: &str = "Medication updated!";
pub const SAVE_FAILED: &str = "Could not save. Check the server URL and connection.";

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the `tracing` log. Useful for headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(title = %notice.title, "{}", notice.message),
            NoticeLevel::Error => tracing::warn!(title = %notice.title, "{}", notice.message),
        }
    }
}
