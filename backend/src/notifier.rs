//! User-facing notices raised by the services
//!
//! Every mutating service call reports its outcome through a [`Notifier`].
//! The server logs notices; tests record them for inspection.

use std::sync::Mutex;

use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message_he: String,
    pub message_en: String,
}

impl Notice {
    pub fn success(message_he: impl Into<String>, message_en: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message_he: message_he.into(),
            message_en: message_en.into(),
        }
    }

    pub fn error(message_he: impl Into<String>, message_en: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message_he: message_he.into(),
            message_en: message_en.into(),
        }
    }

    pub fn info(message_he: impl Into<String>, message_en: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message_he: message_he.into(),
            message_en: message_en.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Report a service outcome: the given success notice, or an error notice
/// built from the failure's bilingual message
pub fn report<T>(notifier: &dyn Notifier, result: &AppResult<T>, success: impl FnOnce() -> Notice) {
    match result {
        Ok(_) => notifier.notify(success()),
        Err(err) => {
            let (_, detail) = err.detail();
            notifier.notify(Notice::error(detail.message_he, detail.message_en));
        }
    }
}

/// Notices go to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => {
                tracing::warn!(message_en = %notice.message_en, "{}", notice.message_he)
            }
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::info!(message_en = %notice.message_en, "{}", notice.message_he)
            }
        }
    }
}

/// Keeps every notice in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut guard) => guard.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}
