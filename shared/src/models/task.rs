//! Task models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::{any_other, StatusEntry, StatusFlow, StatusToken};

/// A to-do item, optionally linked to an order by its number
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    /// Free-text order reference, not a foreign key
    #[serde(default)]
    pub related_order: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl StatusToken for TaskStatus {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::Todo, token: "todo", label_he: "לביצוע", label_en: "To do" },
        StatusEntry { value: Self::InProgress, token: "in_progress", label_he: "בתהליך", label_en: "In progress" },
        StatusEntry { value: Self::Completed, token: "completed", label_he: "הושלם", label_en: "Completed" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

impl StatusFlow for TaskStatus {
    fn allowed_next(&self) -> Vec<Self> {
        any_other(*self)
    }
}

/// Declared from most to least pressing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl StatusToken for TaskPriority {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::Urgent, token: "urgent", label_he: "דחוף", label_en: "Urgent" },
        StatusEntry { value: Self::High, token: "high", label_he: "גבוהה", label_en: "High" },
        StatusEntry { value: Self::Medium, token: "medium", label_he: "בינונית", label_en: "Medium" },
        StatusEntry { value: Self::Low, token: "low", label_he: "נמוכה", label_en: "Low" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

impl TaskPriority {
    /// 0 for urgent up to 3 for low
    pub fn rank(&self) -> usize {
        self.index()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_order: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_order: Option<String>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::assert_table_consistent;

    #[test]
    fn test_task_tables() {
        assert_table_consistent::<TaskStatus>();
        assert_table_consistent::<TaskPriority>();
    }

    #[test]
    fn test_priority_rank() {
        assert!(TaskPriority::Urgent.rank() < TaskPriority::High.rank());
        assert!(TaskPriority::Medium.rank() < TaskPriority::Low.rank());
    }
}
