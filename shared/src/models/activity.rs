//! Comments and activity history attached to orders and leads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The record a comment or activity entry belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "subject_type", content = "subject_id", rename_all = "snake_case")]
pub enum Subject {
    Order(Uuid),
    Lead(Uuid),
}

impl Subject {
    pub fn id(&self) -> Uuid {
        match self {
            Subject::Order(id) | Subject::Lead(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub subject: Subject,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentInput {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub body: String,
}

/// Persisted form of a new comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub subject: Subject,
    pub author: String,
    pub body: String,
}

/// Comment edits only touch the text
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CommentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    StatusChange,
    ProductionChange,
    Comment,
    Payment,
    Conversion,
    Created,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityLogEntry {
    pub id: Uuid,
    pub subject: Subject,
    pub kind: ActivityKind,
    pub description: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    pub subject: Subject,
    pub kind: ActivityKind,
    pub description: String,
    pub author: String,
}

/// Activity entries are append-only apart from rewording
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ActivityPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Author recorded when no user name is supplied
pub const SYSTEM_AUTHOR: &str = "system";

impl NewActivity {
    pub fn system(subject: Subject, kind: ActivityKind, description: impl Into<String>) -> Self {
        Self {
            subject,
            kind,
            description: description.into(),
            author: SYSTEM_AUTHOR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_wire_format() {
        let id = Uuid::nil();
        let json = serde_json::to_value(Subject::Order(id)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "subject_type": "order", "subject_id": id })
        );
    }

    #[test]
    fn test_comment_round_trips() {
        let comment = Comment {
            id: Uuid::new_v4(),
            subject: Subject::Lead(Uuid::new_v4()),
            author: "Dana".to_string(),
            body: "Asked for a quote on 300 mugs".to_string(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&comment).unwrap();
        let back: Comment = serde_json::from_value(value).unwrap();
        assert_eq!(back, comment);
    }
}
