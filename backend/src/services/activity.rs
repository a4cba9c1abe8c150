//! Comments and activity history for orders and leads

use std::sync::Arc;

use shared::validation::validate_comment;
use shared::{
    ActivityKind, ActivityLogEntry, Comment, CommentInput, NewActivity, NewComment, Subject,
    SYSTEM_AUTHOR,
};

use crate::error::AppResult;
use crate::notifier::{report, Notice, Notifier};
use crate::store::Stores;

#[derive(Clone)]
pub struct ActivityService {
    stores: Stores,
    notifier: Arc<dyn Notifier>,
}

impl ActivityService {
    /// Create a new ActivityService instance
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>) -> Self {
        Self { stores, notifier }
    }

    /// Append a system-authored history entry.
    ///
    /// Entries follow a change that is already committed, so a failed write
    /// is logged and the change still stands.
    pub async fn record(
        &self,
        subject: Subject,
        kind: ActivityKind,
        description: impl Into<String>,
    ) {
        self.append(NewActivity::system(subject, kind, description))
            .await;
    }

    async fn append(&self, entry: NewActivity) {
        let kind = entry.kind;
        if let Err(e) = self.stores.activity.create(entry).await {
            tracing::warn!(error = %e, kind = ?kind, "Failed to write activity entry");
        }
    }

    pub async fn add_comment(&self, subject: Subject, input: CommentInput) -> AppResult<Comment> {
        validate_comment(&input)?;

        let author = input
            .author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(SYSTEM_AUTHOR)
            .to_string();
        let result = self
            .stores
            .comments
            .create(NewComment {
                subject,
                author: author.clone(),
                body: input.body.trim().to_string(),
            })
            .await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הערה נוספה בהצלחה", "Comment added")
        });
        let comment = result?;

        self.append(NewActivity {
            subject,
            kind: ActivityKind::Comment,
            description: "נוספה הערה".to_string(),
            author,
        })
        .await;

        Ok(comment)
    }

    /// Comments on one record, newest first
    pub async fn comments(&self, subject: Subject) -> AppResult<Vec<Comment>> {
        let comments = self.stores.comments.get_all().await?;
        Ok(comments.into_iter().filter(|c| c.subject == subject).collect())
    }

    /// History of one record, newest first
    pub async fn history(&self, subject: Subject) -> AppResult<Vec<ActivityLogEntry>> {
        let entries = self.stores.activity.get_all().await?;
        Ok(entries.into_iter().filter(|e| e.subject == subject).collect())
    }
}
