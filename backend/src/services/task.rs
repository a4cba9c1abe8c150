//! Task service

use std::sync::Arc;

use uuid::Uuid;

use shared::board::{plan_move, Board, MovePlan, MoveRequest};
use shared::query::TaskFilter;
use shared::validation::validate_task;
use shared::{StatusToken, Task, TaskInput, TaskPatch, TaskStatus};

use super::patched_input;
use crate::error::AppResult;
use crate::notifier::{report, Notice, Notifier};
use crate::store::{require, Stores};

#[derive(Clone)]
pub struct TaskService {
    stores: Stores,
    notifier: Arc<dyn Notifier>,
}

impl TaskService {
    /// Create a new TaskService instance
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>) -> Self {
        Self { stores, notifier }
    }

    /// Urgent first, then by due date
    pub async fn list(&self, filter: &TaskFilter) -> AppResult<Vec<Task>> {
        let tasks = self.stores.tasks.get_all().await?;
        Ok(filter.apply(&tasks))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Task> {
        require(self.stores.tasks.as_ref(), id).await
    }

    pub async fn create(&self, input: TaskInput) -> AppResult<Task> {
        let result = async {
            validate_task(&input)?;
            self.stores.tasks.create(input).await
        }
        .await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("המשימה נוצרה בהצלחה", "Task created")
        });
        result
    }

    pub async fn update(&self, id: Uuid, patch: TaskPatch) -> AppResult<Task> {
        let result = self.update_inner(id, patch).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("המשימה עודכנה בהצלחה", "Task updated")
        });
        result
    }

    async fn update_inner(&self, id: Uuid, patch: TaskPatch) -> AppResult<Task> {
        let task = self.get(id).await?;
        let preview: TaskInput = patched_input(&task, &patch)?;
        validate_task(&preview)?;
        self.stores.tasks.update(id, patch).await
    }

    pub async fn board(&self, filter: &TaskFilter) -> AppResult<Board<Task>> {
        let tasks = self.list(filter).await?;
        Ok(Board::full(&tasks))
    }

    /// Status checkbox or board drop
    pub async fn move_status(&self, request: MoveRequest<TaskStatus>) -> AppResult<Task> {
        let result = self.move_status_inner(request).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("המשימה עודכנה בהצלחה", "Task updated")
        });
        result
    }

    async fn move_status_inner(&self, request: MoveRequest<TaskStatus>) -> AppResult<Task> {
        let tasks = self.stores.tasks.get_all().await?;
        match plan_move(&tasks, &request)? {
            MovePlan::NoOp => self.get(request.item_id).await,
            MovePlan::Move { from, to } => {
                tracing::info!(
                    task_id = %request.item_id,
                    from = from.as_str(),
                    to = to.as_str(),
                    "Task status changed"
                );
                self.stores
                    .tasks
                    .update(request.item_id, TaskPatch::status(to))
                    .await
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = self.stores.tasks.delete(id).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("המשימה נמחקה בהצלחה", "Task deleted")
        });
        result
    }
}
