//! Kanban boards: partitioning records into status columns and moving cards
//!
//! A move is two-phase. [`plan_move`] checks the drop against the status flow
//! without touching anything; the caller persists the change and only then
//! folds the confirmed record back in with [`commit_move`].

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    ImportOrder, ImportStatus, Lead, LeadStatus, LocalProductionStatus, Order, OrderStatus,
    ProductionStage, ProductionType, Task, TaskStatus,
};
use crate::status::{StatusFlow, StatusToken};

/// A record that can sit on a board column
pub trait BoardItem: Clone {
    type Status: StatusFlow + Hash + fmt::Debug;

    fn item_id(&self) -> Uuid;

    /// Column the record belongs to; `None` keeps it off the board
    fn column(&self) -> Option<Self::Status>;

    fn set_column(&mut self, to: Self::Status);
}

#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "T: Serialize, T::Status: Serialize"))]
pub struct Column<T: BoardItem> {
    pub status: T::Status,
    pub label_he: &'static str,
    pub label_en: &'static str,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "T: Serialize, T::Status: Serialize"))]
pub struct Board<T: BoardItem> {
    pub columns: Vec<Column<T>>,
}

impl<T: BoardItem> Board<T> {
    /// Group `items` under `columns`, keeping source order within each column.
    /// Every column is present even when empty; items whose status is not a
    /// column are left off.
    pub fn partition(items: &[T], columns: &[T::Status]) -> Self {
        let mut seen = Vec::with_capacity(columns.len());
        let columns = columns
            .iter()
            .filter(|s| {
                if seen.contains(*s) {
                    false
                } else {
                    seen.push(**s);
                    true
                }
            })
            .map(|status| Column {
                status: *status,
                label_he: status.label_he(),
                label_en: status.label_en(),
                items: items
                    .iter()
                    .filter(|item| item.column() == Some(*status))
                    .cloned()
                    .collect(),
            })
            .collect();
        Self { columns }
    }

    /// Board with one column per status value, in display order
    pub fn full(items: &[T]) -> Self {
        Self::partition(items, &T::Status::all())
    }

    pub fn column(&self, status: T::Status) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.status == status)
    }

    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }
}

/// A card dropped on a column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveRequest<S> {
    pub item_id: Uuid,
    pub to: S,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePlan<S> {
    /// Dropped back on its own column
    NoOp,
    Move { from: S, to: S },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("item {0} is not on this board")]
    UnknownItem(Uuid),
    #[error("item {0} has no column on this board")]
    NotOnBoard(Uuid),
    #[error("cannot move from {from} to {to}")]
    Forbidden {
        from: &'static str,
        to: &'static str,
    },
}

pub fn plan_move<T: BoardItem>(
    items: &[T],
    request: &MoveRequest<T::Status>,
) -> Result<MovePlan<T::Status>, MoveError> {
    let item = items
        .iter()
        .find(|i| i.item_id() == request.item_id)
        .ok_or(MoveError::UnknownItem(request.item_id))?;
    let from = item
        .column()
        .ok_or(MoveError::NotOnBoard(request.item_id))?;
    if from == request.to {
        return Ok(MovePlan::NoOp);
    }
    if !from.can_transition_to(request.to) {
        return Err(MoveError::Forbidden {
            from: from.as_str(),
            to: request.to.as_str(),
        });
    }
    Ok(MovePlan::Move {
        from,
        to: request.to,
    })
}

/// Fold the outcome of persisting a move into the local collection.
/// On failure nothing changes and the error is handed back.
pub fn commit_move<T: BoardItem, E>(
    items: &mut [T],
    item_id: Uuid,
    confirmed: Result<T, E>,
) -> Result<(), E> {
    let record = confirmed?;
    if let Some(slot) = items.iter_mut().find(|i| i.item_id() == item_id) {
        *slot = record;
    }
    Ok(())
}

impl BoardItem for Order {
    type Status = OrderStatus;

    fn item_id(&self) -> Uuid {
        self.id
    }

    fn column(&self) -> Option<OrderStatus> {
        Some(self.status)
    }

    fn set_column(&mut self, to: OrderStatus) {
        self.status = to;
    }
}

/// An order as it appears on the local production floor board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalBoardOrder(pub Order);

impl LocalBoardOrder {
    /// Only locally produced orders go on the production floor board
    pub fn from_orders(orders: impl IntoIterator<Item = Order>) -> Vec<Self> {
        orders
            .into_iter()
            .filter(|o| o.production_type == ProductionType::Local)
            .map(LocalBoardOrder)
            .collect()
    }
}

impl BoardItem for LocalBoardOrder {
    type Status = LocalProductionStatus;

    fn item_id(&self) -> Uuid {
        self.0.id
    }

    fn column(&self) -> Option<LocalProductionStatus> {
        self.0.production_stage.local()
    }

    fn set_column(&mut self, to: LocalProductionStatus) {
        if self.0.production_type == ProductionType::Local {
            self.0.production_stage = ProductionStage::Local(to);
        }
    }
}

impl BoardItem for ImportOrder {
    type Status = ImportStatus;

    fn item_id(&self) -> Uuid {
        self.id
    }

    fn column(&self) -> Option<ImportStatus> {
        Some(self.status)
    }

    fn set_column(&mut self, to: ImportStatus) {
        self.status = to;
    }
}

impl BoardItem for Lead {
    type Status = LeadStatus;

    fn item_id(&self) -> Uuid {
        self.id
    }

    fn column(&self) -> Option<LeadStatus> {
        Some(self.status)
    }

    fn set_column(&mut self, to: LeadStatus) {
        self.status = to;
    }
}

impl BoardItem for Task {
    type Status = TaskStatus;

    fn item_id(&self) -> Uuid {
        self.id
    }

    fn column(&self) -> Option<TaskStatus> {
        Some(self.status)
    }

    fn set_column(&mut self, to: TaskStatus) {
        self.status = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn task(title: &str, status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            status,
            priority: Default::default(),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            related_order: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_partition_keeps_every_column_and_source_order() {
        let tasks = vec![
            task("a", TaskStatus::Completed),
            task("b", TaskStatus::Todo),
            task("c", TaskStatus::Completed),
        ];
        let board = Board::full(&tasks);
        assert_eq!(board.columns.len(), 3);
        assert!(board.column(TaskStatus::InProgress).unwrap().items.is_empty());
        let done: Vec<_> = board
            .column(TaskStatus::Completed)
            .unwrap()
            .items
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(done, vec!["a", "c"]);
        assert_eq!(board.item_count(), 3);
    }

    #[test]
    fn test_partition_drops_items_outside_columns() {
        let tasks = vec![task("a", TaskStatus::Todo), task("b", TaskStatus::Completed)];
        let board = Board::partition(&tasks, &[TaskStatus::Todo, TaskStatus::Todo]);
        assert_eq!(board.columns.len(), 1);
        assert_eq!(board.item_count(), 1);
    }

    #[test]
    fn test_plan_move() {
        let tasks = vec![task("a", TaskStatus::Todo)];
        let id = tasks[0].id;
        assert_eq!(
            plan_move(&tasks, &MoveRequest { item_id: id, to: TaskStatus::Todo }),
            Ok(MovePlan::NoOp)
        );
        assert_eq!(
            plan_move(&tasks, &MoveRequest { item_id: id, to: TaskStatus::Completed }),
            Ok(MovePlan::Move {
                from: TaskStatus::Todo,
                to: TaskStatus::Completed
            })
        );
        let stranger = Uuid::new_v4();
        assert_eq!(
            plan_move(&tasks, &MoveRequest { item_id: stranger, to: TaskStatus::Completed }),
            Err(MoveError::UnknownItem(stranger))
        );
    }

    #[test]
    fn test_commit_move_only_on_success() {
        let mut tasks = vec![task("a", TaskStatus::Todo)];
        let id = tasks[0].id;

        let failed: Result<Task, &str> = Err("network down");
        assert_eq!(commit_move(&mut tasks, id, failed), Err("network down"));
        assert_eq!(tasks[0].status, TaskStatus::Todo);

        let mut saved = tasks[0].clone();
        saved.set_column(TaskStatus::InProgress);
        let ok: Result<Task, &str> = Ok(saved);
        assert_eq!(commit_move(&mut tasks, id, ok), Ok(()));
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;

    fn task_status() -> impl Strategy<Value = TaskStatus> {
        prop::sample::select(TaskStatus::all())
    }

    fn tasks(statuses: &[TaskStatus]) -> Vec<Task> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| Task {
                id: Uuid::new_v4(),
                title: format!("task {}", i),
                status: *status,
                priority: Default::default(),
                due_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                related_order: None,
                created_at: Utc::now(),
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every card lands in exactly one column, the one matching its status
        #[test]
        fn prop_full_board_places_each_item_once(
            statuses in prop::collection::vec(task_status(), 0..30)
        ) {
            let items = tasks(&statuses);
            let board = Board::full(&items);

            prop_assert_eq!(board.columns.len(), TaskStatus::all().len());
            prop_assert_eq!(board.item_count(), items.len());
            for item in &items {
                let holding: Vec<_> = board
                    .columns
                    .iter()
                    .filter(|c| c.items.iter().any(|i| i.id == item.id))
                    .collect();
                prop_assert_eq!(holding.len(), 1);
                prop_assert_eq!(holding[0].status, item.status);
            }
        }

        /// A committed move leaves the card in the target column only
        #[test]
        fn prop_committed_move_changes_one_column(
            statuses in prop::collection::vec(task_status(), 1..20),
            to in task_status(),
        ) {
            let mut items = tasks(&statuses);
            let id = items[0].id;
            let plan = plan_move(&items, &MoveRequest { item_id: id, to });
            prop_assert!(plan.is_ok());

            let mut saved = items[0].clone();
            saved.set_column(to);
            prop_assert!(commit_move::<_, ()>(&mut items, id, Ok(saved)).is_ok());

            let board = Board::full(&items);
            prop_assert_eq!(board.item_count(), statuses.len());
            let target = board.column(to).unwrap();
            prop_assert!(target.items.iter().any(|i| i.id == id));
        }
    }
}
