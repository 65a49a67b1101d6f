//! Task actions.

use chrono::Utc;
use finquina_types::{NewTask, Task, TaskId, TaskStatus};

use crate::error::ActionError;
use crate::farm::{Farm, read_or_default, validate, written};
use crate::revalidate::{HOME, TASKS};

/// Most urgent tasks shown at once.
pub const URGENT_LIMIT: i64 = 5;

impl Farm {
    /// All tasks, pending first, then by due date.
    pub async fn list_tasks(&self) -> Vec<Task> {
        read_or_default("list_tasks", self.db.tasks().list().await)
    }

    /// Pending tasks that are high priority or already due.
    pub async fn urgent_tasks(&self) -> Vec<Task> {
        read_or_default(
            "urgent_tasks",
            self.db.tasks().urgent(Utc::now(), URGENT_LIMIT).await,
        )
    }

    /// Create a pending task.
    pub async fn add_task(&self, new: &NewTask) -> Result<Option<Task>, ActionError> {
        validate(new)?;
        let task = written("add_task", self.db.tasks().insert(new).await);
        if task.is_some() {
            self.revalidate(&[TASKS, HOME]);
        }
        Ok(task)
    }

    /// Mark a task pending or done.
    pub async fn update_task_status(&self, id: TaskId, status: TaskStatus) -> bool {
        let changed = written(
            "update_task_status",
            self.db.tasks().set_status(id, status).await,
        )
        .unwrap_or(false);
        if changed {
            self.revalidate(&[TASKS, HOME]);
        }
        changed
    }

    /// Delete a task.
    pub async fn delete_task(&self, id: TaskId) -> bool {
        let deleted = written("delete_task", self.db.tasks().delete(id).await).unwrap_or(false);
        if deleted {
            self.revalidate(&[TASKS, HOME]);
        }
        deleted
    }
}
