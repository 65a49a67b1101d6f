//! Task persistence.

use chrono::{DateTime, Utc};
use finquina_types::{
    CropId, NewTask, ParseEnumError, Task, TaskId, TaskPriority, TaskStatus, non_empty,
};

use crate::crop_store::like_pattern;
use crate::database::Database;
use crate::error::DbError;

/// Column list shared by every task query.
const TASK_COLUMNS: &str =
    "id, title, description, status, due_date, periodicity, category, priority, crop_id";

/// Pending tasks first, then by due date with undated tasks last.
const TASK_ORDER: &str =
    "CASE WHEN status = 'Pending' THEN 0 ELSE 1 END, due_date ASC NULLS LAST, id ASC";

/// Operations on the `tasks` table.
pub struct TaskStore<'a> {
    db: &'a Database,
}

impl<'a> TaskStore<'a> {
    /// Create a store bound to a database handle.
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All tasks, pending first, then by due date.
    pub async fn list(&self) -> Result<Vec<Task>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY {TASK_ORDER}");
        let rows = sqlx::query_as::<_, TaskRow>(&sql).fetch_all(pool).await?;
        collect(rows)
    }

    /// Pending tasks, soonest due first.
    pub async fn pending(&self, limit: i64) -> Result<Vec<Task>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE status = $1 \
             ORDER BY due_date ASC NULLS LAST, id ASC LIMIT $2"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(TaskStatus::Pending.as_str())
            .bind(limit)
            .fetch_all(pool)
            .await?;
        collect(rows)
    }

    /// Pending tasks that are high priority or due by `now`.
    pub async fn urgent(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Task>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE status = $1 AND (priority = $2 OR due_date <= $3) \
             ORDER BY due_date ASC NULLS LAST, id ASC LIMIT $4"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(TaskStatus::Pending.as_str())
            .bind(TaskPriority::High.as_str())
            .bind(now)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        collect(rows)
    }

    /// Pending high-priority tasks.
    pub async fn high_priority_pending(&self, limit: i64) -> Result<Vec<Task>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE status = $1 AND priority = $2 \
             ORDER BY due_date ASC NULLS LAST, id ASC LIMIT $3"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(TaskStatus::Pending.as_str())
            .bind(TaskPriority::High.as_str())
            .bind(limit)
            .fetch_all(pool)
            .await?;
        collect(rows)
    }

    /// Number of tasks in a given state.
    pub async fn count_by_status(&self, status: TaskStatus) -> Result<i64, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(0);
        };
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Number of pending high-priority tasks.
    pub async fn count_high_priority_pending(&self) -> Result<i64, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(0);
        };
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE status = $1 AND priority = $2")
                .bind(TaskStatus::Pending.as_str())
                .bind(TaskPriority::High.as_str())
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Tasks due on or after `since`: `(done, total)`.
    pub async fn completion_since(&self, since: DateTime<Utc>) -> Result<(i64, i64), DbError> {
        let Some(pool) = self.db.online() else {
            return Ok((0, 0));
        };
        let counts: (i64, i64) = sqlx::query_as(
            r"SELECT COUNT(*) FILTER (WHERE status = $2), COUNT(*)
              FROM tasks
              WHERE due_date >= $1",
        )
        .bind(since)
        .bind(TaskStatus::Done.as_str())
        .fetch_one(pool)
        .await?;
        Ok(counts)
    }

    /// Case-insensitive substring search over title and description.
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<Task>, DbError> {
        let Some(pool) = self.db.online() else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE title ILIKE $1 OR description ILIKE $1 \
             ORDER BY {TASK_ORDER} LIMIT $2"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(like_pattern(query))
            .bind(limit)
            .fetch_all(pool)
            .await?;
        collect(rows)
    }

    /// Insert a pending task.
    pub async fn insert(&self, new: &NewTask) -> Result<Task, DbError> {
        let pool = self.db.pool()?;
        let sql = format!(
            "INSERT INTO tasks (title, description, status, due_date, periodicity, category, \
                                priority, crop_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {TASK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(new.title.trim())
            .bind(non_empty(new.description.as_deref()))
            .bind(TaskStatus::Pending.as_str())
            .bind(new.due_date)
            .bind(non_empty(new.periodicity.as_deref()))
            .bind(new.category.as_str())
            .bind(new.priority.as_str())
            .bind(new.crop_id.map(CropId::into_inner))
            .fetch_one(pool)
            .await?;

        tracing::info!(task_id = row.id, title = %row.title, "Task added");
        Ok(Task::try_from(row)?)
    }

    /// Mark a task pending or done.
    pub async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<bool, DbError> {
        let pool = self.db.pool()?;
        let result = sqlx::query("UPDATE tasks SET status = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a task.
    pub async fn delete(&self, id: TaskId) -> Result<bool, DbError> {
        let pool = self.db.pool()?;
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id.into_inner())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn collect(rows: Vec<TaskRow>) -> Result<Vec<Task>, DbError> {
    rows.into_iter()
        .map(Task::try_from)
        .collect::<Result<_, _>>()
        .map_err(DbError::from)
}

/// A row from the `tasks` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    /// Primary key.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Completion state as text.
    pub status: String,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Recurrence hint.
    pub periodicity: Option<String>,
    /// Category as text.
    pub category: String,
    /// Priority as text.
    pub priority: String,
    /// Related crop.
    pub crop_id: Option<i64>,
}

impl TryFrom<TaskRow> for Task {
    type Error = ParseEnumError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TaskId(row.id),
            title: row.title,
            description: row.description,
            status: row.status.parse()?,
            due_date: row.due_date,
            periodicity: row.periodicity,
            category: row.category.parse()?,
            priority: row.priority.parse()?,
            crop_id: row.crop_id.map(CropId),
        })
    }
}

#[cfg(test)]
mod tests {
    use finquina_types::TaskCategory;

    use super::*;

    #[test]
    fn row_parses_enums() {
        let row = TaskRow {
            id: 3,
            title: "Podar".to_owned(),
            description: None,
            status: "Done".to_owned(),
            due_date: None,
            periodicity: None,
            category: "Machinery".to_owned(),
            priority: "High".to_owned(),
            crop_id: Some(9),
        };
        let task = Task::try_from(row);
        assert!(task.as_ref().is_ok_and(|t| t.status == TaskStatus::Done));
        assert!(task.as_ref().is_ok_and(|t| t.category == TaskCategory::Machinery));
        assert!(task.is_ok_and(|t| t.crop_id == Some(CropId(9))));
    }

    #[tokio::test]
    async fn offline_counts_are_zero() {
        let db = Database::offline("test");
        let tasks = db.tasks();
        assert!(tasks.count_by_status(TaskStatus::Pending).await.is_ok_and(|n| n == 0));
        assert!(tasks.completion_since(Utc::now()).await.is_ok_and(|c| c == (0, 0)));
        assert!(tasks.urgent(Utc::now(), 5).await.is_ok_and(|v| v.is_empty()));
    }
}
