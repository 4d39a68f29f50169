use std::collections::BTreeMap;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::Mutex;
use crate::core::{NewTodo, Todo, TodoError};
use super::{Session, Storage};

#[derive(Debug, Clone, Default)]
struct Table {
    rows: BTreeMap<i64, Todo>,
    last_id: i64,
}

/// Process-local storage. Sessions work on a snapshot of the table and
/// publish it on commit, so the last committer wins.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    table: Arc<Mutex<Table>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    type Session = InMemorySession;

    async fn open_session(&self) -> Result<InMemorySession, TodoError> {
        let snapshot = self.table.lock().await.clone();
        Ok(InMemorySession {
            shared: self.table.clone(),
            staged: snapshot,
        })
    }
}

pub struct InMemorySession {
    shared: Arc<Mutex<Table>>,
    staged: Table,
}

#[async_trait]
impl Session for InMemorySession {
    async fn fetch_all(&mut self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.staged.rows.values().cloned().collect())
    }

    async fn fetch_one(&mut self, id: i64) -> Result<Option<Todo>, TodoError> {
        Ok(self.staged.rows.get(&id).cloned())
    }

    async fn insert(&mut self, todo: NewTodo) -> Result<Todo, TodoError> {
        self.staged.last_id += 1;
        let todo = todo.into_todo(self.staged.last_id);
        self.staged.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn set_completed(&mut self, id: i64, completed: bool) -> Result<(), TodoError> {
        let todo = self.staged.rows.get_mut(&id).ok_or(TodoError::NotFound(id))?;
        todo.completed = completed;
        Ok(())
    }

    async fn remove(&mut self, id: i64) -> Result<(), TodoError> {
        self.staged.rows.remove(&id).map(|_| ()).ok_or(TodoError::NotFound(id))
    }

    async fn commit(self) -> Result<(), TodoError> {
        *self.shared.lock().await = self.staged;
        Ok(())
    }
}
