pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use crate::core::{NewTodo, Todo, TodoError};

/// Hands out request-scoped sessions.
#[async_trait]
pub trait Storage: Send + Sync {
    type Session: Session;

    async fn open_session(&self) -> Result<Self::Session, TodoError>;
}

/// A unit of work against the todo table.
///
/// Nothing written through a session is visible to other sessions until
/// [`Session::commit`] succeeds. Dropping a session without committing
/// discards its writes.
#[async_trait]
pub trait Session: Send {
    /// All todos, ascending by id.
    async fn fetch_all(&mut self) -> Result<Vec<Todo>, TodoError>;
    async fn fetch_one(&mut self, id: i64) -> Result<Option<Todo>, TodoError>;
    async fn insert(&mut self, todo: NewTodo) -> Result<Todo, TodoError>;
    async fn set_completed(&mut self, id: i64, completed: bool) -> Result<(), TodoError>;
    async fn remove(&mut self, id: i64) -> Result<(), TodoError>;
    async fn commit(self) -> Result<(), TodoError>;
}
