//! Todo operations. Each one works inside a caller-provided session and
//! leaves committing to the caller.

use crate::core::{NewTodo, Todo, TodoError};
use crate::storage::Session;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

#[cfg_attr(feature = "tracing", instrument(skip(session)))]
pub async fn list_todos<S: Session>(session: &mut S) -> Result<Vec<Todo>, TodoError> {
    let todos = session.fetch_all().await?;
    #[cfg(feature = "tracing")]
    debug!(count = todos.len(), "Loaded todos");
    Ok(todos)
}

/// Takes an already validated [`NewTodo`], so a bad title is rejected
/// before any session exists.
#[cfg_attr(feature = "tracing", instrument(skip(session)))]
pub async fn create_todo<S: Session>(session: &mut S, new_todo: NewTodo) -> Result<Todo, TodoError> {
    let todo = session.insert(new_todo).await?;
    #[cfg(feature = "tracing")]
    debug!(id = todo.id, "Created todo");
    Ok(todo)
}

#[cfg_attr(feature = "tracing", instrument(skip(session)))]
pub async fn toggle_todo<S: Session>(session: &mut S, id: i64) -> Result<Todo, TodoError> {
    let mut todo = session.fetch_one(id).await?.ok_or(TodoError::NotFound(id))?;
    todo.completed = !todo.completed;
    session.set_completed(id, todo.completed).await?;
    #[cfg(feature = "tracing")]
    debug!(id, completed = todo.completed, "Toggled todo");
    Ok(todo)
}

#[cfg_attr(feature = "tracing", instrument(skip(session)))]
pub async fn delete_todo<S: Session>(session: &mut S, id: i64) -> Result<(), TodoError> {
    session.fetch_one(id).await?.ok_or(TodoError::NotFound(id))?;
    session.remove(id).await?;
    #[cfg(feature = "tracing")]
    debug!(id, "Deleted todo");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryStorage;
    use crate::storage::Storage;

    async fn seed(storage: &InMemoryStorage, title: &str) -> Todo {
        let mut session = storage.open_session().await.unwrap();
        let todo = create_todo(&mut session, NewTodo::new(title).unwrap())
            .await
            .unwrap();
        session.commit().await.unwrap();
        todo
    }

    #[tokio::test]
    async fn create_adds_exactly_one_incomplete_record() {
        let storage = InMemoryStorage::new();
        let todo = seed(&storage, "Buy milk").await;

        assert_eq!(storage.len().await, 1);
        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
    }

    #[tokio::test]
    async fn created_todo_is_listed() {
        let storage = InMemoryStorage::new();
        let created = seed(&storage, "Buy milk").await;

        let mut session = storage.open_session().await.unwrap();
        assert_eq!(list_todos(&mut session).await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn duplicate_titles_are_allowed() {
        let storage = InMemoryStorage::new();
        seed(&storage, "Same").await;
        seed(&storage, "Same").await;
        assert_eq!(storage.len().await, 2);
    }

    #[tokio::test]
    async fn toggle_twice_restores_original_state() {
        let storage = InMemoryStorage::new();
        let id = seed(&storage, "Walk dog").await.id;

        let mut session = storage.open_session().await.unwrap();
        assert!(toggle_todo(&mut session, id).await.unwrap().completed);
        session.commit().await.unwrap();

        let mut session = storage.open_session().await.unwrap();
        assert!(!toggle_todo(&mut session, id).await.unwrap().completed);
        session.commit().await.unwrap();
    }

    #[tokio::test]
    async fn missing_ids_report_not_found_without_mutation() {
        let storage = InMemoryStorage::new();
        seed(&storage, "Keep me").await;

        let mut session = storage.open_session().await.unwrap();
        assert!(matches!(
            toggle_todo(&mut session, 999).await,
            Err(TodoError::NotFound(999))
        ));
        assert!(matches!(
            delete_todo(&mut session, 999).await,
            Err(TodoError::NotFound(999))
        ));
        session.commit().await.unwrap();

        let mut session = storage.open_session().await.unwrap();
        let todos = list_todos(&mut session).await.unwrap();
        assert_eq!(todos.len(), 1);
        assert!(!todos[0].completed);
    }

    #[tokio::test]
    async fn deleted_todo_can_no_longer_be_found() {
        let storage = InMemoryStorage::new();
        let id = seed(&storage, "Temporary").await.id;

        let mut session = storage.open_session().await.unwrap();
        delete_todo(&mut session, id).await.unwrap();
        session.commit().await.unwrap();

        let mut session = storage.open_session().await.unwrap();
        assert!(session.fetch_one(id).await.unwrap().is_none());
        assert!(matches!(
            delete_todo(&mut session, id).await,
            Err(TodoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_is_empty_for_a_fresh_store() {
        let storage = InMemoryStorage::new();
        let mut session = storage.open_session().await.unwrap();
        assert!(list_todos(&mut session).await.unwrap().is_empty());
    }
}
