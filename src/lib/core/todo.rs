use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::error::TodoError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A todo that passed validation but has no id yet.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl NewTodo {
    /// Rejects an empty title. The text is kept exactly as given.
    pub fn new(title: &str) -> Result<Self, TodoError> {
        if title.is_empty() {
            return Err(TodoError::Validation("title must not be empty".into()));
        }
        Ok(Self {
            title: title.to_string(),
            created_at: Utc::now(),
        })
    }

    pub fn into_todo(self, id: i64) -> Todo {
        Todo {
            id,
            title: self.title,
            completed: false,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_title() {
        assert!(matches!(NewTodo::new(""), Err(TodoError::Validation(_))));
    }

    #[test]
    fn keeps_title_exactly_as_submitted() {
        for title in ["  Buy milk  ", "\tindented", "   "] {
            assert_eq!(NewTodo::new(title).unwrap().title, title);
        }
    }

    #[test]
    fn new_records_start_incomplete() {
        let before = Utc::now();
        let todo = NewTodo::new("Write tests").unwrap().into_todo(3);
        assert_eq!(todo.id, 3);
        assert!(!todo.completed);
        assert!(todo.created_at >= before);
    }
}
