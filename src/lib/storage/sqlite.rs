use async_trait::async_trait;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool, Transaction};
use crate::core::{NewTodo, Todo, TodoError};
use crate::storage::{Session, Storage};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

const CREATE_TODOS: &str = "CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )";

#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Connects to `database_url`, creating the database file and the
    /// `todos` table when they do not exist yet.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, TodoError> {
        if !Sqlite::database_exists(database_url).await? {
            #[cfg(feature = "tracing")]
            info!(url = %database_url, "Creating database");
            Sqlite::create_database(database_url).await?;
        }
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Self::from_pool(pool).await
    }

    /// A private in-memory database, mostly for tests.
    pub async fn new_memory(max_connections: u32) -> Result<Self, TodoError> {
        Self::new("sqlite::memory:", max_connections).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, TodoError> {
        let storage = Self { pool };
        storage.create_schema().await?;
        Ok(storage)
    }

    pub async fn create_schema(&self) -> Result<(), TodoError> {
        sqlx::query(CREATE_TODOS).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    type Session = SqliteSession;

    async fn open_session(&self) -> Result<SqliteSession, TodoError> {
        let tx = self.pool.begin().await?;
        Ok(SqliteSession { tx })
    }
}

/// One transaction on a pooled connection. Dropping it without
/// calling `commit` rolls back and returns the connection to the pool.
pub struct SqliteSession {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl Session for SqliteSession {
    async fn fetch_all(&mut self) -> Result<Vec<Todo>, TodoError> {
        let todos = sqlx::query_as::<_, Todo>(
            "SELECT id, title, completed, created_at FROM todos ORDER BY id ASC",
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(todos)
    }

    async fn fetch_one(&mut self, id: i64) -> Result<Option<Todo>, TodoError> {
        let todo = sqlx::query_as::<_, Todo>(
            "SELECT id, title, completed, created_at FROM todos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(todo)
    }

    async fn insert(&mut self, todo: NewTodo) -> Result<Todo, TodoError> {
        let result = sqlx::query("INSERT INTO todos (title, completed, created_at) VALUES (?, 0, ?)")
            .bind(&todo.title)
            .bind(todo.created_at)
            .execute(&mut *self.tx)
            .await?;
        let id = result.last_insert_rowid();
        #[cfg(feature = "tracing")]
        debug!(id, "Inserted todo");
        Ok(todo.into_todo(id))
    }

    async fn set_completed(&mut self, id: i64, completed: bool) -> Result<(), TodoError> {
        let result = sqlx::query("UPDATE todos SET completed = ? WHERE id = ?")
            .bind(completed)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(id));
        }
        Ok(())
    }

    async fn remove(&mut self, id: i64) -> Result<(), TodoError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(id));
        }
        Ok(())
    }

    async fn commit(self) -> Result<(), TodoError> {
        self.tx.commit().await?;
        Ok(())
    }
}
