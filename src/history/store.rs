//! Per-session history storage
//!
//! `HistoryStore` owns one SQLite connection for the process and hands out
//! session-scoped `SqliteHistory` handles. If a statement fails the store
//! reopens the connection once and retries that statement once.

use crate::message::Message;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS chat_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chat_messages_session ON chat_messages(session_id, id);
";

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to encode message: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("History connection lock poisoned")]
    Poisoned,
}

pub type HistoryResult<T> = Result<T, HistoryError>;

/// Append-only, order-preserving message history for one session
#[async_trait]
pub trait HistorySink: Send + Sync {
    async fn append(&self, messages: &[Message]) -> HistoryResult<()>;

    async fn load_all(&self) -> HistoryResult<Vec<Message>>;
}

#[async_trait]
impl<T: HistorySink + ?Sized> HistorySink for Arc<T> {
    async fn append(&self, messages: &[Message]) -> HistoryResult<()> {
        (**self).append(messages).await
    }

    async fn load_all(&self) -> HistoryResult<Vec<Message>> {
        (**self).load_all().await
    }
}

/// Shared SQLite handle
#[derive(Clone)]
pub struct HistoryStore {
    conn: Arc<Mutex<Connection>>,
    /// `None` for in-memory stores, which cannot be reopened
    path: Option<PathBuf>,
}

impl HistoryStore {
    /// Open or create the history database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> HistoryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Self::connect(&path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    /// In-memory database (tests, ephemeral sessions)
    pub fn open_in_memory() -> HistoryResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    fn connect(path: &Path) -> HistoryResult<Connection> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }

    /// History handle for one session
    pub fn session(&self, session_id: impl Into<String>) -> SqliteHistory {
        SqliteHistory {
            store: self.clone(),
            session_id: session_id.into(),
        }
    }

    fn lock(&self) -> HistoryResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| HistoryError::Poisoned)
    }

    /// Run `op`, reopening the connection and retrying once on failure
    fn with_conn<T>(
        &self,
        mut op: impl FnMut(&mut Connection) -> rusqlite::Result<T>,
    ) -> HistoryResult<T> {
        let mut conn = self.lock()?;
        match op(&mut *conn) {
            Ok(value) => Ok(value),
            Err(first) => {
                let Some(path) = &self.path else {
                    return Err(first.into());
                };
                tracing::warn!(error = %first, path = %path.display(), "History statement failed, reconnecting");
                *conn = Self::connect(path)?;
                Ok(op(&mut *conn)?)
            }
        }
    }

    fn append_rows(&self, session_id: &str, rows: &[String]) -> HistoryResult<()> {
        let now = Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            for row in rows {
                tx.execute(
                    "INSERT INTO chat_messages (session_id, message, created_at) VALUES (?1, ?2, ?3)",
                    params![session_id, row, now],
                )?;
            }
            tx.commit()
        })
    }

    fn load_rows(&self, session_id: &str) -> HistoryResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT message FROM chat_messages WHERE session_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![session_id], |row| row.get::<_, String>(0))?;
            rows.collect()
        })
    }
}

/// Session-scoped view of a `HistoryStore`
#[derive(Clone)]
pub struct SqliteHistory {
    store: HistoryStore,
    session_id: String,
}

impl SqliteHistory {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[async_trait]
impl HistorySink for SqliteHistory {
    async fn append(&self, messages: &[Message]) -> HistoryResult<()> {
        if messages.is_empty() {
            return Ok(());
        }
        let rows = messages
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        self.store.append_rows(&self.session_id, &rows)?;
        tracing::debug!(session_id = %self.session_id, count = rows.len(), "Appended messages");
        Ok(())
    }

    async fn load_all(&self) -> HistoryResult<Vec<Message>> {
        let rows = self.store.load_rows(&self.session_id)?;
        let mut messages = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_str(&row) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    // Unreadable rows are skipped rather than failing the session
                    tracing::warn!(session_id = %self.session_id, error = %e, "Skipping unreadable history row");
                }
            }
        }
        Ok(messages)
    }
}

/// In-process history, mainly for tests and one-off sessions
#[derive(Default)]
pub struct MemoryHistory {
    messages: Mutex<Vec<Message>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages: Mutex::new(messages),
        }
    }

    /// Snapshot of the stored messages
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HistorySink for MemoryHistory {
    async fn append(&self, messages: &[Message]) -> HistoryResult<()> {
        self.messages
            .lock()
            .map_err(|_| HistoryError::Poisoned)?
            .extend_from_slice(messages);
        Ok(())
    }

    async fn load_all(&self) -> HistoryResult<Vec<Message>> {
        Ok(self.messages.lock().map_err(|_| HistoryError::Poisoned)?.clone())
    }
}
