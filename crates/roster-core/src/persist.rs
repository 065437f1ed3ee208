// Persistence adapter: mirrors the entity store into durable storage.
//
// The full store snapshot is written as one JSON envelope under a fixed
// namespace key, read once at startup and rewritten after every mutation.
// The chosen theme lives next to it under `<namespace>:theme`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Theme;
use crate::model::StoreState;

/// Namespace the store is persisted under unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "random-roster-storage";

/// Envelope format version written by this build.
pub const STATE_VERSION: u32 = 0;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to (de)serialize stored state: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported state version {found} (this build reads version {expected})")]
    VersionMismatch { expected: u32, found: u32 },
}

pub type Result<T> = std::result::Result<T, PersistError>;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// On-disk wrapper around the store snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: StoreState,
    #[serde(default)]
    version: u32,
}

fn encode(state: &StoreState) -> Result<String> {
    let envelope = Envelope {
        state: state.clone(),
        version: STATE_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Key the theme preference is stored under for a given namespace.
fn theme_key(namespace: &str) -> String {
    format!("{namespace}:theme")
}

fn decode(json: &str) -> Result<StoreState> {
    let envelope: Envelope = serde_json::from_str(json)?;
    if envelope.version != STATE_VERSION {
        return Err(PersistError::VersionMismatch {
            expected: STATE_VERSION,
            found: envelope.version,
        });
    }
    Ok(envelope.state)
}

// ---------------------------------------------------------------------------
// StateStorage trait
// ---------------------------------------------------------------------------

/// Read/write pair the application uses to load and mirror store state.
pub trait StateStorage: Send {
    /// Load the snapshot stored under `namespace`, if any.
    fn read(&self, namespace: &str) -> Result<Option<StoreState>>;

    /// Replace the snapshot stored under `namespace`.
    fn write(&self, namespace: &str, state: &StoreState) -> Result<()>;

    /// Load the theme saved for `namespace`, if any.
    fn read_theme(&self, namespace: &str) -> Result<Option<Theme>>;

    /// Remember the theme for `namespace`.
    fn write_theme(&self, namespace: &str, theme: Theme) -> Result<()>;
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// SQLite-backed key-value storage for store snapshots.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS roster_state (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );
            ",
        )?;

        info!("Opened roster database at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Panics if the mutex is poisoned, which only happens after another
    /// thread panicked mid-query.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT value FROM roster_state WHERE key = ?1")?;
        let mut rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    fn put_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO roster_state (key, value, updated_at)
             VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             ON CONFLICT(key) DO UPDATE SET
                value      = excluded.value,
                updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }

    #[cfg(test)]
    fn last_saved_at(&self, namespace: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT updated_at FROM roster_state WHERE key = ?1")?;
        let mut rows = stmt.query_map(params![namespace], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    #[cfg(test)]
    fn clear(&self, namespace: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM roster_state WHERE key = ?1", params![namespace])?;
        Ok(())
    }
}

impl StateStorage for Database {
    fn read(&self, namespace: &str) -> Result<Option<StoreState>> {
        match self.get_value(namespace)? {
            Some(json) => {
                let state = decode(&json)?;
                debug!(
                    "Loaded {} groups from namespace {}",
                    state.groups.len(),
                    namespace
                );
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    fn write(&self, namespace: &str, state: &StoreState) -> Result<()> {
        let json = encode(state)?;
        self.put_value(namespace, &json)?;
        debug!("Saved {} groups to namespace {}", state.groups.len(), namespace);
        Ok(())
    }

    fn read_theme(&self, namespace: &str) -> Result<Option<Theme>> {
        match self.get_value(&theme_key(namespace))? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn write_theme(&self, namespace: &str, theme: Theme) -> Result<()> {
        self.put_value(&theme_key(namespace), &serde_json::to_string(&theme)?)?;
        debug!("Saved theme {:?} for namespace {}", theme, namespace);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local storage holding encoded values; used by tests.
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().expect("memory storage mutex poisoned")
    }

    /// Store a raw JSON value under `namespace`, bypassing encoding.
    pub fn put_raw(&self, namespace: &str, json: impl Into<String>) {
        self.slots().insert(namespace.to_string(), json.into());
    }
}

impl StateStorage for MemoryStorage {
    fn read(&self, namespace: &str) -> Result<Option<StoreState>> {
        match self.slots().get(namespace) {
            Some(json) => Ok(Some(decode(json)?)),
            None => Ok(None),
        }
    }

    fn write(&self, namespace: &str, state: &StoreState) -> Result<()> {
        let json = encode(state)?;
        self.slots().insert(namespace.to_string(), json);
        Ok(())
    }

    fn read_theme(&self, namespace: &str) -> Result<Option<Theme>> {
        match self.slots().get(&theme_key(namespace)) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn write_theme(&self, namespace: &str, theme: Theme) -> Result<()> {
        let json = serde_json::to_string(&theme)?;
        self.slots().insert(theme_key(namespace), json);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
