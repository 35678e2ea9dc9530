use anyhow::Context;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Names of the persisted session slots.
pub mod slot {
    pub const ARTIST: &str = "artist";
    pub const TRACK: &str = "track";
    pub const SEARCH_ARTISTS: &str = "search_artists";
    pub const SEARCH_TRACKS: &str = "search_tracks";
    pub const SEARCH_LYRICS: &str = "search_lyrics";
}

/// Storage shared between pages and background tasks.
pub type SharedStorage = Arc<Mutex<Storage>>;

/// String-keyed JSON slots carried between runs ("last artist viewed", "last
/// search results"). No schema is promised for the values.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory db")?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS slots (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL,
  updated_at INTEGER NOT NULL
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    pub fn put_raw(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        self.conn
            .execute(
                r#"
INSERT INTO slots(key, value, updated_at)
VALUES(?1, ?2, ?3)
ON CONFLICT(key) DO UPDATE SET
  value=excluded.value,
  updated_at=excluded.updated_at
"#,
                params![key, value, now],
            )
            .with_context(|| format!("write slot {key}"))?;
        Ok(())
    }

    pub fn get_raw(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM slots WHERE key=?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("read slot {key}"))
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let raw = serde_json::to_string(value).with_context(|| format!("serialize slot {key}"))?;
        self.put_raw(key, &raw)
    }

    /// Read a slot, falling back to the default when it is missing,
    /// unreadable or holds something that no longer parses.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get_raw(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::debug!("slot {key} ignored: {e}");
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!("{e:#}");
                T::default()
            }
        }
    }

    pub fn shared(self) -> SharedStorage {
        Arc::new(Mutex::new(self))
    }

    #[allow(dead_code)]
    pub fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key=?1", params![key])
            .with_context(|| format!("delete slot {key}"))?;
        Ok(())
    }
}
