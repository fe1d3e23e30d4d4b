use crate::errors::{GameError, GameResult};
use rusqlite::Connection;
use std::path::Path;

/// The four scalar fields that survive across sessions. Open positions are
/// deliberately not saved; only the player's scalars and the last spot carry
/// over, matching the original game's save format.
///
/// Every field falls back to its default independently, so a save carrying
/// only `cash` still loads with the other three defaulted.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SaveSnapshot {
    #[serde(default = "default_cash")]
    pub cash: f64,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
    #[serde(default = "default_stock_price")]
    pub stock_price: f64,
}

fn default_cash() -> f64 {
    10.0
}

fn default_level() -> u32 {
    1
}

fn default_stock_price() -> f64 {
    100.0
}

impl Default for SaveSnapshot {
    fn default() -> Self {
        Self {
            cash: default_cash(),
            level: default_level(),
            xp: 0,
            stock_price: default_stock_price(),
        }
    }
}

impl SaveSnapshot {
    /// Parse a stored JSON blob. Missing fields default individually; a blob
    /// that does not parse at all collapses to full defaults. Corruption is
    /// recovered here, never surfaced as an error.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!("corrupt save, starting from defaults: {e}");
            Self::default()
        })
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Storage boundary. Pricing and ledger code never call this; the session
/// layer decides when to write.
pub trait SaveStore {
    fn save(&mut self, snapshot: &SaveSnapshot) -> GameResult<()>;
    fn load(&mut self) -> GameResult<Option<SaveSnapshot>>;
    /// Drop the stored save, if any. The give-up path.
    fn clear(&mut self) -> GameResult<()>;
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS save_state (
    id          INTEGER PRIMARY KEY CHECK (id = 1),
    cash        REAL NOT NULL,
    level       INTEGER NOT NULL,
    xp          INTEGER NOT NULL,
    stock_price REAL NOT NULL,
    saved_at    TEXT NOT NULL DEFAULT (datetime('now'))
);
";

/// Single-row SQLite save store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> GameResult<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| GameError::Storage(format!("create dir: {e}")))?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.execute_batch(SCHEMA)?;
        tracing::info!("save store opened at {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> GameResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl SaveStore for SqliteStore {
    fn save(&mut self, snapshot: &SaveSnapshot) -> GameResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO save_state (id, cash, level, xp, stock_price, saved_at)
             VALUES (1, ?1, ?2, ?3, ?4, datetime('now'))",
            rusqlite::params![
                snapshot.cash,
                snapshot.level,
                snapshot.xp,
                snapshot.stock_price
            ],
        )?;
        Ok(())
    }

    fn load(&mut self) -> GameResult<Option<SaveSnapshot>> {
        let mut stmt = self
            .conn
            .prepare("SELECT cash, level, xp, stock_price FROM save_state WHERE id = 1")?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(SaveSnapshot {
                cash: row.get(0)?,
                level: row.get(1)?,
                xp: row.get(2)?,
                stock_price: row.get(3)?,
            })),
            None => Ok(None),
        }
    }

    fn clear(&mut self) -> GameResult<()> {
        self.conn.execute("DELETE FROM save_state", [])?;
        Ok(())
    }
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Option<SaveSnapshot>,
}

impl SaveStore for MemoryStore {
    fn save(&mut self, snapshot: &SaveSnapshot) -> GameResult<()> {
        self.slot = Some(*snapshot);
        Ok(())
    }

    fn load(&mut self) -> GameResult<Option<SaveSnapshot>> {
        Ok(self.slot)
    }

    fn clear(&mut self) -> GameResult<()> {
        self.slot = None;
        Ok(())
    }
}
