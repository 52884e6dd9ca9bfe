use fdiff_core::domain::{Snapshot, Username};
use fdiff_core::error::{CoreError, Result};
use fdiff_core::ports::SnapshotStore;
use rusqlite::{Connection, OptionalExtension};

/// Fixed keys under which the single snapshot lives. Saving overwrites
/// them wholesale; there is never more than one snapshot.
const LIST_KEY: &str = "follower_list";
const DATE_KEY: &str = "captured_at";

/// SQLite implementation of the SnapshotStore trait: one key-value table
/// in a local database file, opened per operation.
pub struct SqliteSnapshotStore {
    db_path: String,
}

impl SqliteSnapshotStore {
    /// Creates a new SqliteSnapshotStore with the given database path
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    fn open(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path).map_err(storage_err)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS snapshot (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .map_err(storage_err)?;
        Ok(conn)
    }

    fn read_key(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row("SELECT value FROM snapshot WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(storage_err)
    }
}

fn storage_err(err: rusqlite::Error) -> CoreError {
    CoreError::Storage(err.to_string())
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        let conn = self.open()?;

        let raw_list = match Self::read_key(&conn, LIST_KEY)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let captured_at = Self::read_key(&conn, DATE_KEY)?.unwrap_or_default();

        let names: Vec<String> = serde_json::from_str(&raw_list)
            .map_err(|err| CoreError::Storage(format!("stored snapshot is corrupt: {}", err)))?;

        // Re-validate on the way in; entries that no longer pass are dropped
        let mut usernames = Vec::with_capacity(names.len());
        for name in &names {
            match Username::parse(name) {
                Some(username) => usernames.push(username),
                None => log::debug!("dropping stored entry that fails validation: {:?}", name),
            }
        }

        Ok(Some(Snapshot {
            usernames,
            captured_at,
        }))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut conn = self.open()?;

        let raw_list = serde_json::to_string(&snapshot.usernames)
            .map_err(|err| CoreError::Storage(err.to_string()))?;

        // Both keys replaced together so a snapshot is never half-written
        let tx = conn.transaction().map_err(storage_err)?;
        tx.execute(
            "INSERT OR REPLACE INTO snapshot (key, value) VALUES (?1, ?2)",
            rusqlite::params![LIST_KEY, raw_list],
        )
        .map_err(storage_err)?;
        tx.execute(
            "INSERT OR REPLACE INTO snapshot (key, value) VALUES (?1, ?2)",
            rusqlite::params![DATE_KEY, snapshot.captured_at],
        )
        .map_err(storage_err)?;
        tx.commit().map_err(storage_err)?;

        Ok(())
    }
}
