//! SQLite-backed store and the caller-held unit of work.
//!
//! Row operations in the feature crates take an explicit [`UnitOfWork`]
//! rather than a bare connection, so multi-statement writes (a session
//! create plus an audit row, say) commit or roll back together. The store
//! never opens a transaction on its own behalf, and nothing is cached in
//! process: every call reaches SQLite.

use std::path::Path;

use rusqlite::{Connection, Transaction};

use tc_domain::error::{Error, Result};
use tc_domain::trace::TraceEvent;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sessions (
    id          TEXT PRIMARY KEY,
    user_id     BLOB NOT NULL,
    tenant_id   BLOB NOT NULL,
    occurred_at TEXT NOT NULL,
    last_event  TEXT NOT NULL,
    expires_at  TEXT NOT NULL,
    status      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_user_status
    ON sessions (user_id, status);

CREATE TABLE IF NOT EXISTS settings (
    key        TEXT NOT NULL,
    value      TEXT NOT NULL,
    value_type TEXT NOT NULL,
    locked     INTEGER NOT NULL,
    created_by TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_settings_key
    ON settings (key);
";

/// Handle to the backing SQLite database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|err| Error::Persistence(err.to_string()))?;
        let store = Self { conn };
        store.bootstrap()?;
        TraceEvent::StoreOpened {
            path: path.as_ref().display().to_string(),
        }
        .emit();
        Ok(store)
    }

    /// In-memory database, primarily for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|err| Error::Persistence(err.to_string()))?;
        let store = Self { conn };
        store.bootstrap()?;
        Ok(store)
    }

    fn bootstrap(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(|err| Error::Persistence(err.to_string()))?;
        tracing::debug!("schema ensured");
        Ok(())
    }

    /// Begin a unit of work on behalf of `actor`.
    ///
    /// The returned scope must be explicitly committed; dropping it rolls
    /// back everything written through it.
    pub fn begin(&mut self, actor: &str) -> Result<UnitOfWork<'_>> {
        let tx = self
            .conn
            .transaction()
            .map_err(|err| Error::Persistence(err.to_string()))?;
        Ok(UnitOfWork {
            tx,
            actor: actor.to_owned(),
        })
    }

    /// Direct read access outside any unit of work.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// A caller-held transactional scope plus the acting principal.
///
/// Writes record `actor` where the schema keeps provenance (settings rows).
pub struct UnitOfWork<'c> {
    tx: Transaction<'c>,
    actor: String,
}

impl<'c> UnitOfWork<'c> {
    pub fn tx(&self) -> &Transaction<'c> {
        &self.tx
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .map_err(|err| Error::Persistence(err.to_string()))
    }

    pub fn rollback(self) -> Result<()> {
        self.tx
            .rollback()
            .map_err(|err| Error::Persistence(err.to_string()))
    }
}
