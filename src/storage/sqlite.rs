//! SQLite database layer
//!
//! Some hints to the underlying database:
//!
//! - We rely on the system default page and cache sizes; large payloads
//!   (attachments) are stored in external files by the collaborators, so
//!   caching matters less here.
//!
//! - Created records are found through [`DatabaseGuard::last_insert_rowid`];
//!   for this to work the primary id of every table is declared
//!   `INTEGER PRIMARY KEY`.
//!
//! - The engine is opened in fully serialized mode, but that only makes
//!   single statements atomic. Multi-step sequences (migrations, config
//!   read-modify-write, transaction spans) additionally hold the
//!   connection lock, see [`Database::lock`].

use std::fmt;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, MutexGuard};
use rusqlite::{CachedStatement, Connection, OpenFlags, OptionalExtension, Params, params};
use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::storage::hooks::{LockObserver, NoopLockObserver, PeerstateUpdater};
use crate::storage::migrations;
use crate::storage::stmt::Stmt;

/// How long a writer waits for a competing writer before surfacing
/// [`StoreError::Busy`].
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Open mode for [`Database::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only; the store is neither created nor migrated.
    ReadOnly,
    /// Read-write; a missing store is created and an existing one is
    /// migrated to the current schema version.
    ReadWrite,
}

struct Inner {
    /// `None` while the handle is closed.
    conn: Option<Connection>,
    transaction_depth: u32,
}

/// Handle to one opened store.
///
/// Exactly one `Database` exists per store. The handle is constructed
/// closed, opened with [`Database::open`] and shared freely between
/// threads; all connection state lives behind one mutex.
pub struct Database {
    inner: Mutex<Inner>,
    lock_observer: Arc<dyn LockObserver>,
    peerstate_updater: Option<Arc<dyn PeerstateUpdater>>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = self.inner.try_lock().map(|inner| inner.conn.is_some());
        f.debug_struct("Database")
            .field("open", &open)
            .finish_non_exhaustive()
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates a closed handle with no instrumentation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hooks(Arc::new(NoopLockObserver), None)
    }

    /// Creates a closed handle with a lock observer and the peer-trust
    /// recompute capability used by the migration engine.
    #[must_use]
    pub fn with_hooks(
        lock_observer: Arc<dyn LockObserver>,
        peerstate_updater: Option<Arc<dyn PeerstateUpdater>>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                conn: None,
                transaction_depth: 0,
            }),
            lock_observer,
            peerstate_updater,
        }
    }

    /// Acquires the connection lock.
    ///
    /// Hold the returned guard around any multi-step interaction with the
    /// connection. Do not hold it across unrelated blocking work.
    #[track_caller]
    pub fn lock(&self) -> DatabaseGuard<'_> {
        let site = Location::caller();
        let started = Instant::now();
        let inner = self.inner.lock();
        self.lock_observer.locked(site, started.elapsed());
        DatabaseGuard { inner }
    }

    /// Opens the store at `path`.
    ///
    /// In read-write mode a fresh store gets the full baseline schema and
    /// the reserved placeholder rows, and an existing store is migrated
    /// to [`migrations::SCHEMA_VERSION`]. On failure the handle stays
    /// closed.
    pub fn open(&self, path: impl AsRef<Path>, mode: OpenMode) -> Result<()> {
        let path = path.as_ref();
        let mut guard = self.lock();
        if guard.inner.conn.is_some() {
            warn!("Cannot open, database \"{}\" already opened", path.display());
            return Err(StoreError::AlreadyOpen(path.to_path_buf()));
        }

        let conn = open_connection(path, mode)?;

        if mode == OpenMode::ReadWrite {
            if let Err(err) = migrations::ensure_schema(&conn, self.peerstate_updater.as_deref())
            {
                warn!("Opening \"{}\" failed: {err}", path.display());
                return Err(err);
            }
        }

        info!("Opened \"{}\"", path.display());
        guard.inner.conn = Some(conn);
        guard.inner.transaction_depth = 0;
        Ok(())
    }

    /// Finalizes all cached statements and closes the physical handle.
    ///
    /// Safe to call on a handle that is already closed.
    pub fn close(&self) {
        let mut guard = self.lock();
        guard.inner.transaction_depth = 0;
        if let Some(conn) = guard.inner.conn.take() {
            conn.flush_prepared_statement_cache();
            if let Err((_conn, err)) = conn.close() {
                warn!("Closing database failed: {err}");
            }
        }
        // Logged even when no real closing took place, to expose
        // unbalanced open/close sequences.
        info!("Database closed");
    }

    /// Whether the handle currently owns an open connection.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().is_open()
    }

    /// Locking convenience for [`DatabaseGuard::get_config`].
    #[must_use]
    pub fn get_config(&self, key: &str, default: Option<&str>) -> Option<String> {
        self.lock().get_config(key, default)
    }

    /// Locking convenience for [`DatabaseGuard::set_config`].
    pub fn set_config(&self, key: &str, value: Option<&str>) -> Result<()> {
        self.lock().set_config(key, value)
    }

    /// Locking convenience for [`DatabaseGuard::get_config_int`].
    #[must_use]
    pub fn get_config_int(&self, key: &str, default: i64) -> i64 {
        self.lock().get_config_int(key, default)
    }

    /// Locking convenience for [`DatabaseGuard::set_config_int`].
    pub fn set_config_int(&self, key: &str, value: i64) -> Result<()> {
        self.lock().set_config_int(key, value)
    }
}

/// Exclusive access to the connection state, returned by
/// [`Database::lock`].
pub struct DatabaseGuard<'a> {
    inner: MutexGuard<'a, Inner>,
}

impl DatabaseGuard<'_> {
    fn conn(&self) -> Result<&Connection> {
        self.inner.conn.as_ref().ok_or(StoreError::NotOpen)
    }

    /// Whether the handle currently owns an open connection.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.conn.is_some()
    }

    /// The live connection, for collaborator queries that go beyond the
    /// predefined slots.
    pub fn connection(&self) -> Result<&Connection> {
        self.conn()
    }

    /// Returns the cached statement for `slot`: compiled on first use,
    /// reset to its initial unbound state on every use after that.
    pub fn stmt(&self, slot: Stmt) -> Result<CachedStatement<'_>> {
        prepare_slot(self.conn()?, slot)
    }

    /// Drops every cached statement; the next use of a slot re-prepares
    /// it from a clean slate.
    pub fn reset_statements(&self) -> Result<()> {
        self.conn()?.flush_prepared_statement_cache();
        Ok(())
    }

    /// One-shot statement execution, returning the affected row count.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        self.conn()?.execute(sql, params).map_err(Into::into)
    }

    /// Row id of the most recent successful insert on this connection.
    pub fn last_insert_rowid(&self) -> Result<i64> {
        Ok(self.conn()?.last_insert_rowid())
    }

    /// Whether a table named `name` exists in the store.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        table_exists(self.conn()?, name)
    }

    /// Opens a transaction, or joins one that is already running.
    ///
    /// Only the outermost `begin_transaction` issues the physical BEGIN;
    /// every call must be paired with a [`commit`](Self::commit) or
    /// [`rollback`](Self::rollback).
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.inner.transaction_depth += 1;
        if self.inner.transaction_depth == 1 {
            self.step_slot(Stmt::BeginTransaction)?;
        }
        Ok(())
    }

    /// Closes the innermost logical transaction.
    ///
    /// The physical COMMIT is issued only when the outermost transaction
    /// closes. At depth zero this is a no-op rather than an error; some
    /// call sites commit defensively.
    pub fn commit(&mut self) -> Result<()> {
        if self.inner.transaction_depth == 0 {
            return Ok(());
        }
        let outermost = self.inner.transaction_depth == 1;
        self.inner.transaction_depth -= 1;
        if outermost {
            self.step_slot(Stmt::CommitTransaction)?;
        }
        Ok(())
    }

    /// Rolls back the innermost logical transaction; counterpart of
    /// [`commit`](Self::commit).
    pub fn rollback(&mut self) -> Result<()> {
        if self.inner.transaction_depth == 0 {
            return Ok(());
        }
        let outermost = self.inner.transaction_depth == 1;
        self.inner.transaction_depth -= 1;
        if outermost {
            self.step_slot(Stmt::RollbackTransaction)?;
        }
        Ok(())
    }

    /// Stores `value` under `key`, or deletes the row when `value` is
    /// `None`.
    pub fn set_config(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidArgument("empty config key".into()));
        }
        config_set_raw(self.conn()?, key, value)
    }

    /// Reads `key`, falling back to `default` when the store is closed,
    /// the key is empty or unset, or the read fails.
    #[must_use]
    pub fn get_config(&self, key: &str, default: Option<&str>) -> Option<String> {
        if key.is_empty() {
            return default.map(str::to_string);
        }
        let Ok(conn) = self.conn() else {
            return default.map(str::to_string);
        };
        match config_get_raw(conn, key) {
            Ok(Some(value)) => Some(value),
            Ok(None) => default.map(str::to_string),
            Err(err) => {
                warn!("Cannot read config key \"{key}\": {err}");
                default.map(str::to_string)
            }
        }
    }

    /// Serializes `value` as its decimal string and stores it under
    /// `key`.
    pub fn set_config_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.set_config(key, Some(&value.to_string()))
    }

    /// Integer accessor over the string store; unset keys and
    /// non-numeric stored text both read as `default`.
    #[must_use]
    pub fn get_config_int(&self, key: &str, default: i64) -> i64 {
        self.get_config(key, None)
            .and_then(|value| value.parse().ok())
            .unwrap_or(default)
    }

    fn step_slot(&self, slot: Stmt) -> Result<()> {
        let mut stmt = prepare_slot(self.conn()?, slot)?;
        stmt.execute([])?;
        Ok(())
    }
}

fn open_connection(path: &Path, mode: OpenMode) -> Result<Connection> {
    // Fully serialized mode, explicitly. The engine then tolerates the
    // handle moving between threads; call sequences still need the lock.
    let flags = match mode {
        OpenMode::ReadOnly => OpenFlags::SQLITE_OPEN_READ_ONLY,
        OpenMode::ReadWrite => {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
        }
    } | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let conn = Connection::open_with_flags(path, flags)
        .map_err(|err| classify_open_error(path, err))?;

    // A second process wanting write access while a write is in flight
    // retries for this long before its statement returns SQLITE_BUSY.
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.set_prepared_statement_cache_capacity(Stmt::COUNT);
    Ok(conn)
}

/// A mutex-flag rejection at open time means the library was built
/// without thread safety.
fn classify_open_error(path: &Path, err: rusqlite::Error) -> StoreError {
    match err.sqlite_error_code() {
        Some(rusqlite::ErrorCode::ApiMisuse) => StoreError::ThreadingUnsupported,
        _ => StoreError::OpenFailed {
            path: path.to_path_buf(),
            source: err,
        },
    }
}

/// Compiles `slot` on first use; afterwards returns the cached plan
/// reset to its unbound state.
pub(crate) fn prepare_slot<'conn>(
    conn: &'conn Connection,
    slot: Stmt,
) -> Result<CachedStatement<'conn>> {
    conn.prepare_cached(slot.sql()).map_err(|err| {
        warn!("Preparing statement \"{}\" failed: {err}", slot.sql());
        StoreError::PrepareFailed {
            sql: slot.sql().to_string(),
            source: err,
        }
    })
}

/// `PRAGMA table_info` probe; the table name cannot be a bound
/// parameter, so the statement is built ad hoc and not cached.
pub(crate) fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let sql = format!("PRAGMA table_info({name});");
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|err| StoreError::PrepareFailed {
            sql: sql.clone(),
            source: err,
        })?;
    let mut rows = stmt.query([])?;
    Ok(rows.next()?.is_some())
}

pub(crate) fn config_get_raw(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = prepare_slot(conn, Stmt::SelectConfigValue)?;
    let value: Option<Option<String>> = stmt
        .query_row([key], |row| row.get(0))
        .optional()?;
    Ok(value.flatten())
}

pub(crate) fn config_set_raw(conn: &Connection, key: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(value) => {
            let exists = {
                let mut stmt = prepare_slot(conn, Stmt::SelectConfigValue)?;
                stmt.query_row([key], |_| Ok(())).optional()?.is_some()
            };
            let changed = if exists {
                let mut stmt = prepare_slot(conn, Stmt::UpdateConfigValue)?;
                stmt.execute(params![value, key])
                    .map_err(|err| write_error(key, err))?
            } else {
                let mut stmt = prepare_slot(conn, Stmt::InsertConfig)?;
                stmt.execute(params![key, value])
                    .map_err(|err| write_error(key, err))?
            };
            if changed == 0 {
                return Err(StoreError::WriteFailed(format!(
                    "config key \"{key}\" not stored"
                )));
            }
        }
        None => {
            let mut stmt = prepare_slot(conn, Stmt::DeleteConfig)?;
            stmt.execute([key]).map_err(|err| write_error(key, err))?;
        }
    }
    Ok(())
}

/// A write that does not complete normally is a [`StoreError::WriteFailed`];
/// busy-timeout expiry keeps its own kind.
fn write_error(key: &str, err: rusqlite::Error) -> StoreError {
    match StoreError::from(err) {
        StoreError::Busy => StoreError::Busy,
        err => StoreError::WriteFailed(format!("config key \"{key}\": {err}")),
    }
}

pub(crate) fn config_get_int_raw(conn: &Connection, key: &str, default: i64) -> Result<i64> {
    Ok(config_get_raw(conn, key)?
        .and_then(|value| value.parse().ok())
        .unwrap_or(default))
}

pub(crate) fn config_set_int_raw(conn: &Connection, key: &str, value: i64) -> Result<()> {
    config_set_raw(conn, key, Some(&value.to_string()))
}
