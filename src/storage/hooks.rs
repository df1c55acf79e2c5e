//! Injectable instrumentation and migration collaborators.

use std::panic::Location;
use std::time::Duration;

use rusqlite::Connection;

use crate::error::Result;

/// Observes lock acquisition on the database handle.
///
/// Purely diagnostic; correctness never depends on an implementation.
pub trait LockObserver: Send + Sync {
    /// Called after the lock is acquired, with the call site and the time
    /// spent waiting for it.
    fn locked(&self, site: &'static Location<'static>, waited: Duration) {
        let _ = (site, waited);
    }
}

/// The do-nothing default observer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLockObserver;

impl LockObserver for NoopLockObserver {}

/// Recomputes derived key material for one peer-trust row.
///
/// Supplied by the encryption collaborator and invoked only during the
/// post-migration pass that follows the fingerprint-column upgrade. An
/// implementation loads the peerstate for `addr`, recomputes its derived
/// fingerprint fields and saves the row back over `conn`.
pub trait PeerstateUpdater: Send + Sync {
    /// Returns `Ok(true)` if the row was rewritten, `Ok(false)` to skip it.
    fn recompute(&self, conn: &Connection, addr: &str) -> Result<bool>;
}
