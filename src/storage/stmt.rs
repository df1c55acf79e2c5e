//! Statement slots
//!
//! Each slot is a stable identity bound to exactly one query string for
//! the lifetime of the process; the connection caches one compiled plan
//! per slot and resets it in place on reuse.

/// Identifies one precompiled statement in the per-connection cache.
///
/// The query text is carried by the variant itself, so a slot can never
/// be paired with a different string. A slot must not be used by two
/// logical operations at once; the connection lock enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stmt {
    SelectConfigValue,
    InsertConfig,
    UpdateConfigValue,
    DeleteConfig,
    BeginTransaction,
    CommitTransaction,
    RollbackTransaction,
    SelectPeerstateAddrs,
}

impl Stmt {
    /// Number of slots; also the capacity of the statement cache.
    pub const COUNT: usize = 8;

    /// All slots, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::SelectConfigValue,
        Self::InsertConfig,
        Self::UpdateConfigValue,
        Self::DeleteConfig,
        Self::BeginTransaction,
        Self::CommitTransaction,
        Self::RollbackTransaction,
        Self::SelectPeerstateAddrs,
    ];

    /// The query string compiled into this slot.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::SelectConfigValue => "SELECT value FROM config WHERE keyname=?;",
            Self::InsertConfig => "INSERT INTO config (keyname, value) VALUES (?, ?);",
            Self::UpdateConfigValue => "UPDATE config SET value=? WHERE keyname=?;",
            Self::DeleteConfig => "DELETE FROM config WHERE keyname=?;",
            Self::BeginTransaction => "BEGIN;",
            Self::CommitTransaction => "COMMIT;",
            Self::RollbackTransaction => "ROLLBACK;",
            Self::SelectPeerstateAddrs => "SELECT addr FROM peerstates;",
        }
    }
}
