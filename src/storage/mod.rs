//! Storage layer for msgstore
//!
//! One SQLite connection per opened store, serialized behind a single
//! lock; schema upgrades run as an ordered ladder of one-way migration
//! steps versioned through the config table.

pub mod hooks;
pub mod migrations;
pub mod sqlite;
pub mod stmt;

pub use hooks::{LockObserver, NoopLockObserver, PeerstateUpdater};
pub use migrations::SCHEMA_VERSION;
pub use sqlite::{Database, DatabaseGuard, OpenMode};
pub use stmt::Stmt;

/// Origin marker for rows seeded by the store itself.
pub const ORIGIN_INTERNAL: i64 = 0x0004_0000;

/// Contact id of the self contact, seeded at store creation.
pub const CONTACT_ID_SELF: i64 = 1;
/// Contact id of the device contact.
pub const CONTACT_ID_DEVICE: i64 = 2;

/// Chat id of the deaddrop bucket for messages without a chat yet.
pub const CHAT_ID_DEADDROP: i64 = 1;
/// Chat id of the trash bucket.
pub const CHAT_ID_TRASH: i64 = 3;
/// Chat id of the bucket for messages still being composed.
pub const CHAT_ID_MSGS_IN_CREATION: i64 = 4;
/// Chat id of the virtual starred-messages list.
pub const CHAT_ID_STARRED: i64 = 5;
/// Chat id of the virtual archived-chats link.
pub const CHAT_ID_ARCHIVED_LINK: i64 = 6;

/// Message id of the list marker row.
pub const MSG_ID_MARKER1: i64 = 1;
/// Message id of the day marker row.
pub const MSG_ID_DAYMARKER: i64 = 9;

/// Highest row id reserved for system placeholders in the contacts,
/// chats and msgs tables. User-created rows always allocate above this.
pub const LAST_RESERVED_ID: i64 = 9;

/// Chat type of a one-to-one chat.
pub const CHAT_TYPE_SINGLE: i64 = 100;
/// Chat type of a group chat.
pub const CHAT_TYPE_GROUP: i64 = 120;
