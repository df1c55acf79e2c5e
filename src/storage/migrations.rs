//! Schema creation and migrations
//!
//! The on-disk format is versioned through the `dbversion` config row.
//! A fresh store gets the baseline schema plus the reserved placeholder
//! rows at version 0; from there an ordered ladder of one-way steps
//! brings any historical store to [`SCHEMA_VERSION`]. Each step persists
//! its target version immediately after applying, so a crash mid-ladder
//! resumes from the last completed step and never re-applies or skips
//! one. Published steps must never change once released.

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::storage::hooks::PeerstateUpdater;
use crate::storage::sqlite::{self, prepare_slot};
use crate::storage::stmt::Stmt;

/// Latest schema version; the target of the last migration step.
pub const SCHEMA_VERSION: u32 = 40;

/// Reserved config key under which the schema version is persisted.
pub(crate) const DBVERSION_KEY: &str = "dbversion";

/// Tables that must exist after fresh-store creation.
const BASELINE_TABLES: [&str; 6] = [
    "config",
    "contacts",
    "chats",
    "chats_contacts",
    "msgs",
    "jobs",
];

/// Baseline schema, applied to fresh stores as version 0.
///
/// The low-numbered rows seeded into contacts, chats and msgs are system
/// placeholders; user rows allocate above them, see
/// [`LAST_RESERVED_ID`](crate::storage::LAST_RESERVED_ID).
const BASELINE: [&str; 19] = [
    "CREATE TABLE config (id INTEGER PRIMARY KEY, keyname TEXT, value TEXT);",
    "CREATE INDEX config_index1 ON config (keyname);",
    "CREATE TABLE contacts (id INTEGER PRIMARY KEY,\
     name TEXT DEFAULT '',\
     addr TEXT DEFAULT '' COLLATE NOCASE,\
     origin INTEGER DEFAULT 0,\
     blocked INTEGER DEFAULT 0,\
     last_seen INTEGER DEFAULT 0,\
     param TEXT DEFAULT '');",
    "CREATE INDEX contacts_index1 ON contacts (name COLLATE NOCASE);",
    "CREATE INDEX contacts_index2 ON contacts (addr COLLATE NOCASE);",
    "INSERT INTO contacts (id,name,origin) VALUES \
     (1,'self',262144), (2,'device',262144), (3,'rsvd',262144), \
     (4,'rsvd',262144), (5,'rsvd',262144), (6,'rsvd',262144), \
     (7,'rsvd',262144), (8,'rsvd',262144), (9,'rsvd',262144);",
    "CREATE TABLE chats (id INTEGER PRIMARY KEY,\
     type INTEGER DEFAULT 0,\
     name TEXT DEFAULT '',\
     draft_timestamp INTEGER DEFAULT 0,\
     draft_txt TEXT DEFAULT '',\
     blocked INTEGER DEFAULT 0,\
     grpid TEXT DEFAULT '',\
     param TEXT DEFAULT '');",
    "CREATE INDEX chats_index1 ON chats (grpid);",
    "CREATE TABLE chats_contacts (chat_id INTEGER, contact_id INTEGER);",
    "CREATE INDEX chats_contacts_index1 ON chats_contacts (chat_id);",
    "INSERT INTO chats (id,type,name) VALUES \
     (1,120,'deaddrop'), (2,120,'rsvd'), (3,120,'trash'), \
     (4,120,'msgs_in_creation'), (5,120,'starred'), (6,120,'archivedlink'), \
     (7,100,'rsvd'), (8,100,'rsvd'), (9,100,'rsvd');",
    "CREATE TABLE msgs (id INTEGER PRIMARY KEY,\
     rfc724_mid TEXT DEFAULT '',\
     server_folder TEXT DEFAULT '',\
     server_uid INTEGER DEFAULT 0,\
     chat_id INTEGER DEFAULT 0,\
     from_id INTEGER DEFAULT 0,\
     to_id INTEGER DEFAULT 0,\
     timestamp INTEGER DEFAULT 0,\
     type INTEGER DEFAULT 0,\
     state INTEGER DEFAULT 0,\
     msgrmsg INTEGER DEFAULT 1,\
     bytes INTEGER DEFAULT 0,\
     txt TEXT DEFAULT '',\
     txt_raw TEXT DEFAULT '',\
     param TEXT DEFAULT '');",
    "CREATE INDEX msgs_index1 ON msgs (rfc724_mid);",
    "CREATE INDEX msgs_index2 ON msgs (chat_id);",
    "CREATE INDEX msgs_index3 ON msgs (timestamp);",
    "CREATE INDEX msgs_index4 ON msgs (state);",
    "INSERT INTO msgs (id,msgrmsg,txt) VALUES \
     (1,0,'marker1'), (2,0,'rsvd'), (3,0,'rsvd'), (4,0,'rsvd'), \
     (5,0,'rsvd'), (6,0,'rsvd'), (7,0,'rsvd'), (8,0,'rsvd'), \
     (9,0,'daymarker');",
    "CREATE TABLE jobs (id INTEGER PRIMARY KEY,\
     added_timestamp INTEGER,\
     desired_timestamp INTEGER DEFAULT 0,\
     action INTEGER,\
     foreign_id INTEGER,\
     param TEXT DEFAULT '');",
    "CREATE INDEX jobs_index1 ON jobs (desired_timestamp);",
];

/// Context shared by every step of one migration run.
struct StepContext {
    /// Version read from the store before any step of this run applied.
    version_before: u32,
}

/// Flags raised by steps and consumed after the whole ladder completes.
#[derive(Default)]
struct PostActions {
    recompute_fingerprints: bool,
}

/// One entry of the migration ladder.
struct Migration {
    /// Version the store is at once this step has applied.
    target: u32,
    apply: fn(&Connection, &StepContext, &mut PostActions) -> Result<()>,
}

/// The ladder, in strictly increasing target order. A step applies if
/// and only if the current version is below its target.
const MIGRATIONS: [Migration; 11] = [
    Migration {
        target: 1,
        apply: to_v1,
    },
    Migration {
        target: 2,
        apply: to_v2,
    },
    Migration {
        target: 7,
        apply: to_v7,
    },
    Migration {
        target: 10,
        apply: to_v10,
    },
    Migration {
        target: 12,
        apply: to_v12,
    },
    Migration {
        target: 17,
        apply: to_v17,
    },
    Migration {
        target: 18,
        apply: to_v18,
    },
    Migration {
        target: 27,
        apply: to_v27,
    },
    Migration {
        target: 34,
        apply: to_v34,
    },
    Migration {
        target: 39,
        apply: to_v39,
    },
    Migration {
        target: 40,
        apply: to_v40,
    },
];

/// Brings the store behind `conn` to [`SCHEMA_VERSION`].
///
/// Runs only for read-write opens. Fresh stores (no config table yet)
/// get the baseline schema first; that path is fatal on failure. The
/// ladder itself is best-effort per step: most steps are additive, so a
/// failing statement is logged and the remaining steps still run.
pub(crate) fn ensure_schema(
    conn: &Connection,
    updater: Option<&dyn PeerstateUpdater>,
) -> Result<()> {
    if !sqlite::table_exists(conn, "config")? {
        info!("First time init: creating tables");
        create_baseline(conn)?;
    }

    let version_before =
        u32::try_from(sqlite::config_get_int_raw(conn, DBVERSION_KEY, 0)?).unwrap_or(0);
    let cx = StepContext { version_before };
    let mut post = PostActions::default();
    let mut current = version_before;

    for step in &MIGRATIONS {
        if current >= step.target {
            continue;
        }
        debug!("Migrating to version {}", step.target);
        if let Err(err) = (step.apply)(conn, &cx, &mut post) {
            let err = StoreError::MigrationStepFailed {
                version: step.target,
                source: Box::new(err),
            };
            warn!("{err}");
        }
        sqlite::config_set_int_raw(conn, DBVERSION_KEY, i64::from(step.target))?;
        current = step.target;
    }

    // Runs only after the full ladder: the recompute helper relies on
    // the final schema shape.
    if post.recompute_fingerprints {
        recompute_fingerprints(conn, updater);
    }

    Ok(())
}

/// Creates all baseline tables, indices and reserved rows, then persists
/// version 0. Unlike the ladder, a store that ends up without its
/// required tables aborts the open.
fn create_baseline(conn: &Connection) -> Result<()> {
    for sql in BASELINE {
        best_effort(conn, sql);
    }
    for table in BASELINE_TABLES {
        if !sqlite::table_exists(conn, table)? {
            return Err(StoreError::SchemaCreateFailed(format!(
                "required table \"{table}\" missing after creation"
            )));
        }
    }
    sqlite::config_set_int_raw(conn, DBVERSION_KEY, 0)
}

/// Executes one migration statement, logging failures instead of
/// propagating them.
fn best_effort(conn: &Connection, sql: &str) {
    if let Err(err) = conn.execute_batch(sql) {
        warn!("Cannot execute \"{sql}\": {err}");
    }
}

fn to_v1(conn: &Connection, _cx: &StepContext, _post: &mut PostActions) -> Result<()> {
    best_effort(
        conn,
        "CREATE TABLE left_groups (id INTEGER PRIMARY KEY, grpid TEXT DEFAULT '');",
    );
    best_effort(conn, "CREATE INDEX left_groups_index1 ON left_groups (grpid);");
    Ok(())
}

fn to_v2(conn: &Connection, _cx: &StepContext, _post: &mut PostActions) -> Result<()> {
    best_effort(conn, "ALTER TABLE contacts ADD COLUMN authname TEXT DEFAULT '';");
    Ok(())
}

fn to_v7(conn: &Connection, _cx: &StepContext, _post: &mut PostActions) -> Result<()> {
    best_effort(
        conn,
        "CREATE TABLE keypairs (id INTEGER PRIMARY KEY,\
         addr TEXT DEFAULT '' COLLATE NOCASE,\
         is_default INTEGER DEFAULT 0,\
         private_key,\
         public_key,\
         created INTEGER DEFAULT 0);",
    );
    Ok(())
}

fn to_v10(conn: &Connection, _cx: &StepContext, _post: &mut PostActions) -> Result<()> {
    // addr is looked up through the index, not a UNIQUE constraint;
    // callers check for an existing row themselves.
    best_effort(
        conn,
        "CREATE TABLE peerstates (id INTEGER PRIMARY KEY,\
         addr TEXT DEFAULT '' COLLATE NOCASE,\
         last_seen INTEGER DEFAULT 0,\
         last_seen_autocrypt INTEGER DEFAULT 0,\
         public_key,\
         prefer_encrypted INTEGER DEFAULT 0);",
    );
    best_effort(conn, "CREATE INDEX peerstates_index1 ON peerstates (addr);");
    Ok(())
}

fn to_v12(conn: &Connection, _cx: &StepContext, _post: &mut PostActions) -> Result<()> {
    best_effort(
        conn,
        "CREATE TABLE msgs_mdns (msg_id INTEGER, contact_id INTEGER);",
    );
    best_effort(conn, "CREATE INDEX msgs_mdns_index1 ON msgs_mdns (msg_id);");
    Ok(())
}

fn to_v17(conn: &Connection, _cx: &StepContext, _post: &mut PostActions) -> Result<()> {
    best_effort(conn, "ALTER TABLE chats ADD COLUMN archived INTEGER DEFAULT 0;");
    best_effort(conn, "CREATE INDEX chats_index2 ON chats (archived);");
    best_effort(conn, "ALTER TABLE msgs ADD COLUMN starred INTEGER DEFAULT 0;");
    best_effort(conn, "CREATE INDEX msgs_index5 ON msgs (starred);");
    Ok(())
}

fn to_v18(conn: &Connection, _cx: &StepContext, _post: &mut PostActions) -> Result<()> {
    best_effort(
        conn,
        "ALTER TABLE peerstates ADD COLUMN gossip_timestamp INTEGER DEFAULT 0;",
    );
    best_effort(conn, "ALTER TABLE peerstates ADD COLUMN gossip_key;");
    Ok(())
}

fn to_v27(conn: &Connection, _cx: &StepContext, _post: &mut PostActions) -> Result<()> {
    // Chat ids 1 and 2 were the old deaddrop buckets; their messages are
    // intentionally purged, current deaddrops are flagged per chat.
    best_effort(conn, "DELETE FROM msgs WHERE chat_id=1 OR chat_id=2;");
    best_effort(
        conn,
        "CREATE INDEX chats_contacts_index2 ON chats_contacts (contact_id);",
    );
    best_effort(
        conn,
        "ALTER TABLE msgs ADD COLUMN timestamp_sent INTEGER DEFAULT 0;",
    );
    best_effort(
        conn,
        "ALTER TABLE msgs ADD COLUMN timestamp_rcvd INTEGER DEFAULT 0;",
    );
    Ok(())
}

fn to_v34(conn: &Connection, _cx: &StepContext, post: &mut PostActions) -> Result<()> {
    best_effort(conn, "ALTER TABLE msgs ADD COLUMN hidden INTEGER DEFAULT 0;");
    best_effort(
        conn,
        "ALTER TABLE msgs_mdns ADD COLUMN timestamp_sent INTEGER DEFAULT 0;",
    );
    // Fingerprints are stored uppercase, so the columns stay
    // case-sensitive.
    best_effort(
        conn,
        "ALTER TABLE peerstates ADD COLUMN public_key_fingerprint TEXT DEFAULT '';",
    );
    best_effort(
        conn,
        "ALTER TABLE peerstates ADD COLUMN gossip_key_fingerprint TEXT DEFAULT '';",
    );
    best_effort(
        conn,
        "CREATE INDEX peerstates_index3 ON peerstates (public_key_fingerprint);",
    );
    best_effort(
        conn,
        "CREATE INDEX peerstates_index4 ON peerstates (gossip_key_fingerprint);",
    );
    post.recompute_fingerprints = true;
    Ok(())
}

fn to_v39(conn: &Connection, cx: &StepContext, _post: &mut PostActions) -> Result<()> {
    best_effort(
        conn,
        "CREATE TABLE tokens (id INTEGER PRIMARY KEY,\
         namespc INTEGER DEFAULT 0,\
         foreign_id INTEGER DEFAULT 0,\
         token TEXT DEFAULT '',\
         timestamp INTEGER DEFAULT 0);",
    );
    best_effort(conn, "ALTER TABLE peerstates ADD COLUMN verified_key;");
    best_effort(
        conn,
        "ALTER TABLE peerstates ADD COLUMN verified_key_fingerprint TEXT DEFAULT '';",
    );
    best_effort(
        conn,
        "CREATE INDEX peerstates_index5 ON peerstates (verified_key_fingerprint);",
    );

    if cx.version_before == 34 {
        // Only version 34 ever had the per-key verified flags; later
        // stores carry the verified key itself.
        best_effort(
            conn,
            "UPDATE peerstates SET verified_key=gossip_key, \
             verified_key_fingerprint=gossip_key_fingerprint \
             WHERE gossip_key_verified=2;",
        );
        best_effort(
            conn,
            "UPDATE peerstates SET verified_key=public_key, \
             verified_key_fingerprint=public_key_fingerprint \
             WHERE public_key_verified=2;",
        );
    }
    Ok(())
}

fn to_v40(conn: &Connection, _cx: &StepContext, _post: &mut PostActions) -> Result<()> {
    best_effort(conn, "ALTER TABLE jobs ADD COLUMN thread INTEGER DEFAULT 0;");
    Ok(())
}

/// Rewrites the derived fingerprint fields of every peer-trust row
/// through the injected recompute capability, skipping rows whose
/// recomputation fails.
fn recompute_fingerprints(conn: &Connection, updater: Option<&dyn PeerstateUpdater>) {
    let Some(updater) = updater else {
        info!("No peerstate updater supplied; skipping fingerprint recompute");
        return;
    };

    let addrs = match load_peerstate_addrs(conn) {
        Ok(addrs) => addrs,
        Err(err) => {
            warn!("Cannot list peerstates: {err}");
            return;
        }
    };

    for addr in addrs {
        match updater.recompute(conn, &addr) {
            Ok(true) => {}
            Ok(false) => debug!("Peerstate \"{addr}\" skipped"),
            Err(err) => warn!("Fingerprint recompute for \"{addr}\" failed: {err}"),
        }
    }
}

fn load_peerstate_addrs(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = prepare_slot(conn, Stmt::SelectPeerstateAddrs)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rusqlite::params;

    use super::*;
    use crate::storage::{
        CHAT_ID_TRASH, CONTACT_ID_SELF, MSG_ID_DAYMARKER, ORIGIN_INTERNAL,
    };

    fn fresh_conn() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    fn version(conn: &Connection) -> i64 {
        sqlite::config_get_int_raw(conn, DBVERSION_KEY, -1).unwrap()
    }

    fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table});"))
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(1))
            .unwrap()
            .map(Result::unwrap)
            .collect();
        names.iter().any(|name| name == column)
    }

    #[test]
    fn fresh_store_migrates_to_latest() {
        let conn = fresh_conn();
        ensure_schema(&conn, None).unwrap();
        assert_eq!(version(&conn), i64::from(SCHEMA_VERSION));

        for table in [
            "config",
            "contacts",
            "chats",
            "chats_contacts",
            "msgs",
            "jobs",
            "left_groups",
            "keypairs",
            "peerstates",
            "msgs_mdns",
            "tokens",
        ] {
            assert!(sqlite::table_exists(&conn, table).unwrap(), "{table}");
        }
    }

    #[test]
    fn historical_store_gains_every_intermediate_column() {
        let conn = fresh_conn();
        create_baseline(&conn).unwrap();
        assert_eq!(version(&conn), 0);
        assert!(!column_exists(&conn, "contacts", "authname"));

        ensure_schema(&conn, None).unwrap();
        assert_eq!(version(&conn), i64::from(SCHEMA_VERSION));
        assert!(column_exists(&conn, "contacts", "authname")); // v2
        assert!(column_exists(&conn, "chats", "archived")); // v17
        assert!(column_exists(&conn, "peerstates", "gossip_timestamp")); // v18
        assert!(column_exists(&conn, "msgs", "timestamp_rcvd")); // v27
        assert!(column_exists(&conn, "msgs", "hidden")); // v34
        assert!(column_exists(&conn, "peerstates", "verified_key")); // v39
        assert!(column_exists(&conn, "jobs", "thread")); // v40
    }

    #[test]
    fn rerun_applies_zero_steps() {
        let conn = fresh_conn();
        ensure_schema(&conn, None).unwrap();

        let rows_before: i64 = conn
            .query_row("SELECT COUNT(*) FROM config", [], |row| row.get(0))
            .unwrap();
        ensure_schema(&conn, None).unwrap();
        let rows_after: i64 = conn
            .query_row("SELECT COUNT(*) FROM config", [], |row| row.get(0))
            .unwrap();

        assert_eq!(version(&conn), i64::from(SCHEMA_VERSION));
        assert_eq!(rows_before, rows_after);
    }

    #[test]
    fn reserved_rows_match_their_constants() {
        let conn = fresh_conn();
        ensure_schema(&conn, None).unwrap();

        let (name, origin): (String, i64) = conn
            .query_row(
                "SELECT name, origin FROM contacts WHERE id=?",
                [CONTACT_ID_SELF],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(name, "self");
        assert_eq!(origin, ORIGIN_INTERNAL);

        let trash: String = conn
            .query_row("SELECT name FROM chats WHERE id=?", [CHAT_ID_TRASH], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(trash, "trash");

        let daymarker: String = conn
            .query_row(
                "SELECT txt FROM msgs WHERE id=?",
                [MSG_ID_DAYMARKER],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(daymarker, "daymarker");

        let seeded: i64 = conn
            .query_row("SELECT COUNT(*) FROM msgs WHERE id<=9", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(seeded, 9);
    }

    #[test]
    fn legacy_deaddrop_messages_are_purged_at_v27() {
        let conn = fresh_conn();
        create_baseline(&conn).unwrap();
        conn.execute(
            "INSERT INTO msgs (chat_id, txt) VALUES (1, 'legacy'), (2, 'legacy'), (10, 'keep');",
            [],
        )
        .unwrap();

        ensure_schema(&conn, None).unwrap();

        let legacy: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM msgs WHERE (chat_id=1 OR chat_id=2) AND id>9",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(legacy, 0);
        let kept: i64 = conn
            .query_row("SELECT COUNT(*) FROM msgs WHERE chat_id=10", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(kept, 1);
    }

    struct RecordingUpdater {
        seen: Mutex<Vec<String>>,
        fail_for: Option<&'static str>,
    }

    impl PeerstateUpdater for RecordingUpdater {
        fn recompute(&self, conn: &Connection, addr: &str) -> crate::error::Result<bool> {
            self.seen.lock().unwrap().push(addr.to_string());
            if self.fail_for == Some(addr) {
                return Err(StoreError::WriteFailed("key material unreadable".into()));
            }
            conn.execute(
                "UPDATE peerstates SET public_key_fingerprint='RECOMPUTED' WHERE addr=?",
                [addr],
            )?;
            Ok(true)
        }
    }

    fn store_at_version(conn: &Connection, version: i64) {
        sqlite::config_set_int_raw(conn, DBVERSION_KEY, version).unwrap();
    }

    #[test]
    fn fingerprint_recompute_visits_every_peerstate() {
        let conn = fresh_conn();
        ensure_schema(&conn, None).unwrap();
        conn.execute(
            "INSERT INTO peerstates (addr) VALUES (?), (?);",
            params!["alice@example.org", "bob@example.org"],
        )
        .unwrap();

        // Re-enter the ladder below the fingerprint upgrade; the
        // duplicate ALTERs are logged and skipped.
        store_at_version(&conn, 27);
        let updater = RecordingUpdater {
            seen: Mutex::new(Vec::new()),
            fail_for: None,
        };
        ensure_schema(&conn, Some(&updater)).unwrap();

        let mut seen = updater.seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec!["alice@example.org", "bob@example.org"]);
        assert_eq!(version(&conn), i64::from(SCHEMA_VERSION));

        let recomputed: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM peerstates WHERE public_key_fingerprint='RECOMPUTED'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(recomputed, 2);
    }

    #[test]
    fn failing_rows_are_skipped_not_fatal() {
        let conn = fresh_conn();
        ensure_schema(&conn, None).unwrap();
        conn.execute(
            "INSERT INTO peerstates (addr) VALUES (?), (?);",
            params!["alice@example.org", "bob@example.org"],
        )
        .unwrap();

        store_at_version(&conn, 27);
        let updater = RecordingUpdater {
            seen: Mutex::new(Vec::new()),
            fail_for: Some("alice@example.org"),
        };
        ensure_schema(&conn, Some(&updater)).unwrap();

        assert_eq!(updater.seen.into_inner().unwrap().len(), 2);
        let recomputed: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM peerstates WHERE public_key_fingerprint='RECOMPUTED'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(recomputed, 1);
    }

    #[test]
    fn recompute_without_updater_is_skipped() {
        let conn = fresh_conn();
        ensure_schema(&conn, None).unwrap();
        conn.execute("INSERT INTO peerstates (addr) VALUES ('carol@example.org');", [])
            .unwrap();

        store_at_version(&conn, 27);
        ensure_schema(&conn, None).unwrap();
        assert_eq!(version(&conn), i64::from(SCHEMA_VERSION));
    }

    #[test]
    fn ladder_targets_strictly_increase() {
        let mut previous = 0;
        for step in &MIGRATIONS {
            assert!(step.target > previous);
            previous = step.target;
        }
        assert_eq!(MIGRATIONS.last().unwrap().target, SCHEMA_VERSION);
    }
}
