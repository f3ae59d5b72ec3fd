//! Layout of the `kv_entries` table.
//!
//! A fresh file is stamped with [`SCHEMA_VERSION`]; a file already at that
//! version is checked for the table and left alone.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

/// Layout version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

const KV_ENTRIES_SQL: &str = include_str!("kv_entries.sql");

/// Creates `kv_entries` on a fresh file or verifies it on an existing one.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    let found = user_version(conn)?;
    match found.cmp(&SCHEMA_VERSION) {
        Ordering::Greater => Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        }),
        Ordering::Equal if has_kv_table(conn)? => Ok(()),
        Ordering::Equal => Err(DbError::MissingKvTable { version: found }),
        Ordering::Less => {
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(KV_ENTRIES_SQL)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;
            info!("event=db_schema module=db status=ok from_version={found} to_version={SCHEMA_VERSION}");
            Ok(())
        }
    }
}

/// Reads the layout version stamped on `conn`.
pub fn user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

fn has_kv_table(conn: &Connection) -> DbResult<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries');",
        [],
        |row| row.get(0),
    )?)
}
