//! SQLite file that backs the task list.
//!
//! The database holds exactly one table, `kv_entries`, keyed by storage
//! namespace. Its layout version lives in `PRAGMA user_version`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::SCHEMA_VERSION;

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or preparing the task database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build with a different layout.
    SchemaTooNew { found: u32, supported: u32 },
    /// `user_version` claims the current layout but `kv_entries` is absent,
    /// so the file belongs to some other application.
    MissingKvTable { version: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "task list file uses layout v{found}; this build reads up to v{supported}"
            ),
            Self::MissingKvTable { version } => write!(
                f,
                "not a task list file: layout v{version} has no kv_entries table"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::MissingKvTable { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
