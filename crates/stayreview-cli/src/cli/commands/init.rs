//! Implementation of `stayreview init` command.

use anyhow::Result;
use std::path::Path;

use stayreview_core::store::ReviewDb;

/// Run the init command.
///
/// Creates the database file (and its directory) with the current schema.
/// Running it again on an existing database only re-applies the idempotent DDL.
pub fn run_init(db_path: &Path) -> Result<()> {
    let existed = is_initialized(db_path);

    let db = ReviewDb::open(db_path)?;
    db.init_schema()?;

    if existed {
        println!("Already initialized: {}", db_path.display());
    } else {
        tracing::info!(path = %db_path.display(), "Created review database");
        println!("Initialized stayreview in {}", db_path.display());
    }

    Ok(())
}

/// Check if the database exists at the given path.
pub fn is_initialized(db_path: &Path) -> bool {
    db_path.is_file()
}
