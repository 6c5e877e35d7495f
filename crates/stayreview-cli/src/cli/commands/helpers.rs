//! Shared helpers for CLI commands.

use anyhow::Result;
use std::path::Path;

use stayreview_core::core::{CoreContext, ReviewServices};
use stayreview_core::store::ReviewDb;

/// Open the database and wrap it in the service facade.
///
/// A missing database surfaces as `CoreError::NotInitialized`.
pub fn open_services(db_path: &Path) -> Result<ReviewServices<ReviewDb>> {
    Ok(CoreContext::new(db_path)?.services()?)
}
