//! Service layer for stayreview-core.
//!
//! Wraps a [`ReviewStore`] behind typed, high-level review operations.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use stayreview_core::access::Actor;
//! use stayreview_core::core::CoreContext;
//! use stayreview_core::model::{CompanyId, StayId};
//!
//! let ctx = CoreContext::new(Path::new(".stayreview/reviews.db")).unwrap();
//! let services = ctx.services().unwrap();
//! let forest = services
//!     .reviews()
//!     .select(StayId(1), Actor::Company(CompanyId(1)))
//!     .unwrap();
//! ```

pub mod errors;
pub mod reviews;

pub use errors::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

use crate::store::{ReviewDb, ReviewStore};

/// Context for stayreview-core services.
///
/// Holds the location of the review database. Create one per command or
/// hold it for the duration of a session.
#[derive(Debug, Clone)]
pub struct CoreContext {
    db_path: PathBuf,
}

impl CoreContext {
    /// Create a new core context.
    ///
    /// Fails with [`CoreError::NotInitialized`] if the database file does not exist.
    pub fn new(db_path: &Path) -> CoreResult<Self> {
        if !db_path.exists() {
            return Err(CoreError::NotInitialized {
                path: db_path.display().to_string(),
            });
        }

        Ok(Self {
            db_path: db_path.to_path_buf(),
        })
    }

    /// Open the database and make sure its schema is current.
    pub fn open(&self) -> CoreResult<ReviewDb> {
        let db = ReviewDb::open(&self.db_path).map_err(CoreError::Internal)?;
        db.init_schema().map_err(CoreError::Internal)?;
        Ok(db)
    }

    /// Create a `ReviewServices` instance backed by this context.
    pub fn services(&self) -> CoreResult<ReviewServices<ReviewDb>> {
        Ok(ReviewServices::new(self.open()?))
    }
}

/// Facade owning a store and handing out service objects over it.
pub struct ReviewServices<S: ReviewStore> {
    store: S,
}

impl<S: ReviewStore> ReviewServices<S> {
    /// Wrap an already-opened store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Access review operations.
    #[must_use]
    pub const fn reviews(&self) -> reviews::ReviewService<'_, S> {
        reviews::ReviewService::new(&self.store)
    }

    /// Get a reference to the underlying store.
    ///
    /// Useful for seeding users, companies, and stays.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}
