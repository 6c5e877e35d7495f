//! Storage for stayreview.
//!
//! [`ReviewStore`] is everything the review service needs from persistence.
//! [`ReviewDb`] implements it on top of SQLite.

#![allow(clippy::missing_errors_doc)]

mod query;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::core::CoreResult;
use crate::model::{
    Company, NewReview, Review, ReviewId, ReviewWithParent, Stay, StayId, User, UserId,
};

/// Lookups and writes the review service depends on.
///
/// Lookups return `Ok(None)` on a miss; mapping a miss to a typed error is
/// the service's job.
pub trait ReviewStore {
    fn find_user(&self, id: UserId) -> Result<Option<User>>;

    fn find_stay(&self, id: StayId) -> Result<Option<Stay>>;

    /// The company that owns `stay_id`.
    fn find_owning_company(&self, stay_id: StayId) -> Result<Option<Company>>;

    fn find_review(&self, id: ReviewId) -> Result<Option<Review>>;

    fn find_review_with_parent(&self, id: ReviewId) -> Result<Option<ReviewWithParent>>;

    /// Every review on the stay, writer resolved, in insertion order.
    ///
    /// Parents must come before their replies; wall-clock time is not used for ordering.
    fn find_all_for_stay(&self, stay_id: StayId) -> Result<Vec<Review>>;

    /// Direct replies to `parent_id`, in insertion order.
    fn find_replies(&self, parent_id: ReviewId) -> Result<Vec<Review>>;

    /// Persist a new review, assigning its id and creation time.
    fn save(&self, review: &NewReview) -> Result<Review>;

    /// Persist the delete state of an existing review.
    fn mark_deleted(&self, review: &Review) -> Result<()>;

    /// Run `work` as one atomic unit. Any error rolls back every write made inside it.
    fn unit_of_work<T, F>(&self, work: F) -> CoreResult<T>
    where
        F: FnOnce(&Self) -> CoreResult<T>;
}

/// SQLite-backed review database.
pub struct ReviewDb {
    conn: Connection,
}

impl ReviewDb {
    /// Open or create a review database at the given path.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create parent directories: {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;

        Ok(Self { conn })
    }

    /// Create an in-memory database (for tests and throwaway sessions).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        Ok(Self { conn })
    }

    /// Initialize the database schema.
    ///
    /// Creates all tables and indexes if they don't exist.
    pub fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .context("Failed to initialize schema")?;
        Ok(())
    }
}

impl ReviewStore for ReviewDb {
    fn find_user(&self, id: UserId) -> Result<Option<User>> {
        self.get_user(id)
    }

    fn find_stay(&self, id: StayId) -> Result<Option<Stay>> {
        self.get_stay(id)
    }

    fn find_owning_company(&self, stay_id: StayId) -> Result<Option<Company>> {
        self.get_company_by_stay(stay_id)
    }

    fn find_review(&self, id: ReviewId) -> Result<Option<Review>> {
        self.get_review(id)
    }

    fn find_review_with_parent(&self, id: ReviewId) -> Result<Option<ReviewWithParent>> {
        let Some(review) = self.get_review(id)? else {
            return Ok(None);
        };
        let parent = match review.parent_id {
            Some(parent_id) => self.get_review(parent_id)?,
            None => None,
        };
        Ok(Some(ReviewWithParent { review, parent }))
    }

    fn find_all_for_stay(&self, stay_id: StayId) -> Result<Vec<Review>> {
        self.list_reviews_for_stay(stay_id)
    }

    fn find_replies(&self, parent_id: ReviewId) -> Result<Vec<Review>> {
        self.list_replies(parent_id)
    }

    fn save(&self, review: &NewReview) -> Result<Review> {
        self.insert_review(review)
    }

    fn mark_deleted(&self, review: &Review) -> Result<()> {
        self.update_review_state(review.id, review.state)
    }

    fn unit_of_work<T, F>(&self, work: F) -> CoreResult<T>
    where
        F: FnOnce(&Self) -> CoreResult<T>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin transaction")?;

        // Dropping `tx` on the error path rolls back.
        let out = work(self)?;

        tx.commit().context("Failed to commit transaction")?;
        Ok(out)
    }
}

// ============================================================================
// Schema SQL
// ============================================================================

const SCHEMA_SQL: &str = r"
-- USERS
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

-- COMPANIES
CREATE TABLE IF NOT EXISTS companies (
    company_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

-- STAYS
CREATE TABLE IF NOT EXISTS stays (
    stay_id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES companies(company_id),
    name TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_stays_company ON stays(company_id);

-- REVIEWS
CREATE TABLE IF NOT EXISTS reviews (
    review_id INTEGER PRIMARY KEY AUTOINCREMENT,
    stay_id INTEGER NOT NULL REFERENCES stays(stay_id),
    writer_id INTEGER NOT NULL REFERENCES users(user_id),
    parent_id INTEGER REFERENCES reviews(review_id),
    content TEXT NOT NULL CHECK (length(trim(content)) > 0),
    score INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    state TEXT NOT NULL DEFAULT 'active'
        CHECK (state IN ('active', 'deleted'))
);

DROP INDEX IF EXISTS idx_reviews_stay;
CREATE INDEX IF NOT EXISTS idx_reviews_stay_id ON reviews(stay_id, review_id);
CREATE INDEX IF NOT EXISTS idx_reviews_parent ON reviews(parent_id);
";
