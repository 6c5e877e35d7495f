//! SQL queries behind [`ReviewDb`].
//!
//! Review rows are always read joined with their writer so callers get a
//! fully resolved [`Review`].

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::ReviewDb;
use crate::model::{
    Company, CompanyId, DeleteState, NewReview, Review, ReviewId, Stay, StayId, User, UserId,
};

const REVIEW_COLUMNS: &str = "r.review_id, r.stay_id, r.writer_id, u.name, r.parent_id,
     r.content, r.score, r.created_at, r.state";

// ============================================================================
// Seeding (read-only context for the review flow)
// ============================================================================

impl ReviewDb {
    /// Create a user.
    pub fn insert_user(&self, name: &str) -> Result<User> {
        self.conn
            .execute("INSERT INTO users (name) VALUES (?)", params![name])
            .context("Failed to insert user")?;
        Ok(User {
            id: UserId(self.conn.last_insert_rowid()),
            name: name.to_string(),
        })
    }

    /// Create a company.
    pub fn insert_company(&self, name: &str) -> Result<Company> {
        self.conn
            .execute("INSERT INTO companies (name) VALUES (?)", params![name])
            .context("Failed to insert company")?;
        Ok(Company {
            id: CompanyId(self.conn.last_insert_rowid()),
            name: name.to_string(),
        })
    }

    /// Create a stay owned by `company_id`.
    pub fn insert_stay(&self, company_id: CompanyId, name: &str) -> Result<Stay> {
        self.conn
            .execute(
                "INSERT INTO stays (company_id, name) VALUES (?, ?)",
                params![company_id.0, name],
            )
            .with_context(|| format!("Failed to insert stay for company {company_id}"))?;
        Ok(Stay {
            id: StayId(self.conn.last_insert_rowid()),
            company_id,
            name: name.to_string(),
        })
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT user_id, name FROM users WHERE user_id = ?",
                params![id.0],
                |row| {
                    Ok(User {
                        id: UserId(row.get(0)?),
                        name: row.get(1)?,
                    })
                },
            )
            .optional()
            .context("Failed to query user")
    }

    pub fn get_stay(&self, id: StayId) -> Result<Option<Stay>> {
        self.conn
            .query_row(
                "SELECT stay_id, company_id, name FROM stays WHERE stay_id = ?",
                params![id.0],
                |row| {
                    Ok(Stay {
                        id: StayId(row.get(0)?),
                        company_id: CompanyId(row.get(1)?),
                        name: row.get(2)?,
                    })
                },
            )
            .optional()
            .context("Failed to query stay")
    }

    pub fn get_company_by_stay(&self, stay_id: StayId) -> Result<Option<Company>> {
        self.conn
            .query_row(
                "SELECT c.company_id, c.name
                 FROM stays s
                 JOIN companies c ON c.company_id = s.company_id
                 WHERE s.stay_id = ?",
                params![stay_id.0],
                |row| {
                    Ok(Company {
                        id: CompanyId(row.get(0)?),
                        name: row.get(1)?,
                    })
                },
            )
            .optional()
            .context("Failed to query owning company")
    }

    pub fn get_review(&self, id: ReviewId) -> Result<Option<Review>> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS}
             FROM reviews r
             JOIN users u ON u.user_id = r.writer_id
             WHERE r.review_id = ?"
        );
        let row = self
            .conn
            .query_row(&sql, params![id.0], ReviewRow::from_row)
            .optional()
            .context("Failed to query review")?;

        row.map(ReviewRow::into_review).transpose()
    }

    /// All reviews on a stay in insertion order, so a parent always precedes its replies.
    pub fn list_reviews_for_stay(&self, stay_id: StayId) -> Result<Vec<Review>> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS}
             FROM reviews r
             JOIN users u ON u.user_id = r.writer_id
             WHERE r.stay_id = ?
             ORDER BY r.review_id ASC"
        );
        self.collect_reviews(&sql, stay_id.0)
            .context("Failed to list reviews for stay")
    }

    /// Direct replies to a review in insertion order.
    pub fn list_replies(&self, parent_id: ReviewId) -> Result<Vec<Review>> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS}
             FROM reviews r
             JOIN users u ON u.user_id = r.writer_id
             WHERE r.parent_id = ?
             ORDER BY r.review_id ASC"
        );
        self.collect_reviews(&sql, parent_id.0)
            .context("Failed to list replies")
    }

    fn collect_reviews(&self, sql: &str, key: i64) -> Result<Vec<Review>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![key], ReviewRow::from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.context("Failed to read review row")?.into_review()?);
        }
        Ok(results)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    pub fn insert_review(&self, review: &NewReview) -> Result<Review> {
        let created_at = Utc::now();
        self.conn
            .execute(
                "INSERT INTO reviews (
                    stay_id, writer_id, parent_id, content, score, created_at, state
                ) VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    review.stay_id.0,
                    review.writer.id.0,
                    review.parent_id.map(|p| p.0),
                    review.content,
                    review.score,
                    format_ts(&created_at),
                    DeleteState::Active.as_str(),
                ],
            )
            .context("Failed to insert review")?;

        Ok(Review {
            id: ReviewId(self.conn.last_insert_rowid()),
            stay_id: review.stay_id,
            writer: review.writer.clone(),
            parent_id: review.parent_id,
            content: review.content.clone(),
            score: review.score,
            created_at,
            state: DeleteState::Active,
        })
    }

    pub fn update_review_state(&self, id: ReviewId, state: DeleteState) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE reviews SET state = ? WHERE review_id = ?",
                params![state.as_str(), id.0],
            )
            .context("Failed to update review state")?;
        anyhow::ensure!(changed == 1, "Review {id} disappeared during update");
        Ok(())
    }
}

fn format_ts(ts: &DateTime<Utc>) -> String {
    // Fixed width so lexical order matches time order.
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

// ============================================================================
// Internal Row Types (for query mapping)
// ============================================================================

/// Internal type for reading a review joined with its writer.
struct ReviewRow {
    review_id: i64,
    stay_id: i64,
    writer_id: i64,
    writer_name: String,
    parent_id: Option<i64>,
    content: String,
    score: i32,
    created_at: String,
    state: String,
}

impl ReviewRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            review_id: row.get(0)?,
            stay_id: row.get(1)?,
            writer_id: row.get(2)?,
            writer_name: row.get(3)?,
            parent_id: row.get(4)?,
            content: row.get(5)?,
            score: row.get(6)?,
            created_at: row.get(7)?,
            state: row.get(8)?,
        })
    }

    fn into_review(self) -> Result<Review> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .with_context(|| format!("Bad created_at on review {}", self.review_id))?
            .with_timezone(&Utc);

        Ok(Review {
            id: ReviewId(self.review_id),
            stay_id: StayId(self.stay_id),
            writer: User {
                id: UserId(self.writer_id),
                name: self.writer_name,
            },
            parent_id: self.parent_id.map(ReviewId),
            content: self.content,
            score: self.score,
            created_at,
            state: DeleteState::parse(&self.state)?,
        })
    }
}
