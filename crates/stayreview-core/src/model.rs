//! Entity model for stays, their owning companies, guests, and reviews.
//!
//! Stays, companies, and users are read-only context for the review flow.
//! The only mutable entity is [`Review`], and only through
//! [`NewReview::attach_parent`] and its delete state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{CoreError, CoreResult};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

entity_id!(
    /// Identifier of a guest account.
    UserId
);
entity_id!(
    /// Identifier of a company that owns stays.
    CompanyId
);
entity_id!(
    /// Identifier of a lodging listing.
    StayId
);
entity_id!(
    /// Identifier of a review or reply.
    ReviewId
);

/// A guest who writes reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// A company account. Owns stays and may read their reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
}

/// A lodging listing, owned by exactly one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stay {
    pub id: StayId,
    pub company_id: CompanyId,
    pub name: String,
}

/// Soft-delete state of a review.
///
/// Deletion is a one-way transition; rows are never removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteState {
    #[default]
    Active,
    Deleted,
}

impl DeleteState {
    #[must_use]
    pub const fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleted => "deleted",
        }
    }

    /// Parse the storage representation.
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "active" => Ok(Self::Active),
            "deleted" => Ok(Self::Deleted),
            other => anyhow::bail!("Unknown review state: {other}"),
        }
    }
}

/// A persisted review. `parent_id` of `None` marks a root review on the stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub stay_id: StayId,
    pub writer: User,
    pub parent_id: Option<ReviewId>,
    pub content: String,
    pub score: i32,
    pub created_at: DateTime<Utc>,
    pub state: DeleteState,
}

impl Review {
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.state.is_deleted()
    }

    /// Transition to [`DeleteState::Deleted`]. Repeating it is a no-op.
    pub fn mark_deleted(&mut self) {
        self.state = DeleteState::Deleted;
    }
}

/// A review that has not been saved yet. The store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub stay_id: StayId,
    pub writer: User,
    pub parent_id: Option<ReviewId>,
    pub content: String,
    pub score: i32,
}

impl NewReview {
    /// Build an unsaved review from a create request and its resolved writer and stay.
    pub fn from_request(
        request: &CreateReviewRequest,
        writer: &User,
        stay: &Stay,
    ) -> CoreResult<Self> {
        if request.content.trim().is_empty() {
            return Err(CoreError::InvalidReview {
                reason: "content must not be empty".to_string(),
            });
        }

        Ok(Self {
            stay_id: stay.id,
            writer: writer.clone(),
            parent_id: None,
            content: request.content.clone(),
            score: request.score,
        })
    }

    /// Link this review as a reply to `parent`.
    ///
    /// A reply must live on the same stay as its parent, and the link is set at most once.
    pub fn attach_parent(&mut self, parent: &Review) -> CoreResult<()> {
        if let Some(existing) = self.parent_id {
            return Err(CoreError::InvalidReview {
                reason: format!("parent already set to review {existing}"),
            });
        }
        if parent.stay_id != self.stay_id {
            return Err(CoreError::ParentOnOtherStay {
                parent_id: parent.id,
                stay_id: self.stay_id,
            });
        }
        self.parent_id = Some(parent.id);
        Ok(())
    }
}

/// A review together with its parent, if it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWithParent {
    pub review: Review,
    pub parent: Option<Review>,
}

// ============================================================================
// Request / Response Shapes
// ============================================================================

/// Input for creating a review or a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub user_id: UserId,
    pub content: String,
    pub score: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ReviewId>,
}

/// Public projection of a review's writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriterView {
    pub id: UserId,
    pub name: String,
}

impl From<&User> for WriterView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

/// Acknowledgment returned after a review is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReviewResponse {
    pub review_id: ReviewId,
    pub stay_id: StayId,
    pub writer: WriterView,
    pub content: String,
    pub score: i32,
}

/// Result of a soft delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteResponse {
    pub review_id: ReviewId,
    pub is_deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> User {
        User {
            id: UserId(1),
            name: "alice".to_string(),
        }
    }

    fn stay(id: i64) -> Stay {
        Stay {
            id: StayId(id),
            company_id: CompanyId(10),
            name: format!("stay-{id}"),
        }
    }

    fn request(content: &str) -> CreateReviewRequest {
        CreateReviewRequest {
            user_id: UserId(1),
            content: content.to_string(),
            score: 4,
            parent_id: None,
        }
    }

    fn saved(id: i64, stay_id: i64) -> Review {
        Review {
            id: ReviewId(id),
            stay_id: StayId(stay_id),
            writer: writer(),
            parent_id: None,
            content: "root".to_string(),
            score: 5,
            created_at: Utc::now(),
            state: DeleteState::Active,
        }
    }

    #[test]
    fn test_from_request_copies_fields() {
        let new = NewReview::from_request(&request("Clean rooms"), &writer(), &stay(3)).unwrap();
        assert_eq!(new.stay_id, StayId(3));
        assert_eq!(new.writer.name, "alice");
        assert_eq!(new.content, "Clean rooms");
        assert_eq!(new.score, 4);
        assert!(new.parent_id.is_none());
    }

    #[test]
    fn test_from_request_rejects_blank_content() {
        let err = NewReview::from_request(&request("   "), &writer(), &stay(3)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidReview { .. }));
    }

    #[test]
    fn test_attach_parent_same_stay() {
        let mut new = NewReview::from_request(&request("reply"), &writer(), &stay(3)).unwrap();
        new.attach_parent(&saved(7, 3)).unwrap();
        assert_eq!(new.parent_id, Some(ReviewId(7)));
    }

    #[test]
    fn test_attach_parent_other_stay_rejected() {
        let mut new = NewReview::from_request(&request("reply"), &writer(), &stay(3)).unwrap();
        let err = new.attach_parent(&saved(7, 4)).unwrap_err();
        assert!(matches!(err, CoreError::ParentOnOtherStay { .. }));
        assert!(new.parent_id.is_none());
    }

    #[test]
    fn test_attach_parent_only_once() {
        let mut new = NewReview::from_request(&request("reply"), &writer(), &stay(3)).unwrap();
        new.attach_parent(&saved(7, 3)).unwrap();
        assert!(new.attach_parent(&saved(8, 3)).is_err());
        assert_eq!(new.parent_id, Some(ReviewId(7)));
    }

    #[test]
    fn test_mark_deleted_is_idempotent() {
        let mut review = saved(1, 1);
        assert!(!review.is_deleted());
        review.mark_deleted();
        review.mark_deleted();
        assert_eq!(review.state, DeleteState::Deleted);
    }

    #[test]
    fn test_delete_state_storage_roundtrip() {
        assert_eq!(DeleteState::parse("active").unwrap(), DeleteState::Active);
        assert_eq!(
            DeleteState::parse(DeleteState::Deleted.as_str()).unwrap(),
            DeleteState::Deleted
        );
        assert!(DeleteState::parse("gone").is_err());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&ReviewId(42)).unwrap();
        assert_eq!(json, "42");
    }
}
