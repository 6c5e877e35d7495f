//! Typed error types for the stayreview-core service layer.

use thiserror::Error;

use crate::access::AccessDenied;
use crate::model::{ReviewId, StayId, UserId};

/// Result type alias for core service operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the stayreview-core service layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The data directory or database has not been created.
    #[error("No stayreview database at {path}. Run 'stayreview init' first.")]
    NotInitialized { path: String },

    /// The referenced user does not exist.
    #[error("User does not exist: {user_id}")]
    UserNotFound { user_id: UserId },

    /// The referenced stay does not exist.
    #[error("Stay not found: {stay_id}")]
    StayNotFound { stay_id: StayId },

    /// No company owns the stay.
    #[error("No owning company found for stay {stay_id}")]
    CompanyNotFound { stay_id: StayId },

    /// A review was not found.
    #[error("Review not found: {review_id}")]
    ReviewNotFound { review_id: ReviewId },

    /// The review a reply points at does not exist.
    #[error("Parent review not found: {parent_id}")]
    ParentNotFound { parent_id: ReviewId },

    /// A reply must stay on the same stay as its parent.
    #[error("Parent review {parent_id} does not belong to stay {stay_id}")]
    ParentOnOtherStay { parent_id: ReviewId, stay_id: StayId },

    /// The review request failed validation.
    #[error("Invalid review: {reason}")]
    InvalidReview { reason: String },

    /// The actor may not perform this read.
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AccessDenied),

    /// An internal storage or database error.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CoreError {
    /// Whether this error means a referenced entity is absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound { .. }
                | Self::StayNotFound { .. }
                | Self::CompanyNotFound { .. }
                | Self::ReviewNotFound { .. }
                | Self::ParentNotFound { .. }
        )
    }

    /// Whether the actor was denied access.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifiers() {
        assert!(CoreError::UserNotFound { user_id: UserId(1) }.is_not_found());
        assert!(CoreError::ParentNotFound { parent_id: ReviewId(2) }.is_not_found());
        assert!(!CoreError::InvalidReview { reason: "x".into() }.is_not_found());
        assert!(CoreError::from(AccessDenied::Anonymous).is_unauthorized());
    }

    #[test]
    fn test_messages() {
        let err = CoreError::UserNotFound { user_id: UserId(12) };
        assert_eq!(err.to_string(), "User does not exist: 12");
        let err = CoreError::from(AccessDenied::Anonymous);
        assert_eq!(err.to_string(), "Unauthorized: login required");
    }
}
