//! Review service — insert, select, detail, delete.

use tracing::{debug, info, warn};

use crate::access::{self, Actor};
use crate::model::{
    CreateReviewRequest, CreateReviewResponse, DeleteResponse, NewReview, ReviewId, StayId,
    WriterView,
};
use crate::store::ReviewStore;
use crate::tree::{build_detail, build_forest, ReviewDetail, ReviewNode};

use super::{CoreError, CoreResult};

/// Service for review operations.
pub struct ReviewService<'a, S: ReviewStore> {
    store: &'a S,
}

impl<'a, S: ReviewStore> ReviewService<'a, S> {
    pub(crate) const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Post a review, or a reply when `request.parent_id` is set.
    ///
    /// Writer, stay, and parent resolution happen in the same unit of work as
    /// the write, so a failed lookup leaves nothing behind.
    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub fn insert(
        &self,
        stay_id: StayId,
        request: &CreateReviewRequest,
    ) -> CoreResult<CreateReviewResponse> {
        self.store.unit_of_work(|store| {
            let writer = store
                .find_user(request.user_id)?
                .ok_or(CoreError::UserNotFound {
                    user_id: request.user_id,
                })?;

            let stay = store
                .find_stay(stay_id)?
                .ok_or(CoreError::StayNotFound { stay_id })?;

            let mut review = NewReview::from_request(request, &writer, &stay)?;

            if let Some(parent_id) = request.parent_id {
                let parent = store
                    .find_review(parent_id)?
                    .ok_or(CoreError::ParentNotFound { parent_id })?;
                review.attach_parent(&parent)?;
            }

            let saved = store.save(&review)?;
            info!(review_id = %saved.id, parent_id = ?saved.parent_id, "Review created");

            Ok(CreateReviewResponse {
                review_id: saved.id,
                stay_id,
                writer: WriterView::from(&writer),
                content: saved.content,
                score: saved.score,
            })
        })
    }

    /// List the review forest of a stay for its owning company.
    ///
    /// Access is checked before any review row is read.
    #[tracing::instrument(skip(self))]
    pub fn select(&self, stay_id: StayId, actor: Actor) -> CoreResult<Vec<ReviewNode>> {
        access::require_company(actor).inspect_err(|denied| {
            warn!(%denied, "Review list denied");
        })?;

        let stay = self
            .store
            .find_stay(stay_id)?
            .ok_or(CoreError::StayNotFound { stay_id })?;

        let owner = self
            .store
            .find_owning_company(stay.id)?
            .ok_or(CoreError::CompanyNotFound { stay_id })?;

        access::check_list(actor, stay.id, &owner).inspect_err(|denied| {
            warn!(%denied, "Review list denied");
        })?;

        let reviews = self.store.find_all_for_stay(stay.id)?;
        let forest = build_forest(&reviews);
        debug!(rows = reviews.len(), roots = forest.len(), "Built review forest");

        Ok(forest)
    }

    /// Show one review with its direct replies.
    #[tracing::instrument(skip(self))]
    pub fn detail(&self, review_id: ReviewId, actor: Actor) -> CoreResult<ReviewDetail> {
        access::check_detail(actor).inspect_err(|denied| {
            warn!(%denied, "Review detail denied");
        })?;

        let review = self
            .store
            .find_review(review_id)?
            .ok_or(CoreError::ReviewNotFound { review_id })?;

        let replies = self.store.find_replies(review.id)?;
        debug!(replies = replies.len(), "Loaded review detail");

        Ok(build_detail(&review, &replies))
    }

    /// Soft-delete a review. Deleting an already-deleted review is a no-op.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, review_id: ReviewId) -> CoreResult<DeleteResponse> {
        self.store.unit_of_work(|store| {
            let loaded = store
                .find_review_with_parent(review_id)?
                .ok_or(CoreError::ReviewNotFound { review_id })?;
            let mut review = loaded.review;

            if review.is_deleted() {
                debug!("Review already deleted");
            } else {
                review.mark_deleted();
                store.mark_deleted(&review)?;
                info!(
                    parent_id = ?loaded.parent.as_ref().map(|p| p.id),
                    "Review soft-deleted"
                );
            }

            Ok(DeleteResponse {
                review_id: review.id,
                is_deleted: review.is_deleted(),
            })
        })
    }
}
