//! Implementation of `stayreview reviews` subcommands.

use anyhow::{bail, Result};
use std::path::Path;

use stayreview_core::access::Actor;
use stayreview_core::model::{
    CreateReviewRequest, CreateReviewResponse, DeleteResponse, ReviewId, StayId,
};
use stayreview_core::tree::{ReviewDetail, ReviewNode};

use crate::cli::commands::helpers::open_services;
use crate::output::{Formatter, OutputFormat};

/// Post a review or reply as the acting user.
#[tracing::instrument(skip(db_path, content, format))]
pub fn run_reviews_add(
    db_path: &Path,
    actor: Actor,
    stay: i64,
    content: &str,
    score: i32,
    parent: Option<i64>,
    format: OutputFormat,
) -> Result<CreateReviewResponse> {
    let Actor::User(user_id) = actor else {
        bail!("Posting a review requires --user <id> (or STAYREVIEW_USER)");
    };

    let services = open_services(db_path)?;
    let request = CreateReviewRequest {
        user_id,
        content: content.to_string(),
        score,
        parent_id: parent.map(ReviewId),
    };

    let response = services.reviews().insert(StayId(stay), &request)?;
    Formatter::new(format).print(&response)?;
    Ok(response)
}

/// Print the review forest of a stay.
#[tracing::instrument(skip(db_path, format))]
pub fn run_reviews_list(
    db_path: &Path,
    actor: Actor,
    stay: i64,
    format: OutputFormat,
) -> Result<Vec<ReviewNode>> {
    let services = open_services(db_path)?;
    let forest = services.reviews().select(StayId(stay), actor)?;

    Formatter::new(format).print_list(&forest, "No reviews yet.", "reviews")?;
    Ok(forest)
}

/// Print one review with its direct replies.
#[tracing::instrument(skip(db_path, format))]
pub fn run_reviews_show(
    db_path: &Path,
    actor: Actor,
    review_id: i64,
    format: OutputFormat,
) -> Result<ReviewDetail> {
    let services = open_services(db_path)?;
    let detail = services.reviews().detail(ReviewId(review_id), actor)?;

    Formatter::new(format).print(&detail)?;
    Ok(detail)
}

/// Soft-delete a review.
#[tracing::instrument(skip(db_path, format))]
pub fn run_reviews_delete(
    db_path: &Path,
    review_id: i64,
    format: OutputFormat,
) -> Result<DeleteResponse> {
    let services = open_services(db_path)?;
    let response = services.reviews().delete(ReviewId(review_id))?;

    Formatter::new(format).print(&response)?;
    Ok(response)
}
