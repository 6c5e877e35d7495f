//! Reply-tree assembly.
//!
//! Turns the flat, creation-ordered review rows of one stay into a forest of
//! root reviews with nested replies. Parents are referenced by id; children
//! are derived per call from an index, so no node ever points back at its
//! parent.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Review, ReviewId, StayId, WriterView};

/// One review in the list view, with its replies nested in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewNode {
    pub id: ReviewId,
    pub writer: WriterView,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub score: i32,
    /// Size of the whole flat input, identical on every node.
    pub total_count: usize,
    pub children: Vec<ReviewNode>,
}

/// A single review with its direct replies (one level only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewDetail {
    pub id: ReviewId,
    pub stay_id: StayId,
    pub parent_id: Option<ReviewId>,
    pub writer: WriterView,
    pub content: String,
    pub score: i32,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub children: Vec<ReviewDetail>,
}

impl ReviewDetail {
    fn leaf(review: &Review) -> Self {
        Self {
            id: review.id,
            stay_id: review.stay_id,
            parent_id: review.parent_id,
            writer: WriterView::from(&review.writer),
            content: review.content.clone(),
            score: review.score,
            created_at: review.created_at,
            is_deleted: review.is_deleted(),
            children: Vec::new(),
        }
    }
}

/// Build the root-level forest for one stay.
///
/// Single pass over `reviews`. A reply whose parent has not appeared earlier
/// in the input is dropped together with anything hanging below it; it is
/// never promoted to a root.
#[must_use]
pub fn build_forest(reviews: &[Review]) -> Vec<ReviewNode> {
    let total_count = reviews.len();
    let mut seen: HashSet<ReviewId> = HashSet::with_capacity(total_count);
    let mut children: HashMap<ReviewId, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    for (idx, review) in reviews.iter().enumerate() {
        seen.insert(review.id);
        match review.parent_id {
            None => roots.push(idx),
            Some(parent_id) if seen.contains(&parent_id) && parent_id != review.id => {
                children.entry(parent_id).or_default().push(idx);
            }
            Some(parent_id) => {
                tracing::debug!(
                    review_id = %review.id,
                    parent_id = %parent_id,
                    "Dropping reply whose parent was not seen earlier"
                );
            }
        }
    }

    roots
        .into_iter()
        .map(|idx| assemble(reviews, idx, &children, total_count))
        .collect()
}

fn assemble(
    reviews: &[Review],
    idx: usize,
    children: &HashMap<ReviewId, Vec<usize>>,
    total_count: usize,
) -> ReviewNode {
    let review = &reviews[idx];
    let replies = children
        .get(&review.id)
        .map(|kids| {
            kids.iter()
                .map(|&kid| assemble(reviews, kid, children, total_count))
                .collect()
        })
        .unwrap_or_default();

    ReviewNode {
        id: review.id,
        writer: WriterView::from(&review.writer),
        content: review.content.clone(),
        created_at: review.created_at,
        score: review.score,
        total_count,
        children: replies,
    }
}

/// Build the detail view for `review` from its candidate replies.
///
/// Only rows whose parent is `review` are kept, in input order, and each of
/// them is rendered without children of its own.
#[must_use]
pub fn build_detail(review: &Review, replies: &[Review]) -> ReviewDetail {
    let mut detail = ReviewDetail::leaf(review);
    detail.children = replies
        .iter()
        .filter(|reply| reply.parent_id == Some(review.id))
        .map(ReviewDetail::leaf)
        .collect();
    detail
}

/// Count every node in a forest, roots included.
#[must_use]
pub fn node_count(forest: &[ReviewNode]) -> usize {
    forest
        .iter()
        .map(|node| 1 + node_count(&node.children))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeleteState, User, UserId};
    use chrono::Duration;

    fn review(id: i64, parent: Option<i64>) -> Review {
        let base = DateTime::parse_from_rfc3339("2025-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Review {
            id: ReviewId(id),
            stay_id: StayId(1),
            writer: User {
                id: UserId(100 + id),
                name: format!("guest-{id}"),
            },
            parent_id: parent.map(ReviewId),
            content: format!("review {id}"),
            score: 4,
            created_at: base + Duration::minutes(id),
            state: DeleteState::Active,
        }
    }

    fn ids(nodes: &[ReviewNode]) -> Vec<i64> {
        nodes.iter().map(|n| n.id.0).collect()
    }

    fn assert_total_count(nodes: &[ReviewNode], expected: usize) {
        for node in nodes {
            assert_eq!(node.total_count, expected, "node {}", node.id);
            assert_total_count(&node.children, expected);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(build_forest(&[]).is_empty());
    }

    #[test]
    fn test_nested_replies() {
        let input = vec![
            review(1, None),
            review(2, Some(1)),
            review(3, None),
            review(4, Some(2)),
        ];
        let forest = build_forest(&input);

        assert_eq!(ids(&forest), vec![1, 3]);
        assert_eq!(ids(&forest[0].children), vec![2]);
        assert_eq!(ids(&forest[0].children[0].children), vec![4]);
        assert!(forest[1].children.is_empty());
        assert_eq!(node_count(&forest), 4);
    }

    #[test]
    fn test_total_count_uniform() {
        let input = vec![
            review(1, None),
            review(2, Some(1)),
            review(3, None),
            review(4, Some(2)),
        ];
        let forest = build_forest(&input);

        assert_total_count(&forest, 4);
    }

    #[test]
    fn test_orphan_reply_dropped() {
        let forest = build_forest(&[review(5, Some(99))]);
        assert!(forest.is_empty());
    }

    #[test]
    fn test_orphan_descendants_dropped() {
        let input = vec![review(1, None), review(5, Some(99)), review(6, Some(5))];
        let forest = build_forest(&input);
        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(node_count(&forest), 1);
        // Count still reflects the whole input.
        assert_eq!(forest[0].total_count, 3);
    }

    #[test]
    fn test_parent_after_child_drops_child() {
        let input = vec![review(2, Some(1)), review(1, None)];
        let forest = build_forest(&input);
        assert_eq!(ids(&forest), vec![1]);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_sibling_order_follows_input() {
        let input = vec![
            review(1, None),
            review(9, Some(1)),
            review(3, None),
            review(4, Some(1)),
            review(2, Some(1)),
        ];
        let forest = build_forest(&input);
        assert_eq!(ids(&forest), vec![1, 3]);
        assert_eq!(ids(&forest[0].children), vec![9, 4, 2]);
    }

    #[test]
    fn test_self_parent_dropped() {
        let forest = build_forest(&[review(1, None), review(2, Some(2))]);
        assert_eq!(ids(&forest), vec![1]);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_node_projects_writer() {
        let forest = build_forest(&[review(1, None)]);
        assert_eq!(forest[0].writer.name, "guest-1");
        assert_eq!(forest[0].writer.id, UserId(101));
        assert_eq!(forest[0].content, "review 1");
    }

    #[test]
    fn test_detail_has_direct_children_only() {
        let root = review(1, None);
        let replies = vec![review(2, Some(1)), review(3, Some(2)), review(4, Some(1))];
        let detail = build_detail(&root, &replies);

        assert_eq!(detail.id, ReviewId(1));
        let child_ids: Vec<i64> = detail.children.iter().map(|c| c.id.0).collect();
        assert_eq!(child_ids, vec![2, 4]);
        assert!(detail.children.iter().all(|c| c.children.is_empty()));
    }

    #[test]
    fn test_detail_reports_delete_flag() {
        let mut root = review(1, None);
        root.mark_deleted();
        let detail = build_detail(&root, &[]);
        assert!(detail.is_deleted);
        assert!(detail.children.is_empty());
    }
}
