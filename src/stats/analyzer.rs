use crate::db::{Comment, CommentStatus};

/// Score a comment. The baseline is its vote count; anything monotonic in
/// `votes` preserves the ranking contract.
fn score(comment: &Comment) -> i64 {
    comment.votes
}

/// Rank a post's comments for the "top comments" annotation.
///
/// Only published comments participate. The input is not mutated; calling
/// this twice on the same slice yields the same ranking.
#[must_use]
pub fn analyze(comments: &[Comment]) -> CommentAnalyzer {
    let mut ranked: Vec<Comment> = comments
        .iter()
        .filter(|c| c.status_enum() == Some(CommentStatus::Published))
        .cloned()
        .collect();

    // Highest score first; equal scores rank the most recent comment first.
    ranked.sort_by(|a, b| {
        score(b)
            .cmp(&score(a))
            .then_with(|| b.creation_date.cmp(&a.creation_date))
    });

    CommentAnalyzer { ranked }
}

/// A ranked view over a post's published comments.
#[derive(Debug, Clone)]
pub struct CommentAnalyzer {
    ranked: Vec<Comment>,
}

impl CommentAnalyzer {
    /// The top `k` comments with their scores, best first.
    ///
    /// Yields at most `k` items; fewer when the population is smaller.
    pub fn top(&self, k: usize) -> impl Iterator<Item = (&Comment, i64)> + '_ {
        self.ranked.iter().take(k).map(|c| (c, score(c)))
    }

    /// Number of comments that participated in the ranking.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: i64, votes: i64, status: &str, creation_date: &str) -> Comment {
        Comment {
            id,
            body: format!("comment {id}"),
            status: status.to_string(),
            votes,
            author_id: Some(1),
            post_id: 1,
            creation_date: creation_date.to_string(),
            last_update: creation_date.to_string(),
        }
    }

    #[test]
    fn test_top_sorted_by_votes_descending() {
        let comments = vec![
            comment(1, 3, "published", "2024-01-01 10:00:00"),
            comment(2, 10, "published", "2024-01-02 10:00:00"),
            comment(3, 7, "published", "2024-01-03 10:00:00"),
        ];

        let top: Vec<i64> = analyze(&comments).top(10).map(|(c, _)| c.id).collect();
        assert_eq!(top, vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_broken_by_recency() {
        let comments = vec![
            comment(1, 5, "published", "2024-01-01 10:00:00"),
            comment(2, 5, "published", "2024-01-03 10:00:00"),
            comment(3, 5, "published", "2024-01-02 10:00:00"),
        ];

        let top: Vec<i64> = analyze(&comments).top(10).map(|(c, _)| c.id).collect();
        assert_eq!(top, vec![2, 3, 1]);
    }

    #[test]
    fn test_top_k_truncates() {
        let comments: Vec<Comment> = (1..=5)
            .map(|i| comment(i, i, "published", "2024-01-01 10:00:00"))
            .collect();

        let analyzer = analyze(&comments);
        assert_eq!(analyzer.top(2).count(), 2);
        assert_eq!(analyzer.top(5).count(), 5);
        // k beyond the population returns everything available.
        assert_eq!(analyzer.top(100).count(), 5);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let analyzer = analyze(&[]);
        assert!(analyzer.is_empty());
        assert_eq!(analyzer.top(10).count(), 0);
        assert_eq!(analyzer.top(0).count(), 0);
    }

    #[test]
    fn test_non_published_comments_excluded() {
        let comments = vec![
            comment(1, 100, "non_published", "2024-01-01 10:00:00"),
            comment(2, 1, "published", "2024-01-02 10:00:00"),
        ];

        let analyzer = analyze(&comments);
        assert_eq!(analyzer.len(), 1);
        let top: Vec<i64> = analyzer.top(10).map(|(c, _)| c.id).collect();
        assert_eq!(top, vec![2]);
    }

    #[test]
    fn test_no_element_appears_twice() {
        let comments = vec![
            comment(1, 4, "published", "2024-01-01 10:00:00"),
            comment(2, 4, "published", "2024-01-01 10:00:00"),
            comment(3, 2, "published", "2024-01-02 10:00:00"),
        ];

        let ids: Vec<i64> = analyze(&comments).top(10).map(|(c, _)| c.id).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids, deduped);
    }

    #[test]
    fn test_score_exposed_with_comment() {
        let comments = vec![comment(1, 42, "published", "2024-01-01 10:00:00")];
        let analyzer = analyze(&comments);
        let (c, s) = analyzer.top(1).next().expect("one comment");
        assert_eq!(c.id, 1);
        assert_eq!(s, 42);
    }

    #[test]
    fn test_input_not_mutated() {
        let comments = vec![
            comment(1, 1, "published", "2024-01-01 10:00:00"),
            comment(2, 9, "published", "2024-01-02 10:00:00"),
        ];
        let before: Vec<i64> = comments.iter().map(|c| c.id).collect();

        let _ = analyze(&comments);
        let after: Vec<i64> = comments.iter().map(|c| c.id).collect();
        assert_eq!(before, after);
    }
}
