use std::cmp::Ordering;

use crate::db::PostActivity;

/// Select and order posts by comment-activity signals.
///
/// Posts with fewer than `threshold` comments are dropped. The remainder is
/// ordered by latest comment first; comment volume breaks ties. Posts that
/// qualify without any comment timestamp (possible only with threshold 0)
/// sort last. At most `limit` rows are returned.
#[must_use]
pub fn trending(rows: Vec<PostActivity>, threshold: i64, limit: usize) -> Vec<PostActivity> {
    let mut qualifying: Vec<PostActivity> = rows
        .into_iter()
        .filter(|r| r.comment_count >= threshold)
        .collect();

    qualifying.sort_by(|a, b| {
        cmp_opt_desc(&a.latest_comment_at, &b.latest_comment_at)
            .then_with(|| b.comment_count.cmp(&a.comment_count))
    });
    qualifying.truncate(limit);

    qualifying
}

/// Descending comparison over optional timestamps, None last.
fn cmp_opt_desc(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
