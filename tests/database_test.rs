//! Integration tests for database operations.

use coolpress::db::{
    count_comments_for_post, delete_category, delete_cool_user, delete_post, find_posts_by_title,
    get_category_by_slug, get_comments_for_post, get_cool_user_by_username, get_post,
    insert_category, insert_comment, insert_cool_user, insert_post, list_authors, list_categories,
    list_posts_by_author, list_published_posts, list_recent_posts, CommentStatus, Database,
    NewCategory, NewComment, NewCoolUser, NewPost, PostStatus,
};
use tempfile::TempDir;

async fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.sqlite");
    let db = Database::new(&db_path)
        .await
        .expect("Failed to create database");
    (db, temp_dir)
}

fn new_user(username: &str) -> NewCoolUser {
    NewCoolUser {
        username: username.to_string(),
        ..NewCoolUser::default()
    }
}

async fn seed_post(db: &Database, title: &str) -> (i64, i64, i64) {
    let author_id = insert_cool_user(db.pool(), &new_user("oscar")).await.unwrap();
    let category_id = insert_category(
        db.pool(),
        &NewCategory {
            label: "Tech".to_string(),
            slug: "tech".to_string(),
            created_by: Some(author_id),
        },
    )
    .await
    .unwrap();
    let post_id = insert_post(
        db.pool(),
        &NewPost {
            title: title.to_string(),
            body: Some("a new mac is out there".to_string()),
            image_link: None,
            status: PostStatus::Published,
            author_id,
            category_id,
            publish_date: None,
        },
    )
    .await
    .unwrap();
    (author_id, category_id, post_id)
}

#[tokio::test]
async fn test_insert_and_get_cool_user() {
    let (db, _temp_dir) = setup_db().await;

    let id = insert_cool_user(
        db.pool(),
        &NewCoolUser {
            username: "oscar".to_string(),
            email: Some("oscar@example.com".to_string()),
            first_name: Some("Oscar".to_string()),
            last_name: None,
            github_profile: Some("oscar".to_string()),
        },
    )
    .await
    .expect("Failed to insert user");
    assert!(id > 0);

    let user = get_cool_user_by_username(db.pool(), "oscar")
        .await
        .expect("Database error")
        .expect("User not found");

    assert_eq!(user.id, id);
    assert_eq!(user.email.as_deref(), Some("oscar@example.com"));
    assert_eq!(user.gravatar_link, None);
    assert_eq!(user.github_repos, None);
}

#[tokio::test]
async fn test_insert_and_get_category() {
    let (db, _temp_dir) = setup_db().await;

    insert_category(
        db.pool(),
        &NewCategory {
            label: "General".to_string(),
            slug: "general".to_string(),
            created_by: None,
        },
    )
    .await
    .expect("Failed to insert category");

    let category = get_category_by_slug(db.pool(), "general")
        .await
        .expect("Database error")
        .expect("Category not found");

    assert_eq!(category.label, "General");
    assert_eq!(category.created_by, None);
}

#[tokio::test]
async fn test_post_round_trip_and_defaults() {
    let (db, _temp_dir) = setup_db().await;
    let (author_id, category_id, post_id) = seed_post(&db, "a new mac is out there").await;

    let post = get_post(db.pool(), post_id)
        .await
        .expect("Database error")
        .expect("Post not found");

    assert_eq!(post.title, "a new mac is out there");
    assert_eq!(post.author_id, author_id);
    assert_eq!(post.category_id, category_id);
    assert_eq!(post.status_enum(), Some(PostStatus::Published));
    assert_eq!(post.publish_date, None);
    assert!(!post.creation_date.is_empty());
}

#[tokio::test]
async fn test_comments_filtered_by_status() {
    let (db, _temp_dir) = setup_db().await;
    let (author_id, _, post_id) = seed_post(&db, "post").await;

    insert_comment(
        db.pool(),
        &NewComment {
            body: "visible".to_string(),
            status: CommentStatus::Published,
            votes: 10,
            author_id: Some(author_id),
            post_id,
        },
    )
    .await
    .unwrap();
    insert_comment(
        db.pool(),
        &NewComment {
            body: "hidden".to_string(),
            status: CommentStatus::NonPublished,
            votes: 10,
            author_id: Some(author_id),
            post_id,
        },
    )
    .await
    .unwrap();

    let published = get_comments_for_post(db.pool(), post_id, Some(CommentStatus::Published))
        .await
        .unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].body, "visible");

    let all = get_comments_for_post(db.pool(), post_id, None).await.unwrap();
    assert_eq!(all.len(), 2);

    // The unfiltered count matches the trending ranker's input.
    assert_eq!(count_comments_for_post(db.pool(), post_id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_comments_ordered_newest_first() {
    let (db, _temp_dir) = setup_db().await;
    let (author_id, _, post_id) = seed_post(&db, "post").await;

    for (body, date) in [
        ("oldest", "2024-01-01 10:00:00"),
        ("newest", "2024-01-03 10:00:00"),
        ("middle", "2024-01-02 10:00:00"),
    ] {
        let id = insert_comment(
            db.pool(),
            &NewComment {
                body: body.to_string(),
                status: CommentStatus::Published,
                votes: 1,
                author_id: Some(author_id),
                post_id,
            },
        )
        .await
        .unwrap();
        sqlx::query("UPDATE comments SET creation_date = ? WHERE id = ?")
            .bind(date)
            .bind(id)
            .execute(db.pool())
            .await
            .unwrap();
    }

    let comments = get_comments_for_post(db.pool(), post_id, None).await.unwrap();
    let bodies: Vec<&str> = comments.iter().map(|c| c.body.as_str()).collect();
    assert_eq!(bodies, vec!["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn test_deleting_category_cascades_to_posts_and_comments() {
    let (db, _temp_dir) = setup_db().await;
    let (author_id, category_id, post_id) = seed_post(&db, "doomed").await;

    insert_comment(
        db.pool(),
        &NewComment {
            body: "also doomed".to_string(),
            status: CommentStatus::Published,
            votes: 1,
            author_id: Some(author_id),
            post_id,
        },
    )
    .await
    .unwrap();

    delete_category(db.pool(), category_id).await.unwrap();

    assert!(get_post(db.pool(), post_id).await.unwrap().is_none());
    let comments = get_comments_for_post(db.pool(), post_id, None).await.unwrap();
    assert!(comments.is_empty());
}

#[tokio::test]
async fn test_deleting_author_cascades_posts_but_orphans_comments() {
    let (db, _temp_dir) = setup_db().await;
    let (author_id, category_id, post_id) = seed_post(&db, "authored").await;

    // A second author's post carries the first author's comment.
    let other_id = insert_cool_user(db.pool(), &new_user("maria")).await.unwrap();
    let other_post_id = insert_post(
        db.pool(),
        &NewPost {
            title: "survivor".to_string(),
            body: None,
            image_link: None,
            status: PostStatus::Published,
            author_id: other_id,
            category_id,
            publish_date: None,
        },
    )
    .await
    .unwrap();
    insert_comment(
        db.pool(),
        &NewComment {
            body: "historical record".to_string(),
            status: CommentStatus::Published,
            votes: 1,
            author_id: Some(author_id),
            post_id: other_post_id,
        },
    )
    .await
    .unwrap();

    delete_cool_user(db.pool(), author_id).await.unwrap();

    // Their post is gone, but the comment on someone else's post survives
    // without an author.
    assert!(get_post(db.pool(), post_id).await.unwrap().is_none());
    let comments = get_comments_for_post(db.pool(), other_post_id, None)
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author_id, None);
}

#[tokio::test]
async fn test_deleting_post_cascades_comments() {
    let (db, _temp_dir) = setup_db().await;
    let (author_id, _, post_id) = seed_post(&db, "short lived").await;

    insert_comment(
        db.pool(),
        &NewComment {
            body: "gone with the post".to_string(),
            status: CommentStatus::Published,
            votes: 1,
            author_id: Some(author_id),
            post_id,
        },
    )
    .await
    .unwrap();

    delete_post(db.pool(), post_id).await.unwrap();

    let comments = get_comments_for_post(db.pool(), post_id, None).await.unwrap();
    assert!(comments.is_empty());
}

#[tokio::test]
async fn test_find_posts_by_title_for_dedup() {
    let (db, _temp_dir) = setup_db().await;
    let (author_id, category_id, _) = seed_post(&db, "shared title").await;

    let candidate = NewPost {
        title: "shared title".to_string(),
        body: Some("a new mac is out there".to_string()),
        image_link: None,
        status: PostStatus::Published,
        author_id,
        category_id,
        publish_date: None,
    };

    let candidates = find_posts_by_title(db.pool(), "shared title").await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert!(candidate.content_equals(&candidates[0]));

    let different = NewPost {
        body: Some("different body".to_string()),
        ..candidate
    };
    assert!(!different.content_equals(&candidates[0]));
}

#[tokio::test]
async fn test_listings() {
    let (db, _temp_dir) = setup_db().await;
    let (author_id, category_id, _) = seed_post(&db, "published post").await;

    // A draft should show in recent posts but not the published listing.
    insert_post(
        db.pool(),
        &NewPost {
            title: "draft post".to_string(),
            body: None,
            image_link: None,
            status: PostStatus::Draft,
            author_id,
            category_id,
            publish_date: None,
        },
    )
    .await
    .unwrap();

    let recent = list_recent_posts(db.pool(), 10).await.unwrap();
    assert_eq!(recent.len(), 2);

    let published = list_published_posts(db.pool(), 10).await.unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].title, "published post");

    let by_author = list_posts_by_author(db.pool(), author_id, 10).await.unwrap();
    assert_eq!(by_author.len(), 1);

    let categories = list_categories(db.pool()).await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].post_count, 2);

    let authors = list_authors(db.pool()).await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].post_count, 2);
}
