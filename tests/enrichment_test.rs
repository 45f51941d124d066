//! Integration tests for author enrichment against mocked services.

use coolpress::db::{get_cool_user, insert_cool_user, Database, NewCoolUser};
use coolpress::enrichment::{
    gravatar, save_cool_user, EnrichmentConfig, HttpProfileFetcher,
};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROFILE_HTML: &str = r#"
    <html><body>
        <nav class="UnderlineNav-body">
            <a href="/octocat">Overview</a>
            <a href="/octocat?tab=repositories">Repositories <span class="Counter">8</span></a>
            <a href="/octocat?tab=projects">Projects</a>
            <a href="/octocat?tab=packages">Packages</a>
            <a href="/octocat?tab=stars">Stars <span class="Counter">91</span></a>
        </nav>
    </body></html>
"#;

async fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.sqlite");
    let db = Database::new(&db_path)
        .await
        .expect("Failed to create database");
    (db, temp_dir)
}

async fn seed_user(db: &Database, email: Option<&str>, github: Option<&str>) -> i64 {
    insert_cool_user(
        db.pool(),
        &NewCoolUser {
            username: "octocat".to_string(),
            email: email.map(ToString::to_string),
            first_name: None,
            last_name: None,
            github_profile: github.map(ToString::to_string),
        },
    )
    .await
    .expect("Failed to insert user")
}

fn fetcher() -> HttpProfileFetcher {
    HttpProfileFetcher::new(Duration::from_secs(5)).expect("Failed to build fetcher")
}

fn config_for(server: &MockServer) -> EnrichmentConfig {
    EnrichmentConfig {
        gravatar_base_url: server.uri(),
        github_base_url: server.uri(),
    }
}

fn today_utc() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn test_save_enriches_and_persists() {
    let (db, _temp_dir) = setup_db().await;
    let email = "octocat@example.com";
    let id = seed_user(&db, Some(email), Some("octocat")).await;

    let server = MockServer::start().await;
    let digest = gravatar::email_digest(email);
    Mock::given(method("GET"))
        .and(path(format!("/{digest}")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PROFILE_HTML, "text/html"))
        .mount(&server)
        .await;

    let mut user = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    save_cool_user(db.pool(), &mut user, &fetcher(), &config_for(&server))
        .await
        .expect("save failed");

    let stored = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    assert_eq!(
        stored.gravatar_link,
        Some(gravatar::derive_image_link(&server.uri(), email))
    );
    assert!(stored.gravatar_updated_at.is_some());
    assert_eq!(stored.github_repos, Some(8));
    assert_eq!(stored.github_stars, Some(91));
    assert_eq!(stored.last_github_check, Some(today_utc()));
}

#[tokio::test]
async fn test_second_save_same_day_skips_profile_fetch() {
    let (db, _temp_dir) = setup_db().await;
    let id = seed_user(&db, None, Some("octocat")).await;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PROFILE_HTML, "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let f = fetcher();
    let cfg = config_for(&server);

    let mut user = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    save_cool_user(db.pool(), &mut user, &f, &cfg).await.unwrap();

    // Second save the same day: the mock's expectation of exactly one call
    // verifies no re-fetch happens.
    let mut user = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    save_cool_user(db.pool(), &mut user, &f, &cfg).await.unwrap();

    let stored = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    assert_eq!(stored.github_repos, Some(8));
    assert_eq!(stored.github_stars, Some(91));
}

#[tokio::test]
async fn test_failed_avatar_probe_keeps_prior_link() {
    let (db, _temp_dir) = setup_db().await;
    let email = "octocat@example.com";
    let id = seed_user(&db, Some(email), None).await;

    let server = MockServer::start().await;
    let digest = gravatar::email_digest(email);
    Mock::given(method("GET"))
        .and(path(format!("/{digest}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let f = fetcher();
    let cfg = config_for(&server);

    // First save succeeds and stores a link.
    let mut user = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    save_cool_user(db.pool(), &mut user, &f, &cfg).await.unwrap();
    let link_before = get_cool_user(db.pool(), id)
        .await
        .unwrap()
        .unwrap()
        .gravatar_link;
    assert!(link_before.is_some());

    // The service starts failing; the stored link must survive.
    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut user = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    save_cool_user(db.pool(), &mut user, &f, &cfg).await.unwrap();

    let stored = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    assert_eq!(stored.gravatar_link, link_before);
}

#[tokio::test]
async fn test_failed_profile_fetch_leaves_counts_unset() {
    let (db, _temp_dir) = setup_db().await;
    let id = seed_user(&db, None, Some("octocat")).await;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/octocat"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut user = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    save_cool_user(db.pool(), &mut user, &fetcher(), &config_for(&server))
        .await
        .expect("save must not fail on fetch errors");

    let stored = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    assert_eq!(stored.github_repos, None);
    assert_eq!(stored.github_stars, None);
    // Still stale: a later save retries.
    assert_eq!(stored.last_github_check, None);
}

#[tokio::test]
async fn test_save_without_enrichment_sources_is_plain_update() {
    let (db, _temp_dir) = setup_db().await;
    let id = seed_user(&db, None, None).await;

    let server = MockServer::start().await;

    let mut user = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    user.first_name = Some("Octo".to_string());
    save_cool_user(db.pool(), &mut user, &fetcher(), &config_for(&server))
        .await
        .expect("save failed");

    let stored = get_cool_user(db.pool(), id).await.unwrap().unwrap();
    assert_eq!(stored.first_name.as_deref(), Some("Octo"));
    assert_eq!(stored.gravatar_link, None);
    assert_eq!(stored.gravatar_updated_at, None);
}
