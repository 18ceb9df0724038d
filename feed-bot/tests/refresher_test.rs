//! Integration tests for [`feed_bot::FeedRefresher`].
//!
//! Feeds are served by a mockito HTTP server; posts are captured by the
//! recording Bot mock. Covers the dedup ledger, the per-pass entry cap,
//! per-feed failure isolation, and serialization of concurrent passes.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use feed_bot::{FeedClient, FeedRefresher};
use storage::ConfigRepository;

mod mock_bot;
use mock_bot::RecordingBot;

const CHANNEL_ID: i64 = 42;

fn rss_body(links: &[&str]) -> String {
    let items: String = links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            format!(
                "<item><title>Entry {}</title><link>{}</link></item>",
                i + 1,
                link
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Example</title>{}</channel></rss>"#,
        items
    )
}

struct Fixture {
    refresher: Arc<FeedRefresher>,
    repo: Arc<ConfigRepository>,
    bot: Arc<RecordingBot>,
}

async fn fixture(database_url: &str) -> Fixture {
    let repo = Arc::new(
        ConfigRepository::new(database_url)
            .await
            .expect("Failed to create repository"),
    );
    let bot = Arc::new(RecordingBot::new());
    let refresher = Arc::new(FeedRefresher::new(
        repo.clone(),
        bot.clone(),
        FeedClient::new().expect("Failed to build feed client"),
    ));
    Fixture {
        refresher,
        repo,
        bot,
    }
}

/// **Test: Entries are posted once, with thread titles, and never reposted.**
///
/// **Setup:** Configured bot subscribed to a 2-item feed.
/// **Action:** Two refresh passes.
/// **Expected:** First pass posts both entries (message text `**title**\nlink`,
/// one thread per entry); second pass posts nothing.
#[tokio::test]
async fn test_posts_once_across_passes() {
    let mut server = mockito::Server::new_async().await;
    let _feed = server
        .mock("GET", "/feed.xml")
        .with_status(200)
        .with_header("content-type", "application/rss+xml")
        .with_body(rss_body(&["http://ex.com/1", "http://ex.com/2"]))
        .create_async()
        .await;

    let fx = fixture("sqlite::memory:").await;
    fx.repo
        .complete_setup(CHANNEL_ID, &format!("{}/feed.xml", server.url()))
        .await
        .unwrap();

    let outcome = fx.refresher.refresh().await.unwrap();
    assert_eq!(outcome.posted, 2);
    assert!(outcome.failures.is_empty());

    let texts = fx.bot.sent_texts().await;
    assert_eq!(
        texts,
        vec![
            "**Entry 1**\nhttp://ex.com/1".to_string(),
            "**Entry 2**\nhttp://ex.com/2".to_string(),
        ]
    );
    let threads = fx.bot.threads.lock().await;
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0].title, "Entry 1");
    assert_eq!(threads[0].chat_id, CHANNEL_ID);
    drop(threads);

    let outcome = fx.refresher.refresh().await.unwrap();
    assert_eq!(outcome.posted, 0);
    assert_eq!(fx.bot.sent_texts().await.len(), 2);
}

/// **Test: Only the first 5 entries of a feed are considered per pass.**
#[tokio::test]
async fn test_caps_entries_per_pass() {
    let mut server = mockito::Server::new_async().await;
    let links: Vec<String> = (1..=6).map(|i| format!("http://ex.com/{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    let _feed = server
        .mock("GET", "/feed.xml")
        .with_status(200)
        .with_body(rss_body(&link_refs))
        .create_async()
        .await;

    let fx = fixture("sqlite::memory:").await;
    fx.repo
        .complete_setup(CHANNEL_ID, &format!("{}/feed.xml", server.url()))
        .await
        .unwrap();

    let outcome = fx.refresher.refresh().await.unwrap();
    assert_eq!(outcome.posted, 5);

    let texts = fx.bot.sent_texts().await;
    assert_eq!(texts.len(), 5);
    assert!(texts.iter().all(|t| !t.contains("http://ex.com/6")));
}

/// **Test: A broken feed does not block the remaining feeds in the pass.**
///
/// **Setup:** Two subscriptions: the first returns HTTP 500, the second is fine.
/// **Action:** One refresh pass.
/// **Expected:** One recorded failure for the broken url; the healthy feed's
/// entry is still posted.
#[tokio::test]
async fn test_broken_feed_is_isolated() {
    let mut server = mockito::Server::new_async().await;
    let _broken = server
        .mock("GET", "/broken.xml")
        .with_status(500)
        .create_async()
        .await;
    let _good = server
        .mock("GET", "/good.xml")
        .with_status(200)
        .with_body(rss_body(&["http://ex.com/1"]))
        .create_async()
        .await;

    let fx = fixture("sqlite::memory:").await;
    fx.repo
        .complete_setup(CHANNEL_ID, &format!("{}/broken.xml", server.url()))
        .await
        .unwrap();
    fx.repo
        .add_feed(&format!("{}/good.xml", server.url()))
        .await
        .unwrap();

    let outcome = fx.refresher.refresh().await.unwrap();

    assert_eq!(outcome.posted, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].0.ends_with("/broken.xml"));
    assert_eq!(
        fx.bot.sent_texts().await,
        vec!["**Entry 1**\nhttp://ex.com/1".to_string()]
    );
}

/// **Test: An unparseable document is a per-feed failure, not a crash.**
#[tokio::test]
async fn test_malformed_feed_is_isolated() {
    let mut server = mockito::Server::new_async().await;
    let _bad = server
        .mock("GET", "/feed.xml")
        .with_status(200)
        .with_body("<html>not a feed</html>")
        .create_async()
        .await;

    let fx = fixture("sqlite::memory:").await;
    fx.repo
        .complete_setup(CHANNEL_ID, &format!("{}/feed.xml", server.url()))
        .await
        .unwrap();

    let outcome = fx.refresher.refresh().await.unwrap();
    assert_eq!(outcome.posted, 0);
    assert_eq!(outcome.failures.len(), 1);
}

/// **Test: Refresh without completed setup is a no-op.**
#[tokio::test]
async fn test_unconfigured_refresh_is_noop() {
    let fx = fixture("sqlite::memory:").await;

    let outcome = fx.refresher.refresh().await.unwrap();

    assert_eq!(outcome.posted, 0);
    assert!(outcome.failures.is_empty());
    assert!(fx.bot.sent_texts().await.is_empty());
}

/// **Test: A failed send leaves the entry unrecorded so a later pass retries it.**
///
/// **Setup:** Configured 1-item feed; mock bot set to fail sends.
/// **Action:** One failing pass, then one with sends restored.
/// **Expected:** First pass posts nothing and records the failure; second pass
/// posts the entry exactly once.
#[tokio::test]
async fn test_failed_send_retries_next_pass() {
    let mut server = mockito::Server::new_async().await;
    let _feed = server
        .mock("GET", "/feed.xml")
        .with_status(200)
        .with_body(rss_body(&["http://ex.com/1"]))
        .create_async()
        .await;

    let fx = fixture("sqlite::memory:").await;
    fx.repo
        .complete_setup(CHANNEL_ID, &format!("{}/feed.xml", server.url()))
        .await
        .unwrap();

    fx.bot.fail_sends.store(true, Ordering::SeqCst);
    let outcome = fx.refresher.refresh().await.unwrap();
    assert_eq!(outcome.posted, 0);
    assert_eq!(outcome.failures.len(), 1);

    fx.bot.fail_sends.store(false, Ordering::SeqCst);
    let outcome = fx.refresher.refresh().await.unwrap();
    assert_eq!(outcome.posted, 1);
    assert_eq!(fx.bot.sent_texts().await.len(), 1);
}

/// **Test: Two concurrent refresh calls post a new entry exactly once.**
///
/// **Setup:** Configured 1-item feed on an on-disk database (concurrent
/// connections must see one store).
/// **Action:** `tokio::join!` two refresh calls on the same refresher.
/// **Expected:** Exactly one post in total; passes serialized by the lock.
#[tokio::test]
async fn test_concurrent_refresh_posts_once() {
    let mut server = mockito::Server::new_async().await;
    let _feed = server
        .mock("GET", "/feed.xml")
        .with_status(200)
        .with_body(rss_body(&["http://ex.com/1"]))
        .create_async()
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("feed_bot.db");
    let fx = fixture(db_path.to_str().expect("utf-8 path")).await;
    fx.repo
        .complete_setup(CHANNEL_ID, &format!("{}/feed.xml", server.url()))
        .await
        .unwrap();

    let (a, b) = tokio::join!(fx.refresher.refresh(), fx.refresher.refresh());
    let total = a.unwrap().posted + b.unwrap().posted;

    assert_eq!(total, 1);
    assert_eq!(fx.bot.sent_texts().await.len(), 1);
}
