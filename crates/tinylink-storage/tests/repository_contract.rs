use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use tinylink_core::{ShortCode, SlimRecord};
use tinylink_storage::{InMemoryRepository, Repository, SqliteRepository, StorageError};
use url::Url;

fn code(value: &str) -> ShortCode {
    ShortCode::new_unchecked(value)
}

fn record(code_str: &str, url: &str) -> SlimRecord {
    SlimRecord::new(code(code_str), Url::parse(url).unwrap(), Timestamp::now())
}

async fn set_inserts_with_zero_count<R: Repository>(repo: &R) {
    let slim = record("abc123", "https://example.com");
    repo.set(&code("abc123"), slim.clone()).await.unwrap();

    let got = repo.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(got.slim, slim);
    assert_eq!(got.access_count, 0);
}

async fn set_updates_only_mutable_fields<R: Repository>(repo: &R) {
    let original = record("abc123", "https://example.com");
    repo.set(&code("abc123"), original.clone()).await.unwrap();
    repo.increment_access_count(&code("abc123")).await.unwrap();

    let replacement = SlimRecord {
        id: uuid::Uuid::new_v4(),
        url: Url::parse("https://updated-example.com").unwrap(),
        shortcode: code("abc123"),
        created_at: original.created_at + SignedDuration::from_hours(1),
        updated_at: original.updated_at + SignedDuration::from_hours(1),
    };
    repo.set(&code("abc123"), replacement.clone()).await.unwrap();

    let got = repo.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(got.slim.id, original.id);
    assert_eq!(got.slim.created_at, original.created_at);
    assert_eq!(got.slim.url, replacement.url);
    assert_eq!(got.slim.updated_at, replacement.updated_at);
    assert_eq!(got.access_count, 1);
}

async fn update_replaces_only_mutable_fields<R: Repository>(repo: &R) {
    let original = record("abc123", "https://example.com");
    repo.insert(&code("abc123"), original.clone()).await.unwrap();
    repo.increment_access_count(&code("abc123")).await.unwrap();

    let replacement = SlimRecord {
        id: uuid::Uuid::new_v4(),
        url: Url::parse("https://updated-example.com").unwrap(),
        shortcode: code("abc123"),
        created_at: original.created_at + SignedDuration::from_hours(1),
        updated_at: original.updated_at + SignedDuration::from_hours(1),
    };
    repo.update(&code("abc123"), replacement.clone()).await.unwrap();

    let got = repo.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(got.slim.id, original.id);
    assert_eq!(got.slim.created_at, original.created_at);
    assert_eq!(got.slim.url, replacement.url);
    assert_eq!(got.slim.updated_at, replacement.updated_at);
    assert_eq!(got.access_count, 1);
}

async fn update_missing_is_not_found_and_inserts_nothing<R: Repository>(repo: &R) {
    repo.insert(&code("gone"), record("gone", "https://example.com"))
        .await
        .unwrap();
    repo.delete(&code("gone")).await.unwrap();

    let err = repo
        .update(&code("gone"), record("gone", "https://other.example"))
        .await
        .unwrap_err();

    assert_eq!(err, StorageError::NotFound("gone".to_string()));
    assert!(repo.get(&code("gone")).await.unwrap().is_none());
}

async fn get_missing_is_none<R: Repository>(repo: &R) {
    assert!(repo.get(&code("nope")).await.unwrap().is_none());
}

async fn insert_rejects_existing_code<R: Repository>(repo: &R) {
    repo.insert(&code("abc123"), record("abc123", "https://one.example"))
        .await
        .unwrap();

    let err = repo
        .insert(&code("abc123"), record("abc123", "https://two.example"))
        .await
        .unwrap_err();

    assert_eq!(err, StorageError::Conflict("abc123".to_string()));
    let got = repo.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(got.slim.url.as_str(), "https://one.example/");
}

async fn delete_removes_and_tolerates_missing<R: Repository>(repo: &R) {
    repo.set(&code("abc123"), record("abc123", "https://example.com"))
        .await
        .unwrap();

    repo.delete(&code("abc123")).await.unwrap();
    assert!(repo.get(&code("abc123")).await.unwrap().is_none());

    repo.delete(&code("abc123")).await.unwrap();
}

async fn list_all_returns_every_record<R: Repository>(repo: &R) {
    repo.set(&code("abc123"), record("abc123", "https://example1.com"))
        .await
        .unwrap();
    repo.set(&code("def456"), record("def456", "https://example2.com"))
        .await
        .unwrap();

    let all = repo.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[&code("abc123")].slim.url.as_str(), "https://example1.com/");
    assert_eq!(all[&code("def456")].slim.url.as_str(), "https://example2.com/");

    assert_eq!(repo.list_all().await.unwrap(), all);
}

async fn increment_counts_and_reports<R: Repository>(repo: &R) {
    repo.set(&code("abc123"), record("abc123", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(repo.increment_access_count(&code("abc123")).await.unwrap(), 1);
    assert_eq!(repo.increment_access_count(&code("abc123")).await.unwrap(), 2);

    let got = repo.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(got.access_count, 2);
}

async fn increment_missing_is_not_found<R: Repository>(repo: &R) {
    let err = repo
        .increment_access_count(&code("nope"))
        .await
        .unwrap_err();

    assert_eq!(err, StorageError::NotFound("nope".to_string()));
}

async fn concurrent_inserts_admit_one_winner<R: Repository>(repo: Arc<R>) {
    let mut handles = vec![];
    for i in 0..8 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.insert(&code("race"), record("race", &format!("https://{i}.example")))
                .await
        }));
    }

    let mut wins = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => wins += 1,
            Err(StorageError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(wins, 1);
}

macro_rules! repository_contract {
    ($name:ident, $make:expr) => {
        mod $name {
            use super::*;

            #[tokio::test]
            async fn set_inserts_with_zero_count() {
                super::set_inserts_with_zero_count(&$make).await;
            }

            #[tokio::test]
            async fn set_updates_only_mutable_fields() {
                super::set_updates_only_mutable_fields(&$make).await;
            }

            #[tokio::test]
            async fn update_replaces_only_mutable_fields() {
                super::update_replaces_only_mutable_fields(&$make).await;
            }

            #[tokio::test]
            async fn update_missing_is_not_found_and_inserts_nothing() {
                super::update_missing_is_not_found_and_inserts_nothing(&$make).await;
            }

            #[tokio::test]
            async fn get_missing_is_none() {
                super::get_missing_is_none(&$make).await;
            }

            #[tokio::test]
            async fn insert_rejects_existing_code() {
                super::insert_rejects_existing_code(&$make).await;
            }

            #[tokio::test]
            async fn delete_removes_and_tolerates_missing() {
                super::delete_removes_and_tolerates_missing(&$make).await;
            }

            #[tokio::test]
            async fn list_all_returns_every_record() {
                super::list_all_returns_every_record(&$make).await;
            }

            #[tokio::test]
            async fn increment_counts_and_reports() {
                super::increment_counts_and_reports(&$make).await;
            }

            #[tokio::test]
            async fn increment_missing_is_not_found() {
                super::increment_missing_is_not_found(&$make).await;
            }

            #[tokio::test]
            async fn concurrent_inserts_admit_one_winner() {
                super::concurrent_inserts_admit_one_winner(Arc::new($make)).await;
            }
        }
    };
}

repository_contract!(in_memory, InMemoryRepository::new());
repository_contract!(sqlite, SqliteRepository::in_memory().await.unwrap());

#[tokio::test]
async fn sqlite_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("urls.db");

    let repo = SqliteRepository::connect(&path).await.unwrap();
    repo.set(&code("keep"), record("keep", "https://example.com"))
        .await
        .unwrap();
    repo.increment_access_count(&code("keep")).await.unwrap();
    repo.close().await;

    let reopened = SqliteRepository::connect(&path).await.unwrap();
    let got = reopened.get(&code("keep")).await.unwrap().unwrap();
    assert_eq!(got.slim.url.as_str(), "https://example.com/");
    assert_eq!(got.access_count, 1);
    reopened.close().await;
}
