use super::*;

#[tokio::test]
async fn put_then_get_returns_latest_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.put("greenlink_user", "{\"id\":1}").await.expect("put");
    storage.put("greenlink_user", "{\"id\":2}").await.expect("overwrite");

    let value = storage.get("greenlink_user").await.expect("get");
    assert_eq!(value.as_deref(), Some("{\"id\":2}"));
}

#[tokio::test]
async fn missing_key_reads_as_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    assert_eq!(storage.get("greenlink_club").await.expect("get"), None);
}

#[tokio::test]
async fn remove_is_idempotent() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.put("greenlink_club", "{}").await.expect("put");

    assert!(storage.remove("greenlink_club").await.expect("first remove"));
    assert!(!storage.remove("greenlink_club").await.expect("second remove"));
    assert_eq!(storage.get("greenlink_club").await.expect("get"), None);
}

#[tokio::test]
async fn entries_are_sorted_by_key() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.put("greenlink_user", "u").await.expect("put user");
    storage.put("greenlink_club", "c").await.expect("put club");

    let keys: Vec<String> = storage
        .entries()
        .await
        .expect("entries")
        .into_iter()
        .map(|entry| entry.key)
        .collect();
    assert_eq!(keys, vec!["greenlink_club", "greenlink_user"]);
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[test]
fn memory_and_foreign_urls_have_no_path() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(sqlite_path("postgres://localhost/db"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/greenlink.db?mode=rwc"),
        Some(PathBuf::from("./data/greenlink.db"))
    );
}
