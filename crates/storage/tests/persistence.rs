use storage::Storage;

#[tokio::test]
async fn values_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("nested").join("greenlink.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    {
        let storage = Storage::new(&database_url).await.expect("open");
        storage
            .put("greenlink_user", r#"{"id":7,"fullName":"Coach One","role":"MANAGER"}"#)
            .await
            .expect("put");
    }

    assert!(db_path.exists(), "database file should exist: {}", db_path.display());

    let reopened = Storage::new(&database_url).await.expect("reopen");
    let value = reopened.get("greenlink_user").await.expect("get");
    assert!(value.expect("persisted value").contains("Coach One"));
}
