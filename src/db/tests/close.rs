use crate::characters::Character;
use crate::db::*;
use tempfile::NamedTempFile;

/// Verify that writing after the pool is closed surfaces a write error
/// rather than hanging or panicking.
#[tokio::test]
async fn test_save_after_pool_close_returns_write_error() {
    let temp_file = NamedTempFile::new().unwrap();
    let db = Database::new(temp_file.path()).await.unwrap();

    db.pool.close().await;

    let result = db
        .save_characters(vec![Character::new(9312, "man", "man0")])
        .await;
    assert!(matches!(result, Err(crate::Error::Write(_))));
}

#[tokio::test]
async fn test_reads_after_pool_close_return_error() {
    let temp_file = NamedTempFile::new().unwrap();
    let db = Database::new(temp_file.path()).await.unwrap();

    db.pool.close().await;

    assert!(db.list_character_ids().await.is_err());
    assert!(db.get_character(1).await.is_err());
}
