//! Cache backend behavior.

use hlcks::cache::{FileCache, MemoryCache, ReturnsCache, RETURNS_BANK};

#[tokio::test]
async fn memory_cache_round_trips() {
    let cache = MemoryCache::new();

    assert!(!cache.contains(RETURNS_BANK, "backup").await.unwrap());
    cache
        .store(RETURNS_BANK, "backup", "https://hc.example.org/ping/a")
        .await
        .unwrap();

    assert!(cache.contains(RETURNS_BANK, "backup").await.unwrap());
    assert_eq!(
        cache.fetch(RETURNS_BANK, "backup").await.unwrap(),
        Some("https://hc.example.org/ping/a".to_string())
    );
    assert_eq!(cache.fetch(RETURNS_BANK, "other").await.unwrap(), None);
}

#[tokio::test]
async fn banks_are_isolated() {
    let cache = MemoryCache::new();
    cache.store("bank/a", "key", "1").await.unwrap();
    cache.store("bank/b", "key", "2").await.unwrap();

    assert_eq!(cache.fetch("bank/a", "key").await.unwrap(), Some("1".to_string()));
    assert_eq!(cache.fetch("bank/b", "key").await.unwrap(), Some("2".to_string()));
}

#[tokio::test]
async fn file_cache_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();

    {
        let cache = FileCache::new(dir.path());
        cache
            .store(RETURNS_BANK, "backup", "https://hc.example.org/ping/a")
            .await
            .unwrap();
    }

    let reopened = FileCache::new(dir.path());
    assert_eq!(
        reopened.fetch(RETURNS_BANK, "backup").await.unwrap(),
        Some("https://hc.example.org/ping/a".to_string())
    );
}

#[tokio::test]
async fn file_cache_last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(dir.path());

    cache.store(RETURNS_BANK, "backup", "old").await.unwrap();
    cache.store(RETURNS_BANK, "backup", "new").await.unwrap();
    assert_eq!(
        cache.fetch(RETURNS_BANK, "backup").await.unwrap(),
        Some("new".to_string())
    );
}

#[tokio::test]
async fn file_cache_reads_tolerate_a_missing_bank() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileCache::new(dir.path());

    assert!(!cache.contains("never/written", "key").await.unwrap());
    assert_eq!(cache.fetch("never/written", "key").await.unwrap(), None);
}
