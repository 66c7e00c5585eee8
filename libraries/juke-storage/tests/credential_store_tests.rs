//! Behaviour shared by every credential store backend.
//!
//! Each scenario is written once against `CredentialStore` and run for
//! both the in-memory and the SQLite implementation.

mod test_helpers;

use juke_core::{CredentialStore, PartyCode};
use juke_storage::{credentials, InMemoryCredentialStore, SqliteCredentialStore};
use test_helpers::*;

async fn put_then_get<S: CredentialStore>(store: &S) {
    let stored = credential("AB12C3", "access-1");
    store.put_credential(&stored).await.unwrap();

    let loaded = store
        .get_credential(&stored.party_code)
        .await
        .unwrap()
        .expect("credential should exist");
    assert_eq!(loaded, stored);
}

async fn unknown_party_is_none<S: CredentialStore>(store: &S) {
    let code = PartyCode::parse("ZZZ999").unwrap();
    assert!(store.get_credential(&code).await.unwrap().is_none());
    assert!(!store.is_live(&code).await.unwrap());
}

async fn put_replaces_previous<S: CredentialStore>(store: &S) {
    let first = credential("AB12C3", "access-1");
    store.put_credential(&first).await.unwrap();

    let mut second = credential("AB12C3", "access-2");
    second.expires_at = first.expires_at + chrono::Duration::hours(1);
    store.put_credential(&second).await.unwrap();

    let loaded = store
        .get_credential(&first.party_code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.access_token, "access-2");
    assert_eq!(loaded.refresh_token, "refresh-access-2");
    assert_eq!(loaded.expires_at, second.expires_at);
}

async fn retired_party_is_hidden_and_frozen<S: CredentialStore>(store: &S) {
    let live = credential("AB12C3", "access-1");
    store.put_credential(&live).await.unwrap();

    assert!(store.retire(&live.party_code).await.unwrap());
    assert!(!store.retire(&live.party_code).await.unwrap());
    assert!(store.get_credential(&live.party_code).await.unwrap().is_none());

    // A refresh that lands after the party ended must not revive it
    store
        .put_credential(&credential("AB12C3", "late-refresh"))
        .await
        .unwrap();
    assert!(store.get_credential(&live.party_code).await.unwrap().is_none());
}

async fn claim_reserves_codes<S: CredentialStore>(store: &S) {
    let first = credential("AB12C3", "access-1");
    assert!(store.claim(&first).await.unwrap());
    assert!(!store.claim(&credential("AB12C3", "other")).await.unwrap());

    // The original credential is untouched by the rejected claim
    let loaded = store
        .get_credential(&first.party_code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.access_token, "access-1");

    // Retired codes stay reserved
    store.retire(&first.party_code).await.unwrap();
    assert!(!store.claim(&credential("AB12C3", "again")).await.unwrap());
}

mod in_memory {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        put_then_get(&InMemoryCredentialStore::new()).await;
    }

    #[tokio::test]
    async fn test_unknown_party_is_none() {
        unknown_party_is_none(&InMemoryCredentialStore::new()).await;
    }

    #[tokio::test]
    async fn test_put_replaces_previous() {
        put_replaces_previous(&InMemoryCredentialStore::new()).await;
    }

    #[tokio::test]
    async fn test_retired_party_is_hidden_and_frozen() {
        retired_party_is_hidden_and_frozen(&InMemoryCredentialStore::new()).await;
    }

    #[tokio::test]
    async fn test_claim_reserves_codes() {
        claim_reserves_codes(&InMemoryCredentialStore::new()).await;
    }

    #[tokio::test]
    async fn test_with_credentials_and_live_count() {
        let store = InMemoryCredentialStore::with_credentials([
            credential("AB12C3", "a"),
            credential("XYZ999", "b"),
        ]);
        assert_eq!(store.live_count().await, 2);

        store
            .retire(&PartyCode::parse("XYZ999").unwrap())
            .await
            .unwrap();
        assert_eq!(store.live_count().await, 1);
    }
}

mod sqlite {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let db = TestDb::new().await;
        put_then_get(&SqliteCredentialStore::new(db.pool().clone())).await;
    }

    #[tokio::test]
    async fn test_unknown_party_is_none() {
        let db = TestDb::new().await;
        unknown_party_is_none(&SqliteCredentialStore::new(db.pool().clone())).await;
    }

    #[tokio::test]
    async fn test_put_replaces_previous() {
        let db = TestDb::new().await;
        put_replaces_previous(&SqliteCredentialStore::new(db.pool().clone())).await;
    }

    #[tokio::test]
    async fn test_retired_party_is_hidden_and_frozen() {
        let db = TestDb::new().await;
        retired_party_is_hidden_and_frozen(&SqliteCredentialStore::new(db.pool().clone())).await;
    }

    #[tokio::test]
    async fn test_claim_reserves_codes() {
        let db = TestDb::new().await;
        claim_reserves_codes(&SqliteCredentialStore::new(db.pool().clone())).await;
    }

    #[tokio::test]
    async fn test_retire_wipes_tokens() {
        let db = TestDb::new().await;
        let store = SqliteCredentialStore::new(db.pool().clone());
        let stored = credential("AB12C3", "access-1");
        store.put_credential(&stored).await.unwrap();
        store.retire(&stored.party_code).await.unwrap();

        let (access, refresh): (String, String) = sqlx::query_as(
            "SELECT access_token, refresh_token FROM party_credentials WHERE party_code = ?",
        )
        .bind("AB12C3")
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert!(access.is_empty());
        assert!(refresh.is_empty());
    }

    #[tokio::test]
    async fn test_count_live() {
        let db = TestDb::new().await;
        let store = SqliteCredentialStore::new(db.pool().clone());
        store
            .put_credential(&credential("AB12C3", "a"))
            .await
            .unwrap();
        store
            .put_credential(&credential("XYZ999", "b"))
            .await
            .unwrap();
        store
            .retire(&PartyCode::parse("AB12C3").unwrap())
            .await
            .unwrap();

        assert_eq!(credentials::count_live(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_credentials_survive_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("juke.db").display());
        let stored = credential("AB12C3", "access-1");

        {
            let pool = juke_storage::create_pool(&db_url).await.unwrap();
            juke_storage::run_migrations(&pool).await.unwrap();
            SqliteCredentialStore::new(pool.clone())
                .put_credential(&stored)
                .await
                .unwrap();
            pool.close().await;
        }

        let pool = juke_storage::create_pool(&db_url).await.unwrap();
        juke_storage::run_migrations(&pool).await.unwrap();
        let loaded = SqliteCredentialStore::new(pool)
            .get_credential(&stored.party_code)
            .await
            .unwrap();
        assert_eq!(loaded, Some(stored));
    }
}
