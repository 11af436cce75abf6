//! PostgreSQL store tests
//!
//! These run against `DATABASE_URL` and are skipped when it is not set.
//! They only assert on rows they created themselves, so they can share a
//! database with other runs.

#![cfg(feature = "ssr")]

use assert_matches::assert_matches;
use sqlx::PgPool;
use uuid::Uuid;

use roomlog::backend::store::{AccountStore, MessageStore, NewMessage, PgStore, StoreError};
use roomlog::shared::MessageType;

async fn test_store() -> Option<PgStore> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set, skipping PostgreSQL store test");
            return None;
        }
    };
    let pool = PgPool::connect(&url).await.expect("connect to DATABASE_URL");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    Some(PgStore::new(pool))
}

fn draft(author_id: Uuid, content: &str) -> NewMessage {
    NewMessage {
        id: Uuid::new_v4(),
        message_type: MessageType::Text,
        content: content.to_string(),
        is_changed: false,
        author_id,
    }
}

#[tokio::test]
async fn test_insert_get_and_list_order() {
    let Some(store) = test_store().await else {
        return;
    };
    let login = format!("pg-{}", Uuid::new_v4());
    let author = store
        .create_account(Uuid::new_v4(), &login, "hash")
        .await
        .unwrap();

    let before = store.count().await.unwrap();
    let first = store.insert(draft(author.id, "first")).await.unwrap();
    let second = store.insert(draft(author.id, "second")).await.unwrap();
    assert!(store.count().await.unwrap() >= before + 2);

    let fetched = store.get(first.id).await.unwrap().unwrap();
    assert_eq!(fetched.content, "first");
    assert_eq!(fetched.author.login, login);
    assert_eq!(fetched.author_id, author.id);
    assert!(!fetched.is_changed);

    let window = store.list_window(1000, 0).await.unwrap();
    let position = |id: Uuid| window.iter().position(|m| m.id == id).unwrap();
    assert!(position(second.id) < position(first.id));

    assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_constraint_violations_are_typed() {
    let Some(store) = test_store().await else {
        return;
    };
    let login = format!("pg-{}", Uuid::new_v4());
    let author = store
        .create_account(Uuid::new_v4(), &login, "hash")
        .await
        .unwrap();

    let stranger = Uuid::new_v4();
    assert_matches!(
        store.insert(draft(stranger, "orphan")).await,
        Err(StoreError::UnknownAuthor(id)) if id == stranger
    );

    let message = draft(author.id, "once");
    store.insert(message.clone()).await.unwrap();
    assert_matches!(
        store.insert(message.clone()).await,
        Err(StoreError::DuplicateId(id)) if id == message.id
    );

    assert_matches!(
        store.create_account(Uuid::new_v4(), &login, "other").await,
        Err(StoreError::DuplicateLogin(_))
    );

    let found = store.find_account_by_login(&login).await.unwrap().unwrap();
    assert_eq!(found.id, author.id);
    assert_eq!(store.find_account_by_id(author.id).await.unwrap(), Some(found));
}
