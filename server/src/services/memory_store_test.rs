use guard::Role;

use super::*;

fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "Carol".to_owned(),
        email: email.to_owned(),
        password_hash: "salt$hash".to_owned(),
        phone: "555".to_owned(),
        address: "3 Elm".to_owned(),
        answer_hash: "salt$answer".to_owned(),
        role: Role::User,
    }
}

#[tokio::test]
async fn insert_then_find_by_email() {
    let store = MemoryAccountStore::new();
    let inserted = store.insert_user(new_user("carol@example.com")).await.unwrap();
    let found = store.find_by_email("carol@example.com").await.unwrap();
    assert_eq!(found, Some(inserted));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let store = MemoryAccountStore::new();
    store.insert_user(new_user("dup@example.com")).await.unwrap();
    let err = store.insert_user(new_user("dup@example.com")).await.unwrap_err();
    assert!(matches!(err, StoreError::EmailTaken));
}

#[tokio::test]
async fn update_profile_keeps_unchanged_fields() {
    let store = MemoryAccountStore::new();
    let user = store.insert_user(new_user("carol@example.com")).await.unwrap();
    let changes = ProfileChanges { phone: Some("777".to_owned()), ..ProfileChanges::default() };

    let updated = store.update_profile(user.id, changes).await.unwrap().unwrap();

    assert_eq!(updated.phone, "777");
    assert_eq!(updated.name, "Carol");
    assert_eq!(updated.address, "3 Elm");
}

#[tokio::test]
async fn update_profile_unknown_user_is_none() {
    let store = MemoryAccountStore::new();
    let result = store.update_profile(Uuid::new_v4(), ProfileChanges::default()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn session_resolves_until_deleted() {
    let store = MemoryAccountStore::new();
    let user = store.insert_user(new_user("carol@example.com")).await.unwrap();
    store.create_session(user.id, "tok", Duration::from_secs(60)).await.unwrap();

    assert_eq!(store.session_user("tok").await.unwrap().map(|u| u.id), Some(user.id));

    store.delete_session("tok").await.unwrap();
    assert!(store.session_user("tok").await.unwrap().is_none());
}

#[tokio::test]
async fn expired_session_does_not_resolve() {
    let store = MemoryAccountStore::new();
    let user = store.insert_user(new_user("carol@example.com")).await.unwrap();
    store.create_session(user.id, "old", Duration::ZERO).await.unwrap();
    assert!(store.session_user("old").await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_session_does_not_resolve() {
    let store = MemoryAccountStore::new();
    assert!(store.session_user("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn new_session_purges_expired_ones() {
    let store = MemoryAccountStore::new();
    let user = store.insert_user(new_user("carol@example.com")).await.unwrap();
    store.create_session(user.id, "old", Duration::ZERO).await.unwrap();
    store.create_session(user.id, "live", Duration::from_secs(60)).await.unwrap();
    store.create_session(user.id, "fresh", Duration::from_secs(60)).await.unwrap();

    let inner = store.inner.read().await;
    assert!(!inner.sessions.contains_key("old"));
    assert!(inner.sessions.contains_key("live"));
    assert_eq!(inner.sessions.len(), 2);
}
