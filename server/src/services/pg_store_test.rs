use super::*;

#[test]
fn role_round_trips_through_smallint() {
    assert_eq!(role_from_db(role_to_db(Role::Admin)).unwrap(), Role::Admin);
    assert_eq!(role_from_db(role_to_db(Role::User)).unwrap(), Role::User);
}

#[test]
fn unknown_role_is_a_decode_error() {
    assert!(matches!(role_from_db(5), Err(sqlx::Error::Decode(_))));
    assert!(matches!(role_from_db(-1), Err(sqlx::Error::Decode(_))));
}

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::services::store::NewUser;

    async fn store() -> PgAccountStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required for live-db-tests");
        PgAccountStore::new(crate::db::connect(&url, 2).await.expect("database init failed"))
    }

    fn new_user() -> NewUser {
        NewUser {
            name: "Live".to_owned(),
            email: format!("live-{}@example.com", Uuid::new_v4()),
            password_hash: "salt$hash".to_owned(),
            phone: String::new(),
            address: String::new(),
            answer_hash: "salt$answer".to_owned(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn duplicate_email_maps_to_email_taken() {
        let store = store().await;
        let user = new_user();
        store.insert_user(user.clone()).await.unwrap();
        assert!(matches!(store.insert_user(user).await, Err(StoreError::EmailTaken)));
    }

    #[tokio::test]
    async fn session_round_trip() {
        let store = store().await;
        let user = store.insert_user(new_user()).await.unwrap();
        store.create_session(user.id, &user.email, Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.session_user(&user.email).await.unwrap().map(|u| u.id), Some(user.id));
        store.delete_session(&user.email).await.unwrap();
        assert!(store.session_user(&user.email).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn new_session_purges_expired_rows() {
        let store = store().await;
        let user = store.insert_user(new_user()).await.unwrap();
        let stale = format!("stale-{}", user.id);
        store.create_session(user.id, &stale, Duration::ZERO).await.unwrap();
        store.create_session(user.id, &user.email, Duration::from_secs(60)).await.unwrap();

        let left: i64 = sqlx::query_scalar("SELECT count(*) FROM sessions WHERE token_hash = $1")
            .bind(&stale)
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(left, 0);
    }
}
