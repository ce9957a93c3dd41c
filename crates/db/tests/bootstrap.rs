use roster_db::models::user::CreateUser;
use roster_db::repositories::{FlashMessageRepo, UserRepo};
use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    roster_db::health_check(&pool).await.unwrap();

    for table in ["users", "categories", "persons", "images", "flash_messages"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Duplicate usernames violate `uq_users_username`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_rejected(pool: PgPool) {
    let input = CreateUser {
        username: "dup".into(),
        email: "dup@test.com".into(),
        password_hash: "x".into(),
        role: None,
    };
    let user = UserRepo::create(&pool, &input).await.unwrap();
    assert_eq!(user.role, "user");
    assert!(UserRepo::exists(&pool, "dup", "other@test.com").await.unwrap());

    let again = CreateUser {
        email: "dup2@test.com".into(),
        ..input
    };
    let err = UserRepo::create(&pool, &again).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error expected");
    assert_eq!(db_err.constraint(), Some("uq_users_username"));
}

/// Flash messages are delivered once, oldest first.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_flash_messages_consumed_once(pool: PgPool) {
    let input = CreateUser {
        username: "reader".into(),
        email: "reader@test.com".into(),
        password_hash: "x".into(),
        role: None,
    };
    let user = UserRepo::create(&pool, &input).await.unwrap();

    FlashMessageRepo::create(&pool, user.id, "success", "first").await.unwrap();
    FlashMessageRepo::create(&pool, user.id, "success", "second").await.unwrap();

    let pending = FlashMessageRepo::take_pending(&pool, user.id).await.unwrap();
    let texts: Vec<_> = pending.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);

    let again = FlashMessageRepo::take_pending(&pool, user.id).await.unwrap();
    assert!(again.is_empty());
}
