use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, EngineError, ExternalIdentity};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn google_identity(email: &str) -> ExternalIdentity {
    ExternalIdentity {
        email: email.to_string(),
        name: Some("Alice".to_string()),
        image: Some("https://example.com/alice.png".to_string()),
        provider: "google".to_string(),
        password_hash: None,
    }
}

#[tokio::test]
async fn first_sign_in_creates_the_user() {
    let (engine, _db) = engine_with_db().await;

    let user = engine
        .sign_in_identity(google_identity("alice@example.com"))
        .await
        .unwrap();

    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.name.as_deref(), Some("Alice"));
    assert_eq!(user.providers, vec!["google".to_string()]);

    // A fresh user has the documented default settings.
    let settings = engine.settings(user.id).await.unwrap();
    assert_eq!(settings.default_currency.code(), "PLN");
}

#[tokio::test]
async fn repeat_sign_in_merges_providers_and_keeps_identity() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .sign_in_identity(google_identity("alice@example.com"))
        .await
        .unwrap();

    let mut github = google_identity("alice@example.com");
    github.provider = "github".to_string();
    let second = engine.sign_in_identity(github).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.email, first.email);
    assert_eq!(
        second.providers,
        vec!["google".to_string(), "github".to_string()]
    );
    assert!(second.updated_at >= first.updated_at);

    // Signing in again with a known provider does not duplicate it.
    let third = engine
        .sign_in_identity(google_identity("alice@example.com"))
        .await
        .unwrap();
    assert_eq!(third.providers.len(), 2);
}

#[tokio::test]
async fn email_matching_is_case_insensitive() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .sign_in_identity(google_identity("alice@example.com"))
        .await
        .unwrap();
    let second = engine
        .sign_in_identity(google_identity("Alice@Example.COM"))
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
}

#[tokio::test]
async fn invalid_identities_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine
            .sign_in_identity(google_identity("not-an-address"))
            .await,
        Err(EngineError::Validation(_))
    ));

    let mut blank_provider = google_identity("alice@example.com");
    blank_provider.provider = "  ".to_string();
    assert!(matches!(
        engine.sign_in_identity(blank_provider).await,
        Err(EngineError::Validation(_))
    ));
}
