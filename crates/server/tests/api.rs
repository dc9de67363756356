use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use engine::{Engine, ExternalIdentity};
use migration::MigratorTrait;

const PASSWORD: &str = "correct horse battery staple";

struct TestApi {
    router: Router,
    alice: Uuid,
    bob: Uuid,
}

async fn test_api() -> TestApi {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    // Low bcrypt cost keeps the test suite fast.
    let hash = bcrypt::hash(PASSWORD, 4).unwrap();
    let alice = engine
        .sign_in_identity(identity("alice@example.com", &hash))
        .await
        .unwrap()
        .id;
    let bob = engine
        .sign_in_identity(identity("bob@example.com", &hash))
        .await
        .unwrap()
        .id;

    TestApi {
        router: server::router(engine, db),
        alice,
        bob,
    }
}

fn identity(email: &str, hash: &str) -> ExternalIdentity {
    ExternalIdentity {
        email: email.to_string(),
        name: None,
        image: None,
        provider: "google".to_string(),
        password_hash: Some(hash.to_string()),
    }
}

fn basic_auth(email: &str, password: &str) -> String {
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(format!("{email}:{password}"))
    )
}

fn request(method: &str, uri: &str, auth: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(api: &TestApi, req: Request<Body>) -> (StatusCode, Value) {
    let response = api.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn alice_auth() -> String {
    basic_auth("alice@example.com", PASSWORD)
}

fn income_payload(date: &str) -> Value {
    json!({
        "type": "income",
        "amount": 5000,
        "currency": "USD",
        "date": date,
        "description": "Paycheck",
        "incomeType": "salary"
    })
}

#[tokio::test]
async fn health_needs_no_credentials() {
    let api = test_api().await;
    let (status, body) = send(&api, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn missing_or_bad_credentials_are_401() {
    let api = test_api().await;
    let uri = format!("/users/{}/transaction", api.alice);

    let (status, _) = send(&api, request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = basic_auth("alice@example.com", "wrong password");
    let (status, _) = send(&api, request("GET", &uri, Some(&wrong), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let unknown = basic_auth("nobody@example.com", PASSWORD);
    let (status, _) = send(&api, request("GET", &uri, Some(&unknown), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cross_user_access_is_403_before_any_store_work() {
    let api = test_api().await;
    let auth = alice_auth();

    let uri = format!("/users/{}/transaction", api.bob);
    let (status, body) = send(&api, request("GET", &uri, Some(&auth), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("Forbidden"));

    // The gate also guards writes: nothing lands in Bob's account.
    let (status, _) = send(
        &api,
        request(
            "POST",
            &uri,
            Some(&auth),
            Some(income_payload("2024-01-01")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let bob_auth = basic_auth("bob@example.com", PASSWORD);
    let (_, body) = send(&api, request("GET", &uri, Some(&bob_auth), None)).await;
    assert_eq!(body["transactions"], json!([]));
}

#[tokio::test]
async fn income_lifecycle_end_to_end() {
    let api = test_api().await;
    let auth = alice_auth();
    let base = format!("/users/{}/transaction", api.alice);

    let (status, body) = send(
        &api,
        request(
            "POST",
            &base,
            Some(&auth),
            Some(income_payload("2024-01-01")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["transaction"]["type"], json!("income"));
    assert_eq!(body["transaction"]["incomeType"], json!("salary"));
    assert_eq!(body["transaction"]["amount"].as_f64(), Some(5000.0));
    let id = body["id"].as_str().unwrap().to_string();

    let one = format!("{base}/{id}");
    let (status, body) = send(&api, request("GET", &one, Some(&auth), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transaction"]["id"], json!(id));
    assert_eq!(body["transaction"]["description"], json!("Paycheck"));
    assert_eq!(body["transaction"]["currency"], json!("USD"));

    let (status, body) = send(&api, request("DELETE", &one, Some(&auth), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedTransaction"]["id"], json!(id));

    let (status, _) = send(&api, request("GET", &one, Some(&auth), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_scoped_to_the_current_month() {
    let api = test_api().await;
    let auth = alice_auth();
    let base = format!("/users/{}/transaction", api.alice);

    let today = Utc::now().date_naive().to_string();
    let (status, body) =
        send(&api, request("POST", &base, Some(&auth), Some(income_payload(&today)))).await;
    assert_eq!(status, StatusCode::CREATED);
    let current_id = body["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &api,
        request(
            "POST",
            &base,
            Some(&auth),
            Some(income_payload("2000-01-15")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&api, request("GET", &base, Some(&auth), None)).await;
    assert_eq!(status, StatusCode::OK);
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["id"], json!(current_id));
}

#[tokio::test]
async fn validation_failures_are_400() {
    let api = test_api().await;
    let auth = alice_auth();
    let base = format!("/users/{}/transaction", api.alice);

    let mut negative = income_payload("2024-01-01");
    negative["amount"] = json!(-5);
    let (status, body) = send(&api, request("POST", &base, Some(&auth), Some(negative))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("amount"));

    // An income classification on an expense payload is a category/type
    // mismatch.
    let mismatched = json!({
        "type": "expense",
        "amount": 100,
        "currency": "PLN",
        "date": "2024-01-01",
        "description": "Weekly shop",
        "category": "Salary"
    });
    let (status, _) = send(&api, request("POST", &base, Some(&auth), Some(mismatched))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was written along the way.
    let (_, body) = send(&api, request("GET", &base, Some(&auth), None)).await;
    assert_eq!(body["transactions"], json!([]));
}

#[tokio::test]
async fn update_applies_only_allow_listed_fields() {
    let api = test_api().await;
    let auth = alice_auth();
    let base = format!("/users/{}/transaction", api.alice);

    let (_, body) = send(
        &api,
        request(
            "POST",
            &base,
            Some(&auth),
            Some(income_payload("2024-01-01")),
        ),
    )
    .await;
    let id = body["id"].as_str().unwrap().to_string();
    let one = format!("{base}/{id}");

    // `userId` is not allow-listed and is dropped silently; `notes` lands.
    let patch = json!({"notes": "January payroll", "userId": Uuid::new_v4().to_string()});
    let (status, body) = send(&api, request("PUT", &one, Some(&auth), Some(patch))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transaction"]["notes"], json!("January payroll"));
    assert_eq!(body["transaction"]["description"], json!("Paycheck"));

    // A patch with nothing recognized is rejected.
    let patch = json!({"userId": "whatever"});
    let (status, _) = send(&api, request("PUT", &one, Some(&auth), Some(patch))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_and_unknown_transaction_ids() {
    let api = test_api().await;
    let auth = alice_auth();

    let uri = format!("/users/{}/transaction/not-a-uuid", api.alice);
    let (status, body) = send(&api, request("GET", &uri, Some(&auth), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Invalid transaction ID format"));

    let uri = format!("/users/{}/transaction/{}", api.alice, Uuid::new_v4());
    let (status, _) = send(&api, request("GET", &uri, Some(&auth), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn settings_defaults_then_merge() {
    let api = test_api().await;
    let auth = alice_auth();
    let uri = format!("/users/{}/settings", api.alice);

    let (status, body) = send(&api, request("GET", &uri, Some(&auth), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["defaultCurrency"], json!("PLN"));
    assert_eq!(body["settings"]["preferredDateFormat"], json!("DD/MM/YYYY"));
    assert_eq!(body["settings"]["preferredTheme"], json!("light"));
    assert_eq!(body["settings"]["language"], json!("en"));
    assert_eq!(body["settings"]["notifications"]["push"], json!(true));
    assert_eq!(body["settings"]["notifications"]["email"], json!(false));
    assert_eq!(body["settings"]["privacy"]["dataRetention"], json!("1year"));

    let patch = json!({"preferredTheme": "dark"});
    let (status, body) = send(&api, request("PUT", &uri, Some(&auth), Some(patch))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["preferredTheme"], json!("dark"));
    // Merge semantics: nothing else moved.
    assert_eq!(body["settings"]["defaultCurrency"], json!("PLN"));
    assert_eq!(body["settings"]["language"], json!("en"));

    // POST updates too, mirroring the PUT route.
    let patch = json!({"budget": {"monthlyLimit": 2500}});
    let (status, body) = send(&api, request("POST", &uri, Some(&auth), Some(patch))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["budget"]["monthlyLimit"].as_f64(), Some(2500.0));
    assert_eq!(body["settings"]["preferredTheme"], json!("dark"));
}

#[tokio::test]
async fn invalid_settings_values_are_400() {
    let api = test_api().await;
    let auth = alice_auth();
    let uri = format!("/users/{}/settings", api.alice);

    let patch = json!({"defaultCurrency": "JPY"});
    let (status, _) = send(&api, request("PUT", &uri, Some(&auth), Some(patch))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let patch = json!({"budget": {"monthlyLimit": -10}});
    let (status, _) = send(&api, request("PUT", &uri, Some(&auth), Some(patch))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unrecognized top-level keys alone leave nothing to update.
    let patch = json!({"favouriteColor": "green"});
    let (status, _) = send(&api, request("PUT", &uri, Some(&auth), Some(patch))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn statistics_fold_the_current_month() {
    let api = test_api().await;
    let auth = alice_auth();
    let base = format!("/users/{}/transaction", api.alice);
    let today = Utc::now().date_naive().to_string();

    let (status, _) = send(
        &api,
        request("POST", &base, Some(&auth), Some(income_payload(&today))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let expense = json!({
        "type": "expense",
        "amount": 300,
        "currency": "USD",
        "date": today,
        "description": "Weekly shop",
        "category": "Groceries"
    });
    let (status, _) = send(&api, request("POST", &base, Some(&auth), Some(expense))).await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/users/{}/statistics", api.alice);
    let (status, body) = send(&api, request("GET", &uri, Some(&auth), None)).await;
    assert_eq!(status, StatusCode::OK);

    let totals = body["statistics"]["totals"].as_array().unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0]["currency"], json!("USD"));
    assert_eq!(totals[0]["totalIncome"].as_f64(), Some(5000.0));
    assert_eq!(totals[0]["totalExpenses"].as_f64(), Some(300.0));
    assert_eq!(totals[0]["net"].as_f64(), Some(4700.0));

    let by_category = body["statistics"]["expensesByCategory"].as_array().unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0]["label"], json!("Groceries"));
    assert_eq!(by_category[0]["count"], json!(1));
}
