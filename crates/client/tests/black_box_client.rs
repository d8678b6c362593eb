use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;

use vitrine_auth::{AccessToken, Credentials, MemoryStorage, SessionStore};
use vitrine_client::testing::MockApi;
use vitrine_client::{AuthClient, ClientConfig, ClientError, ProductClient, RestClient};
use vitrine_core::{ProductId, UserId};
use vitrine_products::ProductDraft;

fn rest_for(api: &MockApi) -> RestClient {
    RestClient::new(ClientConfig::new(api.base_url()).unwrap()).unwrap()
}

#[tokio::test]
async fn product_crud_round_trip() {
    let api = MockApi::spawn().await;
    let products = ProductClient::new(rest_for(&api));

    let listed = products.list_products().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "Laptop");
    assert!(listed[0].in_stock);

    let created = products
        .create_product(&ProductDraft::new("Keyboard", 45.5, "kb.png").in_stock(true))
        .await
        .unwrap();
    let id = created.id.expect("server assigns an id");
    assert_eq!(id, ProductId::new(3));
    assert_eq!(api.product_count(), 3);

    let mut fetched = products.get_product(id).await.unwrap();
    assert_eq!(fetched, created);

    fetched.price = 49.0;
    let updated = products.update_product(&fetched).await.unwrap();
    assert_eq!(updated.price, 49.0);

    products.delete_product(id).await.unwrap();
    assert_eq!(api.product_count(), 2);

    match products.get_product(id).await {
        Err(ClientError::Api { status: 404, .. }) => {}
        other => panic!("Expected 404 after delete, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_forms_never_reach_the_network() {
    let api = MockApi::spawn().await;
    let products = ProductClient::new(rest_for(&api));
    let auth = AuthClient::new(rest_for(&api));

    let err = products
        .create_product(&ProductDraft::new("ab", 10.0, ""))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    let err = auth.login(&Credentials::new("nope", "123")).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn schema_drift_is_a_parse_error() {
    let api = MockApi::spawn().await;
    let products = ProductClient::new(rest_for(&api));

    api.serve_raw_products(json!([{"id": 1, "title": "Legacy", "price": 3}]));
    let legacy = products.list_products().await.unwrap();
    assert_eq!(legacy[0].name, "Legacy");

    api.serve_raw_products(json!([{"id": 1, "price": "free"}]));
    match products.list_products().await {
        Err(ClientError::Parse(msg)) => assert!(msg.contains("product list")),
        other => panic!("Expected Parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn login_register_and_fetch_user() {
    let api = MockApi::spawn().await;
    api.seed_user("admin@shop.io", "secret1", &["*"]);

    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    let auth = AuthClient::new(rest_for(&api).with_session(session.clone()));

    auth.register(&Credentials::new("new@shop.io", "secret2")).await.unwrap();
    match auth.register(&Credentials::new("new@shop.io", "secret2")).await {
        Err(ClientError::Api { status: 400, message }) => assert_eq!(message, "Email already exists"),
        other => panic!("Expected duplicate registration to fail, got {other:?}"),
    }

    let resp = auth.login(&Credentials::new("admin@shop.io", "secret1")).await.unwrap();
    assert_eq!(resp.user.id, UserId::new(1));
    assert!(resp.user.capabilities.iter().any(|c| c.is_wildcard()));

    // Without a stored session the protected endpoint refuses.
    match auth.get_user(resp.user.id).await {
        Err(err @ ClientError::Unauthorized { status: 401, .. }) => assert!(!err.is_retryable()),
        other => panic!("Expected 401, got {other:?}"),
    }

    session.save(resp.access_token.clone(), resp.user.clone()).unwrap();
    let me = auth.get_user(resp.user.id).await.unwrap();
    assert_eq!(me, resp.user);

    let last = api.requests().pop().unwrap();
    assert_eq!(last.path, "/users/1");
    assert_eq!(last.bearer.as_deref(), Some(resp.access_token.expose()));
}

#[tokio::test]
async fn wrong_password_is_unauthorized_message() {
    let api = MockApi::spawn().await;
    api.seed_user("a@shop.io", "secret1", &[]);
    let auth = AuthClient::new(rest_for(&api));

    match auth.login(&Credentials::new("a@shop.io", "wrong-pass")).await {
        Err(ClientError::Api { status: 400, message }) => assert_eq!(message, "Incorrect password"),
        other => panic!("Expected 400, got {other:?}"),
    }
}

#[tokio::test]
async fn stale_token_is_sent_and_rejected() {
    let api = MockApi::spawn().await;
    api.seed_user("a@shop.io", "secret1", &[]);

    let session = SessionStore::in_memory();
    session
        .save(AccessToken::new("expired"), vitrine_auth::UserRecord::new(UserId::new(1), "a@shop.io"))
        .unwrap();
    let auth = AuthClient::new(rest_for(&api).with_session(session));

    let err = auth.get_user(UserId::new(1)).await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { .. }));
    assert_eq!(api.requests()[0].bearer.as_deref(), Some("expired"));
}

#[tokio::test]
async fn unreachable_server_is_a_retryable_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let rest = RestClient::new(ClientConfig::new(&format!("http://{addr}")).unwrap()).unwrap();
    let err = ProductClient::new(rest).list_products().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn silent_server_times_out_as_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept connections and hold them open without ever answering.
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = ClientConfig::new(&format!("http://{addr}"))
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let started = Instant::now();
    let err = ProductClient::new(RestClient::new(config).unwrap())
        .list_products()
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Network(_)), "got {err:?}");
    assert!(err.is_retryable());
    assert!(started.elapsed() < Duration::from_secs(5));
    server.abort();
}
