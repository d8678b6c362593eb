//! In-process stand-in for the REST service.
//!
//! Speaks the same JSON as the real service (`/products`, `/login`,
//! `/register`, `/users/:id`) on an ephemeral port. Tests drive the real
//! clients against it over HTTP.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use vitrine_auth::{Capability, UserRecord};
use vitrine_core::UserId;

/// One request as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub bearer: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    products: Vec<Value>,
    raw_products: Option<Value>,
    next_product_id: u64,
    users: Vec<(UserRecord, String)>,
    tokens: HashMap<String, UserId>,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Running mock server. Aborted on drop.
pub struct MockApi {
    base_url: String,
    state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl MockApi {
    /// Start on `127.0.0.1:0` with two seeded products and no users.
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState {
            products: vec![
                json!({"id": 1, "name": "Laptop", "price": 1000, "image": "laptop.png", "inStock": true}),
                json!({"id": 2, "name": "Phone", "price": 500, "image": "phone.png", "inStock": false}),
            ],
            next_product_id: 3,
            ..MockState::default()
        }));

        let app = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route(
                "/products/:id",
                get(get_product).put(update_product).delete(delete_product),
            )
            .route("/login", post(login))
            .route("/register", post(register))
            .route("/users/:id", get(get_user))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().expect("listener has no local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock api crashed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Add an account that can log in; returns its record.
    pub fn seed_user(&self, email: &str, password: &str, capabilities: &[&'static str]) -> UserRecord {
        let mut st = lock(&self.state);
        let id = UserId::new(st.users.len() as u64 + 1);
        let user = UserRecord::new(id, email)
            .with_capabilities(capabilities.iter().map(|c| Capability::new(*c)));
        st.users.push((user.clone(), password.to_string()));
        user
    }

    /// Serve this body verbatim from `GET /products` (for schema tests).
    pub fn serve_raw_products(&self, body: Value) {
        lock(&self.state).raw_products = Some(body);
    }

    pub fn product_count(&self) -> usize {
        lock(&self.state).products.len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let bearer = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    lock(&state).requests.push(RecordedRequest {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        bearer,
    });
    next.run(req).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(Value::String(message.to_string()))).into_response()
}

async fn list_products(State(state): State<Shared>) -> Json<Value> {
    let st = lock(&state);
    match &st.raw_products {
        Some(raw) => Json(raw.clone()),
        None => Json(Value::Array(st.products.clone())),
    }
}

fn position(st: &MockState, id: u64) -> Option<usize> {
    st.products.iter().position(|p| p["id"] == json!(id))
}

async fn get_product(State(state): State<Shared>, Path(id): Path<u64>) -> Response {
    let st = lock(&state);
    match position(&st, id) {
        Some(idx) => Json(st.products[idx].clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn create_product(State(state): State<Shared>, Json(mut body): Json<Value>) -> Response {
    let mut st = lock(&state);
    let id = st.next_product_id;
    st.next_product_id += 1;
    body["id"] = json!(id);
    st.products.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_product(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut st = lock(&state);
    match position(&st, id) {
        Some(idx) => {
            body["id"] = json!(id);
            st.products[idx] = body.clone();
            Json(body).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn delete_product(State(state): State<Shared>, Path(id): Path<u64>) -> Response {
    let mut st = lock(&state);
    match position(&st, id) {
        Some(idx) => {
            st.products.remove(idx);
            Json(json!({})).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let mut st = lock(&state);
    let Some((user, stored)) = st.users.iter().find(|(u, _)| u.email == email).cloned() else {
        return error(StatusCode::BAD_REQUEST, "Cannot find user");
    };
    if stored != password {
        return error(StatusCode::BAD_REQUEST, "Incorrect password");
    }

    let token = format!("token-{}-{}", user.id, st.tokens.len());
    st.tokens.insert(token.clone(), user.id);
    Json(json!({"accessToken": token, "user": user})).into_response()
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    let mut st = lock(&state);
    if st.users.iter().any(|(u, _)| u.email == email) {
        return error(StatusCode::BAD_REQUEST, "Email already exists");
    }
    let user = UserRecord::new(UserId::new(st.users.len() as u64 + 1), email);
    st.users.push((user.clone(), password));
    (StatusCode::CREATED, Json(json!({"accessToken": "fresh", "user": user}))).into_response()
}

async fn get_user(State(state): State<Shared>, Path(id): Path<u64>, headers: HeaderMap) -> Response {
    let st = lock(&state);
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let Some(owner) = bearer.and_then(|t| st.tokens.get(t)) else {
        return error(StatusCode::UNAUTHORIZED, "Missing authorization header");
    };
    if owner.get() != id {
        return error(StatusCode::FORBIDDEN, "Private resource access: entity must have a reference to the owner id");
    }
    match st.users.iter().find(|(u, _)| u.id.get() == id) {
        Some((user, _)) => Json(json!(user)).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}
