//! Common test utilities for the HTTP tests
//!
//! - `MemoryStore`: in-process `Store` so routes run without PostgreSQL
//! - A wiremock server publishing the fixture signing key
//! - Token minting for arbitrary emails
//! - Request and response helpers

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicI64, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use jsonwebtoken::{encode, get_current_timestamp, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tasklist_api::{
    app::{build_router, AppState},
    config::{ApiConfig, AuthConfig, Config, DatabaseConfig},
};
use tasklist_shared::{
    auth::{identity::IdentityResolver, jwks::JwksKeyResolver, validator::TokenValidator},
    models::task::{CreateTask, Task, UpdateTask},
    store::{Store, TaskStore, UserStore},
};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const ISSUER: &str = "https://issuer.example.com/";
pub const AUDIENCE: &str = "https://tasks.example.com/";
pub const EMAIL_CLAIM: &str = "https://tasks.example.com/email";
pub const KID: &str = "primary";

const SIGNING_KEY: &str = include_str!("../../../tasklist-shared/tests/fixtures/primary.key.pem");
const SIGNING_CERT: &str = include_str!("../../../tasklist-shared/tests/fixtures/primary.cert.pem");
const OTHER_KEY: &str = include_str!("../../../tasklist-shared/tests/fixtures/rotated.key.pem");

/// In-memory users and tasks
///
/// Each operation holds the lock for its whole read-modify-write, matching
/// the single-statement behavior of the PostgreSQL store.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, Uuid>>,
    tasks: Mutex<Vec<Task>>,
    next_id: AtomicI64,
    failing: AtomicBool,
}

impl MemoryStore {
    /// Makes every subsequent call fail like a lost database connection
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.failing.load(Ordering::SeqCst) {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), sqlx::Error> {
        self.check()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert_user(&self, email: &str) -> Result<Uuid, sqlx::Error> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        Ok(*users.entry(email.to_string()).or_insert_with(Uuid::new_v4))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, sqlx::Error> {
        self.check()?;
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter().filter(|t| t.owner_id == owner).cloned().collect())
    }

    async fn add_task(&self, owner: Uuid, data: CreateTask) -> Result<Task, sqlx::Error> {
        self.check()?;
        let task = Task {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            text: data.text,
            done: data.done.unwrap_or(false),
            owner_id: owner,
        };
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn delete_task(&self, owner: Uuid, id: i64) -> Result<bool, sqlx::Error> {
        self.check()?;
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| !(t.id == id && t.owner_id == owner));
        Ok(tasks.len() < before)
    }

    async fn edit_task(
        &self,
        owner: Uuid,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        self.check()?;
        let mut tasks = self.tasks.lock().unwrap();
        Ok(tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner)
            .map(|t| {
                t.text = data.text;
                t.clone()
            }))
    }

    async fn toggle_task(&self, owner: Uuid, id: i64) -> Result<Option<Task>, sqlx::Error> {
        self.check()?;
        let mut tasks = self.tasks.lock().unwrap();
        Ok(tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner)
            .map(|t| {
                t.done = !t.done;
                t.clone()
            }))
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub jwks: MockServer,
    pub store: Arc<MemoryStore>,
    pub app: Router,
}

impl TestContext {
    pub async fn new() -> Self {
        let jwks = MockServer::start().await;
        let body = json!({
            "keys": [{"kid": KID, "kty": "RSA", "use": "sig", "x5c": [x5c(SIGNING_CERT)]}]
        });
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&jwks)
            .await;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                request_timeout_seconds: 30,
            },
            database: DatabaseConfig {
                url: "postgresql://unused".to_string(),
                max_connections: 1,
            },
            auth: AuthConfig {
                issuer: ISSUER.to_string(),
                audience: AUDIENCE.to_string(),
                jwks_url: format!("{}/.well-known/jwks.json", jwks.uri()),
                identity_claim: EMAIL_CLAIM.to_string(),
                jwks_cache_ttl_seconds: 0,
                jwks_fetch_timeout_seconds: 5,
            },
        };

        let resolver = JwksKeyResolver::new(
            &config.auth.jwks_url,
            std::time::Duration::from_secs(config.auth.jwks_fetch_timeout_seconds),
        )
        .expect("key resolver");
        let validator = TokenValidator::new(Arc::new(resolver), ISSUER, AUDIENCE);
        let identity = IdentityResolver::new(EMAIL_CLAIM);

        let store = Arc::new(MemoryStore::default());
        let app = build_router(AppState::new(store.clone(), validator, identity, config));

        Self { jwks, store, app }
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends a request and decodes the JSON response
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }
}

fn x5c(cert_pem: &str) -> String {
    cert_pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect()
}

/// Claims accepted by the test validator
pub fn claims_for(email: &str) -> Value {
    let now = get_current_timestamp();
    json!({
        "sub": format!("auth0|{}", email),
        "iss": ISSUER,
        "aud": [AUDIENCE, "https://issuer.example.com/userinfo"],
        "iat": now,
        "exp": now + 3600,
        EMAIL_CLAIM: email,
    })
}

/// Signs `claims` with the published key
pub fn sign(claims: &Value) -> String {
    sign_with(SIGNING_KEY, claims)
}

/// Signs `claims` with a key the issuer never published under [`KID`]
pub fn sign_with_unpublished_key(claims: &Value) -> String {
    sign_with(OTHER_KEY, claims)
}

fn sign_with(key_pem: &str, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(KID.to_string());
    let key = EncodingKey::from_rsa_pem(key_pem.as_bytes()).unwrap();
    encode(&header, claims, &key).unwrap()
}

/// Valid token for `email`
pub fn token_for(email: &str) -> String {
    sign(&claims_for(email))
}

/// Builds a request, with a bearer token and JSON body when given
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}
