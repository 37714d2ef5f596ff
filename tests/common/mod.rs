//! Shared test infrastructure for the HTTP-level tests.
//!
//! - `FakeBackend` - a real HTTP server on a random port that answers from a
//!   fixed route table and records every call with its bearer token and body
//! - `FakeIdentity` - an in-memory identity provider with call counters
//! - `test_app!` / `sign_in!` - build the application and obtain a signed-in
//!   session cookie

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServerHandle, ServiceResponse};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use async_trait::async_trait;
use serde_json::Value;

use volunteer_admin::config::AppConfig;
use volunteer_admin::identity::{IdentityError, IdentityProvider, IdentitySession};
use volunteer_admin::state::AppState;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const TEST_EMAIL: &str = "ana@example.org";
pub const TEST_PASSWORD: &str = "correct horse";
pub const TEST_UID: &str = "u1";
pub const TEST_TOKEN: &str = "id-token-u1";

// ============================================================================
// FAKE BACKEND
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: String,
    pub path: String,
    pub bearer: Option<String>,
    /// JSON request body, if one was sent.
    pub body: Option<Value>,
}

#[derive(Default)]
struct Shared {
    routes: HashMap<String, (u16, Value)>,
    calls: Mutex<Vec<Call>>,
}

pub struct FakeBackend {
    pub base_url: String,
    shared: Arc<Shared>,
    handle: ServerHandle,
}

async fn respond(req: HttpRequest, body: web::Bytes, shared: web::Data<Arc<Shared>>) -> HttpResponse {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from);
    shared.calls.lock().unwrap().push(Call {
        method: req.method().to_string(),
        path: req.path().to_string(),
        bearer,
        body: serde_json::from_slice(&body).ok(),
    });

    let key = format!("{} {}", req.method(), req.path());
    match shared.routes.get(&key) {
        Some((status, body)) => HttpResponse::build(actix_web::http::StatusCode::from_u16(*status).unwrap())
            .content_type("application/json")
            .body(body.to_string()),
        None => HttpResponse::NotFound().json(serde_json::json!({ "detail": "Not found" })),
    }
}

impl FakeBackend {
    /// Routes are keyed `"METHOD /path"`; anything else answers 404.
    pub async fn start(routes: Vec<(&str, u16, Value)>) -> FakeBackend {
        let shared = Arc::new(Shared {
            routes: routes
                .into_iter()
                .map(|(key, status, body)| (key.to_string(), (status, body)))
                .collect(),
            calls: Mutex::new(Vec::new()),
        });
        let data = web::Data::new(shared.clone());
        let server = HttpServer::new(move || App::new().app_data(data.clone()).default_service(web::to(respond)))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("Failed to bind fake backend");
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_rt::spawn(server);
        FakeBackend {
            base_url: format!("http://{addr}"),
            shared,
            handle,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.shared.calls.lock().unwrap().clone()
    }

    /// Paths of GET calls, in order.
    pub fn gets(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == "GET")
            .map(|c| c.path)
            .collect()
    }

    pub fn was_called(&self, path: &str) -> bool {
        self.calls().iter().any(|c| c.path == path)
    }

    /// Number of calls made with `method` to `path`.
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.calls().iter().filter(|c| c.method == method && c.path == path).count()
    }

    /// Body of the last `method` call to `path`.
    pub fn body_of(&self, method: &str, path: &str) -> Option<Value> {
        self.calls()
            .into_iter()
            .rev()
            .find(|c| c.method == method && c.path == path)
            .and_then(|c| c.body)
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// `/users/me` body for the test user holding exactly `codes`.
pub fn profile_with(codes: &[&str]) -> Value {
    let mut privileges: HashMap<String, Vec<String>> = HashMap::new();
    for code in codes {
        let (resource, action) = code.split_once(':').unwrap();
        privileges.entry(resource.to_string()).or_default().push(action.to_string());
    }
    serde_json::json!({
        "id": TEST_UID,
        "email": TEST_EMAIL,
        "first_name": "Ana",
        "last_name": "Silva",
        "roles": ["volunteer"],
        "status": "active",
        "privileges": privileges,
    })
}

// ============================================================================
// FAKE IDENTITY PROVIDER
// ============================================================================

pub struct FakeIdentity {
    pub sign_out_error: Option<IdentityError>,
    pub sign_ins: AtomicUsize,
    pub sign_outs: AtomicUsize,
    pub refreshes: AtomicUsize,
    pub resets: Mutex<Vec<String>>,
}

impl FakeIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(FakeIdentity {
            sign_out_error: None,
            sign_ins: AtomicUsize::new(0),
            sign_outs: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            resets: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_sign_out(error: IdentityError) -> Arc<Self> {
        Arc::new(FakeIdentity {
            sign_out_error: Some(error),
            sign_ins: AtomicUsize::new(0),
            sign_outs: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            resets: Mutex::new(Vec::new()),
        })
    }

    pub fn sign_in_count(&self) -> usize {
        self.sign_ins.load(Ordering::SeqCst)
    }

    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

fn issued_session(email: &str) -> IdentitySession {
    IdentitySession {
        uid: TEST_UID.to_string(),
        email: email.to_string(),
        id_token: TEST_TOKEN.to_string(),
        refresh_token: "refresh-u1".to_string(),
        expires_at: chrono::Utc::now().timestamp() + 3600,
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentitySession, IdentityError> {
        self.sign_ins.fetch_add(1, Ordering::SeqCst);
        if email == TEST_EMAIL && password == TEST_PASSWORD {
            Ok(issued_session(email))
        } else {
            Err(IdentityError::InvalidCredentials)
        }
    }

    async fn refresh(&self, session: &IdentitySession) -> Result<IdentitySession, IdentityError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(issued_session(&session.email))
    }

    async fn sign_out(&self, _session: &IdentitySession) -> Result<(), IdentityError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        match &self.sign_out_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        self.resets.lock().unwrap().push(email.to_string());
        Ok(())
    }
}

// ============================================================================
// APPLICATION SETUP
// ============================================================================

pub fn test_state(backend: &FakeBackend, identity: Arc<FakeIdentity>) -> AppState {
    let base_url = backend.base_url.clone();
    let config = AppConfig::from_lookup(move |key| match key {
        "BACKEND_URL" => Some(base_url.clone()),
        "IDENTITY_API_KEY" => Some("test-key".to_string()),
        _ => None,
    })
    .expect("Test config should be valid");
    AppState::new(config, identity)
}

pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7u8; 64]))
        .cookie_secure(false)
        .build()
}

/// The session cookie a response set.
pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "id")
        .map(|c| c.into_owned())
        .expect("Response should set the session cookie")
}

/// The CSRF token embedded in a rendered form.
pub fn csrf_token(body: &[u8]) -> String {
    let html = String::from_utf8_lossy(body);
    let marker = "name=\"csrf_token\" value=\"";
    let start = html.find(marker).expect("Page should contain a CSRF field") + marker.len();
    let end = html[start..].find('"').unwrap() + start;
    html[start..end].to_string()
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Build the service under test around `state`.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(common::session_middleware())
                .app_data(actix_web::web::Data::new($state))
                .configure(volunteer_admin::configure),
        )
        .await
    };
}

/// Log the test user in; yields `(session_cookie, csrf_token)`.
macro_rules! sign_in {
    ($app:expr) => {{
        let resp = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::get().uri("/login").to_request(),
        )
        .await;
        let cookie = common::session_cookie(&resp);
        let token = common::csrf_token(&actix_web::test::read_body(resp).await);
        let resp = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::post()
                .uri("/login")
                .cookie(cookie)
                .set_form([
                    ("email", common::TEST_EMAIL),
                    ("password", common::TEST_PASSWORD),
                    ("csrf_token", token.as_str()),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(common::location(&resp), "/dashboard");
        (common::session_cookie(&resp), token)
    }};
}
