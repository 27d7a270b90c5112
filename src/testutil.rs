//! In-memory stand-in for the Mirror backend, used by the test suites.
//!
//! Serves the four account endpoints on an ephemeral port, speaking the
//! `{data}` / `{error_short_code}` envelope. State lives in a shared map so
//! tests can seed users and inspect what a PATCH actually stored.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[derive(Debug, Clone, Default)]
pub struct StoredUser {
    pub password: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub birthdate: Option<String>,
}

#[derive(Default)]
struct BackendState {
    users: Mutex<HashMap<String, StoredUser>>,
    tokens: Mutex<HashMap<String, String>>,
    next_token: Mutex<Option<String>>,
    counter: Mutex<u64>,
    garbled: Mutex<bool>,
}

impl BackendState {
    fn issue(&self, email: &str) -> String {
        let token = match self.next_token.lock().expect("next_token lock").take() {
            Some(token) => token,
            None => {
                let mut counter = self.counter.lock().expect("counter lock");
                *counter += 1;
                format!("token-{counter}")
            }
        };
        self.tokens
            .lock()
            .expect("tokens lock")
            .insert(token.clone(), email.to_string());
        token
    }

    fn garbled(&self) -> bool {
        *self.garbled.lock().expect("garbled lock")
    }

    fn bearer_email(&self, headers: &HeaderMap) -> Option<String> {
        let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = auth.strip_prefix("Bearer ")?;
        self.tokens.lock().expect("tokens lock").get(token).cloned()
    }
}

pub struct MockBackend {
    pub base_url: String,
    state: Arc<BackendState>,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/api/v1/auth/signup", post(signup))
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/user/me", get(get_me).patch(update_me))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });

        Self {
            base_url: format!("http://{addr}/api/v1/"),
            state,
        }
    }

    /// Token the next signup or login will hand out.
    pub fn set_next_token(&self, token: &str) {
        *self.state.next_token.lock().expect("next_token lock") = Some(token.to_string());
    }

    /// When set, every reply is an unparsable non-JSON body.
    pub fn set_garbled(&self, on: bool) {
        *self.state.garbled.lock().expect("garbled lock") = on;
    }

    pub fn seed_user(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
        location: Option<&str>,
        birthdate: Option<&str>,
    ) {
        self.state.users.lock().expect("users lock").insert(
            email.to_string(),
            StoredUser {
                password: password.to_string(),
                name: name.map(str::to_string),
                location: location.map(str::to_string),
                birthdate: birthdate.map(str::to_string),
            },
        );
    }

    pub fn stored_user(&self, email: &str) -> Option<StoredUser> {
        self.state.users.lock().expect("users lock").get(email).cloned()
    }
}

#[derive(Debug, Deserialize)]
struct SignupBody {
    email: String,
    name: String,
    password: String,
    password2: String,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct UpdateBody {
    name: String,
    location: String,
    birthdate: String,
}

fn reply_error(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "error_short_code": code }))).into_response()
}

fn garbled_reply() -> Response {
    "definitely not json".into_response()
}

async fn signup(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<SignupBody>,
) -> Response {
    if state.garbled() {
        return garbled_reply();
    }
    if body.password != body.password2 {
        return reply_error(StatusCode::BAD_REQUEST, "error_password_mismatch");
    }
    {
        let mut users = state.users.lock().expect("users lock");
        if users.contains_key(&body.email) {
            return reply_error(StatusCode::CONFLICT, "error_user_already_exists");
        }
        users.insert(
            body.email.clone(),
            StoredUser {
                password: body.password,
                name: Some(body.name),
                ..StoredUser::default()
            },
        );
    }
    let token = state.issue(&body.email);
    Json(json!({ "data": { "api_token": token } })).into_response()
}

async fn login(State(state): State<Arc<BackendState>>, Json(body): Json<LoginBody>) -> Response {
    if state.garbled() {
        return garbled_reply();
    }
    let known = {
        let users = state.users.lock().expect("users lock");
        users
            .get(&body.email)
            .map(|user| user.password == body.password)
    };
    match known {
        Some(true) => {
            let token = state.issue(&body.email);
            Json(json!({ "data": { "api_token": token } })).into_response()
        }
        _ => reply_error(StatusCode::UNAUTHORIZED, "error_invalid_credentials"),
    }
}

async fn get_me(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if state.garbled() {
        return garbled_reply();
    }
    let Some(email) = state.bearer_email(&headers) else {
        return reply_error(StatusCode::UNAUTHORIZED, "error_invalid_token");
    };
    let users = state.users.lock().expect("users lock");
    let Some(user) = users.get(&email) else {
        return reply_error(StatusCode::UNAUTHORIZED, "error_user_not_found");
    };
    Json(json!({
        "data": {
            "name": user.name,
            "profile": {
                "location": user.location,
                "birthdate": user.birthdate,
            }
        }
    }))
    .into_response()
}

async fn update_me(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<UpdateBody>,
) -> Response {
    if state.garbled() {
        return garbled_reply();
    }
    let Some(email) = state.bearer_email(&headers) else {
        return reply_error(StatusCode::UNAUTHORIZED, "error_invalid_token");
    };
    let mut users = state.users.lock().expect("users lock");
    let Some(user) = users.get_mut(&email) else {
        return reply_error(StatusCode::UNAUTHORIZED, "error_user_not_found");
    };
    user.name = Some(body.name);
    user.location = Some(body.location);
    user.birthdate = Some(body.birthdate);
    Json(json!({})).into_response()
}
