#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use category_console::api::ApiClient;
use category_console::model::Category;
use category_console::session::{SessionGate, SessionStorage};
use category_console::App;

pub const GOOD_EMAIL: &str = "ada@example.com";
pub const GOOD_PASSWORD: &str = "Secret#123";
pub const ACCESS_TOKEN: &str = "fixture-token";

/// Route keys used for hit counts and forced failures
pub const LIST: &str = "GET /categories/";
pub const CREATE: &str = "POST /categories/";
pub const UPDATE: &str = "PUT /categories/:id";
pub const DELETE: &str = "DELETE /categories/:id";
pub const LOGIN: &str = "POST /login";
pub const REGISTER: &str = "POST /register";

#[derive(Default)]
struct Fixture {
    categories: Vec<Category>,
    next_id: i64,
    hits: HashMap<&'static str, usize>,
    failures: HashMap<&'static str, (StatusCode, String)>,
    registrations: Vec<Value>,
}

#[derive(Clone, Default)]
pub struct FixtureState {
    inner: Arc<Mutex<Fixture>>,
}

impl FixtureState {
    fn lock(&self) -> std::sync::MutexGuard<'_, Fixture> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the hit; Some(response) when the route has a canned answer
    fn enter(&self, route: &'static str) -> Option<Response> {
        let mut fixture = self.lock();
        *fixture.hits.entry(route).or_default() += 1;
        fixture
            .failures
            .get(route)
            .map(|(status, body)| (*status, body.clone()).into_response())
    }
}

/// In-process category server on a free port
pub struct TestServer {
    pub base_url: String,
    state: FixtureState,
}

/// Base URL with nothing listening behind it
pub fn closed_base_url() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    Ok(format!("http://127.0.0.1:{}", port))
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let state = FixtureState::default();
        state.lock().next_id = 1;

        let app = Router::new()
            .route("/categories/", get(list_categories).post(create_category))
            .route("/categories/:id", put(update_category).delete(delete_category))
            .route("/login", post(login))
            .route("/register", post(register))
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("failed to bind fixture server")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        })
    }

    pub fn client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.base_url)?)
    }

    /// App with its own session storage
    pub fn app(&self) -> Result<App> {
        let gate = SessionGate::new(SessionStorage::new(), "accessToken");
        Ok(App::with_client(self.client()?, gate))
    }

    /// Replace the stored categories
    pub fn seed(&self, names: &[(&str, &str)]) -> Vec<Category> {
        let mut fixture = self.state.lock();
        fixture.categories.clear();
        for (name, description) in names {
            let id = fixture.next_id;
            fixture.next_id += 1;
            fixture.categories.push(Category {
                id,
                name: name.to_string(),
                description: description.to_string(),
            });
        }
        fixture.categories.clone()
    }

    pub fn stored(&self) -> Vec<Category> {
        self.state.lock().categories.clone()
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state.lock().hits.get(route).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.state.lock().hits.values().sum()
    }

    pub fn fail(&self, route: &'static str, status: StatusCode, body: &str) {
        self.respond(route, status, body);
    }

    /// Answer `route` with a fixed status and body until `recover`
    pub fn respond(&self, route: &'static str, status: StatusCode, body: &str) {
        self.state
            .lock()
            .failures
            .insert(route, (status, body.to_string()));
    }

    pub fn recover(&self, route: &str) {
        self.state.lock().failures.remove(route);
    }

    pub fn registrations(&self) -> Vec<Value> {
        self.state.lock().registrations.clone()
    }
}

async fn list_categories(State(state): State<FixtureState>) -> Response {
    if let Some(failure) = state.enter(LIST) {
        return failure;
    }
    Json(state.lock().categories.clone()).into_response()
}

async fn create_category(State(state): State<FixtureState>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = state.enter(CREATE) {
        return failure;
    }
    let mut fixture = state.lock();
    let category = Category {
        id: fixture.next_id,
        name: body["name"].as_str().unwrap_or_default().to_string(),
        description: body["description"].as_str().unwrap_or_default().to_string(),
    };
    fixture.next_id += 1;
    fixture.categories.push(category.clone());
    (StatusCode::CREATED, Json(category)).into_response()
}

async fn update_category(
    State(state): State<FixtureState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = state.enter(UPDATE) {
        return failure;
    }
    let mut fixture = state.lock();
    match fixture.categories.iter_mut().find(|c| c.id == id) {
        Some(category) => {
            category.name = body["name"].as_str().unwrap_or_default().to_string();
            category.description = body["description"].as_str().unwrap_or_default().to_string();
            Json(category.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Category not found").into_response(),
    }
}

async fn delete_category(State(state): State<FixtureState>, Path(id): Path<i64>) -> Response {
    if let Some(failure) = state.enter(DELETE) {
        return failure;
    }
    let mut fixture = state.lock();
    let before = fixture.categories.len();
    fixture.categories.retain(|c| c.id != id);
    if fixture.categories.len() == before {
        return (StatusCode::NOT_FOUND, "Category not found").into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn login(State(state): State<FixtureState>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = state.enter(LOGIN) {
        return failure;
    }
    if body["email"] == GOOD_EMAIL && body["password"] == GOOD_PASSWORD {
        Json(json!({
            "accessToken": ACCESS_TOKEN,
            "user": { "email": GOOD_EMAIL, "id": 1 }
        }))
        .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "Invalid credentials").into_response()
    }
}

async fn register(State(state): State<FixtureState>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = state.enter(REGISTER) {
        return failure;
    }
    let mut fixture = state.lock();
    if fixture
        .registrations
        .iter()
        .any(|r| r["email"] == body["email"])
    {
        return (StatusCode::CONFLICT, Json(json!({ "message": "Email already registered" })))
            .into_response();
    }
    fixture.registrations.push(body);
    (StatusCode::CREATED, Json(json!({ "message": "User registered" }))).into_response()
}
