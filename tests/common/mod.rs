//! 测试公共模块
//! 提供模拟后端与测试客户端

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use museum_client::{ClientConfig, MuseumClient};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const TEST_USERNAME: &str = "ada";
pub const TEST_PASSWORD: &str = "correct-horse";
pub const ACCESS_TOKEN: &str = "access-1";
pub const REFRESHED_ACCESS_TOKEN: &str = "access-2";
pub const REFRESH_TOKEN: &str = "refresh-1";

/// 模拟后端的内存状态
#[derive(Default)]
pub struct MockState {
    pub bookings: Vec<Value>,
    pub next_booking_id: i64,
    /// 注册接口是否直接返回令牌
    pub register_returns_tokens: bool,
    pub register_calls: usize,
    /// 预约列表接口是否返回 500
    pub fail_bookings_listing: bool,
    pub last_chat_request: Option<Value>,
}

pub type SharedState = Arc<Mutex<MockState>>;

/// 模拟后端句柄
pub struct MockBackend {
    pub base_url: String,
    pub state: SharedState,
    pub requests: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn client(&self) -> MuseumClient {
        client_for(&self.base_url)
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn register_calls(&self) -> usize {
        self.state.lock().unwrap().register_calls
    }
}

/// 测试配置：指向模拟后端，缩短超时
pub fn create_test_config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::with_base_url(base_url);
    config.backend.request_timeout_secs = 5;
    config.logging.level = "debug".to_string();
    config.logging.format = "pretty".to_string();
    config
}

pub fn client_for(base_url: &str) -> MuseumClient {
    MuseumClient::new(&create_test_config(base_url)).expect("Failed to create test client")
}

/// 在随机端口上启动路由
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Mock backend crashed");
    });

    format!("http://{}", addr)
}

/// 启动完整的模拟后端
pub async fn spawn_backend() -> MockBackend {
    spawn_backend_with(MockState {
        next_booking_id: 1,
        ..MockState::default()
    })
    .await
}

pub async fn spawn_backend_with(initial: MockState) -> MockBackend {
    let state: SharedState = Arc::new(Mutex::new(initial));
    let requests = Arc::new(AtomicUsize::new(0));

    let counter = requests.clone();
    let router = Router::new()
        .route("/lol/api/token/", post(obtain_token))
        .route("/lol/api/token/refresh/", post(refresh_token))
        .route("/lol/api/login/", post(login))
        .route("/lol/api/register/", post(register))
        .route("/lol/api/browse/", get(browse))
        .route("/lol/api/book_museum/{museum_id}/", post(book_museum))
        .route("/lol/api/my_bookings/", get(my_bookings))
        .route("/lol/api/cancel_booking/{booking_id}/", post(cancel_booking))
        .route("/chat", post(chat))
        .layer(axum::middleware::from_fn(
            move |req: axum::extract::Request, next: axum::middleware::Next| {
                counter.fetch_add(1, Ordering::SeqCst);
                next.run(req)
            },
        ))
        .with_state(state.clone());

    MockBackend {
        base_url: serve(router).await,
        state,
        requests,
    }
}

fn museums() -> Value {
    json!([
        {"museum_id": 1, "name": "Louvre", "description": "Art museum", "location": "Paris"},
        {"museum_id": 2, "name": "Prado", "description": "No description available", "location": "Madrid"}
    ])
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn authorized(headers: &HeaderMap) -> bool {
    matches!(bearer(headers), Some(ACCESS_TOKEN) | Some(REFRESHED_ACCESS_TOKEN))
}

fn unauthorized() -> Response {
    error(
        StatusCode::UNAUTHORIZED,
        json!({"detail": "Authentication credentials were not provided."}),
    )
}

fn check_credentials(body: &Value) -> bool {
    body["username"] == TEST_USERNAME && body["password"] == TEST_PASSWORD
}

async fn obtain_token(Json(body): Json<Value>) -> Response {
    if !check_credentials(&body) {
        return error(
            StatusCode::UNAUTHORIZED,
            json!({"detail": "Invalid credentials"}),
        );
    }
    Json(json!({"access": ACCESS_TOKEN, "refresh": REFRESH_TOKEN})).into_response()
}

async fn refresh_token(Json(body): Json<Value>) -> Response {
    if body["refresh"] != REFRESH_TOKEN {
        return error(
            StatusCode::UNAUTHORIZED,
            json!({"detail": "Token is invalid or expired", "code": "token_not_valid"}),
        );
    }
    Json(json!({"access": REFRESHED_ACCESS_TOKEN})).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if !check_credentials(&body) {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"error": "Invalid username or password"}),
        );
    }
    Json(json!({
        "message": "Login successful",
        "user": {"id": 1, "username": TEST_USERNAME},
        "access": ACCESS_TOKEN,
        "refresh": REFRESH_TOKEN
    }))
    .into_response()
}

async fn register(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.register_calls += 1;

    if body.get("password2").is_some() || body.get("password_confirmation").is_some() {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"non_field_errors": ["Unexpected field"]}),
        );
    }
    if body["username"] == "taken" {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"username": ["A user with that username already exists."]}),
        );
    }

    let mut payload = json!({"id": 2, "username": body["username"], "email": body["email"]});
    if state.register_returns_tokens {
        payload["access"] = json!(ACCESS_TOKEN);
        payload["refresh"] = json!(REFRESH_TOKEN);
    }
    (StatusCode::CREATED, Json(payload)).into_response()
}

async fn browse(headers: HeaderMap) -> Response {
    // 与 ngrok 行为一致：缺少绕过头时返回 HTML 警告页
    if headers.get("ngrok-skip-browser-warning").is_none() {
        return (StatusCode::OK, "<html>You are about to visit...</html>").into_response();
    }
    Json(museums()).into_response()
}

async fn book_museum(
    State(state): State<SharedState>,
    Path(museum_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let museum = museums()
        .as_array()
        .and_then(|all| all.iter().find(|m| m["museum_id"] == museum_id).cloned());
    let Some(museum) = museum else {
        return error(StatusCode::NOT_FOUND, json!({"error": "Museum not found"}));
    };

    let mut state = state.lock().unwrap();
    if let Some(existing) = state
        .bookings
        .iter()
        .find(|b| b["museum_id"] == museum_id)
    {
        return error(
            StatusCode::BAD_REQUEST,
            json!({
                "error": "You already have a booking for this museum",
                "existing_booking_id": existing["booking_id"]
            }),
        );
    }

    let booking_id = state.next_booking_id;
    state.next_booking_id += 1;
    state.bookings.push(json!({
        "booking_id": booking_id,
        "museum_id": museum_id,
        "museum_name": museum["name"],
        "museum_location": museum["location"],
        "visit_date": "2026-10-17",
        "ticket_type": "Ticket 1 - 12.50",
        "created_at": null
    }));

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Booking successful!",
            "booking_id": booking_id,
            "museum_name": museum["name"],
            "visit_date": "2026-10-17",
            "ticket_type": "Ticket 1 - 12.50"
        })),
    )
        .into_response()
}

async fn my_bookings(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let state = state.lock().unwrap();
    if state.fail_bookings_listing {
        return error(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "db down"}));
    }
    Json(Value::Array(state.bookings.clone())).into_response()
}

async fn cancel_booking(
    State(state): State<SharedState>,
    Path(booking_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut state = state.lock().unwrap();
    let Some(index) = state
        .bookings
        .iter()
        .position(|b| b["booking_id"] == booking_id)
    else {
        return error(
            StatusCode::NOT_FOUND,
            json!({"error": "Booking not found or you don't have permission to cancel it"}),
        );
    };

    let removed = state.bookings.remove(index);
    Json(json!({
        "message": format!(
            "Booking for {} on {} has been cancelled successfully",
            removed["museum_name"].as_str().unwrap_or_default(),
            removed["visit_date"].as_str().unwrap_or_default()
        ),
        "cancelled_booking_id": booking_id
    }))
    .into_response()
}

async fn chat(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let reply = format!(
        "You asked: {}",
        body["user_query"].as_str().unwrap_or_default()
    );
    state.lock().unwrap().last_chat_request = Some(body);
    Json(json!({"response": reply})).into_response()
}

/// 所有请求都返回同一个响应的后端
pub async fn spawn_fixed_backend(status: StatusCode, body: &'static str, json: bool) -> String {
    let router = Router::new().fallback(move || async move {
        if json {
            (
                status,
                [("content-type", "application/json")],
                body.to_string(),
            )
                .into_response()
        } else {
            (status, [("content-type", "text/html")], body.to_string()).into_response()
        }
    });
    serve(router).await
}

/// 一个已释放的本地端口，连接必然被拒绝
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    format!("http://{}", addr)
}
