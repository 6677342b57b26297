//! Shared test helpers
//!
//! - [`FakeHelloApi`]: an axum server on an ephemeral port that plays the Hello API
//! - [`ManualClock`]: a clock tests can move forward
//! - Helpers to read samples out of the text exposition format

#![allow(dead_code)]

use axum::{
    extract::{Form, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use hello_exporter::config::HelloConfig;
use hello_exporter::hello::Clock;
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, TextEncoder};
use secrecy::SecretString;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const USERNAME: &str = "sleeper@example.com";
pub const PASSWORD: &str = "hunter2";

/// Canned responses and recorded requests of the fake API
#[derive(Debug)]
pub struct FakeState {
    pub token_status: u16,
    /// Statuses used for the next token requests before falling back to `token_status`
    pub token_status_queue: VecDeque<u16>,
    pub token_body: String,
    pub token_delay: Duration,
    pub devices_status: u16,
    pub devices_body: String,
    pub room_status: u16,
    pub room_body: String,

    pub token_requests: usize,
    pub devices_requests: usize,
    pub room_requests: usize,
    pub last_token_form: Option<HashMap<String, String>>,
    pub last_authorization: Option<String>,
    pub last_room_query: Option<HashMap<String, String>>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            token_status: 200,
            token_status_queue: VecDeque::new(),
            token_body: token_body("abc", 3600),
            token_delay: Duration::ZERO,
            devices_status: 200,
            devices_body: r#"{"pills":[{"id":"p1","color":"blue","battery_level":42}],"senses":[]}"#
                .to_string(),
            room_status: 200,
            room_body: room_body(21.5),
            token_requests: 0,
            devices_requests: 0,
            room_requests: 0,
            last_token_form: None,
            last_authorization: None,
            last_room_query: None,
        }
    }
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeHelloApi {
    pub base_url: String,
    state: Shared,
}

impl FakeHelloApi {
    /// Starts the fake API on its own thread and runtime
    pub fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState::default()));

        let app = Router::new()
            .route("/v1/oauth2/token", post(token_handler))
            .route("/v2/devices", get(devices_handler))
            .route("/v1/room/current", get(room_handler))
            .with_state(state.clone());

        let base_url = serve_in_background(app);
        Self { base_url, state }
    }

    /// Mutates the canned responses
    pub fn configure(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.state.lock().unwrap());
    }

    /// Reads the recorded requests
    pub fn inspect<T>(&self, f: impl FnOnce(&FakeState) -> T) -> T {
        f(&self.state.lock().unwrap())
    }

    pub fn token_requests(&self) -> usize {
        self.inspect(|s| s.token_requests)
    }

    pub fn config(&self) -> HelloConfig {
        HelloConfig {
            username: USERNAME.to_string(),
            password: SecretString::from(PASSWORD),
            api_url: self.base_url.clone(),
            timeout_seconds: 5,
        }
    }
}

/// Serves `app` on 127.0.0.1 from a background thread, returning its base URL
pub fn serve_in_background(app: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    format!("http://{}", addr)
}

fn json_response(status: u16, body: String) -> Response {
    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

async fn token_handler(
    State(state): State<Shared>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let (status, body, delay) = {
        let mut s = state.lock().unwrap();
        s.token_requests += 1;
        s.last_token_form = Some(form);
        let status = s.token_status_queue.pop_front().unwrap_or(s.token_status);
        (status, s.token_body.clone(), s.token_delay)
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    json_response(status, body)
}

async fn devices_handler(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut s = state.lock().unwrap();
    s.devices_requests += 1;
    s.last_authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    json_response(s.devices_status, s.devices_body.clone())
}

async fn room_handler(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.room_requests += 1;
    s.last_authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    s.last_room_query = Some(query);
    json_response(s.room_status, s.room_body.clone())
}

pub fn token_body(access_token: &str, expires_in: i64) -> String {
    serde_json::json!({
        "token_type": "Bearer",
        "expires_in": expires_in,
        "account_id": "account-1",
        "access_token": access_token,
        "refresh_token": "refresh-1"
    })
    .to_string()
}

pub fn room_body(temperature: f64) -> String {
    let reading = |unit: &str, value: f64| {
        serde_json::json!({
            "unit": unit,
            "value": value,
            "last_updated_utc": 1_700_000_000_000i64,
            "condition": "IDEAL",
            "ideal_conditions": "",
            "message": ""
        })
    };
    serde_json::json!({
        "humidity": reading("%", 45.0),
        "light": reading("lux", 3.5),
        "particulates": reading("µg/m³", 12.0),
        "sound": reading("dB", 38.0),
        "temperature": reading("c", temperature)
    })
    .to_string()
}

/// Clock that only moves when told to
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        })
    }

    /// Moves the clock to `base + offset`
    pub fn set(&self, offset: Duration) {
        *self.offset.lock().unwrap() = offset;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}

/// Encodes metric families in the text exposition format
pub fn encode(families: &[MetricFamily]) -> String {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Value of the sample whose series (name plus labels) is exactly `series`
pub fn sample(rendered: &str, series: &str) -> Option<f64> {
    rendered
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find_map(|line| {
            let (key, value) = line.rsplit_once(' ')?;
            if key == series {
                value.parse().ok()
            } else {
                None
            }
        })
}

/// Number of samples of metric `name`
pub fn sample_count(rendered: &str, name: &str) -> usize {
    rendered
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter(|line| {
            line.strip_prefix(name)
                .map(|rest| rest.starts_with('{') || rest.starts_with(' '))
                .unwrap_or(false)
        })
        .count()
}
