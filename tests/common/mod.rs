// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process stand-in for the game platform.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use game_token_gateway::{api::router, config::Config, state::AppState};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const SESSION_COOKIE: &str = "PLATFORMSESSID=alice-session";

pub const HASH_INFO: &str = r#"{"key":"0123456789abcdef","iv":"fedcba9876543210"}"#;
pub const GAME_INFO: &str = r#"{"app_id":"game42","app_name":"Demo","uid":7,"username":"alice","timestamp":1690000000,"user_ip":"1.2.3.4","access_token":"tok-abc","extra":""}"#;
pub const BALANCE: &str = r#"{"code":0,"info":{"cash":100,"coin":50,"nm":0}}"#;

/// Canned platform replies.
#[derive(Clone)]
pub struct Replies {
    pub hash_info: String,
    pub login: String,
    pub register: String,
    pub game_info: String,
    pub balance: String,
    pub balance_delay: Option<Duration>,
    /// Close the connection instead of answering the register call.
    pub drop_register: bool,
}

impl Default for Replies {
    fn default() -> Self {
        Self {
            hash_info: HASH_INFO.to_string(),
            login: "{}".to_string(),
            register: r#"{"status":"ok"}"#.to_string(),
            game_info: GAME_INFO.to_string(),
            balance: BALANCE.to_string(),
            balance_delay: None,
            drop_register: false,
        }
    }
}

/// One recorded platform call.
#[derive(Debug, Clone)]
pub struct Call {
    pub endpoint: &'static str,
    pub cookie: Option<String>,
    pub form: HashMap<String, String>,
    pub app_id: Option<String>,
}

#[derive(Clone)]
pub struct StubPlatform {
    replies: Arc<Replies>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl StubPlatform {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn endpoints_called(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.endpoint).collect()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| c.endpoint == endpoint).count()
    }

    pub fn forms(&self, endpoint: &str) -> Vec<HashMap<String, String>> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == endpoint)
            .map(|c| c.form)
            .collect()
    }

    fn record(
        &self,
        endpoint: &'static str,
        headers: &HeaderMap,
        form: HashMap<String, String>,
        app_id: Option<String>,
    ) {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.calls.lock().unwrap().push(Call {
            endpoint,
            cookie,
            form,
            app_id,
        });
    }
}

fn json(body: &str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

async fn hash_info(State(stub): State<StubPlatform>, headers: HeaderMap) -> Response {
    stub.record("hashinfo", &headers, HashMap::new(), None);
    json(&stub.replies.hash_info)
}

async fn login(
    State(stub): State<StubPlatform>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    stub.record("login", &headers, form, None);
    let mut response = json(&stub.replies.login);
    response.headers_mut().insert(
        header::SET_COOKIE,
        format!("{SESSION_COOKIE}; Path=/").parse().unwrap(),
    );
    response
}

async fn register(
    State(stub): State<StubPlatform>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    stub.record("register", &headers, form, None);
    if stub.replies.drop_register {
        // Unwinding the connection task closes the socket without a reply.
        panic!("register connection dropped");
    }
    json(&stub.replies.register)
}

async fn game_info(
    State(stub): State<StubPlatform>,
    Path(app_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    stub.record("gameinfo", &headers, HashMap::new(), Some(app_id));
    json(&stub.replies.game_info)
}

async fn balance(State(stub): State<StubPlatform>, headers: HeaderMap) -> Response {
    stub.record("balance", &headers, HashMap::new(), None);
    if let Some(delay) = stub.replies.balance_delay {
        tokio::time::sleep(delay).await;
    }
    json(&stub.replies.balance)
}

/// Serve the stub on an ephemeral port; returns it with its `host:port`.
pub async fn spawn_platform(replies: Replies) -> (StubPlatform, String) {
    let stub = StubPlatform {
        replies: Arc::new(replies),
        calls: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/api/hashinfo", get(hash_info))
        .route("/api/login", post(login))
        .route("/api/register", post(register))
        .route("/api/gameinfo/{app_id}", get(game_info))
        .route("/api/balance", get(balance))
        .with_state(stub.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (stub, address)
}

pub fn gateway_config(platform_addr: &str) -> Config {
    let raw = format!(
        r#"{{
            "http_service_port": 0,
            "platform_url": "{platform_addr}",
            "interface_hashinfo": "api/hashinfo",
            "interface_login": "api/login",
            "interface_register": "api/register",
            "interface_gameinfo": "api/gameinfo",
            "interface_balance": "api/balance",
            "upstream_timeout_secs": 2
        }}"#
    );
    Config::from_slice(raw.as_bytes()).unwrap()
}

pub fn gateway(config: Config) -> Router {
    router(AppState::new(config, "<cross-domain-policy/>").unwrap())
}

/// Send one request through the gateway router; returns status and body text.
pub async fn send(app: Router, method: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri("/GetGameToken")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
