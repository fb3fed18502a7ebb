// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::fmt;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::platform::CipherError;

/// Platform interface an upstream failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    HashInfo,
    Login,
    Register,
    GameInfo,
    Balance,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::HashInfo => "hash info",
            Endpoint::Login => "login",
            Endpoint::Register => "register",
            Endpoint::GameInfo => "game info",
            Endpoint::Balance => "balance",
        };
        f.write_str(name)
    }
}

/// Everything that can abort a token request.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("please use POST. method: {0}")]
    UnsupportedMethod(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("failed to create platform session: {0}")]
    Session(String),

    #[error("{endpoint} request failed: {message}")]
    Transport { endpoint: Endpoint, message: String },

    #[error("{endpoint} request timed out")]
    Timeout { endpoint: Endpoint },

    #[error("invalid {endpoint} response: {message}")]
    Decode { endpoint: Endpoint, message: String },

    #[error("{endpoint} response exceeds {limit} bytes")]
    BodyTooLarge { endpoint: Endpoint, limit: usize },

    #[error("password encoding failed: {0}")]
    Cipher(#[from] CipherError),

    #[error("{0}")]
    Upstream(String),

    #[error("balance request returned code {code}")]
    UpstreamBalance { code: i64 },
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: &'static str,
}

impl GatewayError {
    /// Classify a `reqwest` failure on `endpoint`.
    pub fn transport(endpoint: Endpoint, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout { endpoint }
        } else {
            GatewayError::Transport {
                endpoint,
                message: err.to_string(),
            }
        }
    }

    pub fn decode(endpoint: Endpoint, message: impl Into<String>) -> Self {
        GatewayError::Decode {
            endpoint,
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::UnsupportedMethod(_) => "unsupported_method",
            GatewayError::MalformedPayload(_) => "malformed_payload",
            GatewayError::Session(_) => "session_error",
            GatewayError::Transport { .. } => "transport_error",
            GatewayError::Timeout { .. } => "upstream_timeout",
            GatewayError::Decode { .. } => "decode_error",
            GatewayError::BodyTooLarge { .. } => "body_too_large",
            GatewayError::Cipher(_) => "cipher_error",
            GatewayError::Upstream(_) => "upstream_error",
            GatewayError::UpstreamBalance { .. } => "upstream_balance_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            GatewayError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Transport { .. }
            | GatewayError::Decode { .. }
            | GatewayError::BodyTooLarge { .. }
            | GatewayError::Cipher(_)
            | GatewayError::Upstream(_)
            | GatewayError::UpstreamBalance { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Render as `200 text/plain` with an `error: <message>` body, the format
    /// existing game clients parse.
    pub fn legacy_response(&self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("error: {self}"),
        )
            .into_response()
    }

    /// Render with a matching status code and a JSON body.
    pub fn structured_response(&self) -> Response {
        let body = Json(ErrorBody {
            error: self.to_string(),
            error_code: self.error_code(),
        });
        (self.status_code(), body).into_response()
    }

    pub fn into_response_with(self, structured: bool) -> Response {
        if structured {
            self.structured_response()
        } else {
            self.legacy_response()
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        self.legacy_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn legacy_response_is_plain_text_ok() {
        let response = GatewayError::UnsupportedMethod("GET".into()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            body_string(response).await,
            "error: please use POST. method: GET"
        );
    }

    #[tokio::test]
    async fn structured_response_carries_status_and_code() {
        let response = GatewayError::Upstream("app not found".into()).into_response_with(true);
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "app not found");
        assert_eq!(body["error_code"], "upstream_error");
    }

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            GatewayError::MalformedPayload("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Timeout {
                endpoint: Endpoint::Balance
            }
            .status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            GatewayError::UpstreamBalance { code: 3 }.status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn messages_name_the_failing_endpoint() {
        let err = GatewayError::decode(Endpoint::GameInfo, "expected value");
        assert_eq!(err.to_string(), "invalid game info response: expected value");

        let err = GatewayError::Timeout {
            endpoint: Endpoint::HashInfo,
        };
        assert_eq!(err.to_string(), "hash info request timed out");

        let err = GatewayError::BodyTooLarge {
            endpoint: Endpoint::Login,
            limit: 1024,
        };
        assert_eq!(err.to_string(), "login response exceeds 1024 bytes");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
