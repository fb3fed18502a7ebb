// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `POST /GetGameToken`: exchange player credentials for a game token.

use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::{
    error::GatewayError,
    models::{CredentialRequest, TokenResponse},
    state::AppState,
    workflow::TokenWorkflow,
};

/// Log the player in on the platform and return their game token and balance.
///
/// Unknown players are registered on the fly. Failures are reported as
/// `error: <message>` text (or a JSON error body when structured errors are
/// enabled).
#[utoipa::path(
    post,
    path = "/GetGameToken",
    request_body = CredentialRequest,
    tag = "Token",
    responses(
        (status = 200, description = "Token issued, or `error: <message>` text on failure", body = TokenResponse),
        (status = 400, description = "Malformed payload (structured errors only)"),
        (status = 405, description = "Method other than POST (structured errors only)"),
        (status = 502, description = "Platform failure (structured errors only)"),
        (status = 504, description = "Platform timeout (structured errors only)")
    )
)]
pub async fn get_game_token(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    let result = match decode_request(&method, &body) {
        Ok(request) => TokenWorkflow::new(&state.config, &state.endpoints)
            .run(&request)
            .await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            warn!(error = %e, error_code = e.error_code(), "GetGameToken failed");
            e.into_response_with(state.config.structured_errors)
        }
    }
}

/// Accept only POST with a JSON credential body. The content type is not
/// checked; legacy clients post JSON as form data.
fn decode_request(method: &Method, body: &[u8]) -> Result<CredentialRequest, GatewayError> {
    if *method != Method::POST {
        return Err(GatewayError::UnsupportedMethod(method.to_string()));
    }
    serde_json::from_slice(body).map_err(|e| GatewayError::MalformedPayload(e.to_string()))
}
