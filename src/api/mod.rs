// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{HeaderName, Request},
    routing::{any, get},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{CredentialRequest, TokenResponse, UserInfo},
    platform::BalanceInfo,
    state::AppState,
};

pub mod crossdomain;
pub mod health;
pub mod token;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        // Any method is routed so non-POST requests get the legacy error body
        // instead of a bare 405.
        .route("/GetGameToken", any(token::get_game_token))
        .route("/crossdomain.xml", get(crossdomain::crossdomain))
        .route("/health", get(health::liveness))
        .with_state(state);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<axum::body::Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(token::get_game_token, crossdomain::crossdomain, health::liveness),
    components(
        schemas(
            CredentialRequest,
            TokenResponse,
            UserInfo,
            BalanceInfo,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Token", description = "Game token issuance"),
        (name = "Static", description = "Static policy files"),
        (name = "Health", description = "Health probes")
    )
)]
struct ApiDoc;
