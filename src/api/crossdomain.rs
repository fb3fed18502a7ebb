// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Serve the crossdomain policy file loaded at startup.
#[utoipa::path(
    get,
    path = "/crossdomain.xml",
    tag = "Static",
    responses((status = 200, description = "Crossdomain policy file", body = String, content_type = "text/xml"))
)]
pub async fn crossdomain(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        state.crossdomain.clone(),
    )
        .into_response()
}
