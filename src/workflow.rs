// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token acquisition workflow.
//!
//! One run per inbound request, strictly in this order:
//!
//! ```text
//! open session -> hash info -> login (-> register) -> game info -> balance
//! ```
//!
//! Every step reuses the same [`PlatformSession`] because the login cookie is
//! the only proof of authentication. The first failure aborts the run.

use tracing::{info, instrument};

use crate::{
    config::{Config, PlatformEndpoints},
    error::GatewayError,
    models::{CredentialRequest, TokenResponse},
    platform::{encode_password, LoginOutcome, PlatformSession},
};

/// How the session ended up authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPath {
    LoggedIn,
    Registered,
}

pub struct TokenWorkflow<'a> {
    config: &'a Config,
    endpoints: &'a PlatformEndpoints,
}

impl<'a> TokenWorkflow<'a> {
    pub fn new(config: &'a Config, endpoints: &'a PlatformEndpoints) -> Self {
        Self { config, endpoints }
    }

    #[instrument(
        name = "get_game_token",
        skip_all,
        fields(username = %request.username, app_id = %request.app_id)
    )]
    pub async fn run(&self, request: &CredentialRequest) -> Result<TokenResponse, GatewayError> {
        let session = PlatformSession::open(self.config, self.endpoints)?;

        let auth_path = authenticate(&session, &request.username, &request.password).await?;
        let game_info = session.game_info(&request.app_id).await?;
        let balance = session.balance().await?;

        info!(?auth_path, uid = game_info.uid, "Issued game token");
        Ok(TokenResponse::aggregate(game_info, balance))
    }
}

/// Log in, falling back to registration when the platform does not know the
/// user. The register reply is not checked.
async fn authenticate(
    session: &PlatformSession<'_>,
    username: &str,
    password: &str,
) -> Result<AuthPath, GatewayError> {
    let material = session.cipher_material().await?;
    let encoded = encode_password(&material, password)?;

    match session.login(username, &encoded).await? {
        LoginOutcome::Authenticated => Ok(AuthPath::LoggedIn),
        LoginOutcome::UnknownUser { error_code } => {
            info!(%error_code, "Login rejected, registering user");
            session.register(username, &encoded).await?;
            Ok(AuthPath::Registered)
        }
    }
}
