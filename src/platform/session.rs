// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cookie-bound HTTP session against the game platform.
//!
//! Authentication on the platform lives entirely in the session cookie set by
//! the login interface, so every call for one inbound request must go through
//! the same [`PlatformSession`]. A session is opened per request and dropped
//! with it; it is never pooled or shared.

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::types::{
    from_object, BalanceEnvelope, BalanceInfo, CipherMaterial, GameInfo, GameInfoReply,
    LoginOutcome, LoginReply,
};
use crate::{
    config::{Config, PlatformEndpoints},
    error::{Endpoint, GatewayError},
};

/// Largest reply body accepted from any platform interface.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub struct PlatformSession<'a> {
    endpoints: &'a PlatformEndpoints,
    http: Client,
}

impl<'a> PlatformSession<'a> {
    /// Open a session with a fresh, empty cookie store.
    pub fn open(config: &Config, endpoints: &'a PlatformEndpoints) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.upstream_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| GatewayError::Session(e.to_string()))?;

        Ok(Self { endpoints, http })
    }

    /// Fetch the key/IV pair used to encode the password.
    pub async fn cipher_material(&self) -> Result<CipherMaterial, GatewayError> {
        let url = self.endpoints.hash_info.clone();
        let response = self.send(Endpoint::HashInfo, self.http.get(url)).await?;
        let body = read_body(Endpoint::HashInfo, response).await?;
        decode(Endpoint::HashInfo, &body)
    }

    /// Submit encoded credentials to the login interface.
    pub async fn login(
        &self,
        username: &str,
        encoded_password: &str,
    ) -> Result<LoginOutcome, GatewayError> {
        let form = [
            ("username", username),
            ("password", encoded_password),
            ("remember_password", "0"),
            ("verify_code", ""),
        ];
        let request = self.http.post(self.endpoints.login.clone()).form(&form);
        let response = self.send(Endpoint::Login, request).await?;
        let body = read_body(Endpoint::Login, response).await?;
        let reply: LoginReply = decode(Endpoint::Login, &body)?;
        Ok(reply.into())
    }

    /// Register `username` with the already encoded password.
    ///
    /// The platform's reply is returned as text and not interpreted.
    pub async fn register(
        &self,
        username: &str,
        encoded_password: &str,
    ) -> Result<String, GatewayError> {
        let form = [
            ("reg_username", username),
            ("reg_password", encoded_password),
            ("reg_password_repeat", encoded_password),
            ("new_reg_source", "0"),
        ];
        let request = self.http.post(self.endpoints.register.clone()).form(&form);
        let response = self.send(Endpoint::Register, request).await?;
        let body = read_body(Endpoint::Register, response).await?;
        let body = String::from_utf8_lossy(&body).into_owned();
        info!(username, body = %body, "Register response");
        Ok(body)
    }

    /// Fetch the token bundle for `app_id`.
    pub async fn game_info(&self, app_id: &str) -> Result<GameInfo, GatewayError> {
        let url = self
            .endpoints
            .game_info(app_id)
            .map_err(|e| GatewayError::Transport {
                endpoint: Endpoint::GameInfo,
                message: e.to_string(),
            })?;
        let response = self.send(Endpoint::GameInfo, self.http.get(url)).await?;
        let body = read_body(Endpoint::GameInfo, response).await?;
        let reply: GameInfoReply = decode(Endpoint::GameInfo, &body)?;
        reply.into_result().map_err(GatewayError::Upstream)
    }

    /// Fetch the wallet balances of the logged-in user.
    pub async fn balance(&self) -> Result<BalanceInfo, GatewayError> {
        let url = self.endpoints.balance.clone();
        let response = self.send(Endpoint::Balance, self.http.get(url)).await?;
        let body = read_body(Endpoint::Balance, response).await?;
        debug!(body = %String::from_utf8_lossy(&body), "Balance response");

        let envelope: BalanceEnvelope = decode(Endpoint::Balance, &body)?;
        if envelope.code != 0 {
            warn!(code = envelope.code, "Balance request rejected by platform");
            return Err(GatewayError::UpstreamBalance {
                code: envelope.code,
            });
        }
        Ok(envelope.info)
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::transport(endpoint, e))?;

        // The platform reports failures in the body, so a non-success status
        // is only logged and the body is still decoded.
        if !response.status().is_success() {
            warn!(
                endpoint = %endpoint,
                status = %response.status(),
                url = %redact(response.url()),
                "Platform returned non-success status"
            );
        }
        Ok(response)
    }
}

/// Read the reply body in chunks, giving up once it passes [`MAX_BODY_BYTES`].
async fn read_body(endpoint: Endpoint, mut response: Response) -> Result<Vec<u8>, GatewayError> {
    let too_large = GatewayError::BodyTooLarge {
        endpoint,
        limit: MAX_BODY_BYTES,
    };
    if response
        .content_length()
        .is_some_and(|len| len > MAX_BODY_BYTES as u64)
    {
        return Err(too_large);
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| GatewayError::transport(endpoint, e))?
    {
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(too_large);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(endpoint: Endpoint, body: &[u8]) -> Result<T, GatewayError> {
    from_object(body).map_err(|e| GatewayError::decode(endpoint, e.to_string()))
}

/// URL without query string, for logs.
fn redact(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
