// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of `POST /GetGameToken`. Platform wire types
//! live in [`crate::platform::types`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::platform::{BalanceInfo, GameInfo};

/// `ret` value of a successful token response.
pub const RET_OK: u32 = 0;

/// Player credentials and the game the token is requested for.
#[derive(Clone, Deserialize, ToSchema)]
pub struct CredentialRequest {
    pub username: String,
    /// Plaintext password; only its encoded form ever leaves the process.
    pub password: String,
    /// Target application id.
    #[serde(rename = "appid")]
    pub app_id: String,
}

impl std::fmt::Debug for CredentialRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("app_id", &self.app_id)
            .finish()
    }
}

/// Player identity merged with the per-game token bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub uid: u32,
    pub username: String,
    pub app_id: String,
    pub app_name: String,
    /// Token issue time (unix seconds).
    pub timestamp: i64,
    pub user_ip: String,
    pub access_token: String,
    pub extra: String,
}

impl From<GameInfo> for UserInfo {
    fn from(info: GameInfo) -> Self {
        Self {
            uid: info.uid,
            username: info.username,
            app_id: info.app_id,
            app_name: info.app_name,
            timestamp: info.timestamp,
            user_ip: info.user_ip,
            access_token: info.access_token,
            extra: info.extra,
        }
    }
}

/// Aggregated token response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Always `0`; failures use the error format instead.
    pub ret: u32,
    pub userinfo: UserInfo,
    pub balance: BalanceInfo,
}

impl TokenResponse {
    /// Merge the game info and balance fetched for one request.
    pub fn aggregate(game_info: GameInfo, balance: BalanceInfo) -> Self {
        Self {
            ret: RET_OK,
            userinfo: game_info.into(),
            balance,
        }
    }
}
