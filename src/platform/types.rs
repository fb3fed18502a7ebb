// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wire shapes of the platform interfaces.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Key/IV pair returned by the hash info interface. Used once, then dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct CipherMaterial {
    pub key: String,
    pub iv: String,
}

/// Login reply. The platform signals an unknown user by including an
/// `error_code` key; its value is irrelevant.
#[derive(Debug, Deserialize)]
pub struct LoginReply {
    #[serde(default, deserialize_with = "present")]
    pub error_code: Option<Value>,
}

/// Outcome of submitting credentials to the login interface.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// The session cookie now carries the authenticated user.
    Authenticated,
    /// The platform does not know the user; registration should follow.
    UnknownUser { error_code: Value },
}

impl From<LoginReply> for LoginOutcome {
    fn from(reply: LoginReply) -> Self {
        match reply.error_code {
            Some(error_code) => LoginOutcome::UnknownUser { error_code },
            None => LoginOutcome::Authenticated,
        }
    }
}

/// Per-game identity bundle. Fields the platform omits default to zero values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameInfo {
    pub app_id: String,
    pub app_name: String,
    pub uid: u32,
    pub username: String,
    pub timestamp: i64,
    pub user_ip: String,
    pub access_token: String,
    pub extra: String,
}

/// Game info reply: either an error envelope or the identity bundle.
///
/// Variant order matters: any object carrying `error` is a failure even if it
/// also carries game info fields.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GameInfoReply {
    Failure { error: Value },
    Info(GameInfo),
}

impl GameInfoReply {
    pub fn into_result(self) -> Result<GameInfo, String> {
        match self {
            GameInfoReply::Info(info) => Ok(info),
            GameInfoReply::Failure { error } => Err(error_message(error)),
        }
    }
}

/// Player wallet balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct BalanceInfo {
    #[serde(default)]
    pub cash: u64,
    #[serde(default)]
    pub coin: u64,
    #[serde(default)]
    pub nm: u64,
}

/// Balance reply; `code` is zero on success.
#[derive(Debug, Deserialize)]
pub struct BalanceEnvelope {
    pub code: i64,
    #[serde(default)]
    pub info: BalanceInfo,
}

/// Decode a platform reply that must be a JSON object.
///
/// Derived struct decoders also accept JSON arrays, so the body is read as a
/// map first and only then shaped into `T`.
pub fn from_object<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    let object: Map<String, Value> = serde_json::from_slice(body)?;
    T::deserialize(Value::Object(object))
}

/// Marks a field as present whenever its key exists, `null` included.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn error_message(error: Value) -> String {
    match error {
        Value::String(message) => message,
        other => other.to_string(),
    }
}
