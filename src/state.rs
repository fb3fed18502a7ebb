// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::body::Bytes;

use crate::config::{Config, ConfigError, PlatformEndpoints};

/// Immutable per-process state shared by all handlers.
///
/// Holds no platform session: sessions are created inside each request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub endpoints: Arc<PlatformEndpoints>,
    /// Contents of the crossdomain policy file, loaded at startup.
    pub crossdomain: Bytes,
}

impl AppState {
    pub fn new(config: Config, crossdomain: impl Into<Bytes>) -> Result<Self, ConfigError> {
        let endpoints = PlatformEndpoints::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            endpoints: Arc::new(endpoints),
            crossdomain: crossdomain.into(),
        })
    }

    /// Build state from `config`, reading the crossdomain file it names.
    pub fn load(config: Config) -> Result<Self, ConfigError> {
        let path = config.crossdomain_path.clone();
        let crossdomain = std::fs::read(&path).map_err(|source| ConfigError::Read { path, source })?;
        Self::new(config, crossdomain)
    }
}
