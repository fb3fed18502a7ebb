// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Game Token Gateway
//!
//! Server-side adapter between game clients and the game platform. A client
//! posts `{username, password, appid}`; the gateway logs the player into the
//! platform (registering unknown players), fetches the per-game access token
//! and the wallet balance, and returns both in one JSON payload.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `config` - JSON configuration file and environment overrides
//! - `platform` - Platform session, wire types and password cipher
//! - `workflow` - The per-request token acquisition sequence

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod platform;
pub mod state;
pub mod workflow;
