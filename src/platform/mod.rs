// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Game Platform Client
//!
//! Typed access to the five platform interfaces used to obtain a game token:
//!
//! | Interface | Method | Reply |
//! |-----------|--------|-------|
//! | hash info | `GET` | `{key, iv}` |
//! | login | `POST` form | object, `error_code` key for unknown users |
//! | register | `POST` form | not interpreted |
//! | game info | `GET .../{appid}` | identity bundle or `{error}` |
//! | balance | `GET` | `{code, info: {cash, coin, nm}}` |

pub mod cipher;
pub mod session;
pub mod types;

pub use cipher::{encode_password, CipherError};
pub use session::{PlatformSession, MAX_BODY_BYTES};
pub use types::{BalanceInfo, CipherMaterial, GameInfo, LoginOutcome};
