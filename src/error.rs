// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Gateway failure taxonomy.
//!
//! Every variant renders as the line published on the event bus, so the
//! `Display` text is user-facing.

use thiserror::Error;

/// Reasons a connect attempt stops.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No adapter on this machine.
    #[error("no bluetooth adapter, bluetooth not supported by device")]
    TransportAbsent,

    /// The enablement request came back with something other than OK.
    #[error("bluetooth enable not successful, resultCode {code}")]
    EnableDeclined { code: i32 },

    /// Target is not among the bonded devices.
    #[error("{name} not found among paired devices. giving up")]
    PeerNotFound { name: String },

    /// Adapter vanished or was switched off after the worker was dispatched.
    #[error("transport unavailable, bluetooth adapter gone or disabled")]
    TransportUnavailable,

    /// Socket could not be opened.
    #[error("failed to open socket: {0}")]
    ConnectionIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
