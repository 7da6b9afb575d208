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

//! Platform transport abstraction.
//!
//! The gateway only talks to the radio through these traits, so the BlueZ
//! backend and test doubles are interchangeable.

use futures::future::BoxFuture;
use std::fmt;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::oneshot;
use uuid::Uuid;

/// A remote device already bonded with the local adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Peer {
    pub name: String,
    /// Opaque platform address, e.g. `98:D3:31:F5:1A:2B`.
    pub address: String,
}

impl Peer {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Result code of an enablement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnableCode(pub i32);

impl EnableCode {
    /// User or platform switched the radio on.
    pub const OK: EnableCode = EnableCode(-1);
    /// Request declined or abandoned.
    pub const CANCELED: EnableCode = EnableCode(0);

    pub fn is_ok(self) -> bool {
        self == Self::OK
    }
}

impl fmt::Display for EnableCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw byte stream of an open connection.
pub trait SerialStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> SerialStream for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

/// Entry point into the platform's Bluetooth stack.
pub trait Platform: Send + Sync {
    /// The local adapter, or `None` if this machine has none.
    fn default_adapter(&self) -> BoxFuture<'_, Option<Arc<dyn Adapter>>>;
}

/// Local radio.
pub trait Adapter: Send + Sync {
    /// Adapter name for logging.
    fn name(&self) -> String;

    /// Whether the radio is currently powered.
    fn is_enabled(&self) -> BoxFuture<'_, bool>;

    /// Ask the platform to switch the radio on. The answer arrives once on
    /// the returned receiver; a dropped sender counts as declined.
    fn request_enable(&self) -> oneshot::Receiver<EnableCode>;

    /// Devices bonded with this adapter, in platform order.
    fn bonded_peers(&self) -> BoxFuture<'_, Vec<Peer>>;

    /// Turn an address back into a live peer reference.
    fn remote_peer(&self, address: &str) -> BoxFuture<'_, io::Result<Peer>>;

    /// Open an RFCOMM connection to `peer` on `service_id`. Resolves once the
    /// socket is established or the transport gives up.
    fn open_connection(
        &self,
        peer: &Peer,
        service_id: Uuid,
    ) -> BoxFuture<'_, io::Result<Box<dyn SerialStream>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_codes() {
        assert!(EnableCode::OK.is_ok());
        assert!(!EnableCode::CANCELED.is_ok());
        assert!(!EnableCode(7).is_ok());
        assert_eq!(EnableCode::CANCELED.to_string(), "0");
    }
}
