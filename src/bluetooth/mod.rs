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

//! Bluetooth communication module.
//!
//! Opens the RFCOMM client link to the StandController over the serial
//! port profile.

#[cfg(feature = "bluez")]
mod bluez;
mod connection;
mod constants;
mod platform;
mod registry;

#[cfg(feature = "bluez")]
pub use bluez::{BluezAdapter, BluezPlatform};
pub use connection::{ConnectionHandle, ConnectionState, ConnectionWorker};
pub use constants::{DEFAULT_TARGET_NAME, SPP_UUID};
pub use platform::{Adapter, EnableCode, Peer, Platform, SerialStream};
pub use registry::find_peer_by_name;
