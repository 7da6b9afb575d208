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

//! Fixed identifiers shared with the StandController firmware.

use uuid::Uuid;

/// Standard serial port profile UUID. The HC-06 module on the peer only
/// answers on this one.
pub const SPP_UUID: Uuid = Uuid::from_u128(0x00001101_0000_1000_8000_00805F9B34FB);

/// Name the peer advertises once paired.
pub const DEFAULT_TARGET_NAME: &str = "StandController";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_format() {
        assert_eq!(
            SPP_UUID.to_string().to_lowercase(),
            "00001101-0000-1000-8000-00805f9b34fb"
        );
    }
}
