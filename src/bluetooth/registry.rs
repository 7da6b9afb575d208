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

//! Lookup over the bonded peer set.

use super::platform::Peer;

/// First peer named `name`, in enumeration order.
pub fn find_peer_by_name<'a, I>(peers: I, name: &str) -> Option<&'a Peer>
where
    I: IntoIterator<Item = &'a Peer>,
{
    peers.into_iter().find(|peer| peer.name == name)
}
