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

//! Gateway controller.
//!
//! Checks the adapter, asks for it to be switched on when needed, finds the
//! target among bonded devices and hands the address to a
//! [`ConnectionWorker`]. Every stop is reported on the event bus.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bluetooth::{
    find_peer_by_name, ConnectionHandle, ConnectionWorker, EnableCode, Peer, Platform,
    DEFAULT_TARGET_NAME,
};
use crate::error::{GatewayError, Result};
use crate::events::EventBus;

/// Orchestrates one connect attempt per trigger.
#[derive(Clone)]
pub struct Gateway {
    platform: Arc<dyn Platform>,
    bus: EventBus,
    target_name: String,
    handoff: Option<mpsc::UnboundedSender<ConnectionHandle>>,
}

impl Gateway {
    /// Create a gateway targeting [`DEFAULT_TARGET_NAME`].
    pub fn new(platform: Arc<dyn Platform>, bus: EventBus) -> Self {
        Self {
            platform,
            bus,
            target_name: DEFAULT_TARGET_NAME.to_string(),
            handoff: None,
        }
    }

    /// Target a differently named peer.
    pub fn with_target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = name.into();
        self
    }

    /// Send open connections here instead of closing them.
    pub fn with_handoff(mut self, handoff: mpsc::UnboundedSender<ConnectionHandle>) -> Self {
        self.handoff = Some(handoff);
        self
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Fire-and-forget variant of [`Gateway::connect`] for callers that must
    /// not await.
    pub fn trigger(&self) -> JoinHandle<Option<JoinHandle<()>>> {
        let gateway = self.clone();
        tokio::spawn(async move { gateway.connect().await })
    }

    /// Run one connect attempt.
    ///
    /// Returns the dispatched worker's task, or `None` if the attempt stopped
    /// before dispatch. The worker's outcome is only visible on the bus.
    pub async fn connect(&self) -> Option<JoinHandle<()>> {
        info!("Starting bluetooth");

        match self.locate_target().await {
            Ok(peer) => {
                info!("Found {} at {}", peer.name, peer.address);
                self.bus
                    .publish(format!("found device {}", self.target_name));

                let worker = ConnectionWorker::new(
                    peer.address,
                    self.platform.clone(),
                    self.bus.clone(),
                    self.handoff.clone(),
                );
                Some(worker.spawn())
            }
            Err(e) => {
                warn!("Connect attempt stopped: {}", e);
                self.bus.publish(e.to_string());
                None
            }
        }
    }

    async fn locate_target(&self) -> Result<Peer> {
        let adapter = self
            .platform
            .default_adapter()
            .await
            .ok_or(GatewayError::TransportAbsent)?;

        if !adapter.is_enabled().await {
            self.bus
                .publish("bluetooth not enabled, requesting permission");
            let code = adapter
                .request_enable()
                .await
                .unwrap_or(EnableCode::CANCELED);
            if !code.is_ok() {
                return Err(GatewayError::EnableDeclined { code: code.0 });
            }
            info!("Adapter {} enabled", adapter.name());
        }

        self.bus.publish("bluetooth ready, searching paired devices");
        let peers = adapter.bonded_peers().await;
        debug!("{} bonded peers on {}", peers.len(), adapter.name());

        find_peer_by_name(&peers, &self.target_name)
            .cloned()
            .ok_or_else(|| GatewayError::PeerNotFound {
                name: self.target_name.clone(),
            })
    }
}
