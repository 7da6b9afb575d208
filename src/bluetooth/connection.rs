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

//! Connection worker for the StandController link.

use std::fmt;
use std::io;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::constants::SPP_UUID;
use super::platform::{Peer, Platform, SerialStream};
use crate::error::{GatewayError, Result};
use crate::events::EventBus;

/// State of a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Dispatched, nothing done yet.
    Start,
    /// Turning the address back into a peer.
    Resolving,
    /// Socket open in progress.
    Opening,
    /// Socket established.
    Connected,
    /// Gave up with the given reason.
    Failed(String),
}

impl ConnectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::Connected | ConnectionState::Failed(_))
    }
}

/// An open socket to a peer.
pub struct ConnectionHandle {
    peer: Peer,
    service_id: Uuid,
    stream: Option<Box<dyn SerialStream>>,
}

impl ConnectionHandle {
    pub fn new(peer: Peer, service_id: Uuid, stream: Box<dyn SerialStream>) -> Self {
        Self {
            peer,
            service_id,
            stream: Some(stream),
        }
    }

    pub fn peer(&self) -> &Peer {
        &self.peer
    }

    pub fn service_id(&self) -> Uuid {
        self.service_id
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Raw byte access while the handle is open.
    pub fn stream_mut(&mut self) -> Option<&mut Box<dyn SerialStream>> {
        self.stream.as_mut()
    }

    /// Take the stream out, leaving the handle closed.
    pub fn into_stream(mut self) -> Option<Box<dyn SerialStream>> {
        self.stream.take()
    }

    /// Shut the stream down. Closing twice is a no-op.
    pub async fn close(&mut self) -> io::Result<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await?;
            debug!("Connection to {} closed", self.peer.address);
        }
        Ok(())
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("peer", &self.peer)
            .field("service_id", &self.service_id)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Single-shot worker that opens the link to one peer address.
///
/// The worker reports only through the event bus. On success the handle
/// goes to the hand-off channel when one is set, otherwise it is closed.
pub struct ConnectionWorker {
    address: String,
    platform: Arc<dyn Platform>,
    bus: EventBus,
    handoff: Option<mpsc::UnboundedSender<ConnectionHandle>>,
    state: ConnectionState,
}

impl ConnectionWorker {
    /// Create a worker for `address`.
    pub fn new(
        address: String,
        platform: Arc<dyn Platform>,
        bus: EventBus,
        handoff: Option<mpsc::UnboundedSender<ConnectionHandle>>,
    ) -> Self {
        Self {
            address,
            platform,
            bus,
            handoff,
            state: ConnectionState::Start,
        }
    }

    /// Run the worker on its own task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the worker to completion.
    pub async fn run(mut self) {
        info!("Connection worker started for {}", self.address);
        self.bus
            .publish(format!("connecting to device at {}", self.address));

        match self.establish().await {
            Ok(handle) => {
                self.transition(ConnectionState::Connected);
                info!("Connected to {} ({})", handle.peer().name, self.address);
                self.bus.publish("successfully connected");
                self.dispose(handle).await;
            }
            Err(e) => {
                error!("Connection to {} failed: {}", self.address, e);
                self.transition(ConnectionState::Failed(e.to_string()));
                self.bus.publish(e.to_string());
            }
        }
    }

    fn transition(&mut self, next: ConnectionState) {
        debug!("Worker {}: {:?} -> {:?}", self.address, self.state, next);
        self.state = next;
    }

    async fn establish(&mut self) -> Result<ConnectionHandle> {
        self.transition(ConnectionState::Resolving);

        let adapter = self
            .platform
            .default_adapter()
            .await
            .ok_or(GatewayError::TransportUnavailable)?;
        if !adapter.is_enabled().await {
            return Err(GatewayError::TransportUnavailable);
        }
        let peer = adapter.remote_peer(&self.address).await?;

        self.transition(ConnectionState::Opening);
        let stream = adapter.open_connection(&peer, SPP_UUID).await?;

        Ok(ConnectionHandle::new(peer, SPP_UUID, stream))
    }

    async fn dispose(&self, mut handle: ConnectionHandle) {
        if let Some(handoff) = &self.handoff {
            match handoff.send(handle) {
                Ok(()) => {
                    debug!("Connection to {} handed off", self.address);
                    return;
                }
                Err(mpsc::error::SendError(returned)) => {
                    warn!("Hand-off receiver gone, closing connection");
                    handle = returned;
                }
            }
        }

        if let Err(e) = handle.close().await {
            warn!("Error closing connection to {}: {}", self.address, e);
        }
    }
}
