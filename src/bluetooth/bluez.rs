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

//! BlueZ platform backend.

use anyhow::Result;
use bluer::rfcomm::{Profile, ReqError, Role};
use bluer::{Address, Session};
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use std::io;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::platform::{Adapter, EnableCode, Peer, Platform, SerialStream};

fn io_error(err: bluer::Error) -> io::Error {
    io::Error::other(err.to_string())
}

fn parse_address(address: &str) -> io::Result<Address> {
    address.parse().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid bluetooth address {}", address),
        )
    })
}

/// Platform backed by the system BlueZ daemon.
pub struct BluezPlatform {
    session: Session,
}

impl BluezPlatform {
    /// Connect to BlueZ over D-Bus.
    pub async fn new() -> Result<Self> {
        let session = Session::new().await?;
        info!("BlueZ session created");
        Ok(Self { session })
    }
}

impl Platform for BluezPlatform {
    fn default_adapter(&self) -> BoxFuture<'_, Option<Arc<dyn Adapter>>> {
        async move {
            match self.session.default_adapter().await {
                Ok(adapter) => {
                    info!("Using Bluetooth adapter: {}", adapter.name());
                    Some(Arc::new(BluezAdapter {
                        session: self.session.clone(),
                        adapter,
                    }) as Arc<dyn Adapter>)
                }
                Err(e) => {
                    warn!("No Bluetooth adapter: {}", e);
                    None
                }
            }
        }
        .boxed()
    }
}

/// A BlueZ adapter.
pub struct BluezAdapter {
    session: Session,
    adapter: bluer::Adapter,
}

impl Adapter for BluezAdapter {
    fn name(&self) -> String {
        self.adapter.name().to_string()
    }

    fn is_enabled(&self) -> BoxFuture<'_, bool> {
        async move {
            self.adapter.is_powered().await.unwrap_or_else(|e| {
                warn!("Could not read adapter power state: {}", e);
                false
            })
        }
        .boxed()
    }

    fn request_enable(&self) -> oneshot::Receiver<EnableCode> {
        let (tx, rx) = oneshot::channel();
        let adapter = self.adapter.clone();

        tokio::spawn(async move {
            info!("Powering on Bluetooth adapter...");
            let code = match adapter.set_powered(true).await {
                Ok(()) => EnableCode::OK,
                Err(e) => {
                    warn!("Failed to power on adapter: {}", e);
                    EnableCode::CANCELED
                }
            };
            let _ = tx.send(code);
        });

        rx
    }

    fn bonded_peers(&self) -> BoxFuture<'_, Vec<Peer>> {
        async move {
            let addresses = match self.adapter.device_addresses().await {
                Ok(addresses) => addresses,
                Err(e) => {
                    warn!("Could not list devices: {}", e);
                    return Vec::new();
                }
            };

            let mut peers = Vec::new();
            for addr in addresses {
                let device = match self.adapter.device(addr) {
                    Ok(device) => device,
                    Err(e) => {
                        debug!("Skipping {}: {}", addr, e);
                        continue;
                    }
                };
                if device.is_paired().await.unwrap_or(false) {
                    let name = device.alias().await.unwrap_or_else(|_| addr.to_string());
                    peers.push(Peer::new(name, addr.to_string()));
                }
            }

            debug!("Found {} paired devices", peers.len());
            peers
        }
        .boxed()
    }

    fn remote_peer(&self, address: &str) -> BoxFuture<'_, io::Result<Peer>> {
        let address = address.to_string();
        async move {
            let addr = parse_address(&address)?;
            let device = self.adapter.device(addr).map_err(io_error)?;
            let name = device.alias().await.unwrap_or_else(|_| address.clone());
            Ok(Peer::new(name, address))
        }
        .boxed()
    }

    fn open_connection(
        &self,
        peer: &Peer,
        service_id: Uuid,
    ) -> BoxFuture<'_, io::Result<Box<dyn SerialStream>>> {
        let address = peer.address.clone();
        async move {
            let addr = parse_address(&address)?;
            let device = self.adapter.device(addr).map_err(io_error)?;

            let profile = Profile {
                uuid: service_id,
                name: Some("Stand Gateway SPP".to_string()),
                role: Some(Role::Client),
                require_authentication: Some(false),
                require_authorization: Some(false),
                auto_connect: Some(false),
                ..Default::default()
            };
            let mut profile_handle = self
                .session
                .register_profile(profile)
                .await
                .map_err(io_error)?;
            debug!("SPP client profile registered (UUID: {})", service_id);

            // BlueZ delivers the socket through the profile once the
            // connect call goes through.
            let accept = async {
                while let Some(request) = profile_handle.next().await {
                    if request.device() == addr {
                        return request.accept().map_err(io_error);
                    }
                    debug!("Rejecting RFCOMM request from {}", request.device());
                    request.reject(ReqError::Rejected);
                }
                Err(io::Error::new(
                    io::ErrorKind::NotConnected,
                    "profile unregistered before connection",
                ))
            };
            tokio::pin!(accept);

            info!("Connecting to {} on {}", addr, service_id);
            let stream = tokio::select! {
                connected = device.connect_profile(&service_id) => {
                    connected.map_err(io_error)?;
                    accept.await?
                }
                stream = &mut accept => stream?,
            };

            Ok(Box::new(stream) as Box<dyn SerialStream>)
        }
        .boxed()
    }
}
