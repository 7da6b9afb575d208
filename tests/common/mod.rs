//! Scriptable in-memory platform for gateway tests.

#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::DuplexStream;
use tokio::sync::oneshot;
use uuid::Uuid;

use stand_gateway::bluetooth::{Adapter, EnableCode, Peer, Platform, SerialStream};
use stand_gateway::{Event, EventBus, Subscription};

/// How the enable request is answered.
#[derive(Debug, Clone, Copy)]
pub enum EnableReply {
    Code(EnableCode),
    /// Drop the sender without answering.
    Abandon,
}

/// How `open_connection` behaves.
#[derive(Debug, Clone)]
pub enum OpenBehavior {
    Succeed,
    Fail(io::ErrorKind, String),
}

pub struct MockAdapter {
    enabled: AtomicBool,
    enable_reply: EnableReply,
    peers: Vec<Peer>,
    open: OpenBehavior,
    pub enable_requests: AtomicUsize,
    pub open_calls: AtomicUsize,
    pub opened_service: Mutex<Option<Uuid>>,
    /// Remote ends of successfully opened connections.
    pub remotes: Mutex<Vec<DuplexStream>>,
}

impl MockAdapter {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            enable_reply: EnableReply::Code(EnableCode::OK),
            peers: Vec::new(),
            open: OpenBehavior::Succeed,
            enable_requests: AtomicUsize::new(0),
            open_calls: AtomicUsize::new(0),
            opened_service: Mutex::new(None),
            remotes: Mutex::new(Vec::new()),
        }
    }

    pub fn disabled(self, reply: EnableReply) -> Self {
        self.enabled.store(false, Ordering::SeqCst);
        Self {
            enable_reply: reply,
            ..self
        }
    }

    pub fn with_peers(self, peers: &[(&str, &str)]) -> Self {
        Self {
            peers: peers
                .iter()
                .map(|(name, address)| Peer::new(*name, *address))
                .collect(),
            ..self
        }
    }

    pub fn failing_open(self, kind: io::ErrorKind, message: &str) -> Self {
        Self {
            open: OpenBehavior::Fail(kind, message.to_string()),
            ..self
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}

impl Adapter for MockAdapter {
    fn name(&self) -> String {
        "mock0".to_string()
    }

    fn is_enabled(&self) -> BoxFuture<'_, bool> {
        futures::future::ready(self.enabled.load(Ordering::SeqCst)).boxed()
    }

    fn request_enable(&self) -> oneshot::Receiver<EnableCode> {
        self.enable_requests.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        match self.enable_reply {
            EnableReply::Code(code) => {
                if code.is_ok() {
                    self.enabled.store(true, Ordering::SeqCst);
                }
                let _ = tx.send(code);
            }
            EnableReply::Abandon => drop(tx),
        }
        rx
    }

    fn bonded_peers(&self) -> BoxFuture<'_, Vec<Peer>> {
        futures::future::ready(self.peers.clone()).boxed()
    }

    fn remote_peer(&self, address: &str) -> BoxFuture<'_, io::Result<Peer>> {
        let peer = self
            .peers
            .iter()
            .find(|peer| peer.address == address)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "unknown address"));
        futures::future::ready(peer).boxed()
    }

    fn open_connection(
        &self,
        _peer: &Peer,
        service_id: Uuid,
    ) -> BoxFuture<'_, io::Result<Box<dyn SerialStream>>> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        *self.opened_service.lock() = Some(service_id);

        let result = match &self.open {
            OpenBehavior::Succeed => {
                let (local, remote) = tokio::io::duplex(256);
                self.remotes.lock().push(remote);
                Ok(Box::new(local) as Box<dyn SerialStream>)
            }
            OpenBehavior::Fail(kind, message) => Err(io::Error::new(*kind, message.clone())),
        };
        futures::future::ready(result).boxed()
    }
}

pub struct MockPlatform {
    adapter: Option<Arc<MockAdapter>>,
}

impl MockPlatform {
    pub fn absent() -> Arc<Self> {
        Arc::new(Self { adapter: None })
    }

    pub fn with_adapter(adapter: MockAdapter) -> (Arc<Self>, Arc<MockAdapter>) {
        let adapter = Arc::new(adapter);
        (
            Arc::new(Self {
                adapter: Some(adapter.clone()),
            }),
            adapter,
        )
    }
}

impl Platform for MockPlatform {
    fn default_adapter(&self) -> BoxFuture<'_, Option<Arc<dyn Adapter>>> {
        let adapter = self
            .adapter
            .clone()
            .map(|adapter| adapter as Arc<dyn Adapter>);
        futures::future::ready(adapter).boxed()
    }
}

/// Collects everything published on a bus.
pub struct Recorder {
    pub subscription: Subscription,
    rx: async_channel::Receiver<Event>,
}

impl Recorder {
    pub fn attach(bus: &EventBus) -> Self {
        let (subscription, rx) = bus.subscribe_channel();
        Self { subscription, rx }
    }

    /// Everything received so far.
    pub fn drain(&self) -> Vec<String> {
        let mut texts = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            texts.push(event.text().to_string());
        }
        texts
    }
}

pub const TARGET_ADDRESS: &str = "98:D3:31:F5:1A:2B";
