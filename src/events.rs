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

//! Event bus for gateway status messages.
//!
//! Each subscriber owns an unbounded queue, so publishing never waits on a
//! slow consumer. Events published before a subscriber registers are not
//! replayed.

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// A status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    text: String,
}

impl Event {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<String> for Event {
    fn from(text: String) -> Self {
        Self { text }
    }
}

impl From<&str> for Event {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Token identifying a registration; hand it back to [`EventBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

#[derive(Default)]
struct Inner {
    subscribers: RwLock<Vec<(Subscription, async_channel::Sender<Event>)>>,
    next_id: AtomicU64,
}

/// Publish/subscribe channel shared by the controller, the connection
/// worker and any number of views. Cloning yields another handle to the
/// same bus.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcast an event to every current subscriber.
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        debug!("Publishing event: {}", event);

        let mut saw_closed = false;
        {
            let subscribers = self.inner.subscribers.read();
            for (_, tx) in subscribers.iter() {
                // Unbounded, so this only fails once the receiver is gone.
                if tx.try_send(event.clone()).is_err() {
                    saw_closed = true;
                }
            }
        }

        if saw_closed {
            self.inner
                .subscribers
                .write()
                .retain(|(_, tx)| !tx.is_closed());
        }
    }

    /// Register a queue and hand its receiving end to the caller.
    pub fn subscribe_channel(&self) -> (Subscription, async_channel::Receiver<Event>) {
        let id = Subscription(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = async_channel::unbounded();
        self.inner.subscribers.write().push((id, tx));
        debug!("Subscriber {:?} registered", id);
        (id, rx)
    }

    /// Register a handler that runs on its own thread.
    ///
    /// A handler that blocks only holds up its own thread, never the
    /// publisher or the runtime. The thread ends once the subscription is
    /// removed and the queued events are drained.
    pub fn subscribe<F>(&self, mut handler: F) -> Subscription
    where
        F: FnMut(Event) + Send + 'static,
    {
        let (id, rx) = self.subscribe_channel();
        std::thread::spawn(move || {
            while let Ok(event) = rx.recv_blocking() {
                handler(event);
            }
            debug!("Subscriber {:?} finished", id);
        });
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut subscribers = self.inner.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(id, _)| *id != subscription);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
