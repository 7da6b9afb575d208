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

//! Message log shown to the user.

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::events::{EventBus, Subscription};

/// One appended log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub at: DateTime<Local>,
    pub message: String,
}

impl LogLine {
    pub fn render(&self, show_timestamps: bool) -> String {
        if show_timestamps {
            format!("{} {}", self.at.format("%H:%M:%S"), self.message)
        } else {
            self.message.clone()
        }
    }
}

/// Append-only message log.
#[derive(Debug, Default)]
pub struct LogView {
    lines: RwLock<Vec<LogLine>>,
}

impl LogView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn append(&self, message: impl Into<String>) -> LogLine {
        let line = LogLine {
            at: Local::now(),
            message: message.into(),
        };
        self.lines.write().push(line.clone());
        line
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.read().clone()
    }

    pub fn last(&self) -> Option<LogLine> {
        self.lines.read().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.read().is_empty()
    }

    /// Whole log, one message per line.
    pub fn render(&self, show_timestamps: bool) -> String {
        self.lines
            .read()
            .iter()
            .map(|line| line.render(show_timestamps) + "\n")
            .collect()
    }

    /// Append every event published on `bus` from now on, passing each new
    /// line to `on_line`.
    pub fn attach<F>(self: &Arc<Self>, bus: &EventBus, mut on_line: F) -> Subscription
    where
        F: FnMut(&LogLine) + Send + 'static,
    {
        let view = Arc::clone(self);
        bus.subscribe(move |event| {
            let line = view.append(event.text());
            on_line(&line);
        })
    }
}
