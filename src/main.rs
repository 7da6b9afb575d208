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

//! Stand Gateway

use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stand_gateway::bluetooth::BluezPlatform;
use stand_gateway::config::Config;
use stand_gateway::{EventBus, Gateway, LogView};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stand_gateway=info".parse()?),
        )
        .init();

    info!("Starting Stand Gateway v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded");

    // Log view prints every event as it lands
    let bus = EventBus::new();
    let view = LogView::new();
    let show_timestamps = config.log.show_timestamps;
    let subscription = view.attach(&bus, move |line| {
        println!("{}", line.render(show_timestamps));
    });

    let platform = Arc::new(BluezPlatform::new().await?);
    let gateway =
        Gateway::new(platform, bus.clone()).with_target_name(config.bluetooth.target_name.clone());

    gateway.trigger();
    info!(
        "Ready. Press Enter to reconnect to {}, Ctrl-C to quit.",
        gateway.target_name()
    );

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = stdin.next_line(), if stdin_open => {
                match line {
                    Ok(Some(_)) => {
                        gateway.trigger();
                    }
                    Ok(None) | Err(_) => {
                        info!("Input closed, waiting for Ctrl-C");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    bus.unsubscribe(subscription);
    info!("Stand Gateway stopped after {} log lines", view.len());
    Ok(())
}
