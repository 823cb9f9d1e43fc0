// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image Sorter — native channel host
//
// Entry point. Initialises logging, loads config, binds the platform bridge
// to a dispatcher, and serves newline-delimited JSON requests on stdin.
// Logs go to stderr; stdout carries responses only.

mod services;

use std::sync::{Arc, Mutex};

use imagesorter_channel::Dispatcher;
use tokio::io::BufReader;
use tokio::runtime::Handle;

use services::data_dir;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Image Sorter host starting");

    let config = data_dir::load_config(&data_dir::config_path());
    let bridge = imagesorter_bridge::platform_bridge();
    let platform = bridge.platform_name().to_owned();

    let (dispatcher, queue) = Dispatcher::new(bridge, &config, Handle::current());
    tracing::info!(
        channel = dispatcher.channel(),
        platform = %platform,
        max_workers = config.worker_limit(),
        "listening on stdin"
    );

    let input = BufReader::new(tokio::io::stdin());
    let output = Arc::new(Mutex::new(std::io::stdout()));
    let handled = services::host::serve(dispatcher, queue, input, output).await;

    tracing::info!(handled, "input closed, host exiting");
}
