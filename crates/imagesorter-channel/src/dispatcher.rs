// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native operation dispatcher.
//
// `invoke` is called on the foreground thread. Unknown methods and invalid
// arguments are answered right there, before any file is touched. Everything
// else runs on tokio's blocking pool, gated by a semaphore so at most
// `max_workers` handlers run at once, and comes back through the completion
// queue. Requests share nothing but the bridge, which is stateless.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, error, info_span, warn};

use imagesorter_bridge::traits::PlatformBridge;
use imagesorter_core::config::BridgeConfig;
use imagesorter_core::types::{ErrorCode, Method, MethodCall, RequestId, Response};

use crate::completion::{Completion, CompletionQueue, CompletionSender, completion_channel};
use crate::handlers::{self, Outcome};
use crate::request::{Parser, Request, parser_for};

/// Callback receiving the one response for a call.
pub type Reply = Box<dyn FnOnce(Response) + Send + 'static>;

/// One dispatch table entry.
struct Route {
    method: Method,
    parse: Parser,
}

/// Routes method calls to handlers and posts their responses.
pub struct Dispatcher {
    channel: String,
    routes: HashMap<&'static str, Route>,
    bridge: Arc<dyn PlatformBridge>,
    scan_after_exif_write: bool,
    workers: Arc<Semaphore>,
    runtime: Handle,
    completions: CompletionSender,
}

impl Dispatcher {
    /// Build the dispatcher and the completion queue its responses arrive on.
    ///
    /// `runtime` hosts the worker tasks; the returned queue must be drained by
    /// the foreground for any asynchronous response to be observed.
    pub fn new(
        bridge: Arc<dyn PlatformBridge>,
        config: &BridgeConfig,
        runtime: Handle,
    ) -> (Self, CompletionQueue) {
        let routes = Method::ALL
            .into_iter()
            .map(|method| {
                (
                    method.as_str(),
                    Route {
                        method,
                        parse: parser_for(method),
                    },
                )
            })
            .collect();
        let (completions, queue) = completion_channel();

        debug!(
            channel = %config.channel_name,
            platform = bridge.platform_name(),
            workers = config.worker_limit(),
            "dispatcher ready"
        );

        let dispatcher = Self {
            channel: config.channel_name.clone(),
            routes,
            bridge,
            scan_after_exif_write: config.scan_after_exif_write,
            workers: Arc::new(Semaphore::new(config.worker_limit())),
            runtime,
            completions,
        };
        (dispatcher, queue)
    }

    /// Name of the channel this dispatcher answers.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Handle one call. `reply` runs exactly once: immediately for unknown
    /// methods and invalid arguments, otherwise when the completion queue
    /// delivers the handler's response.
    pub fn invoke(&self, call: MethodCall, reply: impl FnOnce(Response) + Send + 'static) {
        let Some(route) = self.routes.get(call.method.as_str()) else {
            debug!(method = %call.method, "method not implemented");
            reply(Response::NotImplemented);
            return;
        };

        let request = match (route.parse)(&call.arguments) {
            Ok(request) => request,
            Err(message) => {
                warn!(method = %route.method, reason = message, "invalid arguments");
                reply(Response::error(ErrorCode::InvalidArguments, message));
                return;
            }
        };

        let id = RequestId::new();
        let span = info_span!(
            "request",
            %id,
            method = %route.method,
            path = %request.path().display()
        );
        let task = run_request(
            id,
            request,
            Box::new(reply),
            Arc::clone(&self.bridge),
            Arc::clone(&self.workers),
            self.completions.clone(),
            self.scan_after_exif_write,
        );
        self.runtime.spawn(task.instrument(span));
    }
}

/// Worker side of one request: run the handler, post the response, then do
/// any follow-up notification.
async fn run_request(
    id: RequestId,
    request: Request,
    reply: Reply,
    bridge: Arc<dyn PlatformBridge>,
    workers: Arc<Semaphore>,
    completions: CompletionSender,
    scan_after_exif_write: bool,
) {
    let method = request.method();

    let outcome = {
        // Never closed, so acquisition cannot fail.
        let _permit = workers.clone().acquire_owned().await.ok();
        let fallback = request.clone();
        let worker_bridge = Arc::clone(&bridge);
        let job = tokio::task::spawn_blocking(move || {
            handlers::execute(worker_bridge.as_ref(), &request, scan_after_exif_write)
        });
        match job.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "handler did not complete");
                Outcome {
                    response: fallback.failure("handler aborted unexpectedly"),
                    notify: None,
                }
            }
        }
    };

    completions.post(Completion::new(id, method, outcome.response, reply));

    if let Some(path) = outcome.notify {
        let _permit = workers.acquire_owned().await.ok();
        let scan = tokio::task::spawn_blocking(move || {
            handlers::notify_media_index(bridge.as_ref(), &path)
        });
        if let Err(e) = scan.await {
            warn!(error = %e, "media scan task did not complete");
        }
    }
}
