// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Completion queue — the foreground half of the dispatcher.
//
// Workers post finished responses here; the foreground drains the queue and
// each reply callback runs on the draining thread. A Completion owns its
// FnOnce reply, so a response can be delivered at most once.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use imagesorter_core::types::{Method, RequestId, Response};

use crate::dispatcher::Reply;

/// A finished request waiting for foreground delivery.
pub struct Completion {
    id: RequestId,
    method: Method,
    response: Response,
    reply: Reply,
}

impl Completion {
    pub(crate) fn new(id: RequestId, method: Method, response: Response, reply: Reply) -> Self {
        Self {
            id,
            method,
            response,
            reply,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Hand the response to the caller on the current thread.
    pub fn deliver(self) {
        debug!(id = %self.id, method = %self.method, "delivering response");
        (self.reply)(self.response);
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("id", &self.id)
            .field("method", &self.method)
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

/// Worker-side handle onto the queue.
#[derive(Clone)]
pub(crate) struct CompletionSender(mpsc::UnboundedSender<Completion>);

impl CompletionSender {
    pub(crate) fn post(&self, completion: Completion) {
        if let Err(mpsc::error::SendError(dropped)) = self.0.send(completion) {
            warn!(
                id = %dropped.id,
                method = %dropped.method,
                "completion queue closed, response dropped"
            );
        }
    }
}

/// Foreground-side receiver of finished requests.
pub struct CompletionQueue {
    rx: mpsc::UnboundedReceiver<Completion>,
}

pub(crate) fn completion_channel() -> (CompletionSender, CompletionQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CompletionSender(tx), CompletionQueue { rx })
}

impl CompletionQueue {
    /// Wait for the next completion without delivering it.
    ///
    /// Returns `None` once the dispatcher is dropped and every in-flight
    /// request has posted its response.
    pub async fn next(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }

    /// Wait for the next completion and deliver it on this thread.
    /// Returns `false` when no more completions can arrive.
    pub async fn deliver_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(completion) => {
                completion.deliver();
                true
            }
            None => false,
        }
    }

    /// Deliver everything already queued without waiting. Returns the count.
    pub fn deliver_ready(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(completion) = self.rx.try_recv() {
            completion.deliver();
            delivered += 1;
        }
        delivered
    }

    /// Deliver every remaining completion, waiting for in-flight requests.
    /// Only terminates after the dispatcher has been dropped.
    pub async fn drain(&mut self) -> usize {
        let mut delivered = 0;
        while self.deliver_next().await {
            delivered += 1;
        }
        delivered
    }
}
