// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// imagesorter-channel — The native operation dispatcher.
//
// A method call arrives on the foreground thread, is validated there, runs on
// a bounded pool of blocking workers, and its single response travels back
// through the completion queue to whichever thread drains it.

pub mod completion;
pub mod dispatcher;
pub mod handlers;
pub mod request;

#[cfg(test)]
mod spy;

pub use completion::{Completion, CompletionQueue};
pub use dispatcher::{Dispatcher, Reply};
pub use request::Request;
