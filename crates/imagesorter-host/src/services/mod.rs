// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: configuration lookup and the channel host loop that owns the
// foreground thread.

pub mod data_dir;
pub mod host;
