// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// imagesorter-metadata — File metadata operations for the image sorter.
//
// Provides EXIF date/time tag reading and writing, and filesystem timestamp
// reading and modification-time updates. Everything here is synchronous and
// touches exactly one file per call.

pub mod date_tags;
pub mod fs_times;

// Re-export the entry points so callers can use `imagesorter_metadata::read_exif_timestamps` etc.
pub use date_tags::{read_exif_timestamps, write_exif_date_time};
pub use fs_times::{file_exists, read_file_timestamps, set_modified_millis};
