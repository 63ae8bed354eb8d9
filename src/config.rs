//! # Configuration Constants
//!
//! Centralized constants for the asset build pipeline. Constants that depend
//! on each other are co-located so a change to one is checked against the
//! others.
//!
//! ```text
//! ASSET_BUFFER_CAPACITY (32 MiB)
//!       │
//!       └─> Hard ceiling for one finalized asset blob. Multi-byte writes
//!           past this limit abort the build; single-byte writes are logged
//!           and skipped so offset bookkeeping stays consistent.
//!
//! WORD_ALIGNMENT (4) / WIDE_ALIGNMENT (8)
//!       │
//!       └─> Natural alignment of the two relocation block classes. Value
//!           records contain doubles, so value blocks use WIDE_ALIGNMENT.
//! ```

/// Pre-allocated arena size for one asset build.
///
/// The firmware loads the decompressed blob into a region of this size, so
/// the builder never produces more than this many bytes.
pub const ASSET_BUFFER_CAPACITY: usize = 32 * 1024 * 1024;

/// Alignment for general relocation blocks and string/byte payloads.
pub const WORD_ALIGNMENT: usize = 4;

/// Alignment for blocks containing 64-bit fields (value records).
pub const WIDE_ALIGNMENT: usize = 8;

const _: () = assert!(ASSET_BUFFER_CAPACITY % WIDE_ALIGNMENT == 0);
const _: () = assert!(WIDE_ALIGNMENT % WORD_ALIGNMENT == 0);
