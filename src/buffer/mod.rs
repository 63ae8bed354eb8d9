//! # Binary Arena Writer
//!
//! This module provides the write-only arena used to lay out the asset blob:
//! heterogeneous, variable-length, pointer-containing records serialized into
//! one contiguous buffer, with internal "pointers" resolved as byte offsets
//! after the fact.
//!
//! ## Relocation Model
//!
//! The arena never stores absolute addresses. A reference to content that has
//! not been written yet is a 4-byte placeholder (the *anchor*), patched during
//! finalization with the signed delta `content_offset - anchor_offset`. The
//! firmware resolves a pointer by adding the delta to the anchor's own
//! address, so the whole blob can be loaded anywhere without fixups.
//!
//! ```text
//! +--------------------+
//! | ...                |
//! | anchor (i32 delta) | ---+
//! | ...                |    |  delta = content - anchor
//! | ...                |    |
//! | content            | <--+  (aligned to 4 or 8)
//! | ...                |
//! +--------------------+
//! ```
//!
//! ## Array Layouts
//!
//! | Writer | Layout |
//! |--------|--------|
//! | `write_array` | u32 count, reloc -> block of one reloc per item |
//! | `write_number_array` | u32 count, reloc -> items inline |
//! | `write_future_array` | (u32, u32) zero pair, filled in the second pass |
//!
//! An empty array is two literal zero words with no relocation bookkeeping.
//! `write_array` gives every element its own relocation so elements stay
//! independently addressable; `write_number_array` packs homogeneous
//! fixed-size items that the firmware indexes arithmetically.
//!
//! ## Finalization Protocol
//!
//! `AssetBuffer::finalize` runs a fixed sequence; the order is part of the
//! binary contract:
//!
//! ```text
//! 1. pad to 4
//! 2. drain pending relocations (FIFO, live length: entries appended by a
//!    callback mid-drain are resolved in the same pass)
//!      pad(entry alignment) -> run callback -> pad(entry alignment)
//!      -> patch anchor with signed delta
//! 3. save cursor; for each deferred array, seek the cursor to its anchor
//!    and run its callback (which overwrites the zero pair and typically
//!    registers a fresh relocation for the payload); restore cursor
//! 4. drain pending relocations again (resolves step-3 registrations)
//! 5. trim the arena to the live region
//! ```
//!
//! Deferred arrays exist for tables whose entries are only known after the
//! first pass has run (the constants table: entries are registered while
//! sibling content is being emitted).
//!
//! ## Writer Twins
//!
//! [`AssetBuffer`] is the real arena. [`ProbeBuffer`] has the same write
//! surface but performs no allocation and no bookkeeping; it invokes every
//! callback immediately so a structural pre-pass (counting types, validating
//! values) observes the same traversal the real writer would.
//!
//! ## Concurrency
//!
//! One buffer, one build pass. Relocation anchors are only correct if no
//! other writer can move the cursor between a placeholder write and its
//! patch, so the buffer is threaded as `&mut` through a single pass and is
//! neither `Send` nor shared.

use eyre::Result;
use std::rc::Rc;

use crate::config::{WIDE_ALIGNMENT, WORD_ALIGNMENT};

mod asset_buffer;
mod probe;


pub use asset_buffer::AssetBuffer;
pub use probe::ProbeBuffer;

/// Deferred emission callback for relocated content.
pub type EmitFn = Box<dyn FnOnce(&mut dyn BinaryWriter) -> Result<()>>;

/// Per-item emission callback for array writers. Receives the item index.
pub type EmitItemFn = Rc<dyn Fn(&mut dyn BinaryWriter, usize) -> Result<()>>;

/// Alignment class of a relocation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// 4-byte alignment, the default for strings and plain blocks.
    Word,
    /// 8-byte alignment, for blocks containing 64-bit fields.
    Wide,
}

impl Alignment {
    pub fn bytes(self) -> usize {
        match self {
            Alignment::Word => WORD_ALIGNMENT,
            Alignment::Wide => WIDE_ALIGNMENT,
        }
    }
}

/// Write surface shared by [`AssetBuffer`] and [`ProbeBuffer`].
///
/// Multi-byte primitive writes require the cursor to already satisfy the
/// natural alignment of the width being written; a violation is a fatal
/// error, not a recoverable one, because the downstream reader assumes
/// aligned fields.
pub trait BinaryWriter {
    /// Current logical length in bytes.
    fn size(&self) -> usize;

    fn write_int8(&mut self, value: i8) -> Result<()>;
    fn write_uint8(&mut self, value: u8) -> Result<()>;
    fn write_int16(&mut self, value: i16) -> Result<()>;
    fn write_uint16(&mut self, value: u16) -> Result<()>;
    /// `write_uint16` without the alignment assertion, for size fields that
    /// follow odd-length content.
    fn write_uint16_non_aligned(&mut self, value: u16) -> Result<()>;
    fn write_int32(&mut self, value: i32) -> Result<()>;
    fn write_uint32(&mut self, value: u32) -> Result<()>;
    fn write_uint64(&mut self, value: u64) -> Result<()>;
    fn write_float(&mut self, value: f32) -> Result<()>;
    fn write_double(&mut self, value: f64) -> Result<()>;

    /// Advances the cursor to the next 4-byte boundary with zero bytes.
    fn add_padding(&mut self) -> Result<()>;
    /// Advances the cursor to the next 8-byte boundary with zero bytes.
    fn add_padding8(&mut self) -> Result<()>;

    /// Copies `bytes` verbatim. The cursor must be 4-aligned on entry and is
    /// re-padded to 4 afterwards.
    fn write_uint8_array(&mut self, bytes: &[u8]) -> Result<()>;

    /// Writes string content, a NUL terminator, then padding to 4. The
    /// encoding (UTF-8 vs single-byte legacy) is fixed at construction.
    fn write_string(&mut self, value: &str) -> Result<()>;

    /// Writes a 4-byte placeholder and registers `emit` for the relocation
    /// drain. The patched value is the signed byte delta from the anchor to
    /// the start of the emitted content.
    fn write_object_offset(&mut self, alignment: Alignment, emit: EmitFn) -> Result<()>;

    /// Writes a zero (count, offset) pair and registers `emit` for the
    /// second finalize pass, with the cursor seeked back to the pair.
    fn write_future_array(&mut self, emit: EmitFn) -> Result<()>;

    /// Length-prefixed array with one relocation per element.
    fn write_array(&mut self, len: usize, alignment: Alignment, emit_item: EmitItemFn) -> Result<()> {
        if len > 0 {
            self.write_uint32(len as u32)?;
            self.write_object_offset(
                Alignment::Word,
                Box::new(move |writer| {
                    for index in 0..len {
                        let emit_item = Rc::clone(&emit_item);
                        writer.write_object_offset(
                            alignment,
                            Box::new(move |writer| emit_item(writer, index)),
                        )?;
                    }
                    Ok(())
                }),
            )
        } else {
            self.write_uint32(0)?;
            self.write_uint32(0)
        }
    }

    /// Length-prefixed array with all elements inline in one relocation
    /// block. Cheaper than `write_array` for homogeneous fixed-size items.
    fn write_number_array(&mut self, len: usize, emit_item: EmitItemFn) -> Result<()> {
        if len > 0 {
            self.write_uint32(len as u32)?;
            self.write_object_offset(
                Alignment::Word,
                Box::new(move |writer| {
                    for index in 0..len {
                        emit_item(writer, index)?;
                    }
                    Ok(())
                }),
            )
        } else {
            self.write_uint32(0)?;
            self.write_uint32(0)
        }
    }
}
