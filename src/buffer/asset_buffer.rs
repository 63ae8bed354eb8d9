//! # AssetBuffer - Write Arena
//!
//! The real binary arena. Pre-allocates the full firmware capacity once so
//! relocation anchors stay valid for the whole build, tracks the pending
//! relocation and deferred array worklists, and resolves both in
//! [`AssetBuffer::finalize`].
//!
//! ## Failure Classes
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | Misaligned multi-byte write | fatal, `"invalid offset N"` |
//! | Multi-byte write past capacity | fatal |
//! | Single-byte write past capacity | logged, cursor still advances |
//! | Legacy-mode character above U+00FF | logged, zero byte substituted |
//!
//! The single-byte cases advance the cursor anyway so subsequent offset math
//! stays in sync; the blob gets one wrong byte instead of a corrupted layout.

use eyre::{ensure, Result};

use crate::config::ASSET_BUFFER_CAPACITY;

use super::{Alignment, BinaryWriter, EmitFn};

struct PendingObject {
    anchor: usize,
    alignment: Alignment,
    emit: Option<EmitFn>,
}

struct DeferredArray {
    anchor: usize,
    emit: Option<EmitFn>,
}

pub struct AssetBuffer {
    buffer: Vec<u8>,
    offset: usize,
    utf8_support: bool,
    pending: Vec<PendingObject>,
    deferred: Vec<DeferredArray>,
    finalized: bool,
}

impl AssetBuffer {
    pub fn new(utf8_support: bool) -> Self {
        Self {
            buffer: vec![0u8; ASSET_BUFFER_CAPACITY],
            offset: 0,
            utf8_support,
            pending: Vec::new(),
            deferred: Vec::new(),
            finalized: false,
        }
    }

    /// The live region written so far.
    pub fn bytes(&self) -> &[u8] {
        &self.buffer[..self.offset]
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        ensure!(
            self.offset + bytes.len() <= self.buffer.len(),
            "asset buffer capacity exceeded: offset {}, writing {} bytes",
            self.offset,
            bytes.len()
        );
        self.buffer[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
        Ok(())
    }

    fn put_byte_lossy(&mut self, value: u8) {
        if self.offset < self.buffer.len() {
            self.buffer[self.offset] = value;
        } else {
            tracing::error!(offset = self.offset, "byte write past end of asset buffer");
        }
        self.offset += 1;
    }

    fn patch_int32(&mut self, anchor: usize, value: i32) -> Result<()> {
        ensure!(
            anchor + 4 <= self.buffer.len(),
            "relocation anchor {} out of bounds",
            anchor
        );
        self.buffer[anchor..anchor + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn pad_to(&mut self, alignment: Alignment) -> Result<()> {
        match alignment {
            Alignment::Word => self.add_padding(),
            Alignment::Wide => self.add_padding8(),
        }
    }

    /// Drains the pending relocation list FIFO. The loop re-reads the live
    /// length: a callback may register further relocations and those must be
    /// resolved before this pass ends.
    fn finalize_object_list(&mut self) -> Result<()> {
        let mut index = 0;
        while index < self.pending.len() {
            let anchor = self.pending[index].anchor;
            let alignment = self.pending[index].alignment;
            let emit = self.pending[index].emit.take();
            self.pad_to(alignment)?;
            let content_start = self.offset;
            if let Some(emit) = emit {
                emit(self)?;
            }
            self.pad_to(alignment)?;
            self.patch_int32(anchor, (content_start as i64 - anchor as i64) as i32)?;
            index += 1;
        }
        self.pending.clear();
        Ok(())
    }

    /// Resolves every registered relocation and deferred array, then trims
    /// the arena to the live region.
    ///
    /// Deferred arrays run between two relocation drains: their callbacks
    /// seek back to the reserved (count, offset) pair, and any relocation
    /// they register for the actual payload is picked up by the second drain.
    pub fn finalize(&mut self) -> Result<()> {
        self.add_padding()?;
        self.finalize_object_list()?;

        let saved_offset = self.offset;
        let mut index = 0;
        while index < self.deferred.len() {
            let anchor = self.deferred[index].anchor;
            let emit = self.deferred[index].emit.take();
            self.offset = anchor;
            if let Some(emit) = emit {
                emit(self)?;
            }
            index += 1;
        }
        self.deferred.clear();
        self.offset = saved_offset;

        self.finalize_object_list()?;

        self.buffer.truncate(self.offset);
        self.buffer.shrink_to_fit();
        self.finalized = true;
        Ok(())
    }

    /// LZ4 block compression of the finalized arena. The decompressed size
    /// is not embedded here; the asset header carries it.
    pub fn compress(&self) -> Result<Vec<u8>> {
        ensure!(
            self.finalized,
            "asset buffer must be finalized before compression"
        );
        Ok(lz4_flex::block::compress(&self.buffer))
    }
}

impl Default for AssetBuffer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl BinaryWriter for AssetBuffer {
    fn size(&self) -> usize {
        self.offset
    }

    fn write_int8(&mut self, value: i8) -> Result<()> {
        self.put_byte_lossy(value as u8);
        Ok(())
    }

    fn write_uint8(&mut self, value: u8) -> Result<()> {
        self.put_byte_lossy(value);
        Ok(())
    }

    fn write_int16(&mut self, value: i16) -> Result<()> {
        ensure!(self.offset % 2 == 0, "invalid offset {}", self.offset);
        self.put_bytes(&value.to_le_bytes())
    }

    fn write_uint16(&mut self, value: u16) -> Result<()> {
        ensure!(self.offset % 2 == 0, "invalid offset {}", self.offset);
        self.put_bytes(&value.to_le_bytes())
    }

    fn write_uint16_non_aligned(&mut self, value: u16) -> Result<()> {
        self.put_bytes(&value.to_le_bytes())
    }

    fn write_int32(&mut self, value: i32) -> Result<()> {
        ensure!(self.offset % 4 == 0, "invalid offset {}", self.offset);
        self.put_bytes(&value.to_le_bytes())
    }

    fn write_uint32(&mut self, value: u32) -> Result<()> {
        ensure!(self.offset % 4 == 0, "invalid offset {}", self.offset);
        self.put_bytes(&value.to_le_bytes())
    }

    fn write_uint64(&mut self, value: u64) -> Result<()> {
        ensure!(self.offset % 8 == 0, "invalid offset {}", self.offset);
        self.put_bytes(&value.to_le_bytes())
    }

    fn write_float(&mut self, value: f32) -> Result<()> {
        ensure!(self.offset % 4 == 0, "invalid offset {}", self.offset);
        self.put_bytes(&value.to_le_bytes())
    }

    fn write_double(&mut self, value: f64) -> Result<()> {
        ensure!(self.offset % 8 == 0, "invalid offset {}", self.offset);
        self.put_bytes(&value.to_le_bytes())
    }

    fn add_padding(&mut self) -> Result<()> {
        while self.offset % 4 != 0 {
            self.write_uint8(0)?;
        }
        Ok(())
    }

    fn add_padding8(&mut self) -> Result<()> {
        while self.offset % 8 != 0 {
            self.write_uint8(0)?;
        }
        Ok(())
    }

    fn write_uint8_array(&mut self, bytes: &[u8]) -> Result<()> {
        ensure!(self.offset % 4 == 0, "invalid offset {}", self.offset);
        self.put_bytes(bytes)?;
        self.add_padding()
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        ensure!(self.offset % 4 == 0, "invalid offset {}", self.offset);
        if self.utf8_support {
            for &byte in value.as_bytes() {
                self.write_uint8(byte)?;
            }
        } else {
            // Legacy single-byte mode: text authored as raw char codes must
            // land byte-for-byte, not UTF-8 expanded.
            for character in value.chars() {
                match u8::try_from(character as u32) {
                    Ok(byte) => self.write_uint8(byte)?,
                    Err(_) => {
                        tracing::error!(
                            %character,
                            "character does not fit single-byte string encoding"
                        );
                        self.offset += 1;
                    }
                }
            }
        }
        self.write_uint8(0)?;
        self.add_padding()
    }

    fn write_object_offset(&mut self, alignment: Alignment, emit: EmitFn) -> Result<()> {
        let anchor = self.offset;
        self.write_uint32(0)?;
        self.pending.push(PendingObject {
            anchor,
            alignment,
            emit: Some(emit),
        });
        Ok(())
    }

    fn write_future_array(&mut self, emit: EmitFn) -> Result<()> {
        let anchor = self.offset;
        self.write_uint32(0)?;
        self.write_uint32(0)?;
        self.deferred.push(DeferredArray {
            anchor,
            emit: Some(emit),
        });
        Ok(())
    }
}
