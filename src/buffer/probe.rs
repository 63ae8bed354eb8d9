//! # ProbeBuffer - Size-Only Twin
//!
//! Same write surface as [`AssetBuffer`](super::AssetBuffer), no allocation,
//! no bookkeeping. Every deferred-emission callback runs immediately and
//! synchronously, so a structural pre-pass over a value tree (registering
//! types, validating shapes) observes exactly the traversal the real writer
//! would perform, while `size` stays 0 throughout.

use eyre::Result;

use super::{Alignment, BinaryWriter, EmitFn};

#[derive(Debug, Default)]
pub struct ProbeBuffer;

impl ProbeBuffer {
    pub fn new() -> Self {
        Self
    }
}

impl BinaryWriter for ProbeBuffer {
    fn size(&self) -> usize {
        0
    }

    fn write_int8(&mut self, _value: i8) -> Result<()> {
        Ok(())
    }

    fn write_uint8(&mut self, _value: u8) -> Result<()> {
        Ok(())
    }

    fn write_int16(&mut self, _value: i16) -> Result<()> {
        Ok(())
    }

    fn write_uint16(&mut self, _value: u16) -> Result<()> {
        Ok(())
    }

    fn write_uint16_non_aligned(&mut self, _value: u16) -> Result<()> {
        Ok(())
    }

    fn write_int32(&mut self, _value: i32) -> Result<()> {
        Ok(())
    }

    fn write_uint32(&mut self, _value: u32) -> Result<()> {
        Ok(())
    }

    fn write_uint64(&mut self, _value: u64) -> Result<()> {
        Ok(())
    }

    fn write_float(&mut self, _value: f32) -> Result<()> {
        Ok(())
    }

    fn write_double(&mut self, _value: f64) -> Result<()> {
        Ok(())
    }

    fn add_padding(&mut self) -> Result<()> {
        Ok(())
    }

    fn add_padding8(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_uint8_array(&mut self, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }

    fn write_string(&mut self, _value: &str) -> Result<()> {
        Ok(())
    }

    fn write_object_offset(&mut self, _alignment: Alignment, emit: EmitFn) -> Result<()> {
        emit(self)
    }

    fn write_future_array(&mut self, emit: EmitFn) -> Result<()> {
        emit(self)
    }
}
