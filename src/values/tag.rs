//! # Wire Value Tags
//!
//! The tag byte of a value record. Discriminants are a firmware contract:
//! both sides of the wire compile against the same numbering, so values are
//! fixed and new tags are append-only.
//!
//! ## Tag Groups
//!
//! | Range | Tags | Notes |
//! |-------|------|-------|
//! | 0-13 | scalars | undefined through string |
//! | 14-16 | asset references | offsets into the asset blob |
//! | 17-20 | runtime references | heap objects, never built offline |
//! | 21 | date | epoch milliseconds as a double |
//! | 22-24 | ui/runtime handles | widget, json, event |
//!
//! The offline builder only ever produces a subset (see
//! [`FlowValueType::of`]); the remaining tags exist on the firmware side for
//! values created at runtime.

use crate::types::ValueType;

/// Tag byte of one encoded value record.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowValueType {
    Undefined = 0,
    Null = 1,
    Boolean = 2,
    Int8 = 3,
    Uint8 = 4,
    Int16 = 5,
    Uint16 = 6,
    Int32 = 7,
    Uint32 = 8,
    Int64 = 9,
    Uint64 = 10,
    Float = 11,
    Double = 12,
    String = 13,
    StringAsset = 14,
    Array = 15,
    ArrayAsset = 16,
    StringRef = 17,
    ArrayRef = 18,
    BlobRef = 19,
    Stream = 20,
    Date = 21,
    Widget = 22,
    Json = 23,
    Event = 24,
}

impl FlowValueType {
    /// The wire tag a declared type encodes under.
    ///
    /// Structs and arrays share one representation (a length-prefixed,
    /// typed-element sequence); declared types with no offline encoding fall
    /// back to `Uint32`, whose union payload stays all-zero.
    pub fn of(value_type: &ValueType) -> Self {
        match value_type {
            ValueType::Undefined => FlowValueType::Undefined,
            ValueType::Null => FlowValueType::Null,
            ValueType::Integer => FlowValueType::Int32,
            ValueType::Float => FlowValueType::Float,
            ValueType::Double => FlowValueType::Double,
            ValueType::Boolean => FlowValueType::Boolean,
            ValueType::String => FlowValueType::StringAsset,
            ValueType::Date => FlowValueType::Date,
            ValueType::Widget => FlowValueType::Widget,
            ValueType::Json => FlowValueType::Json,
            ValueType::Event => FlowValueType::Event,
            ValueType::Enum(_) => FlowValueType::Int32,
            ValueType::Array(_) | ValueType::Struct(_) => FlowValueType::ArrayAsset,
            ValueType::Object(_) | ValueType::Any => FlowValueType::Uint32,
        }
    }
}

impl TryFrom<u8> for FlowValueType {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FlowValueType::Undefined),
            1 => Ok(FlowValueType::Null),
            2 => Ok(FlowValueType::Boolean),
            3 => Ok(FlowValueType::Int8),
            4 => Ok(FlowValueType::Uint8),
            5 => Ok(FlowValueType::Int16),
            6 => Ok(FlowValueType::Uint16),
            7 => Ok(FlowValueType::Int32),
            8 => Ok(FlowValueType::Uint32),
            9 => Ok(FlowValueType::Int64),
            10 => Ok(FlowValueType::Uint64),
            11 => Ok(FlowValueType::Float),
            12 => Ok(FlowValueType::Double),
            13 => Ok(FlowValueType::String),
            14 => Ok(FlowValueType::StringAsset),
            15 => Ok(FlowValueType::Array),
            16 => Ok(FlowValueType::ArrayAsset),
            17 => Ok(FlowValueType::StringRef),
            18 => Ok(FlowValueType::ArrayRef),
            19 => Ok(FlowValueType::BlobRef),
            20 => Ok(FlowValueType::Stream),
            21 => Ok(FlowValueType::Date),
            22 => Ok(FlowValueType::Widget),
            23 => Ok(FlowValueType::Json),
            24 => Ok(FlowValueType::Event),
            _ => eyre::bail!("invalid value tag: {}", value),
        }
    }
}
