//! # Typed Value Encoding
//!
//! Maps a typed project value onto the fixed 16-byte tagged-union wire
//! record the firmware decodes, issuing all byte output through the
//! [`BinaryWriter`](crate::buffer::BinaryWriter) surface so the same encoder
//! drives both the real arena and the size-only probe.
//!
//! ## Module Structure
//!
//! - `tag`: the wire tag enumeration and declared-type -> tag mapping
//! - `encode`: record emission, container decomposition, variable resolution

mod encode;
mod tag;

pub use encode::{
    build_constant_value, build_flow_value, build_variable_value, default_value_for_type,
    FlowValue, Variable,
};
pub use tag::FlowValueType;
