//! # Project Value Type System
//!
//! Declared types ([`ValueType`]), runtime values ([`Value`]), and the
//! project type registry ([`TypeTable`]) that assigns every declared type the
//! stable index embedded next to array payloads in the asset blob.
//!
//! ## Module Structure
//!
//! - `value_type`: declared-type enum with array/struct/enum composition
//! - `value`: runtime value enum produced by constant-expression evaluation
//! - `table`: struct/enum definitions plus type-index interning

mod table;
mod value;
mod value_type;

pub use table::{EnumDef, EnumMember, StructDef, StructField, TypeTable};
pub use value::Value;
pub use value_type::ValueType;
