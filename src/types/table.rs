//! # Project Type Registry
//!
//! Struct and enum definitions plus the type-index interner. Array payloads
//! in the asset blob carry a `u32` type index; the firmware uses it to look
//! up element layout in its own copy of the registry, so the only hard
//! requirement on index assignment is that it is stable for the lifetime of
//! one build. Indices are handed out first-come during encoding.
//!
//! Interning happens inside deferred emission callbacks, which only hold a
//! shared reference to the registry; the index map therefore lives behind a
//! `RefCell`. The whole build is single-threaded (see the buffer module), so
//! borrows never overlap.

use std::cell::RefCell;

use hashbrown::HashMap;
use smallvec::SmallVec;

use super::ValueType;

#[derive(Debug, Clone)]
pub struct StructField {
    pub name: String,
    pub value_type: ValueType,
}

impl StructField {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

/// A struct definition. Field order is the wire order: the firmware reads
/// fields positionally, never by name.
#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub fields: SmallVec<[StructField; 8]>,
}

impl StructDef {
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = StructField>) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub members: Vec<EnumMember>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = EnumMember>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TypeTable {
    structs: HashMap<String, StructDef>,
    enums: HashMap<String, EnumDef>,
    indices: RefCell<TypeIndexes>,
}

#[derive(Debug, Default)]
struct TypeIndexes {
    by_type: HashMap<ValueType, u32>,
    order: Vec<ValueType>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_struct(&mut self, def: StructDef) {
        self.structs.insert(def.name.clone(), def);
    }

    pub fn add_enum(&mut self, def: EnumDef) {
        self.enums.insert(def.name.clone(), def);
    }

    pub fn struct_def(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    /// The index embedded next to an array payload for `value_type`.
    /// Assigns the next free index on first use.
    pub fn type_index(&self, value_type: &ValueType) -> u32 {
        let mut indices = self.indices.borrow_mut();
        if let Some(&index) = indices.by_type.get(value_type) {
            return index;
        }
        let index = indices.order.len() as u32;
        indices.by_type.insert(value_type.clone(), index);
        indices.order.push(value_type.clone());
        index
    }

    /// Every type interned so far, in index order.
    pub fn registered_types(&self) -> Vec<ValueType> {
        self.indices.borrow().order.clone()
    }
}
