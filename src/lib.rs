//! # flowpack - Relocatable Binary Asset Serializer
//!
//! flowpack packages the typed values of a GUI/flow project (variables,
//! constants, nested arrays and structs, strings) into one contiguous,
//! relocatable binary blob that embedded firmware decodes byte-exactly. This
//! implementation prioritizes:
//!
//! - **Relocatable output**: internal pointers are signed byte deltas, never
//!   absolute addresses, so the blob can live anywhere in firmware memory
//! - **Deterministic layout**: alignment, padding, and relocation order are a
//!   fixed contract with the decoder
//! - **Partial-failure builds**: one bad default value logs an error and
//!   encodes as null instead of aborting the whole project
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::rc::Rc;
//! use flowpack::{build_asset_data, AssetProject, TypeTable, Variable, ValueType};
//!
//! let project = AssetProject {
//!     project_type: 1,
//!     utf8_support: true,
//!     types: TypeTable::new(),
//!     variables: vec![Variable::new("speed", ValueType::Integer, "42")],
//! };
//!
//! let result = build_asset_data(project, Rc::new(my_evaluator))?;
//! std::fs::write("project.res", &result.data)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     Build Orchestration (build)      │
//! ├─────────────────────────────────────┤
//! │    Typed Value Encoder (values)      │
//! ├───────────────────┬─────────────────┤
//! │ Type System (types)│ Header (build)  │
//! ├───────────────────┴─────────────────┤
//! │     Binary Arena Writer (buffer)     │
//! └─────────────────────────────────────┘
//! ```
//!
//! The encoder never touches raw bytes; it only calls the writer surface.
//! That separation is what lets the same encoder target the real arena and
//! the size-only probe.
//!
//! ## Module Overview
//!
//! - [`buffer`]: write arena, relocation and deferred-array resolution, probe twin
//! - [`types`]: declared types, runtime values, type registry
//! - [`values`]: tagged-union value records
//! - [`build`]: context, file header, end-to-end orchestration
//! - [`config`]: capacity and alignment constants

pub mod buffer;
pub mod build;
pub mod config;
pub mod types;
pub mod values;

pub use buffer::{Alignment, AssetBuffer, BinaryWriter, EmitFn, EmitItemFn, ProbeBuffer};
pub use build::{
    build_asset_data, build_document_data, AssetHeader, AssetProject, BuildContext, BuildMessage,
    BuildResult, ConstantEvaluator, MessageKind, ASSET_HEADER_SIZE, ASSET_MAGIC,
};
pub use types::{EnumDef, EnumMember, StructDef, StructField, TypeTable, Value, ValueType};
pub use values::{
    build_constant_value, build_flow_value, build_variable_value, FlowValue, FlowValueType,
    Variable,
};
