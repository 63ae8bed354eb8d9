//! # Value Record Emission
//!
//! One encoded value is a fixed 16-byte record: a header identifying the
//! value, then an 8-byte union interpreted per tag.
//!
//! ```text
//! +--------+--------+-----------+------------+---------------------+
//! | tag u8 | unit u8| options   | reserved   | union (8 bytes)     |
//! |        | (= 0)  | u16 (= 0) | u32 (= 0)  |                     |
//! +--------+--------+-----------+------------+---------------------+
//! ```
//!
//! | Tag | Union |
//! |-----|-------|
//! | Undefined / Null | both words zero |
//! | Boolean | word0 = 0/1, word1 = 0 |
//! | Int32 | word0 = i32, word1 = 0 |
//! | Float | word0 = f32, word1 = 0 |
//! | Double / Date | f64 across both words |
//! | StringAsset | word0 = relocation to NUL-terminated content, word1 = 0 |
//! | ArrayAsset | word0 = relocation to an array block, word1 = 0 |
//! | Json | word0 = registered value index, word1 = 0 |
//! | anything else | 8 zero bytes |
//!
//! An array block lives at 8-byte alignment and holds: u32 element count,
//! u32 element type index, then each element's record emitted recursively.
//! Records contain doubles, so blocks use wide alignment throughout.
//!
//! A struct-typed value encodes as the same block shape, with one element
//! per field of the struct definition in declared order; the firmware reads
//! fields positionally.

use std::rc::Rc;

use eyre::{bail, eyre, Result};

use crate::buffer::{Alignment, BinaryWriter};
use crate::build::{BuildContext, ConstantEvaluator, MessageKind};
use crate::types::{Value, ValueType};

use super::FlowValueType;

/// One encodable unit: the wire tag, the runtime value, and the declared
/// type that drives container decomposition.
#[derive(Debug, Clone)]
pub struct FlowValue {
    pub tag: FlowValueType,
    pub value: Value,
    pub value_type: ValueType,
}

impl FlowValue {
    /// Builds a flow value with the tag derived from the declared type.
    pub fn typed(value: Value, value_type: ValueType) -> Self {
        Self {
            tag: FlowValueType::of(&value_type),
            value,
            value_type,
        }
    }
}

/// A project variable: declared type plus a default-value expression that is
/// evaluated as a constant at build time.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub value_type: Option<ValueType>,
    pub default_value: String,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        value_type: ValueType,
        default_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value_type: Some(value_type),
            default_value: default_value.into(),
        }
    }
}

/// The build-time default for a declared type, substituted when a struct
/// field has no value in the runtime record.
pub fn default_value_for_type(ctx: &BuildContext, value_type: &ValueType) -> Value {
    match value_type {
        ValueType::Integer => Value::Int(0),
        ValueType::Float | ValueType::Double => Value::Float(0.0),
        ValueType::Date => Value::Date(0.0),
        ValueType::Boolean => Value::Bool(false),
        ValueType::String => Value::Text(String::new()),
        ValueType::Enum(name) => ctx
            .types()
            .enum_def(name)
            .and_then(|def| def.members.first())
            .map(|member| Value::Int(member.value))
            .unwrap_or(Value::Int(0)),
        _ => Value::Null,
    }
}

fn write_unit_record(writer: &mut dyn BinaryWriter, tag: FlowValueType) -> Result<()> {
    writer.write_uint8(tag as u8)?;
    writer.write_uint8(0)?;
    writer.write_uint16(0)?;
    writer.write_uint32(0)?;
    writer.write_uint32(0)?;
    writer.write_uint32(0)?;
    Ok(())
}

/// Splits an array- or struct-typed value into its element flow values.
///
/// A runtime sequence takes the declared element type positionally; a keyed
/// record takes the struct definition's fields in declared order. Anything
/// else means project validation let a mistyped value through, which is not
/// recoverable here.
fn decompose_elements(ctx: &Rc<BuildContext>, flow_value: &FlowValue) -> Result<Vec<FlowValue>> {
    match &flow_value.value {
        Value::Array(items) => {
            let element_type = flow_value
                .value_type
                .array_element_type()
                .cloned()
                .unwrap_or(ValueType::Any);
            Ok(items
                .iter()
                .map(|item| FlowValue {
                    tag: FlowValueType::of(&element_type),
                    value: item.clone(),
                    value_type: element_type.clone(),
                })
                .collect())
        }
        Value::Record(record) => {
            let ValueType::Struct(name) = &flow_value.value_type else {
                bail!("element type {} is not a struct type", flow_value.value_type);
            };
            let def = ctx
                .types()
                .struct_def(name)
                .ok_or_else(|| eyre!("unknown struct type {}", name))?;

            let mut elements = Vec::with_capacity(def.fields.len());
            for field in &def.fields {
                let value = match record.get(&field.name) {
                    Some(value) if !value.is_undefined() => value.clone(),
                    _ => default_value_for_type(ctx, &field.value_type),
                };
                elements.push(FlowValue {
                    tag: FlowValueType::of(&field.value_type),
                    value,
                    value_type: field.value_type.clone(),
                });
            }
            Ok(elements)
        }
        _ => bail!("array-typed value is neither a sequence nor a struct record"),
    }
}

/// Emits one value record. Undefined and null runtime values override the
/// declared tag; everything else encodes under the flow value's own tag.
pub fn build_flow_value(
    writer: &mut dyn BinaryWriter,
    ctx: &Rc<BuildContext>,
    flow_value: &FlowValue,
) -> Result<()> {
    if flow_value.value.is_undefined() {
        return write_unit_record(writer, FlowValueType::Undefined);
    }
    if flow_value.value.is_null() {
        return write_unit_record(writer, FlowValueType::Null);
    }

    writer.write_uint8(flow_value.tag as u8)?;
    writer.write_uint8(0)?;
    writer.write_uint16(0)?;
    writer.write_uint32(0)?;

    match flow_value.tag {
        FlowValueType::Boolean => {
            writer.write_uint32(flow_value.value.as_int_lossy() as u32)?;
            writer.write_uint32(0)?;
        }
        FlowValueType::Int32 => {
            writer.write_int32(flow_value.value.as_int_lossy() as i32)?;
            writer.write_uint32(0)?;
        }
        FlowValueType::Float => {
            writer.write_float(flow_value.value.as_float_lossy() as f32)?;
            writer.write_uint32(0)?;
        }
        FlowValueType::Double => {
            writer.write_double(flow_value.value.as_float_lossy())?;
        }
        FlowValueType::StringAsset => {
            let text = flow_value.value.to_text();
            writer.write_object_offset(
                Alignment::Word,
                Box::new(move |writer| writer.write_string(&text)),
            )?;
            writer.write_uint32(0)?;
        }
        FlowValueType::Date => {
            let millis = match &flow_value.value {
                Value::Date(millis) => *millis,
                Value::Int(value) => *value as f64,
                Value::Float(value) => *value,
                _ => 0.0,
            };
            writer.write_double(millis)?;
        }
        FlowValueType::ArrayAsset => {
            let elements = decompose_elements(ctx, flow_value)?;
            let type_index = ctx.types().type_index(&flow_value.value_type);
            let ctx = Rc::clone(ctx);
            writer.write_object_offset(
                Alignment::Wide,
                Box::new(move |writer| {
                    writer.write_uint32(elements.len() as u32)?;
                    writer.write_uint32(type_index)?;
                    for element in &elements {
                        build_flow_value(writer, &ctx, element)?;
                    }
                    Ok(())
                }),
            )?;
            writer.write_uint32(0)?;
        }
        FlowValueType::Json => {
            writer.write_int32(flow_value.value.as_int_lossy() as i32)?;
            writer.write_uint32(0)?;
        }
        _ => {
            writer.write_uint64(0)?;
        }
    }

    Ok(())
}

/// Emits a constant from the constants table.
pub fn build_constant_value(
    writer: &mut dyn BinaryWriter,
    ctx: &Rc<BuildContext>,
    flow_value: &FlowValue,
) -> Result<()> {
    build_flow_value(writer, ctx, flow_value)
}

fn variable_flow_value(
    ctx: &Rc<BuildContext>,
    evaluator: &dyn ConstantEvaluator,
    variable: &Variable,
) -> FlowValue {
    let tag = match &variable.value_type {
        Some(value_type) => FlowValueType::of(value_type),
        None => {
            ctx.write_output(
                MessageKind::Error,
                "Variable type not set",
                Some(&variable.name),
            );
            FlowValueType::Undefined
        }
    };

    match evaluator.evaluate(&variable.default_value) {
        Ok(mut value) => {
            if matches!(variable.value_type, Some(ValueType::Json)) && value.is_truthy() {
                value = Value::Int(ctx.register_json_value(value) as i64);
            }
            FlowValue {
                tag,
                value,
                value_type: variable.value_type.clone().unwrap_or(ValueType::Undefined),
            }
        }
        Err(err) => {
            // One bad default must not block the rest of the build.
            ctx.write_output(MessageKind::Error, err.to_string(), Some(&variable.name));
            FlowValue {
                tag,
                value: Value::Null,
                value_type: ValueType::Null,
            }
        }
    }
}

/// Resolves a variable's default value and emits its record.
pub fn build_variable_value(
    writer: &mut dyn BinaryWriter,
    ctx: &Rc<BuildContext>,
    evaluator: &dyn ConstantEvaluator,
    variable: &Variable,
) -> Result<()> {
    build_flow_value(writer, ctx, &variable_flow_value(ctx, evaluator, variable))
}
