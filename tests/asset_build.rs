//! # End-to-End Asset Build Tests
//!
//! Builds complete asset blobs and walks the decompressed output the way the
//! firmware loader does: follow each relocation by adding the signed delta to
//! its own anchor, then read the referenced content. Offsets are never
//! hard-coded past the document root, so these tests pin the binary contract
//! without freezing incidental layout.

use std::rc::Rc;

use eyre::{eyre, Result};
use hashbrown::HashMap;

use flowpack::{
    build_asset_data, build_document_data, AssetBuffer, AssetHeader, AssetProject, BinaryWriter,
    BuildContext, ConstantEvaluator, FlowValue, FlowValueType, MessageKind, ProbeBuffer,
    StructDef, StructField, TypeTable, Value, ValueType, Variable, ASSET_HEADER_SIZE,
};

struct MapEvaluator(HashMap<String, Value>);

impl MapEvaluator {
    fn new(entries: &[(&str, Value)]) -> Rc<Self> {
        Rc::new(Self(
            entries
                .iter()
                .map(|(expression, value)| (expression.to_string(), value.clone()))
                .collect(),
        ))
    }
}

impl ConstantEvaluator for MapEvaluator {
    fn evaluate(&self, expression: &str) -> Result<Value> {
        self.0
            .get(expression)
            .cloned()
            .ok_or_else(|| eyre!("Unknown identifier: {}", expression))
    }
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn follow(bytes: &[u8], anchor: usize) -> usize {
    (anchor as i64 + read_i32(bytes, anchor) as i64) as usize
}

fn read_nul_terminated(bytes: &[u8], offset: usize) -> &[u8] {
    let end = bytes[offset..].iter().position(|&b| b == 0).unwrap();
    &bytes[offset..offset + end]
}

fn sample_project() -> AssetProject {
    AssetProject {
        project_type: 2,
        utf8_support: true,
        types: TypeTable::new(),
        variables: vec![
            Variable::new("speed", ValueType::Integer, "42"),
            Variable::new("greeting", ValueType::String, "\"hi\""),
            Variable::new("broken", ValueType::Integer, "oops"),
            Variable::new("flag", ValueType::Boolean, "true"),
        ],
    }
}

fn sample_evaluator() -> Rc<MapEvaluator> {
    MapEvaluator::new(&[
        ("42", Value::Int(42)),
        ("\"hi\"", Value::Text("hi".into())),
        ("true", Value::Bool(true)),
    ])
}

#[test]
fn build_produces_header_plus_compressed_payload() {
    let result = build_asset_data(sample_project(), sample_evaluator()).unwrap();

    let header = AssetHeader::read_from(&result.data).unwrap();
    assert_eq!(header.project_type(), 2);
    assert_eq!(header.decompressed_size() as usize, result.decompressed_size);

    let payload = lz4_flex::block::decompress(
        &result.data[ASSET_HEADER_SIZE..],
        result.decompressed_size,
    )
    .unwrap();
    assert_eq!(payload.len(), result.decompressed_size);
}

#[test]
fn build_reports_sizes_and_recovered_errors() {
    let result = build_asset_data(sample_project(), sample_evaluator()).unwrap();

    let errors: Vec<_> = result
        .messages
        .iter()
        .filter(|message| message.kind == MessageKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].object.as_deref(), Some("broken"));

    let infos: Vec<_> = result
        .messages
        .iter()
        .filter(|message| message.kind == MessageKind::Info)
        .collect();
    assert_eq!(infos.len(), 2);
    assert_eq!(
        infos[0].text,
        format!("Uncompressed size: {}", result.decompressed_size)
    );
    assert!(infos[1].text.starts_with("Compressed size: "));
}

#[test]
fn document_walk_reaches_every_variable_record() {
    let result = build_asset_data(sample_project(), sample_evaluator()).unwrap();
    let bytes = lz4_flex::block::decompress(
        &result.data[ASSET_HEADER_SIZE..],
        result.decompressed_size,
    )
    .unwrap();

    let flow = follow(&bytes, 0);

    // Flow section: variables array, then the constants pair.
    assert_eq!(read_u32(&bytes, flow), 4);
    let variable_table = follow(&bytes, flow + 4);

    assert_eq!(read_u32(&bytes, flow + 8), 0);
    assert_eq!(read_u32(&bytes, flow + 12), 0);

    let record = |index: usize| follow(&bytes, variable_table + index * 4);

    let speed = record(0);
    assert_eq!(speed % 8, 0);
    assert_eq!(bytes[speed], FlowValueType::Int32 as u8);
    assert_eq!(read_i32(&bytes, speed + 8), 42);

    let greeting = record(1);
    assert_eq!(bytes[greeting], FlowValueType::StringAsset as u8);
    let text = follow(&bytes, greeting + 8);
    assert_eq!(read_nul_terminated(&bytes, text), b"hi");

    let broken = record(2);
    assert_eq!(bytes[broken], FlowValueType::Null as u8);

    let flag = record(3);
    assert_eq!(bytes[flag], FlowValueType::Boolean as u8);
    assert_eq!(read_u32(&bytes, flag + 8), 1);
}

#[test]
fn constants_registered_mid_build_land_in_the_deferred_table() {
    let ctx = Rc::new(BuildContext::new(TypeTable::new()));
    let evaluator: Rc<dyn ConstantEvaluator> = MapEvaluator::new(&[]);
    let mut buffer = AssetBuffer::new(true);

    build_document_data(&mut buffer, &ctx, &evaluator, &[]).unwrap();

    // Registered after the first pass laid the document out, before finalize:
    // exactly what the deferred pair exists for.
    ctx.register_constant(FlowValue::typed(Value::Int(7), ValueType::Integer));
    ctx.register_constant(FlowValue::typed(Value::Text("c".into()), ValueType::String));

    buffer.finalize().unwrap();
    let bytes = buffer.bytes();

    let flow = follow(bytes, 0);
    assert_eq!(read_u32(bytes, flow), 0);
    assert_eq!(read_u32(bytes, flow + 4), 0);

    assert_eq!(read_u32(bytes, flow + 8), 2);
    let constant_table = follow(bytes, flow + 12);

    let first = follow(bytes, constant_table);
    assert_eq!(bytes[first], FlowValueType::Int32 as u8);
    assert_eq!(read_i32(bytes, first + 8), 7);

    let second = follow(bytes, constant_table + 4);
    assert_eq!(bytes[second], FlowValueType::StringAsset as u8);
    let text = follow(bytes, second + 8);
    assert_eq!(read_nul_terminated(bytes, text), b"c");
}

#[test]
fn probe_pass_traverses_the_document_without_output() {
    let ctx = Rc::new(BuildContext::new(TypeTable::new()));
    let evaluator: Rc<dyn ConstantEvaluator> = MapEvaluator::new(&[]);
    let variables = vec![Variable::new("broken", ValueType::Integer, "oops")];

    let mut probe = ProbeBuffer::new();
    build_document_data(&mut probe, &ctx, &evaluator, &variables).unwrap();

    assert_eq!(probe.size(), 0);
    // The traversal still resolved the variable, so its error was reported.
    let messages = ctx.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].object.as_deref(), Some("broken"));
}

#[test]
fn legacy_string_mode_packs_value_bytes_per_char() {
    let project = AssetProject {
        project_type: 1,
        utf8_support: false,
        types: TypeTable::new(),
        variables: vec![Variable::new("label", ValueType::String, "\"café\"")],
    };
    let evaluator = MapEvaluator::new(&[("\"café\"", Value::Text("café".into()))]);

    let result = build_asset_data(project, evaluator).unwrap();
    let bytes = lz4_flex::block::decompress(
        &result.data[ASSET_HEADER_SIZE..],
        result.decompressed_size,
    )
    .unwrap();

    let flow = follow(&bytes, 0);
    assert_eq!(read_u32(&bytes, flow), 1);
    let variable_table = follow(&bytes, flow + 4);
    let record = follow(&bytes, variable_table);
    assert_eq!(bytes[record], FlowValueType::StringAsset as u8);

    let text = follow(&bytes, record + 8);
    assert_eq!(read_nul_terminated(&bytes, text), &[b'c', b'a', b'f', 0xE9]);
}

#[test]
fn mistyped_struct_value_aborts_the_build() {
    let mut types = TypeTable::new();
    types.add_struct(StructDef::new(
        "Point",
        [
            StructField::new("x", ValueType::Double),
            StructField::new("y", ValueType::Double),
        ],
    ));

    let project = AssetProject {
        project_type: 1,
        utf8_support: true,
        types,
        variables: vec![Variable::new(
            "origin",
            ValueType::Struct("Point".into()),
            "3",
        )],
    };
    let evaluator = MapEvaluator::new(&[("3", Value::Int(3))]);

    assert!(build_asset_data(project, evaluator).is_err());
}
