//! # Build Orchestration
//!
//! Assembles one asset blob from a project description: document content
//! into the arena, finalize, compress, header, report.
//!
//! The document section mirrors what the firmware's loader walks first:
//!
//! ```text
//! document
//! └── reloc -> flow section
//!       ├── globalVariables  write_array(wide) of value records
//!       └── constants        write_future_array -> write_array(wide)
//! ```
//!
//! Variable names never enter the binary; the firmware addresses variables
//! by index, and names stay in the editor's in-memory model only.
//!
//! The constants table is a deferred array on purpose: constants are
//! registered on the [`BuildContext`] while variable and flow content is
//! being emitted in the first finalize pass, and the table is only
//! materialized afterwards.

use std::rc::Rc;

use eyre::Result;
use zerocopy::IntoBytes;

use crate::buffer::{Alignment, AssetBuffer, BinaryWriter};
use crate::values::{build_constant_value, build_variable_value, Variable};

use super::context::{BuildContext, ConstantEvaluator, MessageKind};
use super::header::{AssetHeader, ASSET_HEADER_SIZE};
use crate::types::TypeTable;

/// Everything the builder needs to know about a project.
pub struct AssetProject {
    pub project_type: u16,
    pub utf8_support: bool,
    pub types: TypeTable,
    pub variables: Vec<Variable>,
}

pub struct BuildResult {
    /// Header plus compressed payload, ready to flash.
    pub data: Vec<u8>,
    pub decompressed_size: usize,
    pub messages: Vec<super::BuildMessage>,
}

/// Writes the document section. Public so an embedding application can
/// drive a probe pass or compose a larger document around it.
pub fn build_document_data(
    writer: &mut dyn BinaryWriter,
    ctx: &Rc<BuildContext>,
    evaluator: &Rc<dyn ConstantEvaluator>,
    variables: &[Variable],
) -> Result<()> {
    let variables = variables.to_vec();
    let ctx = Rc::clone(ctx);
    let evaluator = Rc::clone(evaluator);
    writer.write_object_offset(
        Alignment::Word,
        Box::new(move |writer| {
            let inner_ctx = Rc::clone(&ctx);
            let inner_eval = Rc::clone(&evaluator);
            writer.write_array(
                variables.len(),
                Alignment::Wide,
                Rc::new(move |writer, index| {
                    build_variable_value(
                        writer,
                        &inner_ctx,
                        inner_eval.as_ref(),
                        &variables[index],
                    )
                }),
            )?;

            let inner_ctx = Rc::clone(&ctx);
            writer.write_future_array(Box::new(move |writer| {
                let constants = inner_ctx.constants();
                let table_ctx = Rc::clone(&inner_ctx);
                writer.write_array(
                    constants.len(),
                    Alignment::Wide,
                    Rc::new(move |writer, index| {
                        build_constant_value(writer, &table_ctx, &constants[index])
                    }),
                )
            }))
        }),
    )
}

/// Runs one complete build and returns the flashable blob plus the build
/// output log.
pub fn build_asset_data(
    project: AssetProject,
    evaluator: Rc<dyn ConstantEvaluator>,
) -> Result<BuildResult> {
    let AssetProject {
        project_type,
        utf8_support,
        types,
        variables,
    } = project;

    let ctx = Rc::new(BuildContext::new(types));
    let mut buffer = AssetBuffer::new(utf8_support);

    build_document_data(&mut buffer, &ctx, &evaluator, &variables)?;

    buffer.finalize()?;
    let decompressed_size = buffer.size();
    let compressed = buffer.compress()?;

    let header = AssetHeader::new(project_type, decompressed_size as u32);
    let mut data = Vec::with_capacity(ASSET_HEADER_SIZE + compressed.len());
    data.extend_from_slice(header.as_bytes());
    data.extend_from_slice(&compressed);

    ctx.write_output(
        MessageKind::Info,
        format!("Uncompressed size: {}", decompressed_size),
        None,
    );
    ctx.write_output(
        MessageKind::Info,
        format!("Compressed size: {}", compressed.len()),
        None,
    );

    Ok(BuildResult {
        data,
        decompressed_size,
        messages: ctx.take_messages(),
    })
}
