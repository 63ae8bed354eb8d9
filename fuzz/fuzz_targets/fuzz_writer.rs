//! Fuzz testing for the arena writer.
//!
//! Applies arbitrary write sequences, padding aligned writes into legality,
//! then finalizes and checks the relocation invariants: every patched anchor
//! points at aligned content inside the live region.

#![no_main]

use std::cell::RefCell;
use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use flowpack::{Alignment, AssetBuffer, BinaryWriter};

#[derive(Debug, Arbitrary)]
enum WriteOp {
    Uint8(u8),
    Int16(i16),
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Padding,
    ObjectOffset { wide: bool, payload: u32 },
    NumberArray { len: u8 },
    FutureArray { payload: u32 },
}

#[derive(Debug, Arbitrary)]
struct WriterInput {
    utf8_support: bool,
    ops: Vec<WriteOp>,
}

fuzz_target!(|input: WriterInput| {
    let mut buffer = AssetBuffer::new(input.utf8_support);
    let anchors: Rc<RefCell<Vec<(usize, usize)>>> = Rc::new(RefCell::new(Vec::new()));

    for op in input.ops.into_iter().take(256) {
        match op {
            WriteOp::Uint8(value) => buffer.write_uint8(value).unwrap(),
            WriteOp::Int16(value) => {
                if buffer.size() % 2 != 0 {
                    buffer.write_uint8(0).unwrap();
                }
                buffer.write_int16(value).unwrap();
            }
            WriteOp::Uint32(value) => {
                buffer.add_padding().unwrap();
                buffer.write_uint32(value).unwrap();
            }
            WriteOp::Uint64(value) => {
                buffer.add_padding8().unwrap();
                buffer.write_uint64(value).unwrap();
            }
            WriteOp::Float(value) => {
                buffer.add_padding().unwrap();
                buffer.write_float(value).unwrap();
            }
            WriteOp::Double(value) => {
                buffer.add_padding8().unwrap();
                buffer.write_double(value).unwrap();
            }
            WriteOp::String(value) => {
                let clipped: String = value.chars().take(64).collect();
                buffer.add_padding().unwrap();
                buffer.write_string(&clipped).unwrap();
            }
            WriteOp::Bytes(value) => {
                let clipped = &value[..value.len().min(64)];
                buffer.add_padding().unwrap();
                buffer.write_uint8_array(clipped).unwrap();
            }
            WriteOp::Padding => buffer.add_padding8().unwrap(),
            WriteOp::ObjectOffset { wide, payload } => {
                buffer.add_padding().unwrap();
                let anchor = buffer.size();
                let alignment = if wide { Alignment::Wide } else { Alignment::Word };
                let anchors = Rc::clone(&anchors);
                buffer
                    .write_object_offset(
                        alignment,
                        Box::new(move |writer| {
                            anchors.borrow_mut().push((anchor, alignment.bytes()));
                            writer.write_uint32(payload)
                        }),
                    )
                    .unwrap();
            }
            WriteOp::NumberArray { len } => {
                buffer.add_padding().unwrap();
                buffer
                    .write_number_array(
                        len as usize % 16,
                        Rc::new(|writer, index| writer.write_uint32(index as u32)),
                    )
                    .unwrap();
            }
            WriteOp::FutureArray { payload } => {
                buffer.add_padding().unwrap();
                buffer
                    .write_future_array(Box::new(move |writer| {
                        writer.write_uint32(1)?;
                        writer.write_object_offset(
                            Alignment::Word,
                            Box::new(move |writer| writer.write_uint32(payload)),
                        )
                    }))
                    .unwrap();
            }
        }
    }

    buffer.finalize().unwrap();

    let bytes = buffer.bytes();
    assert_eq!(bytes.len() % 4, 0);

    for &(anchor, alignment) in anchors.borrow().iter() {
        let delta = i32::from_le_bytes(bytes[anchor..anchor + 4].try_into().unwrap());
        let content = (anchor as i64 + delta as i64) as usize;
        assert!(content <= bytes.len());
        assert_eq!(content % alignment, 0);
    }
});
