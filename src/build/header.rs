//! # Asset File Header
//!
//! The uncompressed 12-byte header in front of the compressed payload.
//!
//! ```text
//! Bytes 0-3:  magic "~fpk"
//! Byte  4:    format major version
//! Byte  5:    format minor version
//! Bytes 6-7:  project type (u16 LE)
//! Bytes 8-11: decompressed payload size (u32 LE)
//! ```
//!
//! The firmware validates the magic and version, allocates
//! `decompressed_size` bytes, and inflates the payload into that region.

use eyre::{ensure, eyre, Result};
use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

pub const ASSET_MAGIC: [u8; 4] = *b"~fpk";

pub const VERSION_MAJOR: u8 = 3;
pub const VERSION_MINOR: u8 = 0;

pub const ASSET_HEADER_SIZE: usize = size_of::<AssetHeader>();

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct AssetHeader {
    magic: [u8; 4],
    version_major: u8,
    version_minor: u8,
    project_type: U16,
    decompressed_size: U32,
}

impl AssetHeader {
    pub fn new(project_type: u16, decompressed_size: u32) -> Self {
        Self {
            magic: ASSET_MAGIC,
            version_major: VERSION_MAJOR,
            version_minor: VERSION_MINOR,
            project_type: U16::new(project_type),
            decompressed_size: U32::new(decompressed_size),
        }
    }

    pub fn read_from(bytes: &[u8]) -> Result<Self> {
        ensure!(
            bytes.len() >= ASSET_HEADER_SIZE,
            "asset data too short for header: {} bytes",
            bytes.len()
        );
        let header = AssetHeader::read_from_bytes(&bytes[..ASSET_HEADER_SIZE])
            .map_err(|_| eyre!("malformed asset header"))?;
        ensure!(header.magic == ASSET_MAGIC, "bad asset magic");
        Ok(header)
    }

    pub fn version(&self) -> (u8, u8) {
        (self.version_major, self.version_minor)
    }

    pub fn project_type(&self) -> u16 {
        self.project_type.get()
    }

    pub fn decompressed_size(&self) -> u32 {
        self.decompressed_size.get()
    }
}

const _: () = assert!(ASSET_HEADER_SIZE == 12);
