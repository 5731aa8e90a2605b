use binary_reader::BinaryReader;
use log::warn;

use crate::{director::utils::FOURCC, error::ChunkError, io::reader::DirectorExt};

pub const MEMORY_MAP_ENTRY_SIZE: usize = 20;

#[allow(dead_code)]
pub struct MemoryMapEntry {
    pub fourcc: u32,
    pub len: u32,
    pub offset: u32,
    unknown0: u32,
    unknown1: u32,
}

impl MemoryMapEntry {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<MemoryMapEntry, ChunkError> {
        return Ok(MemoryMapEntry {
            fourcc: reader.read_fourcc()?,
            len: reader.read_u32()?,
            offset: reader.read_u32()?,
            unknown0: reader.read_u32()?,
            unknown1: reader.read_u32()?,
        });
    }
}

pub struct MemoryMapChunk {
    pub version: i32,
    pub file_num: u32,
    pub entries: Vec<MemoryMapEntry>,
}

impl MemoryMapChunk {
    /// Reads the full chunk, header included, at the reader's position.
    pub fn from_reader(reader: &mut BinaryReader) -> Result<MemoryMapChunk, ChunkError> {
        let fourcc = reader.read_fourcc()?;
        if fourcc != FOURCC("mmap") {
            return Err(ChunkError::malformed("mmap", "imap does not point at a memory map"));
        }
        let /*  4 */ _len = reader.read_u32()?;
        let /*  8 */ version = reader.read_i32()?;
        let /* 12 */ _something1 = reader.read_u32()?;
        let /* 16 */ file_num = reader.read_u32()?;
        let /* 20 */ _unknown0 = reader.read_i32()?;
        let /* 24 */ _unknown1 = reader.read_i32()?;
        let /* 28 */ _unknown2 = reader.read_i32()?;

        let mut entries = Vec::with_capacity(file_num.min(0x10000) as usize);
        for i in 0..file_num {
            if reader.bytes_left() < MEMORY_MAP_ENTRY_SIZE {
                warn!("mmap declares {} entries but the file ends after {}", file_num, i);
                break;
            }
            entries.push(MemoryMapEntry::from_reader(reader)?);
        }

        return Ok(MemoryMapChunk {
            version,
            file_num,
            entries,
        });
    }
}
