use binary_reader::BinaryReader;
use log::warn;

use crate::{error::ChunkError, io::reader::DirectorExt};

const KEY_TABLE_ENTRY_SIZE: usize = 12;

#[derive(Clone, Copy, Debug)]
pub struct KeyTableEntry {
    /// The resource chunk being linked.
    pub section_id: u32,
    /// The owning chunk, or a biased cast library id.
    pub cast_id: u32,
    pub fourcc: u32,
}

impl KeyTableEntry {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<KeyTableEntry, ChunkError> {
        return Ok(KeyTableEntry {
            section_id: reader.read_u32()?,
            cast_id: reader.read_u32()?,
            fourcc: reader.read_fourcc()?,
        });
    }
}

pub struct KeyTableChunk {
    pub entry_size: u16,
    pub entry_size2: u16,
    pub entry_count: u32,
    pub used_count: u32,
    pub entries: Vec<KeyTableEntry>,
}

impl KeyTableChunk {
    /// Reads the chunk payload. KEY* follows the container's endianness.
    pub fn from_reader(reader: &mut BinaryReader) -> Result<KeyTableChunk, ChunkError> {
        let entry_size = reader.read_u16()?;
        let entry_size2 = reader.read_u16()?;
        let entry_count = reader.read_u32()?;
        let used_count = reader.read_u32()?;

        let mut entries = Vec::new();
        for i in 0..used_count {
            if reader.bytes_left() < KEY_TABLE_ENTRY_SIZE {
                warn!("KEY* declares {} links but holds only {}", used_count, i);
                break;
            }
            entries.push(KeyTableEntry::from_reader(reader)?);
        }

        return Ok(KeyTableChunk {
            entry_size,
            entry_size2,
            entry_count,
            used_count,
            entries,
        });
    }
}
