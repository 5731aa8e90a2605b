use binary_reader::BinaryReader;
use log::debug;

use crate::{error::ChunkError, io::reader::DirectorExt};

use super::list::BasicListChunk;

#[allow(dead_code)]
pub struct CastMemberInfoChunkHeader {
    data_offset: usize,
    unk1: u32,
    unk2: u32,
    pub flags: u32,
    pub script_id: u32,
}

/// The generic field table of a CASt record.
pub struct CastMemberInfoChunk {
    pub header: CastMemberInfoChunkHeader,
    pub fields: Vec<String>,
}

impl CastMemberInfoChunk {
    pub fn read(reader: &mut BinaryReader) -> Result<CastMemberInfoChunk, ChunkError> {
        let header = Self::read_header(reader)?;
        let offset_table = BasicListChunk::read_offset_table(reader, header.data_offset)?;
        let list = BasicListChunk::locate_items(reader, offset_table)?;

        // Every item is read as a length-prefixed string starting at its
        // offset. An empty leading item therefore yields the member name.
        let mut fields = Vec::with_capacity(list.offset_table.len());
        for (i, offset) in list.offset_table.iter().enumerate() {
            reader.jmp(list.list_offset + offset);
            match reader.read_pascal_string() {
                Ok(field) => fields.push(field),
                Err(_) => {
                    debug!("CASt field {} overruns the info block, stopping", i);
                    break;
                }
            }
        }

        return Ok(CastMemberInfoChunk { header, fields });
    }

    fn read_header(reader: &mut BinaryReader) -> Result<CastMemberInfoChunkHeader, ChunkError> {
        return Ok(CastMemberInfoChunkHeader {
            data_offset: reader.read_u32()? as usize,
            unk1: reader.read_u32()?,
            unk2: reader.read_u32()?,
            flags: reader.read_u32()?,
            script_id: reader.read_u32()?,
        });
    }

    pub fn name(&self) -> &str {
        self.fields.first().map(|s| s.as_str()).unwrap_or("")
    }
}
