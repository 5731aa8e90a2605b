use binary_reader::{BinaryReader, Endian};

use crate::{
    error::ChunkError,
    io::{
        list_readers::{read_pascal_string, read_u16},
        reader::endian_reader,
    },
};

use super::list::BasicListChunk;

pub struct CastListChunk {
    pub entries: Vec<CastListEntry>,
}

#[allow(dead_code)]
struct CastListChunkHeader {
    data_offset: usize,
    unk0: u16,
    cast_count: u16,
    items_per_cast: u16,
    unk1: u16,
}

impl CastListChunk {
    fn read_header(reader: &mut BinaryReader) -> Result<CastListChunkHeader, ChunkError> {
        return Ok(CastListChunkHeader {
            data_offset: reader.read_u32()? as usize,
            unk0: reader.read_u16()?,
            cast_count: reader.read_u16()?,
            items_per_cast: reader.read_u16()?,
            unk1: reader.read_u16()?,
        });
    }

    fn read_entries(
        header: &CastListChunkHeader,
        item_bufs: &[Vec<u8>],
        item_endian: Endian,
    ) -> Vec<CastListEntry> {
        let per_cast = header.items_per_cast as usize;
        (0..header.cast_count as usize)
            .map(|i| {
                // item 0 is a list-wide header; each library's items follow
                let base = i * per_cast;
                let mut entry = CastListEntry::default();

                if per_cast >= 1 {
                    entry.name = read_pascal_string(item_bufs, base + 1, item_endian);
                }
                if per_cast >= 2 {
                    entry.file_path = read_pascal_string(item_bufs, base + 2, item_endian);
                }
                if per_cast >= 3 {
                    entry.preload_settings = read_u16(item_bufs, base + 3, item_endian);
                }
                if per_cast >= 4 {
                    if let Some(buf) = item_bufs.get(base + 4) {
                        let mut item_reader = endian_reader(buf, item_endian);
                        entry.min_member = item_reader.read_u16().unwrap_or(0);
                        entry.max_member = item_reader.read_u16().unwrap_or(0);
                        entry.id = item_reader.read_u32().unwrap_or(0);
                    }
                }

                entry
            })
            .collect()
    }

    pub fn from_reader(reader: &mut BinaryReader) -> Result<CastListChunk, ChunkError> {
        reader.set_endian(Endian::Big);

        let header = Self::read_header(reader)?;
        let offset_table = BasicListChunk::read_offset_table(reader, header.data_offset)?;
        let item_bufs = BasicListChunk::read_items(reader, offset_table)?;

        let entries = Self::read_entries(&header, &item_bufs, Endian::Big);
        return Ok(CastListChunk { entries });
    }
}

#[derive(Clone, Debug, Default)]
pub struct CastListEntry {
    pub name: String,
    pub file_path: String,
    pub preload_settings: u16,
    pub min_member: u16,
    pub max_member: u16,
    pub id: u32,
}

impl CastListEntry {
    pub fn member_count(&self) -> u32 {
        if self.max_member < self.min_member {
            return 0;
        }
        (self.max_member - self.min_member) as u32 + 1
    }
}
