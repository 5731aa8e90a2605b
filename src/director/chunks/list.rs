use binary_reader::BinaryReader;

use crate::{error::ChunkError, io::reader::DirectorExt};

/// Offset-table list layout shared by MCsL and the CASt info block: a header
/// whose first word is the offset of the table, then `u16 count`, `count`
/// u32 item offsets, a u32 total item length and the item bytes.
pub struct BasicListChunk {}

pub struct ListItems {
    /// Absolute position of the first item byte.
    pub list_offset: usize,
    pub items_len: usize,
    pub offset_table: Vec<usize>,
}

impl BasicListChunk {
    pub fn read_header(reader: &mut BinaryReader) -> Result<usize, ChunkError> {
        let data_offset = reader.read_u32()?;
        return Ok(data_offset as usize);
    }

    pub fn read_offset_table(
        reader: &mut BinaryReader,
        data_offset: usize,
    ) -> Result<Vec<usize>, ChunkError> {
        if data_offset > reader.length {
            return Err(ChunkError::malformed(
                "list",
                format!("offset table at {} beyond end {}", data_offset, reader.length),
            ));
        }
        reader.jmp(data_offset);
        let offset_table_len = reader.read_u16()? as usize;
        if offset_table_len * 4 > reader.bytes_left() {
            return Err(ChunkError::malformed(
                "list",
                format!("{} offsets do not fit", offset_table_len),
            ));
        }
        let offset_table = (0..offset_table_len)
            .map(|_| reader.read_u32().map(|o| o as usize))
            .collect::<Result<Vec<_>, _>>()?;

        return Ok(offset_table);
    }

    /// Reads the item length word that follows the offset table and records
    /// where the items begin, leaving the reader there.
    pub fn locate_items(
        reader: &mut BinaryReader,
        offset_table: Vec<usize>,
    ) -> Result<ListItems, ChunkError> {
        let items_len = reader.read_u32()? as usize;
        return Ok(ListItems {
            list_offset: reader.pos,
            items_len,
            offset_table,
        });
    }

    pub fn read_items(
        reader: &mut BinaryReader,
        offset_table: Vec<usize>,
    ) -> Result<Vec<Vec<u8>>, ChunkError> {
        let list = Self::locate_items(reader, offset_table)?;

        let items = (0..list.offset_table.len())
            .map(|i| {
                let offset = list.offset_table[i];
                let next_offset = if i == list.offset_table.len() - 1 {
                    list.items_len
                } else {
                    list.offset_table[i + 1]
                };
                if next_offset < offset {
                    return Err(ChunkError::malformed(
                        "list",
                        format!("item {} has negative length", i),
                    ));
                }
                reader.jmp(list.list_offset + offset);
                Ok(reader.read_bytes(next_offset - offset)?.to_vec())
            })
            .collect::<Result<Vec<_>, _>>()?;

        return Ok(items);
    }

    pub fn from_reader(reader: &mut BinaryReader) -> Result<Vec<Vec<u8>>, ChunkError> {
        let data_offset = Self::read_header(reader)?;
        let offset_table = Self::read_offset_table(reader, data_offset)?;
        return Self::read_items(reader, offset_table);
    }
}
