use binary_reader::{BinaryReader, Endian};

use crate::{
    error::ChunkError,
    io::reader::{endian_reader, DirectorExt},
};

/// VWFI: authoring metadata stored as a list of Pascal strings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieInfo {
    pub created_by: Option<String>,
    pub modified_by: Option<String>,
    pub file_path: Option<String>,
}

impl MovieInfo {
    pub fn from_bytes(bytes: &[u8]) -> Result<MovieInfo, ChunkError> {
        let mut reader = endian_reader(bytes, Endian::Big);
        Self::from_reader(&mut reader)
    }

    pub fn from_reader(reader: &mut BinaryReader) -> Result<MovieInfo, ChunkError> {
        reader.set_endian(Endian::Big);
        reader.jmp(0);
        let skip_len = reader.read_u32()? as usize;
        if skip_len > reader.length {
            return Err(ChunkError::malformed(
                "VWFI",
                format!("header of {} bytes overruns the chunk", skip_len),
            ));
        }

        reader.jmp(skip_len);
        let field_count = reader.read_u16()? as usize;
        let _unk = reader.read_u32()?;
        let offsets = (0..field_count)
            .map(|_| reader.read_u32().map(|offset| offset as usize))
            .collect::<Result<Vec<_>, _>>()?;
        let data_pos = reader.pos;

        let mut field = |idx: usize| -> Option<String> {
            let offset = *offsets.get(idx)?;
            reader.jmp(data_pos + offset);
            reader.read_pascal_string().ok()
        };

        Ok(MovieInfo {
            created_by: field(0),
            modified_by: field(1),
            file_path: field(2),
        })
    }
}
