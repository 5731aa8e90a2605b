use binary_reader::{BinaryReader, Endian};

use crate::{
    director::{
        chunks::cast_member_info::CastMemberInfoChunk,
        enums::{CastType, ScriptType},
    },
    error::ChunkError,
    io::reader::{endian_reader, DirectorExt},
};

/// A D5+ CASt record: generic envelope plus the raw type specific tail.
pub struct CastMemberChunk {
    pub cast_type: CastType,
    pub raw_cast_type: u32,
    pub member_info: Option<CastMemberInfoChunk>,
    pub specific_data_raw: Vec<u8>,
    pub script_type: Option<ScriptType>,
}

impl CastMemberChunk {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<CastMemberChunk, ChunkError> {
        reader.set_endian(Endian::Big);

        let raw_cast_type = reader.read_u32()?;
        let info_len = reader.read_u32()? as usize;
        let specific_data_len = reader.read_u32()? as usize;

        if info_len > reader.bytes_left() {
            return Err(ChunkError::malformed(
                "CASt",
                format!("info block of {} bytes overruns the chunk", info_len),
            ));
        }

        let mut info = None;
        if info_len != 0 {
            let mut info_reader = endian_reader(reader.read_bytes(info_len)?, Endian::Big);
            info = Some(CastMemberInfoChunk::read(&mut info_reader)?);
        }

        // Some writers pad or truncate the tail, keep what is there.
        let specific_len = specific_data_len.min(reader.bytes_left());
        let specific_data_raw = reader.read_bytes(specific_len)?.to_vec();

        let cast_type = CastType::from(raw_cast_type);
        let script_type = match cast_type {
            CastType::Script => endian_reader(&specific_data_raw, Endian::Big)
                .read_u16()
                .ok()
                .map(ScriptType::from),
            _ => None,
        };

        return Ok(CastMemberChunk {
            cast_type,
            raw_cast_type,
            member_info: info,
            specific_data_raw,
            script_type,
        });
    }

    pub fn name(&self) -> String {
        self.member_info
            .as_ref()
            .map(|info| info.name().to_owned())
            .unwrap_or_default()
    }
}
