use binary_reader::BinaryReader;

use crate::{error::ChunkError, io::reader::DirectorExt};

/// CAS*: the slot table of one cast library, one chunk id per member slot.
pub struct CastChunk {
    pub member_ids: Vec<u32>,
}

impl CastChunk {
    pub fn from_reader(reader: &mut BinaryReader) -> Result<CastChunk, ChunkError> {
        reader.set_endian(binary_reader::Endian::Big);

        let mut member_ids: Vec<u32> = Vec::with_capacity(reader.bytes_left() / 4);
        while reader.bytes_left() >= 4 {
            member_ids.push(reader.read_u32()?);
        }

        return Ok(CastChunk { member_ids });
    }

    /// Populated slots as `(member number, chunk id)`, numbering from
    /// `first_member`.
    pub fn slots(&self, first_member: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.member_ids
            .iter()
            .enumerate()
            .filter(|(_, id)| **id != 0)
            .map(move |(i, id)| (first_member + i as u32, *id))
    }
}
