use binary_reader::BinaryReader;

use crate::{director::utils::FOURCC, error::ChunkError, io::reader::DirectorExt};

/// The initial map sits right after the container header and points at the
/// memory map.
pub struct InitialMapChunk {
    pub len: u32,
    pub version: u32,
    pub mmap_offset: usize,
}

impl InitialMapChunk {
    /// Reads the full chunk, header included, at the reader's position.
    pub fn from_reader(reader: &mut BinaryReader) -> Result<InitialMapChunk, ChunkError> {
        let fourcc = reader.read_fourcc()?;
        if fourcc != FOURCC("imap") {
            return Err(ChunkError::malformed("imap", "missing imap tag after header"));
        }
        let len = reader.read_u32()?;
        let version = reader.read_u32()?;
        let mmap_offset = reader.read_u32()? as usize;

        return Ok(InitialMapChunk {
            len,
            version,
            mmap_offset,
        });
    }
}
