use binary_reader::{BinaryReader, Endian};
use fxhash::FxHashMap;
use log::{debug, warn};

use crate::{
    config::FormatConfig,
    director::{
        chunks::{imap::InitialMapChunk, key_table::KeyTableChunk, mmap::MemoryMapChunk},
        utils::{fourcc_to_string, FOURCC},
    },
    error::{ChunkError, DirectorError},
    io::reader::{endian_reader, DirectorExt},
};

pub const CHUNK_HEADER_SIZE: usize = 8;
const CONTAINER_HEADER_SIZE: usize = 12;

/// One memory map record. `data_offset` points at the chunk header, the
/// payload starts eight bytes later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkEntry {
    pub id: u32,
    pub fourcc: u32,
    pub data_offset: u32,
    pub data_length: u32,
    pub linked_entry_ids: Vec<u32>,
}

impl ChunkEntry {
    pub fn fourcc_str(&self) -> String {
        fourcc_to_string(self.fourcc)
    }
}

/// Random access view of a RIFX/XFIR container: the memory map plus the
/// resource links declared by KEY*.
///
/// The index keeps its own copy of the file bytes, so chunk payloads stay
/// reachable after the caller's buffer is gone. Parsing never writes to it.
pub struct ContainerIndex {
    pub endian: Endian,
    pub signature: u32,
    pub file_size: u32,
    pub entries: Vec<ChunkEntry>,
    /// Cast library id to the entry id of its CAS* chunk.
    pub library_chunks: FxHashMap<u32, u32>,
    data: Vec<u8>,
}

impl ContainerIndex {
    pub fn parse(bytes: &[u8]) -> Result<ContainerIndex, DirectorError> {
        Self::parse_with_config(bytes, &FormatConfig::default())
    }

    pub fn parse_with_config(
        bytes: &[u8],
        config: &FormatConfig,
    ) -> Result<ContainerIndex, DirectorError> {
        let mut reader = endian_reader(bytes, Endian::Big);

        let meta_fourcc = reader.read_fourcc()?;
        let endian = if meta_fourcc == FOURCC("RIFX") {
            Endian::Big
        } else if meta_fourcc == FOURCC("XFIR") {
            Endian::Little
        } else {
            return Err(DirectorError::NotADirectorFile { tag: meta_fourcc });
        };
        reader.set_endian(endian);

        let file_size = reader.read_u32()?;
        let signature = reader.read_fourcc()?;
        debug!(
            "{} container, signature {}, {} bytes",
            fourcc_to_string(meta_fourcc),
            fourcc_to_string(signature),
            file_size
        );

        let mut index = ContainerIndex {
            endian,
            signature,
            file_size,
            entries: Vec::new(),
            library_chunks: FxHashMap::default(),
            data: bytes.to_vec(),
        };

        match read_memory_map(&mut reader) {
            Ok(entries) => index.entries = entries,
            Err(err) => {
                warn!("memory map unreadable, continuing without chunks: {}", err);
                return Ok(index);
            }
        }
        index.link_key_table(config);

        Ok(index)
    }

    fn link_key_table(&mut self, config: &FormatConfig) {
        let Some(key_entry_id) = self.first_entry_of_type(FOURCC("KEY*")).map(|e| e.id) else {
            debug!("no KEY* chunk");
            return;
        };
        let key_table = match self.chunk_reader(key_entry_id).map(|mut reader| {
            KeyTableChunk::from_reader(&mut reader)
        }) {
            Some(Ok(key_table)) => key_table,
            Some(Err(err)) => {
                warn!("KEY* unreadable: {}", err);
                return;
            }
            None => return,
        };

        let entry_count = self.entries.len() as u32;
        for key in &key_table.entries {
            if key.cast_id >= config.cast_lib_key_bias && key.fourcc == FOURCC("CAS*") {
                self.library_chunks
                    .insert(key.cast_id - config.cast_lib_key_bias, key.section_id);
            } else if key.cast_id < entry_count && key.section_id < entry_count {
                self.entries[key.cast_id as usize]
                    .linked_entry_ids
                    .push(key.section_id);
            } else {
                debug!(
                    "KEY* link {} -> {} ({}) out of range",
                    key.cast_id,
                    key.section_id,
                    fourcc_to_string(key.fourcc)
                );
            }
        }
        debug!(
            "KEY*: {} links, {} cast libraries",
            key_table.entries.len(),
            self.library_chunks.len()
        );
    }

    pub fn entry(&self, id: u32) -> Option<&ChunkEntry> {
        self.entries.get(id as usize)
    }

    /// Payload of an entry with the chunk header stripped, clamped to the
    /// end of the file.
    pub fn get_entry_bytes(&self, id: u32) -> Option<&[u8]> {
        let entry = self.entry(id)?;
        let start = (entry.data_offset as usize).checked_add(CHUNK_HEADER_SIZE)?;
        if start > self.data.len() {
            return None;
        }
        let end = start
            .saturating_add(entry.data_length as usize)
            .min(self.data.len());
        Some(&self.data[start..end])
    }

    /// Like `get_entry_bytes`, but failing when the entry is unknown.
    pub fn require_entry_bytes(&self, id: u32) -> Result<&[u8], ChunkError> {
        self.get_entry_bytes(id).ok_or(ChunkError::Missing(id))
    }

    /// Reader over an entry payload in the container's byte order. Chunks
    /// that are always big endian switch it themselves.
    pub fn chunk_reader(&self, id: u32) -> Option<BinaryReader> {
        Some(endian_reader(self.get_entry_bytes(id)?, self.endian))
    }

    pub fn entries_of_type(&self, fourcc: u32) -> impl Iterator<Item = &ChunkEntry> + '_ {
        self.entries.iter().filter(move |entry| entry.fourcc == fourcc)
    }

    pub fn first_entry_of_type(&self, fourcc: u32) -> Option<&ChunkEntry> {
        self.entries_of_type(fourcc).next()
    }

    /// Tag and payload of an entry.
    pub fn get_raw_chunk(&self, id: u32) -> Option<(String, &[u8])> {
        let entry = self.entry(id)?;
        Some((entry.fourcc_str(), self.get_entry_bytes(id)?))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn read_memory_map(reader: &mut BinaryReader) -> Result<Vec<ChunkEntry>, ChunkError> {
    reader.jmp(CONTAINER_HEADER_SIZE);
    let imap = InitialMapChunk::from_reader(reader)?;
    reader.jmp(imap.mmap_offset);
    let mmap = MemoryMapChunk::from_reader(reader)?;
    debug!("mmap version {}: {} entries", mmap.version, mmap.entries.len());

    Ok(mmap
        .entries
        .iter()
        .enumerate()
        .map(|(id, entry)| ChunkEntry {
            id: id as u32,
            fourcc: entry.fourcc,
            data_offset: entry.offset,
            data_length: entry.len,
            linked_entry_ids: Vec::new(),
        })
        .collect())
}
