use binary_reader::{BinaryReader, Endian};
use log::{debug, warn};

use crate::{director::enums::ScriptType, io::reader::endian_reader};

const CONTEXT_HEADER_SIZE: usize = 12;
const CONTEXT_ENTRY_SIZE: usize = 12;

/// LctX: maps each script's position to the cast member that owns it.
#[derive(Clone, Debug, Default)]
pub struct ScriptContextChunk {
    pub entries: Vec<ScriptContextEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptContextEntry {
    pub id: u32,
    pub raw_type: u16,
    pub cast_id: u16,
}

impl ScriptContextEntry {
    pub fn script_type(&self) -> ScriptType {
        ScriptType::from(self.raw_type)
    }

    pub fn role(&self) -> String {
        ScriptType::role(self.raw_type)
    }
}

impl ScriptContextChunk {
    pub fn from_bytes(bytes: &[u8]) -> ScriptContextChunk {
        let mut reader = endian_reader(bytes, Endian::Big);
        Self::from_reader(&mut reader)
    }

    /// Never fails. Entries cut short by the end of the chunk are dropped.
    pub fn from_reader(reader: &mut BinaryReader) -> ScriptContextChunk {
        reader.set_endian(Endian::Big);
        if reader.length < CONTEXT_HEADER_SIZE {
            return ScriptContextChunk::default();
        }

        reader.jmp(8);
        let Ok(count) = reader.read_u32() else {
            return ScriptContextChunk::default();
        };

        let mut entries = Vec::new();
        for id in 0..count {
            match read_entry(reader, id) {
                Some(entry) => entries.push(entry),
                None => {
                    warn!("LctX declares {} entries but holds only {}", count, id);
                    break;
                }
            }
        }
        debug!("LctX: {} script contexts", entries.len());

        return ScriptContextChunk { entries };
    }
}

fn read_entry(reader: &mut BinaryReader, id: u32) -> Option<ScriptContextEntry> {
    if reader.length.saturating_sub(reader.pos) < CONTEXT_ENTRY_SIZE {
        return None;
    }
    let _unknown0 = reader.read_u32().ok()?;
    let raw_type = reader.read_u16().ok()?;
    let cast_id = reader.read_u16().ok()?;
    let _unknown1 = reader.read_u32().ok()?;
    Some(ScriptContextEntry {
        id,
        raw_type,
        cast_id,
    })
}
