use binary_reader::{BinaryReader, Endian};
use log::{debug, warn};

use crate::io::reader::{endian_reader, DirectorExt};

const DEFAULT_NAMES_OFFSET: usize = 20;
const MAX_NAME_LEN: usize = 256;

/// Lnam: the name table every Lingo script in the movie indexes into.
#[derive(Clone, Debug, Default)]
pub struct ScriptNamesChunk {
    pub names: Vec<String>,
}

impl ScriptNamesChunk {
    /// Never fails. A truncated table returns the names read so far.
    pub fn from_bytes(bytes: &[u8]) -> ScriptNamesChunk {
        let mut reader = endian_reader(bytes, Endian::Big);
        Self::from_reader(&mut reader)
    }

    pub fn from_reader(reader: &mut BinaryReader) -> ScriptNamesChunk {
        // Lingo tables are always big endian regardless of file endianness
        reader.set_endian(Endian::Big);

        if reader.length < DEFAULT_NAMES_OFFSET {
            warn!("Lnam too small: {} bytes", reader.length);
            return ScriptNamesChunk::default();
        }

        reader.jmp(16);
        let (Ok(names_offset), Ok(names_count)) = (reader.read_u16(), reader.read_u16()) else {
            return ScriptNamesChunk::default();
        };
        let names_offset = match names_offset as usize {
            0 => DEFAULT_NAMES_OFFSET,
            offset => offset,
        };
        debug!("Lnam: names at {}, {} declared", names_offset, names_count);

        reader.jmp(names_offset);
        let mut names = Vec::with_capacity(names_count as usize);
        for i in 0..names_count as usize {
            match reader.read_pascal_string() {
                Ok(name) => names.push(sanitize_name(name, i)),
                Err(_) => {
                    warn!("Lnam: name {} of {} truncated", i, names_count);
                    break;
                }
            }
        }

        return ScriptNamesChunk { names };
    }

    /// Resolves a name index, falling back to `name_<idx>`.
    pub fn get(&self, idx: i64) -> String {
        resolve_name(&self.names, idx)
    }
}

pub fn resolve_name(names: &[String], idx: i64) -> String {
    usize::try_from(idx)
        .ok()
        .and_then(|i| names.get(i))
        .cloned()
        .unwrap_or_else(|| {
            debug!("name index {} out of range ({} names)", idx, names.len());
            format!("name_{}", idx)
        })
}

fn sanitize_name(name: String, idx: usize) -> String {
    if name.len() > MAX_NAME_LEN || name.contains('\0') {
        warn!("Lnam: name {} looks corrupt, replacing", idx);
        return format!("name_{}", idx);
    }
    name
}
