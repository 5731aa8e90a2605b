use std::collections::BTreeMap;

use itertools::Itertools;
use log::debug;

use crate::{
    config::FormatConfig,
    director::{
        chunks::{
            cast::CastChunk, cast_list::CastListChunk, cast_member::CastMemberChunk,
            config::MovieConfig,
        },
        enums::{CastType, ScriptType},
        rifx::ContainerIndex,
        utils::{report, FOURCC},
    },
    error::ChunkError,
};

pub const STANDALONE_CAST_NAME: &str = "Standalone";

#[derive(Clone, Debug)]
pub struct CastMember {
    /// User visible member number.
    pub slot: u32,
    /// Entry id of the CASt chunk.
    pub file_slot: u32,
    pub cast_type: CastType,
    pub raw_cast_type: u32,
    pub name: String,
    pub fields: Vec<String>,
    pub linked_entries: Vec<u32>,
    pub specific_data: Vec<u8>,
    pub script_type: Option<ScriptType>,
}

#[derive(Clone, Debug)]
pub struct CastLibrary {
    pub id: u32,
    pub name: String,
    pub external_path: Option<String>,
    pub member_count: u32,
    /// Member number of the first CAS* slot.
    pub min_member: u32,
    /// Entry id of the CAS* slot table backing this library.
    pub chunk_id: Option<u32>,
    pub members: BTreeMap<u32, CastMember>,
}

impl CastLibrary {
    fn new(id: u32, name: String) -> CastLibrary {
        CastLibrary {
            id,
            name,
            external_path: None,
            member_count: 0,
            min_member: 1,
            chunk_id: None,
            members: BTreeMap::new(),
        }
    }

    pub fn is_external(&self) -> bool {
        self.external_path.is_some()
    }

    pub fn find_member_by_name(&self, name: &str) -> Option<&CastMember> {
        self.members
            .values()
            .find(|member| member.name.eq_ignore_ascii_case(name))
    }

    /// Members whose CASt chunk has the given entry id.
    pub fn find_member_by_file_slot(&self, file_slot: u32) -> Option<&CastMember> {
        self.members
            .values()
            .find(|member| member.file_slot == file_slot)
    }
}

/// Resolves MCsL and every library's CAS* / CASt chunks.
pub fn resolve_casts(index: &ContainerIndex, config: &FormatConfig) -> Vec<CastLibrary> {
    resolve_casts_with_diagnostics(index, config, &mut Vec::new())
}

pub fn resolve_casts_with_diagnostics(
    index: &ContainerIndex,
    config: &FormatConfig,
    diagnostics: &mut Vec<String>,
) -> Vec<CastLibrary> {
    let mut casts = read_cast_list(index, config, diagnostics);
    if casts.is_empty() {
        casts.push(standalone_cast(index));
    }

    for cast in casts.iter_mut() {
        let Some(chunk_id) = cast.chunk_id else {
            debug!("Cast {} ({}) has no CAS* chunk", cast.id, cast.name);
            continue;
        };
        populate_members(index, cast, chunk_id, diagnostics);
    }

    debug!(
        "Casts: {}",
        casts
            .iter()
            .map(|cast| format!("{} ({} members)", cast.name, cast.members.len()))
            .join(", ")
    );
    casts
}

/// Library ids are positions in MCsL. KEY* addresses a library's CAS* by
/// that position plus the bias, some writers use the stored id instead.
fn read_cast_list(
    index: &ContainerIndex,
    config: &FormatConfig,
    diagnostics: &mut Vec<String>,
) -> Vec<CastLibrary> {
    let Some(entry) = index.first_entry_of_type(FOURCC("MCsL")) else {
        return vec![];
    };
    let Some(mut reader) = index.chunk_reader(entry.id) else {
        report(diagnostics, format!("MCsL chunk {} lies outside the file", entry.id));
        return vec![];
    };
    let cast_list = match CastListChunk::from_reader(&mut reader) {
        Ok(cast_list) => cast_list,
        Err(err) => {
            report(diagnostics, format!("MCsL chunk {} unreadable: {}", entry.id, err));
            return vec![];
        }
    };

    cast_list
        .entries
        .iter()
        .enumerate()
        .map(|(position, cast_entry)| {
            let id = position as u32;
            let mut cast = CastLibrary::new(id, cast_entry.name.to_owned());
            if !cast_entry.file_path.is_empty() {
                cast.external_path = Some(cast_entry.file_path.to_owned());
            }
            cast.member_count = cast_entry.member_count();
            cast.min_member = (cast_entry.min_member as u32).max(1);
            cast.chunk_id = index.library_chunks.get(&id).copied().or_else(|| {
                cast_entry
                    .id
                    .checked_sub(config.cast_lib_key_bias)
                    .and_then(|stored_id| index.library_chunks.get(&stored_id).copied())
            });
            cast
        })
        .collect()
}

fn standalone_cast(index: &ContainerIndex) -> CastLibrary {
    let mut cast = CastLibrary::new(0, STANDALONE_CAST_NAME.to_owned());
    cast.min_member = standalone_min_member(index);
    cast.chunk_id = index
        .library_chunks
        .get(&0)
        .copied()
        .or_else(|| index.first_entry_of_type(FOURCC("CAS*")).map(|entry| entry.id));
    cast
}

/// The movie config's `min_member` numbers the first slot of a standalone
/// cast.
pub fn standalone_min_member(index: &ContainerIndex) -> u32 {
    index
        .first_entry_of_type(FOURCC("VWCF"))
        .or_else(|| index.first_entry_of_type(FOURCC("DRCF")))
        .and_then(|entry| index.get_entry_bytes(entry.id))
        .and_then(|bytes| MovieConfig::from_bytes(bytes).ok())
        .map(|config| config.min_member as u32)
        .filter(|min_member| *min_member > 0)
        .unwrap_or(1)
}

fn populate_members(
    index: &ContainerIndex,
    cast: &mut CastLibrary,
    chunk_id: u32,
    diagnostics: &mut Vec<String>,
) {
    let slot_table = match index.chunk_reader(chunk_id).map(|mut reader| CastChunk::from_reader(&mut reader)) {
        Some(Ok(slot_table)) => slot_table,
        Some(Err(err)) => {
            report(diagnostics, format!("CAS* chunk {} unreadable: {}", chunk_id, err));
            return;
        }
        None => {
            report(diagnostics, format!("CAS* chunk {} lies outside the file", chunk_id));
            return;
        }
    };
    if cast.member_count == 0 {
        cast.member_count = slot_table.member_ids.len() as u32;
    }

    for (number, file_slot) in slot_table.slots(cast.min_member) {
        match read_member(index, number, file_slot) {
            Ok(member) => {
                cast.members.insert(number, member);
            }
            Err(err) => report(
                diagnostics,
                format!("{} member {} (chunk {}) skipped: {}", cast.name, number, file_slot, err),
            ),
        }
    }
    debug!(
        "Cast {}: {} of {} slots populated",
        cast.name,
        cast.members.len(),
        slot_table.member_ids.len()
    );
}

fn read_member(index: &ContainerIndex, number: u32, file_slot: u32) -> Result<CastMember, ChunkError> {
    let entry = index.entry(file_slot).ok_or(ChunkError::Missing(file_slot))?;
    if entry.fourcc != FOURCC("CASt") {
        return Err(ChunkError::malformed(
            "CASt",
            format!("slot points at a {} chunk", entry.fourcc_str()),
        ));
    }
    let mut reader = index
        .chunk_reader(file_slot)
        .ok_or(ChunkError::Missing(file_slot))?;
    let chunk = CastMemberChunk::from_reader(&mut reader)?;

    Ok(CastMember {
        slot: number,
        file_slot,
        name: chunk.name(),
        fields: chunk
            .member_info
            .as_ref()
            .map(|info| info.fields.clone())
            .unwrap_or_default(),
        cast_type: chunk.cast_type,
        raw_cast_type: chunk.raw_cast_type,
        linked_entries: entry.linked_entry_ids.clone(),
        specific_data: chunk.specific_data_raw,
        script_type: chunk.script_type,
    })
}

/// Lookups over a resolved cast list.
pub trait CastLookup {
    fn get_member(&self, cast_name: &str, number: u32) -> Option<&CastMember>;
    fn get_member_by_name(&self, name: &str) -> Option<&CastMember>;
    fn all_members(&self) -> Vec<(&CastLibrary, &CastMember)>;
    fn find_member_by_file_slot(&self, file_slot: u32) -> Option<&CastMember>;
}

impl CastLookup for [CastLibrary] {
    fn get_member(&self, cast_name: &str, number: u32) -> Option<&CastMember> {
        self.iter()
            .find(|cast| cast.name.eq_ignore_ascii_case(cast_name))
            .and_then(|cast| cast.members.get(&number))
    }

    fn get_member_by_name(&self, name: &str) -> Option<&CastMember> {
        self.iter().find_map(|cast| cast.find_member_by_name(name))
    }

    fn all_members(&self) -> Vec<(&CastLibrary, &CastMember)> {
        self.iter()
            .flat_map(|cast| cast.members.values().map(move |member| (cast, member)))
            .collect()
    }

    fn find_member_by_file_slot(&self, file_slot: u32) -> Option<&CastMember> {
        self.iter()
            .find_map(|cast| cast.find_member_by_file_slot(file_slot))
    }
}

/// Linked chunks of a member with the given tag, e.g. its `BITD` or `snd `.
pub fn linked_entries_of_type(index: &ContainerIndex, member: &CastMember, fourcc: u32) -> Vec<u32> {
    member
        .linked_entries
        .iter()
        .copied()
        .filter(|id| index.entry(*id).is_some_and(|entry| entry.fourcc == fourcc))
        .collect()
}
