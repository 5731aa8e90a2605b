use std::collections::BTreeMap;
use std::path::Path;

use log::debug;

use crate::config::FormatConfig;
use crate::director::lingo::decompiler::{
    decompile_script, render_script_with_header, ScriptAnnotation, ScriptNode,
};
use crate::director::lingo::script::LingoScript;
use crate::director::utils::*;
use crate::error::DirectorError;

use super::cast::{resolve_casts_with_diagnostics, CastLibrary, CastLookup, CastMember};
use super::chunks::config::MovieConfig;
use super::chunks::info::MovieInfo;
use super::chunks::lctx::ScriptContextChunk;
use super::chunks::script::ScriptChunk;
use super::chunks::script_names::ScriptNamesChunk;
use super::enums::ScriptType;
use super::rifx::ContainerIndex;

/// One movie, read end to end: container index, casts, name and context
/// tables, and every decoded `Lscr`.
pub struct DirectorFile {
    pub file_name: String,
    pub index: ContainerIndex,
    pub config: FormatConfig,
    pub movie_config: Option<MovieConfig>,
    pub info: Option<MovieInfo>,
    pub casts: Vec<CastLibrary>,
    pub names: Vec<String>,
    pub contexts: ScriptContextChunk,
    /// Decoded scripts keyed by their `Lscr` entry id.
    pub scripts: BTreeMap<u32, LingoScript>,
    /// LctX entry id to the owning member's name and script role.
    pub script_cast_map: BTreeMap<u32, ScriptAnnotation>,
    /// Every chunk that was skipped or cut short while reading.
    pub diagnostics: Vec<String>,
}

impl DirectorFile {
    pub fn open(path: impl AsRef<Path>) -> Result<DirectorFile, DirectorError> {
        Self::open_with_config(path, FormatConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: FormatConfig) -> Result<DirectorFile, DirectorError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DirectorError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes_with_config(file_name, &bytes, config)
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Result<DirectorFile, DirectorError> {
        Self::from_bytes_with_config(file_name, bytes, FormatConfig::default())
    }

    pub fn from_bytes_with_config(
        file_name: impl Into<String>,
        bytes: &[u8],
        config: FormatConfig,
    ) -> Result<DirectorFile, DirectorError> {
        let file_name = file_name.into();
        let index = ContainerIndex::parse_with_config(bytes, &config)?;
        let mut diagnostics = Vec::new();

        let movie_config = read_movie_config(&index, &mut diagnostics);
        let info = read_movie_info(&index, &mut diagnostics);
        let casts = resolve_casts_with_diagnostics(&index, &config, &mut diagnostics);

        let names = match index.first_entry_of_type(FOURCC("Lnam")) {
            Some(entry) => index
                .get_entry_bytes(entry.id)
                .map(|bytes| ScriptNamesChunk::from_bytes(bytes).names)
                .unwrap_or_default(),
            None => {
                report(&mut diagnostics, "no Lnam chunk, names fall back to placeholders".to_owned());
                vec![]
            }
        };
        let contexts = index
            .first_entry_of_type(FOURCC("LctX"))
            .and_then(|entry| index.get_entry_bytes(entry.id))
            .map(ScriptContextChunk::from_bytes)
            .unwrap_or_default();

        let mut scripts = BTreeMap::new();
        for entry in index.entries_of_type(FOURCC("Lscr")) {
            match index.get_entry_bytes(entry.id) {
                Some(bytes) => {
                    let script = ScriptChunk::from_bytes(bytes, &names);
                    debug!("Lscr {}: {} handlers", entry.id, script.handlers.len());
                    scripts.insert(entry.id, script);
                }
                None => report(&mut diagnostics, format!("Lscr chunk {} lies outside the file", entry.id)),
            }
        }

        let script_cast_map = build_script_cast_map(&casts, &contexts);

        debug!(
            "{}: {} entries, {} casts, {} names, {} scripts, {} diagnostics",
            file_name,
            index.entries.len(),
            casts.len(),
            names.len(),
            scripts.len(),
            diagnostics.len()
        );

        Ok(DirectorFile {
            file_name,
            index,
            config,
            movie_config,
            info,
            casts,
            names,
            contexts,
            scripts,
            script_cast_map,
            diagnostics,
        })
    }

    /// Human readable Director version, e.g. 500 or 600.
    pub fn version(&self) -> Option<u16> {
        self.movie_config.as_ref().map(|config| config.human_version())
    }

    pub fn get_raw_chunk(&self, id: u32) -> Option<(String, &[u8])> {
        self.index.get_raw_chunk(id)
    }

    pub fn get_member(&self, cast_name: &str, number: u32) -> Option<&CastMember> {
        self.casts.get_member(cast_name, number)
    }

    pub fn get_member_by_name(&self, name: &str) -> Option<&CastMember> {
        self.casts.get_member_by_name(name)
    }

    pub fn get_script(&self, entry_id: u32) -> Option<&LingoScript> {
        self.scripts.get(&entry_id)
    }

    /// The cast member whose resources include the given `Lscr`.
    pub fn script_member(&self, entry_id: u32) -> Option<&CastMember> {
        self.casts
            .all_members()
            .into_iter()
            .map(|(_, member)| member)
            .find(|member| member.linked_entries.contains(&entry_id))
    }

    /// Header annotation for a script: its member's name and the role from
    /// LctX, or from the member's own script type.
    pub fn script_annotation(&self, entry_id: u32) -> Option<ScriptAnnotation> {
        let member = self.script_member(entry_id)?;
        let role = self
            .contexts
            .entries
            .iter()
            .find(|context| context.cast_id as u32 == member.slot)
            .map(|context| context.role())
            .or_else(|| {
                member
                    .script_type
                    .filter(|script_type| *script_type != ScriptType::Invalid)
                    .map(|script_type| ScriptType::role(script_type as u16))
            })?;
        Some(ScriptAnnotation {
            member_name: member_display_name(member),
            role,
        })
    }

    pub fn decompile_script(&self, entry_id: u32) -> Option<ScriptNode> {
        self.scripts
            .get(&entry_id)
            .map(|script| decompile_script(script, &self.config))
    }

    /// Rendered source of one script, with its annotation header when known.
    pub fn decompile_script_text(&self, entry_id: u32) -> Option<String> {
        let node = self.decompile_script(entry_id)?;
        Some(render_script_with_header(&node, self.script_annotation(entry_id).as_ref()))
    }

    /// Rendered source of every script that has handlers, by entry id.
    pub fn decompile_scripts(&self) -> Vec<(u32, String)> {
        self.scripts
            .iter()
            .filter(|(_, script)| !script.handlers.is_empty())
            .filter_map(|(entry_id, _)| {
                self.decompile_script_text(*entry_id)
                    .map(|text| (*entry_id, text))
            })
            .collect()
    }
}

fn member_display_name(member: &CastMember) -> String {
    if member.name.is_empty() {
        format!("cast_{}", member.slot)
    } else {
        member.name.to_owned()
    }
}

fn build_script_cast_map(casts: &[CastLibrary], contexts: &ScriptContextChunk) -> BTreeMap<u32, ScriptAnnotation> {
    let map: BTreeMap<u32, ScriptAnnotation> = contexts
        .entries
        .iter()
        .map(|context| {
            let cast_id = context.cast_id as u32;
            let member_name = casts
                .iter()
                .find_map(|cast| cast.members.get(&cast_id))
                .map(member_display_name)
                .unwrap_or_else(|| format!("cast_{}", cast_id));
            (context.id, ScriptAnnotation { member_name, role: context.role() })
        })
        .collect();
    debug!("Script to cast map: {} entries", map.len());
    map
}

fn read_movie_config(index: &ContainerIndex, diagnostics: &mut Vec<String>) -> Option<MovieConfig> {
    let entry = index
        .first_entry_of_type(FOURCC("VWCF"))
        .or_else(|| index.first_entry_of_type(FOURCC("DRCF")));
    let Some(entry) = entry else {
        report(diagnostics, "no VWCF/DRCF config chunk".to_owned());
        return None;
    };
    match index.require_entry_bytes(entry.id).and_then(MovieConfig::from_bytes) {
        Ok(config) => Some(config),
        Err(err) => {
            report(diagnostics, format!("config chunk {} unreadable: {}", entry.id, err));
            None
        }
    }
}

fn read_movie_info(index: &ContainerIndex, diagnostics: &mut Vec<String>) -> Option<MovieInfo> {
    let Some(entry) = index.first_entry_of_type(FOURCC("VWFI")) else {
        report(diagnostics, "no VWFI info chunk".to_owned());
        return None;
    };
    match index.require_entry_bytes(entry.id).and_then(MovieInfo::from_bytes) {
        Ok(info) => Some(info),
        Err(err) => {
            report(diagnostics, format!("VWFI chunk {} unreadable: {}", entry.id, err));
            None
        }
    }
}
