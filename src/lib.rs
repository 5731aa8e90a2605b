//! Reader for Director 5/6 RIFX/XFIR movies and decompiler for the Lingo
//! bytecode they carry.

pub mod config;
pub mod director;
pub mod error;
pub mod io;

pub use config::{FormatConfig, JumpAddressing};
pub use director::cast::{resolve_casts, CastLibrary, CastLookup, CastMember};
pub use director::file::DirectorFile;
pub use director::lingo::decompiler::{decompile_script, render_script_with_header, ScriptNode};
pub use director::rifx::{ChunkEntry, ContainerIndex};
pub use error::{ChunkError, DecompileError, DirectorError};
