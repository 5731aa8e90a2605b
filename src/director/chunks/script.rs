use binary_reader::{BinaryReader, Endian};
use log::{debug, warn};

use crate::{
    director::{
        chunks::{
            handler::{read_name_list, HandlerRecord, HANDLER_RECORD_SIZE},
            literal::LiteralStore,
        },
        lingo::script::LingoScript,
    },
    error::ChunkError,
    io::reader::endian_reader,
};

pub const SCRIPT_HEADER_SIZE: usize = 0x5c;

struct ScriptHeader {
    script_number: u16,
    script_flags: u32,
    properties_count: usize,
    properties_offset: usize,
    globals_count: usize,
    globals_offset: usize,
    handlers_count: usize,
    handlers_offset: usize,
    literals_count: usize,
    literals_offset: usize,
    literals_data_offset: usize,
}

/// Lscr: one compiled Lingo script.
pub struct ScriptChunk;

impl ScriptChunk {
    /// Never fails. An undersized chunk decodes to an empty script and a
    /// handler that cannot be read ends the handler table.
    pub fn from_bytes(bytes: &[u8], names: &[String]) -> LingoScript {
        let mut reader = endian_reader(bytes, Endian::Big);
        Self::from_reader(&mut reader, names)
    }

    pub fn from_reader(reader: &mut BinaryReader, names: &[String]) -> LingoScript {
        // Lingo scripts are always big endian regardless of file endianness
        reader.set_endian(Endian::Big);

        if reader.length < SCRIPT_HEADER_SIZE {
            warn!("Lscr too small: {} bytes", reader.length);
            return LingoScript {
                names: names.to_vec(),
                ..Default::default()
            };
        }
        let header = match read_header(reader) {
            Ok(header) => header,
            Err(err) => {
                warn!("Lscr header unreadable: {}", err);
                return LingoScript {
                    names: names.to_vec(),
                    ..Default::default()
                };
            }
        };
        debug!(
            "Lscr #{}: flags {:#x}, {} handlers at {}, {} constants at {}",
            header.script_number,
            header.script_flags,
            header.handlers_count,
            header.handlers_offset,
            header.literals_count,
            header.literals_offset
        );

        let property_names = read_name_list(
            reader,
            header.properties_offset,
            header.properties_count,
            names,
        );
        let global_names =
            read_name_list(reader, header.globals_offset, header.globals_count, names);
        let constants = LiteralStore::read_all(
            reader,
            header.literals_offset,
            header.literals_count,
            header.literals_data_offset,
        );

        let mut handlers = Vec::with_capacity(header.handlers_count);
        for i in 0..header.handlers_count {
            reader.jmp(header.handlers_offset + i * HANDLER_RECORD_SIZE);
            let handler = HandlerRecord::read_record(reader)
                .and_then(|record| HandlerRecord::read_data(reader, &record, names));
            match handler {
                Ok(handler) => handlers.push(handler),
                Err(err) => {
                    warn!(
                        "Lscr #{}: handler {} of {} skipped: {}",
                        header.script_number, i, header.handlers_count, err
                    );
                    break;
                }
            }
        }

        LingoScript {
            script_number: header.script_number,
            script_flags: header.script_flags,
            handlers,
            constants,
            property_names,
            global_names,
            names: names.to_vec(),
        }
    }
}

fn read_header(reader: &mut BinaryReader) -> Result<ScriptHeader, ChunkError> {
    reader.jmp(0x12);
    let /* 0x12 */ script_number = reader.read_u16()?;

    reader.jmp(0x26);
    let /* 0x26 */ script_flags = reader.read_u32()?;

    reader.jmp(0x3c);
    let /* 0x3C */ properties_count = reader.read_u16()? as usize;
    let /* 0x3E */ properties_offset = reader.read_u32()? as usize;
    let /* 0x42 */ globals_count = reader.read_u16()? as usize;
    let /* 0x44 */ globals_offset = reader.read_u32()? as usize;
    let /* 0x48 */ handlers_count = reader.read_u16()? as usize;
    let /* 0x4A */ handlers_offset = reader.read_u32()? as usize;
    let /* 0x4E */ literals_count = reader.read_u16()? as usize;
    let /* 0x50 */ literals_offset = reader.read_u32()? as usize;
    let /* 0x54 */ _literals_data_count = reader.read_u32()?;
    let /* 0x58 */ literals_data_offset = reader.read_u32()? as usize;

    Ok(ScriptHeader {
        script_number,
        script_flags,
        properties_count,
        properties_offset,
        globals_count,
        globals_offset,
        handlers_count,
        handlers_offset,
        literals_count,
        literals_offset,
        literals_data_offset,
    })
}
