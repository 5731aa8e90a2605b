use binary_reader::BinaryReader;
use log::{debug, warn};

use crate::{
    director::{
        chunks::script_names::resolve_name,
        lingo::{
            opcode::OpCode,
            script::{LingoHandler, LingoInstruction},
        },
    },
    error::ChunkError,
    io::reader::DirectorExt,
};

pub const HANDLER_RECORD_SIZE: usize = 42;

#[allow(dead_code)]
pub struct HandlerRecord {
    pub name_id: i16,
    vector_pos: u16,
    pub compiled_len: usize,
    pub compiled_offset: usize,
    pub argument_count: u16,
    pub argument_offset: usize,
    pub locals_count: u16,
    pub locals_offset: usize,
}

impl HandlerRecord {
    pub fn read_record(reader: &mut BinaryReader) -> Result<HandlerRecord, ChunkError> {
        if reader.bytes_left() < HANDLER_RECORD_SIZE {
            return Err(ChunkError::malformed(
                "Lscr",
                format!("handler record at {} is cut short", reader.pos),
            ));
        }
        let /* +0x00 */ name_id = reader.read_i16()?;
        let /* +0x02 */ vector_pos = reader.read_u16()?;
        let /* +0x04 */ compiled_len = reader.read_u32()? as usize;
        let /* +0x08 */ compiled_offset = reader.read_u32()? as usize;
        let /* +0x0C */ argument_count = reader.read_u16()?;
        let /* +0x0E */ argument_offset = reader.read_u32()? as usize;
        let /* +0x12 */ locals_count = reader.read_u16()?;
        let /* +0x14 */ locals_offset = reader.read_u32()? as usize;
        // +0x18: 18 bytes of globals, line table and stack height we do not use
        reader.read_bytes(18)?;

        Ok(HandlerRecord {
            name_id,
            vector_pos,
            compiled_len,
            compiled_offset,
            argument_count,
            argument_offset,
            locals_count,
            locals_offset,
        })
    }

    pub fn read_data(
        reader: &mut BinaryReader,
        record: &HandlerRecord,
        names: &[String],
    ) -> Result<LingoHandler, ChunkError> {
        let end = record.compiled_offset.saturating_add(record.compiled_len);
        if end > reader.length {
            return Err(ChunkError::malformed(
                "Lscr",
                format!(
                    "code of {} bytes at {} overruns the chunk",
                    record.compiled_len, record.compiled_offset
                ),
            ));
        }

        let instructions = read_instructions(reader, record.compiled_offset, end);
        let arg_names = read_name_list(
            reader,
            record.argument_offset,
            record.argument_count as usize,
            names,
        );
        let local_names =
            read_name_list(reader, record.locals_offset, record.locals_count as usize, names);

        let name = match record.name_id {
            id if id >= 0 && (id as usize) < names.len() => names[id as usize].clone(),
            id => format!("handler_{}", id),
        };
        debug!(
            "handler {}: {} bytes of code at {}, {} args, {} locals",
            name,
            record.compiled_len,
            record.compiled_offset,
            arg_names.len(),
            local_names.len()
        );

        Ok(LingoHandler {
            name_id: record.name_id,
            name,
            arg_names,
            local_names,
            instructions,
        })
    }
}

/// Decodes the variable width instruction stream in `[start, end)`. An
/// instruction whose operand runs past the end of the chunk ends decoding.
pub fn read_instructions(reader: &mut BinaryReader, start: usize, end: usize) -> Vec<LingoInstruction> {
    let mut instructions = Vec::new();
    reader.jmp(start);

    while reader.pos < end {
        let pos = reader.pos - start;
        let Ok(raw_opcode) = reader.read_u8() else {
            break;
        };
        let opcode = OpCode::from_raw(raw_opcode);
        let mut float_operand = None;

        // argument can be one, two or four bytes
        let operand = match OpCode::operand_width(raw_opcode) {
            4 => match opcode {
                OpCode::PushFloat32 => reader.read_u32().map(|bits| {
                    float_operand = Some(f32::from_bits(bits));
                    bits as i64
                }),
                _ => reader.read_i32().map(|value| value as i64),
            },
            2 => match opcode {
                // treat pushint's arg as signed
                OpCode::PushInt16 | OpCode::PushInt8 => reader.read_i16().map(|value| value as i64),
                _ => reader.read_u16().map(|value| value as i64),
            },
            1 => match opcode {
                OpCode::PushInt8 => reader.read_i8().map(|value| value as i64),
                _ => reader.read_u8().map(|value| value as i64),
            },
            _ => Ok(0),
        };
        let Ok(operand) = operand else {
            warn!("instruction at {} is cut short", pos);
            break;
        };

        instructions.push(LingoInstruction {
            pos,
            raw_opcode,
            opcode,
            operand,
            float_operand,
        });
    }

    instructions
}

/// Reads `count` signed name indices. A `-1` ends the list early; a zero
/// offset or count means no list.
pub fn read_name_list(
    reader: &mut BinaryReader,
    offset: usize,
    count: usize,
    names: &[String],
) -> Vec<String> {
    if offset == 0 || count == 0 {
        return vec![];
    }
    reader.jmp(offset);
    let mut result = Vec::with_capacity(count);
    for _ in 0..count {
        let Ok(name_id) = reader.read_i16() else {
            break;
        };
        if name_id == -1 {
            break;
        }
        result.push(resolve_name(names, name_id as i64));
    }
    result
}
