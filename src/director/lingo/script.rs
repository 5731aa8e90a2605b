use itertools::Itertools;

use crate::{config::JumpAddressing, director::chunks::script_names::resolve_name};

use super::{constants::get_opcode_name, opcode::OpCode};

/// One decoded `Lscr` chunk.
#[derive(Clone, Debug, Default)]
pub struct LingoScript {
    pub script_number: u16,
    pub script_flags: u32,
    pub handlers: Vec<LingoHandler>,
    pub constants: Vec<LingoConstant>,
    pub property_names: Vec<String>,
    pub global_names: Vec<String>,
    /// The movie's Lnam table, shared by every script.
    pub names: Vec<String>,
}

impl LingoScript {
    pub fn name(&self, idx: i64) -> String {
        resolve_name(&self.names, idx)
    }

    pub fn handler_by_name(&self, name: &str) -> Option<&LingoHandler> {
        self.handlers.iter().find(|handler| handler.name == name)
    }

    /// Listing of every handler, separated by blank lines.
    pub fn disassemble(&self, jumps: JumpAddressing) -> String {
        self.handlers
            .iter()
            .map(|handler| handler.disassemble(jumps))
            .join("\n")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LingoConstant {
    Null,
    String(String),
    Int(i32),
    Float(f64),
    Symbol(String),
    Object(u32),
    Unknown { kind: u32, raw: u32 },
}

impl LingoConstant {
    pub fn kind_name(&self) -> &'static str {
        match self {
            LingoConstant::Null => "null",
            LingoConstant::String(_) => "string",
            LingoConstant::Int(_) => "int",
            LingoConstant::Float(_) => "float",
            LingoConstant::Symbol(_) => "symbol",
            LingoConstant::Object(_) => "object",
            LingoConstant::Unknown { .. } => "unknown",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LingoHandler {
    pub name_id: i16,
    pub name: String,
    pub arg_names: Vec<String>,
    pub local_names: Vec<String>,
    pub instructions: Vec<LingoInstruction>,
}

impl LingoHandler {
    pub fn disassemble(&self, jumps: JumpAddressing) -> String {
        let mut text = format!("on {}", self.name);
        if !self.arg_names.is_empty() {
            text.push(' ');
            text.push_str(&self.arg_names.join(", "));
        }
        text.push('\n');
        for instruction in &self.instructions {
            text.push_str("  ");
            text.push_str(&instruction.to_bytecode_text(jumps));
            text.push('\n');
        }
        text.push_str("end\n");
        text
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LingoInstruction {
    /// Byte offset from the start of the handler's code.
    pub pos: usize,
    pub raw_opcode: u8,
    pub opcode: OpCode,
    pub operand: i64,
    pub float_operand: Option<f32>,
}

impl LingoInstruction {
    pub fn pos_to_str(pos: usize) -> String {
        format_args!("[{}]", pos).to_string()
    }

    /// Byte offset a jump lands on, or `None` for non-jumps and targets
    /// before the start of the handler.
    pub fn jump_target(&self, jumps: JumpAddressing) -> Option<usize> {
        let operand = usize::try_from(self.operand).ok()?;
        match (self.opcode, jumps) {
            (OpCode::Jmp | OpCode::JmpIfZ | OpCode::EndRepeat, JumpAddressing::Absolute) => {
                Some(operand)
            }
            (OpCode::Jmp | OpCode::JmpIfZ, JumpAddressing::Relative) => {
                self.pos.checked_add(operand)
            }
            (OpCode::EndRepeat, JumpAddressing::Relative) => self.pos.checked_sub(operand),
            _ => None,
        }
    }

    pub fn to_bytecode_text(&self, jumps: JumpAddressing) -> String {
        let mut writer = String::new();
        writer.push_str(&Self::pos_to_str(self.pos));
        writer.push(' ');
        match self.opcode {
            OpCode::Unknown => writer.push_str(&format!("unk_{:02x}", self.raw_opcode)),
            opcode => writer.push_str(get_opcode_name(&opcode)),
        }
        match self.opcode {
            OpCode::Jmp | OpCode::JmpIfZ | OpCode::EndRepeat => {
                writer.push(' ');
                match self.jump_target(jumps) {
                    Some(target) => writer.push_str(&Self::pos_to_str(target)),
                    None => writer.push_str(&self.operand.to_string()),
                }
            }
            OpCode::PushFloat32 => {
                writer.push(' ');
                let value = self
                    .float_operand
                    .unwrap_or_else(|| f32::from_bits(self.operand as u32));
                writer.push_str(&value.to_string());
            }
            _ => {
                if OpCode::operand_width(self.raw_opcode) > 0 {
                    writer.push(' ');
                    writer.push_str(&self.operand.to_string());
                }
            }
        }
        writer
    }
}
