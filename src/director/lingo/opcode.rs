use num_derive::{FromPrimitive, ToPrimitive};

/// Lingo dispatch opcodes. Raw opcode bytes at or above 0x80 carry a two byte
/// operand and dispatch as `raw - 0x40`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum OpCode {
    // single-byte
    Ret = 0x01,
    RetFactory = 0x02,
    PushZero = 0x03,
    Mul = 0x04,
    Add = 0x05,
    Sub = 0x06,
    Div = 0x07,
    Mod = 0x08,
    Inv = 0x09,
    JoinStr = 0x0a,
    JoinPadStr = 0x0b,
    Lt = 0x0c,
    LtEq = 0x0d,
    NtEq = 0x0e,
    Eq = 0x0f,
    Gt = 0x10,
    GtEq = 0x11,
    And = 0x12,
    Or = 0x13,
    Not = 0x14,
    ContainsStr = 0x15,
    Contains0Str = 0x16,
    GetChunk = 0x17,
    HiliteChunk = 0x18,
    OntoSpr = 0x19,
    IntoSpr = 0x1a,
    GetField = 0x1b,
    StartTell = 0x1c,
    EndTell = 0x1d,
    PushList = 0x1e,
    PushPropList = 0x1f,
    D4Translate = 0x20,
    SpriteOp = 0x21,
    GetSprProp = 0x22,

    // multi-byte
    PushInt8 = 0x41,
    PushArgListNoRet = 0x42,
    PushArgList = 0x43,
    PushCons = 0x44,
    PushSymb = 0x45,
    PushVarRef = 0x46,
    GetGlobal2 = 0x47,
    GetGlobal = 0x48,
    GetProp = 0x49,
    GetParam = 0x4a,
    GetLocal = 0x4b,
    SetGlobal2 = 0x4c,
    SetGlobal = 0x4d,
    SetProp = 0x4e,
    SetParam = 0x4f,
    SetLocal = 0x50,
    Jmp = 0x51,
    EndRepeat = 0x52,
    JmpIfZ = 0x53,
    LocalCall = 0x54,
    ExtCall = 0x55,
    ObjCallV4 = 0x56,
    Put = 0x57,
    PutChunk = 0x58,
    DeleteChunk = 0x59,
    Get = 0x5a,
    Set = 0x5b,
    GetMovieProp = 0x5c,
    SetMovieProp = 0x5d,
    GetObjProp = 0x5e,
    SetObjProp = 0x5f,
    TellCall = 0x60,
    Peek = 0x61,
    Pop = 0x62,
    TheBuiltin = 0x63,
    ObjCall = 0x64,
    PushChunkVarRef = 0x65,
    PushInt16 = 0x66,
    PushInt32 = 0x67,
    GetChainedProp = 0x68,
    PushFloat32 = 0x69,
    GetTopLevelProp = 0x6a,
    SetTopLevelProp = 0x6b,

    Unknown = 0xff,
}

impl OpCode {
    /// Folds the two-byte-operand range back onto its dispatch opcode.
    pub fn dispatch_value(raw: u8) -> u8 {
        if raw >= 0x80 { raw - 0x40 } else { raw }
    }

    pub fn from_raw(raw: u8) -> OpCode {
        num::FromPrimitive::from_u8(Self::dispatch_value(raw)).unwrap_or(OpCode::Unknown)
    }

    /// Number of operand bytes following the opcode byte.
    pub fn operand_width(raw: u8) -> usize {
        match Self::from_raw(raw) {
            OpCode::PushInt32 | OpCode::PushFloat32 => 4,
            _ if raw >= 0x80 => 2,
            _ if raw >= 0x40 => 1,
            _ => 0,
        }
    }

    pub fn is_jump(&self) -> bool {
        matches!(self, OpCode::Jmp | OpCode::JmpIfZ | OpCode::EndRepeat)
    }
}
