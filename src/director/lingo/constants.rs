use std::collections::HashMap;

use lazy_static::lazy_static;

use super::opcode::OpCode;

lazy_static! {
  pub static ref OPCODE_NAMES: HashMap<OpCode, &'static str> = HashMap::from([
    // single-byte
    (OpCode::Ret, "ret"),
    (OpCode::RetFactory, "retfactory"),
    (OpCode::PushZero, "pushzero"),
    (OpCode::Mul, "mul"),
    (OpCode::Add, "add"),
    (OpCode::Sub, "sub"),
    (OpCode::Div, "div"),
    (OpCode::Mod, "mod"),
    (OpCode::Inv, "inv"),
    (OpCode::JoinStr, "joinstr"),
    (OpCode::JoinPadStr, "joinpadstr"),
    (OpCode::Lt, "lt"),
    (OpCode::LtEq, "lteq"),
    (OpCode::NtEq, "nteq"),
    (OpCode::Eq, "eq"),
    (OpCode::Gt, "gt"),
    (OpCode::GtEq, "gteq"),
    (OpCode::And, "and"),
    (OpCode::Or, "or"),
    (OpCode::Not, "not"),
    (OpCode::ContainsStr, "containsstr"),
    (OpCode::Contains0Str, "contains0str"),
    (OpCode::GetChunk, "getchunk"),
    (OpCode::HiliteChunk, "hilitechunk"),
    (OpCode::OntoSpr, "ontospr"),
    (OpCode::IntoSpr, "intospr"),
    (OpCode::GetField, "getfield"),
    (OpCode::StartTell, "starttell"),
    (OpCode::EndTell, "endtell"),
    (OpCode::PushList, "pushlist"),
    (OpCode::PushPropList, "pushproplist"),
    (OpCode::D4Translate, "d4translate"),
    (OpCode::SpriteOp, "spriteop"),
    (OpCode::GetSprProp, "getsprprop"),

    // multi-byte
    (OpCode::PushInt8, "pushint8"),
    (OpCode::PushArgListNoRet, "pusharglistnoret"),
    (OpCode::PushArgList, "pusharglist"),
    (OpCode::PushCons, "pushcons"),
    (OpCode::PushSymb, "pushsymb"),
    (OpCode::PushVarRef, "pushvarref"),
    (OpCode::GetGlobal2, "getglobal2"),
    (OpCode::GetGlobal, "getglobal"),
    (OpCode::GetProp, "getprop"),
    (OpCode::GetParam, "getparam"),
    (OpCode::GetLocal, "getlocal"),
    (OpCode::SetGlobal2, "setglobal2"),
    (OpCode::SetGlobal, "setglobal"),
    (OpCode::SetProp, "setprop"),
    (OpCode::SetParam, "setparam"),
    (OpCode::SetLocal, "setlocal"),
    (OpCode::Jmp, "jmp"),
    (OpCode::EndRepeat, "endrepeat"),
    (OpCode::JmpIfZ, "jmpifz"),
    (OpCode::LocalCall, "localcall"),
    (OpCode::ExtCall, "extcall"),
    (OpCode::ObjCallV4, "objcallv4"),
    (OpCode::Put, "put"),
    (OpCode::PutChunk, "putchunk"),
    (OpCode::DeleteChunk, "deletechunk"),
    (OpCode::Get, "get"),
    (OpCode::Set, "set"),
    (OpCode::GetMovieProp, "getmovieprop"),
    (OpCode::SetMovieProp, "setmovieprop"),
    (OpCode::GetObjProp, "getobjprop"),
    (OpCode::SetObjProp, "setobjprop"),
    (OpCode::TellCall, "tellcall"),
    (OpCode::Peek, "peek"),
    (OpCode::Pop, "pop"),
    (OpCode::TheBuiltin, "thebuiltin"),
    (OpCode::ObjCall, "objcall"),
    (OpCode::PushChunkVarRef, "pushchunkvarref"),
    (OpCode::PushInt16, "pushint16"),
    (OpCode::PushInt32, "pushint32"),
    (OpCode::GetChainedProp, "getchainedprop"),
    (OpCode::PushFloat32, "pushfloat32"),
    (OpCode::GetTopLevelProp, "gettoplevelprop"),
    (OpCode::SetTopLevelProp, "settoplevelprop"),
  ]);

  pub static ref SPRITE_PROP_NAMES: HashMap<u16, &'static str> = HashMap::from([
    (0x01, "type"),
    (0x02, "backColor"),
    (0x03, "bottom"),
    (0x04, "castNum"),
    (0x05, "constraint"),
    (0x06, "cursor"),
    (0x07, "foreColor"),
    (0x08, "height"),
    (0x09, "immediate"),
    (0x0a, "ink"),
    (0x0b, "left"),
    (0x0c, "lineSize"),
    (0x0d, "locH"),
    (0x0e, "locV"),
    (0x0f, "moveableSprite"),
    (0x10, "pattern"),
    (0x11, "puppet"),
    (0x12, "right"),
    (0x13, "scriptNum"),
    (0x14, "stretch"),
    (0x15, "top"),
    (0x16, "trails"),
    (0x17, "visible"),
    (0x18, "width"),
    (0x19, "blend"),
    (0x1a, "scriptInstanceList"),
    (0x1b, "loc"),
    (0x1c, "rect"),
    (0x1d, "member"),
  ]);
}

pub fn get_opcode_name(opcode: &OpCode) -> &'static str {
  OPCODE_NAMES.get(opcode).copied().unwrap_or("unknown")
}

pub fn get_sprite_prop_name(prop: u16) -> String {
  SPRITE_PROP_NAMES
    .get(&prop)
    .map(|name| name.to_string())
    .unwrap_or_else(|| format!("sprProp_{}", prop))
}
