use binary_reader::BinaryReader;
use log::{debug, warn};
use num_derive::FromPrimitive;

use crate::{
  director::lingo::script::LingoConstant,
  io::reader::{latin1_to_string, DirectorExt},
};

pub const LITERAL_RECORD_SIZE: usize = 8;

pub struct LiteralStoreRecord {
  pub literal_type: u32,
  pub value: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive)]
pub enum LiteralType {
  Null = 0,
  String = 1,
  Int = 4,
  Object = 6,
  Symbol = 8,
  Float = 9,
}

/// Reads the `(type, value)` index of an `Lscr` constant pool and resolves
/// each entry against the constants store. Values that cannot be read from
/// the store come back zero-valued instead of failing.
pub struct LiteralStore;

impl LiteralStore {
  pub fn read_all(
    reader: &mut BinaryReader,
    index_offset: usize,
    count: usize,
    store_offset: usize,
  ) -> Vec<LingoConstant> {
    let mut constants = Vec::with_capacity(count);
    for i in 0..count {
      reader.jmp(index_offset + i * LITERAL_RECORD_SIZE);
      let record = match Self::read_record(reader) {
        Ok(record) => record,
        Err(_) => {
          warn!("Lscr: constant index truncated after {} of {} entries", i, count);
          break;
        }
      };
      constants.push(Self::read_data(reader, &record, store_offset));
    }
    constants
  }

  pub fn read_record(reader: &mut BinaryReader) -> Result<LiteralStoreRecord, std::io::Error> {
    let literal_type = reader.read_u32()?;
    let value = reader.read_u32()?;
    Ok(LiteralStoreRecord { literal_type, value })
  }

  pub fn read_data(
    reader: &mut BinaryReader,
    record: &LiteralStoreRecord,
    start_offset: usize,
  ) -> LingoConstant {
    let store_pos = start_offset + record.value as usize;
    match num::FromPrimitive::from_u32(record.literal_type) {
      Some(LiteralType::Int) => LingoConstant::Int(record.value as i32),
      Some(LiteralType::Null) => LingoConstant::Null,
      Some(LiteralType::Object) => LingoConstant::Object(record.value),
      Some(LiteralType::String) => {
        LingoConstant::String(read_stored_string(reader, store_pos).unwrap_or_default())
      }
      Some(LiteralType::Symbol) => {
        LingoConstant::Symbol(read_stored_string(reader, store_pos).unwrap_or_default())
      }
      Some(LiteralType::Float) => LingoConstant::Float(read_stored_float(reader, store_pos)),
      None => {
        debug!("Lscr: unknown constant type {}", record.literal_type);
        LingoConstant::Unknown {
          kind: record.literal_type,
          raw: record.value,
        }
      }
    }
  }
}

fn read_stored_string(reader: &mut BinaryReader, store_pos: usize) -> Option<String> {
  reader.jmp(store_pos);
  let length = reader.read_u32().ok()? as usize;
  // Stored strings may claim more than the chunk holds, keep what is there.
  let length = length.min(reader.bytes_left());
  let mut raw = reader.read_bytes(length).ok()?;
  if let Some((0, rest)) = raw.split_last() {
    raw = rest;
  }
  Some(latin1_to_string(raw))
}

fn read_stored_float(reader: &mut BinaryReader, store_pos: usize) -> f64 {
  reader.jmp(store_pos);
  let Ok(length) = reader.read_u32() else {
    return 0.0;
  };
  let value = match length {
    8 => reader.read_f64(),
    10 => reader.read_apple_float_80(),
    _ => {
      warn!("Lscr: unexpected float length {} at {}", length, store_pos);
      return 0.0;
    }
  };
  value.unwrap_or(0.0)
}
