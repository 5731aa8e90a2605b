// Lingo decompiler enums

use num_derive::FromPrimitive;

#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive)]
pub enum ChunkExprType {
    Char = 0x01,
    Word = 0x02,
    Item = 0x03,
    Line = 0x04,
}

impl ChunkExprType {
    /// Chunk opcodes carry the chunk kind as operand; anything else reads
    /// as `char`.
    pub fn from_operand(operand: i64) -> ChunkExprType {
        num::FromPrimitive::from_i64(operand).unwrap_or(ChunkExprType::Char)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChunkExprType::Char => "char",
            ChunkExprType::Word => "word",
            ChunkExprType::Item => "item",
            ChunkExprType::Line => "line",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive)]
pub enum PutType {
    Into = 0x01,
    Before = 0x02,
    After = 0x03,
}

impl PutType {
    pub fn from_operand(operand: i64) -> PutType {
        num::FromPrimitive::from_i64(operand).unwrap_or(PutType::Into)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PutType::Into => "into",
            PutType::Before => "before",
            PutType::After => "after",
        }
    }
}
