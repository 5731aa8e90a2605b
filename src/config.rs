use serde::Deserialize;

use crate::error::DirectorError;

/// How `jmp`, `jmpifz` and `endrepeat` operands map to a target offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JumpAddressing {
    /// Operands are distances from the jump itself. Forward jumps add the
    /// operand, `endrepeat` subtracts it.
    Relative,
    /// Operands already hold the handler-relative target offset.
    #[default]
    Absolute,
}

/// Format constants used while decoding movies and decompiling Lingo.
///
/// The defaults match Director 5 and 6 files. They can be overridden from a
/// TOML document for builds that lay things out differently:
///
/// ```toml
/// constant_stride = 8
/// variable_stride = 8
/// jump_addressing = "relative"
/// ```
///
/// Zero strides and a zero iteration factor are read as 1.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Byte size of one constant pool index entry (`pushcons` divides by it).
    pub constant_stride: u32,
    /// Divisor for local and argument slot operands.
    pub variable_stride: u32,
    /// KEY* owner ids at or above this value name a cast library.
    pub cast_lib_key_bias: u32,
    /// Nesting depth after which the decompiler stops structuring blocks.
    pub max_block_depth: usize,
    /// Per-range iteration ceiling is `(range length + 1) * this`.
    pub iteration_factor: usize,
    /// How many instructions a call looks back for its argument list.
    pub call_arg_window: usize,
    pub jump_addressing: JumpAddressing,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            constant_stride: 8,
            variable_stride: 8,
            cast_lib_key_bias: 1024,
            max_block_depth: 15,
            iteration_factor: 3,
            call_arg_window: 10,
            jump_addressing: JumpAddressing::Absolute,
        }
    }
}

impl FormatConfig {
    pub fn from_toml_str(text: &str) -> Result<FormatConfig, DirectorError> {
        Ok(toml::from_str(text)?)
    }

    pub fn constant_divisor(&self) -> i64 {
        self.constant_stride.max(1) as i64
    }

    pub fn variable_divisor(&self) -> i64 {
        self.variable_stride.max(1) as i64
    }

    pub fn iteration_ceiling(&self, range_len: usize) -> usize {
        (range_len + 1).saturating_mul(self.iteration_factor.max(1))
    }
}
