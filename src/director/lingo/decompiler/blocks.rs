// Control-flow block discovery over a handler's instruction stream

use fxhash::FxHashMap;
use log::debug;

use crate::config::JumpAddressing;
use crate::director::lingo::opcode::OpCode;
use crate::director::lingo::script::LingoInstruction;

/// An `if` introduced by the `jmpifz` at `cond_idx`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IfBlock {
    pub cond_idx: usize,
    /// First instruction of the else branch, or the end when there is none.
    pub else_idx: usize,
    /// First instruction after the whole construct.
    pub end_idx: usize,
    pub has_else: bool,
}

/// A `repeat while` closed by the `endrepeat` at `end_repeat_idx`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopBlock {
    /// Where `endrepeat` jumps back to, the start of the condition.
    pub header_idx: usize,
    /// The `jmpifz` testing the loop condition.
    pub cond_idx: usize,
    pub body_start: usize,
    pub end_repeat_idx: usize,
}

impl LoopBlock {
    /// Index a `jmp` lands on when it leaves the loop.
    pub fn exit_idx(&self) -> usize {
        self.end_repeat_idx + 1
    }

    pub fn contains(&self, idx: usize) -> bool {
        idx > self.cond_idx && idx < self.end_repeat_idx
    }
}

#[derive(Clone, Debug, Default)]
pub struct BlockMap {
    pub offset_to_index: FxHashMap<usize, usize>,
    /// Keyed by the `jmpifz` index.
    pub if_blocks: FxHashMap<usize, IfBlock>,
    /// Keyed by the condition `jmpifz` index.
    pub loops: FxHashMap<usize, LoopBlock>,
}

impl BlockMap {
    /// Instruction index a jump lands on. `None` when the target is not the
    /// start of an instruction.
    pub fn target_index(&self, instr: &LingoInstruction, jumps: JumpAddressing) -> Option<usize> {
        instr
            .jump_target(jumps)
            .and_then(|target| self.offset_to_index.get(&target).copied())
    }

    /// Innermost loop whose body holds `idx`.
    pub fn innermost_loop(&self, idx: usize) -> Option<&LoopBlock> {
        self.loops
            .values()
            .filter(|lp| lp.contains(idx))
            .max_by_key(|lp| lp.cond_idx)
    }
}

pub fn find_blocks(instrs: &[LingoInstruction], jumps: JumpAddressing) -> BlockMap {
    let mut blocks = BlockMap {
        offset_to_index: instrs
            .iter()
            .enumerate()
            .map(|(i, instr)| (instr.pos, i))
            .collect(),
        ..Default::default()
    };

    find_loops(instrs, jumps, &mut blocks);
    find_ifs(instrs, jumps, &mut blocks);

    debug!(
        "Found {} if blocks and {} loops in {} instructions",
        blocks.if_blocks.len(),
        blocks.loops.len(),
        instrs.len()
    );
    blocks
}

fn find_loops(instrs: &[LingoInstruction], jumps: JumpAddressing, blocks: &mut BlockMap) {
    for (i, instr) in instrs.iter().enumerate() {
        if instr.opcode != OpCode::EndRepeat {
            continue;
        }
        let Some(header_idx) = blocks.target_index(instr, jumps) else {
            debug!("endrepeat at {} has no resolvable header", instr.pos);
            continue;
        };
        if header_idx >= i {
            continue;
        }
        let Some(cond_idx) = (header_idx..i).find(|&k| instrs[k].opcode == OpCode::JmpIfZ) else {
            debug!("endrepeat at {} has no loop condition", instr.pos);
            continue;
        };
        blocks.loops.entry(cond_idx).or_insert(LoopBlock {
            header_idx,
            cond_idx,
            body_start: cond_idx + 1,
            end_repeat_idx: i,
        });
    }
}

fn find_ifs(instrs: &[LingoInstruction], jumps: JumpAddressing, blocks: &mut BlockMap) {
    let len = instrs.len();
    for (i, instr) in instrs.iter().enumerate() {
        if instr.opcode != OpCode::JmpIfZ || blocks.loops.contains_key(&i) {
            continue;
        }
        let Some(target) = instr.jump_target(jumps) else {
            continue;
        };
        if target <= instr.pos {
            // Backward conditional jumps stay unstructured.
            continue;
        }
        let else_idx = blocks.offset_to_index.get(&target).copied().unwrap_or(len);
        if else_idx <= i {
            continue;
        }

        let mut block = IfBlock {
            cond_idx: i,
            else_idx,
            end_idx: else_idx,
            has_else: false,
        };

        let jmp_idx = else_idx - 1;
        if jmp_idx > i && instrs[jmp_idx].opcode == OpCode::Jmp {
            let jmp = &instrs[jmp_idx];
            let real_end = match jmp.jump_target(jumps) {
                Some(target) => blocks.offset_to_index.get(&target).copied().unwrap_or(len),
                None => 0,
            };
            let exits_loop = blocks
                .innermost_loop(jmp_idx)
                .is_some_and(|lp| real_end == lp.exit_idx());
            if real_end > else_idx && !exits_loop {
                block.has_else = true;
                block.end_idx = real_end;
            }
        }
        blocks.if_blocks.insert(i, block);
    }
}
