// Lingo bytecode decompiler - core handler logic

use log::{debug, warn};

use crate::config::FormatConfig;
use crate::director::lingo::constants::get_sprite_prop_name;
use crate::director::lingo::opcode::OpCode;
use crate::director::lingo::script::{LingoConstant, LingoHandler, LingoInstruction, LingoScript};
use crate::error::DecompileError;
use super::ast::*;
use super::blocks::{find_blocks, BlockMap, LoopBlock};
use super::enums::{ChunkExprType, PutType};

/// Decompiler state for one handler
struct DecompilerState<'a> {
    handler: &'a LingoHandler,
    script: &'a LingoScript,
    config: &'a FormatConfig,
    blocks: BlockMap,
    /// Loops enclosing the range being decompiled, innermost last.
    loop_stack: Vec<LoopBlock>,
    /// Globals referenced so far, in order of first use.
    globals: Vec<String>,
}

impl<'a> DecompilerState<'a> {
    fn new(handler: &'a LingoHandler, script: &'a LingoScript, config: &'a FormatConfig) -> Self {
        Self {
            handler,
            script,
            config,
            blocks: find_blocks(&handler.instructions, config.jump_addressing),
            loop_stack: Vec::new(),
            globals: Vec::new(),
        }
    }

    fn instrs(&self) -> &'a [LingoInstruction] {
        &self.handler.instructions
    }

    fn get_name(&self, id: i64) -> String {
        self.script.name(id)
    }

    fn get_local_name(&self, operand: i64) -> String {
        let index = operand / self.config.variable_divisor();
        usize::try_from(index)
            .ok()
            .and_then(|index| self.handler.local_names.get(index))
            .cloned()
            .unwrap_or_else(|| format!("local_{}", index))
    }

    fn get_argument_name(&self, operand: i64) -> String {
        let index = operand / self.config.variable_divisor();
        usize::try_from(index)
            .ok()
            .and_then(|index| self.handler.arg_names.get(index))
            .cloned()
            .unwrap_or_else(|| format!("param_{}", index))
    }

    fn get_handler_name(&self, id: i64) -> String {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.script.handlers.get(index))
            .map(|handler| handler.name.to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("handler_{}", id))
    }

    fn get_constant(&self, operand: i64) -> AstNode {
        let index = operand / self.config.constant_divisor();
        let constant = usize::try_from(index)
            .ok()
            .and_then(|index| self.script.constants.get(index));
        let datum = match constant {
            Some(LingoConstant::Null) => Datum::Void,
            Some(LingoConstant::String(value)) => Datum::String(value.to_owned()),
            Some(LingoConstant::Int(value)) => Datum::Int(*value),
            Some(LingoConstant::Float(value)) => Datum::Float(*value),
            Some(LingoConstant::Symbol(name)) => Datum::Symbol(name.to_owned()),
            Some(LingoConstant::Object(value)) => Datum::Int(*value as i32),
            Some(LingoConstant::Unknown { .. }) => Datum::Int(0),
            None => {
                debug!("Constant {} out of range ({} entries)", index, self.script.constants.len());
                Datum::Int(0)
            }
        };
        AstNode::Literal(datum)
    }

    fn global_ref(&mut self, name: String) -> AstNode {
        if !self.globals.contains(&name) {
            self.globals.push(name.to_owned());
        }
        AstNode::GlobalRef(name)
    }

    /// Instruction index a jump lands on. Targets past the last
    /// instruction map to the end of the handler.
    fn jump_index(&self, instr: &LingoInstruction) -> Option<usize> {
        let target = instr.jump_target(self.config.jump_addressing)?;
        if let Some(index) = self.blocks.offset_to_index.get(&target) {
            return Some(*index);
        }
        let last_pos = self.instrs().last().map(|last| last.pos)?;
        (target > last_pos).then_some(self.instrs().len())
    }

    /// Argument count of the call at `index` and whether it is a bare
    /// statement, from the nearest preceding arglist marker.
    fn peek_arg_list(&self, index: usize) -> (usize, bool) {
        let window_start = index.saturating_sub(self.config.call_arg_window);
        self.instrs()[window_start..index]
            .iter()
            .rev()
            .find_map(|instr| match instr.opcode {
                OpCode::PushArgList => Some((instr.operand.max(0) as usize, false)),
                OpCode::PushArgListNoRet => Some((instr.operand.max(0) as usize, true)),
                _ => None,
            })
            .unwrap_or((0, true))
    }

    fn comment_for(&self, instr: &LingoInstruction) -> AstNode {
        AstNode::Comment(instr.to_bytecode_text(self.config.jump_addressing))
    }

    /// Decompiles `[start, end)` into statements, recovering blocks found by
    /// the discovery pass.
    fn decompile_range(&mut self, start: usize, end: usize, depth: usize) -> Vec<AstNode> {
        if depth > self.config.max_block_depth {
            debug!("Block depth {} exceeded, decompiling [{}, {}) linearly", depth, start, end);
            return self.decompile_range_linear(start, end);
        }

        let instrs = self.instrs();
        let mut stack = Vec::new();
        let mut stmts = Vec::new();
        let max_iterations = self.config.iteration_ceiling(end.saturating_sub(start));
        let mut iterations = 0;
        let mut i = start;

        while i < end {
            iterations += 1;
            if iterations > max_iterations {
                warn!(
                    "Handler {}: iteration ceiling hit at instruction {} in [{}, {})",
                    self.handler.name, i, start, end
                );
                break;
            }
            let instr = &instrs[i];

            if let Some(lp) = self.blocks.loops.get(&i).copied() {
                if lp.end_repeat_idx >= end {
                    self.unstructure(i, lp.exit_idx(), end, &mut stack, &mut stmts);
                    break;
                }
                let condition = pop(&mut stack);
                self.loop_stack.push(lp);
                let block = self.decompile_range(lp.body_start, lp.end_repeat_idx, depth + 1);
                self.loop_stack.pop();
                stmts.push(AstNode::RepeatWhile {
                    condition: Box::new(condition),
                    block,
                });
                i = lp.exit_idx();
                continue;
            }

            if let Some(block) = self.blocks.if_blocks.get(&i).copied() {
                if block.end_idx > end {
                    self.unstructure(i, block.end_idx, end, &mut stack, &mut stmts);
                    break;
                }
                let condition = pop(&mut stack);
                let then_end = if block.has_else { block.else_idx - 1 } else { block.else_idx };
                let block1 = self.decompile_range(i + 1, then_end, depth + 1);
                let block2 = if block.has_else {
                    self.decompile_range(block.else_idx, block.end_idx, depth + 1)
                } else {
                    vec![]
                };
                stmts.push(AstNode::If {
                    condition: Box::new(condition),
                    block1,
                    block2,
                });
                i = block.end_idx;
                continue;
            }

            match instr.opcode {
                OpCode::Jmp => {
                    let target = self.jump_index(instr);
                    let stmt = match (self.loop_stack.last(), target) {
                        (Some(lp), Some(target)) if target == lp.exit_idx() => AstNode::ExitRepeat,
                        (Some(lp), Some(target)) if target == lp.header_idx => AstNode::NextRepeat,
                        _ => self.comment_for(instr),
                    };
                    stmts.push(stmt);
                    i += 1;
                }
                OpCode::StartTell => {
                    let window = pop(&mut stack);
                    match find_end_tell(instrs, i + 1, end) {
                        Some(end_tell) => {
                            let block = self.decompile_range(i + 1, end_tell, depth + 1);
                            stmts.push(AstNode::Tell { window: Box::new(window), block });
                            i = end_tell + 1;
                        }
                        None => {
                            stmts.push(AstNode::Tell { window: Box::new(window), block: vec![] });
                            i += 1;
                        }
                    }
                }
                _ => {
                    self.translate_bytecode(i, &mut stack, &mut stmts);
                    i += 1;
                }
            }
        }

        stmts
    }

    /// Block at `index` reaches `block_end`, past `range_end`. The rest of
    /// the range is translated linearly onto the statements gathered so far.
    fn unstructure(
        &mut self,
        index: usize,
        block_end: usize,
        range_end: usize,
        stack: &mut Vec<AstNode>,
        stmts: &mut Vec<AstNode>,
    ) {
        let err = DecompileError::BlockOutOfRange {
            index,
            end: block_end,
            range_end,
        };
        warn!("Handler {}: {}, continuing unstructured", self.handler.name, err);
        for i in index..range_end.min(self.instrs().len()) {
            self.translate_bytecode(i, stack, stmts);
        }
    }

    /// Straight-line pass with no block recovery. Always terminates.
    fn decompile_range_linear(&mut self, start: usize, end: usize) -> Vec<AstNode> {
        let mut stack = Vec::new();
        let mut stmts = Vec::new();
        for i in start..end.min(self.instrs().len()) {
            self.translate_bytecode(i, &mut stack, &mut stmts);
        }
        stmts
    }

    fn translate_bytecode(&mut self, index: usize, stack: &mut Vec<AstNode>, stmts: &mut Vec<AstNode>) {
        let instr = &self.instrs()[index];
        let operand = instr.operand;

        match instr.opcode {
            OpCode::Ret | OpCode::RetFactory => {
                if !stack.is_empty() {
                    stmts.push(AstNode::Return(Some(Box::new(pop(stack)))));
                }
            }
            OpCode::PushZero => {
                stack.push(AstNode::Literal(Datum::Int(0)));
            }
            OpCode::Mul | OpCode::Add | OpCode::Sub | OpCode::Div | OpCode::Mod |
            OpCode::JoinStr | OpCode::JoinPadStr |
            OpCode::Lt | OpCode::LtEq | OpCode::NtEq | OpCode::Eq | OpCode::Gt | OpCode::GtEq |
            OpCode::And | OpCode::Or | OpCode::ContainsStr | OpCode::Contains0Str |
            OpCode::OntoSpr | OpCode::IntoSpr => {
                let right = pop(stack);
                let left = pop(stack);
                stack.push(AstNode::BinaryOp {
                    opcode: instr.opcode,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }
            OpCode::Inv | OpCode::Not => {
                let operand = pop(stack);
                stack.push(AstNode::UnaryOp {
                    opcode: instr.opcode,
                    operand: Box::new(operand),
                });
            }
            OpCode::GetChunk | OpCode::PushChunkVarRef => {
                let chunk = read_chunk_ref(operand, stack);
                stack.push(chunk);
            }
            OpCode::HiliteChunk => {
                let chunk = read_chunk_ref(operand, stack);
                stmts.push(call_stmt("hilite", vec![chunk]));
            }
            OpCode::DeleteChunk => {
                let chunk = read_chunk_ref(operand, stack);
                stmts.push(call_stmt("delete", vec![chunk]));
            }
            OpCode::PutChunk => {
                let chunk = read_chunk_ref(operand, stack);
                let value = pop(stack);
                stmts.push(AstNode::Put {
                    put_type: PutType::Into,
                    variable: Box::new(chunk),
                    value: Box::new(value),
                });
            }
            OpCode::GetField => {
                let field_id = pop(stack);
                stack.push(AstNode::Call { name: "field".to_owned(), args: vec![field_id] });
            }
            OpCode::StartTell => {
                let window = pop(stack);
                stmts.push(AstNode::Tell { window: Box::new(window), block: vec![] });
            }
            OpCode::EndTell | OpCode::PushArgList | OpCode::PushArgListNoRet => {}
            OpCode::PushList => {
                let (count, _) = self.peek_arg_list(index);
                let items = pop_n(stack, count);
                stack.push(AstNode::Literal(Datum::List(items)));
            }
            OpCode::PushPropList => {
                let (count, _) = self.peek_arg_list(index);
                let items = pop_n(stack, count - count % 2);
                let mut pairs = Vec::with_capacity(items.len() / 2);
                let mut items = items.into_iter();
                while let (Some(key), Some(value)) = (items.next(), items.next()) {
                    pairs.push((key, value));
                }
                stack.push(AstNode::Literal(Datum::PropList(pairs)));
            }
            OpCode::D4Translate => {
                warn!("Untranslated D4 opcode at {} in {}", instr.pos, self.handler.name);
            }
            OpCode::SpriteOp => {
                let sprite = pop(stack);
                stmts.push(call_stmt("spriteOp", vec![sprite]));
            }
            OpCode::GetSprProp => {
                let sprite_id = pop(stack);
                stack.push(AstNode::SpriteProp {
                    sprite_id: Box::new(sprite_id),
                    prop: get_sprite_prop_name(operand as u16),
                });
            }
            OpCode::PushInt8 | OpCode::PushInt16 | OpCode::PushInt32 => {
                stack.push(AstNode::Literal(Datum::Int(operand as i32)));
            }
            OpCode::PushFloat32 => {
                let value = instr
                    .float_operand
                    .unwrap_or_else(|| f32::from_bits(operand as u32));
                stack.push(AstNode::Literal(Datum::Float(value as f64)));
            }
            OpCode::PushCons => {
                stack.push(self.get_constant(operand));
            }
            OpCode::PushSymb => {
                stack.push(AstNode::Literal(Datum::Symbol(self.get_name(operand))));
            }
            OpCode::PushVarRef | OpCode::Get => {
                stack.push(AstNode::Var(self.get_name(operand)));
            }
            OpCode::GetGlobal | OpCode::GetGlobal2 => {
                let node = self.global_ref(self.get_name(operand));
                stack.push(node);
            }
            OpCode::GetProp => {
                stack.push(AstNode::PropertyRef(self.get_name(operand)));
            }
            OpCode::GetParam => {
                stack.push(AstNode::Var(self.get_argument_name(operand)));
            }
            OpCode::GetLocal => {
                stack.push(AstNode::Var(self.get_local_name(operand)));
            }
            OpCode::SetGlobal | OpCode::SetGlobal2 => {
                let value = pop(stack);
                let variable = self.global_ref(self.get_name(operand));
                stmts.push(assignment(variable, value));
            }
            OpCode::SetProp => {
                let value = pop(stack);
                stmts.push(assignment(AstNode::PropertyRef(self.get_name(operand)), value));
            }
            OpCode::SetParam => {
                let value = pop(stack);
                stmts.push(assignment(AstNode::Var(self.get_argument_name(operand)), value));
            }
            OpCode::SetLocal => {
                let value = pop(stack);
                stmts.push(assignment(AstNode::Var(self.get_local_name(operand)), value));
            }
            OpCode::Set => {
                let value = pop(stack);
                stmts.push(assignment(AstNode::Var(self.get_name(operand)), value));
            }
            OpCode::Jmp | OpCode::EndRepeat => {
                stmts.push(self.comment_for(instr));
            }
            OpCode::JmpIfZ => {
                let condition = pop(stack);
                stmts.push(AstNode::Comment(format!(
                    "{} ({})",
                    instr.to_bytecode_text(self.config.jump_addressing),
                    condition.to_lingo()
                )));
            }
            OpCode::LocalCall => {
                let name = self.get_handler_name(operand);
                self.translate_call(index, AstNode::Call { name, args: vec![] }, stack, stmts);
            }
            OpCode::ExtCall | OpCode::TellCall => {
                let name = self.get_name(operand);
                self.translate_call(index, AstNode::Call { name, args: vec![] }, stack, stmts);
            }
            OpCode::ObjCall | OpCode::ObjCallV4 => {
                let name = self.get_name(operand);
                let (count, no_ret) = self.peek_arg_list(index);
                let mut args = pop_n(stack, count);
                let call = if args.is_empty() {
                    AstNode::Call { name, args }
                } else {
                    let obj = args.remove(0);
                    AstNode::MethodCall { obj: Box::new(obj), name, args }
                };
                push_call(call, no_ret, stack, stmts);
            }
            OpCode::Put => {
                let variable = pop(stack);
                let value = pop(stack);
                stmts.push(AstNode::Put {
                    put_type: PutType::from_operand(operand),
                    variable: Box::new(variable),
                    value: Box::new(value),
                });
            }
            OpCode::TheBuiltin | OpCode::GetMovieProp | OpCode::GetTopLevelProp => {
                stack.push(AstNode::The(self.get_name(operand)));
            }
            OpCode::SetMovieProp | OpCode::SetTopLevelProp => {
                let value = pop(stack);
                stmts.push(assignment(AstNode::The(self.get_name(operand)), value));
            }
            OpCode::GetObjProp | OpCode::GetChainedProp => {
                let obj = pop(stack);
                stack.push(AstNode::ObjProp { obj: Box::new(obj), prop: self.get_name(operand) });
            }
            OpCode::SetObjProp => {
                let value = pop(stack);
                let obj = pop(stack);
                let prop = AstNode::ObjProp { obj: Box::new(obj), prop: self.get_name(operand) };
                stmts.push(assignment(prop, value));
            }
            OpCode::Peek => {
                let offset = operand.max(0) as usize;
                let node = stack
                    .len()
                    .checked_sub(offset + 1)
                    .and_then(|index| stack.get(index))
                    .cloned()
                    .unwrap_or(AstNode::Error);
                stack.push(node);
            }
            OpCode::Pop => {
                for _ in 0..operand.max(1) {
                    let Some(node) = stack.pop() else {
                        break;
                    };
                    if node.is_call() {
                        stmts.push(AstNode::CallStmt(Box::new(node)));
                    }
                }
            }
            OpCode::Unknown => {
                debug!(
                    "Unknown opcode 0x{:02x} at {} in {}",
                    instr.raw_opcode, instr.pos, self.handler.name
                );
            }
        }
    }

    fn translate_call(&self, index: usize, call: AstNode, stack: &mut Vec<AstNode>, stmts: &mut Vec<AstNode>) {
        let (count, no_ret) = self.peek_arg_list(index);
        let call = match call {
            AstNode::Call { name, .. } => AstNode::Call { name, args: pop_n(stack, count) },
            other => other,
        };
        push_call(call, no_ret, stack, stmts);
    }
}

fn pop(stack: &mut Vec<AstNode>) -> AstNode {
    stack.pop().unwrap_or(AstNode::Error)
}

/// Pops `count` nodes, returned in push order.
fn pop_n(stack: &mut Vec<AstNode>, count: usize) -> Vec<AstNode> {
    let mut items: Vec<AstNode> = (0..count).map(|_| pop(stack)).collect();
    items.reverse();
    items
}

fn push_call(call: AstNode, no_ret: bool, stack: &mut Vec<AstNode>, stmts: &mut Vec<AstNode>) {
    if no_ret {
        stmts.push(AstNode::CallStmt(Box::new(call)));
    } else {
        stack.push(call);
    }
}

fn call_stmt(name: &str, args: Vec<AstNode>) -> AstNode {
    AstNode::CallStmt(Box::new(AstNode::Call { name: name.to_owned(), args }))
}

fn assignment(variable: AstNode, value: AstNode) -> AstNode {
    AstNode::Assignment {
        variable: Box::new(variable),
        value: Box::new(value),
    }
}

fn is_zero(node: &AstNode) -> bool {
    matches!(node, AstNode::Literal(Datum::Int(0)))
}

/// Pops `first`, `last` and the source string of a chunk expression.
fn read_chunk_ref(chunk_type: i64, stack: &mut Vec<AstNode>) -> AstNode {
    let string = pop(stack);
    let last = pop(stack);
    let first = pop(stack);
    let last = if is_zero(&last) || last == first { None } else { Some(Box::new(last)) };
    AstNode::ChunkExpr {
        chunk_type: ChunkExprType::from_operand(chunk_type),
        first: Box::new(first),
        last,
        string: Box::new(string),
    }
}

/// Matching `endtell` for a `starttell`, honoring nested tells.
fn find_end_tell(instrs: &[LingoInstruction], start: usize, end: usize) -> Option<usize> {
    let mut nesting = 0;
    for (i, instr) in instrs.iter().enumerate().take(end).skip(start) {
        match instr.opcode {
            OpCode::StartTell => nesting += 1,
            OpCode::EndTell if nesting == 0 => return Some(i),
            OpCode::EndTell => nesting -= 1,
            _ => {}
        }
    }
    None
}

fn handler_display_name(handler: &LingoHandler) -> String {
    if handler.name.is_empty() {
        format!("handler_{}", handler.name_id)
    } else {
        handler.name.to_owned()
    }
}

/// Decompiles one handler. Blocks that cannot be structured are rendered
/// as bytecode comments in place; the surrounding statements are kept.
pub fn decompile_handler(handler: &LingoHandler, script: &LingoScript, config: &FormatConfig) -> HandlerNode {
    let mut state = DecompilerState::new(handler, script, config);
    let mut body = state.decompile_range(0, handler.instructions.len(), 0);
    if !state.globals.is_empty() {
        body.insert(0, AstNode::Global(state.globals));
    }
    HandlerNode {
        name: handler_display_name(handler),
        args: handler.arg_names.clone(),
        body,
    }
}

pub fn decompile_script(script: &LingoScript, config: &FormatConfig) -> ScriptNode {
    let handlers = script
        .handlers
        .iter()
        .map(|handler| decompile_handler(handler, script, config))
        .collect();
    ScriptNode { handlers }
}
