// Lingo decompiler AST nodes

use super::code_writer::CodeWriter;
use super::enums::{ChunkExprType, PutType};
use crate::director::lingo::opcode::OpCode;

/// Maximum recursion depth for write_script to prevent stack overflow
const MAX_WRITE_DEPTH: usize = 100;

/// Literal values in the decompiled source
#[derive(Clone, Debug, PartialEq)]
pub enum Datum {
    Void,
    Int(i32),
    Float(f64),
    String(String),
    Symbol(String),
    List(Vec<AstNode>),
    PropList(Vec<(AstNode, AstNode)>),
}

impl Datum {
    fn write_script_with_depth(&self, code: &mut CodeWriter, depth: usize) {
        match self {
            Datum::Void => code.write("VOID"),
            Datum::Int(value) => code.write(&value.to_string()),
            Datum::Float(value) => code.write(&format_float(*value)),
            Datum::String(value) => code.write(&quote_string(value)),
            Datum::Symbol(name) => {
                code.write("#");
                code.write(name);
            }
            Datum::List(items) => {
                code.write("[");
                code.write_list(items, |code, item| item.write_script_with_depth(code, depth + 1));
                code.write("]");
            }
            Datum::PropList(pairs) => {
                code.write("[");
                if pairs.is_empty() {
                    code.write(":");
                }
                code.write_list(pairs, |code, (key, value)| {
                    key.write_script_with_depth(code, depth + 1);
                    code.write(": ");
                    value.write_script_with_depth(code, depth + 1);
                });
                code.write("]");
            }
        }
    }
}

fn format_float(value: f64) -> String {
    let s = format!("{:.4}", value);
    // Remove trailing zeros but keep at least one decimal place
    let s = s.trim_end_matches('0');
    if s.ends_with('.') {
        format!("{}0", s)
    } else {
        s.to_string()
    }
}

/// Lingo strings have no escapes, embedded quotes are joined in with the
/// QUOTE constant.
pub fn quote_string(value: &str) -> String {
    value
        .split('"')
        .map(|part| format!("\"{}\"", part))
        .collect::<Vec<_>>()
        .join(" & QUOTE & ")
}

#[derive(Clone, Debug, PartialEq)]
pub enum AstNode {
    Error,
    Comment(String),
    Literal(Datum),
    Var(String),
    GlobalRef(String),
    PropertyRef(String),
    BinaryOp { opcode: OpCode, left: Box<AstNode>, right: Box<AstNode> },
    UnaryOp { opcode: OpCode, operand: Box<AstNode> },
    Call { name: String, args: Vec<AstNode> },
    MethodCall { obj: Box<AstNode>, name: String, args: Vec<AstNode> },
    ObjProp { obj: Box<AstNode>, prop: String },
    SpriteProp { sprite_id: Box<AstNode>, prop: String },
    ChunkExpr { chunk_type: ChunkExprType, first: Box<AstNode>, last: Option<Box<AstNode>>, string: Box<AstNode> },
    The(String),
    Assignment { variable: Box<AstNode>, value: Box<AstNode> },
    Put { put_type: PutType, variable: Box<AstNode>, value: Box<AstNode> },
    CallStmt(Box<AstNode>),
    Return(Option<Box<AstNode>>),
    Global(Vec<String>),
    If { condition: Box<AstNode>, block1: Vec<AstNode>, block2: Vec<AstNode> },
    RepeatWhile { condition: Box<AstNode>, block: Vec<AstNode> },
    Tell { window: Box<AstNode>, block: Vec<AstNode> },
    ExitRepeat,
    NextRepeat,
}

impl AstNode {
    pub fn is_call(&self) -> bool {
        matches!(self, AstNode::Call { .. } | AstNode::MethodCall { .. })
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            AstNode::Comment(_)
                | AstNode::Assignment { .. }
                | AstNode::Put { .. }
                | AstNode::CallStmt(_)
                | AstNode::Return(_)
                | AstNode::Global(_)
                | AstNode::If { .. }
                | AstNode::RepeatWhile { .. }
                | AstNode::Tell { .. }
                | AstNode::ExitRepeat
                | AstNode::NextRepeat
        )
    }

    /// Renders a single node. Statements render without a trailing newline.
    pub fn to_lingo(&self) -> String {
        let mut code = CodeWriter::new();
        self.write_script(&mut code);
        code.into_string()
    }

    pub fn write_script(&self, code: &mut CodeWriter) {
        self.write_script_with_depth(code, 0);
    }

    fn write_script_with_depth(&self, code: &mut CodeWriter, depth: usize) {
        if depth > MAX_WRITE_DEPTH {
            code.write("VOID");
            code.note("expression nested too deeply");
            return;
        }
        match self {
            AstNode::Error => code.write("ERROR"),
            AstNode::Comment(text) => {
                code.write("-- ");
                code.write(text);
            }
            AstNode::Literal(datum) => datum.write_script_with_depth(code, depth),
            AstNode::Var(name) | AstNode::GlobalRef(name) | AstNode::PropertyRef(name) => code.write(name),
            AstNode::BinaryOp { opcode, left, right } => {
                write_binary_op_with_depth(code, *opcode, left, right, depth);
            }
            AstNode::UnaryOp { opcode, operand } => {
                code.write(if *opcode == OpCode::Not { "not " } else { "-" });
                let needs_parens = matches!(operand.as_ref(), AstNode::BinaryOp { .. });
                if needs_parens { code.write("("); }
                operand.write_script_with_depth(code, depth + 1);
                if needs_parens { code.write(")"); }
            }
            AstNode::Call { name, args } => {
                code.write(name);
                if !args.is_empty() {
                    code.write("(");
                    code.write_list(args, |code, arg| arg.write_script_with_depth(code, depth + 1));
                    code.write(")");
                }
            }
            AstNode::MethodCall { obj, name, args } => {
                obj.write_script_with_depth(code, depth + 1);
                code.write(".");
                code.write(name);
                code.write("(");
                code.write_list(args, |code, arg| arg.write_script_with_depth(code, depth + 1));
                code.write(")");
            }
            AstNode::ObjProp { obj, prop } => {
                code.write("the ");
                code.write(prop);
                code.write(" of ");
                obj.write_script_with_depth(code, depth + 1);
            }
            AstNode::SpriteProp { sprite_id, prop } => {
                code.write("the ");
                code.write(prop);
                code.write(" of sprite ");
                sprite_id.write_script_with_depth(code, depth + 1);
            }
            AstNode::ChunkExpr { chunk_type, first, last, string } => {
                code.write(chunk_type.name());
                code.write(" ");
                first.write_script_with_depth(code, depth + 1);
                if let Some(last) = last {
                    code.write(" to ");
                    last.write_script_with_depth(code, depth + 1);
                }
                code.write(" of ");
                string.write_script_with_depth(code, depth + 1);
            }
            AstNode::The(prop) => {
                code.write("the ");
                code.write(prop);
            }
            AstNode::Assignment { variable, value } => {
                code.write("set ");
                variable.write_script_with_depth(code, depth + 1);
                code.write(" = ");
                value.write_script_with_depth(code, depth + 1);
            }
            AstNode::Put { put_type, variable, value } => {
                code.write("put ");
                value.write_script_with_depth(code, depth + 1);
                code.write(" ");
                code.write(put_type.name());
                code.write(" ");
                variable.write_script_with_depth(code, depth + 1);
            }
            AstNode::CallStmt(call) => call.write_script_with_depth(code, depth + 1),
            AstNode::Return(value) => {
                code.write("return");
                if let Some(value) = value {
                    code.write(" ");
                    value.write_script_with_depth(code, depth + 1);
                }
            }
            AstNode::Global(names) => {
                code.write("global ");
                code.write(&names.join(", "));
            }
            AstNode::If { condition, block1, block2 } => {
                code.write("if ");
                condition.write_script_with_depth(code, depth + 1);
                code.write(" then");
                code.end_line();
                write_block_with_depth(code, block1, depth);
                if !block2.is_empty() {
                    code.write("else");
                    code.end_line();
                    write_block_with_depth(code, block2, depth);
                }
                code.write("end if");
            }
            AstNode::RepeatWhile { condition, block } => {
                code.write("repeat while ");
                condition.write_script_with_depth(code, depth + 1);
                code.end_line();
                write_block_with_depth(code, block, depth);
                code.write("end repeat");
            }
            AstNode::Tell { window, block } => {
                code.write("tell ");
                window.write_script_with_depth(code, depth + 1);
                code.end_line();
                write_block_with_depth(code, block, depth);
                code.write("end tell");
            }
            AstNode::ExitRepeat => code.write("exit repeat"),
            AstNode::NextRepeat => code.write("next repeat"),
        }
    }
}

/// Writes one indented statement per line.
fn write_block_with_depth(code: &mut CodeWriter, block: &[AstNode], depth: usize) {
    if depth > MAX_WRITE_DEPTH {
        code.writeln("-- MAX DEPTH EXCEEDED");
        return;
    }
    code.indent();
    for child in block {
        child.write_script_with_depth(code, depth + 1);
        code.end_line();
    }
    code.unindent();
}

fn write_binary_op_with_depth(code: &mut CodeWriter, opcode: OpCode, left: &AstNode, right: &AstNode, depth: usize) {
    // Left children of equal or higher precedence need no parens, so a
    // left-nested chain like `a & b & c & ...` is written without recursing.
    let mut chain = vec![(opcode, right)];
    let mut base = left;
    while let AstNode::BinaryOp { opcode: left_op, left: inner_left, right: inner_right } = base {
        let parent = chain[chain.len() - 1].0;
        if get_precedence(*left_op) < get_precedence(parent) {
            break;
        }
        chain.push((*left_op, inner_right.as_ref()));
        base = inner_left.as_ref();
    }

    let innermost = chain[chain.len() - 1].0;
    let base_needs_parens = match base {
        AstNode::BinaryOp { opcode: base_op, .. } => get_precedence(*base_op) < get_precedence(innermost),
        _ => false,
    };
    if base_needs_parens { code.write("("); }
    base.write_script_with_depth(code, depth + 1);
    if base_needs_parens { code.write(")"); }

    for (op, right) in chain.into_iter().rev() {
        let right_needs_parens = match right {
            AstNode::BinaryOp { opcode: right_op, .. } => get_precedence(*right_op) <= get_precedence(op),
            _ => false,
        };
        code.write(" ");
        code.write(get_op_string(op));
        code.write(" ");
        if right_needs_parens { code.write("("); }
        right.write_script_with_depth(code, depth + 1);
        if right_needs_parens { code.write(")"); }
    }
}

fn get_op_string(opcode: OpCode) -> &'static str {
    match opcode {
        OpCode::Mul => "*",
        OpCode::Add => "+",
        OpCode::Sub => "-",
        OpCode::Div => "/",
        OpCode::Mod => "mod",
        OpCode::JoinStr => "&",
        OpCode::JoinPadStr => "&&",
        OpCode::Lt => "<",
        OpCode::LtEq => "<=",
        OpCode::NtEq => "<>",
        OpCode::Eq => "=",
        OpCode::Gt => ">",
        OpCode::GtEq => ">=",
        OpCode::And => "and",
        OpCode::Or => "or",
        OpCode::ContainsStr => "contains",
        OpCode::Contains0Str => "starts",
        OpCode::OntoSpr => "intersects",
        OpCode::IntoSpr => "within",
        _ => "???",
    }
}

fn get_precedence(opcode: OpCode) -> u32 {
    match opcode {
        OpCode::Or => 1,
        OpCode::And => 2,
        OpCode::Lt
        | OpCode::LtEq
        | OpCode::NtEq
        | OpCode::Eq
        | OpCode::Gt
        | OpCode::GtEq
        | OpCode::ContainsStr
        | OpCode::Contains0Str
        | OpCode::OntoSpr
        | OpCode::IntoSpr => 4,
        OpCode::JoinStr | OpCode::JoinPadStr => 5,
        OpCode::Add | OpCode::Sub => 6,
        OpCode::Mul | OpCode::Div | OpCode::Mod => 7,
        _ => 0,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HandlerNode {
    pub name: String,
    pub args: Vec<String>,
    pub body: Vec<AstNode>,
}

impl HandlerNode {
    pub fn write_script(&self, code: &mut CodeWriter) {
        code.write("on ");
        code.write(&self.name);
        if !self.args.is_empty() {
            code.write(" ");
            code.write(&self.args.join(", "));
        }
        code.end_line();
        write_block_with_depth(code, &self.body, 0);
        code.write("end");
    }

    pub fn to_lingo(&self) -> String {
        let mut code = CodeWriter::new();
        self.write_script(&mut code);
        code.into_string()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptNode {
    pub handlers: Vec<HandlerNode>,
}

impl ScriptNode {
    /// Handlers separated by a blank line.
    pub fn to_lingo(&self) -> String {
        self.handlers
            .iter()
            .map(|handler| handler.to_lingo())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Member name and script role of a decompiled script, e.g. from LctX.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptAnnotation {
    pub member_name: String,
    pub role: String,
}

/// Renders the script, prefixed with `-- <member> (<role> script)` when an
/// annotation is given. The AST is left untouched.
pub fn render_script_with_header(script: &ScriptNode, annotation: Option<&ScriptAnnotation>) -> String {
    let body = script.to_lingo();
    match annotation {
        Some(annotation) => format!(
            "-- {} ({} script)\n{}",
            annotation.member_name, annotation.role, body
        ),
        None => body,
    }
}
