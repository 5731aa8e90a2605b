// Lingo bytecode decompiler

pub mod ast;
pub mod blocks;
pub mod code_writer;
pub mod enums;
pub mod handler;

pub use ast::{render_script_with_header, AstNode, Datum, HandlerNode, ScriptAnnotation, ScriptNode};
pub use handler::{decompile_handler, decompile_script};
