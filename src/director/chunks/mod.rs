pub mod cast;
pub mod cast_list;
pub mod cast_member;
pub mod cast_member_info;
pub mod config;
pub mod handler;
pub mod imap;
pub mod info;
pub mod key_table;
pub mod lctx;
pub mod list;
pub mod literal;
pub mod mmap;
pub mod script;
pub mod script_names;
