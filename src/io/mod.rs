pub mod list_readers;
pub mod reader;
