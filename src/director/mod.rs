pub mod cast;
pub mod chunks;
pub mod enums;
pub mod file;
pub mod lingo;
pub mod rifx;
pub mod utils;
