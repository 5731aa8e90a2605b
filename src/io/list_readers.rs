use binary_reader::Endian;

use super::reader::{endian_reader, DirectorExt};

pub fn read_pascal_string(item_bufs: &[Vec<u8>], index: usize, item_endian: Endian) -> String {
    let Some(buf) = item_bufs.get(index) else {
        return "".to_owned();
    };
    if buf.is_empty() {
        return "".to_owned();
    }

    let mut reader = endian_reader(buf, item_endian);
    return reader.read_pascal_string().unwrap_or_default();
}

pub fn read_u16(item_bufs: &[Vec<u8>], index: usize, item_endian: Endian) -> u16 {
    let Some(buf) = item_bufs.get(index) else {
        return 0;
    };

    let mut reader = endian_reader(buf, item_endian);
    return reader.read_u16().unwrap_or(0);
}
