use crate::{
    director::utils::{human_version, FOURCC},
    error::ChunkError,
    io::reader::{endian_reader, DirectorExt},
};
use binary_reader::{BinaryReader, Endian};
use log::debug;

pub const CONFIG_MIN_SIZE: usize = 68;

/// VWCF / DRCF: stage geometry, member range and authoring version.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieConfig {
    /*  0 */ pub len: u16,
    /*  2 */ pub file_version: u16,
    /*  4 */ pub movie_top: i16,
    /*  6 */ pub movie_left: i16,
    /*  8 */ pub movie_bottom: i16,
    /* 10 */ pub movie_right: i16,
    /* 12 */ pub min_member: u16,
    /* 14 */ pub max_member: u16,
    /* 28 */ pub bit_depth: u16,
    /* 36 */ pub director_version: u16,
    /* 54 */ pub frame_rate: u16,
    /* 56 */ pub platform: u16,
    /* 58 */ pub protection: u16,
    /* 64 */ pub checksum: u32,
    pub checksum_matches: bool,
}

impl MovieConfig {
    pub fn from_bytes(bytes: &[u8]) -> Result<MovieConfig, ChunkError> {
        let mut reader = endian_reader(bytes, Endian::Big);
        Self::from_reader(&mut reader)
    }

    pub fn from_reader(reader: &mut BinaryReader) -> Result<MovieConfig, ChunkError> {
        reader.set_endian(Endian::Big);
        if reader.length < CONFIG_MIN_SIZE {
            return Err(ChunkError::malformed(
                "VWCF",
                format!("{} bytes, need {}", reader.length, CONFIG_MIN_SIZE),
            ));
        }

        reader.jmp(0);
        let len = reader.read_u16()?;
        let file_version = reader.read_u16()?;
        let movie_top = reader.read_i16()?;
        let movie_left = reader.read_i16()?;
        let movie_bottom = reader.read_i16()?;
        let movie_right = reader.read_i16()?;
        let min_member = reader.read_u16()?;
        let max_member = reader.read_u16()?;

        reader.jmp(28);
        let bit_depth = reader.read_u16()?;
        reader.jmp(36);
        let director_version = reader.read_u16()?;
        reader.jmp(54);
        let frame_rate = reader.read_u16()?;
        let platform = reader.read_u16()?;
        let protection = reader.read_u16()?;
        reader.jmp(64);
        let checksum = reader.read_u32()?;

        let computed_checksum = compute_checksum(reader)?;
        let checksum_matches = checksum == computed_checksum;
        if !checksum_matches {
            debug!(
                "Checksums don't match! Stored: {} Computed: {}",
                checksum, computed_checksum
            );
        }

        Ok(MovieConfig {
            len,
            file_version,
            movie_top,
            movie_left,
            movie_bottom,
            movie_right,
            min_member,
            max_member,
            bit_depth,
            director_version,
            frame_rate,
            platform,
            protection,
            checksum,
            checksum_matches,
        })
    }

    pub fn human_version(&self) -> u16 {
        human_version(self.director_version)
    }

    pub fn stage_width(&self) -> i32 {
        self.movie_right as i32 - self.movie_left as i32
    }

    pub fn stage_height(&self) -> i32 {
        self.movie_bottom as i32 - self.movie_top as i32
    }
}

/// Director's config checksum, computed over the raw header words of a
/// D6-or-earlier layout.
fn compute_checksum(reader: &mut BinaryReader) -> Result<u32, ChunkError> {
    let mut u16_at = |pos: usize| -> Result<i64, ChunkError> {
        reader.jmp(pos);
        Ok(reader.read_u16()? as i64)
    };
    let len = u16_at(0)?;
    let file_version = u16_at(2)?;
    let movie_top = u16_at(4)?;
    let movie_left = u16_at(6)?;
    let movie_bottom = u16_at(8)?;
    let movie_right = u16_at(10)?;
    let min_member = u16_at(12)?;
    let max_member = u16_at(14)?;
    let field9 = u16_at(16)? >> 8;
    let field10 = u16_at(16)? & 0xff;
    let field11 = u16_at(18)?;
    let comment_font = u16_at(20)?;
    let comment_size = u16_at(22)?;
    let stage_color = u16_at(26)?;
    let bit_depth = u16_at(28)?;
    let field17 = u16_at(30)? >> 8;
    let field18 = u16_at(30)? & 0xff;
    let director_version = u16_at(36)?;
    let field21 = u16_at(38)?;
    let field25 = u16_at(52)? >> 8;
    let frame_rate = u16_at(54)?;
    let platform = u16_at(56)?;
    let protection = u16_at(58)?;
    reader.jmp(32);
    let field19 = reader.read_u32()? as i64;
    reader.jmp(40);
    let field22 = reader.read_u32()? as i64;
    let field23 = reader.read_u32()? as i64;
    let field24 = reader.read_u32()? as i64;

    let mut check: i64 = len + 1;
    check = check.wrapping_mul(file_version + 2);
    check = check.wrapping_div(movie_top + 3);
    check = check.wrapping_mul(movie_left + 4);
    check = check.wrapping_div(movie_bottom + 5);
    check = check.wrapping_mul(movie_right + 6);
    check = check.wrapping_sub(min_member + 7);
    check = check.wrapping_mul(max_member + 8);
    check = check.wrapping_sub(field9 + 9);
    check = check.wrapping_sub(field10 + 10);
    check = check.wrapping_add(field11 + 11);
    check = check.wrapping_mul(comment_font + 12);
    check = check.wrapping_add(comment_size + 13);
    check = check.wrapping_mul(((comment_size >> 8) & 0xff) + 14);
    check = check.wrapping_add(stage_color + 15);
    check = check.wrapping_add(bit_depth + 16);
    check = check.wrapping_add(field17 + 17);
    check = check.wrapping_mul(field18 + 18);
    check = check.wrapping_add(field19 + 19);
    check = check.wrapping_mul(director_version + 20);
    check = check.wrapping_add(field21 + 21);
    check = check.wrapping_add(field22 + 22);
    check = check.wrapping_add(field23 + 23);
    check = check.wrapping_add(field24 + 24);
    check = check.wrapping_mul(field25 + 25);
    check = check.wrapping_add(frame_rate + 26);
    check = check.wrapping_mul(platform + 27);
    check = check.wrapping_mul(protection * 0xE06);
    check = check.wrapping_add(0xFF450000);
    check ^= FOURCC("ralf") as i64;

    Ok((check & 0xFFFFFFFF) as u32)
}
