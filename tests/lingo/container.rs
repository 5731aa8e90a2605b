use binary_reader::Endian;
use dirscope::{ContainerIndex, DirectorError, FormatConfig};

use crate::builder::{self, tag, MovieBuilder, FIRST_CHUNK_ID};

fn sample(mut movie: MovieBuilder) -> Vec<u8> {
    movie.add("VWCF", builder::movie_config(1, 1201));
    movie.add("Lnam", builder::names(&["go"]));
    movie.build()
}

#[test]
fn test_rifx_is_big_endian() {
    let index = ContainerIndex::parse(&sample(MovieBuilder::rifx())).unwrap();
    assert!(matches!(index.endian, Endian::Big));
    assert_eq!(index.signature, tag("MV93"));
    assert_eq!(index.entries.len(), 5);
    assert_eq!(index.entries[FIRST_CHUNK_ID as usize].fourcc_str(), "VWCF");
    assert_eq!(index.entries[4].fourcc_str(), "Lnam");
}

#[test]
fn test_xfir_is_little_endian() {
    let index = ContainerIndex::parse(&sample(MovieBuilder::xfir())).unwrap();
    assert!(matches!(index.endian, Endian::Little));
    assert_eq!(index.signature, tag("MV93"));
    assert_eq!(index.entries[4].fourcc_str(), "Lnam");
    // chunk payloads are not byte swapped
    assert_eq!(index.get_entry_bytes(4).unwrap(), builder::names(&["go"]).as_slice());
}

#[test]
fn test_raw_chunk() {
    let index = ContainerIndex::parse(&sample(MovieBuilder::rifx())).unwrap();
    let (fourcc, bytes) = index.get_raw_chunk(FIRST_CHUNK_ID).unwrap();
    assert_eq!(fourcc, "VWCF");
    assert_eq!(bytes.len(), 100);
    assert!(index.get_raw_chunk(99).is_none());
    assert_eq!(index.first_entry_of_type(tag("Lnam")).map(|entry| entry.id), Some(4));
}

#[test]
fn test_rejects_other_containers() {
    let mut bytes = sample(MovieBuilder::rifx());
    bytes[0..4].copy_from_slice(b"FORM");
    match ContainerIndex::parse(&bytes) {
        Err(DirectorError::NotADirectorFile { tag: found }) => assert_eq!(found, tag("FORM")),
        other => panic!("expected NotADirectorFile, got {:?}", other.map(|index| index.entries.len())),
    }
}

#[test]
fn test_short_header_is_truncated() {
    let result = ContainerIndex::parse(b"RIFX\0\0");
    assert!(matches!(result, Err(DirectorError::Truncated(_))));
}

#[test]
fn test_missing_imap_yields_empty_index() {
    let mut bytes = b"RIFX\0\0\0\x20MV93".to_vec();
    bytes.extend_from_slice(b"junkjunkjunkjunk");
    let index = ContainerIndex::parse(&bytes).unwrap();
    assert!(index.entries.is_empty());
}

#[test]
fn test_cut_memory_map_keeps_whole_entries() {
    let bytes = sample(MovieBuilder::rifx());
    // container header, imap, mmap header and two 20 byte records
    let index = ContainerIndex::parse(&bytes[..12 + 16 + 32 + 40]).unwrap();
    assert_eq!(index.entries.len(), 2);
    assert_eq!(index.entries[1].fourcc_str(), "imap");
}

#[test]
fn test_key_table_links_both_endians() {
    for mut movie in [MovieBuilder::rifx(), MovieBuilder::xfir()] {
        let member = movie.add("CASt", builder::script_member("Main", 1));
        let script = movie.add("Lscr", vec![0; 4]);
        let slots = movie.add("CAS*", builder::slot_table(&[member]));
        movie.link(member, script, "Lscr");
        movie.link_library(0, slots);
        let index = ContainerIndex::parse(&movie.build()).unwrap();

        assert_eq!(index.entry(member).unwrap().linked_entry_ids, vec![script]);
        assert!(index.entry(script).unwrap().linked_entry_ids.is_empty());
        assert_eq!(index.library_chunks.get(&0), Some(&slots));
    }
}

#[test]
fn test_library_bias_from_config() {
    let mut movie = MovieBuilder::rifx();
    let slots = movie.add("CAS*", builder::slot_table(&[]));
    movie.link_library(2, slots);
    let bytes = movie.build();

    let index = ContainerIndex::parse(&bytes).unwrap();
    assert_eq!(index.library_chunks.get(&2), Some(&slots));

    let config = FormatConfig::from_toml_str("cast_lib_key_bias = 1000").unwrap();
    let index = ContainerIndex::parse_with_config(&bytes, &config).unwrap();
    assert_eq!(index.library_chunks.get(&26), Some(&slots));
}

#[test]
fn test_out_of_range_links_are_ignored() {
    let mut movie = MovieBuilder::rifx();
    let member = movie.add("CASt", builder::member(1, "Bird", &[]));
    movie.link(member, 500, "BITD");
    movie.link(500, member, "BITD");
    let index = ContainerIndex::parse(&movie.build()).unwrap();
    assert!(index.entry(member).unwrap().linked_entry_ids.is_empty());
}

#[test]
fn test_payloads_outlive_source_buffer() {
    let index = {
        let bytes = sample(MovieBuilder::rifx());
        ContainerIndex::parse(&bytes).unwrap()
    };
    assert_eq!(index.get_entry_bytes(4).unwrap(), builder::names(&["go"]).as_slice());
}
