use dirscope::director::cast::{linked_entries_of_type, STANDALONE_CAST_NAME};
use dirscope::director::enums::{CastType, ScriptType};
use dirscope::{resolve_casts, CastLookup, ContainerIndex, DirectorFile, FormatConfig};

use crate::builder::{self, tag, Library, MovieBuilder};

#[test]
fn test_internal_library_members() {
    let mut movie = MovieBuilder::rifx();
    let bird = movie.add("CASt", builder::member(1, "Bird", &[]));
    let go = movie.add("CASt", builder::script_member("Go", 3));
    let slots = movie.add("CAS*", builder::slot_table(&[bird, 0, go]));
    movie.add(
        "MCsL",
        builder::cast_list(&[Library {
            name: "Internal",
            path: "",
            min_member: 1,
            max_member: 3,
            id: 1024,
        }]),
    );
    movie.link_library(0, slots);

    let file = DirectorFile::from_bytes("movie.dir", &movie.build()).unwrap();
    assert_eq!(file.casts.len(), 1);
    let cast = &file.casts[0];
    assert_eq!(cast.name, "Internal");
    assert!(!cast.is_external());
    assert_eq!(cast.member_count, 3);
    assert_eq!(cast.members.keys().copied().collect::<Vec<_>>(), vec![1, 3]);

    let bird_member = file.get_member("internal", 1).unwrap();
    assert_eq!(bird_member.name, "Bird");
    assert_eq!(bird_member.cast_type, CastType::Bitmap);
    assert_eq!(bird_member.file_slot, bird);
    assert_eq!(bird_member.script_type, None);

    let go_member = file.get_member_by_name("GO").unwrap();
    assert_eq!(go_member.slot, 3);
    assert_eq!(go_member.cast_type, CastType::Script);
    assert_eq!(go_member.script_type, Some(ScriptType::Score));
    assert!(file.get_member("Internal", 2).is_none());
}

#[test]
fn test_external_and_empty_libraries() {
    let mut movie = MovieBuilder::rifx();
    let shape = movie.add("CASt", builder::member(8, "Box", &[]));
    let slots = movie.add("CAS*", builder::slot_table(&[shape]));
    movie.add(
        "MCsL",
        builder::cast_list(&[
            Library {
                name: "Internal",
                path: "",
                min_member: 1,
                max_member: 1,
                id: 1024,
            },
            Library {
                name: "Shared",
                path: "casts/shared.cst",
                min_member: 1,
                max_member: 0,
                id: 1025,
            },
        ]),
    );
    movie.link_library(0, slots);

    let index = ContainerIndex::parse(&movie.build()).unwrap();
    let casts = resolve_casts(&index, &FormatConfig::default());
    assert_eq!(casts.len(), 2);
    assert_eq!(casts[0].members.len(), 1);
    assert_eq!(casts[1].name, "Shared");
    assert_eq!(casts[1].external_path.as_deref(), Some("casts/shared.cst"));
    assert!(casts[1].members.is_empty());
    assert_eq!(casts[1].chunk_id, None);
    assert_eq!(casts.get_member_by_name("box").map(|member| member.slot), Some(1));
}

#[test]
fn test_stored_library_id_fallback() {
    let mut movie = MovieBuilder::rifx();
    let member = movie.add("CASt", builder::member(12, "Title", &[]));
    let slots = movie.add("CAS*", builder::slot_table(&[member]));
    movie.add(
        "MCsL",
        builder::cast_list(&[Library {
            name: "Text",
            path: "",
            min_member: 5,
            max_member: 5,
            id: 1024 + 7,
        }]),
    );
    movie.link_library(7, slots);

    let file = DirectorFile::from_bytes("movie.dir", &movie.build()).unwrap();
    assert_eq!(file.casts[0].chunk_id, Some(slots));
    assert_eq!(file.get_member("Text", 5).map(|member| member.cast_type), Some(CastType::Text));
}

#[test]
fn test_standalone_cast_numbers_from_config() {
    let mut movie = MovieBuilder::rifx();
    movie.add("VWCF", builder::movie_config(10, 1201));
    let first = movie.add("CASt", builder::member(6, "Chirp", &[]));
    let second = movie.add("CASt", builder::member(1, "", &[]));
    movie.add("CAS*", builder::slot_table(&[first, second]));

    let file = DirectorFile::from_bytes("movie.dir", &movie.build()).unwrap();
    assert_eq!(file.casts.len(), 1);
    assert_eq!(file.casts[0].name, STANDALONE_CAST_NAME);
    assert_eq!(file.casts[0].min_member, 10);
    assert_eq!(file.get_member("Standalone", 10).unwrap().name, "Chirp");
    assert_eq!(file.get_member("Standalone", 11).unwrap().name, "");
    assert_eq!(file.version(), Some(500));
}

#[test]
fn test_bad_members_are_skipped() {
    let mut movie = MovieBuilder::rifx();
    let names = movie.add("Lnam", builder::names(&[]));
    let good = movie.add("CASt", builder::member(1, "Good", &[]));
    // the info block claims more bytes than the chunk holds
    let broken = movie.add("CASt", vec![0, 0, 0, 1, 0, 0, 0x10, 0, 0, 0, 0, 0]);
    movie.add("CAS*", builder::slot_table(&[good, broken, names, 400]));

    let file = DirectorFile::from_bytes("movie.dir", &movie.build()).unwrap();
    let cast = &file.casts[0];
    assert_eq!(cast.members.keys().copied().collect::<Vec<_>>(), vec![1]);
    let skipped = file
        .diagnostics
        .iter()
        .filter(|message| message.contains("skipped"))
        .count();
    assert_eq!(skipped, 3);
}

#[test]
fn test_missing_chunks_are_reported() {
    let movie = MovieBuilder::rifx();
    let file = DirectorFile::from_bytes("empty.dir", &movie.build()).unwrap();
    assert!(file.casts[0].members.is_empty());
    assert!(file.movie_config.is_none());
    assert!(file.diagnostics.iter().any(|message| message.contains("Lnam")));
    assert!(file.diagnostics.iter().any(|message| message.contains("VWCF")));
}

#[test]
fn test_linked_resources() {
    let mut movie = MovieBuilder::xfir();
    let member = movie.add("CASt", builder::member(1, "Bird", &[]));
    let bitmap = movie.add("BITD", vec![1, 2, 3, 4]);
    let thumbnail = movie.add("THUM", vec![5, 6]);
    movie.add("CAS*", builder::slot_table(&[member]));
    movie.link(member, bitmap, "BITD");
    movie.link(member, thumbnail, "THUM");

    let file = DirectorFile::from_bytes("movie.dxr", &movie.build()).unwrap();
    let bird = file.get_member_by_name("Bird").unwrap();
    assert_eq!(bird.linked_entries, vec![bitmap, thumbnail]);
    assert_eq!(linked_entries_of_type(&file.index, bird, tag("BITD")), vec![bitmap]);
    let (fourcc, bytes) = file.get_raw_chunk(bitmap).unwrap();
    assert_eq!(fourcc, "BITD");
    assert_eq!(bytes, &[1, 2, 3, 4]);
}
