use dirscope::director::lingo::script::LingoConstant;
use dirscope::{DirectorFile, JumpAddressing};

use crate::builder::{self, op, Code, HandlerDef, Literal, MovieBuilder, ScriptDef};

fn movie_with_script(names: &[&str], script: &ScriptDef) -> (DirectorFile, u32) {
    let mut movie = MovieBuilder::rifx();
    movie.add("Lnam", builder::names(names));
    let script_id = movie.add("Lscr", script.build());
    let file = DirectorFile::from_bytes("movie.dir", &movie.build()).unwrap();
    (file, script_id)
}

#[test]
fn test_handler_names_args_and_locals() {
    let code = Code::new().op(op::RET).bytes();
    let script = ScriptDef {
        script_number: 4,
        handlers: vec![HandlerDef::new(0, code).args(&[1, -1, 2]).locals(&[2, 9])],
        globals: vec![3],
        properties: vec![1],
        ..Default::default()
    };
    let (file, script_id) = movie_with_script(&["mouseUp", "me", "total", "gScore"], &script);

    let script = file.get_script(script_id).unwrap();
    assert_eq!(script.script_number, 4);
    assert_eq!(script.global_names, vec!["gScore"]);
    assert_eq!(script.property_names, vec!["me"]);
    let handler = script.handler_by_name("mouseUp").unwrap();
    assert_eq!(handler.arg_names, vec!["me"]);
    assert_eq!(handler.local_names, vec!["total", "name_9"]);
    assert_eq!(handler.instructions.len(), 1);
}

#[test]
fn test_constant_pool() {
    let script = ScriptDef {
        literals: vec![
            Literal::Int(0xffff_fffe),
            Literal::String("hello"),
            Literal::Symbol("done"),
            Literal::Double(2.5),
            // 1.0 as an 80 bit SANE extended
            Literal::Extended([0x3f, 0xff, 0x80, 0, 0, 0, 0, 0, 0, 0]),
        ],
        ..Default::default()
    };
    let (file, script_id) = movie_with_script(&[], &script);
    assert_eq!(
        file.get_script(script_id).unwrap().constants,
        vec![
            LingoConstant::Int(-2),
            LingoConstant::String("hello".to_owned()),
            LingoConstant::Symbol("done".to_owned()),
            LingoConstant::Float(2.5),
            LingoConstant::Float(1.0),
        ]
    );
}

#[test]
fn test_missing_name_table_uses_placeholders() {
    let code = Code::new().arg(op::GET_LOCAL, 0).op(op::RET).bytes();
    let script = ScriptDef {
        handlers: vec![HandlerDef::new(2, code).locals(&[4])],
        ..Default::default()
    };
    let mut movie = MovieBuilder::rifx();
    let script_id = movie.add("Lscr", script.build());
    let file = DirectorFile::from_bytes("movie.dir", &movie.build()).unwrap();

    let handler = &file.get_script(script_id).unwrap().handlers[0];
    assert_eq!(handler.name, "handler_2");
    assert_eq!(handler.local_names, vec!["name_4"]);
    assert_eq!(
        file.decompile_script_text(script_id).unwrap(),
        "on handler_2\n  return name_4\nend"
    );
}

#[test]
fn test_overrunning_handler_ends_table() {
    let script = ScriptDef {
        handlers: vec![
            HandlerDef::new(0, Code::new().op(op::RET).bytes()),
            HandlerDef::new(1, Code::new().op(op::RET).bytes()),
        ],
        ..Default::default()
    };
    let mut bytes = script.build();
    // second record's code length
    let at = 0x5c + 42 + 4;
    bytes[at..at + 4].copy_from_slice(&0x10000u32.to_be_bytes());

    let mut movie = MovieBuilder::rifx();
    movie.add("Lnam", builder::names(&["first", "second"]));
    let script_id = movie.add("Lscr", bytes);
    let file = DirectorFile::from_bytes("movie.dir", &movie.build()).unwrap();

    let handlers = &file.get_script(script_id).unwrap().handlers;
    assert_eq!(handlers.len(), 1);
    assert_eq!(handlers[0].name, "first");
}

#[test]
fn test_undersized_script_is_empty() {
    let mut movie = MovieBuilder::rifx();
    let script_id = movie.add("Lscr", vec![0; 0x20]);
    let file = DirectorFile::from_bytes("movie.dir", &movie.build()).unwrap();
    assert!(file.get_script(script_id).unwrap().handlers.is_empty());
    assert!(file.decompile_scripts().is_empty());
}

#[test]
fn test_disassembly() {
    // if x then set x = 1
    let code = Code::new()
        .arg(op::GET_LOCAL, 0)
        .arg(op::JMP_IF_Z, 6)
        .arg(op::PUSH_INT8, 1)
        .arg(op::SET_LOCAL, 0)
        .op(op::RET)
        .bytes();
    let script = ScriptDef {
        handlers: vec![HandlerDef::new(0, code).args(&[1])],
        ..Default::default()
    };
    let (file, script_id) = movie_with_script(&["check", "x"], &script);

    assert_eq!(
        file.get_script(script_id).unwrap().disassemble(JumpAddressing::Relative),
        "on check x\n  [0] getlocal 0\n  [2] jmpifz [8]\n  [4] pushint8 1\n  [6] setlocal 0\n  [8] ret\nend\n"
    );
}

#[test]
fn test_script_contexts() {
    let mut movie = MovieBuilder::rifx();
    movie.add("LctX", builder::contexts(&[(1, 2), (7, 5), (42, 6)]));
    let file = DirectorFile::from_bytes("movie.dir", &movie.build()).unwrap();

    let roles: Vec<(u32, u16, String)> = file
        .contexts
        .entries
        .iter()
        .map(|entry| (entry.id, entry.cast_id, entry.role()))
        .collect();
    assert_eq!(
        roles,
        vec![
            (0, 2, "movie".to_owned()),
            (1, 5, "parent".to_owned()),
            (2, 6, "type_42".to_owned()),
        ]
    );
    assert_eq!(file.script_cast_map.get(&1).map(|annotation| annotation.role.as_str()), Some("parent"));
    assert_eq!(
        file.script_cast_map.get(&0).map(|annotation| annotation.member_name.as_str()),
        Some("cast_2")
    );
}
