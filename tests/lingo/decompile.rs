use dirscope::{DirectorFile, FormatConfig};

use crate::builder::{self, op, Code, HandlerDef, Literal, MovieBuilder, ScriptDef};

fn decompile(names: &[&str], script: ScriptDef) -> String {
    decompile_with_config(names, script, FormatConfig::default())
}

fn decompile_with_config(names: &[&str], script: ScriptDef, config: FormatConfig) -> String {
    let mut movie = MovieBuilder::rifx();
    movie.add("Lnam", builder::names(names));
    let script_id = movie.add("Lscr", script.build());
    let file = DirectorFile::from_bytes_with_config("movie.dir", &movie.build(), config).unwrap();
    file.decompile_script_text(script_id).unwrap()
}

fn pick_script(else_jump: u8, end_jump: u8) -> ScriptDef {
    let code = Code::new()
        .arg(op::GET_PARAM, 0)
        .arg(op::JMP_IF_Z, else_jump)
        .arg(op::PUSH_CONS, 0)
        .arg(op::SET_LOCAL, 0)
        .arg(op::JMP, end_jump)
        .arg(op::PUSH_CONS, 8)
        .arg(op::SET_LOCAL, 0)
        .op(op::RET)
        .bytes();
    ScriptDef {
        handlers: vec![HandlerDef::new(0, code).args(&[1]).locals(&[2])],
        literals: vec![Literal::String("yes"), Literal::String("no")],
        ..Default::default()
    }
}

const PICK_SOURCE: &str = "on pick x\n  if x then\n    set answer = \"yes\"\n  else\n    set answer = \"no\"\n  end if\nend";

#[test]
fn test_annotated_movie_script() {
    let code = Code::new()
        .arg(op::PUSH_INT8, 1)
        .arg(op::PUSH_INT8, 2)
        .op(op::ADD)
        .arg(op::SET_LOCAL, 0)
        .op(op::RET)
        .bytes();
    let script = ScriptDef {
        handlers: vec![HandlerDef::new(0, code).locals(&[1])],
        ..Default::default()
    };

    let mut movie = MovieBuilder::rifx();
    movie.add("Lnam", builder::names(&["go", "x"]));
    movie.add("VWCF", builder::movie_config(1, 1201));
    let script_id = movie.add("Lscr", script.build());
    let member = movie.add("CASt", builder::script_member("Main", 1));
    movie.add("CAS*", builder::slot_table(&[member]));
    movie.add("LctX", builder::contexts(&[(1, 1)]));
    movie.link(member, script_id, "Lscr");

    let file = DirectorFile::from_bytes("movie.dir", &movie.build()).unwrap();
    assert_eq!(file.script_member(script_id).map(|member| member.name.as_str()), Some("Main"));
    assert_eq!(
        file.decompile_scripts(),
        vec![(
            script_id,
            "-- Main (movie script)\non go\n  set x = 1 + 2\nend".to_owned()
        )]
    );
}

#[test]
fn test_role_falls_back_to_member_script_type() {
    let script = ScriptDef {
        handlers: vec![HandlerDef::new(0, Code::new().op(op::RET).bytes())],
        ..Default::default()
    };
    let mut movie = MovieBuilder::rifx();
    movie.add("Lnam", builder::names(&["new"]));
    let script_id = movie.add("Lscr", script.build());
    let member = movie.add("CASt", builder::script_member("", 7));
    movie.add("CAS*", builder::slot_table(&[member]));
    movie.link(member, script_id, "Lscr");

    let file = DirectorFile::from_bytes("movie.dir", &movie.build()).unwrap();
    assert_eq!(
        file.decompile_script_text(script_id).unwrap(),
        "-- cast_1 (parent script)\non new\nend"
    );
}

#[test]
fn test_if_else() {
    let text = decompile(&["pick", "x", "answer"], pick_script(10, 14));
    assert_eq!(text, PICK_SOURCE);
}

#[test]
fn test_relative_jumps_from_config() {
    let config = FormatConfig::from_toml_str("jump_addressing = \"relative\"").unwrap();
    let text = decompile_with_config(&["pick", "x", "answer"], pick_script(8, 6), config);
    assert_eq!(text, PICK_SOURCE);
}

#[test]
fn test_repeat_while() {
    let code = Code::new()
        .arg(op::GET_LOCAL, 0) // 0
        .op(op::PUSH_ZERO) // 2
        .op(op::GT) // 3
        .arg(op::JMP_IF_Z, 15) // 4
        .arg(op::GET_LOCAL, 0) // 6
        .arg(op::PUSH_INT8, 1) // 8
        .op(op::SUB) // 10
        .arg(op::SET_LOCAL, 0) // 11
        .arg(op::END_REPEAT, 0) // 13
        .op(op::RET) // 15
        .bytes();
    let script = ScriptDef {
        handlers: vec![HandlerDef::new(0, code).locals(&[1])],
        ..Default::default()
    };
    assert_eq!(
        decompile(&["count", "n"], script),
        "on count\n  repeat while n > 0\n    set n = n - 1\n  end repeat\nend"
    );
}

#[test]
fn test_quotes_and_precedence() {
    let code = Code::new()
        .arg(op::PUSH_CONS, 0)
        .arg(op::SET_LOCAL, 0)
        .arg(op::GET_LOCAL, 0)
        .arg(op::PUSH_CONS, 8)
        .op(op::JOIN_STR)
        .arg(op::SET_LOCAL, 0)
        .arg(op::PUSH_INT8, 1)
        .arg(op::PUSH_INT8, 2)
        .op(op::ADD)
        .arg16(op::PUSH_INT8, 300)
        .op(op::MUL)
        .op(op::RET)
        .bytes();
    let script = ScriptDef {
        handlers: vec![HandlerDef::new(0, code).locals(&[1])],
        literals: vec![Literal::String("say \"hi\""), Literal::String("!")],
        ..Default::default()
    };
    assert_eq!(
        decompile(&["show", "s"], script),
        "on show\n  set s = \"say \" & QUOTE & \"hi\" & QUOTE & \"\"\n  set s = s & \"!\"\n  return (1 + 2) * 300\nend"
    );
}

#[test]
fn test_globals_and_calls() {
    let tick = Code::new()
        .arg(op::GET_GLOBAL, 1)
        .arg(op::PUSH_INT8, 1)
        .op(op::ADD)
        .arg(op::SET_GLOBAL, 1)
        .arg(op::PUSH_INT8, 3)
        .arg(op::PUSH_ARG_LIST_NO_RET, 1)
        .arg(op::EXT_CALL, 2)
        .op(op::RET)
        .bytes();
    let score = Code::new()
        .arg(op::GET_GLOBAL, 1)
        .arg(op::PUSH_ARG_LIST, 1)
        .arg(op::EXT_CALL, 4)
        .op(op::RET)
        .bytes();
    let script = ScriptDef {
        handlers: vec![HandlerDef::new(0, tick), HandlerDef::new(3, score)],
        globals: vec![1],
        ..Default::default()
    };
    assert_eq!(
        decompile(&["tick", "gScore", "beep", "score", "string"], script),
        "on tick\n  global gScore\n  set gScore = gScore + 1\n  beep(3)\nend\n\n\
         on score\n  global gScore\n  return string(gScore)\nend"
    );
}

#[test]
fn test_deep_nesting_still_renders() {
    let depth = 20;
    let end_pos = depth * 4 + 4;
    let mut code = Code::new();
    for _ in 0..depth {
        code = code.arg(op::GET_LOCAL, 0).arg(op::JMP_IF_Z, end_pos as u8);
    }
    let code = code
        .arg(op::PUSH_INT8, 1)
        .arg(op::SET_LOCAL, 0)
        .op(op::RET)
        .bytes();
    let script = ScriptDef {
        handlers: vec![HandlerDef::new(0, code).locals(&[1])],
        ..Default::default()
    };
    let text = decompile(&["deep", "x"], script);
    assert!(text.starts_with("on deep\n"));
    assert!(text.contains("set x = 1"));
    assert!(text.ends_with("end"));
}

#[test]
fn test_decompiling_twice_is_identical() {
    let mut movie = MovieBuilder::xfir();
    movie.add("Lnam", builder::names(&["pick", "x", "answer"]));
    movie.add("Lscr", pick_script(10, 14).build());
    let file = DirectorFile::from_bytes("movie.dxr", &movie.build()).unwrap();

    let first = file.decompile_scripts();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].1, PICK_SOURCE);
    assert_eq!(first, file.decompile_scripts());
}

#[test]
fn test_overlapping_ifs_keep_prior_statements() {
    // both ifs jump to 14, the inner one outlives the outer then branch
    let code = Code::new()
        .arg(op::PUSH_INT8, 5) // 0
        .arg(op::SET_LOCAL, 0) // 2
        .arg(op::GET_LOCAL, 0) // 4
        .arg(op::JMP_IF_Z, 14) // 6
        .arg(op::GET_LOCAL, 0) // 8
        .arg(op::JMP_IF_Z, 14) // 10
        .arg(op::JMP, 18) // 12
        .arg(op::PUSH_INT8, 7) // 14
        .arg(op::SET_LOCAL, 0) // 16
        .op(op::RET) // 18
        .bytes();
    let script = ScriptDef {
        handlers: vec![HandlerDef::new(0, code).locals(&[1])],
        ..Default::default()
    };
    let text = decompile(&["broken", "x"], script);
    assert!(text.starts_with("on broken\n  set x = 5\n  if x then\n"), "{}", text);
    assert!(text.ends_with("  else\n    set x = 7\n  end if\nend"), "{}", text);
}
