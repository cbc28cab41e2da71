// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use ncmachine::ast::*;
use ncmachine::parse::{self, classify, FileFormatError, LineKind};
use proptest::prelude::*;

#[test]
fn test_parse() {
    let src = "%
O1234
(a comment line)
N10 g21 g90
N20 G00 X10 Y-5.5 Z2
X3 G01 Y4 F100

M03 S1000
  T1   M06\t
%
";

    let parsed = "O1234
G21 G90
G00 X10 Y-5.5 Z2
G01 Y4 F100
M03 S1000
T1 M06
";

    let prog = parse::parse("testfile", src).unwrap();

    // make sure we count lines correctly
    assert_eq!(prog.blocks[0].lineno, 4);
    assert_eq!(prog.blocks[3].lineno, 8);

    assert_eq!(prog.number, Some(1234));
    assert_eq!(prog.blocks.len(), 5);
    assert_eq!(prog.command_count(), 8);
    assert_eq!(prog.to_string(), parsed);
}

#[test]
fn test_markers() {
    for (src, count) in &[
        ("", 0),
        ("G21\n", 0),
        ("%\nG21\n", 1),
        ("%\nG21\n%\n%\n", 3),
        ("%\n%\n%\n%\n", 4),
    ] {
        match parse::parse("testfile", src) {
            Err(FileFormatError::MarkerCount(n)) => assert_eq!(n, *count),
            other => panic!("{:?} should fail, got {:?}", src, other.map(|p| p.blocks.len())),
        }
    }
    // markers may be anywhere, and lines merely containing % are no markers
    let prog = parse::parse("testfile", "G21\n%\n G90 %\n%\nG91\n").unwrap();
    assert_eq!(prog.blocks.len(), 3);
}

#[test]
fn test_program_number() {
    let err = parse::parse("testfile", "%\nO1\nG21\nO2\n%\n").unwrap_err();
    assert!(matches!(err, FileFormatError::MultipleProgramNumbers { lineno: 4 }));

    // not a valid program number: ignored code lines
    let prog = parse::parse("testfile", "%\nO12A\nO0\nO\n%\n").unwrap();
    assert_eq!(prog.number, None);
    assert!(prog.blocks.is_empty());

    let prog = parse::parse("testfile", "%\nO0055\n%\n").unwrap();
    assert_eq!(prog.number, Some(55));

    // only an upper-case O declares the number, code words are case-insensitive
    let prog = parse::parse("testfile", "%\no0055\ng0 x1\n%\n").unwrap();
    assert_eq!(prog.number, None);
    assert_eq!(prog.to_string(), "G0 X1\n");
}

#[test]
fn test_line_endings() {
    let prog = parse::parse("testfile", "%\rG21\rG90\r%\r").unwrap();
    assert_eq!(prog.blocks.len(), 2);
    assert_eq!(prog.blocks[1].lineno, 3);

    let prog = parse::parse("testfile", "%\r\nO7\r\nG21 G90\r\n%\r\n").unwrap();
    assert_eq!(prog.number, Some(7));
    assert_eq!(prog.blocks[0].lineno, 3);

    assert!(matches!(parse::parse("testfile", "%\rG21\r%\r%\r"),
                     Err(FileFormatError::MarkerCount(3))));
}

#[test]
fn test_parameter_attachment() {
    let prog = parse::parse("testfile", "%
X10 G01
G01 X1 M03 Y2
M03 X1 G00 Z4
I1 J2 F3 G02 X4 I5 J6 R7
%
").unwrap();
    let cmds = |n: usize| &prog.blocks[n].commands;

    assert_eq!(cmds(0), &vec![Command::new(Letter::G, "01")]);

    assert_eq!(cmds(1), &vec![
        Command::new(Letter::G, "01").with_param(Word::X, 1.),
        Command::new(Letter::M, "03").with_param(Word::Y, 2.),
    ]);

    assert_eq!(cmds(2), &vec![
        Command::new(Letter::M, "03"),
        Command::new(Letter::G, "00").with_param(Word::Z, 4.),
    ]);

    // R is not collected by the block parser
    assert_eq!(cmds(3), &vec![
        Command::new(Letter::G, "02")
            .with_param(Word::X, 4.).with_param(Word::I, 5.).with_param(Word::J, 6.),
    ]);
}

#[test]
fn test_ignored_tokens() {
    let prog = parse::parse("testfile", "%
N5
(only a comment)
   (indented comment)
G01 (INLINE) X1 P5 Q2 ; 12
Q1 W5
%
").unwrap();
    assert_eq!(prog.blocks.len(), 1);
    assert_eq!(prog.blocks[0].lineno, 5);
    assert_eq!(prog.blocks[0].commands,
               vec![Command::new(Letter::G, "01").with_param(Word::X, 1.)]);
}

#[test]
fn test_invalid_value() {
    for snippet in &[
        "%\nG01 XABC\n%\n",
        "%\nG01 X\n%\n",
        "%\nG00 Y1.2.3\n%\n",
    ] {
        let err = parse::parse("testfile", snippet).unwrap_err();
        assert!(matches!(err, FileFormatError::Syntax(_)), "{}", snippet);
        assert!(err.to_string().contains("testfile"));
    }
    // values of dropped words are never looked at
    assert!(parse::parse("testfile", "%\nM03 XABC\n%\n").is_ok());
}

#[test]
fn test_classify() {
    assert_eq!(classify("%"), LineKind::Marker);
    assert_eq!(classify("%junk"), LineKind::Marker);
    assert_eq!(classify(" %"), LineKind::Code);
    assert_eq!(classify("(HELLO)"), LineKind::Comment);
    assert_eq!(classify("()"), LineKind::Comment);
    assert_eq!(classify("("), LineKind::Code);
    assert_eq!(classify("(OPEN"), LineKind::Code);
    assert_eq!(classify("O77"), LineKind::ProgramNumber(77));
    assert_eq!(classify("o77"), LineKind::Code);
    assert_eq!(classify("O"), LineKind::Code);
    assert_eq!(classify("OX1"), LineKind::Code);
    assert_eq!(classify("G01 X1"), LineKind::Code);
}

#[test]
fn test_bounds() {
    let prog = parse::parse("testfile", "%
G00 X-2 Y3
G01 X10 Y-4
G02 X5 Y1 I1 J1
%
").unwrap();
    let b = prog.bounds().unwrap();
    assert_eq!(b, Bounds { x_min: -2., x_max: 10., y_min: -4., y_max: 3. });
    assert_eq!(b.width(), 12.);
    assert_eq!(b.height(), 7.);

    let prog = parse::parse("testfile", "%\nG00 X1 Z2\n%\n").unwrap();
    assert_eq!(prog.bounds(), None);
}

fn words(axes: &[(usize, i32)]) -> String {
    axes.iter().map(|&(a, n)| format!("{}{}", ["X", "Y", "Z"][a], n)).collect::<Vec<_>>().join(" ")
}

proptest! {
    #[test]
    fn wrong_marker_count_fails(markers in 0usize..6,
                                lines in prop::collection::vec("G0[0-3] X[0-9]{1,3}", 0..8)) {
        prop_assume!(markers != 2);
        let mut src = "%\n".repeat(markers);
        for line in &lines {
            src.push_str(line);
            src.push('\n');
        }
        match parse::parse("prop", &src) {
            Err(FileFormatError::MarkerCount(n)) => { prop_assert_eq!(n, markers); }
            other => { prop_assert!(false, "unexpected {:?}", other.map(|p| p.blocks.len())); }
        }
    }

    #[test]
    fn params_before_first_g_are_dropped(
        pre in prop::collection::vec((0usize..3, -100i32..100), 0..4),
        post in prop::collection::vec((0usize..3, -100i32..100), 0..4),
    ) {
        let src = format!("%\n{} G01 {}\n%\n", words(&pre), words(&post));
        let prog = parse::parse("prop", &src).unwrap();
        prop_assert_eq!(prog.blocks.len(), 1);
        let cmd = &prog.blocks[0].commands[0];
        prop_assert_eq!(cmd.params.len(), post.len());
        for (par, &(a, n)) in cmd.params.iter().zip(&post) {
            prop_assert_eq!(par.word.to_string(), ["X", "Y", "Z"][a]);
            prop_assert_eq!(par.value, n as f64);
        }
    }

    #[test]
    fn one_block_per_code_line(codes in prop::collection::vec("[GMTS][0-9]{1,2}", 0..20)) {
        let src = format!("%\n{}\n%\n", codes.join("\n"));
        let prog = parse::parse("prop", &src).unwrap();
        prop_assert_eq!(prog.blocks.len(), codes.len());
        prop_assert_eq!(prog.command_count(), codes.len());
        for (block, code) in prog.blocks.iter().zip(&codes) {
            prop_assert_eq!(block.commands.len(), 1);
            prop_assert_eq!(&block.commands[0].to_string(), code);
        }
    }
}
