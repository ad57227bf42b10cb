use lexer_core::fold::{FOLD_LEVEL_BASE, is_header, level_number, packed_next_level};
use lexer_core::line_state::LineState;
use lexer_core::{Document, LexerModule};
use lexer_core_lexers::{LexerSession, gibiane, haskell, r, rust, scss, sql, tcl};
use pretty_assertions::assert_eq;

/// Style `text` in one pass with the given keyword sets.
fn styled(module: &'static LexerModule, keywords: &[(usize, &str)], text: &str) -> Document {
    let mut session = LexerSession::new(module);
    for (index, words) in keywords {
        session.set_keywords(*index, words);
    }
    let mut doc = Document::new(text).with_property("fold", "1");
    let len = doc.text().len();
    session.style_range(&mut doc, 0..len);
    doc
}

fn styles_of(doc: &Document, range: std::ops::Range<usize>) -> Vec<u8> {
    doc.styles()[range].to_vec()
}

#[test]
fn test_rust_comment_then_function() {
    use rust::style::*;
    let doc = styled(&rust::LEXER, &[(0, "fn let")], "// doc\nfn f() {}");

    assert_eq!(styles_of(&doc, 0..7), vec![COMMENTLINE; 7]);
    assert_eq!(
        styles_of(&doc, 7..16),
        vec![WORD, WORD, DEFAULT, IDENTIFIER, OPERATOR, OPERATOR, DEFAULT, OPERATOR, OPERATOR]
    );
    // The braces open and close on the same line.
    let level = doc.levels()[1];
    assert_eq!(level_number(level), FOLD_LEVEL_BASE);
    assert_eq!(packed_next_level(level), FOLD_LEVEL_BASE);
    assert!(!is_header(level));
}

#[test]
fn test_rust_block_folds_across_lines() {
    let doc = styled(&rust::LEXER, &[(0, "fn")], "fn f() {\n    g();\n}\n");
    let levels = doc.levels();
    assert!(is_header(levels[0]));
    assert_eq!(level_number(levels[0]), FOLD_LEVEL_BASE);
    assert_eq!(level_number(levels[1]), FOLD_LEVEL_BASE + 1);
    assert_eq!(level_number(levels[2]), FOLD_LEVEL_BASE + 1);
    assert_eq!(packed_next_level(levels[2]), FOLD_LEVEL_BASE);
}

#[test]
fn test_rust_nested_comment_survives_restart() {
    use rust::style::*;
    let text = "/+ a /+ b\n+/ c\n+/ x";
    let mut session = LexerSession::new(&rust::LEXER);
    let mut doc = Document::new(text);
    session.colourise(&mut doc, 0..10);
    session.colourise(&mut doc, 10..15);
    session.colourise(&mut doc, 15..text.len());
    assert_eq!(rust::NestingDepth::unpack(doc.line_states()[0]), rust::NestingDepth(2));
    assert_eq!(rust::NestingDepth::unpack(doc.line_states()[1]), rust::NestingDepth(1));
    assert_eq!(styles_of(&doc, 0..17), vec![COMMENTNESTED; 17]);
    assert_eq!(doc.styles()[18], IDENTIFIER);
    session.set_keywords(0, "x");
    session.colourise(&mut doc, 15..text.len());
    assert_eq!(doc.styles()[18], WORD);
}

#[test]
fn test_haskell_qualified_import() {
    use haskell::style::*;
    let text = "-- x\nimport qualified Foo as Bar\n";
    let doc = styled(&haskell::LEXER, &[(0, "import module where")], text);

    assert_eq!(styles_of(&doc, 0..4), vec![COMMENTLINE; 4]);
    let line = 5;
    assert_eq!(styles_of(&doc, line..line + 6), vec![KEYWORD; 6]);
    assert_eq!(styles_of(&doc, line + 7..line + 16), vec![KEYWORD; 9]);
    assert_eq!(styles_of(&doc, line + 17..line + 20), vec![MODULE; 3]);
    assert_eq!(styles_of(&doc, line + 21..line + 23), vec![KEYWORD; 2]);
    assert_eq!(styles_of(&doc, line + 24..line + 27), vec![MODULE; 3]);

    let state = haskell::HaskellState::unpack(doc.line_states()[1]);
    assert_eq!(state.mode, haskell::Mode::Import2);
}

#[test]
fn test_haskell_colon_operators() {
    use haskell::style::*;
    let doc = styled(&haskell::LEXER, &[], "a :: b\nx :+ y\n");
    assert_eq!(styles_of(&doc, 2..4), vec![OPERATOR; 2]);
    assert_eq!(styles_of(&doc, 9..11), vec![CAPITAL; 2]);
}

#[test]
fn test_haskell_block_comment_spans_lines() {
    use haskell::style::*;
    let text = "{- a {- b -}\nc -}\nd";
    let doc = styled(&haskell::LEXER, &[], text);
    assert_eq!(styles_of(&doc, 0..17), vec![COMMENTBLOCK; 17]);
    assert_eq!(haskell::HaskellState::unpack(doc.line_states()[0]).xmode, 1);
    assert_eq!(doc.styles()[18], IDENTIFIER);
}

#[test]
fn test_tcl_braced_command() {
    use tcl::style::*;
    let doc = styled(&tcl::LEXER, &[(0, "puts set")], "{puts \"hi\"}");
    assert_eq!(
        doc.styles(),
        &[OPERATOR, WORD, WORD, WORD, WORD, DEFAULT, IN_QUOTE, IN_QUOTE, IN_QUOTE, IN_QUOTE, OPERATOR]
    );
}

#[test]
fn test_tcl_folds_braces_while_colourising() {
    let text = "proc p {} {\n    puts a\n}\n";
    let doc = styled(&tcl::LEXER, &[(0, "proc puts")], text);
    let levels = doc.levels();
    assert!(is_header(levels[0]));
    assert_eq!(level_number(levels[1]), FOLD_LEVEL_BASE + 1);
    assert_eq!(levels[2] >> 17, 0);
    let state = tcl::TclState::unpack(doc.line_states()[0]);
    assert_eq!(state.mode, tcl::LineMode::Default);
}

#[test]
fn test_tcl_second_keyword_group_overrides() {
    use tcl::style::*;
    let doc = styled(&tcl::LEXER, &[(0, "puts"), (5, "puts")], "puts x\n");
    assert_eq!(styles_of(&doc, 0..4), vec![WORD5; 4]);
}

#[test]
fn test_scss_rule() {
    use scss::style::*;
    let doc = styled(&scss::LEXER, &[(0, "color")], ".foo { color: red; }");
    let mut expected = vec![OPERATOR, CLASS, CLASS, CLASS, TAG, OPERATOR];
    expected.extend([IDENTIFIER; 6]);
    expected.push(OPERATOR);
    expected.extend([VALUE; 4]);
    expected.extend([OPERATOR, IDENTIFIER, OPERATOR]);
    assert_eq!(doc.styles(), expected.as_slice());
}

#[test]
fn test_scss_unknown_property() {
    use scss::style::*;
    let doc = styled(&scss::LEXER, &[(0, "color")], "a { colr: red; }");
    assert_eq!(styles_of(&doc, 3..8), vec![UNKNOWN_IDENTIFIER; 5]);
}

#[test]
fn test_scss_folds_braces() {
    let doc = styled(&scss::LEXER, &[(0, "color")], "a {\n  color: red;\n}\n");
    let levels = doc.levels();
    assert!(is_header(levels[0]));
    assert_eq!(level_number(levels[1]), FOLD_LEVEL_BASE + 1);
    assert_eq!(level_number(levels[3]), FOLD_LEVEL_BASE);
}

const GIBIANE_BLOCK: &str = "* comment\nSI X = 1;\n  toto = 2;\nFINSI;\n";

#[test]
fn test_gibiane_comment_and_block() {
    use gibiane::style::*;
    let doc = styled(&gibiane::LEXER, &[(0, "si sinon finsi")], GIBIANE_BLOCK);

    assert_eq!(styles_of(&doc, 0..9), vec![COMMENT; 9]);
    assert_eq!(styles_of(&doc, 10..12), vec![WORD; 2]);
    assert_eq!(doc.styles()[29], NUMBER);
    assert_eq!(styles_of(&doc, 32..37), vec![WORD; 5]);

    let levels = doc.levels();
    assert!(is_header(levels[1]));
    assert_eq!(level_number(levels[1]), FOLD_LEVEL_BASE);
    assert_eq!(level_number(levels[2]), FOLD_LEVEL_BASE + 1);
    assert_eq!(level_number(levels[3]), FOLD_LEVEL_BASE + 1);
    assert_eq!(level_number(levels[4]), FOLD_LEVEL_BASE);
}

#[test]
fn test_gibiane_quoted_operator() {
    use gibiane::style::*;
    let doc = styled(&gibiane::LEXER, &[(7, "et ou")], "A = B 'ET' C;\n");
    assert_eq!(styles_of(&doc, 6..10), vec![WORD8; 4]);
}

#[test]
fn test_keyword_priority_first_set_wins() {
    use gibiane::style::*;
    let doc = styled(&gibiane::LEXER, &[(1, "abc"), (3, "abc")], "abc;\n");
    assert_eq!(styles_of(&doc, 0..3), vec![WORD2; 3]);

    let doc = styled(&r::LEXER, &[(0, "foo"), (2, "foo")], "foo(1)\n");
    assert_eq!(styles_of(&doc, 0..3), vec![r::style::KWORD; 3]);
}

#[test]
fn test_r_tokens() {
    use r::style::*;
    let doc = styled(&r::LEXER, &[(1, "paste")], "x <- paste(\"a\\\"b\", 'c') %in% y # n\n");
    assert_eq!(doc.styles()[0], IDENTIFIER);
    assert_eq!(styles_of(&doc, 2..4), vec![OPERATOR; 2]);
    assert_eq!(styles_of(&doc, 5..10), vec![BASEKWORD; 5]);
    assert_eq!(styles_of(&doc, 11..17), vec![STRING; 6]);
    assert_eq!(styles_of(&doc, 19..22), vec![STRING2; 3]);
    assert_eq!(styles_of(&doc, 24..28), vec![INFIX; 4]);
    assert_eq!(styles_of(&doc, 31..34), vec![COMMENT; 3]);
}

#[test]
fn test_r_open_infix_ends_at_line_end() {
    use r::style::*;
    let doc = styled(&r::LEXER, &[], "a %op\nb\n");
    assert_eq!(styles_of(&doc, 2..6), vec![INFIXEOL; 4]);
    assert_eq!(doc.styles()[6], IDENTIFIER);
}

#[test]
fn test_brace_fold_round_trip() {
    let doc = styled(&r::LEXER, &[], "{\n{\n}\n}\n");
    let levels = doc.levels();
    let numbers: Vec<i32> = levels[..4].iter().map(|&l| level_number(l)).collect();
    assert_eq!(
        numbers,
        vec![FOLD_LEVEL_BASE, FOLD_LEVEL_BASE + 1, FOLD_LEVEL_BASE + 2, FOLD_LEVEL_BASE + 1]
    );
    assert!(is_header(levels[0]) && is_header(levels[1]));
    assert!(!is_header(levels[2]) && !is_header(levels[3]));
    assert_eq!(packed_next_level(levels[3]), FOLD_LEVEL_BASE);
}

// Documents existing behaviour: unbalanced braces are not repaired.
#[test]
fn test_unbalanced_braces_are_tolerated() {
    let doc = styled(&r::LEXER, &[], "{\n{\n{\n");
    let numbers: Vec<i32> = doc.levels()[..3].iter().map(|&l| level_number(l)).collect();
    assert_eq!(numbers, vec![FOLD_LEVEL_BASE, FOLD_LEVEL_BASE + 1, FOLD_LEVEL_BASE + 2]);

    let doc = styled(&r::LEXER, &[], "}\n}\n");
    assert_eq!(packed_next_level(doc.levels()[1]), FOLD_LEVEL_BASE - 2);
}

#[test]
fn test_sql_statement() {
    use sql::style::*;
    let doc = styled(&sql::LEXER, &[(0, "select from")], "SELECT a FROM t; -- x\n");
    assert_eq!(styles_of(&doc, 0..6), vec![WORD; 6]);
    assert_eq!(doc.styles()[7], IDENTIFIER);
    assert_eq!(styles_of(&doc, 9..13), vec![WORD; 4]);
    assert_eq!(doc.styles()[15], OPERATOR);
    assert_eq!(styles_of(&doc, 17..21), vec![COMMENTLINE; 4]);
    assert_eq!(doc.styles()[21], DEFAULT);
}

#[test]
fn test_sql_sqlplus_abbreviations() {
    use sql::style::*;
    let doc = styled(&sql::LEXER, &[(3, "desc~ribe")], "rem note\ndesc t\n");
    assert_eq!(styles_of(&doc, 0..8), vec![SQLPLUS_COMMENT; 8]);
    assert_eq!(styles_of(&doc, 9..13), vec![SQLPLUS; 4]);
}

#[test]
fn test_sql_begin_end_fold() {
    let doc = styled(&sql::LEXER, &[(0, "begin end")], "begin\n  x;\nend;\n");
    let levels = doc.levels();
    assert!(is_header(levels[0]));
    assert_eq!(level_number(levels[1]), FOLD_LEVEL_BASE + 1);
    assert_eq!(level_number(levels[2]), FOLD_LEVEL_BASE + 1);
    assert_eq!(packed_next_level(levels[2]), FOLD_LEVEL_BASE);
}
