use lexer_core::Document;
use lexer_core::fold::{FOLD_LEVEL_BASE, is_header, level_number};
use lexer_core_lang::LanguageSet;
use lexer_core_lexers::{LexerError, LexerSession, catalogue, r, rust};
use pretty_assertions::assert_eq;

fn bundled_session(name: &str) -> LexerSession {
    LexerSession::bundled(name).expect("bundled definition")
}

#[test]
fn test_every_bundled_definition_fits_its_lexer() {
    let set = LanguageSet::bundled().expect("bundled definitions parse");
    let catalogue = catalogue();
    for definition in set.iter() {
        let session = LexerSession::from_definition(definition).expect("keys match the lexer");
        assert_eq!(session.module().name, definition.lexer_name());
        assert!(catalogue.find_by_name(definition.lexer_name()).is_some());
        for key in definition.keywords.keys() {
            let index = session.module().word_list_index(key).expect("known key");
            assert!(!session.keywords()[index].is_empty(), "{} {key}", definition.name);
        }
    }
}

#[test]
fn test_definition_with_unknown_key_is_rejected() {
    let mut set = LanguageSet::new();
    let definition = set
        .load_from_str("name: odd\nlexer: r\nkeywords:\n  types: int\n")
        .expect("valid yaml");
    let err = LexerSession::from_definition(&definition).expect_err("r has no types set");
    assert!(matches!(err, LexerError::UnknownKeywordSet { lexer: "r", ref key } if key == "types"));

    let definition = set.load_from_str("name: cobol\n").expect("valid yaml");
    let err = LexerSession::from_definition(&definition).expect_err("no cobol lexer");
    assert_eq!(err.to_string(), "unknown lexer 'cobol'");
}

#[test]
fn test_definition_properties_reach_the_folder() {
    let session = bundled_session("rust");
    let text = "fn f() {\n\n}\n";
    let mut doc = Document::new(text);
    session.apply_properties(&mut doc);
    session.ensure_styled(&mut doc, text.len());

    let levels = doc.levels();
    assert!(is_header(levels[0]));
    // `fold.compact: false` in the bundled definition: blank lines are not white.
    assert_eq!(levels[1] & lexer_core::FOLD_LEVEL_WHITE_FLAG, 0);
    assert_eq!(level_number(levels[1]), FOLD_LEVEL_BASE + 1);
}

#[test]
fn test_ensure_styled_advances_end_styled() {
    let session = bundled_session("r");
    let text = "x <- 1\ny <- 2\nz <- 3\n";
    let mut doc = Document::new(text);

    session.ensure_styled(&mut doc, 8);
    assert_eq!(doc.end_styled(), 14);
    assert_eq!(doc.styles()[7], r::style::IDENTIFIER);
    assert_eq!(doc.styles()[14], r::style::DEFAULT);

    session.ensure_styled(&mut doc, text.len());
    assert_eq!(doc.end_styled(), text.len());
    assert_eq!(doc.styles()[14], r::style::IDENTIFIER);
}

#[test]
fn test_edit_restyles_from_the_edited_line() {
    let session = bundled_session("r");
    let mut doc = Document::new("x <- 1\ny <- 2\n");
    let len = doc.text().len();
    session.ensure_styled(&mut doc, len);

    doc.insert(7, b"if ");
    assert_eq!(doc.end_styled(), 7);
    let len = doc.text().len();
    session.ensure_styled(&mut doc, len);
    assert_eq!(&doc.styles()[7..9], &[r::style::KWORD; 2]);

    let mut fresh = Document::new(doc.text());
    session.ensure_styled(&mut fresh, len);
    assert_eq!(fresh.styles(), doc.styles());
}

#[test]
fn test_opening_a_string_restyles_following_lines() {
    let mut session = LexerSession::new(&rust::LEXER);
    session.set_keywords(0, "let");
    let mut doc = Document::new("let a = 1;\nlet b = 2;\n");
    let len = doc.text().len();
    session.ensure_styled(&mut doc, len);
    assert_eq!(doc.styles()[11], rust::style::WORD);

    doc.insert(8, b"\"");
    let len = doc.text().len();
    session.ensure_styled(&mut doc, len);
    assert_eq!(doc.styles()[12], rust::style::STRING);
    assert_eq!(doc.styles()[len - 1], rust::style::STRING);
}
