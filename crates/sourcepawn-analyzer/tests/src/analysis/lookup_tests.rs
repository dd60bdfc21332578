use std::path::Path;

use super::*;
use crate::repository::{ItemsRepository, RepositoryConfig};

/// Configuration of a file outside any project.
fn standalone() -> RepositoryConfig {
    RepositoryConfig::default()
}

fn items_for(text: &str) -> (ItemSet, FileId) {
    let repository = ItemsRepository::new();
    let file = FileId::from_path(Path::new("/nonexistent/analysis/lookup.sp"));
    repository.parse_text(&file, text, &standalone()).expect("parse");
    (repository.get_all_items(&file, &standalone()), file)
}

fn lookup<'i>(
    items: &'i ItemSet,
    file: &FileId,
    text: &str,
    line: u32,
    needle: &str,
) -> Vec<&'i Symbol> {
    let line_text = text.lines().nth(line as usize).expect("line");
    let column = line_text.find(needle).expect("needle") as u32;
    items_at_position(items, file, line_text, IdePosition::new(line, column + 1))
}

#[test]
fn word_at_uses_utf16_columns() {
    let word = word_at("é = counter;", 3, 5).expect("word");
    assert_eq!(word.word, "counter");
    assert_eq!(word.range, IdeRange::on_line(3, 4, 11));
    assert!(word_at("a  = b", 0, 2).is_none());
}

#[test]
fn access_kinds_are_classified() {
    let classify = |line: &str, needle: &str| {
        let column = line.find(needle).expect("needle") as u32;
        let word = word_at(line, 0, column).expect("word");
        classify_access(line, &word)
    };
    assert!(matches!(classify("player.Kick();", "Kick"), AccessKind::Member(_)));
    assert_eq!(classify("Timer t = new Timer(1.0);", "Timer(1"), AccessKind::Constructor);
    assert_eq!(classify("PrintToServer(\"hi\");", "PrintToServer"), AccessKind::Call);
    assert_eq!(classify("int renewal = value;", "value"), AccessKind::Bare);
}

#[test]
fn include_directives_are_recognised() {
    let angle = include_directive("#include <sdktools>").expect("angle include");
    assert_eq!(angle.kind, IncludeKind::Angle);
    assert_eq!(angle.path, "sdktools");
    assert_eq!((angle.start, angle.end), (10, 18));

    let quoted = include_directive("  #include \"helpers/colors.inc\"").expect("quoted include");
    assert_eq!(quoted.kind, IncludeKind::Quoted);
    assert_eq!(quoted.path, "helpers/colors.inc");
    assert!(include_directive("int include;").is_none());
}

const SOURCE: &str = "int value;\nmethodmap Base {\n    public native void Go();\n}\nmethodmap Derived < Base {}\nvoid F()\n{\n    int value;\n    Derived d;\n    d.Go();\n    value = 1;\n}\nvoid G()\n{\n    value = 2; // value\n    Log(\"value\");\n}\nvoid Log(const char[] text) {}";

#[test]
fn locals_shadow_globals() {
    let (items, file) = items_for(SOURCE);
    let found = lookup(&items, &file, SOURCE, 10, "value");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].parent, "F");

    let found = lookup(&items, &file, SOURCE, 14, "value");
    assert_eq!(found.len(), 1);
    assert!(found[0].is_global());
}

#[test]
fn member_access_follows_inheritance() {
    let (items, file) = items_for(SOURCE);
    let found = lookup(&items, &file, SOURCE, 9, "Go");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].parent, "Base");
    assert_eq!(found[0].kind, SymbolKind::Method);
}

#[test]
fn comments_and_strings_refer_to_nothing() {
    let (items, file) = items_for(SOURCE);
    let line_text = SOURCE.lines().nth(14).expect("line");
    let column = line_text.rfind("value").expect("needle") as u32;
    assert!(items_at_position(&items, &file, line_text, IdePosition::new(14, column + 1)).is_empty());

    let line_text = SOURCE.lines().nth(15).expect("line");
    let column = line_text.find("value").expect("needle") as u32;
    assert!(items_at_position(&items, &file, line_text, IdePosition::new(15, column + 1)).is_empty());
}

#[test]
fn calls_resolve_to_functions() {
    let (items, file) = items_for(SOURCE);
    let found = lookup(&items, &file, SOURCE, 15, "Log");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, SymbolKind::Function);
    assert_eq!(found[0].range.start.line, 17);
}

#[test]
fn declarations_resolve_to_themselves() {
    let (items, file) = items_for(SOURCE);
    let found = lookup(&items, &file, SOURCE, 2, "Go");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, SymbolKind::Method);
}
