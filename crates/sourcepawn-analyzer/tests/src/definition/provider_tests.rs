use std::path::PathBuf;

use super::*;

/// Configuration of a file outside any project.
fn standalone() -> RepositoryConfig {
    RepositoryConfig::default()
}

const PLUGIN: &str = "#include \"shared\"\nint g_Items[MAX_ITEMS];\npublic void OnPluginStart()\n{\n    int limit = MAX_ITEMS;\n    Reset();\n}\nvoid Reset() {}";
const SHARED: &str = "#define MAX_ITEMS 64\nint g_Shared = MAX_ITEMS;";

fn workspace(name: &str) -> (PathBuf, DefinitionProvider, FileId) {
    let root = std::env::temp_dir().join(format!("sourcepawn-definition-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).expect("create temp workspace");
    std::fs::write(root.join("plugin.sp"), PLUGIN).expect("write plugin");
    std::fs::write(root.join("shared.inc"), SHARED).expect("write include");

    let repository = Arc::new(ItemsRepository::new());
    repository.parse_file(&root.join("plugin.sp"), &standalone()).expect("parse plugin");
    let file = FileId::from_path(&root.join("plugin.sp"));
    (root, DefinitionProvider::new(repository), file)
}

fn single(target: Option<NavigationTarget>) -> IdeLocation {
    match target {
        Some(NavigationTarget::Single(location)) => location,
        other => panic!("expected one location, got {other:?}"),
    }
}

fn line(index: usize) -> &'static str {
    PLUGIN.lines().nth(index).expect("line")
}

#[test]
fn constants_resolve_into_included_files() {
    let (root, provider, file) = workspace("constants_resolve_into_included_files");
    let location = single(provider.definition(&file, &standalone(), line(4), IdePosition::new(4, 18)));
    assert_eq!(location.file, FileId::from_path(&root.join("shared.inc")));
    assert_eq!(location.range, IdeRange::on_line(0, 8, 17));
}

#[test]
fn calls_resolve_to_later_declarations() {
    let (_, provider, file) = workspace("calls_resolve_to_later_declarations");
    let location = single(provider.definition(&file, &standalone(), line(5), IdePosition::new(5, 6)));
    assert_eq!(location.file, file);
    assert_eq!(location.range, IdeRange::on_line(7, 5, 10));
}

#[test]
fn include_lines_jump_to_the_included_file() {
    let (root, provider, file) = workspace("include_lines_jump_to_the_included_file");
    let location = single(provider.definition(&file, &standalone(), line(0), IdePosition::new(0, 12)));
    assert_eq!(location.file, FileId::from_path(&root.join("shared.inc")));
    assert_eq!(location.range, IdeRange::on_line(0, 0, 0));
}

#[test]
fn unknown_words_have_no_definition() {
    let (_, provider, file) = workspace("unknown_words_have_no_definition");
    assert!(provider.definition(&file, &standalone(), "    Missing();", IdePosition::new(5, 6)).is_none());
    assert!(provider.definition(&file, &standalone(), line(3), IdePosition::new(3, 0)).is_none());
}
