use std::path::Path;

use super::*;

/// Configuration of a file outside any project.
fn standalone() -> RepositoryConfig {
    RepositoryConfig::default()
}

const PLUGIN: &str = "methodmap Base {\n    public native void Go();\n    public static native Base Find(const char[] name);\n}\nmethodmap Derived < Base {\n    public native Derived(int id);\n}\nforward void OnClientReady(int client, const char[] auth);\nint g_Total;\nvoid F()\n{\n    int x;\n    Derived d = new Derived(1);\n    \n}\nvoid G()\n{\n    \n}";

fn provider_for(text: &str) -> (CompletionProvider, FileId) {
    let repository = Arc::new(ItemsRepository::new());
    let file = FileId::from_path(Path::new("/nonexistent/completion/plugin.sp"));
    repository.parse_text(&file, text, &standalone()).expect("parse");
    (CompletionProvider::new(repository), file)
}

fn complete(
    provider: &CompletionProvider,
    file: &FileId,
    line_index: u32,
    line: &str,
    trigger: Option<&str>,
) -> Vec<CompletionItem> {
    provider.provide(CompletionRequest {
        file,
        config: &standalone(),
        line,
        next_line: None,
        position: Position::new(line_index, line.encode_utf16().count() as u32),
        trigger,
        snippets: true,
    })
}

fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|item| item.label.as_str()).collect()
}

#[test]
fn locals_are_offered_only_inside_their_function() {
    let (provider, file) = provider_for(PLUGIN);

    let in_f = complete(&provider, &file, 13, "    ", None);
    let in_f = labels(&in_f);
    for expected in ["x", "d", "g_Total", "F", "G", "Base", "Derived", "OnClientReady"] {
        assert!(in_f.contains(&expected), "missing {expected} in {in_f:?}");
    }
    assert!(!in_f.contains(&"Go"));

    let in_g = complete(&provider, &file, 17, "    ", None);
    let in_g = labels(&in_g);
    assert!(in_g.contains(&"g_Total"));
    assert!(!in_g.contains(&"x"));
    assert!(!in_g.contains(&"d"));
}

#[test]
fn members_include_inherited_instance_methods() {
    let (provider, file) = provider_for(PLUGIN);
    let items = complete(&provider, &file, 13, "    d.", Some("."));
    assert_eq!(labels(&items), vec!["Go"]);
    assert_eq!(items[0].kind, Some(CompletionItemKind::METHOD));
}

#[test]
fn type_receivers_only_see_static_members() {
    let (provider, file) = provider_for(PLUGIN);
    assert_eq!(labels(&complete(&provider, &file, 13, "    Base.", Some("."))), vec!["Find"]);
    assert_eq!(labels(&complete(&provider, &file, 13, "    Derived::", Some(":"))), vec!["Find"]);
}

#[test]
fn constructors_preselect_the_assigned_type() {
    let (provider, file) = provider_for(PLUGIN);

    let items = complete(&provider, &file, 13, "    Derived e = new ", Some(" "));
    assert_eq!(labels(&items), vec!["Derived"]);
    assert_eq!(items[0].preselect, Some(true));

    let items = complete(&provider, &file, 13, "    d = new ", Some(" "));
    assert_eq!(items[0].preselect, Some(true));

    let items = complete(&provider, &file, 13, "    Base b = new ", Some(" "));
    assert_eq!(items[0].preselect, None);
}

#[test]
fn dollar_expands_forward_callbacks() {
    let (provider, file) = provider_for(PLUGIN);
    let items = complete(&provider, &file, 13, "$", Some("$"));
    assert_eq!(labels(&items), vec!["OnClientReady"]);
    let Some(CompletionTextEdit::Edit(edit)) = &items[0].text_edit else {
        panic!("snippet without text edit");
    };
    assert_eq!(edit.range, Range::new(Position::new(13, 0), Position::new(13, 1)));
    assert_eq!(edit.new_text, "public void OnClientReady(int client, const char[] auth)\n{\n\t$0\n}");

    let disabled = provider.provide(CompletionRequest {
        file: &file,
        config: &standalone(),
        line: "$",
        next_line: None,
        position: Position::new(13, 1),
        trigger: Some("$"),
        snippets: false,
    });
    assert!(disabled.is_empty());
}

#[test]
fn nothing_is_offered_inside_strings() {
    let (provider, file) = provider_for(PLUGIN);
    assert!(complete(&provider, &file, 13, "    PrintToServer(\"g_", None).is_empty());
}

#[test]
fn include_paths_list_files_and_folders() {
    let root = std::env::temp_dir().join(format!("sourcepawn-completion-includes-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join("include/lib")).expect("create temp workspace");
    for relative in ["plugin.sp", "include/colors.inc", "include/lib/util.inc"] {
        std::fs::write(root.join(relative), "").expect("write fixture");
    }

    let repository = Arc::new(ItemsRepository::new());
    for relative in ["plugin.sp", "include/colors.inc", "include/lib/util.inc"] {
        repository.add_document(FileId::from_path(&root.join(relative)));
    }
    let provider = CompletionProvider::new(repository);
    let file = FileId::from_path(&root.join("plugin.sp"));

    let items = complete(&provider, &file, 0, "#include <", Some("<"));
    let colors = items.iter().find(|item| item.label == "colors").expect("colors include");
    assert_eq!(colors.kind, Some(CompletionItemKind::FILE));
    assert_eq!(colors.insert_text.as_deref(), Some("colors>"));
    let lib = items.iter().find(|item| item.label == "lib").expect("lib folder");
    assert_eq!(lib.kind, Some(CompletionItemKind::FOLDER));

    let items = complete(&provider, &file, 0, "#include \"lib/", Some("/"));
    assert_eq!(labels(&items), vec!["util"]);
    assert_eq!(items[0].insert_text.as_deref(), Some("util\""));
}

#[test]
fn doc_opener_above_a_function_offers_a_skeleton() {
    let (provider, file) = provider_for(PLUGIN);
    let config = standalone();
    let request = |next_line: Option<&'static str>| CompletionRequest {
        file: &file,
        config: &config,
        line: "/**",
        next_line,
        position: Position::new(8, 3),
        trigger: Some("*"),
        snippets: true,
    };

    let items = provider.provide(request(Some("void G(int round)")));
    assert_eq!(labels(&items), vec!["Generate docstring"]);
    assert_eq!(items[0].insert_text_format, Some(InsertTextFormat::SNIPPET));

    assert!(provider.provide(request(Some("int g_Total;"))).is_empty());
    assert!(provider.provide(request(None)).is_empty());
}
