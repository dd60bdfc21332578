use std::path::Path;

use super::*;

/// Configuration of a file outside any project.
fn standalone() -> RepositoryConfig {
    RepositoryConfig::default()
}

const PLUGIN: &str = "/**\n * Adds numbers.\n * @param a  First.\n * @param b  Second.\n */\nint Add(int a, int b) { return a + b; }\nmethodmap Counter < Handle {\n    public native Counter(int start);\n    public native void Bump(int by, bool wrap);\n}\npublic void OnPluginStart()\n{\n    Counter c = new Counter(1);\n    \n}";

fn provider() -> (SignatureHelpProvider, FileId) {
    let repository = Arc::new(ItemsRepository::new());
    let file = FileId::from_path(Path::new("/nonexistent/signature/plugin.sp"));
    repository.parse_text(&file, PLUGIN, &standalone()).expect("parse");
    (SignatureHelpProvider::new(repository), file)
}

/// Signature help with line 13 replaced by `typed` and the cursor at its end.
fn help_at(typed: &str) -> Option<SignatureHelp> {
    let (provider, file) = provider();
    let mut lines: Vec<&str> = PLUGIN.lines().collect();
    lines[13] = typed;
    let text = lines.join("\n");
    provider.provide(&file, &standalone(), &text, Position::new(13, typed.encode_utf16().count() as u32))
}

fn param_names(signature: &SignatureInformation) -> Vec<String> {
    signature
        .parameters
        .iter()
        .flatten()
        .map(|param| match &param.label {
            ParameterLabel::Simple(name) => name.clone(),
            ParameterLabel::LabelOffsets(_) => String::new(),
        })
        .collect()
}

#[test]
fn function_signature_with_documented_params() {
    let help = help_at("    Add(1, ").expect("signature help");
    assert_eq!(help.active_parameter, Some(1));
    let signature = &help.signatures[0];
    assert_eq!(signature.label, "int Add(int a, int b)");
    assert_eq!(param_names(signature), vec!["a", "b"]);
    let documentation = signature.parameters.as_ref().and_then(|params| params[0].documentation.clone());
    assert_eq!(documentation, Some(Documentation::String("First.".to_string())));
}

#[test]
fn method_signature_through_receiver_type() {
    let help = help_at("    c.Bump(2, ").expect("signature help");
    assert_eq!(help.signatures.len(), 1);
    assert_eq!(help.signatures[0].label, "public native void Bump(int by, bool wrap)");
    assert_eq!(param_names(&help.signatures[0]), vec!["by", "wrap"]);
    assert_eq!(help.active_parameter, Some(1));
}

#[test]
fn constructor_signature_after_new() {
    let help = help_at("    Counter d = new Counter(").expect("signature help");
    assert_eq!(help.signatures[0].label, "public native Counter(int start)");
    assert_eq!(help.active_parameter, Some(0));
}

#[test]
fn control_statements_and_closed_calls_have_no_signature() {
    assert!(help_at("    if (").is_none());
    assert!(help_at("    Add(1, 2)").is_none());
    assert!(help_at("    Unknown(").is_none());
}
