use std::path::Path;

use super::*;
use crate::{
    analysis::resolve_enclosing_scope,
    ide::IdePosition,
    repository::{ItemSet, ItemsRepository, RepositoryConfig},
    vfs::FileId,
};

/// Configuration of a file outside any project.
fn standalone() -> RepositoryConfig {
    RepositoryConfig::default()
}

fn segments(expression: &MemberExpression) -> Vec<&str> {
    expression.segments.iter().map(String::as_str).collect()
}

#[test]
fn dotted_chain_is_split_outermost_first() {
    let line = "    player.Weapon.Fi";
    let expression = parse_member_expression(line, line.len()).expect("member access");
    assert_eq!(segments(&expression), vec!["player", "Weapon"]);
    assert!(!expression.static_access);
}

#[test]
fn calls_and_indexing_are_skipped() {
    let line = "GetPlayer(GetClient(1)).items[idx + 1].";
    let expression = parse_member_expression(line, line.len()).expect("member access");
    assert_eq!(segments(&expression), vec!["GetPlayer", "items"]);
}

#[test]
fn double_colon_marks_static_access() {
    let line = "Database::Conn";
    let expression = parse_member_expression(line, line.len()).expect("member access");
    assert_eq!(segments(&expression), vec!["Database"]);
    assert!(expression.static_access);
}

#[test]
fn plain_words_are_not_member_access() {
    assert!(parse_member_expression("int value = other", 17).is_none());
    assert!(parse_member_expression("Tag:value", 9).is_none());
    assert!(parse_member_expression("(a + b).x", 9).is_none());
    assert!(parse_member_expression("", 0).is_none());
}

const SOURCE: &str = "methodmap Weapon {\n    property int Ammo {\n        public native get();\n    }\n}\nmethodmap Player {\n    property Weapon Active {\n        public native get();\n    }\n    public native Weapon Drop();\n}\nPlayer GetPlayer(int client) {\n    return view_as<Player>(client);\n}\nvoid F()\n{\n    Player p;\n}";

fn items_for(text: &str) -> (ItemSet, FileId) {
    let repository = ItemsRepository::new();
    let file = FileId::from_path(Path::new("/nonexistent/analysis/expression.sp"));
    repository.parse_text(&file, text, &standalone()).expect("parse");
    (repository.get_all_items(&file, &standalone()), file)
}

#[test]
fn chain_follows_property_and_method_types() {
    let (items, file) = items_for(SOURCE);
    let scope = resolve_enclosing_scope(&items, &file, IdePosition::new(16, 4));
    assert_eq!(scope.function.as_deref(), Some("F"));

    let line = "    p.Active.";
    let expression = parse_member_expression(line, line.len()).expect("member access");
    let resolved = resolve_expression_type(&expression, &items, &scope).expect("resolved");
    assert_eq!(resolved.type_name, "Weapon");
    assert!(!resolved.static_access);

    let line = "    GetPlayer(1).Drop().";
    let expression = parse_member_expression(line, line.len()).expect("member access");
    let resolved = resolve_expression_type(&expression, &items, &scope).expect("resolved");
    assert_eq!(resolved.type_name, "Weapon");
}

#[test]
fn type_names_resolve_as_static_receivers() {
    let (items, file) = items_for(SOURCE);
    let scope = resolve_enclosing_scope(&items, &file, IdePosition::new(16, 4));
    let line = "Player.";
    let expression = parse_member_expression(line, line.len()).expect("member access");
    let resolved = resolve_expression_type(&expression, &items, &scope).expect("resolved");
    assert_eq!(resolved.type_name, "Player");
    assert!(resolved.static_access);
}

#[test]
fn this_resolves_to_the_enclosing_container() {
    let text = "enum struct Point {\n    int x;\n    int Get() {\n        return this.x;\n    }\n}";
    let (items, file) = items_for(text);
    let scope = resolve_enclosing_scope(&items, &file, IdePosition::new(3, 8));
    let line = "        return this.";
    let expression = parse_member_expression(line, line.len()).expect("member access");
    let resolved = resolve_expression_type(&expression, &items, &scope).expect("resolved");
    assert_eq!(resolved.type_name, "Point");
}

#[test]
fn unknown_receiver_has_no_type() {
    let (items, file) = items_for(SOURCE);
    let scope = resolve_enclosing_scope(&items, &file, IdePosition::new(16, 4));
    let line = "missing.";
    let expression = parse_member_expression(line, line.len()).expect("member access");
    assert!(resolve_expression_type(&expression, &items, &scope).is_none());
}
