use std::path::Path;

use super::*;
use crate::{
    ide::IdeRange,
    symbols::{ParamDoc, Symbol, SymbolKind},
};

fn file() -> FileId {
    FileId::from_path(Path::new("/nonexistent/plugin/test.sp"))
}

fn parse(text: &str) -> FileTable {
    let context = ParseContext::new(&NoIncludes);
    let output = parse_text(text, file(), &context);
    assert!(output.failure.is_none(), "scanner failed: {:?}", output.failure);
    output.table
}

fn named<'t>(
    table: &'t FileTable,
    kind: SymbolKind,
    name: &str,
) -> Vec<&'t Symbol> {
    table.symbols().iter().filter(|symbol| symbol.kind == kind && symbol.name == name).collect()
}

fn single<'t>(
    table: &'t FileTable,
    kind: SymbolKind,
    name: &str,
) -> &'t Symbol {
    let found = named(table, kind, name);
    assert_eq!(found.len(), 1, "expected exactly one {kind:?} named {name}");
    found[0]
}

#[test]
fn documented_native_gets_description_and_params() {
    let table = parse("/** Desc.\n * @param a First.\n */\nnative void F(int a);");
    let function = single(&table, SymbolKind::Function, "F");
    assert!(!function.description.is_empty());
    assert_eq!(function.params, vec![ParamDoc::new("a", "First.")]);
    assert_eq!(function.detail, "native void F(int a)");
    assert_eq!(function.range, IdeRange::on_line(3, 12, 13));
}

#[test]
fn unterminated_parameter_list_yields_no_function() {
    let table = parse("native void F(int a,");
    assert!(named(&table, SymbolKind::Function, "F").is_empty());

    let mut text = String::from("native void G(int a,\n");
    for _ in 0..40 {
        text.push_str("    int b,\n");
    }
    let table = parse(&text);
    assert!(named(&table, SymbolKind::Function, "G").is_empty());
}

#[test]
fn anonymous_enums_do_not_collide() {
    let table = parse("enum { A, B };\nenum { C };");
    assert_eq!(table.symbols().iter().filter(|s| s.kind == SymbolKind::Enum).count(), 2);
    let a = single(&table, SymbolKind::EnumMember, "A");
    let b = single(&table, SymbolKind::EnumMember, "B");
    let c = single(&table, SymbolKind::EnumMember, "C");
    assert_eq!(a.parent, "Enum #1");
    assert_eq!(b.range, IdeRange::on_line(0, 10, 11));
    assert_eq!(c.parent, "Enum #2");
}

#[test]
fn multi_line_enum_members_carry_their_docs() {
    let table = parse("enum Color\n{\n    Red = 0, // warm\n    Blue /**< cold */\n};");
    let red = single(&table, SymbolKind::EnumMember, "Red");
    assert_eq!(red.description, "warm");
    assert_eq!(red.type_name, "Color");
    let blue = single(&table, SymbolKind::EnumMember, "Blue");
    assert_eq!(blue.description, "cold");
    let color = single(&table, SymbolKind::Enum, "Color");
    assert_eq!(color.full_range().map(|range| range.end.line), Some(4));
}

#[test]
fn define_records_later_reference() {
    let table = parse("#define FOO 42\n\npublic void OnPluginStart()\n{\n    int x = FOO;\n}");
    let foo = single(&table, SymbolKind::Constant, "FOO");
    assert_eq!(foo.value.as_deref(), Some("42"));
    assert_eq!(foo.detail, "#define FOO 42");
    assert_eq!(foo.references, vec![IdeRange::on_line(4, 12, 15)]);
}

#[test]
fn references_skip_strings_and_comments() {
    let table = parse("#define FOO 1\nint a = FOO; // FOO\nchar s[] = \"FOO\";\n/* FOO */");
    let foo = single(&table, SymbolKind::Constant, "FOO");
    assert_eq!(foo.references, vec![IdeRange::on_line(1, 8, 11)]);
}

#[test]
fn locals_are_scoped_to_their_function() {
    let table = parse("void F()\n{\n    int x;\n}\nvoid G()\n{\n    int y = 1, z;\n}\nint g;");
    assert_eq!(single(&table, SymbolKind::Variable, "x").parent, "F");
    assert_eq!(single(&table, SymbolKind::Variable, "y").parent, "G");
    assert_eq!(single(&table, SymbolKind::Variable, "z").parent, "G");
    assert!(single(&table, SymbolKind::Variable, "g").is_global());
}

#[test]
fn function_full_range_ends_at_matching_brace() {
    let text = "public void F()\n{\n    if (a)\n    {\n        x();\n    }\n    else\n    {\n        y();\n    }\n    for (int i = 0; i < 3; i++)\n        z();\n}";
    let table = parse(text);
    let function = single(&table, SymbolKind::Function, "F");
    let full = function.full_range().expect("full range");
    assert_eq!((full.start.line, full.end.line), (0, 12));
    assert_eq!(single(&table, SymbolKind::Variable, "i").parent, "F");
}

#[test]
fn else_on_closing_brace_line_keeps_scope_open() {
    let table = parse("void G() {\n    if (a) {\n    } else {\n    }\n}\nvoid H() {\n}");
    let g = single(&table, SymbolKind::Function, "G");
    assert_eq!(g.full_range().map(|range| range.end.line), Some(4));
    let h = single(&table, SymbolKind::Function, "H");
    assert_eq!(h.full_range().map(|range| range.end.line), Some(6));
}

#[test]
fn first_function_declaration_wins() {
    let table = parse("void H() {}\nvoid H(int extra) {}");
    let h = single(&table, SymbolKind::Function, "H");
    assert_eq!(h.detail, "void H()");
    assert_eq!(h.range.start.line, 0);
}

#[test]
fn methodmap_members_and_inheritance() {
    let text = "methodmap Base {\n    public native void Go();\n    property int Value {\n        public get() {\n            return 1;\n        }\n    }\n}\nmethodmap Derived < Base {}";
    let table = parse(text);

    let base = single(&table, SymbolKind::Methodmap, "Base");
    assert_eq!(base.full_range().map(|range| range.end.line), Some(7));
    let go = single(&table, SymbolKind::Method, "Go");
    assert_eq!(go.parent, "Base");
    let value = single(&table, SymbolKind::Property, "Value");
    assert_eq!(value.parent, "Base");
    assert_eq!(value.detail, "property int Value");
    assert_eq!(value.full_range().map(|range| range.end.line), Some(6));

    let derived = single(&table, SymbolKind::Methodmap, "Derived");
    assert_eq!(derived.type_name, "Base");
    assert_eq!(derived.detail, "methodmap Derived < Base");
}

#[test]
fn constructors_are_methods_named_after_their_methodmap() {
    let table = parse("methodmap Timer < Handle {\n    public native Timer(float interval);\n}");
    let ctor = single(&table, SymbolKind::Constructor, "Timer");
    assert_eq!(ctor.parent, "Timer");
}

#[test]
fn enum_struct_fields_and_methods() {
    let text = "enum struct Point {\n    int x;\n    int y;\n    int Sum() {\n        int total = this.x + this.y;\n        return total;\n    }\n}";
    let table = parse(text);
    let x = single(&table, SymbolKind::Property, "x");
    assert_eq!(x.parent, "Point");
    let sum = single(&table, SymbolKind::Method, "Sum");
    assert_eq!(sum.parent, "Point");
    assert_eq!(sum.full_range().map(|range| range.end.line), Some(6));
    let total = single(&table, SymbolKind::Variable, "total");
    assert_eq!(total.parent, "Sum");
    assert_eq!(total.enum_struct.as_deref(), Some("Point"));
    let point = single(&table, SymbolKind::EnumStruct, "Point");
    assert_eq!(point.full_range().map(|range| range.end.line), Some(7));
}

#[test]
fn parameters_become_function_scoped_variables() {
    let table = parse("public Action Command(int client,\n                      int args)\n{\n}");
    let client = single(&table, SymbolKind::Variable, "client");
    assert_eq!(client.parent, "Command");
    assert_eq!(client.type_name, "int");
    let args = single(&table, SymbolKind::Variable, "args");
    assert_eq!(args.range.start.line, 1);
    let command = single(&table, SymbolKind::Function, "Command");
    assert_eq!(command.detail, "public Action Command(int client, int args)");
    assert_eq!(command.params.len(), 2);
}

#[test]
fn builtin_files_skip_locals_and_parameters() {
    let context = ParseContext::new(&NoIncludes).builtin(true);
    let output = parse_text("native void F(int a);\nint g;", file(), &context);
    assert!(output.table.symbols().iter().all(|symbol| symbol.kind != SymbolKind::Variable));
    assert!(output.table.symbols().iter().all(|symbol| symbol.builtin));
}

#[test]
fn typedef_and_typeset() {
    let text = "typedef SQLCallback = function void (Handle owner, Handle hndl);\ntypeset Listener\n{\n    function void (int a);\n    function Action (int a, int b);\n};";
    let table = parse(text);
    let typedef = single(&table, SymbolKind::TypeDef, "SQLCallback");
    assert_eq!(typedef.type_name, "void");
    assert_eq!(typedef.params, vec![ParamDoc::new("owner", ""), ParamDoc::new("hndl", "")]);
    let typeset = single(&table, SymbolKind::TypeSet, "Listener");
    assert_eq!(typeset.detail, "typeset Listener (2 members)");
    assert_eq!(typeset.full_range().map(|range| range.end.line), Some(5));
}

#[test]
fn trailing_comments_become_comment_symbols() {
    let table = parse("int x; // counter");
    let comment = table.symbols().iter().find(|symbol| symbol.kind == SymbolKind::Comment).expect("comment symbol");
    assert_eq!(comment.range, IdeRange::on_line(0, 7, 17));
}

#[test]
fn macro_invocations_are_not_functions() {
    let table = parse("#define LOOP_CLIENTS(%1) for (int %1 = 1; %1 <= MaxClients; %1++)\nvoid F() {\n}\nLOOP_CLIENTS(i) {\n}");
    assert!(named(&table, SymbolKind::Function, "LOOP_CLIENTS").is_empty());
    assert_eq!(single(&table, SymbolKind::Macro, "LOOP_CLIENTS").params, vec![ParamDoc::new("%1", "")]);
}

#[test]
fn includes_are_resolved_through_the_resolver() {
    let resolver = |request: &IncludeRequest<'_>| {
        let target = match request.kind {
            IncludeKind::Angle => FileId::builtin(&format!("{}.inc", request.path)),
            IncludeKind::Quoted => FileId::from_path(Path::new("/nonexistent/plugin").join(request.path).as_path()),
        };
        Some(Include::new(target, request.kind == IncludeKind::Angle))
    };
    let context = ParseContext::new(&resolver);
    let output = parse_text("#include <sourcemod>\n#include \"helpers.inc\"", file(), &context);
    let includes = output.table.includes();
    assert_eq!(includes.len(), 2);
    assert_eq!(includes[0].target.as_str(), "builtin://sourcemod.inc");
    assert!(includes[0].builtin);
    assert_eq!(includes[1].target.file_name(), "helpers.inc");
}

#[test]
fn external_names_become_outgoing_references() {
    let other = FileId::from_path(Path::new("/nonexistent/plugin/other.inc"));
    let mut context = ParseContext::new(&NoIncludes);
    context.external_references.insert("MAX_ITEMS".to_string(), other.clone());
    let output = parse_text("int items[MAX_ITEMS];", file(), &context);
    let outgoing = output.table.outgoing_references();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].target, other);
    assert_eq!(outgoing[0].range, IdeRange::on_line(0, 10, 19));
}

#[test]
fn enum_without_closing_brace_within_cap_is_dropped() {
    let mut text = String::from("enum Weapon {\n");
    for index in 0..150 {
        text.push_str(&format!("    Weapon_{index},\n"));
    }
    let table = parse(&text);
    assert!(named(&table, SymbolKind::Enum, "Weapon").is_empty());
    assert!(table.symbols().iter().all(|symbol| symbol.kind != SymbolKind::EnumMember));
}

#[test]
fn enum_cut_off_by_end_of_file_is_dropped() {
    let table = parse("enum Team\n{\n    Team_Red,\n    Team_Blue,");
    assert!(named(&table, SymbolKind::Enum, "Team").is_empty());
    assert!(named(&table, SymbolKind::EnumMember, "Team_Red").is_empty());
}

#[test]
fn unterminated_typeset_is_dropped() {
    let table = parse("typeset Listener\n{\n    function void (int a);\n    function Action (int a, int b);");
    assert!(named(&table, SymbolKind::TypeSet, "Listener").is_empty());
}

#[test]
fn array_initializer_does_not_close_the_function() {
    let text = "void F()\n{\n    int values[] = {\n        1,\n        2\n    };\n    int after;\n}\nvoid G() {}";
    let table = parse(text);
    let f = single(&table, SymbolKind::Function, "F");
    assert_eq!(f.full_range().map(|range| range.end.line), Some(7));
    assert_eq!(single(&table, SymbolKind::Variable, "after").parent, "F");
    assert_eq!(single(&table, SymbolKind::Function, "G").full_range().map(|range| range.start.line), Some(8));
}

#[test]
fn nested_global_initializer_is_skipped() {
    let text = "char g_Names[][] = {\n    {\n        \"a\"\n    },\n};\nvoid H()\n{\n    int local;\n}";
    let table = parse(text);
    let h = single(&table, SymbolKind::Function, "H");
    assert_eq!(h.full_range().map(|range| (range.start.line, range.end.line)), Some((5, 8)));
    assert_eq!(single(&table, SymbolKind::Variable, "local").parent, "H");
}
