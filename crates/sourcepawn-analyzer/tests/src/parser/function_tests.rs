use super::*;

#[test]
fn header_detail_stops_at_body() {
    assert_eq!(header_detail("public void OnPluginStart() {"), "public void OnPluginStart()");
    assert_eq!(header_detail("int Get() { return 1; }"), "int Get()");
}

#[test]
fn header_detail_collapses_whitespace_and_keeps_defaults() {
    assert_eq!(
        header_detail("native void Print(const char[] text,   int color = 0);"),
        "native void Print(const char[] text, int color = 0)"
    );
}

#[test]
fn header_detail_ignores_braces_in_strings() {
    assert_eq!(header_detail("void F(const char[] s = \"{\")"), "void F(const char[] s = \"{\")");
}

#[test]
fn header_terminator_kinds() {
    assert_eq!(header_terminator("void F() {"), Some('{'));
    assert_eq!(header_terminator("void F() {}"), Some('{'));
    assert_eq!(header_terminator("native void F(); // doc"), Some(';'));
    assert_eq!(header_terminator("native void F(int a,"), None);
}
