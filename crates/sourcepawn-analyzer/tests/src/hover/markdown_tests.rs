use expect_test::expect;

use super::*;

#[test]
fn params_render_as_code() {
    let markdown = description_to_markdown("Desc. \n@param a First.");
    expect![[r#"
        Desc.

        _@param_ `a` - First."#]]
    .assert_eq(&markdown);
}

#[test]
fn soft_wraps_join_and_blank_lines_split() {
    let markdown = description_to_markdown("Sends a message \n to <client>. \n \n@return True on success.");
    expect![[r#"
        Sends a message to \<client\>.

        _@return_ True on success."#]]
    .assert_eq(&markdown);
}

#[test]
fn deprecation_is_emphasised() {
    let markdown = description_to_markdown("Old.\nDEPRECATED use New()");
    expect![[r#"
        Old.

        **DEPRECATED** use `New()`"#]]
    .assert_eq(&markdown);
}

#[test]
fn member_marker_is_stripped() {
    assert_eq!(description_to_markdown("*< Player count"), "Player count");
    assert_eq!(description_to_markdown(""), "");
}
