//! Position-sensitive resolution over the flattened symbols of an include
//! closure: enclosing scope, expression types, methodmap inheritance and the
//! symbols a cursor points at.

mod expression;
mod inheritance;
mod lookup;
mod scope;

pub use expression::{MemberExpression, ResolvedType, parse_member_expression, resolve_expression_type};
pub use inheritance::{find_member, resolve_inheritance_chain, visible_members};
pub use lookup::{
    AccessKind, IncludeDirective, WordAtPosition, classify_access, include_directive, items_at_position, word_at,
};
pub use scope::{EnclosingScope, is_in_comment, is_in_string, resolve_enclosing_scope};

/// Characters that may appear in an identifier.
pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
