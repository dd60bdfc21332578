use crate::{
    repository::ItemSet,
    symbols::{Symbol, SymbolKind},
};

use super::{EnclosingScope, find_member, is_word_char, resolve_inheritance_chain};

/// Receiver of a member access, e.g. `player.Weapon` in `player.Weapon.Fi`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberExpression {
    /// Identifiers from the outermost receiver inwards.
    pub segments: Vec<String>,
    /// Some access in the chain used `::`.
    pub static_access: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub type_name: String,
    /// The receiver names the type itself rather than a value of it.
    pub static_access: bool,
}

/// Splits the receiver of the member access whose member name ends at byte
/// `cursor` of `line`. Returns `None` when no `.` or `::` precedes the member
/// name.
pub fn parse_member_expression(
    line: &str,
    cursor: usize,
) -> Option<MemberExpression> {
    let chars: Vec<(usize, char)> = line.char_indices().take_while(|(at, _)| *at < cursor).collect();
    let mut i = chars.len() as isize - 1;

    // Skip the partially typed member name, then require an accessor.
    while i >= 0 && is_word_char(chars[i as usize].1) {
        i -= 1;
    }
    let mut static_access = false;
    match char_at(&chars, i) {
        Some('.') => i -= 1,
        Some(':') if char_at(&chars, i - 1) == Some(':') => {
            static_access = true;
            i -= 2;
        },
        _ => return None,
    }

    let mut segments = vec![String::new()];
    let mut brackets = 0i32;
    let mut parens = 0i32;
    while i >= 0 {
        let ch = chars[i as usize].1;
        match ch {
            ']' => brackets += 1,
            '[' => brackets -= 1,
            ')' => parens += 1,
            '(' => parens -= 1,
            _ if brackets != 0 || parens != 0 => {},
            _ if is_word_char(ch) => {
                if let Some(segment) = segments.last_mut() {
                    segment.insert(0, ch);
                }
            },
            '.' => segments.push(String::new()),
            ':' if char_at(&chars, i - 1) == Some(':') => {
                i -= 1;
                static_access = true;
                segments.push(String::new());
            },
            _ => break,
        }
        i -= 1;
    }

    if segments.iter().any(String::is_empty) {
        return None;
    }
    segments.reverse();
    Some(MemberExpression {
        segments,
        static_access,
    })
}

fn char_at(
    chars: &[(usize, char)],
    i: isize,
) -> Option<char> {
    usize::try_from(i).ok().and_then(|i| chars.get(i)).map(|(_, ch)| *ch)
}

/// Type of the value `expression` evaluates to, following members through
/// the methodmap inheritance chain.
pub fn resolve_expression_type(
    expression: &MemberExpression,
    items: &ItemSet,
    scope: &EnclosingScope,
) -> Option<ResolvedType> {
    let (outermost, rest) = expression.segments.split_first()?;

    let (mut type_name, mut static_access) = if expression.static_access {
        (outermost.clone(), true)
    } else if outermost == "this" && scope.container.is_some() {
        (scope.container.clone()?, false)
    } else {
        outermost_type(outermost, items, scope)?
    };

    for segment in rest {
        let chain = resolve_inheritance_chain(items, &type_name);
        let member = find_member(items, &chain, segment)?;
        type_name = member_type(member);
        static_access = false;
        if type_name.is_empty() {
            return None;
        }
    }
    Some(ResolvedType {
        type_name,
        static_access,
    })
}

fn outermost_type(
    name: &str,
    items: &ItemSet,
    scope: &EnclosingScope,
) -> Option<(String, bool)> {
    let mut variables: Vec<&Symbol> = items
        .iter()
        .filter(|symbol| symbol.kind == SymbolKind::Variable && symbol.name == name && scope.sees_variable(symbol))
        .collect();
    // Locals shadow globals.
    variables.sort_by_key(|symbol| symbol.is_global());
    if let Some(variable) = variables.first() {
        return (!variable.type_name.is_empty()).then(|| (variable.type_name.clone(), false));
    }

    if let Some(container) = items.iter().find(|symbol| symbol.kind.is_container() && symbol.name == name) {
        return Some((container.name.clone(), true));
    }

    items
        .iter()
        .find(|symbol| symbol.kind == SymbolKind::Function && symbol.name == name && !symbol.type_name.is_empty())
        .map(|function| (function.type_name.clone(), false))
}

/// Type produced by reading a property or calling a method.
fn member_type(member: &Symbol) -> String {
    match member.kind {
        SymbolKind::Constructor => member.name.clone(),
        _ => member.type_name.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/src/analysis/expression_tests.rs"]
mod tests;
