use std::collections::HashSet;

use crate::{
    repository::ItemSet,
    symbols::{Symbol, SymbolKind},
};

/// `type_name` followed by every methodmap it inherits from, nearest first.
///
/// The chain always starts with `type_name`, even when no methodmap of that
/// name is known. Inheritance cycles end the chain.
pub fn resolve_inheritance_chain(
    items: &ItemSet,
    type_name: &str,
) -> Vec<String> {
    let mut chain = vec![type_name.to_string()];
    let mut visited: HashSet<String> = HashSet::from([type_name.to_string()]);
    let mut current = type_name.to_string();

    while let Some(methodmap) =
        items.iter().find(|symbol| symbol.kind == SymbolKind::Methodmap && symbol.name == current)
    {
        let parent = &methodmap.type_name;
        if parent.is_empty() || !visited.insert(parent.clone()) {
            break;
        }
        chain.push(parent.clone());
        current = parent.clone();
    }
    chain
}

/// Member `name` of the first type in `chain` that declares one.
pub fn find_member<'i>(
    items: &'i ItemSet,
    chain: &[String],
    name: &str,
) -> Option<&'i Symbol> {
    chain.iter().find_map(|owner| {
        items
            .iter()
            .find(|symbol| symbol.kind.is_member() && symbol.parent == *owner && symbol.name == name)
    })
}

/// Members reachable through `chain`. A member shadows same-named members of
/// its ancestors.
pub fn visible_members<'i>(
    items: &'i ItemSet,
    chain: &[String],
) -> Vec<&'i Symbol> {
    let mut seen = HashSet::new();
    let mut members = Vec::new();
    for owner in chain {
        for symbol in items.iter().filter(|symbol| symbol.kind.is_member() && symbol.parent == *owner) {
            if seen.insert(symbol.name.as_str()) {
                members.push(symbol);
            }
        }
    }
    members
}

#[cfg(test)]
#[path = "../../tests/src/analysis/inheritance_tests.rs"]
mod tests;
