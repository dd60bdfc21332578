use super::*;

fn raw(
    line: u32,
    col: u32,
    length: u32,
    token_type: SemanticTokenType,
    modifiers: Vec<SemanticTokenModifier>,
) -> RawToken {
    RawToken {
        line,
        col,
        length,
        token_type,
        modifiers,
    }
}

#[test]
fn tokens_are_sorted_and_delta_encoded() {
    let tokens = encode_delta(vec![
        raw(3, 8, 4, SemanticTokenType::FUNCTION, Vec::new()),
        raw(1, 4, 7, SemanticTokenType::VARIABLE, vec![SemanticTokenModifier::DECLARATION]),
        raw(1, 14, 5, SemanticTokenType::MACRO, vec![SemanticTokenModifier::READONLY]),
    ]);
    let encoded: Vec<(u32, u32, u32, u32, u32)> = tokens
        .iter()
        .map(|t| (t.delta_line, t.delta_start, t.length, t.token_type, t.token_modifiers_bitset))
        .collect();
    assert_eq!(encoded, vec![(1, 4, 7, 0, 0b001), (0, 10, 5, 4, 0b010), (2, 8, 4, 1, 0)]);
}

#[test]
fn first_token_at_a_position_wins() {
    let tokens = encode_delta(vec![
        raw(0, 5, 4, SemanticTokenType::FUNCTION, vec![SemanticTokenModifier::DECLARATION]),
        raw(0, 5, 4, SemanticTokenType::FUNCTION, vec![SemanticTokenModifier::DEPRECATED]),
    ]);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_modifiers_bitset, 0b001);
}

#[test]
fn legend_lists_every_type_and_modifier() {
    let legend = get_legend();
    assert_eq!(legend.token_types.len(), LEGEND_TYPES.len());
    assert_eq!(legend.token_modifiers, vec![
        SemanticTokenModifier::DECLARATION,
        SemanticTokenModifier::READONLY,
        SemanticTokenModifier::DEPRECATED,
    ]);
}
