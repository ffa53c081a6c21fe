use super::FieldNames;

fn quote(term: &str) -> String {
    format!("\"{}\"", term.replace('"', "\\\""))
}

fn deck_clause(deck: Option<&str>) -> Option<String> {
    deck.map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| quote(&format!("deck:{}", d)))
}

/// Anki search for notes with source text and an empty audio field.
///
/// `"Audio:"` matches an empty field and `"Source:_*"` a non-empty one. Without
/// a deck every deck is searched.
pub fn build_search_query(fields: &FieldNames, deck: Option<&str>) -> String {
    let mut terms = vec![
        quote(&format!("{}:", fields.audio)),
        quote(&format!("{}:_*", fields.source)),
    ];
    terms.extend(deck_clause(deck));
    terms.join(" ")
}

/// Broad search over everything in scope, used for diagnostics
pub fn build_scope_query(deck: Option<&str>) -> String {
    deck_clause(deck).unwrap_or_else(|| "deck:*".to_string())
}
