use crate::{
    count, rerank_or_empty, CharacterAliasTable, PosTag, RerankOptions, TaggedToken,
    TokenOptions, TokenStream, DEFAULT_WINDOW_RADIUS,
};

fn tagged(text: &str, pos: &str) -> TaggedToken {
    TaggedToken::new(text, pos.parse().unwrap())
}

fn chapter_tokens() -> TokenStream {
    let records = vec![
        tagged("Kate_Smith", "PROPN"),
        tagged("was", "AUX").stop(),
        tagged("very", "ADV").stop(),
        tagged("nice", "ADJ"),
        tagged("and", "CCONJ").stop(),
        tagged("Tom", "PROPN"),
        tagged("seemed", "VERB"),
        tagged("grumpy", "ADJ"),
    ];
    TokenStream::from_tagged(records, TokenOptions::default())
}

#[test]
fn alias_file_to_raw_counts() {
    let aliases = CharacterAliasTable::parse("($_Kate_Smith)\n($_Tom)\n").unwrap();
    let (adj, ship) = count(&aliases, &chapter_tokens(), DEFAULT_WINDOW_RADIUS);

    insta::assert_snapshot!(serde_json::to_string(&adj).unwrap(), @r###"{"($_Kate_Smith)":{"nice":1,"grumpy":1},"($_Tom)":{"nice":1,"grumpy":1}}"###);
    insta::assert_snapshot!(serde_json::to_string(&ship).unwrap(), @r###"{"($_Kate_Smith)":{"($_Tom)":1},"($_Tom)":{"($_Kate_Smith)":1}}"###);
}

#[test]
fn alias_file_to_weighted_artifacts() {
    let aliases = CharacterAliasTable::parse("($_Kate_Smith)\n($_Tom)\n").unwrap();
    let (adj, ship) = count(&aliases, &chapter_tokens(), DEFAULT_WINDOW_RADIUS);

    let ship = rerank_or_empty(&ship, RerankOptions::default(), "ship");
    insta::assert_snapshot!(serde_json::to_string(&ship).unwrap(), @r###"{"($_Kate_Smith)":{"($_Tom)":1.0},"($_Tom)":{"($_Kate_Smith)":1.0}}"###);

    let adj = rerank_or_empty(&adj, RerankOptions::default(), "adj");
    let kate = adj.row("($_Kate_Smith)").unwrap();
    assert_eq!(kate.ranked_terms(), vec!["nice", "grumpy"]);
    let expected = 1.0 / 2f64.sqrt();
    assert!(kate.terms.iter().all(|(_, w)| (w - expected).abs() < 1e-9));
}

#[test]
fn only_adjectives_inside_the_window_are_counted() {
    let aliases = CharacterAliasTable::from_pairs(vec![("kate", "Kate_Smith")]);
    let mut pairs = vec![("hi", PosTag::Adj)];
    pairs.extend(std::iter::repeat(("door", PosTag::Noun)).take(8));
    pairs.push(("kate", PosTag::Noun));
    pairs.push(("saw", PosTag::Verb));
    pairs.push(("nice", PosTag::Adj));
    let tokens = TokenStream::from_pairs(pairs);

    let (adj, _) = count(&aliases, &tokens, DEFAULT_WINDOW_RADIUS);
    insta::assert_snapshot!(serde_json::to_string(&adj).unwrap(), @r###"{"Kate_Smith":{"nice":1}}"###);

    // One character row cannot be discriminated by IDF.
    let weighted = rerank_or_empty(&adj, RerankOptions::default(), "adj");
    assert!(weighted.is_empty());
    let weighted = rerank_or_empty(&adj, RerankOptions { min_rows: 1 }, "adj");
    assert_eq!(weighted.row("Kate_Smith").unwrap().get("nice"), Some(1.0));
}

#[test]
fn empty_character_file_yields_empty_artifacts() {
    let aliases = CharacterAliasTable::parse("").unwrap();
    let (adj, ship) = count(&aliases, &chapter_tokens(), DEFAULT_WINDOW_RADIUS);

    let adj = rerank_or_empty(&adj, RerankOptions::default(), "adj");
    let ship = rerank_or_empty(&ship, RerankOptions::default(), "ship");
    assert_eq!(serde_json::to_string(&adj).unwrap(), "{}");
    assert_eq!(serde_json::to_string(&ship).unwrap(), "{}");
}
