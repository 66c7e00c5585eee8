//! Property-based tests for party codes and URIs

use juke_core::{normalize_search_query, MusicUri, PartyCode, UriKind};
use proptest::prelude::*;

proptest! {
    /// Property: every generated code parses back to itself
    #[test]
    fn generated_codes_are_valid(_seed in 0u32..500) {
        let code = PartyCode::generate();
        prop_assert_eq!(code.as_str().len(), PartyCode::LEN);
        prop_assert_eq!(PartyCode::parse(code.as_str()).unwrap(), code);
    }

    /// Property: parsing is case-insensitive and whitespace-tolerant
    #[test]
    fn parse_accepts_any_casing(raw in "[a-zA-Z0-9]{6}", pad in " {0,3}") {
        let padded = format!("{pad}{raw}{pad}");
        let code = PartyCode::parse(&padded).unwrap();
        prop_assert_eq!(code.as_str(), raw.to_ascii_uppercase());
    }

    /// Property: anything that is not six alphanumerics is rejected
    #[test]
    fn parse_rejects_other_lengths(raw in "[A-Z0-9]{0,5}|[A-Z0-9]{7,12}") {
        prop_assert!(PartyCode::parse(&raw).is_err());
    }

    /// Property: valid URIs survive display and parse
    #[test]
    fn uri_display_round_trips(
        kind in prop::sample::select(vec!["track", "album", "artist", "playlist"]),
        id in "[A-Za-z0-9]{1,22}",
    ) {
        let raw = format!("spotify:{kind}:{id}");
        let uri = MusicUri::parse(&raw).unwrap();
        prop_assert_eq!(uri.to_string(), raw);
        prop_assert_eq!(uri.kind() == UriKind::Track, kind == "track");
    }

    /// Property: normalized queries are never blank and never padded
    #[test]
    fn normalized_query_is_trimmed(query in "\\PC{0,300}") {
        if let Some(normalized) = normalize_search_query(&query) {
            prop_assert!(!normalized.is_empty());
            prop_assert_eq!(normalized.trim(), normalized.as_str());
            prop_assert!(normalized.chars().count() <= 200);
        } else {
            prop_assert!(query.trim().is_empty());
        }
    }
}
