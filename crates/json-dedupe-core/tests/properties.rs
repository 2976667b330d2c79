//! Property tests for normalization and deduplication
//!
//! Generators draw from small domains (few keys, few strings, small
//! integers) so that structural duplicates show up often.

use json_dedupe_core::{
    deduplicate, is_equivalent, normalize, unique_indices, JsonValue, Map,
};
use proptest::prelude::*;

fn arb_primitive() -> impl Strategy<Value = JsonValue> {
    prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::Bool),
        (-3i64..4).prop_map(|i| JsonValue::from(i)),
        prop::sample::select(vec![0.5f64, -1.25, 1.0, 2.0]).prop_map(|f| JsonValue::from(f)),
        "[a-c]{0,2}".prop_map(JsonValue::String),
    ]
}

fn arb_value() -> impl Strategy<Value = JsonValue> {
    arb_primitive().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(JsonValue::Sequence),
            prop::collection::vec(("[a-d]{1,2}", inner), 0..4)
                .prop_map(|pairs| JsonValue::Mapping(pairs.into_iter().collect())),
        ]
    })
}

fn arb_items() -> impl Strategy<Value = Vec<JsonValue>> {
    prop::collection::vec(arb_value(), 0..12)
}

fn render(items: &[JsonValue]) -> String {
    serde_json::to_string(items).unwrap()
}

proptest! {
    #[test]
    fn dedupe_is_idempotent(items in arb_items()) {
        let once = deduplicate(&items).unwrap();
        let twice = deduplicate(&once).unwrap();
        prop_assert_eq!(render(&once), render(&twice));
    }

    #[test]
    fn survivors_keep_input_order(items in arb_items()) {
        let kept = unique_indices(&items).unwrap();
        prop_assert!(kept.windows(2).all(|w| w[0] < w[1]));
        if !items.is_empty() {
            prop_assert_eq!(kept.first(), Some(&0));
        }
        let survivors = deduplicate(&items).unwrap();
        let picked: Vec<JsonValue> = kept.iter().map(|&i| items[i].clone()).collect();
        prop_assert_eq!(render(&survivors), render(&picked));
    }

    #[test]
    fn dropped_items_match_an_earlier_survivor(items in arb_items()) {
        let kept = unique_indices(&items).unwrap();
        for (i, item) in items.iter().enumerate() {
            if kept.contains(&i) {
                for &j in kept.iter().filter(|&&j| j < i) {
                    prop_assert!(!is_equivalent(&items[j], item).unwrap());
                }
            } else {
                prop_assert!(kept
                    .iter()
                    .filter(|&&j| j < i)
                    .any(|&j| is_equivalent(&items[j], item).unwrap()));
            }
        }
    }

    #[test]
    fn repeating_the_input_changes_nothing(items in arb_items()) {
        let mut doubled = items.clone();
        doubled.extend(items.iter().cloned());
        prop_assert_eq!(
            render(&deduplicate(&doubled).unwrap()),
            render(&deduplicate(&items).unwrap())
        );
    }

    #[test]
    fn mapping_key_order_is_irrelevant(
        pairs in prop::collection::vec(("[a-f]{1,2}", arb_value()), 0..6),
        shift in 0usize..6,
    ) {
        let map: Map = pairs.into_iter().collect();
        let mut entries: Vec<_> = map.clone().into_iter().collect();
        if !entries.is_empty() {
            let by = shift % entries.len();
            entries.rotate_left(by);
        }
        let reversed: Map = entries.into_iter().rev().collect();
        prop_assert_eq!(
            normalize(&JsonValue::Mapping(map)).unwrap(),
            normalize(&JsonValue::Mapping(reversed)).unwrap()
        );
    }

    #[test]
    fn composite_sequence_order_is_irrelevant(
        elements in prop::collection::vec(arb_value(), 0..6),
        shift in 0usize..7,
    ) {
        let mut elements = elements;
        elements.push(JsonValue::Mapping(Map::new()));
        let mut permuted = elements.clone();
        let by = shift % permuted.len();
        permuted.rotate_left(by);
        permuted.reverse();
        prop_assert!(is_equivalent(
            &JsonValue::Sequence(elements),
            &JsonValue::Sequence(permuted)
        ).unwrap());
    }

    #[test]
    fn primitive_sequence_order_matters(elements in prop::collection::vec(arb_primitive(), 0..6)) {
        let reversed: Vec<JsonValue> = elements.iter().rev().cloned().collect();
        let palindrome = reversed == elements;
        prop_assert_eq!(
            is_equivalent(
                &JsonValue::Sequence(elements),
                &JsonValue::Sequence(reversed)
            ).unwrap(),
            palindrome
        );
    }

    #[test]
    fn normalize_is_idempotent(value in arb_value()) {
        let once = normalize(&value).unwrap();
        let twice = normalize(&once.to_value()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn canonical_order_is_total(a in arb_value(), b in arb_value()) {
        let ca = normalize(&a).unwrap();
        let cb = normalize(&b).unwrap();
        prop_assert_eq!(ca.cmp(&cb), cb.cmp(&ca).reverse());
        prop_assert_eq!(ca == cb, ca.cmp(&cb) == std::cmp::Ordering::Equal);
    }
}
