//! Fingerprints depend on the set of reference identifiers only

use proptest::prelude::*;
use std::collections::BTreeSet;
use stylemix::fingerprint::{compute_fingerprint, CachedStyle};
use stylemix::types::{ImagePayload, ReferenceImage};

fn references(ids: &[String]) -> Vec<ReferenceImage> {
    ids.iter()
        .map(|id| {
            ReferenceImage::with_id(
                id.as_str(),
                ImagePayload {
                    data: format!("data-{}", id),
                    media_type: "image/png".to_string(),
                },
            )
        })
        .collect()
}

fn id_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z0-9]{1,12}", 1..8)
        .prop_map(|set: BTreeSet<String>| set.into_iter().collect())
}

proptest! {
    #[test]
    fn fingerprint_ignores_order(ids in id_set().prop_shuffle(), seed in any::<u64>()) {
        let mut shuffled = ids.clone();
        let len = shuffled.len();
        shuffled.rotate_left((seed as usize) % len);

        let a = compute_fingerprint(&references(&ids));
        let b = compute_fingerprint(&references(&shuffled));
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn fingerprint_ids_are_sorted(ids in id_set().prop_shuffle()) {
        let fingerprint = compute_fingerprint(&references(&ids));
        let listed: Vec<String> = fingerprint.ids().iter().map(|id| id.to_string()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        prop_assert_eq!(listed, sorted);
    }

    #[test]
    fn cache_matches_only_the_same_set(ids in id_set(), extra in "[A-Z]{1,6}") {
        let images = references(&ids);
        let style = CachedStyle {
            description: "style".to_string(),
            fingerprint: compute_fingerprint(&images),
        };
        prop_assert!(style.matches(&images));

        let mut grown = ids.clone();
        grown.push(extra);
        prop_assert!(!style.matches(&references(&grown)));

        if ids.len() > 1 {
            prop_assert!(!style.matches(&references(&ids[1..])));
        }
    }
}
