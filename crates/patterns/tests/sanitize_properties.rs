//! Property-based privacy invariants from spec.md §8.

use cg_patterns::{catalog, sanitize};
use proptest::prelude::*;

proptest! {
    #[test]
    fn sanitize_is_idempotent(text in ".{0,500}") {
        let once = sanitize(&text);
        let twice = sanitize(&once.sanitized);
        prop_assert_eq!(once.sanitized, twice.sanitized);
    }

    #[test]
    fn sanitized_output_matches_no_catalog_pattern(text in ".{0,500}") {
        let out = sanitize(&text);
        for pattern in catalog::CATALOG.iter() {
            prop_assert!(
                !pattern.regex.is_match(&out.sanitized),
                "category {} still matches sanitized output: {:?}",
                pattern.name,
                out.sanitized
            );
        }
    }
}

proptest! {
    #[test]
    fn known_pii_corpus_never_survives(
        local in "[a-z]{3,10}",
        domain in "[a-z]{3,10}",
        tld in "(com|net|org)",
    ) {
        let email = format!("{local}@{domain}.{tld}");
        let text = format!("contact me at {email} please");
        let out = sanitize(&text);
        prop_assert!(!out.sanitized.contains(&email));
    }
}
