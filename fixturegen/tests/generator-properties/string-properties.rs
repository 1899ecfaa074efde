//! String generation properties: lengths, character sets and case.

use crate::{arbitrary_seeds, generator};
use fixturegen::*;

/// Property: a string's length lies in [MIN, MAX]
pub fn test_length_within_bounds() {
    for seed in arbitrary_seeds() {
        let mut gen = generator(seed);
        for (min, max) in [(0, 0), (1, 3), (4, 20), (7, 7)] {
            let value = gen
                .generate(
                    &TypeTag::AlphaNumericSpaces,
                    &ConstraintSet::new().with_min(min).with_max(max),
                )
                .unwrap();
            let length = value.as_str().unwrap().chars().count() as i64;
            assert!(
                (min..=max).contains(&length),
                "length {length} outside [{min}, {max}] for seed {seed}"
            );
        }
    }
}

/// Property: every character belongs to the tag's classes
pub fn test_characters_from_class() {
    let cases: [(TypeTag, fn(char) -> bool); 3] = [
        (TypeTag::Alpha, |c| c.is_ascii_alphabetic()),
        (TypeTag::Numeric, |c| c.is_ascii_digit()),
        (TypeTag::AlphaSpaces, |c| c.is_ascii_alphabetic() || c == ' '),
    ];

    for seed in arbitrary_seeds() {
        let mut gen = generator(seed);
        for (tag, allowed) in &cases {
            let value = gen
                .generate(tag, &ConstraintSet::new().with_min(1).with_max(30))
                .unwrap();
            let text = value.as_str().unwrap();
            assert!(
                text.chars().all(allowed),
                "{tag} produced {text:?} for seed {seed}"
            );
        }
    }
}

/// Property: LOWERCASE never yields uppercase, UPPERCASE never lowercase
pub fn test_case_constraints() {
    for seed in arbitrary_seeds() {
        let mut gen = generator(seed);
        let lower = gen
            .generate_named("alpha", &["min=10", "max=20", "lowercase"])
            .unwrap();
        assert!(!lower.as_str().unwrap().chars().any(char::is_uppercase));

        let upper = gen
            .generate_named("alpha", &["min=10", "max=20", "uppercase"])
            .unwrap();
        assert!(!upper.as_str().unwrap().chars().any(char::is_lowercase));
    }
}

/// Scenario: ALPHA with MIN=5 MAX=5 gives five letters
pub fn test_alpha_five_by_five() {
    for seed in arbitrary_seeds() {
        let value = generator(seed)
            .generate_named("ALPHA", &["MIN=5", "MAX=5"])
            .unwrap();
        let text = value.as_str().unwrap();
        assert_eq!(text.chars().count(), 5);
        assert!(text.chars().all(|c| c.is_ascii_alphabetic()));
    }
}
