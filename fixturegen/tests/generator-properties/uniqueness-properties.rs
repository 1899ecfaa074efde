//! Uniqueness registry properties.

use crate::{arbitrary_seeds, generator};
use fixturegen::*;
use std::collections::HashSet;

/// Property: UNIQUE values for one key never repeat within a session
pub fn test_unique_values_never_repeat() {
    for seed in arbitrary_seeds().take(20) {
        let mut gen = generator(seed);
        let constraints = ConstraintSet::new().with_min(0).with_max(99).unique();
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let value = gen.generate(&TypeTag::Integer, &constraints).unwrap();
            assert!(seen.insert(value), "repeated value for seed {seed}");
        }
        assert_eq!(gen.registry().len(None), 100);
    }
}

/// Property: different keys keep separate pools
pub fn test_keys_are_independent() {
    for seed in arbitrary_seeds().take(20) {
        let mut gen = generator(seed);
        let mut logins = HashSet::new();
        let mut emails = HashSet::new();
        for _ in 0..10 {
            let login = gen
                .generate_named("integer", &["min=1", "max=10", "unique=login"])
                .unwrap();
            let email = gen
                .generate_named("integer", &["min=1", "max=10", "unique=email"])
                .unwrap();
            assert!(logins.insert(login));
            assert!(emails.insert(email));
        }
        assert_eq!(logins, emails);
    }
}

/// Property: a retry limit turns an exhausted space into an error
pub fn test_retry_limit_exhausts() {
    for seed in arbitrary_seeds().take(20) {
        let mut gen = generator(seed).with_config(GeneratorConfig::default().with_retry_limit(25));
        let constraints = ConstraintSet::new().with_min(1).with_max(2).unique_in("pair");
        gen.generate(&TypeTag::Integer, &constraints).unwrap();
        gen.generate(&TypeTag::Integer, &constraints).unwrap();

        let exhausted = gen.generate(&TypeTag::Integer, &constraints);
        assert_eq!(
            exhausted,
            Err(FixtureError::UniquenessExhausted {
                key: Some("pair".to_string()),
                attempts: 25,
            })
        );
    }
}
