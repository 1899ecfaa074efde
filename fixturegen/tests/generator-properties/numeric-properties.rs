//! Integer, float and price generation properties.

use crate::{arbitrary_seeds, generator};
use fixturegen::*;

/// Property: an integer lies in [MIN, MAX] when MAX >= MIN
pub fn test_integer_within_bounds() {
    for seed in arbitrary_seeds() {
        let mut gen = generator(seed);
        for (min, max) in [(0, 0), (-50, 50), (1, 1_000_000), (i64::MIN, i64::MAX)] {
            let value = gen
                .generate(
                    &TypeTag::Integer,
                    &ConstraintSet::new().with_min(min).with_max(max),
                )
                .unwrap();
            let n = value.as_int().unwrap();
            assert!(n >= min && n <= max, "{n} outside [{min}, {max}]");
        }
    }
}

/// Property: MAX below MIN is raised to MIN
pub fn test_reversed_bounds_collapse_to_min() {
    for seed in arbitrary_seeds() {
        let value = generator(seed)
            .generate_named("integer", &["min=9", "max=3"])
            .unwrap();
        assert_eq!(value, Value::Int(9));
    }
}

/// Scenario: PRICE with MIN=10 MAX=20 has two decimals within the band
pub fn test_price_ten_to_twenty() {
    for seed in arbitrary_seeds() {
        let value = generator(seed)
            .generate_named("PRICE", &["MIN=10", "MAX=20"])
            .unwrap();
        let price = value.as_price().unwrap();
        assert!((1_000..=2_000).contains(&price.cents()));

        let text = price.to_string();
        let (_, decimals) = text.split_once('.').unwrap();
        assert_eq!(decimals.len(), 2, "{text} does not have two decimals");
    }
}

/// Property: floats start from [0, 1] and are only nudged towards the band
pub fn test_float_stays_near_band() {
    for seed in arbitrary_seeds() {
        let value = generator(seed)
            .generate_named("float", &["min=3", "max=8"])
            .unwrap();
        let f = value.as_f64().unwrap();
        assert!((3.0..=4.0).contains(&f), "{f} not shifted into [3, 4]");

        let value = generator(seed).generate_named::<&str>("float", &[]).unwrap();
        let f = value.as_f64().unwrap();
        assert!((0.0..=1.0).contains(&f));
    }
}

/// Scenario: an unknown tag without a custom hook fails
pub fn test_unsupported_type() {
    let result = generator(Seed::from_u64(1)).generate_named::<&str>("NOT_A_TYPE", &[]);
    assert_eq!(
        result,
        Err(FixtureError::UnsupportedType {
            tag: "NOT_A_TYPE".to_string()
        })
    );
}
