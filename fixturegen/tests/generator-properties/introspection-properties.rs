//! Field access properties over plain records.

use crate::{arbitrary_seeds, generator};
use fixturegen::*;

fn section() -> DynamicRecord {
    DynamicRecord::new("Section")
        .with("id", 1)
        .with("name", "Standard")
        .with("identifier", "standard")
}

/// Property: a written field reads back as written
pub fn test_field_round_trip() {
    for seed in arbitrary_seeds() {
        let mut gen = generator(seed);
        let name = gen.generate_named("alpha_spaces", &["min=1", "max=40"]).unwrap();

        let mut record = section();
        set_field(&mut record, "name", name.clone()).unwrap();
        assert_eq!(get_field(&record, "name").unwrap(), name);

        let current = get_field(&record, "identifier").unwrap();
        set_field(&mut record, "identifier", current.clone()).unwrap();
        assert_eq!(record, {
            let mut expected = section();
            expected.insert("name", name);
            expected
        });
    }
}

/// Property: unknown names fail on read and write, leaving the record alone
pub fn test_unknown_field_fails() {
    let mut record = section();
    let expected = FixtureError::FieldNotFound {
        field: "colour".to_string(),
        type_name: "Section".to_string(),
    };
    assert_eq!(get_field(&record, "colour"), Err(expected.clone()));
    assert_eq!(
        set_field(&mut record, "colour", Value::from("red")),
        Err(expected)
    );
    assert_eq!(record, section());
}

/// Property: only a single uppercase ASCII letter is a synthetic identifier
pub fn test_identifier_classification() {
    for letter in 'A'..='Z' {
        assert!(is_synthetic_identifier(&letter.to_string()));
        assert!(!is_synthetic_identifier(&letter.to_ascii_lowercase().to_string()));
    }
    for identifier in ["", "AB", "1", "Å", "media", "A1"] {
        assert!(!is_synthetic_identifier(identifier), "{identifier:?}");
    }
}

/// Property: flattening nested records lets the later same-named field win
pub fn test_flatten_collision_keeps_last() {
    let owner = DynamicRecord::new("User").with("name", "editor").with("id", 14);
    let record = section().with("owner", owner);

    let map = to_map(&record).unwrap();
    assert_eq!(map["name"], Value::from("editor"));
    assert_eq!(map["id"], Value::Int(14));
    assert_eq!(map["identifier"], Value::from("standard"));
    assert!(!map.contains_key("owner"));
}
