//! Field value tables, dummy data and expected-versus-actual comparison.

use crate::constraint::{ConstraintSet, TypeTag};
use crate::error::{FixtureError, Result};
use crate::gen::ValueGenerator;
use crate::introspect::{get_field, set_fields, to_map, Introspectable};
use crate::value::{FieldMap, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// How one field gets its generated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(rename = "type")]
    pub tag: TypeTag,

    #[serde(default)]
    pub constraints: ConstraintSet,
}

impl FieldRule {
    pub fn new(tag: impl Into<TypeTag>, constraints: ConstraintSet) -> Self {
        FieldRule {
            tag: tag.into(),
            constraints,
        }
    }
}

/// Every field an object type can carry, how to generate it, and which
/// fields creation cannot do without.
///
/// ```json
/// {
///   "type_name": "User",
///   "fields": {
///     "login": { "type": "ALPHA", "constraints": { "min": 5, "max": 10, "unique": "login" } },
///     "email": { "type": "EMAIL" }
///   },
///   "required": ["login"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldTable {
    #[serde(default = "default_type_name")]
    pub type_name: String,

    pub fields: BTreeMap<String, FieldRule>,

    #[serde(default)]
    pub required: Vec<String>,
}

fn default_type_name() -> String {
    "record".to_string()
}

impl FieldTable {
    pub fn new(type_name: impl Into<String>) -> Self {
        FieldTable {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    /// Mark `name` as required for creation.
    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Parse and validate a table from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: FieldTable =
            serde_json::from_str(json).map_err(|e| FixtureError::invalid_table(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Every required field must have a rule.
    pub fn validate(&self) -> Result<()> {
        match self.required.iter().find(|name| !self.fields.contains_key(*name)) {
            Some(name) => Err(FixtureError::invalid_table(format!(
                "required field '{}' has no rule",
                name
            ))),
            None => Ok(()),
        }
    }

    /// Generate a value for one field.
    pub fn generate_field(&self, generator: &mut ValueGenerator, name: &str) -> Result<Value> {
        let rule = self
            .fields
            .get(name)
            .ok_or_else(|| FixtureError::field_not_found(name, &self.type_name))?;
        generator.generate(&rule.tag, &rule.constraints)
    }

    /// Dummy data for every field in the table.
    pub fn generate_all(&self, generator: &mut ValueGenerator) -> Result<FieldMap> {
        let mut values = FieldMap::new();
        for (name, rule) in &self.fields {
            values.insert(name.clone(), generator.generate(&rule.tag, &rule.constraints)?);
        }
        debug!(type_name = %self.type_name, fields = values.len(), "Generated dummy data");
        Ok(values)
    }

    /// Add generated values for required fields missing from `provided`.
    ///
    /// Provided values are kept as they are.
    pub fn complete(&self, generator: &mut ValueGenerator, mut provided: FieldMap) -> Result<FieldMap> {
        for name in &self.required {
            if !provided.contains_key(name) {
                let value = self.generate_field(generator, name)?;
                provided.insert(name.clone(), value);
            }
        }
        Ok(provided)
    }

    /// Generate every field, let `overrides` win, and write the result onto
    /// `object`. Returns the values applied.
    pub fn build_dummy<T: Introspectable + ?Sized>(
        &self,
        generator: &mut ValueGenerator,
        object: &mut T,
        overrides: FieldMap,
    ) -> Result<FieldMap> {
        let mut values = FieldMap::new();
        for (name, rule) in &self.fields {
            if !overrides.contains_key(name) {
                values.insert(name.clone(), generator.generate(&rule.tag, &rule.constraints)?);
            }
        }
        values.extend(overrides);
        set_fields(object, &values)?;
        Ok(values)
    }
}

/// One field whose actual value differs from the expected one.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub field: String,
    pub expected: Value,
    pub actual: Value,
}

/// Result of comparing expected data with an object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comparison {
    /// Expected fields the object does not have at all.
    pub missing: Vec<String>,
    pub mismatched: Vec<Mismatch>,
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match() {
            return write!(f, "all expected fields match");
        }
        for field in &self.missing {
            writeln!(f, "missing field '{}'", field)?;
        }
        for m in &self.mismatched {
            writeln!(
                f,
                "field '{}': expected '{}', found '{}'",
                m.field, m.expected, m.actual
            )?;
        }
        Ok(())
    }
}

/// Whether an actual value satisfies an expected one.
///
/// Numbers compare by magnitude across integer, float and price; an expected
/// string matches any value rendering to the same text, since expectations
/// usually come from scenario tables.
pub fn values_match(expected: &Value, actual: &Value) -> bool {
    if expected == actual {
        return true;
    }
    if let (Some(e), Some(a)) = (expected.as_f64(), actual.as_f64()) {
        return e == a;
    }
    match expected {
        Value::Str(text) => actual.to_string() == *text,
        _ => false,
    }
}

/// Compare `expected` field values with the state of `actual`.
///
/// Fields are looked up in the flattened map first, then read directly so
/// accessor-only fields are found too.
pub fn compare<T: Introspectable + ?Sized>(expected: &FieldMap, actual: &T) -> Result<Comparison> {
    let flattened = to_map(actual)?;
    let mut comparison = Comparison::default();

    for (field, expected_value) in expected {
        let actual_value = match flattened.get(field) {
            Some(value) => value.clone(),
            None => match get_field(actual, field) {
                Ok(value) => value,
                Err(FixtureError::FieldNotFound { .. }) => {
                    comparison.missing.push(field.clone());
                    continue;
                }
                Err(e) => return Err(e),
            },
        };

        if !values_match(expected_value, &actual_value) {
            comparison.mismatched.push(Mismatch {
                field: field.clone(),
                expected: expected_value.clone(),
                actual: actual_value,
            });
        }
    }

    Ok(comparison)
}

/// Compare two objects: every flattened field of `expected` against `actual`.
pub fn compare_objects<E, A>(expected: &E, actual: &A) -> Result<Comparison>
where
    E: Introspectable + ?Sized,
    A: Introspectable + ?Sized,
{
    compare(&to_map(expected)?, actual)
}
