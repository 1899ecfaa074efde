//! Constraint-driven value generation.

use crate::chars::{characters_of, random_string};
use crate::constraint::{ConstraintSet, TypeTag, UniqueScope};
use crate::data::{GeneratorConfig, Seed};
use crate::error::{FixtureError, Result};
use crate::value::{Price, Value};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Outcome of a custom value hook.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomValue {
    /// The hook produced a value for the tag.
    Value(Value),
    /// The hook does not know the tag.
    Declined,
}

/// Extension point for type tags outside the built-in categories.
pub trait CustomValues {
    /// Produce a value for `tag`, or decline it.
    ///
    /// `seed` is a fresh stream split off the generator's own.
    fn generate_custom_value(
        &mut self,
        tag: &TypeTag,
        constraints: &ConstraintSet,
        seed: Seed,
    ) -> Result<CustomValue>;
}

/// Hook that declines every tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCustomValues;

impl CustomValues for NoCustomValues {
    fn generate_custom_value(
        &mut self,
        _tag: &TypeTag,
        _constraints: &ConstraintSet,
        _seed: Seed,
    ) -> Result<CustomValue> {
        Ok(CustomValue::Declined)
    }
}

/// Values already accepted per uniqueness key, for one generation session.
#[derive(Debug, Clone, Default)]
pub struct UniquenessRegistry {
    pools: HashMap<Option<String>, HashSet<Value>>,
}

impl UniquenessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `value` was already accepted under `key`.
    pub fn contains(&self, key: Option<&str>, value: &Value) -> bool {
        self.pools
            .get(&key.map(str::to_string))
            .is_some_and(|pool| pool.contains(value))
    }

    /// Record `value` under `key`; returns `false` if it was already there.
    pub fn insert(&mut self, key: Option<&str>, value: Value) -> bool {
        self.pools
            .entry(key.map(str::to_string))
            .or_default()
            .insert(value)
    }

    /// Mark values that exist elsewhere (e.g. in the repository) as taken.
    pub fn reserve<I>(&mut self, key: Option<&str>, values: I)
    where
        I: IntoIterator<Item = Value>,
    {
        let pool = self.pools.entry(key.map(str::to_string)).or_default();
        pool.extend(values);
    }

    /// Number of values accepted under `key`.
    pub fn len(&self, key: Option<&str>) -> usize {
        self.pools
            .get(&key.map(str::to_string))
            .map_or(0, HashSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.pools.values().all(HashSet::is_empty)
    }

    pub fn clear(&mut self) {
        self.pools.clear();
    }
}

/// Generates synthetic values for type tags under constraint sets.
///
/// A generator is one generation session: it owns its seed stream and its
/// uniqueness registry. Sessions running in parallel each need their own.
pub struct ValueGenerator {
    seed: Seed,
    config: GeneratorConfig,
    registry: UniquenessRegistry,
    custom: Box<dyn CustomValues>,
}

impl Default for ValueGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueGenerator {
    /// Create a generator with a random seed.
    pub fn new() -> Self {
        Self::with_seed(Seed::random())
    }

    /// Create a generator replaying the stream of `seed`.
    pub fn with_seed(seed: Seed) -> Self {
        ValueGenerator {
            seed,
            config: GeneratorConfig::default(),
            registry: UniquenessRegistry::new(),
            custom: Box::new(NoCustomValues),
        }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Install the hook consulted for tags outside the built-in categories.
    pub fn with_custom_values<H>(mut self, hook: H) -> Self
    where
        H: CustomValues + 'static,
    {
        self.custom = Box::new(hook);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &UniquenessRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut UniquenessRegistry {
        &mut self.registry
    }

    /// Generate a value for `tag` satisfying `constraints`.
    ///
    /// A `UNIQUE` constraint routes through the uniqueness loop, which by
    /// default retries until an unseen value turns up. Callers must size the
    /// constraints so the value space exceeds demand, or configure a retry
    /// limit.
    pub fn generate(&mut self, tag: &TypeTag, constraints: &ConstraintSet) -> Result<Value> {
        let (rest, scope) = constraints.split_unique();
        match scope {
            Some(scope) => self.generate_unique(tag, &rest, &scope),
            None => self.generate_value(tag, &rest),
        }
    }

    /// Call-boundary form: tag and constraints as case-insensitive strings.
    pub fn generate_named<S: AsRef<str>>(&mut self, tag: &str, constraints: &[S]) -> Result<Value> {
        let constraints = ConstraintSet::parse_all(constraints)?;
        self.generate(&TypeTag::from(tag), &constraints)
    }

    fn generate_unique(
        &mut self,
        tag: &TypeTag,
        constraints: &ConstraintSet,
        scope: &UniqueScope,
    ) -> Result<Value> {
        let key = scope.key();
        let mut attempts = 0;
        loop {
            if let Some(limit) = self.config.retry_limit {
                if attempts >= limit.max(1) {
                    warn!(%tag, ?key, attempts, "Gave up looking for a unique value");
                    return Err(FixtureError::UniquenessExhausted {
                        key: key.map(str::to_string),
                        attempts,
                    });
                }
            }
            attempts += 1;

            let value = self.generate_value(tag, constraints)?;
            if self.registry.insert(key, value.clone()) {
                debug!(%tag, ?key, attempts, "Accepted unique value");
                return Ok(value);
            }
            trace!(%tag, ?key, %value, "Generated value already taken, retrying");
        }
    }

    fn generate_value(&mut self, tag: &TypeTag, constraints: &ConstraintSet) -> Result<Value> {
        let min = constraints.min_bound();
        let max = constraints.max_bound();

        if let Some(classes) = tag.character_classes() {
            let characters = characters_of(classes, constraints.case_sensitive());
            let (text, seed) = random_string(
                &characters,
                usize::try_from(min).unwrap_or(0),
                max.map(|max| usize::try_from(max).unwrap_or(usize::MAX)),
                self.config.unbounded_length_span,
                self.seed,
            )?;
            self.seed = seed;

            let text = if constraints.uppercase {
                text.to_uppercase()
            } else {
                text
            };
            return Ok(Value::Str(text));
        }

        match tag {
            TypeTag::Integer => {
                let upper = self.effective_max(min, max);
                let (value, seed) = self.seed.next_in_range(min, upper);
                self.seed = seed;
                Ok(Value::Int(value))
            }
            TypeTag::Float => Ok(Value::Float(self.float_near(min, max))),
            TypeTag::Price => {
                let upper = self.effective_max(min, max);
                let (low, high) = match (min.checked_mul(100), upper.checked_mul(100)) {
                    (Some(low), Some(high)) => (low, high),
                    _ => {
                        return Err(FixtureError::invalid_constraint(format!(
                            "PRICE band [{}, {}] does not fit in cents",
                            min, upper
                        )))
                    }
                };
                let (cents, seed) = self.seed.next_in_range(low, high);
                self.seed = seed;
                Ok(Value::Price(Price::from_cents(cents)))
            }
            _ => {
                let (hook_seed, seed) = self.seed.split();
                self.seed = seed;
                match self
                    .custom
                    .generate_custom_value(tag, constraints, hook_seed)?
                {
                    CustomValue::Value(value) => Ok(value),
                    CustomValue::Declined => Err(FixtureError::UnsupportedType {
                        tag: tag.name().to_string(),
                    }),
                }
            }
        }
    }

    /// `max` raised to `min`, or `min` plus a random positive offset.
    fn effective_max(&mut self, min: i64, max: Option<i64>) -> i64 {
        match max {
            Some(max) => max.max(min),
            None => {
                let (offset, seed) = self
                    .seed
                    .next_in_range(1, self.config.unbounded_integer_span);
                self.seed = seed;
                min.saturating_add(offset)
            }
        }
    }

    /// A fraction in `[0, 1]` nudged towards the band.
    ///
    /// Only approximately bounded: values below `min` are shifted up by
    /// `min`, values above `max` are pulled down by half the band width.
    fn float_near(&mut self, min: i64, max: Option<i64>) -> f64 {
        let (mut value, seed) = self.seed.next_unit_f64();
        self.seed = seed;

        let low = min as f64;
        if min != 0 && value < low {
            value += low;
        }
        if let Some(max) = max {
            let high = max as f64;
            if value > high {
                value -= (high - low) / 2.0;
            }
        }
        value
    }
}
