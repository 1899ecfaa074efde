//! Type tags and the constraint sets that narrow generated values.

use crate::chars::CharacterClass;
use crate::error::{FixtureError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Category of data to synthesize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeTag {
    Alpha,
    AlphaSpaces,
    Numeric,
    AlphaNumeric,
    AlphaNumericSpaces,
    Integer,
    Float,
    Price,
    /// Anything else; handed to the custom value hook. Stored uppercased.
    Custom(String),
}

impl TypeTag {
    /// Canonical uppercase name of the tag.
    pub fn name(&self) -> &str {
        match self {
            TypeTag::Alpha => "ALPHA",
            TypeTag::AlphaSpaces => "ALPHA_SPACES",
            TypeTag::Numeric => "NUMERIC",
            TypeTag::AlphaNumeric => "ALPHA_NUMERIC",
            TypeTag::AlphaNumericSpaces => "ALPHA_NUMERIC_SPACES",
            TypeTag::Integer => "INTEGER",
            TypeTag::Float => "FLOAT",
            TypeTag::Price => "PRICE",
            TypeTag::Custom(name) => name,
        }
    }

    /// Character classes for the string categories, `None` otherwise.
    pub fn character_classes(&self) -> Option<&'static [CharacterClass]> {
        use CharacterClass::{Alpha, Numeric, Spaces};
        let classes: &'static [CharacterClass] = match self {
            TypeTag::Alpha => &[Alpha],
            TypeTag::AlphaSpaces => &[Alpha, Spaces],
            TypeTag::Numeric => &[Numeric],
            TypeTag::AlphaNumeric => &[Alpha, Numeric],
            TypeTag::AlphaNumericSpaces => &[Alpha, Numeric, Spaces],
            _ => return None,
        };
        Some(classes)
    }
}

impl FromStr for TypeTag {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Ok(match upper.as_str() {
            "ALPHA" => TypeTag::Alpha,
            "ALPHA_SPACES" => TypeTag::AlphaSpaces,
            "NUMERIC" => TypeTag::Numeric,
            "ALPHA_NUMERIC" => TypeTag::AlphaNumeric,
            "ALPHA_NUMERIC_SPACES" => TypeTag::AlphaNumericSpaces,
            "INTEGER" => TypeTag::Integer,
            "FLOAT" => TypeTag::Float,
            "PRICE" => TypeTag::Price,
            _ => TypeTag::Custom(upper),
        })
    }
}

impl From<&str> for TypeTag {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(tag) => tag,
            Err(never) => match never {},
        }
    }
}

impl From<String> for TypeTag {
    fn from(s: String) -> Self {
        TypeTag::from(s.as_str())
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.name().to_string()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which prior-value pool a `UNIQUE` constraint checks against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UniqueScope {
    /// Bare flag; shares the session's default pool.
    Flag,
    /// Named pool, e.g. one per field.
    Keyed(String),
}

impl UniqueScope {
    /// Registry key of the pool.
    pub fn key(&self) -> Option<&str> {
        match self {
            UniqueScope::Flag => None,
            UniqueScope::Keyed(key) => Some(key),
        }
    }
}

/// A single constraint, as written at the call boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Min(i64),
    Max(i64),
    Unique(UniqueScope),
    Lowercase,
    Uppercase,
    IsUserId,
    Yesterday,
}

impl FromStr for Constraint {
    type Err = FixtureError;

    /// Parse `NAME` or `NAME=PARAM`; names are case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        let (name, param) = match s.split_once('=') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (s.trim(), None),
        };

        let number = |param: Option<&str>| -> Result<i64> {
            let param = param.ok_or_else(|| {
                FixtureError::invalid_constraint(format!("{} needs a value", name))
            })?;
            param.parse::<i64>().map_err(|_| {
                FixtureError::invalid_constraint(format!("{} value '{}' is not an integer", name, param))
            })
        };

        match name.to_uppercase().as_str() {
            "MIN" => Ok(Constraint::Min(number(param)?)),
            "MAX" => Ok(Constraint::Max(number(param)?)),
            "UNIQUE" => Ok(Constraint::Unique(match param {
                Some(key) if !key.is_empty() => UniqueScope::Keyed(key.to_string()),
                _ => UniqueScope::Flag,
            })),
            "LOWERCASE" => Ok(Constraint::Lowercase),
            "UPPERCASE" => Ok(Constraint::Uppercase),
            "USERID" | "IS_USER_ID" => Ok(Constraint::IsUserId),
            "YESTERDAY" => Ok(Constraint::Yesterday),
            other => Err(FixtureError::invalid_constraint(format!(
                "unknown constraint '{}'",
                other
            ))),
        }
    }
}

/// Bounds and flags narrowing a generated value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintSet {
    /// Numeric lower bound or minimum string length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,

    /// Upper bound; absent or negative means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,

    #[serde(
        serialize_with = "serialize_unique",
        deserialize_with = "deserialize_unique",
        skip_serializing_if = "Option::is_none"
    )]
    pub unique: Option<UniqueScope>,

    #[serde(skip_serializing_if = "is_false")]
    pub lowercase: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub uppercase: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub is_user_id: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub yesterday: bool,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Require uniqueness against the session's default pool.
    pub fn unique(mut self) -> Self {
        self.unique = Some(UniqueScope::Flag);
        self
    }

    /// Require uniqueness against the named pool.
    pub fn unique_in(mut self, key: impl Into<String>) -> Self {
        self.unique = Some(UniqueScope::Keyed(key.into()));
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn user_id(mut self) -> Self {
        self.is_user_id = true;
        self
    }

    pub fn yesterday(mut self) -> Self {
        self.yesterday = true;
        self
    }

    /// Fold one parsed constraint into the set.
    pub fn apply(&mut self, constraint: Constraint) {
        match constraint {
            Constraint::Min(min) => self.min = Some(min),
            Constraint::Max(max) => self.max = Some(max),
            Constraint::Unique(scope) => self.unique = Some(scope),
            Constraint::Lowercase => self.lowercase = true,
            Constraint::Uppercase => self.uppercase = true,
            Constraint::IsUserId => self.is_user_id = true,
            Constraint::Yesterday => self.yesterday = true,
        }
    }

    /// Parse a list of `NAME[=PARAM]` strings into a set.
    pub fn parse_all<S: AsRef<str>>(items: &[S]) -> Result<Self> {
        let mut set = ConstraintSet::new();
        for item in items {
            set.apply(item.as_ref().parse()?);
        }
        Ok(set)
    }

    /// Lower bound, defaulting to 0.
    pub fn min_bound(&self) -> i64 {
        self.min.unwrap_or(0)
    }

    /// Upper bound, `None` when absent or negative.
    pub fn max_bound(&self) -> Option<i64> {
        self.max.filter(|max| *max >= 0)
    }

    /// Whether string generation mirrors characters to uppercase.
    pub fn case_sensitive(&self) -> bool {
        !self.lowercase
    }

    /// Split off the uniqueness requirement, returning the remaining set.
    pub fn split_unique(&self) -> (Self, Option<UniqueScope>) {
        let mut rest = self.clone();
        let scope = rest.unique.take();
        (rest, scope)
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        let mut set = ConstraintSet::new();
        for constraint in iter {
            set.apply(constraint);
        }
        set
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

fn serialize_unique<S: Serializer>(
    scope: &Option<UniqueScope>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match scope {
        Some(UniqueScope::Keyed(key)) => serializer.serialize_str(key),
        Some(UniqueScope::Flag) => serializer.serialize_bool(true),
        None => serializer.serialize_bool(false),
    }
}

/// Accepts `true`/`false` or a pool key string.
fn deserialize_unique<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<UniqueScope>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Flag(bool),
        Key(String),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        None | Some(Repr::Flag(false)) => None,
        Some(Repr::Flag(true)) => Some(UniqueScope::Flag),
        Some(Repr::Key(key)) => Some(UniqueScope::Keyed(key)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags_are_case_insensitive() {
        assert_eq!(TypeTag::from("alpha_numeric"), TypeTag::AlphaNumeric);
        assert_eq!(TypeTag::from("Price"), TypeTag::Price);
        assert_eq!(
            TypeTag::from("email"),
            TypeTag::Custom("EMAIL".to_string())
        );
    }

    #[test]
    fn test_constraint_parsing() {
        assert_eq!("min=5".parse::<Constraint>(), Ok(Constraint::Min(5)));
        assert_eq!(
            "UNIQUE".parse::<Constraint>(),
            Ok(Constraint::Unique(UniqueScope::Flag))
        );
        assert_eq!(
            "unique=login".parse::<Constraint>(),
            Ok(Constraint::Unique(UniqueScope::Keyed("login".to_string())))
        );
        assert_eq!("userid".parse::<Constraint>(), Ok(Constraint::IsUserId));
        assert!("max".parse::<Constraint>().is_err());
        assert!("max=ten".parse::<Constraint>().is_err());
        assert!("shiny".parse::<Constraint>().is_err());
    }

    #[test]
    fn test_bounds_defaults() {
        let set = ConstraintSet::new();
        assert_eq!(set.min_bound(), 0);
        assert_eq!(set.max_bound(), None);

        let set = ConstraintSet::new().with_min(3).with_max(-1);
        assert_eq!(set.min_bound(), 3);
        assert_eq!(set.max_bound(), None);
    }

    #[test]
    fn test_split_unique_strips_marker() {
        let set = ConstraintSet::parse_all(&["min=2", "unique=name"]).unwrap();
        let (rest, scope) = set.split_unique();
        assert_eq!(rest.unique, None);
        assert_eq!(rest.min, Some(2));
        assert_eq!(scope, Some(UniqueScope::Keyed("name".to_string())));
    }

    #[test]
    fn test_json_unique_forms() {
        let set: ConstraintSet = serde_json::from_str(r#"{"min": 1, "unique": true}"#).unwrap();
        assert_eq!(set.unique, Some(UniqueScope::Flag));

        let set: ConstraintSet = serde_json::from_str(r#"{"unique": "login"}"#).unwrap();
        assert_eq!(set.unique, Some(UniqueScope::Keyed("login".to_string())));

        let set: ConstraintSet = serde_json::from_str(r#"{"unique": false}"#).unwrap();
        assert_eq!(set.unique, None);
    }
}
