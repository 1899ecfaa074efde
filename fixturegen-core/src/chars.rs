//! Named character classes and random string sampling.

use crate::data::Seed;
use crate::error::{FixtureError, Result};
use std::fmt;
use std::str::FromStr;

/// The fixed registry of character classes strings are sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    Alpha,
    Numeric,
    Spaces,
    Punctuation,
    Accentuation,
    NonWestern,
    Special,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 7] = [
        CharacterClass::Alpha,
        CharacterClass::Numeric,
        CharacterClass::Spaces,
        CharacterClass::Punctuation,
        CharacterClass::Accentuation,
        CharacterClass::NonWestern,
        CharacterClass::Special,
    ];

    /// Registry name of the class.
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Alpha => "ALPHA",
            CharacterClass::Numeric => "NUMERIC",
            CharacterClass::Spaces => "SPACES",
            CharacterClass::Punctuation => "PUNCTUATION",
            CharacterClass::Accentuation => "ACCENTUATION",
            CharacterClass::NonWestern => "NON_WESTERN",
            CharacterClass::Special => "SPECIAL",
        }
    }

    /// Characters belonging to the class.
    pub fn characters(&self) -> &'static str {
        match self {
            CharacterClass::Alpha => "abcdefghijklmnopqrstuvwxyz",
            CharacterClass::Numeric => "0123456789",
            CharacterClass::Spaces => "        ",
            CharacterClass::Punctuation => ".,:;-_!?",
            CharacterClass::Accentuation => "áéíóúýâêîôûãñõäëïöüÿåæœçðøßşğ",
            // chinese, then japanese kanji, hiragana and katakana
            CharacterClass::NonWestern => {
                "電电電熱热熱聽麥麦私金魚莨煙草東京わたしきんぎょたトウキョウタバコ"
            }
            CharacterClass::Special => "@`´~^'\"#$%&{}()[]&=«»*+ªº£§\\|<>",
        }
    }
}

impl FromStr for CharacterClass {
    type Err = FixtureError;

    fn from_str(name: &str) -> Result<Self> {
        let upper = name.to_uppercase();
        CharacterClass::ALL
            .into_iter()
            .find(|class| class.name() == upper)
            .ok_or(FixtureError::UnknownCharacterClass { name: upper })
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Collect the characters of the named classes, in request order.
///
/// With `case_sensitive` the uppercase form of every collected character is
/// appended as well.
pub fn character_list<S: AsRef<str>>(names: &[S], case_sensitive: bool) -> Result<Vec<char>> {
    let classes = names
        .iter()
        .map(|name| name.as_ref().parse::<CharacterClass>())
        .collect::<Result<Vec<_>>>()?;
    Ok(characters_of(&classes, case_sensitive))
}

/// Typed variant of [`character_list`].
pub fn characters_of(classes: &[CharacterClass], case_sensitive: bool) -> Vec<char> {
    let mut characters: Vec<char> = classes
        .iter()
        .flat_map(|class| class.characters().chars())
        .collect();

    if case_sensitive {
        let upper: Vec<char> = characters
            .iter()
            .flat_map(|c| c.to_uppercase())
            .collect();
        characters.extend(upper);
    }

    characters
}

/// Sample a random string from `characters`.
///
/// The length is drawn uniformly from `[min, max]`. Without `max` the upper
/// bound becomes `min` plus a random offset of at most `unbounded_span`; a
/// `max` below `min` is raised to `min`.
pub fn random_string(
    characters: &[char],
    min: usize,
    max: Option<usize>,
    unbounded_span: usize,
    seed: Seed,
) -> Result<(String, Seed)> {
    let (effective_max, seed) = match max {
        Some(max) => (max.max(min), seed),
        None => {
            let (offset, seed) = seed.next_usize_in_range(0, unbounded_span);
            (min.saturating_add(offset), seed)
        }
    };

    let (total, mut seed) = seed.next_usize_in_range(min, effective_max);
    if total > 0 && characters.is_empty() {
        return Err(FixtureError::EmptyCharacterSet { length: total });
    }

    let mut result = String::with_capacity(total);
    for _ in 0..total {
        let (index, next) = seed.next_bounded(characters.len() as u64);
        seed = next;
        result.push(characters[index as usize]);
    }

    Ok((result, seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names_are_case_insensitive() {
        assert_eq!("alpha".parse::<CharacterClass>(), Ok(CharacterClass::Alpha));
        assert_eq!(
            "Non_Western".parse::<CharacterClass>(),
            Ok(CharacterClass::NonWestern)
        );
    }

    #[test]
    fn test_unknown_class_fails() {
        let err = character_list(&["alpha", "emoji"], false).unwrap_err();
        assert_eq!(
            err,
            FixtureError::UnknownCharacterClass {
                name: "EMOJI".to_string()
            }
        );
    }

    #[test]
    fn test_case_sensitive_appends_uppercase_mirror() {
        let chars = character_list(&["alpha"], true).unwrap();
        assert_eq!(chars.len(), 52);
        assert!(chars.contains(&'a'));
        assert!(chars.contains(&'Z'));

        let lower = character_list(&["alpha"], false).unwrap();
        assert!(lower.iter().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_combined_classes() {
        let chars = character_list(&["numeric", "spaces"], false).unwrap();
        assert!(chars.iter().all(|c| c.is_ascii_digit() || *c == ' '));
    }

    #[test]
    fn test_fixed_length_string() {
        let chars = characters_of(&[CharacterClass::Alpha], false);
        let mut seed = Seed::from_u64(11);
        for _ in 0..50 {
            let (s, next) = random_string(&chars, 5, Some(5), 200, seed).unwrap();
            seed = next;
            assert_eq!(s.chars().count(), 5);
            assert!(s.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_max_below_min_is_raised() {
        let chars = characters_of(&[CharacterClass::Numeric], false);
        let (s, _) = random_string(&chars, 4, Some(1), 200, Seed::from_u64(2)).unwrap();
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_unbounded_length_respects_span() {
        let chars = characters_of(&[CharacterClass::Alpha], false);
        let mut seed = Seed::from_u64(5);
        for _ in 0..100 {
            let (s, next) = random_string(&chars, 3, None, 10, seed).unwrap();
            seed = next;
            assert!((3..=13).contains(&s.len()));
        }
    }

    #[test]
    fn test_empty_set_only_fails_for_nonempty_output() {
        let (s, _) = random_string(&[], 0, Some(0), 200, Seed::from_u64(1)).unwrap();
        assert!(s.is_empty());
        assert_eq!(
            random_string(&[], 2, Some(2), 200, Seed::from_u64(1)).unwrap_err(),
            FixtureError::EmptyCharacterSet { length: 2 }
        );
    }
}
