//! Custom value hook for the formatted tags fixture managers commonly need.

use crate::chars::{characters_of, random_string, CharacterClass};
use crate::constraint::{ConstraintSet, TypeTag};
use crate::data::Seed;
use crate::error::Result;
use crate::gen::{CustomValue, CustomValues};
use crate::value::Value;
use chrono::{DateTime, Duration, Utc};

const TOP_LEVEL_DOMAINS: [&str; 4] = ["com", "org", "net", "no"];

/// Furthest back a generated date may lie, about ten thousand years.
pub const MAX_PAST_DAYS: i64 = 3_652_425;

/// Generates `EMAIL`, `PATH`, `XML`, `DATE`, `DATETIME`, `TIMESTAMP` and
/// `USER_ID` values; declines everything else.
///
/// Dates fall within `past_days` before `now`, or on the day before `now`
/// under `YESTERDAY`. `USER_ID`, or any custom tag under `IS_USER_ID`, picks
/// from the configured user id pool.
#[derive(Debug, Clone)]
pub struct CommonFormats {
    now: DateTime<Utc>,
    past_days: i64,
    user_ids: Vec<i64>,
}

impl Default for CommonFormats {
    fn default() -> Self {
        Self::new()
    }
}

impl CommonFormats {
    pub fn new() -> Self {
        CommonFormats {
            now: Utc::now(),
            past_days: 365,
            user_ids: Vec::new(),
        }
    }

    /// Pin the reference instant dates are computed from.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Dates lie at most `days` before `now`, clamped to
    /// `[0, MAX_PAST_DAYS]`.
    pub fn with_past_days(mut self, days: i64) -> Self {
        self.past_days = days.clamp(0, MAX_PAST_DAYS);
        self
    }

    /// Ids of existing users, for `USER_ID` values.
    pub fn with_user_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.user_ids = ids.into_iter().collect();
        self
    }

    fn instant(&self, constraints: &ConstraintSet, seed: Seed) -> DateTime<Utc> {
        if constraints.yesterday {
            let (seconds, _) = seed.next_in_range(0, 86_399);
            let midnight = (self.now - Duration::days(1))
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc())
                .unwrap_or(self.now);
            return midnight + Duration::seconds(seconds);
        }
        let (seconds, _) = seed.next_in_range(0, self.past_days.saturating_mul(86_400));
        self.now
            .checked_sub_signed(Duration::seconds(seconds))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    fn word(&self, min: usize, max: usize, seed: Seed) -> Result<(String, Seed)> {
        let characters = characters_of(&[CharacterClass::Alpha, CharacterClass::Numeric], false);
        random_string(&characters, min, Some(max), 0, seed)
    }

    fn email(&self, constraints: &ConstraintSet, seed: Seed) -> Result<String> {
        let min = constraints.min.map_or(3, |m| m.max(1) as usize);
        let max = constraints.max_bound().map_or(12, |m| m as usize).max(min);
        let (local, seed) = self.word(min, max, seed)?;
        let (domain, seed) = self.word(3, 10, seed)?;
        let (tld, _) = seed.next_bounded(TOP_LEVEL_DOMAINS.len() as u64);
        Ok(format!("{}@{}.{}", local, domain, TOP_LEVEL_DOMAINS[tld as usize]))
    }

    fn path(&self, constraints: &ConstraintSet, seed: Seed) -> Result<String> {
        let (depth, mut seed) = seed.next_usize_in_range(1, 3);
        let mut segments = Vec::with_capacity(depth);
        for _ in 0..depth {
            let (segment, next) = self.word(3, 12, seed)?;
            seed = next;
            segments.push(segment);
        }
        let path = format!("/{}", segments.join("/"));
        Ok(if constraints.uppercase {
            path.to_uppercase()
        } else {
            path
        })
    }

    fn xml(&self, constraints: &ConstraintSet, seed: Seed) -> Result<String> {
        let characters = characters_of(
            &[CharacterClass::Alpha, CharacterClass::Spaces],
            constraints.case_sensitive(),
        );
        let min = constraints.min.map_or(1, |m| m.max(0) as usize);
        let max = constraints.max_bound().map(|m| m as usize);
        let (text, _) = random_string(&characters, min, max, 200, seed)?;
        Ok(format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <section xmlns=\"http://ez.no/namespaces/ezpublish3/section/\">\
             <paragraph>{}</paragraph></section>\n",
            text
        ))
    }

    fn user_id(&self, seed: Seed) -> CustomValue {
        if self.user_ids.is_empty() {
            return CustomValue::Declined;
        }
        let (index, _) = seed.next_bounded(self.user_ids.len() as u64);
        CustomValue::Value(Value::Int(self.user_ids[index as usize]))
    }
}

impl CustomValues for CommonFormats {
    fn generate_custom_value(
        &mut self,
        tag: &TypeTag,
        constraints: &ConstraintSet,
        seed: Seed,
    ) -> Result<CustomValue> {
        let value = match tag.name() {
            "USER_ID" => return Ok(self.user_id(seed)),
            _ if constraints.is_user_id => return Ok(self.user_id(seed)),
            "EMAIL" => Value::Str(self.email(constraints, seed)?),
            "PATH" => Value::Str(self.path(constraints, seed)?),
            "XML" => Value::Str(self.xml(constraints, seed)?),
            "DATE" => Value::Str(self.instant(constraints, seed).format("%Y-%m-%d").to_string()),
            "DATETIME" => Value::Str(
                self.instant(constraints, seed)
                    .format("%Y-%m-%dT%H:%M:%S")
                    .to_string(),
            ),
            "TIMESTAMP" => Value::Int(self.instant(constraints, seed).timestamp()),
            _ => return Ok(CustomValue::Declined),
        };
        Ok(CustomValue::Value(value))
    }
}
