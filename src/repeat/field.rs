//! Single cron-style field: `*`, `5`, `1-15`, `*/2`, and comma lists of those.

use std::fmt;

use thiserror::Error;

/// Inclusive bounds for one calendar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBounds {
    pub name: &'static str,
    pub min: u32,
    pub max: u32,
}

pub const DAY_OF_MONTH: FieldBounds = FieldBounds { name: "day-of-month", min: 1, max: 31 };
pub const MONTH: FieldBounds = FieldBounds { name: "month", min: 1, max: 12 };
/// Sunday is 0.
pub const DAY_OF_WEEK: FieldBounds = FieldBounds { name: "day-of-week", min: 0, max: 6 };

/// Why a field failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("empty list item")]
    EmptyItem,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("{value} is outside {min}-{max}")]
    OutOfRange { value: u32, min: u32, max: u32 },
    #[error("range {lo}-{hi} runs backwards")]
    ReversedRange { lo: u32, hi: u32 },
    #[error("step base must be '*', found '{0}'")]
    StepBase(String),
    #[error("step must be greater than zero")]
    ZeroStep,
}

/// Parsed form of one field.
///
/// Steps only support a wildcard base: `*/3` matches values divisible by 3.
/// An offset base such as `5/3` is rejected rather than guessed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    Wildcard,
    Value(u32),
    Range(u32, u32),
    Step(u32),
    List(Vec<FieldSpec>),
}

impl FieldSpec {
    /// Parse `text` against `bounds`.
    pub fn parse(text: &str, bounds: FieldBounds) -> Result<Self, FieldError> {
        if text == "*" {
            return Ok(FieldSpec::Wildcard);
        }
        let mut items = text
            .split(',')
            .map(|item| parse_item(item, bounds))
            .collect::<Result<Vec<_>, _>>()?;
        if items.len() == 1 {
            Ok(items.remove(0))
        } else {
            Ok(FieldSpec::List(items))
        }
    }

    /// Does `value` satisfy this field?
    pub fn matches(&self, value: u32) -> bool {
        match self {
            FieldSpec::Wildcard => true,
            FieldSpec::Value(v) => value == *v,
            FieldSpec::Range(lo, hi) => *lo <= value && value <= *hi,
            // Zero steps never survive parsing; a hand-built Step(0) matches nothing.
            FieldSpec::Step(n) => *n != 0 && value % n == 0,
            FieldSpec::List(items) => items.iter().any(|item| item.matches(value)),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, FieldSpec::Wildcard)
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSpec::Wildcard => write!(f, "*"),
            FieldSpec::Value(v) => write!(f, "{v}"),
            FieldSpec::Range(lo, hi) => write!(f, "{lo}-{hi}"),
            FieldSpec::Step(n) => write!(f, "*/{n}"),
            FieldSpec::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

fn parse_item(item: &str, bounds: FieldBounds) -> Result<FieldSpec, FieldError> {
    if item.is_empty() {
        return Err(FieldError::EmptyItem);
    }
    if let Some((base, step)) = item.split_once('/') {
        if base != "*" {
            return Err(FieldError::StepBase(base.to_string()));
        }
        let n = parse_number(step)?;
        if n == 0 {
            return Err(FieldError::ZeroStep);
        }
        return Ok(FieldSpec::Step(n));
    }
    if let Some((lo, hi)) = item.split_once('-') {
        let lo = bounded(parse_number(lo)?, bounds)?;
        let hi = bounded(parse_number(hi)?, bounds)?;
        if lo > hi {
            return Err(FieldError::ReversedRange { lo, hi });
        }
        return Ok(FieldSpec::Range(lo, hi));
    }
    Ok(FieldSpec::Value(bounded(parse_number(item)?, bounds)?))
}

/// Unsigned decimal digits only; signs, spaces and empty strings are rejected.
pub(crate) fn parse_number(s: &str) -> Result<u32, FieldError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::NotANumber(s.to_string()));
    }
    s.parse().map_err(|_| FieldError::NotANumber(s.to_string()))
}

fn bounded(value: u32, bounds: FieldBounds) -> Result<u32, FieldError> {
    if value < bounds.min || value > bounds.max {
        return Err(FieldError::OutOfRange { value, min: bounds.min, max: bounds.max });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dom(s: &str) -> Result<FieldSpec, FieldError> {
        FieldSpec::parse(s, DAY_OF_MONTH)
    }

    #[test]
    fn test_accepts_grammar_forms() {
        assert_eq!(dom("*"), Ok(FieldSpec::Wildcard));
        assert_eq!(dom("1"), Ok(FieldSpec::Value(1)));
        assert_eq!(dom("1-15"), Ok(FieldSpec::Range(1, 15)));
        assert_eq!(dom("*/5"), Ok(FieldSpec::Step(5)));
        assert_eq!(dom("1,15"), Ok(FieldSpec::List(vec![FieldSpec::Value(1), FieldSpec::Value(15)])));
        assert!(dom("1-10,20-28,31").is_ok());
    }

    #[test]
    fn test_rejects_out_of_bounds_and_garbage() {
        assert_eq!(dom("32"), Err(FieldError::OutOfRange { value: 32, min: 1, max: 31 }));
        assert!(dom("0").is_err());
        assert!(dom("1-32").is_err());
        assert!(dom("invalid").is_err());
        assert!(dom("a-5").is_err());
        assert!(dom("1,,2").is_err());
        assert!(dom("-1").is_err());
        assert!(dom("+3").is_err());
        assert_eq!(dom("10-2"), Err(FieldError::ReversedRange { lo: 10, hi: 2 }));
    }

    #[test]
    fn test_step_requires_wildcard_base() {
        assert_eq!(dom("5/3"), Err(FieldError::StepBase("5".into())));
        assert_eq!(dom("*/0"), Err(FieldError::ZeroStep));
        assert!(dom("*/x").is_err());
    }

    #[test]
    fn test_day_of_week_bounds() {
        assert!(FieldSpec::parse("0,6", DAY_OF_WEEK).is_ok());
        assert!(FieldSpec::parse("7", DAY_OF_WEEK).is_err());
        assert!(FieldSpec::parse("13", MONTH).is_err());
    }

    #[test]
    fn test_matches() {
        assert!(FieldSpec::Wildcard.matches(5));
        assert!(FieldSpec::Wildcard.matches(0));
        assert!(FieldSpec::Value(5).matches(5));
        assert!(!FieldSpec::Value(5).matches(6));
        assert!(FieldSpec::Step(2).matches(4));
        assert!(!FieldSpec::Step(2).matches(3));
        assert!(FieldSpec::Range(1, 5).matches(5));
        assert!(!FieldSpec::Range(1, 5).matches(6));
        assert!(!FieldSpec::Step(0).matches(0));
    }

    #[test]
    fn test_matches_lists() {
        let list = dom("1,5,10").unwrap();
        assert!(list.matches(5));
        assert!(!list.matches(7));

        let mixed = dom("1-5,7,9-11").unwrap();
        assert!(mixed.matches(7));
        assert!(mixed.matches(10));
        assert!(!mixed.matches(6));
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(dom("1-5,7,*/3").unwrap().to_string(), "1-5,7,*/3");
        assert_eq!(dom("*").unwrap().to_string(), "*");
    }
}
