//! Upper/lower estimates for coefficients supplied as a range.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which end of a ranged coefficient to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Upper,
    Lower,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Upper => f.write_str("upper"),
            Bound::Lower => f.write_str("lower"),
        }
    }
}

impl FromStr for Bound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "upper" => Ok(Bound::Upper),
            "lower" => Ok(Bound::Lower),
            other => Err(format!("unknown bound: {}", other)),
        }
    }
}

/// A coefficient given either as a single value or as an upper/lower pair.
///
/// Serialized untagged: a bare value, or an object with `upper` and `lower`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ranged<T> {
    Range { upper: T, lower: T },
    Single(T),
}

impl<T: Copy> Ranged<T> {
    /// The explicit bound when one is asked for, the upper end otherwise.
    /// Single values ignore the bound.
    pub fn resolve(&self, bound: Option<Bound>) -> T {
        match (self, bound) {
            (Ranged::Single(value), _) => *value,
            (Ranged::Range { lower, .. }, Some(Bound::Lower)) => *lower,
            (Ranged::Range { upper, .. }, _) => *upper,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Ranged::Range { .. })
    }

    pub fn map<U>(self, f: impl Fn(T) -> U) -> Ranged<U> {
        match self {
            Ranged::Single(value) => Ranged::Single(f(value)),
            Ranged::Range { upper, lower } => Ranged::Range {
                upper: f(upper),
                lower: f(lower),
            },
        }
    }
}

impl<T> From<T> for Ranged<T> {
    fn from(value: T) -> Self {
        Ranged::Single(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_bound_wins() {
        let r = Ranged::Range {
            upper: 10.0,
            lower: 2.0,
        };
        assert_eq!(r.resolve(Some(Bound::Lower)), 2.0);
        assert_eq!(r.resolve(Some(Bound::Upper)), 10.0);
    }

    #[test]
    fn missing_bound_defaults_to_upper() {
        let r = Ranged::Range {
            upper: 10.0,
            lower: 2.0,
        };
        assert_eq!(r.resolve(None), 10.0);
    }

    #[test]
    fn single_value_ignores_bound() {
        let r = Ranged::Single(4.0);
        assert_eq!(r.resolve(Some(Bound::Lower)), 4.0);
        assert_eq!(r.resolve(None), 4.0);
        assert!(!r.is_range());
    }

    #[test]
    fn deserializes_both_shapes() {
        let single: Ranged<f64> = serde_json::from_str("3.5").unwrap();
        assert_eq!(single, Ranged::Single(3.5));

        let range: Ranged<f64> = serde_json::from_str(r#"{"upper": 2.0, "lower": 1.0}"#).unwrap();
        assert_eq!(
            range,
            Ranged::Range {
                upper: 2.0,
                lower: 1.0
            }
        );
    }

    #[test]
    fn bound_parses_case_insensitively() {
        assert_eq!("UPPER".parse::<Bound>().unwrap(), Bound::Upper);
        assert_eq!("lower".parse::<Bound>().unwrap(), Bound::Lower);
        assert!("middle".parse::<Bound>().is_err());
    }
}
