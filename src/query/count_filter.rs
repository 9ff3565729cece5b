//! Count predicates shared by the dependent-count and dependency-count queries.

use std::fmt;
use std::str::FromStr;

/// Error returned when a textual count expression cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid count expression '{0}'. Expected format: number, >number, >=number, <number, <=number, or min-max.")]
pub struct ExpressionError(pub String);

/// A predicate over a dependent or dependency count.
///
/// Parses from the expressions accepted on the command line:
///
/// ```rust
/// use typedeps::query::CountFilter;
///
/// assert_eq!("5".parse(), Ok(CountFilter::Exact(5)));
/// assert_eq!(">=2".parse(), Ok(CountFilter::GreaterThanOrEqual(2)));
/// assert_eq!("2-10".parse(), Ok(CountFilter::Range(2, 10)));
/// assert!("lots".parse::<CountFilter>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFilter {
    /// `count == n`
    Exact(usize),
    /// `count > n`
    GreaterThan(usize),
    /// `count >= n`
    GreaterThanOrEqual(usize),
    /// `count < n`
    LessThan(usize),
    /// `count <= n`
    LessThanOrEqual(usize),
    /// `min <= count <= max`
    Range(usize, usize),
}

impl CountFilter {
    /// Returns true if `count` satisfies this predicate.
    pub fn matches(&self, count: usize) -> bool {
        match *self {
            Self::Exact(n) => count == n,
            Self::GreaterThan(n) => count > n,
            Self::GreaterThanOrEqual(n) => count >= n,
            Self::LessThan(n) => count < n,
            Self::LessThanOrEqual(n) => count <= n,
            Self::Range(min, max) => min <= count && count <= max,
        }
    }
}

impl FromStr for CountFilter {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expression = s.trim();
        let invalid = || ExpressionError(s.to_string());
        let number = |part: &str| part.trim().parse::<usize>().map_err(|_| invalid());

        if let Some((min, max)) = expression.split_once('-') {
            return Ok(Self::Range(number(min)?, number(max)?));
        }
        if let Some(rest) = expression.strip_prefix(">=") {
            return Ok(Self::GreaterThanOrEqual(number(rest)?));
        }
        if let Some(rest) = expression.strip_prefix("<=") {
            return Ok(Self::LessThanOrEqual(number(rest)?));
        }
        if let Some(rest) = expression.strip_prefix('>') {
            return Ok(Self::GreaterThan(number(rest)?));
        }
        if let Some(rest) = expression.strip_prefix('<') {
            return Ok(Self::LessThan(number(rest)?));
        }

        number(expression).map(Self::Exact)
    }
}

impl fmt::Display for CountFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{}", n),
            Self::GreaterThan(n) => write!(f, ">{}", n),
            Self::GreaterThanOrEqual(n) => write!(f, ">={}", n),
            Self::LessThan(n) => write!(f, "<{}", n),
            Self::LessThanOrEqual(n) => write!(f, "<={}", n),
            Self::Range(min, max) => write!(f, "{}-{}", min, max),
        }
    }
}
