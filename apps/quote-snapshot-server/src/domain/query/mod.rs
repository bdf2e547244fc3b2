//! Snapshot Queries
//!
//! A [`QuoteQuery`] is a conjunction of optional constraints: symbol
//! equality, interval equality, an inclusive datetime range, and output size
//! equality. Comparisons are exact string comparisons; the datetime range
//! relies on lexicographic ordering and is never parsed as a calendar date.
//!
//! # Match Policy
//!
//! [`MatchPolicy::FirstRecord`] only ever inspects the first record of the
//! snapshot: if it does not match, the lookup misses even when a later
//! record would have matched. This is the service's historical lookup
//! behaviour and remains the default. [`MatchPolicy::FullScan`] scans every
//! record and returns the first match.

use std::fmt;
use std::str::FromStr;

use super::quote::QuoteRecord;

// =============================================================================
// Datetime Range
// =============================================================================

/// Inclusive `[start, end]` range over datetime strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatetimeRange {
    start: String,
    end: String,
}

impl DatetimeRange {
    /// Create a range. Bounds are not validated or reordered.
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Lower bound.
    #[must_use]
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Upper bound.
    #[must_use]
    pub fn end(&self) -> &str {
        &self.end
    }

    /// Whether `datetime` falls within the range, bounds included.
    #[must_use]
    pub fn contains(&self, datetime: &str) -> bool {
        self.start.as_str() <= datetime && datetime <= self.end.as_str()
    }
}

// =============================================================================
// Quote Query
// =============================================================================

/// Set of constraints a record must satisfy. An empty query matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteQuery {
    symbol: Option<String>,
    interval: Option<String>,
    range: Option<DatetimeRange>,
    outputsize: Option<String>,
}

impl QuoteQuery {
    /// Query with no constraints.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Query constrained to one symbol.
    #[must_use]
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            ..Self::default()
        }
    }

    /// Add an interval constraint.
    #[must_use]
    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    /// Add an inclusive datetime range constraint.
    #[must_use]
    pub fn with_range(mut self, range: DatetimeRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Add an output size constraint, compared against the record's decimal
    /// rendering (so `"010"` does not match `10`).
    #[must_use]
    pub fn with_outputsize(mut self, outputsize: impl Into<String>) -> Self {
        self.outputsize = Some(outputsize.into());
        self
    }

    /// Whether no constraint is set.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.symbol.is_none()
            && self.interval.is_none()
            && self.range.is_none()
            && self.outputsize.is_none()
    }

    /// Whether `record` satisfies every supplied constraint.
    #[must_use]
    pub fn matches(&self, record: &QuoteRecord) -> bool {
        if let Some(symbol) = &self.symbol
            && record.symbol != *symbol
        {
            return false;
        }
        if let Some(interval) = &self.interval
            && record.interval != *interval
        {
            return false;
        }
        if let Some(range) = &self.range
            && !range.contains(&record.datetime)
        {
            return false;
        }
        if let Some(outputsize) = &self.outputsize
            && record.outputsize.to_string() != *outputsize
        {
            return false;
        }
        true
    }
}

// =============================================================================
// Match Policy
// =============================================================================

/// How many records a lookup inspects before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Inspect only the first record; a mismatch there is a miss.
    #[default]
    FirstRecord,
    /// Inspect every record in order and return the first match.
    FullScan,
}

impl MatchPolicy {
    /// Configuration name of the policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstRecord => "first-record",
            Self::FullScan => "full-scan",
        }
    }

    /// Apply the policy to `records`.
    #[must_use]
    pub fn find_first<'a>(
        self,
        records: &'a [QuoteRecord],
        query: &QuoteQuery,
    ) -> Option<&'a QuoteRecord> {
        match self {
            Self::FirstRecord => records.first().filter(|r| query.matches(r)),
            Self::FullScan => records.iter().find(|r| query.matches(r)),
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown match policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown match policy '{0}' (expected 'first-record' or 'full-scan')")]
pub struct ParseMatchPolicyError(String);

impl FromStr for MatchPolicy {
    type Err = ParseMatchPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "first-record" | "first" => Ok(Self::FirstRecord),
            "full-scan" | "scan" => Ok(Self::FullScan),
            _ => Err(ParseMatchPolicyError(s.to_string())),
        }
    }
}
