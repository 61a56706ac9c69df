//! Walk configuration: monitored trait and trunk threshold.

use crate::error::AnalysisError;
use std::fmt;
use std::str::FromStr;

/// Lower bound on the trunk count of an edge for it to be walked.
///
/// An edge is part of the walked trunk if its count is strictly greater
/// than the threshold. The default of 0 keeps every edge that at least one
/// leaf walk crossed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrunkThreshold(u64);

impl TrunkThreshold {
    /// # Errors
    /// Returns [AnalysisError::InvalidThreshold] if `value` is negative.
    pub fn new(value: i64) -> Result<Self, AnalysisError> {
        u64::try_from(value)
            .map(TrunkThreshold)
            .map_err(|_| AnalysisError::InvalidThreshold(format!("{value} is negative")))
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Whether an edge with the given trunk count passes the threshold.
    pub fn is_exceeded_by(&self, trunk_count: u64) -> bool {
        trunk_count > self.0
    }
}

impl TryFrom<i64> for TrunkThreshold {
    type Error = AnalysisError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        TrunkThreshold::new(value)
    }
}

impl FromStr for TrunkThreshold {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| AnalysisError::InvalidThreshold(format!("'{s}' is not an integer")))?;
        TrunkThreshold::new(value)
    }
}

impl fmt::Display for TrunkThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settings of one trunk trait walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkConfig {
    /// Annotation key of the discrete trait to follow
    pub trait_name: String,
    pub threshold: TrunkThreshold,
}

impl WalkConfig {
    /// Walk over `trait_name` with the default threshold of 0.
    pub fn new(trait_name: impl Into<String>) -> Self {
        WalkConfig {
            trait_name: trait_name.into(),
            threshold: TrunkThreshold::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: TrunkThreshold) -> Self {
        self.threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_from_str() {
        assert_eq!("3".parse::<TrunkThreshold>().unwrap().value(), 3);
        assert_eq!(" 0 ".parse::<TrunkThreshold>().unwrap(), TrunkThreshold::default());
    }

    #[test]
    fn test_threshold_rejects_negative_and_non_integer() {
        for input in ["-1", "1.5", "two", ""] {
            assert!(
                matches!(
                    input.parse::<TrunkThreshold>(),
                    Err(AnalysisError::InvalidThreshold(_))
                ),
                "accepted {input:?}"
            );
        }
        assert!(TrunkThreshold::new(-4).is_err());
    }

    #[test]
    fn test_threshold_is_strict() {
        let threshold = TrunkThreshold::new(2).unwrap();
        assert!(!threshold.is_exceeded_by(2));
        assert!(threshold.is_exceeded_by(3));
        assert!(!TrunkThreshold::default().is_exceeded_by(0));
    }
}
