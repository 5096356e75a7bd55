//! Ordinal risk tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest score that makes a comment [`Tier::Suspicious`].
pub const SUSPICIOUS_THRESHOLD: u32 = 5;

/// Lowest score that makes a comment [`Tier::Dangerous`].
pub const DANGEROUS_THRESHOLD: u32 = 10;

/// Risk tier assigned to a comment.
///
/// Variants are declared in ascending severity, so the derived `Ord` gives
/// `Safe < Suspicious < Dangerous`. That order is also the tie-breaking
/// priority used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Score below the suspicious threshold.
    Safe,
    /// Score at or above the suspicious threshold but below dangerous.
    Suspicious,
    /// Score at or above the dangerous threshold.
    Dangerous,
}

impl Tier {
    /// All tiers in ascending severity.
    pub const ALL: [Tier; 3] = [Tier::Safe, Tier::Suspicious, Tier::Dangerous];

    /// Map a keyword score to a tier. Thresholds are inclusive lower bounds
    /// checked highest-first.
    pub fn from_score(score: u32) -> Self {
        if score >= DANGEROUS_THRESHOLD {
            Tier::Dangerous
        } else if score >= SUSPICIOUS_THRESHOLD {
            Tier::Suspicious
        } else {
            Tier::Safe
        }
    }

    /// Parse a tier from its exact display name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Safe" => Some(Tier::Safe),
            "Suspicious" => Some(Tier::Suspicious),
            "Dangerous" => Some(Tier::Dangerous),
            _ => None,
        }
    }

    /// The display name of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Safe => "Safe",
            Tier::Suspicious => "Suspicious",
            Tier::Dangerous => "Dangerous",
        }
    }

    /// Position of this tier in [`Tier::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Tier::Safe => 0,
            Tier::Suspicious => 1,
            Tier::Dangerous => 2,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(Tier::from_score(0), Tier::Safe);
        assert_eq!(Tier::from_score(4), Tier::Safe);
        assert_eq!(Tier::from_score(5), Tier::Suspicious);
        assert_eq!(Tier::from_score(9), Tier::Suspicious);
        assert_eq!(Tier::from_score(10), Tier::Dangerous);
        assert_eq!(Tier::from_score(130), Tier::Dangerous);
    }

    #[test]
    fn test_ordering() {
        assert!(Tier::Safe < Tier::Suspicious);
        assert!(Tier::Suspicious < Tier::Dangerous);
        for (i, tier) in Tier::ALL.iter().enumerate() {
            assert_eq!(tier.index(), i);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_name(tier.as_str()), Some(tier));
        }
        assert_eq!(Tier::from_name("safe"), None);
        assert_eq!(Tier::from_name(""), None);
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&Tier::Suspicious).unwrap();
        assert_eq!(json, "\"Suspicious\"");
    }
}
