use serde::{Deserialize, Serialize};
use std::fmt;

/// Triage urgency level, 1 (most critical) through 5 (least urgent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct UrgencyLevel(u8);

impl UrgencyLevel {
    pub const CRITICAL: UrgencyLevel = UrgencyLevel(1);
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Build a level from an untrusted integer
    pub fn new(level: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&level) {
            Some(Self(level as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position in per-level lookup tables
    pub fn index(self) -> usize {
        usize::from(self.0 - Self::MIN)
    }

    pub fn is_critical(self) -> bool {
        self == Self::CRITICAL
    }

    /// All levels, most critical first
    pub fn all() -> impl Iterator<Item = UrgencyLevel> {
        (Self::MIN..=Self::MAX).map(UrgencyLevel)
    }
}

impl TryFrom<u8> for UrgencyLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
            .ok_or_else(|| format!("Invalid urgency level: {value} (expected 1-5)"))
    }
}

impl From<UrgencyLevel> for u8 {
    fn from(level: UrgencyLevel) -> Self {
        level.0
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
