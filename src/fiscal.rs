// 📅 Fiscal Year Labels
// "FY2025-26" = April 2025 through March 2026

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A fiscal year identified by the calendar year its April falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FiscalYear {
    start: u16,
}

impl FiscalYear {
    pub const fn new(start: u16) -> Self {
        FiscalYear { start }
    }

    /// Calendar year the fiscal year starts in
    pub fn start_year(&self) -> u16 {
        self.start
    }

    /// Two-digit year the fiscal year ends in (wraps at the century)
    pub fn end_suffix(&self) -> u16 {
        (self.start + 1) % 100
    }

    pub fn next(&self) -> Self {
        self.offset(1)
    }

    pub fn offset(&self, years: u16) -> Self {
        FiscalYear::new(self.start + years)
    }

    /// Label without the "FY" prefix, as used on chart axes: "2025-26"
    pub fn short(&self) -> String {
        format!("{}-{:02}", self.start, self.end_suffix())
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FY{}", self.short())
    }
}

impl FromStr for FiscalYear {
    type Err = DashboardError;

    fn from_str(label: &str) -> Result<Self> {
        let invalid = |reason: &str| DashboardError::InvalidFiscalYear {
            label: label.to_string(),
            reason: reason.to_string(),
        };

        let body = label
            .strip_prefix("FY")
            .ok_or_else(|| invalid("missing 'FY' prefix"))?;
        let (start, end) = body
            .split_once('-')
            .ok_or_else(|| invalid("expected '<start>-<end>'"))?;

        if start.len() != 4 || !start.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("start year must have 4 digits"));
        }
        if end.len() != 2 || !end.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("end year must have 2 digits"));
        }

        let start: u16 = start.parse().map_err(|_| invalid("start year is not a number"))?;
        let end: u16 = end.parse().map_err(|_| invalid("end year is not a number"))?;

        let year = FiscalYear::new(start);
        if year.end_suffix() != end {
            return Err(invalid("end year must follow the start year"));
        }

        Ok(year)
    }
}

impl Serialize for FiscalYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FiscalYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip() {
        let year: FiscalYear = "FY2025-26".parse().unwrap();
        assert_eq!(year.start_year(), 2025);
        assert_eq!(year.end_suffix(), 26);
        assert_eq!(year.to_string(), "FY2025-26");
        assert_eq!(year.short(), "2025-26");
    }

    #[test]
    fn test_next_is_contiguous() {
        let year: FiscalYear = "FY2025-26".parse().unwrap();
        assert_eq!(year.next().to_string(), "FY2026-27");
        assert_eq!(year.offset(10).to_string(), "FY2035-36");
    }

    #[test]
    fn test_century_wrap() {
        let year = FiscalYear::new(2099);
        assert_eq!(year.to_string(), "FY2099-00");
        assert_eq!("FY2099-00".parse::<FiscalYear>().unwrap(), year);
    }

    #[test]
    fn test_rejects_malformed_labels() {
        for label in ["2025-26", "FY2025", "FY25-26", "FY2025-27", "FY2025-2a", "FYabcd-26"] {
            assert!(
                matches!(label.parse::<FiscalYear>(), Err(DashboardError::InvalidFiscalYear { .. })),
                "{} should be rejected",
                label
            );
        }
    }

    #[test]
    fn test_ordering_follows_start_year() {
        let a: FiscalYear = "FY2023-24".parse().unwrap();
        let b: FiscalYear = "FY2024-25".parse().unwrap();
        assert!(a < b);
    }
}
