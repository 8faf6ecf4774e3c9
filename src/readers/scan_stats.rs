use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

use crate::readers::LineRejection;

/// Per-line outcome counters for one range, or summed over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub lines_scanned: u64,
    pub lines_accepted: u64,
    pub blank_lines: u64,
    pub missing_separator: u64,
    pub empty_name: u64,
    pub name_policy: u64,
    pub malformed_value: u64,
}

impl ScanStats {
    pub fn record_rejection(&mut self, rejection: &LineRejection) {
        match rejection {
            LineRejection::MissingSeparator => self.missing_separator += 1,
            LineRejection::EmptyName => self.empty_name += 1,
            LineRejection::NamePolicy => self.name_policy += 1,
            LineRejection::MalformedValue(_) => self.malformed_value += 1,
        }
    }

    pub fn lines_rejected(&self) -> u64 {
        self.missing_separator + self.empty_name + self.name_policy + self.malformed_value
    }

    /// Rejections that point at damaged input rather than filtered names.
    pub fn has_format_errors(&self) -> bool {
        self.missing_separator > 0 || self.malformed_value > 0
    }
}

impl AddAssign for ScanStats {
    fn add_assign(&mut self, rhs: ScanStats) {
        self.lines_scanned += rhs.lines_scanned;
        self.lines_accepted += rhs.lines_accepted;
        self.blank_lines += rhs.blank_lines;
        self.missing_separator += rhs.missing_separator;
        self.empty_name += rhs.empty_name;
        self.name_policy += rhs.name_policy;
        self.malformed_value += rhs.malformed_value;
    }
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines scanned, {} accepted, {} blank, {} rejected \
             (missing separator: {}, empty name: {}, name policy: {}, malformed value: {})",
            self.lines_scanned,
            self.lines_accepted,
            self.blank_lines,
            self.lines_rejected(),
            self.missing_separator,
            self.empty_name,
            self.name_policy,
            self.malformed_value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParseMeasurementError;

    #[test]
    fn test_rejections_are_counted_by_kind() {
        let mut stats = ScanStats::default();
        stats.record_rejection(&LineRejection::MissingSeparator);
        stats.record_rejection(&LineRejection::NamePolicy);
        stats.record_rejection(&LineRejection::MalformedValue(ParseMeasurementError::Empty));

        assert_eq!(stats.lines_rejected(), 3);
        assert!(stats.has_format_errors());

        let mut only_filtered = ScanStats::default();
        only_filtered.record_rejection(&LineRejection::NamePolicy);
        assert!(!only_filtered.has_format_errors());
    }

    #[test]
    fn test_sum() {
        let mut total = ScanStats {
            lines_scanned: 3,
            lines_accepted: 2,
            missing_separator: 1,
            ..Default::default()
        };
        total += ScanStats {
            lines_scanned: 5,
            lines_accepted: 4,
            blank_lines: 1,
            ..Default::default()
        };
        assert_eq!(total.lines_scanned, 8);
        assert_eq!(total.lines_accepted, 6);
        assert_eq!(total.blank_lines, 1);
        assert_eq!(total.missing_separator, 1);
    }
}
