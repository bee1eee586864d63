//! Severity banding for incident markers.

use strum_macros::{AsRefStr, Display};

/// Display band of a 1-10 incident severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SeverityBand {
    /// Severity below 4.
    Low,
    /// Severity 4 to 6.
    Medium,
    /// Severity 7 and above.
    High,
}

impl SeverityBand {
    /// Bands a severity value.
    #[must_use]
    pub const fn from_severity(severity: u8) -> Self {
        if severity >= 7 {
            Self::High
        } else if severity >= 4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Style class of the severity badge.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Low => "severity-low",
            Self::Medium => "severity-medium",
            Self::High => "severity-high",
        }
    }
}
