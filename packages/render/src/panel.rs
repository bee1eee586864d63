//! Text panels: route results, route statistics and dashboard totals.

use route_safety_models::{AnalysisResult, CrimeCategory, CrimeStats, DataSummary, SafetyLevel};

use crate::format;

/// Number of crime types listed in the statistics panel.
pub const TOP_CRIME_TYPES: usize = 5;
/// Shown instead of the crime type list when there are none.
pub const NO_CRIME_TYPES_PLACEHOLDER: &str = "No specific crime types identified";

/// Safety rating of the analysed route.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPanel {
    pub safety_score: f64,
    pub level: SafetyLevel,
    /// Badge text, e.g. `Medium Safety`.
    pub level_label: String,
    pub level_class: &'static str,
    /// Colour of the score figure.
    pub score_color: &'static str,
    pub crime_count: usize,
    /// `None` when the backend sent no statistics.
    pub statistics: Option<StatisticsPanel>,
}

impl From<&AnalysisResult> for ResultsPanel {
    fn from(result: &AnalysisResult) -> Self {
        let level = result.safety_level;
        Self {
            safety_score: result.safety_score,
            level,
            level_label: level.label(),
            level_class: level.css_class(),
            score_color: level.color(),
            crime_count: result.crimes.len(),
            statistics: result.crime_stats.as_ref().map(StatisticsPanel::from),
        }
    }
}

/// Aggregate statistics for the crimes near the route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsPanel {
    /// `(crime type, count)`, most frequent first. Empty when the backend
    /// reported no types; see [`Self::crime_type_lines`].
    pub top_crime_types: Vec<(String, u64)>,
    pub violent_count: u64,
    pub property_count: u64,
    /// Average severity to one decimal, e.g. `6.4`.
    pub avg_severity: String,
    pub total_victims: u64,
    /// Total property damage, e.g. `$12,345`.
    pub property_damage: String,
}

impl StatisticsPanel {
    /// Lines of the crime type list.
    #[must_use]
    pub fn crime_type_lines(&self) -> Vec<String> {
        if self.top_crime_types.is_empty() {
            return vec![NO_CRIME_TYPES_PLACEHOLDER.to_string()];
        }
        self.top_crime_types
            .iter()
            .map(|(name, count)| format!("{name}: {count}"))
            .collect()
    }
}

impl From<&CrimeStats> for StatisticsPanel {
    fn from(stats: &CrimeStats) -> Self {
        Self {
            top_crime_types: stats.top_crime_types(TOP_CRIME_TYPES),
            violent_count: stats.category_count(CrimeCategory::Violent),
            property_count: stats.category_count(CrimeCategory::Property),
            avg_severity: format!("{:.1}", stats.avg_severity),
            total_victims: stats.total_victims,
            property_damage: format::dollars(stats.total_property_damage),
        }
    }
}

/// City-wide totals above the dashboard charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPanel {
    pub total_crimes: String,
    pub violent_crimes: String,
    pub property_crimes: String,
}

impl From<&DataSummary> for SummaryPanel {
    fn from(summary: &DataSummary) -> Self {
        Self {
            total_crimes: format::thousands(summary.total_crimes),
            violent_crimes: format::thousands(summary.violent_crimes),
            property_crimes: format::thousands(summary.property_crimes),
        }
    }
}
