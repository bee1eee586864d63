//! Dashboard chart specifications.
//!
//! Each chart carries labels, values and colours; drawing them is left to
//! whatever charting front end consumes the view.

use std::collections::BTreeMap;

use route_safety_models::{DataSummary, TimeSeriesPoint, top_counts};
use strum_macros::{AsRefStr, Display};

/// Number of bars in the crime type chart.
pub const TOP_CHART_CRIME_TYPES: usize = 8;

/// An RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same colour with alpha `a`.
    #[must_use]
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

const TREND_COLOR: Rgba = Rgba::rgb(67, 97, 238);

const CRIME_TYPE_PALETTE: [Rgba; 8] = [
    Rgba::rgb(230, 57, 70),
    Rgba::rgb(241, 92, 38),
    Rgba::rgb(248, 150, 30),
    Rgba::rgb(249, 199, 79),
    Rgba::rgb(144, 190, 109),
    Rgba::rgb(67, 170, 139),
    Rgba::rgb(77, 144, 142),
    Rgba::rgb(87, 117, 144),
];

const BOROUGH_PALETTE: [Rgba; 5] = [
    Rgba::rgb(58, 12, 163),
    Rgba::rgb(67, 97, 238),
    Rgba::rgb(76, 201, 240),
    Rgba::rgb(247, 37, 133),
    Rgba::rgb(114, 9, 183),
];

/// Grey for time-of-day labels outside the four known periods.
const UNKNOWN_PERIOD_COLOR: Rgba = Rgba::rgb(173, 181, 189);

fn time_of_day_color(label: &str) -> Rgba {
    match label {
        "Morning" => Rgba::rgb(255, 209, 102),
        "Afternoon" => Rgba::rgb(255, 159, 64),
        "Evening" => Rgba::rgb(54, 162, 235),
        "Night" => Rgba::rgb(46, 49, 146),
        _ => UNKNOWN_PERIOD_COLOR,
    }
}

/// Chart type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
    PolarArea,
}

/// Position of the chart legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Legend {
    Hidden,
    Right,
}

/// A single-dataset chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    /// One fill colour per value, or a single colour for line charts.
    pub background: Vec<Rgba>,
    pub border: Vec<Rgba>,
    pub legend: Legend,
}

impl ChartSpec {
    /// Whether the chart has no data points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(label, value)` pairs in display order.
    pub fn points(&self) -> impl Iterator<Item = (&str, u64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// The four dashboard charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub time_series: ChartSpec,
    pub crime_types: ChartSpec,
    pub time_of_day: ChartSpec,
    pub boroughs: ChartSpec,
}

impl From<&DataSummary> for Dashboard {
    fn from(summary: &DataSummary) -> Self {
        Self {
            time_series: time_series_chart(&summary.time_series_data),
            crime_types: crime_type_chart(&summary.crime_type_counts),
            time_of_day: time_of_day_chart(&summary.time_of_day_counts),
            boroughs: borough_chart(&summary.borough_counts),
        }
    }
}

/// Line chart of monthly counts in date order.
#[must_use]
pub fn time_series_chart(points: &[TimeSeriesPoint]) -> ChartSpec {
    let mut sorted: Vec<&TimeSeriesPoint> = points.iter().collect();
    // Unparseable dates sort last, in string order.
    sorted.sort_by(|a, b| match (a.period_start(), b.period_start()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.date.cmp(&b.date),
    });

    ChartSpec {
        kind: ChartKind::Line,
        title: "Crime Trends Over Time",
        labels: sorted.iter().map(|p| p.date.clone()).collect(),
        values: sorted.iter().map(|p| p.count).collect(),
        background: vec![TREND_COLOR.with_alpha(0.2)],
        border: vec![TREND_COLOR],
        legend: Legend::Hidden,
    }
}

/// Bar chart of the most common crime types.
#[must_use]
pub fn crime_type_chart(counts: &BTreeMap<String, u64>) -> ChartSpec {
    let top = top_counts(counts, TOP_CHART_CRIME_TYPES);
    let palette = CRIME_TYPE_PALETTE.iter().cycle().take(top.len());

    ChartSpec {
        kind: ChartKind::Bar,
        title: "Most Common Crime Types",
        background: palette.clone().map(|c| c.with_alpha(0.7)).collect(),
        border: palette.copied().collect(),
        labels: top.iter().map(|(name, _)| name.clone()).collect(),
        values: top.iter().map(|(_, count)| *count).collect(),
        legend: Legend::Hidden,
    }
}

/// Doughnut of crimes per time of day.
#[must_use]
pub fn time_of_day_chart(counts: &BTreeMap<String, u64>) -> ChartSpec {
    let colors: Vec<Rgba> = counts.keys().map(|label| time_of_day_color(label)).collect();

    ChartSpec {
        kind: ChartKind::Doughnut,
        title: "Crimes by Time of Day",
        labels: counts.keys().cloned().collect(),
        values: counts.values().copied().collect(),
        background: colors.iter().map(|c| c.with_alpha(0.7)).collect(),
        border: colors,
        legend: Legend::Right,
    }
}

/// Polar area chart of crimes per borough.
#[must_use]
pub fn borough_chart(counts: &BTreeMap<String, u64>) -> ChartSpec {
    let palette = BOROUGH_PALETTE.iter().cycle().take(counts.len());

    ChartSpec {
        kind: ChartKind::PolarArea,
        title: "Crimes by Borough",
        labels: counts.keys().cloned().collect(),
        values: counts.values().copied().collect(),
        background: palette.clone().map(|c| c.with_alpha(0.7)).collect(),
        border: palette.copied().collect(),
        legend: Legend::Right,
    }
}
