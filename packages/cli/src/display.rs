//! Plain-text rendering of the view for the terminal.

use std::fmt;

use route_safety_render::ViewState;
use route_safety_render::charts::ChartSpec;
use route_safety_render::map::{EndpointMarker, IncidentLayer, STREET_ZOOM};

/// Route, results panel and incidents of the last analysis.
pub struct AnalysisReport<'a>(pub &'a ViewState);

impl fmt::Display for AnalysisReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;

        for endpoint in [&view.map.origin, &view.map.destination].into_iter().flatten() {
            write_endpoint(f, endpoint)?;
        }
        if let Some(line) = &view.map.route_line {
            if line.fallback {
                writeln!(
                    f,
                    "Route: straight line (routing service unavailable)"
                )?;
            } else {
                writeln!(f, "Route: {} points", line.path.len())?;
            }
        }

        let Some(results) = &view.results else {
            return Ok(());
        };

        writeln!(f)?;
        writeln!(
            f,
            "Safety score: {:.0} ({})",
            results.safety_score, results.level_label
        )?;
        writeln!(f, "Crimes near route: {}", results.crime_count)?;

        if let Some(stats) = &results.statistics {
            writeln!(f)?;
            writeln!(f, "Most common crime types:")?;
            for line in stats.crime_type_lines() {
                writeln!(f, "  {line}")?;
            }
            writeln!(f, "Violent crimes: {}", stats.violent_count)?;
            writeln!(f, "Property crimes: {}", stats.property_count)?;
            writeln!(f, "Average severity: {}", stats.avg_severity)?;
            writeln!(f, "Total victims: {}", stats.total_victims)?;
            writeln!(f, "Property damage: {}", stats.property_damage)?;
        }

        write_incidents(f, &view.map.incidents)
    }
}

fn write_endpoint(f: &mut fmt::Formatter<'_>, endpoint: &EndpointMarker) -> fmt::Result {
    match &endpoint.display_name {
        Some(name) => writeln!(f, "{} [{name}] ({})", endpoint.title, endpoint.coordinate),
        None => writeln!(f, "{} ({})", endpoint.title, endpoint.coordinate),
    }
}

fn write_incidents(f: &mut fmt::Formatter<'_>, layer: &IncidentLayer) -> fmt::Result {
    if layer.markers.is_empty() {
        return Ok(());
    }

    writeln!(f)?;
    writeln!(f, "Incidents:")?;
    for cluster in layer.clusters(layer.cluster_cell_degrees(STREET_ZOOM)) {
        if cluster.members.len() > 1 {
            writeln!(
                f,
                "  [{} incidents near {}, {}]",
                cluster.members.len(),
                cluster.center,
                cluster.size.css_class(),
            )?;
        }
        for &i in &cluster.members {
            let marker = &layer.markers[i];
            writeln!(
                f,
                "  {} ({}) severity {}",
                marker.title, marker.category, marker.band
            )?;
            for (label, value) in &marker.popup.rows {
                writeln!(f, "      {label}: {value}")?;
            }
        }
    }
    Ok(())
}

/// City-wide totals and the four dashboard charts.
pub struct DashboardReport<'a>(pub &'a ViewState);

impl fmt::Display for DashboardReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(dashboard) = &self.0.dashboard else {
            return writeln!(f, "No data summary loaded.");
        };

        writeln!(f, "Total crimes: {}", dashboard.summary.total_crimes)?;
        writeln!(f, "Violent crimes: {}", dashboard.summary.violent_crimes)?;
        writeln!(f, "Property crimes: {}", dashboard.summary.property_crimes)?;

        let charts = &dashboard.charts;
        for chart in [
            &charts.time_series,
            &charts.crime_types,
            &charts.time_of_day,
            &charts.boroughs,
        ] {
            writeln!(f)?;
            write_chart(f, chart)?;
        }
        Ok(())
    }
}

fn write_chart(f: &mut fmt::Formatter<'_>, chart: &ChartSpec) -> fmt::Result {
    writeln!(f, "{} ({})", chart.title, chart.kind)?;
    if chart.is_empty() {
        return writeln!(f, "  (no data)");
    }
    let width = chart.labels.iter().map(String::len).max().unwrap_or(0);
    for (label, value) in chart.points() {
        writeln!(f, "  {label:<width$}  {value}")?;
    }
    Ok(())
}
