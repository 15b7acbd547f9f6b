// 🧾 Reports & Export
// Non-interactive renderings of the dashboard: text, JSON and CSV

use crate::aggregation::QuarterSales;
use crate::dataset::MonthSales;
use crate::engine::TimelinePoint;
use crate::error::Result;
use crate::view::{format_lakhs, format_lakhs_compact, DashboardState, DashboardSummary};
use serde::Serialize;
use std::io::Write;

/// Snapshot of everything the dashboard shows for the selected year.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub summary: DashboardSummary,
    pub quarterly: Vec<QuarterSales>,
    pub monthly: Vec<MonthSales>,
    pub timeline: Vec<TimelinePoint>,
}

impl DashboardReport {
    pub fn build(state: &DashboardState) -> Result<Self> {
        let view = state.current_view()?;

        Ok(DashboardReport {
            summary: state.summary()?,
            quarterly: view.quarterly.to_vec(),
            monthly: view.monthly,
            timeline: state.timeline_series()?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_text(&self) -> String {
        let summary = &self.summary;
        let mut lines = vec![
            format!("📊 Sales Dashboard - {} ({})", summary.fiscal_year, summary.status()),
            "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".to_string(),
            format!("Total Annual Sales:      {}", format_lakhs(summary.annual_total)),
            format!("Average Quarterly Sales: {}", format_lakhs(summary.average_quarterly)),
            format!(
                "Growth Rate (YoY):       {}% ({})",
                summary.growth,
                summary.trend.label()
            ),
        ];

        if summary.is_forecast {
            lines.push(String::new());
            lines.push(format!(
                "🔮 Predicted data for {} based on historical growth",
                summary.fiscal_year
            ));
        }

        lines.push(String::new());
        lines.push("Quarterly Sales".to_string());
        for (quarter, share) in self.quarterly.iter().zip(quarter_shares(&self.quarterly)) {
            lines.push(format!(
                "  {}  {:>10}  ({:.1}%)",
                quarter.quarter,
                format_lakhs_compact(quarter.sales),
                share * 100.0
            ));
        }

        lines.push(String::new());
        lines.push("Monthly Sales".to_string());
        for month in &self.monthly {
            lines.push(format!("  {}  {:>10}", month.month, format_lakhs_compact(month.sales)));
        }

        lines.push(String::new());
        lines.push(format!("Year-on-Year ({} Years View)", self.timeline.len()));
        for point in &self.timeline {
            let marker = if point.is_forecast { "  🔮 Predicted" } else { "" };
            lines.push(format!(
                "  {}  {:>10}{}",
                point.year,
                format_lakhs_compact(point.yearly_total),
                marker
            ));
        }

        lines.join("\n")
    }
}

/// Each quarter's fraction of the quarterly sum (0.0 when the sum is 0)
pub fn quarter_shares(quarterly: &[QuarterSales]) -> Vec<f64> {
    let total: f64 = quarterly.iter().map(|q| q.sales).sum();
    quarterly
        .iter()
        .map(|q| if total > 0.0 { q.sales / total } else { 0.0 })
        .collect()
}

/// Write the timeline as CSV: `year,sales,is_forecast`
pub fn write_timeline_csv<W: Write>(series: &[TimelinePoint], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in series {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
