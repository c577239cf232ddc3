use crate::analysis::TickerReport;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::Metric;

const HISTOGRAM_WIDTH: usize = 40;

/// Renders one ticker as a set of text tables, every scalar with two decimals.
pub fn render_tables(report: &TickerReport) -> String {
    let period = match (report.first_date, report.last_date) {
        (Some(first), Some(last)) => format!("{} to {}", first, last),
        _ => "no bars".to_string(),
    };

    let indicators = metric_table("Key Indicators", report.indicators.entries().into_iter());
    let performance = metric_table(
        "Performance Overview",
        report
            .performance
            .entries()
            .into_iter()
            .map(|(label, metric)| (label.to_string(), metric)),
    );

    format!(
        "{} ({} bars, {})\n\n{}\n\n{}\n\n{}\n",
        report.symbol,
        report.bars,
        period,
        indicators,
        performance,
        histogram_table(report)
    )
}

fn metric_table(title: &str, rows: impl Iterator<Item = (String, Metric)>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![title, "Value", "Note"]);

    for (label, metric) in rows {
        let note = metric.reason().map(|r| r.to_string()).unwrap_or_default();
        table.add_row(vec![
            Cell::new(label),
            Cell::new(metric.to_string()).set_alignment(CellAlignment::Right),
            Cell::new(note),
        ]);
    }
    table
}

fn histogram_table(report: &TickerReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Daily Return (%)", "Count", ""]);

    let tallest = report.histogram.iter().map(|b| b.count).max().unwrap_or(0);
    for bin in &report.histogram {
        let bar_len = if tallest == 0 {
            0
        } else {
            bin.count * HISTOGRAM_WIDTH / tallest
        };
        table.add_row(vec![
            Cell::new(format!("{:.2} .. {:.2}", bin.lower * 100.0, bin.upper * 100.0)),
            Cell::new(bin.count).set_alignment(CellAlignment::Right),
            Cell::new("#".repeat(bar_len)),
        ]);
    }

    let summary = &report.distribution;
    table.add_row(vec![
        Cell::new(format!(
            "mean {} / std {}",
            summary.mean.map(|v| v * 100.0),
            summary.std_dev.map(|v| v * 100.0)
        )),
        Cell::new(summary.count).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table
}

/// Renders all reports as a pretty-printed JSON array.
pub fn render_json(reports: &[TickerReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use analytics::PerformanceEngine;
    use chrono::NaiveDate;
    use configuration::{IndicatorParams, PerformanceParams};
    use core_types::PriceSeries;
    use indicators::IndicatorEngine;

    fn report(closes: &[f64]) -> TickerReport {
        let analyzer = Analyzer::new(
            IndicatorEngine::new(IndicatorParams::default()).unwrap(),
            PerformanceEngine::new(PerformanceParams::default()).unwrap(),
            5,
            false,
        );
        let series =
            PriceSeries::from_closes(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), closes).unwrap();
        analyzer.analyze("FLAT.NS", &series)
    }

    #[test]
    fn test_tables_show_two_decimals_and_na() {
        let text = render_tables(&report(&[100.0; 60]));

        assert!(text.starts_with("FLAT.NS (60 bars, 2024-01-01 to 2024-02-29)"));
        assert!(text.contains("Last Close Price"));
        assert!(text.contains("100.00"));
        assert!(text.contains("Sharpe Ratio"));
        assert!(text.contains("N/A"));
        assert!(text.contains("returns have zero variance"));
        assert!(text.contains("average loss is zero"));
    }

    #[test]
    fn test_json_marks_undefined_metrics() {
        let json = render_json(&[report(&[100.0])]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let first = &value[0];
        assert_eq!(first["symbol"], "FLAT.NS");
        assert_eq!(first["indicators"]["last_close"]["value"], 100.0);
        assert_eq!(
            first["performance"]["sharpe_ratio"]["undefined"]["kind"],
            "insufficient_data"
        );
    }
}
