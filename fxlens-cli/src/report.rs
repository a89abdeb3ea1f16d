//! Plain-text and JSON renderings of analysis results.

use std::fmt::Write as _;

use fxlens_core::CurrencyPair;
use fxlens_indicators::{Comparison, IndicatorRow, Signal, Summary};
use serde::Serialize;

const EMPTY_CELL: &str = "-";

/// Everything `analyze` prints, in serializable form.
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub pair: &'a CurrencyPair,
    pub summary: &'a Summary,
    pub signals: &'a [Signal],
    pub rows: &'a [IndicatorRow],
}

impl AnalysisReport<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_table(&self) -> String {
        let mut out = render_summary(self.pair, self.summary);
        out.push('\n');
        out.push_str(&render_signals(self.signals));
        out.push('\n');
        out.push_str(&render_rows(self.rows));
        out
    }
}

pub fn render_summary(pair: &CurrencyPair, summary: &Summary) -> String {
    let mut out = format!("{pair} summary ({} observations)\n", summary.observations);
    let mut line = |label: &str, value: String| {
        let _ = writeln!(out, "  {label:<22}{value}");
    };
    line("latest", format!("{:.4}", summary.latest));
    line(
        "change",
        format!("{:+.4} ({:+.2}%)", summary.change, summary.change_pct),
    );
    line("high / low", format!("{:.4} / {:.4}", summary.max, summary.min));
    line("range", format!("{:.4}", summary.range));
    line("mean / median", format!("{:.4} / {:.4}", summary.mean, summary.median));
    line("std dev", format!("{:.4}", summary.std_dev));
    line("coeff. of variation", cell(summary.coefficient_of_variation, 4));
    line("skewness", cell(summary.skewness, 3));
    line("excess kurtosis", cell(summary.kurtosis, 3));
    line(
        "daily return std",
        summary
            .daily_return_std
            .map_or_else(|| EMPTY_CELL.to_string(), |std| format!("{:.2}%", std * 100.0)),
    );
    line("volatility (20)", cell(summary.latest_volatility, 4));
    line("recent trend", summary.recent_trend.to_string());
    out
}

pub fn render_signals(signals: &[Signal]) -> String {
    if signals.is_empty() {
        return "signals: not enough history\n".to_string();
    }
    let mut out = String::from("signals\n");
    for signal in signals {
        let _ = writeln!(
            out,
            "  {:<16}{:>8.2}  {}",
            signal.indicator.to_string(),
            signal.value,
            signal.label
        );
    }
    out
}

pub fn render_rows(rows: &[IndicatorRow]) -> String {
    let mut out = format!(
        "{:<12}{:>12}{:>12}{:>12}{:>12}{:>8}{:>12}{:>8}{:>8}\n",
        "date", "rate", "ma_5", "ma_20", "bb_width", "rsi", "macd", "stoch_k", "adx"
    );
    for row in rows {
        let width = match (row.bb_upper, row.bb_lower) {
            (Some(upper), Some(lower)) => Some(upper - lower),
            _ => None,
        };
        let _ = writeln!(
            out,
            "{:<12}{:>12.4}{:>12}{:>12}{:>12}{:>8}{:>12}{:>8}{:>8}",
            row.date.to_string(),
            row.rate,
            cell(row.ma_5, 4),
            cell(row.ma_20, 4),
            cell(width, 4),
            cell(row.rsi, 1),
            cell(row.macd, 4),
            cell(row.stoch_k, 1),
            cell(row.adx, 1),
        );
    }
    out
}

pub fn render_comparison(comparison: &Comparison) -> String {
    let mut out = format!(
        "{:<10}{:>6}{:>12}{:>12}{:>10}{:>12}{:>12}{:>10}{:>10}\n",
        "pair", "obs", "current", "change", "change%", "high", "low", "vol%", "skew"
    );
    for metrics in &comparison.metrics {
        let _ = writeln!(
            out,
            "{:<10}{:>6}{:>12.4}{:>+12.4}{:>+10.2}{:>12.4}{:>12.4}{:>10}{:>10}",
            metrics.pair.to_string(),
            metrics.observations,
            metrics.current,
            metrics.change,
            metrics.change_pct,
            metrics.max,
            metrics.min,
            cell(metrics.volatility_pct, 3),
            cell(metrics.skewness, 3),
        );
    }

    let pairs = &comparison.correlation.pairs;
    if pairs.len() > 1 {
        out.push_str("\ncorrelation\n");
        let _ = write!(out, "{:<10}", "");
        for pair in pairs {
            let _ = write!(out, "{:>10}", pair.to_string());
        }
        out.push('\n');
        for (pair, values) in pairs.iter().zip(&comparison.correlation.values) {
            let _ = write!(out, "{:<10}", pair.to_string());
            for value in values {
                let _ = write!(out, "{:>10}", cell(*value, 3));
            }
            out.push('\n');
        }
    }
    out
}

fn cell(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| EMPTY_CELL.to_string(), |v| format!("{v:.decimals$}"))
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use fxlens_core::{PricePoint, PriceSeries};
    use fxlens_indicators::{classify, compare, compute, summarize, IndicatorSeries};

    use super::*;

    fn series(rates: &[f64]) -> IndicatorSeries {
        let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let points = rates
            .iter()
            .enumerate()
            .map(|(i, rate)| PricePoint::new(start + Days::new(i as u64), *rate))
            .collect();
        compute(&PriceSeries::new(points).unwrap())
    }

    fn pair(code: &str) -> CurrencyPair {
        code.parse().unwrap()
    }

    #[test]
    fn table_report_has_all_sections() {
        let out = series(&[150.0, 151.0, 149.0, 152.0]);
        let summary = summarize(&out).unwrap();
        let signals = classify(out.latest().unwrap());
        let usd_jpy = pair("USD/JPY");
        let report = AnalysisReport {
            pair: &usd_jpy,
            summary: &summary,
            signals: &signals,
            rows: out.tail(2),
        };
        let table = report.to_table();
        assert!(table.starts_with("USD/JPY summary (4 observations)"));
        assert!(table.contains("signals: not enough history"));
        assert!(table.contains("2024-06-06"));
        assert!(table.contains("2024-06-05"));
        assert!(!table.contains("2024-06-04"));
        assert_eq!(table.lines().filter(|line| line.starts_with("2024-")).count(), 2);
    }

    #[test]
    fn json_report_uses_field_names() {
        let out = series(&[1.0, 1.1]);
        let summary = summarize(&out).unwrap();
        let eur_usd = pair("EUR/USD");
        let report = AnalysisReport {
            pair: &eur_usd,
            summary: &summary,
            signals: &[],
            rows: out.rows(),
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["pair"], "EUR/USD");
        assert_eq!(json["summary"]["recent_trend"], "up");
        assert_eq!(json["rows"][0]["date"], "2024-06-03");
        assert!(json["rows"][0]["daily_return"].is_null());
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let table = render_rows(series(&[1.0]).rows());
        let row = table.lines().nth(1).unwrap();
        assert!(row.contains(EMPTY_CELL));
        assert!(row.contains("1.0000"));
    }

    #[test]
    fn comparison_lists_metrics_and_matrix() {
        let inputs = vec![
            (pair("USD/JPY"), series(&[150.0, 151.0, 152.0])),
            (pair("EUR/JPY"), series(&[160.0, 162.0, 164.0])),
        ];
        let text = render_comparison(&compare(&inputs));
        assert!(text.contains("USD/JPY"));
        assert!(text.contains("EUR/JPY"));
        assert!(text.contains("correlation"));
        assert!(text.contains("1.000"));
    }
}
