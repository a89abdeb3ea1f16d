use std::fmt::Write as _;

use fxlens_core::CurrencyPair;
use fxlens_indicators::{IndicatorRow, Signal, Summary};
use serde::Serialize;

use crate::kind::AnalysisKind;

/// Completion model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama4-maverick";

const MISSING: &str = "N/A";

/// A prompt ready to be sent to a completion model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeRequest {
    pub kind: AnalysisKind,
    pub pair: CurrencyPair,
    pub model: String,
    pub prompt: String,
}

impl NarrativeRequest {
    /// Formats the figures relevant to `kind` into a prompt.
    pub fn build(
        kind: AnalysisKind,
        pair: &CurrencyPair,
        model: impl Into<String>,
        summary: &Summary,
        latest: &IndicatorRow,
        signals: &[Signal],
    ) -> Self {
        let prompt = match kind {
            AnalysisKind::MarketTrend => market_trend(pair, summary),
            AnalysisKind::TechnicalAnalysis => technical(pair, summary, latest, signals),
            AnalysisKind::RiskAssessment => risk(pair, summary),
        };
        Self {
            kind,
            pair: pair.clone(),
            model: model.into(),
            prompt,
        }
    }

    /// Warehouse statement submitting this prompt to the completion function.
    pub fn to_sql(&self) -> String {
        format!(
            "SELECT SNOWFLAKE.CORTEX.COMPLETE({}, {}) AS analysis",
            quote_sql_literal(&self.model),
            quote_sql_literal(&self.prompt)
        )
    }
}

/// Wraps `value` in single quotes, doubling embedded quotes.
pub fn quote_sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn market_trend(pair: &CurrencyPair, summary: &Summary) -> String {
    let mut prompt = format!("Please provide a market analysis of the {pair} exchange rate.\n\n");
    let _ = writeln!(prompt, "Current rate: {:.4}", summary.latest);
    let _ = writeln!(
        prompt,
        "Change from previous observation: {:+.4} ({:+.2}%)",
        summary.change, summary.change_pct
    );
    let _ = writeln!(prompt, "Period high: {:.4}", summary.max);
    let _ = writeln!(prompt, "Period low: {:.4}", summary.min);
    let _ = writeln!(prompt, "Average rate: {:.4}", summary.mean);
    let _ = writeln!(prompt, "Volatility (std dev): {:.2}", summary.std_dev);
    let _ = writeln!(prompt, "Recent trend: {}", summary.recent_trend);
    prompt.push_str(
        "\nAs a professional economist, address the following:\n\
         1. Assessment of current market conditions\n\
         2. Drivers behind the trend\n\
         3. Outlook\n\
         4. Risk factors\n",
    );
    prompt
}

fn technical(
    pair: &CurrencyPair,
    summary: &Summary,
    latest: &IndicatorRow,
    signals: &[Signal],
) -> String {
    let mut prompt = format!("Please provide a technical analysis of the {pair} exchange rate.\n\n");
    let _ = writeln!(prompt, "Current rate: {:.4}", summary.latest);
    let _ = writeln!(prompt, "RSI: {}", fixed(latest.rsi, 1));
    let _ = writeln!(prompt, "MACD: {}", fixed(latest.macd, 4));
    let _ = writeln!(prompt, "MACD signal: {}", fixed(latest.macd_signal, 4));
    let _ = writeln!(prompt, "Stochastic %K: {}", fixed(latest.stoch_k, 1));
    let _ = writeln!(prompt, "ADX: {}", fixed(latest.adx, 1));
    let _ = writeln!(prompt, "Volatility (std dev): {:.4}", summary.std_dev);
    if signals.is_empty() {
        let _ = writeln!(prompt, "Signals: {MISSING}");
    } else {
        let readings = signals
            .iter()
            .map(|signal| format!("{} {:.1} ({})", signal.indicator, signal.value, signal.label))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(prompt, "Signals: {readings}");
    }
    prompt.push_str(
        "\nAs a technical analyst, address the following:\n\
         1. Chart pattern assessment\n\
         2. Current buy and sell signals\n\
         3. Support and resistance levels\n\
         4. Short-term direction\n",
    );
    prompt
}

fn risk(pair: &CurrencyPair, summary: &Summary) -> String {
    let mut prompt = format!("Please provide a risk assessment of the {pair} exchange rate.\n\n");
    let _ = writeln!(prompt, "Current volatility (std dev): {:.4}", summary.std_dev);
    let _ = writeln!(prompt, "Range over the period: {:.4}", summary.range);
    let daily = summary
        .daily_return_std
        .map_or_else(|| MISSING.to_string(), |std| format!("{:.2}%", std * 100.0));
    let _ = writeln!(prompt, "Standard deviation of daily returns: {daily}");
    prompt.push_str(
        "\nAs a risk management specialist, evaluate the following:\n\
         1. Current volatility level\n\
         2. Key risk factors\n\
         3. Suggested hedging strategies\n\
         4. Economic indicators to watch\n",
    );
    prompt
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.decimals$}"))
}
