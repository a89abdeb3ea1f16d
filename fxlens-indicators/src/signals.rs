//! Threshold classification of the latest oscillator readings.

use std::fmt;

use serde::Serialize;

use crate::engine::IndicatorRow;

/// RSI above this reads as overbought.
pub const RSI_OVERBOUGHT: f64 = 70.0;
/// RSI below this reads as oversold.
pub const RSI_OVERSOLD: f64 = 30.0;
/// Stochastic %K above this reads as overbought.
pub const STOCH_OVERBOUGHT: f64 = 80.0;
/// Stochastic %K below this reads as oversold.
pub const STOCH_OVERSOLD: f64 = 20.0;
/// ADX above this reads as a strong trend.
pub const ADX_STRONG: f64 = 25.0;
/// ADX above this (and not strong) reads as a weak trend.
pub const ADX_WEAK: f64 = 20.0;

/// Indicator a [`Signal`] was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    /// Relative strength index.
    Rsi,
    /// Stochastic %K.
    StochasticK,
    /// Average directional index.
    Adx,
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rsi => "RSI",
            Self::StochasticK => "Stochastic %K",
            Self::Adx => "ADX",
        })
    }
}

/// Qualitative reading of an indicator value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalLabel {
    /// Oscillator above its upper threshold.
    Overbought,
    /// Oscillator below its lower threshold.
    Oversold,
    /// Oscillator between its thresholds.
    Neutral,
    /// ADX above the strong threshold.
    StrongTrend,
    /// ADX above the weak threshold.
    WeakTrend,
    /// ADX at or below the weak threshold.
    Ranging,
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Overbought => "overbought",
            Self::Oversold => "oversold",
            Self::Neutral => "neutral",
            Self::StrongTrend => "strong trend",
            Self::WeakTrend => "weak trend",
            Self::Ranging => "ranging",
        })
    }
}

/// One classified indicator reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Signal {
    /// Source indicator.
    pub indicator: SignalSource,
    /// Value that was classified.
    pub value: f64,
    /// Resulting label.
    pub label: SignalLabel,
}

/// Classifies RSI, Stochastic %K and ADX on `latest`, in that order.
///
/// Indicators without a value on the row are left out rather than reported
/// as neutral.
pub fn classify(latest: &IndicatorRow) -> Vec<Signal> {
    let readings = [
        (SignalSource::Rsi, latest.rsi),
        (SignalSource::StochasticK, latest.stoch_k),
        (SignalSource::Adx, latest.adx),
    ];
    readings
        .into_iter()
        .filter_map(|(indicator, value)| {
            let value = value?;
            Some(Signal {
                indicator,
                value,
                label: label_for(indicator, value),
            })
        })
        .collect()
}

fn label_for(indicator: SignalSource, value: f64) -> SignalLabel {
    match indicator {
        SignalSource::Rsi => oscillator(value, RSI_OVERBOUGHT, RSI_OVERSOLD),
        SignalSource::StochasticK => oscillator(value, STOCH_OVERBOUGHT, STOCH_OVERSOLD),
        SignalSource::Adx if value > ADX_STRONG => SignalLabel::StrongTrend,
        SignalSource::Adx if value > ADX_WEAK => SignalLabel::WeakTrend,
        SignalSource::Adx => SignalLabel::Ranging,
    }
}

fn oscillator(value: f64, upper: f64, lower: f64) -> SignalLabel {
    if value > upper {
        SignalLabel::Overbought
    } else if value < lower {
        SignalLabel::Oversold
    } else {
        SignalLabel::Neutral
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn row(rsi: Option<f64>, stoch_k: Option<f64>, adx: Option<f64>) -> IndicatorRow {
        IndicatorRow {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            rate: 1.0,
            ma_5: None,
            ma_20: None,
            ma_50: None,
            ma_200: None,
            bb_middle: None,
            bb_upper: None,
            bb_lower: None,
            rsi,
            macd: None,
            macd_signal: None,
            macd_histogram: None,
            stoch_k,
            stoch_d: None,
            atr: None,
            di_plus: None,
            di_minus: None,
            dx: None,
            adx,
            volatility: None,
            daily_return: None,
        }
    }

    fn labels(row: &IndicatorRow) -> Vec<SignalLabel> {
        classify(row).into_iter().map(|signal| signal.label).collect()
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(
            labels(&row(Some(70.0), Some(80.0), Some(25.0))),
            vec![SignalLabel::Neutral, SignalLabel::Neutral, SignalLabel::WeakTrend]
        );
        assert_eq!(
            labels(&row(Some(30.0), Some(20.0), Some(20.0))),
            vec![SignalLabel::Neutral, SignalLabel::Neutral, SignalLabel::Ranging]
        );
    }

    #[test]
    fn extremes() {
        assert_eq!(
            labels(&row(Some(85.0), Some(5.0), Some(40.0))),
            vec![SignalLabel::Overbought, SignalLabel::Oversold, SignalLabel::StrongTrend]
        );
        assert_eq!(labels(&row(Some(12.0), None, None)), vec![SignalLabel::Oversold]);
    }

    #[test]
    fn missing_values_are_omitted() {
        let signals = classify(&row(None, Some(50.0), None));
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].indicator, SignalSource::StochasticK);
        assert_eq!(signals[0].value, 50.0);
        assert!(classify(&row(None, None, None)).is_empty());
    }

    #[test]
    fn serializes_with_snake_case_tags() {
        let signal = classify(&row(None, None, Some(31.0)))[0];
        let json = serde_json::to_value(signal).unwrap();
        assert_eq!(json["indicator"], "adx");
        assert_eq!(json["label"], "strong_trend");
        assert_eq!(json["value"], 31.0);
    }

    #[test]
    fn labels_render_as_words() {
        assert_eq!(SignalLabel::StrongTrend.to_string(), "strong trend");
        assert_eq!(SignalSource::StochasticK.to_string(), "Stochastic %K");
    }
}
