use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Angle the commentary should take.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisKind {
    #[default]
    MarketTrend,
    TechnicalAnalysis,
    RiskAssessment,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::MarketTrend,
        AnalysisKind::TechnicalAnalysis,
        AnalysisKind::RiskAssessment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarketTrend => "market-trend",
            Self::TechnicalAnalysis => "technical-analysis",
            Self::RiskAssessment => "risk-assessment",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown analysis kind '{0}' (expected market-trend, technical-analysis or risk-assessment)")]
pub struct UnknownAnalysisKind(pub String);

impl FromStr for AnalysisKind {
    type Err = UnknownAnalysisKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownAnalysisKind(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_and_snake_case() {
        assert_eq!("market-trend".parse(), Ok(AnalysisKind::MarketTrend));
        assert_eq!("Technical_Analysis".parse(), Ok(AnalysisKind::TechnicalAnalysis));
        assert_eq!(" risk-assessment ".parse(), Ok(AnalysisKind::RiskAssessment));
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = "sentiment".parse::<AnalysisKind>().unwrap_err();
        assert!(err.to_string().contains("sentiment"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for kind in AnalysisKind::ALL {
            assert_eq!(kind.to_string().parse(), Ok(kind));
        }
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&AnalysisKind::RiskAssessment).unwrap();
        assert_eq!(json, "\"risk-assessment\"");
        let kind: AnalysisKind = serde_json::from_str("\"technical-analysis\"").unwrap();
        assert_eq!(kind, AnalysisKind::TechnicalAnalysis);
    }
}
