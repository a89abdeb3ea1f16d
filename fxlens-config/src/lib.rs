//! Layered configuration for the fxlens binary.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, ensure, Context, Result};
use config::{Config, Environment, File};
use fxlens_core::CurrencyPair;
use fxlens_narrative::{AnalysisKind, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};

/// Prefix of environment variable overrides (`FXLENS__LOG__LEVEL`).
pub const ENV_PREFIX: &str = "FXLENS";
/// Separator between nested keys in environment variable names.
pub const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
    pub narrative: NarrativeConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Rate file used when the command line does not name one.
    pub input: Option<PathBuf>,
    /// Days of history loaded when no start date is given.
    pub lookback_days: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input: None,
            lookback_days: 365,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub default_pair: CurrencyPair,
    /// Rows of the indicator table shown by `analyze`.
    pub tail_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_pair: CurrencyPair::new("USD", "JPY")
                .expect("USD/JPY is a valid currency pair"),
            tail_rows: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub model: String,
    pub kind: AnalysisKind,
    /// Models offered for completion; `model` must be one of them.
    pub models: Vec<String>,
}

impl NarrativeConfig {
    pub fn is_known_model(&self, model: &str) -> bool {
        self.models.iter().any(|known| known == model)
    }
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            kind: AnalysisKind::default(),
            models: ["llama4-maverick", "openai-gpt-4.1", "claude-4.5-sonnet", "mistral-large2"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `fxlens_data=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        })
    }
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format '{other}' (expected pretty or json)"),
        }
    }
}

impl AppConfig {
    /// Renders the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.analysis.tail_rows > 0, "analysis.tail_rows must be positive");
        ensure!(self.data.lookback_days > 0, "data.lookback_days must be positive");
        ensure!(
            self.narrative.is_known_model(&self.narrative.model),
            "narrative.model '{}' is not listed in narrative.models",
            self.narrative.model
        );
        Ok(())
    }
}

/// Loads `default.toml`, then `<env>.toml` from `dir`, then `FXLENS__*`
/// environment variables. Missing files are skipped.
pub fn load_config(env: &str, dir: impl AsRef<Path>) -> Result<AppConfig> {
    load_with_environment(env, dir.as_ref(), environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn load_with_environment(env: &str, dir: &Path, environment: Environment) -> Result<AppConfig> {
    let mut builder = Config::builder().add_source(File::from(dir.join("default.toml")).required(false));
    if env != "default" {
        builder = builder.add_source(File::from(dir.join(format!("{env}.toml"))).required(false));
    }
    let settings = builder
        .add_source(environment)
        .build()
        .with_context(|| format!("failed to load configuration from {}", dir.display()))?;
    let config: AppConfig = settings
        .try_deserialize()
        .context("invalid configuration")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn no_env() -> Environment {
        environment().source(Some(config::Map::new()))
    }

    #[test]
    fn defaults_apply_without_files() {
        let dir = tempdir().unwrap();
        let config = load_with_environment("default", dir.path(), no_env()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.analysis.default_pair.to_string(), "USD/JPY");
        assert_eq!(config.narrative.model, "llama4-maverick");
    }

    #[test]
    fn environment_file_overrides_default_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[analysis]\ndefault_pair = \"EUR/USD\"\ntail_rows = 10\n",
        )
        .unwrap();
        fs::write(dir.path().join("research.toml"), "[analysis]\ntail_rows = 60\n").unwrap();

        let config = load_with_environment("research", dir.path(), no_env()).unwrap();
        assert_eq!(config.analysis.default_pair.to_string(), "EUR/USD");
        assert_eq!(config.analysis.tail_rows, 60);
    }

    #[test]
    fn environment_variables_win() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[log]\nlevel = \"warn\"\n").unwrap();
        let vars: config::Map<String, String> = [
            ("FXLENS__LOG__LEVEL", "debug"),
            ("FXLENS__LOG__FORMAT", "json"),
            ("FXLENS__DATA__LOOKBACK_DAYS", "90"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config =
            load_with_environment("default", dir.path(), environment().source(Some(vars))).unwrap();
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.data.lookback_days, 90);
    }

    #[test]
    fn rejects_unlisted_model() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[narrative]\nmodel = \"gpt-2\"\n").unwrap();
        let err = load_with_environment("default", dir.path(), no_env()).unwrap_err();
        assert!(err.to_string().contains("gpt-2"));
    }

    #[test]
    fn rejects_bad_pair() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[analysis]\ndefault_pair = \"USDJPY\"\n").unwrap();
        assert!(load_with_environment("default", dir.path(), no_env()).is_err());
    }

    #[test]
    fn shipped_default_file_matches_builtin_defaults() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config");
        let config = load_with_environment("default", &dir, no_env()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn toml_output_round_trips() {
        let mut config = AppConfig::default();
        config.data.input = Some(PathBuf::from("rates.csv"));
        let rendered = config.to_toml_string().unwrap();
        assert!(rendered.contains("default_pair = \"USD/JPY\""));
        assert!(rendered.contains("kind = \"market-trend\""));
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
