//! Market commentary prompts built from computed indicators.

mod kind;
mod request;
mod tidy;

pub use kind::{AnalysisKind, UnknownAnalysisKind};
pub use request::{quote_sql_literal, NarrativeRequest, DEFAULT_MODEL};
pub use tidy::{tidy_completion, SUBTITLE_MAX_CHARS};
