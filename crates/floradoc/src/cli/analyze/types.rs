//! CLI enum types for the analyze command.

use clap::ValueEnum;

/// Supported output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable diagnosis report
    Text,
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl OutputFormat {
    /// Map the `output.format` config value; unknown values are rejected by
    /// config validation, so `None` only happens for hand-built configs.
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            other => floradoc_core::OutputFormat::parse(other).map(Self::from),
        }
    }

    /// The core record format, `None` for the text report.
    pub fn record_format(self) -> Option<floradoc_core::OutputFormat> {
        match self {
            OutputFormat::Text => None,
            OutputFormat::Json => Some(floradoc_core::OutputFormat::Json),
            OutputFormat::Jsonl => Some(floradoc_core::OutputFormat::JsonLines),
        }
    }
}

impl From<floradoc_core::OutputFormat> for OutputFormat {
    fn from(format: floradoc_core::OutputFormat) -> Self {
        match format {
            floradoc_core::OutputFormat::Json => OutputFormat::Json,
            floradoc_core::OutputFormat::JsonLines => OutputFormat::Jsonl,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}
