use crate::error::ConfigError;
use crate::format::Format;
use crate::writer_sink::OutputFormat;

/// Output format, `line` or `json`.
pub const SHAPED_LOG_FORMAT_ENV: &str = "SHAPED_LOG_FORMAT";

/// Whether console lines are colored (`1/true/yes/on` or `0/false/no/off`).
pub const SHAPED_LOG_COLOR_ENV: &str = "SHAPED_LOG_COLOR";

/// Conventional opt-out for terminal colors, honored when
/// [`SHAPED_LOG_COLOR_ENV`] is unset.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// How the bundled stdout sink formats records.
///
/// **Fields**
/// - `output`: write the rendered line or the JSON record.
/// - `color`: magenta timestamp and severity-colored level in line output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    pub output: OutputFormat,
    pub color: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            output: OutputFormat::Line,
            color: true,
        }
    }
}

impl SinkConfig {
    pub fn json() -> Self {
        Self {
            output: OutputFormat::Json,
            color: false,
        }
    }

    /// Read the configuration from the process environment, falling back
    /// to [`SinkConfig::default`] for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SinkConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SinkConfig::default();

        if let Some(format) = lookup(SHAPED_LOG_FORMAT_ENV) {
            config.output = format.parse()?;
        }

        match lookup(SHAPED_LOG_COLOR_ENV) {
            Some(value) => config.color = parse_bool(SHAPED_LOG_COLOR_ENV, &value)?,
            None => {
                if lookup(NO_COLOR_ENV).is_some_and(|v| !v.is_empty()) {
                    config.color = false;
                }
            }
        }

        Ok(config)
    }

    /// Transform pipeline matching this configuration.
    pub fn format(&self) -> Format {
        match self.output {
            OutputFormat::Line => Format::line(self.color),
            OutputFormat::Json => Format::json(),
        }
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}
