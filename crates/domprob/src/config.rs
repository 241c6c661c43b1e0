//! Probe configuration.
//!
//! Format-neutral settings for the default probe: the level and name of its
//! [`Logger`] instrument. Values come from code or from the `DOMPROB_LOG` and
//! `DOMPROB_LOGGER` environment variables.

use std::fmt;
use std::str::FromStr;

use crate::logger::Logger;

/// Environment variable holding the default logger's level.
pub const LEVEL_ENV: &str = "DOMPROB_LOG";
/// Environment variable holding the default logger's name.
pub const LOGGER_ENV: &str = "DOMPROB_LOGGER";

const DEFAULT_LOGGER_NAME: &str = "default";

/// Severity threshold, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
	Trace,
	#[default]
	Debug,
	Info,
	Warn,
	Error,
}

impl LogLevel {
	pub const ALL: [Self; 5] = [Self::Trace, Self::Debug, Self::Info, Self::Warn, Self::Error];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Trace => "trace",
			Self::Debug => "debug",
			Self::Info => "info",
			Self::Warn => "warn",
			Self::Error => "error",
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LogLevel {
	type Err = ConfigError;

	/// Case-insensitive; `warning` is accepted for [`LogLevel::Warn`].
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		if trimmed.eq_ignore_ascii_case("warning") {
			return Ok(Self::Warn);
		}
		Self::ALL
			.into_iter()
			.find(|level| trimmed.eq_ignore_ascii_case(level.as_str()))
			.ok_or_else(|| ConfigError::InvalidLevel(s.to_owned()))
	}
}

impl From<LogLevel> for tracing::Level {
	fn from(level: LogLevel) -> Self {
		match level {
			LogLevel::Trace => tracing::Level::TRACE,
			LogLevel::Debug => tracing::Level::DEBUG,
			LogLevel::Info => tracing::Level::INFO,
			LogLevel::Warn => tracing::Level::WARN,
			LogLevel::Error => tracing::Level::ERROR,
		}
	}
}

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	/// A level string did not name a known level.
	#[error("invalid log level: '{0}' (expected trace, debug, info, warn or error)")]
	InvalidLevel(String),
	/// A global tracing subscriber was already installed.
	#[error("failed to install tracing subscriber: {0}")]
	Subscriber(String),
}

/// Settings for the default probe. Unset fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeConfig {
	pub level: Option<LogLevel>,
	pub logger_name: Option<String>,
}

impl ProbeConfig {
	/// Reads [`LEVEL_ENV`] and [`LOGGER_ENV`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads settings through `lookup`, keyed by environment variable name.
	/// Empty values count as unset.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let non_empty = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());
		let level = non_empty(LEVEL_ENV).map(|v| v.parse::<LogLevel>()).transpose()?;
		Ok(Self {
			level,
			logger_name: non_empty(LOGGER_ENV),
		})
	}

	/// Merge another config into this one.
	///
	/// Values set in `other` override values in `self`.
	pub fn merge(&mut self, other: ProbeConfig) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.logger_name.is_some() {
			self.logger_name = other.logger_name;
		}
	}

	pub fn level(&self) -> LogLevel {
		self.level.unwrap_or_default()
	}

	pub fn logger_name(&self) -> &str {
		self.logger_name.as_deref().unwrap_or(DEFAULT_LOGGER_NAME)
	}

	/// The default logger instrument described by this config.
	pub fn logger(&self) -> Logger {
		Logger::new(self.logger_name().to_owned(), self.level())
	}
}

/// Installs a global `fmt` subscriber capped at the configured level.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &ProbeConfig) -> Result<(), ConfigError> {
	tracing_subscriber::fmt()
		.with_max_level(tracing::Level::from(config.level()))
		.with_target(true)
		.try_init()
		.map_err(|err| ConfigError::Subscriber(err.to_string()))
}
