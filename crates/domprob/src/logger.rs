//! Default instrument: a named logger that writes `tracing` events.

use std::borrow::Cow;
use std::fmt;

use crate::config::LogLevel;

/// Named logger with a minimum level. Messages below the level are dropped
/// before reaching `tracing`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Logger {
	name: Cow<'static, str>,
	level: LogLevel,
}

impl Logger {
	pub fn new(name: impl Into<Cow<'static, str>>, level: LogLevel) -> Self {
		Self {
			name: name.into(),
			level,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn level(&self) -> LogLevel {
		self.level
	}

	pub fn enabled(&self, level: LogLevel) -> bool {
		level >= self.level
	}

	/// Emits `args` at `level`, tagged with the logger name. Returns whether
	/// the message passed this logger's level.
	pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) -> bool {
		if !self.enabled(level) {
			return false;
		}
		let logger = self.name.as_ref();
		match level {
			LogLevel::Trace => tracing::trace!(logger, "{args}"),
			LogLevel::Debug => tracing::debug!(logger, "{args}"),
			LogLevel::Info => tracing::info!(logger, "{args}"),
			LogLevel::Warn => tracing::warn!(logger, "{args}"),
			LogLevel::Error => tracing::error!(logger, "{args}"),
		}
		true
	}

	pub fn trace(&self, args: fmt::Arguments<'_>) -> bool {
		self.log(LogLevel::Trace, args)
	}

	pub fn debug(&self, args: fmt::Arguments<'_>) -> bool {
		self.log(LogLevel::Debug, args)
	}

	pub fn info(&self, args: fmt::Arguments<'_>) -> bool {
		self.log(LogLevel::Info, args)
	}

	pub fn warn(&self, args: fmt::Arguments<'_>) -> bool {
		self.log(LogLevel::Warn, args)
	}

	pub fn error(&self, args: fmt::Arguments<'_>) -> bool {
		self.log(LogLevel::Error, args)
	}
}

impl Default for Logger {
	fn default() -> Self {
		Self::new("default", LogLevel::Debug)
	}
}

impl fmt::Display for Logger {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "<Logger {} ({})>", self.name, self.level)
	}
}
