//! Crate-level error type.
//!
//! Each module owns its own error enum; [`ProbeError`] wraps them for callers
//! that go through [`Dispatcher::dispatch`](crate::Dispatcher::dispatch) or
//! [`AnnouncementMethod::call`](crate::AnnouncementMethod::call).

use thiserror::Error;

pub use crate::announcement::{BindError, BindFailure};
pub use crate::config::ConfigError;
pub use crate::dispatcher::DispatchError;
pub use crate::validation::{ChainError, ValidatorError};

/// Any failure surfaced while declaring, validating or dispatching announcements.
#[derive(Error, Debug)]
pub enum ProbeError {
	/// Call-site arguments did not fit the method signature.
	#[error(transparent)]
	Bind(#[from] BindError),
	/// A behavioural validator rejected the bound call.
	#[error(transparent)]
	Validation(#[from] ValidatorError),
	/// A validation chain was misused.
	#[error(transparent)]
	Chain(#[from] ChainError),
	/// A required instrument could not be resolved.
	#[error(transparent)]
	Dispatch(#[from] DispatchError),
	/// Probe configuration could not be read or applied.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The announcement handler itself failed.
	#[error(transparent)]
	Announcement(anyhow::Error),
}

impl ProbeError {
	/// Returns the validator failure, if this is one.
	pub fn as_validation(&self) -> Option<&ValidatorError> {
		match self {
			Self::Validation(err) => Some(err),
			_ => None,
		}
	}

	/// Returns the dispatch failure, if this is one.
	pub fn as_dispatch(&self) -> Option<&DispatchError> {
		match self {
			Self::Dispatch(err) => Some(err),
			_ => None,
		}
	}
}

/// Result alias used by dispatch and probe entry points.
pub type Result<T> = std::result::Result<T, ProbeError>;
