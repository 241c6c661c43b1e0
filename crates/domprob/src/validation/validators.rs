//! Behavioural links run against a bound announcement call.

use super::chain::{ChainError, ChainLink, LinkFamily, Next, link_eq};
use crate::announcement::BoundAnnouncement;

/// Failure raised while validating a bound announcement call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidatorError {
	#[error("'instrument' param missing in {method}(...)")]
	MissingInstrument { method: String },
	#[error("{method}(...) expects 'instrument' param to be one of: [{supported}], but got: {instrument}")]
	InstrumentType {
		method: String,
		instrument: String,
		/// Comma-joined kind names, in metadata order.
		supported: String,
	},
	#[error("{method}(...) has no supported instrument types defined")]
	NoSupportedInstruments { method: String },
	#[error(transparent)]
	Chain(#[from] ChainError),
}

/// Fails when the instrument slot is missing, unbound or empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstrumentPresenceValidator;

impl ChainLink<BoundAnnouncement> for InstrumentPresenceValidator {
	fn validate(&self, call: &BoundAnnouncement, next: Next<'_, BoundAnnouncement>) -> Result<(), ValidatorError> {
		if call.instrument().is_none() {
			return Err(ValidatorError::MissingInstrument {
				method: call.method().qualified_name(),
			});
		}
		next.validate(call)
	}

	fn family(&self) -> LinkFamily {
		LinkFamily::ANNOUNCEMENT
	}

	fn dyn_eq(&self, other: &dyn ChainLink<BoundAnnouncement>) -> bool {
		link_eq(self, other)
	}
}

/// Fails unless the bound instrument matches one of the recorded kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstrumentTypeValidator;

impl ChainLink<BoundAnnouncement> for InstrumentTypeValidator {
	fn validate(&self, call: &BoundAnnouncement, next: Next<'_, BoundAnnouncement>) -> Result<(), ValidatorError> {
		let metadata = call.metadata();
		let matched = call
			.instrument()
			.is_some_and(|instrument| metadata.kinds().any(|kind| kind.matches(instrument.as_ref())));
		if !matched {
			let supported = metadata.kinds().map(|kind| kind.name()).collect::<Vec<_>>().join(", ");
			let instrument = call
				.instrument()
				.map_or_else(|| "None".to_owned(), |instrument| format!("{instrument:?}"));
			return Err(ValidatorError::InstrumentType {
				method: call.method().qualified_name(),
				instrument,
				supported,
			});
		}
		next.validate(call)
	}

	fn family(&self) -> LinkFamily {
		LinkFamily::ANNOUNCEMENT
	}

	fn dyn_eq(&self, other: &dyn ChainLink<BoundAnnouncement>) -> bool {
		link_eq(self, other)
	}
}

/// Fails when the method declares no instrument requirements at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequirementsDeclaredValidator;

impl ChainLink<BoundAnnouncement> for RequirementsDeclaredValidator {
	fn validate(&self, call: &BoundAnnouncement, next: Next<'_, BoundAnnouncement>) -> Result<(), ValidatorError> {
		if call.metadata().is_empty() {
			return Err(ValidatorError::NoSupportedInstruments {
				method: call.method().qualified_name(),
			});
		}
		next.validate(call)
	}

	fn family(&self) -> LinkFamily {
		LinkFamily::ANNOUNCEMENT
	}

	fn dyn_eq(&self, other: &dyn ChainLink<BoundAnnouncement>) -> bool {
		link_eq(self, other)
	}
}
