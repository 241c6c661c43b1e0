//! Behavioural chain applied to every announcement call.

use std::fmt;
use std::sync::LazyLock;

use super::chain::{ChainError, ChainLink, LinkFamily, ValidationChain};
use super::validators::{InstrumentPresenceValidator, InstrumentTypeValidator, ValidatorError};
use crate::announcement::BoundAnnouncement;

static SHARED: LazyLock<ValidationOrchestrator> = LazyLock::new(ValidationOrchestrator::new);

/// Owns the behavioural [`ValidationChain`] run before a handler executes.
///
/// The default chain is presence first, then type.
pub struct ValidationOrchestrator {
	chain: ValidationChain<BoundAnnouncement>,
}

impl ValidationOrchestrator {
	pub fn new() -> Self {
		Self {
			chain: ValidationChain::seeded(
				LinkFamily::ANNOUNCEMENT,
				vec![Box::new(InstrumentPresenceValidator), Box::new(InstrumentTypeValidator)],
			),
		}
	}

	/// Process-wide orchestrator with the default chain.
	pub fn shared() -> &'static Self {
		&SHARED
	}

	/// Wraps an existing chain as-is.
	pub fn with_chain(chain: ValidationChain<BoundAnnouncement>) -> Self {
		Self { chain }
	}

	/// Appends a link after the existing ones.
	pub fn register(&mut self, link: impl ChainLink<BoundAnnouncement>) -> Result<(), ChainError> {
		self.chain.append(link)
	}

	pub fn validate(&self, call: &BoundAnnouncement) -> Result<(), ValidatorError> {
		tracing::trace!(method = %call.method().qualified_name(), chain = %self.chain, "announcement.validate");
		self.chain.validate_chain(call)
	}

	pub fn chain(&self) -> &ValidationChain<BoundAnnouncement> {
		&self.chain
	}

	pub fn chain_mut(&mut self) -> &mut ValidationChain<BoundAnnouncement> {
		&mut self.chain
	}
}

impl Default for ValidationOrchestrator {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for ValidationOrchestrator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ValidationOrchestrator").field(&self.chain).finish()
	}
}
