//! Chain-of-responsibility validation of bound announcement calls.

pub mod chain;
pub mod orchestrator;
pub mod validators;

pub use chain::{
	ChainError, ChainLink, ChainView, LinkFamily, LinkTypeValidator, LinkValidator, LinkValidatorContext, Next,
	UniqueLinkValidator, ValidationChain, link_eq,
};
pub use orchestrator::ValidationOrchestrator;
pub use validators::{InstrumentPresenceValidator, InstrumentTypeValidator, RequirementsDeclaredValidator, ValidatorError};
