//! Ordered chain-of-responsibility container.
//!
//! Links are stored in a `Vec`; the "next" link is whatever follows in index
//! order, handed to each link as a [`Next`] cursor. Inserting a link runs the
//! chain's [`LinkValidatorContext`] first, which rejects links of a foreign
//! family and links structurally equal to one already present.

use std::any::Any;
use std::fmt;

use super::validators::ValidatorError;

/// Family tag a link belongs to. A chain only accepts links of its own family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkFamily(pub &'static str);

impl LinkFamily {
	/// Links that validate bound announcement calls.
	pub const ANNOUNCEMENT: Self = Self("announcement");

	pub fn name(&self) -> &'static str {
		self.0
	}
}

impl fmt::Display for LinkFamily {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

/// A link validating subjects of type `S`.
pub trait ChainLink<S: ?Sized + 'static>: Any + fmt::Debug + Send + Sync {
	/// Checks `subject`, then either fails or calls `next.validate(subject)`.
	fn validate(&self, subject: &S, next: Next<'_, S>) -> Result<(), ValidatorError>;

	fn family(&self) -> LinkFamily;

	/// Short name shown in chain renderings.
	fn link_name(&self) -> &'static str {
		crate::instrument::short_type_name(std::any::type_name::<Self>())
	}

	/// Structural equality against another link, usually via downcast.
	fn dyn_eq(&self, other: &dyn ChainLink<S>) -> bool;
}

/// Implements [`ChainLink::dyn_eq`] for links that implement `PartialEq`.
pub fn link_eq<S, L>(link: &L, other: &dyn ChainLink<S>) -> bool
where
	S: ?Sized + 'static,
	L: ChainLink<S> + PartialEq,
{
	let other: &dyn Any = other;
	other.downcast_ref::<L>() == Some(link)
}

/// Remaining links after the current one.
pub struct Next<'a, S: ?Sized + 'static> {
	rest: &'a [Box<dyn ChainLink<S>>],
}

impl<'a, S: ?Sized + 'static> Next<'a, S> {
	/// Hands `subject` to the next link. Succeeds when the chain is exhausted.
	pub fn validate(self, subject: &S) -> Result<(), ValidatorError> {
		match self.rest.split_first() {
			Some((link, rest)) => link.validate(subject, Next { rest }),
			None => Ok(()),
		}
	}

	pub fn remaining(&self) -> usize {
		self.rest.len()
	}
}

/// Structural errors raised while building a chain, and empty-chain use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
	#[error("nothing to validate, no links added to chain '{chain}'")]
	Empty { chain: String },
	#[error("invalid link of type '{link}', expected family '{expected}'")]
	InvalidLink { link: &'static str, expected: &'static str },
	#[error("link '{link}' already exists in chain '{chain}'")]
	LinkExists { link: String, chain: String },
	#[error("link index {index} out of range for chain of length {len}")]
	IndexOutOfBounds { index: usize, len: usize },
}

/// View of a chain handed to link validators.
pub struct ChainView<'a, S: ?Sized + 'static> {
	pub family: LinkFamily,
	pub links: &'a [Box<dyn ChainLink<S>>],
}

impl<S: ?Sized + 'static> Clone for ChainView<'_, S> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<S: ?Sized + 'static> Copy for ChainView<'_, S> {}

impl<S: ?Sized + 'static> ChainView<'_, S> {
	fn describe(&self) -> String {
		format!("ValidationChain(family={})", self.family)
	}
}

/// A structural check run before a link enters a chain.
pub trait LinkValidator<S: ?Sized + 'static>: Send + Sync {
	fn validate(&self, chain: ChainView<'_, S>, link: &dyn ChainLink<S>) -> Result<(), ChainError>;
}

/// Rejects links whose family differs from the chain's.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkTypeValidator;

impl<S: ?Sized + 'static> LinkValidator<S> for LinkTypeValidator {
	fn validate(&self, chain: ChainView<'_, S>, link: &dyn ChainLink<S>) -> Result<(), ChainError> {
		if link.family() != chain.family {
			return Err(ChainError::InvalidLink {
				link: link.link_name(),
				expected: chain.family.name(),
			});
		}
		Ok(())
	}
}

/// Rejects links structurally equal to one already in the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueLinkValidator;

impl<S: ?Sized + 'static> LinkValidator<S> for UniqueLinkValidator {
	fn validate(&self, chain: ChainView<'_, S>, link: &dyn ChainLink<S>) -> Result<(), ChainError> {
		if chain.links.iter().any(|existing| existing.dyn_eq(link)) {
			return Err(ChainError::LinkExists {
				link: format!("{link:?}"),
				chain: chain.describe(),
			});
		}
		Ok(())
	}
}

/// Ordered set of link validators. The type and uniqueness validators always
/// run first; extra validators run after them in registration order.
pub struct LinkValidatorContext<S: ?Sized + 'static> {
	validators: Vec<Box<dyn LinkValidator<S>>>,
}

impl<S: ?Sized + 'static> LinkValidatorContext<S> {
	pub fn new() -> Self {
		Self {
			validators: vec![Box::new(LinkTypeValidator), Box::new(UniqueLinkValidator)],
		}
	}

	pub fn add_validator(&mut self, validator: impl LinkValidator<S> + 'static) {
		self.validators.push(Box::new(validator));
	}

	pub fn len(&self) -> usize {
		self.validators.len()
	}

	pub fn is_empty(&self) -> bool {
		self.validators.is_empty()
	}

	pub fn validate(&self, chain: ChainView<'_, S>, link: &dyn ChainLink<S>) -> Result<(), ChainError> {
		self.validators.iter().try_for_each(|v| v.validate(chain, link))
	}
}

impl<S: ?Sized + 'static> Default for LinkValidatorContext<S> {
	fn default() -> Self {
		Self::new()
	}
}

/// Ordered sequence of [`ChainLink`]s sharing one [`LinkFamily`].
pub struct ValidationChain<S: ?Sized + 'static> {
	family: LinkFamily,
	links: Vec<Box<dyn ChainLink<S>>>,
	link_validator: LinkValidatorContext<S>,
}

impl<S: ?Sized + 'static> ValidationChain<S> {
	pub fn new(family: LinkFamily) -> Self {
		Self::with_link_validator(family, LinkValidatorContext::new())
	}

	pub fn with_link_validator(family: LinkFamily, link_validator: LinkValidatorContext<S>) -> Self {
		Self {
			family,
			links: Vec::new(),
			link_validator,
		}
	}

	/// Builds a chain from links already known to satisfy its invariants.
	pub(super) fn seeded(family: LinkFamily, links: Vec<Box<dyn ChainLink<S>>>) -> Self {
		Self {
			family,
			links,
			link_validator: LinkValidatorContext::new(),
		}
	}

	pub fn family(&self) -> LinkFamily {
		self.family
	}

	pub fn link_validator_mut(&mut self) -> &mut LinkValidatorContext<S> {
		&mut self.link_validator
	}

	fn view(&self) -> ChainView<'_, S> {
		ChainView {
			family: self.family,
			links: &self.links,
		}
	}

	fn check(&self, link: &dyn ChainLink<S>) -> Result<(), ChainError> {
		self.link_validator.validate(self.view(), link)
	}

	pub fn append(&mut self, link: impl ChainLink<S>) -> Result<(), ChainError> {
		self.push_boxed(Box::new(link))
	}

	pub fn push_boxed(&mut self, link: Box<dyn ChainLink<S>>) -> Result<(), ChainError> {
		self.check(link.as_ref())?;
		self.links.push(link);
		Ok(())
	}

	/// Appends every link, or none: each candidate is checked against the
	/// chain plus the candidates accepted before it.
	pub fn extend<I>(&mut self, links: I) -> Result<(), ChainError>
	where
		I: IntoIterator<Item = Box<dyn ChainLink<S>>>,
	{
		let start = self.links.len();
		for link in links {
			if let Err(err) = self.check(link.as_ref()) {
				self.links.truncate(start);
				return Err(err);
			}
			self.links.push(link);
		}
		Ok(())
	}

	/// Inserts at `index`, shifting later links back. `index` is clamped to
	/// the chain length.
	pub fn insert(&mut self, index: usize, link: impl ChainLink<S>) -> Result<(), ChainError> {
		let link: Box<dyn ChainLink<S>> = Box::new(link);
		self.check(link.as_ref())?;
		let index = index.min(self.links.len());
		self.links.insert(index, link);
		Ok(())
	}

	/// Replaces the link at `index`, returning the old one. The replaced slot
	/// does not count towards uniqueness.
	pub fn set(&mut self, index: usize, link: impl ChainLink<S>) -> Result<Box<dyn ChainLink<S>>, ChainError> {
		if index >= self.links.len() {
			return Err(ChainError::IndexOutOfBounds {
				index,
				len: self.links.len(),
			});
		}
		let link: Box<dyn ChainLink<S>> = Box::new(link);
		let old = self.links.remove(index);
		if let Err(err) = self.check(link.as_ref()) {
			self.links.insert(index, old);
			return Err(err);
		}
		self.links.insert(index, link);
		Ok(old)
	}

	pub fn remove(&mut self, index: usize) -> Option<Box<dyn ChainLink<S>>> {
		(index < self.links.len()).then(|| self.links.remove(index))
	}

	pub fn clear(&mut self) {
		self.links.clear();
	}

	pub fn get(&self, index: usize) -> Option<&dyn ChainLink<S>> {
		self.links.get(index).map(|link| link.as_ref())
	}

	pub fn iter(&self) -> impl Iterator<Item = &dyn ChainLink<S>> {
		self.links.iter().map(|link| link.as_ref())
	}

	pub fn contains(&self, link: &dyn ChainLink<S>) -> bool {
		self.links.iter().any(|existing| existing.dyn_eq(link))
	}

	pub fn len(&self) -> usize {
		self.links.len()
	}

	pub fn is_empty(&self) -> bool {
		self.links.is_empty()
	}

	/// Runs `subject` through the chain from the head link.
	pub fn validate_chain(&self, subject: &S) -> Result<(), ValidatorError> {
		if self.links.is_empty() {
			return Err(ChainError::Empty {
				chain: self.view().describe(),
			}
			.into());
		}
		Next { rest: &self.links }.validate(subject)
	}
}

impl<S: ?Sized + 'static> PartialEq for ValidationChain<S> {
	fn eq(&self, other: &Self) -> bool {
		self.family == other.family
			&& self.links.len() == other.links.len()
			&& self.links.iter().zip(&other.links).all(|(a, b)| a.dyn_eq(b.as_ref()))
	}
}

impl<S: ?Sized + 'static> fmt::Debug for ValidationChain<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ValidationChain")
			.field("family", &self.family)
			.field("links", &self.links)
			.finish()
	}
}

impl<S: ?Sized + 'static> fmt::Display for ValidationChain<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, link) in self.links.iter().enumerate() {
			if i > 0 {
				f.write_str(" -> ")?;
			}
			f.write_str(link.link_name())?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
