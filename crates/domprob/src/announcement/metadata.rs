//! Ordered instrument requirements recorded against one announcement method.

use crate::instrument::InstrumentKind;

/// One declared capability requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
	/// Capability the method can report to.
	pub kind: InstrumentKind,
	/// Whether dispatch fails when no implementation is available.
	pub required: bool,
}

impl Requirement {
	pub const fn new(kind: InstrumentKind, required: bool) -> Self {
		Self { kind, required }
	}
}

/// Requirements of a single announcement method, in declaration order.
///
/// The first declaration applied is the first entry. Duplicate kinds are kept
/// as separate entries; each one is dispatched on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementMetadata {
	entries: Vec<Requirement>,
}

impl AnnouncementMetadata {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a requirement. No validation happens here; an unusable kind
	/// surfaces at dispatch time.
	pub fn record(&mut self, kind: InstrumentKind, required: bool) -> &mut Self {
		self.entries.push(Requirement::new(kind, required));
		self
	}

	/// Iterates requirements in insertion order. The iterator is `Clone`, so a
	/// traversal can be restarted from any point.
	pub fn entries(&self) -> Entries<'_> {
		Entries {
			inner: self.entries.iter(),
			filter: None,
		}
	}

	/// Iterates only required (`Some(true)`), only optional (`Some(false)`), or
	/// all (`None`) requirements.
	pub fn requirements(&self, required: Option<bool>) -> Entries<'_> {
		Entries {
			inner: self.entries.iter(),
			filter: required,
		}
	}

	/// Declared kinds, in order.
	pub fn kinds(&self) -> impl Iterator<Item = InstrumentKind> + Clone + '_ {
		self.entries.iter().map(|r| r.kind)
	}

	/// Returns `true` if any entry for `kind` is marked required.
	pub fn is_required(&self, kind: &InstrumentKind) -> bool {
		self.entries.iter().any(|r| r.kind == *kind && r.required)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Iterator returned by [`AnnouncementMetadata::entries`] and
/// [`AnnouncementMetadata::requirements`].
#[derive(Debug, Clone)]
pub struct Entries<'a> {
	inner: std::slice::Iter<'a, Requirement>,
	filter: Option<bool>,
}

impl<'a> Iterator for Entries<'a> {
	type Item = &'a Requirement;

	fn next(&mut self) -> Option<Self::Item> {
		let filter = self.filter;
		self.inner.find(|r| filter.is_none_or(|required| r.required == required))
	}
}

impl<'a> IntoIterator for &'a AnnouncementMetadata {
	type Item = &'a Requirement;
	type IntoIter = Entries<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries()
	}
}

#[cfg(test)]
mod tests;
