//! Instrument capabilities and the tags used to request them.
//!
//! An instrument is any concrete object an announcement can report to (a
//! logger, a metrics client, a tracer). Announcements never name a trait they
//! require; they name an [`InstrumentKind`], and the dispatcher matches held
//! implementations against that kind by exact runtime type.

use std::any::{Any, TypeId};
use std::fmt;

/// A concrete capability implementation.
///
/// Blanket-implemented for every `'static` type that is `Debug + Send + Sync`,
/// so there is no base interface to implement.
pub trait Instrument: Any + fmt::Debug + Send + Sync {}

impl<T: Any + fmt::Debug + Send + Sync> Instrument for T {}

impl dyn Instrument {
	/// Exact runtime type of the implementation behind the trait object.
	pub fn instrument_type_id(&self) -> TypeId {
		let any: &dyn Any = self;
		any.type_id()
	}

	/// Returns `true` if the implementation is exactly a `T`.
	pub fn is<T: Instrument>(&self) -> bool {
		self.instrument_type_id() == TypeId::of::<T>()
	}

	/// Downcasts to the concrete implementation type.
	pub fn downcast_ref<T: Instrument>(&self) -> Option<&T> {
		let any: &dyn Any = self;
		any.downcast_ref::<T>()
	}
}

/// Predicate used by [`InstrumentKind::matching`].
pub type InstrumentPredicate = fn(&dyn Instrument) -> bool;

#[derive(Clone, Copy)]
enum Matcher {
	Exact(TypeId),
	Predicate(InstrumentPredicate),
}

/// Tag naming a capability an announcement method can report to.
///
/// Kinds built with [`InstrumentKind::of`] match by type identity and can be
/// cached by the instrument registry. Kinds built with
/// [`InstrumentKind::matching`] match by predicate and have no cache key, so
/// every lookup scans.
#[derive(Clone, Copy)]
pub struct InstrumentKind {
	name: &'static str,
	matcher: Matcher,
}

impl InstrumentKind {
	/// Kind satisfied only by implementations whose type is exactly `T`.
	pub fn of<T: Instrument>() -> Self {
		Self {
			name: short_type_name(std::any::type_name::<T>()),
			matcher: Matcher::Exact(TypeId::of::<T>()),
		}
	}

	/// Kind satisfied by any implementation accepted by `predicate`.
	pub fn matching(name: &'static str, predicate: InstrumentPredicate) -> Self {
		Self {
			name,
			matcher: Matcher::Predicate(predicate),
		}
	}

	/// Short display name used in diagnostics.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Cache key for exact kinds; `None` for predicate kinds.
	pub fn cache_key(&self) -> Option<TypeId> {
		match self.matcher {
			Matcher::Exact(id) => Some(id),
			Matcher::Predicate(_) => None,
		}
	}

	/// Whether `instrument` satisfies this kind.
	pub fn matches(&self, instrument: &dyn Instrument) -> bool {
		match self.matcher {
			Matcher::Exact(id) => instrument.instrument_type_id() == id,
			Matcher::Predicate(predicate) => predicate(instrument),
		}
	}
}

impl PartialEq for InstrumentKind {
	fn eq(&self, other: &Self) -> bool {
		match (self.matcher, other.matcher) {
			(Matcher::Exact(a), Matcher::Exact(b)) => a == b,
			(Matcher::Predicate(a), Matcher::Predicate(b)) => {
				self.name == other.name && std::ptr::fn_addr_eq(a, b)
			}
			_ => false,
		}
	}
}

impl Eq for InstrumentKind {}

impl fmt::Debug for InstrumentKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.matcher {
			Matcher::Exact(_) => write!(f, "InstrumentKind({})", self.name),
			Matcher::Predicate(_) => write!(f, "InstrumentKind(matching {})", self.name),
		}
	}
}

impl fmt::Display for InstrumentKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Strips module paths from a `type_name`, keeping generic arguments intact.
///
/// `my_crate::metrics::Counter<my_crate::Tag>` becomes `Counter<my_crate::Tag>`.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
	let head_end = full.find('<').unwrap_or(full.len());
	let start = full[..head_end].rfind("::").map_or(0, |i| i + 2);
	&full[start..]
}
