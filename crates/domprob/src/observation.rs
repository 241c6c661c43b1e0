//! Observation types and discovery of their announcement methods.
//!
//! Announcement methods reach an observation type two ways. The
//! [`announcement!`](crate::announcement!) macro submits an
//! [`AnnouncementStatic`] through `inventory`, collected at link time.
//! [`declare`] adds a built [`AnnouncementMethod`] to a runtime side table.
//!
//! The first call to [`Observation::announcements`] for a type merges both
//! sources into one [`AnnouncementSet`] and caches it process-wide. Later
//! declarations for that type are ignored with a warning.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::announcement::{AnnouncementMetadata, AnnouncementMethod, ErasedHandler, ObservationKey, Signature};
use crate::instrument::{Instrument, InstrumentKind};

/// A value announcement methods report on.
///
/// Implement with an empty body; the default [`announcements`](Self::announcements)
/// looks up everything declared against the type.
pub trait Observation: Any + fmt::Debug + Sized {
	/// Announcement methods of this type, ordered by method name.
	fn announcements() -> Arc<AnnouncementSet> {
		announcements_of::<Self>()
	}
}

/// Announcement methods of one observation type, keyed and ordered by name.
#[derive(Debug, Default)]
pub struct AnnouncementSet {
	methods: IndexMap<Box<str>, Arc<AnnouncementMethod>>,
}

impl AnnouncementSet {
	pub fn get(&self, name: &str) -> Option<&Arc<AnnouncementMethod>> {
		self.methods.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.methods.contains_key(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Arc<AnnouncementMethod>> {
		self.methods.values()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.methods.keys().map(|name| &**name)
	}

	pub fn len(&self) -> usize {
		self.methods.len()
	}

	pub fn is_empty(&self) -> bool {
		self.methods.is_empty()
	}
}

impl<'a> IntoIterator for &'a AnnouncementSet {
	type Item = &'a Arc<AnnouncementMethod>;
	type IntoIter = indexmap::map::Values<'a, Box<str>, Arc<AnnouncementMethod>>;

	fn into_iter(self) -> Self::IntoIter {
		self.methods.values()
	}
}

/// One statically declared requirement.
pub struct RequirementStatic {
	pub kind: fn() -> InstrumentKind,
	pub required: bool,
}

/// Static announcement declaration emitted by [`announcement!`](crate::announcement!).
pub struct AnnouncementStatic {
	pub observation: fn() -> ObservationKey,
	pub name: &'static str,
	/// Requirements in declaration order.
	pub requirements: &'static [RequirementStatic],
	pub handler: fn(&dyn Any, &dyn Instrument) -> anyhow::Result<()>,
}

impl AnnouncementStatic {
	fn to_method(&self) -> AnnouncementMethod {
		let mut metadata = AnnouncementMetadata::new();
		for req in self.requirements {
			metadata.record((req.kind)(), req.required);
		}
		let handler: Arc<ErasedHandler> = Arc::new(self.handler);
		AnnouncementMethod::from_parts(self.name, (self.observation)(), Signature::announcement(), metadata, handler)
	}
}

/// Wrapper for `inventory::collect!`.
pub struct AnnouncementReg(pub &'static AnnouncementStatic);

inventory::collect!(AnnouncementReg);

type MethodTable = FxHashMap<TypeId, Vec<Arc<AnnouncementMethod>>>;
type SetCache = FxHashMap<TypeId, Arc<AnnouncementSet>>;

static DECLARED: LazyLock<RwLock<MethodTable>> = LazyLock::new(|| RwLock::new(FxHashMap::default()));
static CACHE: LazyLock<RwLock<SetCache>> = LazyLock::new(|| RwLock::new(FxHashMap::default()));

/// Adds `method` to its observation type's runtime declarations.
///
/// Returns `false` when the type's announcement set was already computed; the
/// declaration is kept but the cached set does not change.
pub fn declare(method: Arc<AnnouncementMethod>) -> bool {
	let key = method.observation();
	let cached = CACHE.read().contains_key(&key.id());
	if cached {
		tracing::warn!(
			observation = key.name(),
			method = method.name(),
			"announcement declared after the observation's set was cached; ignoring"
		);
	}
	DECLARED.write().entry(key.id()).or_default().push(method);
	!cached
}

/// Cached announcement set for `O`, computing it on first use.
pub fn announcements_of<O: Observation>() -> Arc<AnnouncementSet> {
	let id = TypeId::of::<O>();
	if let Some(set) = CACHE.read().get(&id) {
		return Arc::clone(set);
	}

	let key = ObservationKey::of::<O>();
	let computed = Arc::new(collect(key));
	tracing::debug!(observation = key.name(), announcements = computed.len(), "observation.announcements");
	Arc::clone(CACHE.write().entry(id).or_insert(computed))
}

fn collect(key: ObservationKey) -> AnnouncementSet {
	let statics = inventory::iter::<AnnouncementReg>
		.into_iter()
		.map(|reg| reg.0)
		.filter(|decl| (decl.observation)().id() == key.id())
		.map(|decl| Arc::new(decl.to_method()));
	let runtime = DECLARED.read().get(&key.id()).cloned().unwrap_or_default();

	let mut methods: IndexMap<Box<str>, Arc<AnnouncementMethod>> = IndexMap::new();
	for method in statics.chain(runtime) {
		if methods.contains_key(method.name()) {
			tracing::trace!(observation = key.name(), method = method.name(), "observation.duplicate_announcement");
			continue;
		}
		methods.insert(method.name().into(), method);
	}
	methods.sort_keys();

	AnnouncementSet { methods }
}
