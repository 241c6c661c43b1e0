//! Matching declared requirements against held instrument implementations.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::announcement::{Args, ObservationKey};
use crate::error::ProbeError;
use crate::instrument::{Instrument, InstrumentKind};
use crate::observation::Observation;

/// Drives an observation's announcement methods against a set of instruments.
pub trait Dispatcher {
	fn dispatch<O: Observation>(&self, observation: &O) -> Result<(), ProbeError>;
}

/// Dispatch-time resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
	#[error(
		"Required instrument `{instrument}` in `{observation}.{method}(...)` is missing from available implementations: {}",
		list_available(.available)
	)]
	RequiredInstrumentMissing {
		observation: &'static str,
		method: String,
		instrument: &'static str,
		/// `Debug` form of every held implementation.
		available: Vec<String>,
	},
	#[error("Instrument `{instrument}` not found in available implementations: {}", list_available(.available))]
	InstrumentNotFound {
		instrument: &'static str,
		available: Vec<String>,
	},
}

fn list_available(available: &[String]) -> String {
	if available.is_empty() {
		return "None".to_owned();
	}
	available.iter().map(|imp| format!("`{imp}`")).collect::<Vec<_>>().join(", ")
}

/// Counters for [`InstrumentRegistry::get`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupStats {
	/// Lookups answered from the cache.
	pub hits: usize,
	/// Lookups that scanned the held implementations.
	pub scans: usize,
}

/// Concrete instrument implementations available to a dispatcher.
///
/// Lookups match by exact runtime type. Results for cacheable kinds are
/// memoized; predicate kinds always scan.
pub struct InstrumentRegistry {
	instruments: Vec<Arc<dyn Instrument>>,
	cache: Mutex<FxHashMap<TypeId, Arc<dyn Instrument>>>,
	hits: AtomicUsize,
	scans: AtomicUsize,
}

impl InstrumentRegistry {
	pub fn new(instruments: impl IntoIterator<Item = Arc<dyn Instrument>>) -> Self {
		Self {
			instruments: instruments.into_iter().collect(),
			cache: Mutex::new(FxHashMap::default()),
			hits: AtomicUsize::new(0),
			scans: AtomicUsize::new(0),
		}
	}

	/// Resolves `kind` to the first held implementation it matches.
	pub fn get(&self, kind: &InstrumentKind) -> Option<Arc<dyn Instrument>> {
		let key = kind.cache_key();
		if let Some(key) = key
			&& let Some(hit) = self.cache.lock().get(&key)
		{
			self.hits.fetch_add(1, Ordering::Relaxed);
			return Some(Arc::clone(hit));
		}

		self.scans.fetch_add(1, Ordering::Relaxed);
		let found = self.instruments.iter().find(|imp| kind.matches(imp.as_ref()))?;
		if let Some(key) = key {
			self.cache.lock().insert(key, Arc::clone(found));
		}
		Some(Arc::clone(found))
	}

	/// Like [`get`](Self::get), failing when nothing matches.
	pub fn get_required(&self, kind: &InstrumentKind) -> Result<Arc<dyn Instrument>, DispatchError> {
		self.get(kind).ok_or_else(|| DispatchError::InstrumentNotFound {
			instrument: kind.name(),
			available: self.describe(),
		})
	}

	/// Whether this exact implementation (by pointer) is held.
	pub fn contains(&self, instrument: &Arc<dyn Instrument>) -> bool {
		self.instruments.iter().any(|imp| Arc::ptr_eq(imp, instrument))
	}

	pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Instrument>> {
		self.instruments.iter()
	}

	pub fn len(&self) -> usize {
		self.instruments.len()
	}

	pub fn is_empty(&self) -> bool {
		self.instruments.is_empty()
	}

	pub fn stats(&self) -> LookupStats {
		LookupStats {
			hits: self.hits.load(Ordering::Relaxed),
			scans: self.scans.load(Ordering::Relaxed),
		}
	}

	fn describe(&self) -> Vec<String> {
		self.instruments.iter().map(|imp| format!("{imp:?}")).collect()
	}
}

impl FromIterator<Arc<dyn Instrument>> for InstrumentRegistry {
	fn from_iter<I: IntoIterator<Item = Arc<dyn Instrument>>>(iter: I) -> Self {
		Self::new(iter)
	}
}

impl fmt::Debug for InstrumentRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InstrumentRegistry")
			.field("num_instruments", &self.len())
			.finish_non_exhaustive()
	}
}

/// Default [`Dispatcher`] over a shared [`InstrumentRegistry`].
///
/// Clones share the registry and its cache. Equality and hashing follow
/// registry identity, so a clone equals its source and nothing else.
#[derive(Clone)]
pub struct BasicDispatcher {
	registry: Arc<InstrumentRegistry>,
}

impl BasicDispatcher {
	pub fn new(instruments: impl IntoIterator<Item = Arc<dyn Instrument>>) -> Self {
		Self::from_registry(Arc::new(InstrumentRegistry::new(instruments)))
	}

	pub fn from_registry(registry: Arc<InstrumentRegistry>) -> Self {
		Self { registry }
	}

	pub fn registry(&self) -> &InstrumentRegistry {
		&self.registry
	}
}

impl Dispatcher for BasicDispatcher {
	fn dispatch<O: Observation>(&self, observation: &O) -> Result<(), ProbeError> {
		let key = ObservationKey::of::<O>();
		let announcements = O::announcements();
		tracing::debug!(
			observation = key.name(),
			announcements = announcements.len(),
			instruments = self.registry.len(),
			"dispatch.start"
		);

		for method in announcements.iter() {
			for req in method.metadata() {
				let Some(imp) = self.registry.get(&req.kind) else {
					if req.required {
						tracing::debug!(
							observation = key.name(),
							method = method.name(),
							instrument = req.kind.name(),
							"dispatch.required_missing"
						);
						return Err(DispatchError::RequiredInstrumentMissing {
							observation: key.name(),
							method: method.name().to_owned(),
							instrument: req.kind.name(),
							available: self.registry.describe(),
						}
						.into());
					}
					tracing::trace!(
						observation = key.name(),
						method = method.name(),
						instrument = req.kind.name(),
						"dispatch.skip_optional"
					);
					continue;
				};

				tracing::trace!(
					observation = key.name(),
					method = method.name(),
					instrument = req.kind.name(),
					"dispatch.announce"
				);
				method.call(observation, Args::positional([imp]))?;
			}
		}
		Ok(())
	}
}

impl PartialEq for BasicDispatcher {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.registry, &other.registry)
	}
}

impl Eq for BasicDispatcher {}

impl Hash for BasicDispatcher {
	fn hash<H: Hasher>(&self, state: &mut H) {
		Arc::as_ptr(&self.registry).hash(state);
	}
}

impl fmt::Debug for BasicDispatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut tuple = f.debug_tuple("BasicDispatcher");
		for imp in self.registry.iter() {
			tuple.field(imp);
		}
		tuple.finish()
	}
}
