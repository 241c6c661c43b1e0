//! Probe façade pairing a dispatcher with an `observe` entry point.

use std::fmt;
use std::sync::Arc;

use crate::config::ProbeConfig;
use crate::dispatcher::{BasicDispatcher, Dispatcher};
use crate::error::ProbeError;
use crate::instrument::Instrument;
use crate::logger::Logger;
use crate::observation::Observation;

/// Observes values by dispatching them.
///
/// Two probes are equal when their dispatchers are, and hash the same way.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Probe<D = BasicDispatcher> {
	dispatcher: D,
}

impl<D: Dispatcher> Probe<D> {
	pub fn new(dispatcher: D) -> Self {
		Self { dispatcher }
	}

	/// Dispatches `observation` to every matching instrument.
	pub fn observe<O: Observation>(&self, observation: &O) -> Result<(), ProbeError> {
		self.dispatcher.dispatch(observation)
	}

	pub fn dispatcher(&self) -> &D {
		&self.dispatcher
	}

	pub fn into_dispatcher(self) -> D {
		self.dispatcher
	}
}

impl Probe {
	/// Probe over the default [`Logger`] built from `config`.
	pub fn from_config(config: &ProbeConfig) -> Self {
		let logger: Arc<dyn Instrument> = Arc::new(config.logger());
		Self::new(BasicDispatcher::new([logger]))
	}
}

impl Default for Probe {
	fn default() -> Self {
		Self::from_config(&ProbeConfig::default())
	}
}

impl<D: fmt::Debug> fmt::Debug for Probe<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Probe").field("dispatcher", &self.dispatcher).finish()
	}
}

/// Builds a [`Probe`] over `instruments`, or over the default [`Logger`] when
/// `instruments` is empty.
pub fn probe<I>(instruments: I) -> Probe
where
	I: IntoIterator<Item = Arc<dyn Instrument>>,
{
	let mut instruments: Vec<Arc<dyn Instrument>> = instruments.into_iter().collect();
	if instruments.is_empty() {
		instruments.push(Arc::new(Logger::default()));
	}
	Probe::new(BasicDispatcher::new(instruments))
}
