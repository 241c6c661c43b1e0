//! Domain probes: observation types declare which instruments their
//! announcement methods report to, and a dispatcher calls each method once per
//! instrument it holds.
//!
//! # Modules
//!
//! - [`instrument`] - instrument capabilities and kind tags
//! - [`announcement`] - per-method requirement metadata, binding, invocation
//! - [`validation`] - chain-of-responsibility checks run before each call
//! - [`observation`] - static and runtime declaration, per-type caching
//! - [`dispatcher`] - instrument registry and the default dispatcher
//! - [`probe`] - `observe` façade over a dispatcher
//!
//! # Declaring announcements
//!
//! ```ignore
//! #[derive(Debug)]
//! struct OrderPlaced { id: u64 }
//!
//! impl domprob::Observation for OrderPlaced {}
//!
//! domprob::announcement!(OrderPlaced, log, [domprob::Logger: true], |order, logger: &domprob::Logger| {
//!     logger.info(format_args!("order {} placed", order.id));
//! });
//!
//! domprob::probe([]).observe(&OrderPlaced { id: 7 })?;
//! ```

pub mod announcement;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod instrument;
pub mod logger;
mod macros;
pub mod observation;
pub mod probe;
pub mod validation;

pub use announcement::{
	AnnouncementBuilder, AnnouncementMetadata, AnnouncementMethod, ArgValue, Args, BoundAnnouncement, IntoOutcome,
	ObservationKey, Param, Requirement, Signature,
};
pub use config::{LogLevel, ProbeConfig, init_tracing};
pub use dispatcher::{BasicDispatcher, Dispatcher, InstrumentRegistry, LookupStats};
pub use error::{ProbeError, Result};
pub use instrument::{Instrument, InstrumentKind};
pub use logger::Logger;
pub use observation::{AnnouncementSet, Observation, declare};
pub use probe::{Probe, probe};
pub use validation::{ValidationChain, ValidationOrchestrator};

#[doc(hidden)]
pub mod __private {
	pub use {anyhow, inventory, paste};
}
