//! Announcement methods: a handler plus the requirements declared against it.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use super::binder::{self, Args, BindError, BindFailure, BoundArguments, Signature};
use super::metadata::AnnouncementMetadata;
use crate::error::ProbeError;
use crate::instrument::{Instrument, InstrumentKind, short_type_name};
use crate::validation::ValidationOrchestrator;

/// Type-erased handler body. The receiver is downcast to the observation type
/// by the wrapper that created the handler.
pub type ErasedHandler = dyn Fn(&dyn Any, &dyn Instrument) -> anyhow::Result<()> + Send + Sync;

/// Conversion of a handler body's value into its outcome.
///
/// Lets handler bodies evaluate to either `()` or a `Result`.
pub trait IntoOutcome {
	fn into_outcome(self) -> anyhow::Result<()>;
}

impl IntoOutcome for () {
	fn into_outcome(self) -> anyhow::Result<()> {
		Ok(())
	}
}

impl<E> IntoOutcome for Result<(), E>
where
	E: Into<anyhow::Error>,
{
	fn into_outcome(self) -> anyhow::Result<()> {
		self.map_err(Into::into)
	}
}

/// Identity of the observation type an announcement method belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationKey {
	id: TypeId,
	name: &'static str,
}

impl ObservationKey {
	pub fn of<O: Any>() -> Self {
		Self {
			id: TypeId::of::<O>(),
			name: short_type_name(std::any::type_name::<O>()),
		}
	}

	pub fn id(&self) -> TypeId {
		self.id
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

/// A method that reports an observation to one or more instrument kinds.
pub struct AnnouncementMethod {
	name: Box<str>,
	observation: ObservationKey,
	signature: Signature,
	metadata: AnnouncementMetadata,
	handler: Arc<ErasedHandler>,
}

impl AnnouncementMethod {
	/// Starts declaring a method on observation type `O`.
	pub fn builder<O, R>(name: impl Into<Box<str>>, handler: fn(&O, &dyn Instrument) -> R) -> AnnouncementBuilder
	where
		O: Any,
		R: IntoOutcome + 'static,
	{
		let observation = ObservationKey::of::<O>();
		let erased = move |receiver: &dyn Any, instrument: &dyn Instrument| match receiver.downcast_ref::<O>() {
			Some(obs) => handler(obs, instrument).into_outcome(),
			None => Err(anyhow::anyhow!("receiver is not a `{}`", observation.name())),
		};
		AnnouncementBuilder {
			method: Self {
				name: name.into(),
				observation,
				signature: Signature::announcement(),
				metadata: AnnouncementMetadata::new(),
				handler: Arc::new(erased),
			},
		}
	}

	/// Builds a method from pre-erased parts.
	pub fn from_parts(
		name: impl Into<Box<str>>,
		observation: ObservationKey,
		signature: Signature,
		metadata: AnnouncementMetadata,
		handler: Arc<ErasedHandler>,
	) -> Self {
		Self {
			name: name.into(),
			observation,
			signature,
			metadata,
			handler,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// `Observation.method` form used in diagnostics.
	pub fn qualified_name(&self) -> String {
		format!("{}.{}", self.observation.name(), self.name)
	}

	pub fn observation(&self) -> ObservationKey {
		self.observation
	}

	pub fn signature(&self) -> &Signature {
		&self.signature
	}

	pub fn metadata(&self) -> &AnnouncementMetadata {
		&self.metadata
	}

	/// Binds call-site arguments for `receiver`.
	pub fn bind(self: &Arc<Self>, receiver: &dyn Any, args: Args) -> Result<BoundAnnouncement, BindError> {
		let fail = |reason| BindError {
			method: self.qualified_name(),
			reason,
		};
		if self.signature.has_receiver() && receiver.type_id() != self.observation.id() {
			return Err(fail(BindFailure::Receiver {
				expected: self.observation.name(),
			}));
		}
		let arguments = binder::bind_partial(&self.signature, args).map_err(fail)?;
		let instrument_param = self
			.signature
			.instrument_param(&self.metadata)
			.map(|p| Box::<str>::from(p.name()));
		Ok(BoundAnnouncement {
			method: Arc::clone(self),
			arguments,
			instrument_param,
		})
	}

	/// Binds, validates with the default chain, then runs the handler.
	pub fn call(self: &Arc<Self>, receiver: &dyn Any, args: Args) -> Result<(), ProbeError> {
		self.call_with(ValidationOrchestrator::shared(), receiver, args)
	}

	/// Like [`call`](Self::call) with a caller-supplied validation chain.
	pub fn call_with(
		self: &Arc<Self>,
		validator: &ValidationOrchestrator,
		receiver: &dyn Any,
		args: Args,
	) -> Result<(), ProbeError> {
		let bound = self.bind(receiver, args)?;
		validator.validate(&bound)?;
		bound.execute(receiver)
	}
}

impl fmt::Debug for AnnouncementMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AnnouncementMethod")
			.field("name", &self.name)
			.field("observation", &self.observation.name())
			.field("metadata", &self.metadata)
			.finish()
	}
}

/// Stackable declaration of an [`AnnouncementMethod`].
#[must_use]
pub struct AnnouncementBuilder {
	method: AnnouncementMethod,
}

impl AnnouncementBuilder {
	/// Records one requirement for instrument type `T`.
	pub fn announce<T: Instrument>(self, required: bool) -> Self {
		self.announce_kind(InstrumentKind::of::<T>(), required)
	}

	pub fn announce_kind(mut self, kind: InstrumentKind, required: bool) -> Self {
		self.method.metadata.record(kind, required);
		self
	}

	/// Replaces the canonical `(receiver, instrument)` signature.
	pub fn signature(mut self, signature: Signature) -> Self {
		self.method.signature = signature;
		self
	}

	pub fn build(self) -> Arc<AnnouncementMethod> {
		Arc::new(self.method)
	}
}

/// One invocation's arguments bound against an [`AnnouncementMethod`].
#[derive(Debug)]
pub struct BoundAnnouncement {
	method: Arc<AnnouncementMethod>,
	arguments: BoundArguments,
	instrument_param: Option<Box<str>>,
}

impl BoundAnnouncement {
	pub fn method(&self) -> &AnnouncementMethod {
		&self.method
	}

	pub fn metadata(&self) -> &AnnouncementMetadata {
		self.method.metadata()
	}

	pub fn arguments(&self) -> &BoundArguments {
		&self.arguments
	}

	/// Name of the resolved instrument parameter, if the signature has one.
	pub fn instrument_param(&self) -> Option<&str> {
		self.instrument_param.as_deref()
	}

	/// Instrument bound to the instrument parameter. `None` when the slot is
	/// missing, unbound, or bound to [`ArgValue::Empty`](super::ArgValue::Empty).
	pub fn instrument(&self) -> Option<&Arc<dyn Instrument>> {
		let param = self.instrument_param.as_deref()?;
		self.arguments.get(param)?.instrument()
	}

	/// Runs the handler. Expects the call to have been validated.
	pub fn execute(&self, receiver: &dyn Any) -> Result<(), ProbeError> {
		let Some(instrument) = self.instrument() else {
			return Err(crate::validation::ValidatorError::MissingInstrument {
				method: self.method.qualified_name(),
			}
			.into());
		};
		(self.method.handler)(receiver, instrument.as_ref()).map_err(ProbeError::Announcement)
	}
}

#[cfg(test)]
mod tests;
