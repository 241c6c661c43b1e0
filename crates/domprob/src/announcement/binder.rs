//! Partial binding of call-site arguments against a declared signature.
//!
//! Signatures are declared up front rather than discovered by reflection. The
//! binder's job is to find which parameter is the instrument slot and to
//! reconcile positional and keyword arguments with the declared parameters,
//! applying defaults for anything omitted.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::metadata::AnnouncementMetadata;
use crate::instrument::{Instrument, InstrumentKind};

/// Parameter name that always wins instrument slot resolution.
pub const INSTRUMENT_PARAM: &str = "instrument";

/// How a parameter may be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamKind {
	/// By position or by name.
	#[default]
	PositionalOrKeyword,
	/// By name only.
	KeywordOnly,
}

/// One declared parameter, excluding the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
	name: Cow<'static, str>,
	annotation: Option<InstrumentKind>,
	default: bool,
	kind: ParamKind,
}

impl Param {
	pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
		Self {
			name: name.into(),
			annotation: None,
			default: false,
			kind: ParamKind::PositionalOrKeyword,
		}
	}

	/// Declares the parameter's instrument type.
	pub fn annotated(mut self, kind: InstrumentKind) -> Self {
		self.annotation = Some(kind);
		self
	}

	/// Gives the parameter an empty default, so omitting it still binds.
	pub fn with_default(mut self) -> Self {
		self.default = true;
		self
	}

	pub fn keyword_only(mut self) -> Self {
		self.kind = ParamKind::KeywordOnly;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn annotation(&self) -> Option<&InstrumentKind> {
		self.annotation.as_ref()
	}

	pub fn has_default(&self) -> bool {
		self.default
	}

	pub fn kind(&self) -> ParamKind {
		self.kind
	}
}

/// Statically declared parameter list of an announcement handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
	receiver: bool,
	params: Vec<Param>,
}

impl Signature {
	/// Signature with an implicit receiver followed by `params`.
	pub fn method(params: impl IntoIterator<Item = Param>) -> Self {
		Self {
			receiver: true,
			params: params.into_iter().collect(),
		}
	}

	/// Signature with no receiver.
	pub fn function(params: impl IntoIterator<Item = Param>) -> Self {
		Self {
			receiver: false,
			params: params.into_iter().collect(),
		}
	}

	/// Canonical announcement shape: receiver, then the instrument.
	pub fn announcement() -> Self {
		Self::method([Param::new(INSTRUMENT_PARAM)])
	}

	pub fn has_receiver(&self) -> bool {
		self.receiver
	}

	pub fn params(&self) -> &[Param] {
		&self.params
	}

	fn param(&self, name: &str) -> Option<&Param> {
		self.params.iter().find(|p| p.name() == name)
	}

	/// Locates the instrument parameter.
	///
	/// First match wins: a parameter named `instrument`, then a parameter
	/// annotated with one of the recorded kinds, then the first positional
	/// parameter. Returns `None` when the signature has no parameters.
	pub fn instrument_param(&self, metadata: &AnnouncementMetadata) -> Option<&Param> {
		self.param(INSTRUMENT_PARAM)
			.or_else(|| {
				self.params.iter().find(|p| {
					p.annotation().is_some_and(|ann| metadata.kinds().any(|k| k == *ann))
				})
			})
			.or_else(|| self.params.iter().find(|p| p.kind() == ParamKind::PositionalOrKeyword))
	}
}

impl Default for Signature {
	fn default() -> Self {
		Self::announcement()
	}
}

/// A value supplied for, or defaulted into, a parameter.
#[derive(Clone)]
pub enum ArgValue {
	Instrument(Arc<dyn Instrument>),
	/// Explicitly empty; also the value every default binds to.
	Empty,
}

impl ArgValue {
	/// Wraps a concrete implementation.
	pub fn of<T: Instrument>(instrument: T) -> Self {
		Self::Instrument(Arc::new(instrument))
	}

	pub fn instrument(&self) -> Option<&Arc<dyn Instrument>> {
		match self {
			Self::Instrument(instrument) => Some(instrument),
			Self::Empty => None,
		}
	}
}

impl fmt::Debug for ArgValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Instrument(instrument) => write!(f, "{instrument:?}"),
			Self::Empty => f.write_str("Empty"),
		}
	}
}

impl From<Arc<dyn Instrument>> for ArgValue {
	fn from(instrument: Arc<dyn Instrument>) -> Self {
		Self::Instrument(instrument)
	}
}

impl From<Option<Arc<dyn Instrument>>> for ArgValue {
	fn from(instrument: Option<Arc<dyn Instrument>>) -> Self {
		instrument.map_or(Self::Empty, Self::Instrument)
	}
}

/// Call-site arguments, excluding the receiver.
#[derive(Debug, Clone, Default)]
pub struct Args {
	positional: Vec<ArgValue>,
	keyword: Vec<(Cow<'static, str>, ArgValue)>,
}

impl Args {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn positional<I, V>(values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<ArgValue>,
	{
		Self {
			positional: values.into_iter().map(Into::into).collect(),
			keyword: Vec::new(),
		}
	}

	pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
		self.positional.push(value.into());
		self
	}

	pub fn kwarg(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<ArgValue>) -> Self {
		self.keyword.push((name.into(), value.into()));
		self
	}
}

/// Arguments after binding, in signature order.
#[derive(Debug, Clone, Default)]
pub struct BoundArguments {
	values: IndexMap<Cow<'static, str>, ArgValue>,
}

impl BoundArguments {
	pub fn get(&self, name: &str) -> Option<&ArgValue> {
		self.values.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
		self.values.iter().map(|(k, v)| (k.as_ref(), v))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// Why arguments could not be reconciled with a signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindFailure {
	#[error("receiver is not a `{expected}`")]
	Receiver { expected: &'static str },
	#[error("takes {max} positional arguments but {got} were given")]
	TooManyPositional { max: usize, got: usize },
	#[error("got an unexpected keyword argument '{0}'")]
	UnexpectedKeyword(Box<str>),
	#[error("got multiple values for argument '{0}'")]
	MultipleValues(Box<str>),
}

/// Binding failed for a named callable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to bind parameters to {method}: {reason}")]
pub struct BindError {
	pub method: String,
	#[source]
	pub reason: BindFailure,
}

/// Binds `args` against `signature`.
///
/// Positional values fill positional parameters in order, keywords fill by
/// name, and omitted parameters with a default bind to [`ArgValue::Empty`].
/// Omitted parameters without a default stay unbound.
pub fn bind_partial(signature: &Signature, args: Args) -> Result<BoundArguments, BindFailure> {
	let positional_params: Vec<&Param> = signature
		.params
		.iter()
		.filter(|p| p.kind() == ParamKind::PositionalOrKeyword)
		.collect();

	if args.positional.len() > positional_params.len() {
		return Err(BindFailure::TooManyPositional {
			max: positional_params.len(),
			got: args.positional.len(),
		});
	}

	let mut supplied: IndexMap<Cow<'static, str>, ArgValue> = positional_params
		.iter()
		.zip(args.positional)
		.map(|(param, value)| (param.name.clone(), value))
		.collect();

	for (name, value) in args.keyword {
		let Some(param) = signature.param(&name) else {
			return Err(BindFailure::UnexpectedKeyword(name.into()));
		};
		if supplied.contains_key(param.name()) {
			return Err(BindFailure::MultipleValues(name.into()));
		}
		supplied.insert(param.name.clone(), value);
	}

	let mut values = IndexMap::with_capacity(signature.params.len());
	for param in &signature.params {
		if let Some(value) = supplied.shift_remove(param.name()) {
			values.insert(param.name.clone(), value);
		} else if param.has_default() {
			values.insert(param.name.clone(), ArgValue::Empty);
		}
	}

	Ok(BoundArguments { values })
}
