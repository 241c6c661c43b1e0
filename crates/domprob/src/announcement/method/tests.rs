use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;

use super::*;
use crate::announcement::{ArgValue, Param};
use crate::validation::ValidatorError;

#[derive(Debug)]
struct Logger;

#[derive(Debug)]
struct Metrics;

#[derive(Debug, Default)]
struct OrderPlaced {
	calls: AtomicUsize,
}

#[derive(Debug)]
struct Refunded;

fn count(order: &OrderPlaced, _instrument: &dyn Instrument) {
	order.calls.fetch_add(1, Ordering::SeqCst);
}

fn offline(_order: &OrderPlaced, _instrument: &dyn Instrument) -> anyhow::Result<()> {
	anyhow::bail!("sink offline")
}

fn log_method() -> Arc<AnnouncementMethod> {
	AnnouncementMethod::builder("log", count).announce::<Logger>(true).build()
}

#[test]
fn test_builder_records_requirements_in_order() {
	let method = AnnouncementMethod::builder("log", count)
		.announce::<Logger>(true)
		.announce::<Metrics>(false)
		.build();

	let kinds: Vec<_> = method.metadata().kinds().map(|k| k.name()).collect();
	assert_eq!(kinds, ["Logger", "Metrics"]);
	assert_eq!(method.qualified_name(), "OrderPlaced.log");
	assert_eq!(method.signature(), &Signature::announcement());
	assert_eq!(method.observation(), ObservationKey::of::<OrderPlaced>());
}

#[test]
fn test_call_runs_handler() {
	let order = OrderPlaced::default();
	log_method().call(&order, Args::new().arg(ArgValue::of(Logger))).unwrap();
	assert_eq!(order.calls.load(Ordering::SeqCst), 1);
}

/// A call with nothing bound to the instrument slot fails before the handler runs.
#[test]
fn test_call_without_instrument_fails_presence() {
	let order = OrderPlaced::default();
	let err = log_method().call(&order, Args::new()).unwrap_err();

	assert_eq!(
		err.as_validation(),
		Some(&ValidatorError::MissingInstrument {
			method: "OrderPlaced.log".into()
		})
	);
	assert_eq!(err.to_string(), "'instrument' param missing in OrderPlaced.log(...)");
	assert_eq!(order.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_call_with_empty_value_fails_presence() {
	let order = OrderPlaced::default();
	let err = log_method().call(&order, Args::new().arg(ArgValue::Empty)).unwrap_err();
	assert!(matches!(err.as_validation(), Some(ValidatorError::MissingInstrument { .. })));
}

#[test]
fn test_call_with_wrong_type_fails_type_check() {
	let order = OrderPlaced::default();
	let err = log_method().call(&order, Args::new().arg(ArgValue::of(Metrics))).unwrap_err();

	assert_eq!(
		err.to_string(),
		"OrderPlaced.log(...) expects 'instrument' param to be one of: [Logger], but got: Metrics"
	);
	assert_eq!(order.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_bind_rejects_foreign_receiver() {
	let err = log_method().bind(&Refunded, Args::new()).unwrap_err();
	assert_eq!(err.method, "OrderPlaced.log");
	assert_eq!(err.reason, BindFailure::Receiver { expected: "OrderPlaced" });
}

#[test]
fn test_bind_exposes_instrument_slot() {
	let order = OrderPlaced::default();
	let bound = log_method().bind(&order, Args::new().arg(ArgValue::of(Logger))).unwrap();

	assert_eq!(bound.instrument_param(), Some("instrument"));
	assert!(bound.instrument().is_some_and(|i| i.is::<Logger>()));
	assert_eq!(bound.method().name(), "log");
}

#[test]
fn test_function_signature_skips_receiver_check() {
	let method = AnnouncementMethod::builder("log", count)
		.announce::<Logger>(true)
		.signature(Signature::function([Param::new("sink")]))
		.build();

	let bound = method.bind(&Refunded, Args::new().arg(ArgValue::of(Logger))).unwrap();
	assert_eq!(bound.instrument_param(), Some("sink"));
	assert!(bound.instrument().is_some());
}

#[test]
fn test_handler_error_propagates() {
	let method = AnnouncementMethod::builder("log", offline).announce::<Logger>(true).build();
	let err = method
		.call(&OrderPlaced::default(), Args::new().arg(ArgValue::of(Logger)))
		.unwrap_err();

	assert!(matches!(err, ProbeError::Announcement(_)));
	assert_eq!(err.to_string(), "sink offline");
}

#[test]
fn test_execute_without_validation_still_guards_missing_instrument() {
	let order = OrderPlaced::default();
	let bound = log_method().bind(&order, Args::new()).unwrap();
	let err = bound.execute(&order).unwrap_err();
	assert!(matches!(err.as_validation(), Some(ValidatorError::MissingInstrument { .. })));
}
