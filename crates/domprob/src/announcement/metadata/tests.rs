use proptest::prelude::*;

use super::*;

#[derive(Debug)]
struct Logger;

#[derive(Debug)]
struct Metrics;

#[derive(Debug)]
struct Tracer;

fn kind_for(index: u8) -> InstrumentKind {
	match index % 3 {
		0 => InstrumentKind::of::<Logger>(),
		1 => InstrumentKind::of::<Metrics>(),
		_ => InstrumentKind::of::<Tracer>(),
	}
}

#[test]
fn test_record_is_chainable_and_ordered() {
	let mut meta = AnnouncementMetadata::new();
	meta.record(InstrumentKind::of::<Logger>(), true)
		.record(InstrumentKind::of::<Metrics>(), false);

	let kinds: Vec<_> = meta.kinds().map(|k| k.name()).collect();
	assert_eq!(kinds, ["Logger", "Metrics"]);
	assert_eq!(meta.len(), 2);
}

#[test]
fn test_requirements_filtering() {
	let mut meta = AnnouncementMetadata::new();
	meta.record(InstrumentKind::of::<Logger>(), true)
		.record(InstrumentKind::of::<Metrics>(), false)
		.record(InstrumentKind::of::<Tracer>(), true);

	let names = |entries: Entries<'_>| entries.map(|r| r.kind.name()).collect::<Vec<_>>();
	assert_eq!(names(meta.requirements(Some(true))), ["Logger", "Tracer"]);
	assert_eq!(names(meta.requirements(Some(false))), ["Metrics"]);
	assert_eq!(names(meta.requirements(None)), ["Logger", "Metrics", "Tracer"]);
}

#[test]
fn test_entries_is_restartable() {
	let mut meta = AnnouncementMetadata::new();
	meta.record(InstrumentKind::of::<Logger>(), true)
		.record(InstrumentKind::of::<Metrics>(), false);

	let mut entries = meta.entries();
	let restart = entries.clone();
	assert_eq!(entries.next().map(|r| r.kind.name()), Some("Logger"));
	assert_eq!(restart.count(), 2);
	assert_eq!(entries.count(), 1);
}

#[test]
fn test_is_required_considers_any_entry() {
	let mut meta = AnnouncementMetadata::new();
	meta.record(InstrumentKind::of::<Logger>(), false)
		.record(InstrumentKind::of::<Logger>(), true);

	assert!(meta.is_required(&InstrumentKind::of::<Logger>()));
	assert!(!meta.is_required(&InstrumentKind::of::<Metrics>()));
}

#[test]
fn test_empty_metadata() {
	let meta = AnnouncementMetadata::default();
	assert!(meta.is_empty());
	assert_eq!(meta.entries().count(), 0);
}

proptest! {
	#[test]
	fn prop_entries_preserve_declaration_order(decls in prop::collection::vec((any::<u8>(), any::<bool>()), 0..32)) {
		let mut meta = AnnouncementMetadata::new();
		for &(kind, required) in &decls {
			meta.record(kind_for(kind), required);
		}

		let expected: Vec<_> = decls.iter().map(|&(k, r)| Requirement::new(kind_for(k), r)).collect();
		let actual: Vec<_> = meta.entries().copied().collect();
		prop_assert_eq!(actual.len(), decls.len());
		prop_assert_eq!(actual, expected);
	}
}
