use std::cell::RefCell;

use pretty_assertions::assert_eq;

use super::*;

type Trail = RefCell<Vec<&'static str>>;

const TRAIL: LinkFamily = LinkFamily("trail");

#[derive(Debug, PartialEq)]
struct Record(&'static str);

impl ChainLink<Trail> for Record {
	fn validate(&self, trail: &Trail, next: Next<'_, Trail>) -> Result<(), ValidatorError> {
		trail.borrow_mut().push(self.0);
		next.validate(trail)
	}

	fn family(&self) -> LinkFamily {
		TRAIL
	}

	fn dyn_eq(&self, other: &dyn ChainLink<Trail>) -> bool {
		link_eq(self, other)
	}
}

#[derive(Debug, PartialEq)]
struct Reject;

impl ChainLink<Trail> for Reject {
	fn validate(&self, _trail: &Trail, _next: Next<'_, Trail>) -> Result<(), ValidatorError> {
		Err(ValidatorError::NoSupportedInstruments { method: "Reject".into() })
	}

	fn family(&self) -> LinkFamily {
		TRAIL
	}

	fn dyn_eq(&self, other: &dyn ChainLink<Trail>) -> bool {
		link_eq(self, other)
	}
}

#[derive(Debug, PartialEq)]
struct Foreign;

impl ChainLink<Trail> for Foreign {
	fn validate(&self, trail: &Trail, next: Next<'_, Trail>) -> Result<(), ValidatorError> {
		next.validate(trail)
	}

	fn family(&self) -> LinkFamily {
		LinkFamily("other")
	}

	fn dyn_eq(&self, other: &dyn ChainLink<Trail>) -> bool {
		link_eq(self, other)
	}
}

struct NoForbidden;

impl LinkValidator<Trail> for NoForbidden {
	fn validate(&self, _chain: ChainView<'_, Trail>, link: &dyn ChainLink<Trail>) -> Result<(), ChainError> {
		if link.dyn_eq(&Record("forbidden")) {
			return Err(ChainError::InvalidLink {
				link: link.link_name(),
				expected: "not forbidden",
			});
		}
		Ok(())
	}
}

fn boxed(link: impl ChainLink<Trail>) -> Box<dyn ChainLink<Trail>> {
	Box::new(link)
}

fn chain_of(names: &[&'static str]) -> ValidationChain<Trail> {
	let mut chain = ValidationChain::new(TRAIL);
	for &name in names {
		chain.append(Record(name)).unwrap();
	}
	chain
}

fn names(chain: &ValidationChain<Trail>) -> Vec<String> {
	chain.iter().map(|link| format!("{link:?}")).collect()
}

#[test]
fn test_links_run_in_index_order() {
	let chain = chain_of(&["a", "b", "c"]);
	let trail = Trail::default();
	chain.validate_chain(&trail).unwrap();
	assert_eq!(*trail.borrow(), ["a", "b", "c"]);
}

/// A failing link stops traversal; later links never see the subject.
#[test]
fn test_failure_stops_traversal() {
	let mut chain = chain_of(&["a"]);
	chain.append(Reject).unwrap();
	chain.append(Record("b")).unwrap();

	let trail = Trail::default();
	let err = chain.validate_chain(&trail).unwrap_err();
	assert_eq!(err, ValidatorError::NoSupportedInstruments { method: "Reject".into() });
	assert_eq!(*trail.borrow(), ["a"]);
}

#[test]
fn test_empty_chain_is_an_error() {
	let chain = ValidationChain::<Trail>::new(TRAIL);
	let err = chain.validate_chain(&Trail::default()).unwrap_err();
	assert_eq!(
		err.to_string(),
		"nothing to validate, no links added to chain 'ValidationChain(family=trail)'"
	);
	assert!(matches!(err, ValidatorError::Chain(ChainError::Empty { .. })));
}

#[test]
fn test_foreign_family_rejected() {
	let mut chain = ValidationChain::new(TRAIL);
	let err = chain.append(Foreign).unwrap_err();
	assert_eq!(
		err,
		ChainError::InvalidLink {
			link: "Foreign",
			expected: "trail"
		}
	);
	assert!(chain.is_empty());
}

#[test]
fn test_structural_duplicates_rejected() {
	let mut chain = chain_of(&["a"]);
	let err = chain.append(Record("a")).unwrap_err();
	assert_eq!(
		err.to_string(),
		"link 'Record(\"a\")' already exists in chain 'ValidationChain(family=trail)'"
	);
	chain.append(Record("b")).unwrap();
	assert_eq!(chain.len(), 2);
}

/// A batch with any bad link leaves the chain untouched, including a batch
/// that duplicates one of its own earlier entries.
#[test]
fn test_extend_is_atomic() {
	let mut chain = chain_of(&["a"]);

	assert!(chain.extend([boxed(Record("b")), boxed(Record("a"))]).is_err());
	assert_eq!(names(&chain), ["Record(\"a\")"]);

	assert!(chain.extend([boxed(Record("c")), boxed(Record("c"))]).is_err());
	assert_eq!(chain.len(), 1);

	chain.extend([boxed(Record("b")), boxed(Reject)]).unwrap();
	assert_eq!(chain.to_string(), "Record -> Record -> Reject");
}

#[test]
fn test_insert_positions_and_validates() {
	let mut chain = chain_of(&["b"]);
	chain.insert(0, Record("a")).unwrap();
	chain.insert(99, Record("c")).unwrap();
	assert!(chain.insert(1, Record("b")).is_err());

	let trail = Trail::default();
	chain.validate_chain(&trail).unwrap();
	assert_eq!(*trail.borrow(), ["a", "b", "c"]);
}

#[test]
fn test_set_excludes_replaced_slot_from_uniqueness() {
	let mut chain = chain_of(&["a", "b"]);

	let old = chain.set(0, Record("a")).unwrap();
	assert!(old.dyn_eq(&Record("a")));

	assert!(chain.set(0, Record("b")).is_err());
	assert_eq!(names(&chain), ["Record(\"a\")", "Record(\"b\")"]);

	assert!(chain.set(0, Foreign).is_err());
}

#[test]
fn test_set_out_of_range_keeps_chain() {
	let mut chain = chain_of(&["a"]);

	let err = chain.set(5, Record("z")).map(|_| ()).unwrap_err();
	assert_eq!(err, ChainError::IndexOutOfBounds { index: 5, len: 1 });
	assert_eq!(err.to_string(), "link index 5 out of range for chain of length 1");
	assert_eq!(names(&chain), ["Record(\"a\")"]);
}

#[test]
fn test_remove_clear_and_lookup() {
	let mut chain = chain_of(&["a", "b"]);
	assert!(chain.contains(&Record("b")));
	assert!(chain.get(0).is_some_and(|link| link.dyn_eq(&Record("a"))));

	let removed = chain.remove(0).unwrap();
	assert!(removed.dyn_eq(&Record("a")));
	assert!(chain.remove(3).is_none());
	assert!(!chain.contains(&Record("a")));

	chain.clear();
	assert!(chain.is_empty());
	assert!(chain.get(0).is_none());
}

#[test]
fn test_structural_equality() {
	assert_eq!(chain_of(&["a", "b"]), chain_of(&["a", "b"]));
	assert_ne!(chain_of(&["a", "b"]), chain_of(&["b", "a"]));
	assert_ne!(chain_of(&["a"]), chain_of(&["a", "b"]));
}

#[test]
fn test_display_joins_link_names() {
	let mut chain = chain_of(&["a"]);
	chain.append(Reject).unwrap();
	assert_eq!(chain.to_string(), "Record -> Reject");
	assert_eq!(ValidationChain::<Trail>::new(TRAIL).to_string(), "");
}

#[test]
fn test_extra_link_validator_keeps_defaults() {
	let mut context = LinkValidatorContext::new();
	context.add_validator(NoForbidden);
	assert_eq!(context.len(), 3);

	let mut chain = ValidationChain::with_link_validator(TRAIL, context);
	chain.append(Record("a")).unwrap();
	assert!(matches!(chain.append(Record("forbidden")), Err(ChainError::InvalidLink { .. })));
	assert!(matches!(chain.append(Record("a")), Err(ChainError::LinkExists { .. })));
	assert!(matches!(chain.append(Foreign), Err(ChainError::InvalidLink { expected: "trail", .. })));
}

#[test]
fn test_next_reports_remaining_links() {
	#[derive(Debug, PartialEq)]
	struct Peek;

	impl ChainLink<Trail> for Peek {
		fn validate(&self, trail: &Trail, next: Next<'_, Trail>) -> Result<(), ValidatorError> {
			if next.remaining() == 1 {
				trail.borrow_mut().push("one left");
			}
			next.validate(trail)
		}

		fn family(&self) -> LinkFamily {
			TRAIL
		}

		fn dyn_eq(&self, other: &dyn ChainLink<Trail>) -> bool {
			link_eq(self, other)
		}
	}

	let mut chain = ValidationChain::new(TRAIL);
	chain.append(Peek).unwrap();
	chain.append(Record("tail")).unwrap();

	let trail = Trail::default();
	chain.validate_chain(&trail).unwrap();
	assert_eq!(*trail.borrow(), ["one left", "tail"]);
}
