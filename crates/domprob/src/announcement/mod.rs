//! Announcement methods and the metadata they carry.
//!
//! An announcement method reports an observation to one instrument. Each
//! method records which instrument kinds it supports, in declaration order,
//! and whether each one is required at dispatch time.

pub mod binder;
pub mod metadata;
pub mod method;

pub use binder::{
	ArgValue, Args, BindError, BindFailure, BoundArguments, INSTRUMENT_PARAM, Param, ParamKind, Signature, bind_partial,
};
pub use metadata::{AnnouncementMetadata, Entries, Requirement};
pub use method::{
	AnnouncementBuilder, AnnouncementMethod, BoundAnnouncement, ErasedHandler, IntoOutcome, ObservationKey,
};
