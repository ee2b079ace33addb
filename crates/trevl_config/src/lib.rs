//! Display configuration engine for TREVL components.
//!
//! This crate holds the generic parts of building a component's display
//! document:
//!
//! * [`DocumentPath`] - dotted addresses into nested documents;
//! * [`insert`] - builds nested documents by path;
//! * [`merge`] - right-biased recursive merging;
//! * [`ComponentKind`], [`KindRegistry`] and [`ConfigurationComposer`] -
//!   resolution of default documents and keyword mappings across a single
//!   inheritance hierarchy of component kinds.
//!
//! Documents are plain [`serde_json::Value`]s; mappings keep their keys in
//! first-seen order.

pub mod composer;
pub mod errors;
pub mod inserter;
pub mod kind;
pub mod merger;
pub mod path;

pub use composer::{compose, ConfigurationComposer, ResolvedKind};
pub use errors::{ConfigError, ConfigResult};
pub use inserter::{insert, insert_into};
pub use kind::{ComponentKind, KindRegistry};
pub use merger::{merge, merge_all};
pub use path::{DocumentPath, PathSegment};

/// Document type handled by this crate.
pub type Document = serde_json::Value;
