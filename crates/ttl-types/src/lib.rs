//! Host type system for transformation evaluation.
//!
//! This crate defines the type language the evaluator computes over: the
//! [`Type`] model, a [`TypeRegistry`] of named types, a lexical [`Scope`] of
//! program slots, and the narrow [`TypeHost`] capability trait the evaluator
//! consumes, together with [`StandardHost`] implementing it over a registry
//! and a scope.

mod host;
mod registry;
mod scope;
mod ty;

pub use host::{StandardHost, TypeHost};
pub use registry::TypeRegistry;
pub use scope::{Scope, Slot, SlotBinding};
pub use ty::{equivalent, subtype, Primitive, RecordTypeBuilder, Type};
