//! The form-state engine contract and its descriptor types.
//!
//! The accessor tree consumes the engine strictly through the [`FormEngine`]
//! trait: field registration, value reads and writes, error and focus
//! mutation, watch reads, field-array element listing and mutation,
//! controller bindings, and a full-form state snapshot. Anything the engine
//! does beyond these primitives (submission, reset, validation context) is
//! native engine surface and reaches the caller unmodified through the
//! entry point.
//!
//! Engine Invariant: the engine instance is the single shared mutable
//! resource. Handles hold it behind `Rc` and never copy engine state; every
//! operation reads or mutates through the one instance.

pub mod memory;

pub use memory::MemoryEngine;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::errors::FieldError;
use crate::path::{FieldPath, WatchResult, WatchTarget};
use crate::value::Value;

/// Validation rules attached to a field at registration time.
///
/// Rules are checked at submission time in declaration order; the first
/// failing rule produces the field's error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegisterOptions {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
}

impl RegisterOptions {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn with_min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn with_max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// The descriptor returned by field registration.
///
/// Opaque to the accessor layer: produced by the engine, handed back to the
/// caller unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub name: String,
    pub rules: RegisterOptions,
}

/// Opaque per-element identity for field-array elements.
///
/// Keys follow the element across insertions, removals, and moves; they are
/// what list-rendering identity hangs on, independent of position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(pub(crate) u64);

impl std::fmt::Display for ElementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "k{}", self.0)
    }
}

/// Options for a controller binding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerOptions {
    pub rules: RegisterOptions,
    /// Applied once if the field currently has no value.
    pub default_value: Option<Value>,
}

/// A controller binding: the field's identity plus a snapshot of its state.
#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    pub name: String,
    pub value: Value,
    pub is_dirty: bool,
    pub error: Option<FieldError>,
}

/// A full-form state snapshot: every field error and every dirty field,
/// keyed by dotted path.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct StateSnapshot {
    pub errors: BTreeMap<String, FieldError>,
    pub dirty_fields: BTreeSet<String>,
}

impl StateSnapshot {
    /// Restricts the snapshot to a single field.
    pub fn field(&self, dotted: &str) -> FieldState {
        FieldState {
            error: self.errors.get(dotted).cloned(),
            is_dirty: self.dirty_fields.contains(dotted),
        }
    }
}

/// The error and dirty-flag entries for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct FieldState {
    pub error: Option<FieldError>,
    pub is_dirty: bool,
}

/// The primitives the accessor tree consumes from a form-state engine.
///
/// All operations are synchronous from this layer's perspective; reactive
/// re-invocation is the host framework's concern. Implementations use
/// interior mutability — the engine is single-threaded and shared behind
/// `Rc` by every handle in a tree.
pub trait FormEngine {
    /// Registers the field at `path`, attaching its validation rules.
    fn register(&self, path: &FieldPath, options: RegisterOptions) -> Registration;

    /// Synchronously reads the current value at `path` (Nil if unset).
    fn get_value(&self, path: &FieldPath) -> Value;

    /// Writes the value at `path`, updating the field's dirty flag.
    fn set_value(&self, path: &FieldPath, value: Value);

    /// Attaches an error to the field at `path`.
    fn set_error(&self, path: &FieldPath, error: FieldError);

    /// Marks the field at `path` as focused.
    fn set_focus(&self, path: &FieldPath);

    /// Reads the current value(s) for a composed watch target.
    fn watch(&self, target: &WatchTarget) -> WatchResult;

    /// Registers `path` (with `options.rules`) and returns its binding.
    fn controller(&self, path: &FieldPath, options: ControllerOptions) -> Controller;

    /// Snapshots all field errors and dirty flags.
    fn state(&self) -> StateSnapshot;

    /// Lists the elements of the sequence at `path` with their stable keys.
    fn array_elements(&self, path: &FieldPath) -> Vec<(ElementKey, Value)>;

    fn array_append(&self, path: &FieldPath, value: Value);

    fn array_insert(&self, path: &FieldPath, index: usize, value: Value);

    fn array_remove(&self, path: &FieldPath, index: usize);

    fn array_swap(&self, path: &FieldPath, a: usize, b: usize);

    /// Moves the element at `from` to position `to`, shifting the rest.
    fn array_move(&self, path: &FieldPath, from: usize, to: usize);
}
