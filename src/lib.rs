//! formtree: a typed, path-addressed field accessor tree over a
//! form-state engine.
//!
//! Instead of spelling field names as dotted strings, callers walk a tree
//! of handles mirroring their form's data shape. Each handle registers its
//! field, watches and mutates its value, and hands out child handles one
//! path segment deeper. The engine behind the tree is pluggable via
//! [`engine::FormEngine`]; [`engine::MemoryEngine`] is the in-process
//! reference implementation.

pub use crate::errors::{FieldError, FormError};

pub mod engine;
pub mod errors;
pub mod fields;
pub mod form;
pub mod path;
pub mod schema;
pub mod value;

pub use crate::engine::{
    Controller, ControllerOptions, ElementKey, FieldState, FormEngine, MemoryEngine,
    RegisterOptions, Registration, StateSnapshot,
};
pub use crate::fields::{FieldArrayBinding, FieldHandle};
pub use crate::form::{Form, FormConfig};
pub use crate::path::{FieldPath, PathArg, WatchResult, WatchTarget};
pub use crate::schema::Shape;
pub use crate::value::Value;
