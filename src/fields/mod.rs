//! The field accessor tree.
//!
//! A [`FieldHandle`] is a path-bound view over one engine instance: it can
//! be registered as a field (except at the root), it exposes the helper
//! operations bound to its dotted path, and any child access yields a
//! handle one segment deeper. Handles own no form state; they are lazily
//! materialized and cached per parent so repeated access returns the
//! reference-identical handle. That identity stability is what host-side
//! re-render diffing hangs on.
//!
//! Cache Invariant: the child cache is private to each handle and lives
//! exactly as long as its tree. A rebuilt tree (new engine instance) starts
//! with empty caches; nothing is shared across trees.

pub mod array;

pub use array::FieldArrayBinding;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::engine::{
    Controller, ControllerOptions, ElementKey, FieldState, FormEngine, RegisterOptions,
    Registration,
};
use crate::errors::{FieldError, FormError};
use crate::path::{FieldPath, PathArg, WatchResult, WatchTarget};
use crate::schema::Shape;
use crate::value::Value;

/// A callable, path-bound accessor for one location in the form data.
pub struct FieldHandle<E: FormEngine> {
    engine: Rc<E>,
    path: FieldPath,
    element_key: Option<ElementKey>,
    root_shape: Rc<Shape>,
    children: RefCell<HashMap<String, Rc<FieldHandle<E>>>>,
}

impl<E: FormEngine> FieldHandle<E> {
    pub(crate) fn new_root(engine: Rc<E>, root_shape: Rc<Shape>) -> Rc<Self> {
        Self::materialize(engine, root_shape, FieldPath::root(), None)
    }

    pub(crate) fn materialize(
        engine: Rc<E>,
        root_shape: Rc<Shape>,
        path: FieldPath,
        element_key: Option<ElementKey>,
    ) -> Rc<Self> {
        Rc::new(Self {
            engine,
            path,
            element_key,
            root_shape,
            children: RefCell::new(HashMap::new()),
        })
    }

    /// The dotted path this handle is bound to (the engine's field name).
    pub fn name(&self) -> String {
        self.path.dotted()
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// List-rendering identity: the stable element key when this handle
    /// came from a field-array binding, otherwise the dotted path.
    pub fn key(&self) -> String {
        match self.element_key {
            Some(key) => key.to_string(),
            None => self.path.dotted(),
        }
    }

    /// The shape at this handle's path, if the schema covers it.
    pub fn shape(&self) -> Option<&Shape> {
        self.root_shape.at(&self.path)
    }

    /// The callable behavior: registers this handle's field with the
    /// engine, passing validation rules through unchanged.
    ///
    /// Registering the root is a usage error; the root identifies the
    /// whole form, not a field.
    pub fn register(&self, options: RegisterOptions) -> Result<Registration, FormError> {
        if self.path.is_root() {
            return Err(FormError::RootRegistration);
        }
        Ok(self.engine.register(&self.path, options))
    }

    /// The child handle one segment deeper. Cached: accessing the same
    /// key twice returns the reference-identical handle.
    pub fn child(&self, segment: &str) -> Rc<FieldHandle<E>> {
        if let Some(existing) = self.children.borrow().get(segment) {
            return Rc::clone(existing);
        }
        let handle = Self::materialize(
            Rc::clone(&self.engine),
            Rc::clone(&self.root_shape),
            self.path.child(segment),
            None,
        );
        self.children
            .borrow_mut()
            .insert(segment.to_string(), Rc::clone(&handle));
        handle
    }

    /// The child handle for a sequence element by position. Positional
    /// access carries no stable key; use [`FieldHandle::field_array`] when
    /// identity across mutations matters.
    pub fn at(&self, index: usize) -> Rc<FieldHandle<E>> {
        self.child(&index.to_string())
    }

    /// Eagerly materializes the named children the schema knows about.
    pub fn children(&self) -> Vec<Rc<FieldHandle<E>>> {
        self.shape()
            .map(Shape::field_names)
            .unwrap_or_default()
            .iter()
            .map(|name| self.child(name))
            .collect()
    }

    /// Binds the sequence at this path: one keyed element handle per
    /// current element, plus the engine's mutation operations.
    pub fn field_array(&self) -> FieldArrayBinding<E> {
        FieldArrayBinding::bind(
            Rc::clone(&self.engine),
            Rc::clone(&self.root_shape),
            self.path.clone(),
        )
    }

    /// Binds the engine's controller primitive to this path.
    pub fn controller(&self, options: ControllerOptions) -> Controller {
        self.engine.controller(&self.path, options)
    }

    /// Reads the current value(s) under this handle.
    ///
    /// With no relative path this reads the handle's own subtree (the
    /// whole form at the root). A single segment or a segment list is
    /// composed onto the handle's own path first.
    pub fn watch(&self, relative: Option<PathArg>) -> WatchResult {
        self.engine
            .watch(&WatchTarget::compose(&self.path, relative))
    }

    /// The error and dirty-flag entries for exactly this field, extracted
    /// from the engine's full state snapshot.
    pub fn state(&self) -> FieldState {
        self.engine.state().field(&self.path.dotted())
    }

    pub fn set_value(&self, value: impl Into<Value>) {
        self.engine.set_value(&self.path, value.into());
    }

    pub fn set_error(&self, error: FieldError) {
        self.engine.set_error(&self.path, error);
    }

    pub fn set_focus(&self) {
        self.engine.set_focus(&self.path);
    }

    /// Discriminated narrowing: reads the live value at `<own>.<field>`
    /// and pairs it with this same handle, unchanged.
    ///
    /// No runtime check ties the read discriminant to the shape the caller
    /// assumes afterwards; the caller is trusted to consult the value
    /// before descending.
    pub fn discriminate(&self, field: &str) -> (Value, &Self) {
        let value = self.engine.get_value(&self.path.child(field));
        (value, self)
    }
}

impl<E: FormEngine> fmt::Display for FieldHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl<E: FormEngine> fmt::Debug for FieldHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandle")
            .field("path", &self.path.dotted())
            .field("element_key", &self.element_key)
            .finish()
    }
}
