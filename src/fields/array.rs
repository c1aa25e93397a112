//! Field-array bindings: keyed element handles plus list mutations.

use std::rc::Rc;

use crate::engine::FormEngine;
use crate::fields::FieldHandle;
use crate::path::FieldPath;
use crate::schema::Shape;
use crate::value::Value;

/// A snapshot binding of the sequence at one path.
///
/// Each element handle is bound to `<path>.<index>` and carries the
/// engine's stable key for that element, so list-rendering identity
/// survives insertions, removals, and moves. The binding itself is a
/// snapshot: mutations go through the engine, and the next binding
/// reflects them.
pub struct FieldArrayBinding<E: FormEngine> {
    engine: Rc<E>,
    path: FieldPath,
    elements: Vec<Rc<FieldHandle<E>>>,
}

impl<E: FormEngine> FieldArrayBinding<E> {
    pub(crate) fn bind(engine: Rc<E>, root_shape: Rc<Shape>, path: FieldPath) -> Self {
        let elements = engine
            .array_elements(&path)
            .into_iter()
            .enumerate()
            .map(|(index, (key, _value))| {
                FieldHandle::materialize(
                    Rc::clone(&engine),
                    Rc::clone(&root_shape),
                    path.index(index),
                    Some(key),
                )
            })
            .collect();
        Self {
            engine,
            path,
            elements,
        }
    }

    /// One keyed handle per current element, in order.
    pub fn elements(&self) -> &[Rc<FieldHandle<E>>] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<FieldHandle<E>>> {
        self.elements.iter()
    }

    pub fn append(&self, value: impl Into<Value>) {
        self.engine.array_append(&self.path, value.into());
    }

    pub fn insert(&self, index: usize, value: impl Into<Value>) {
        self.engine.array_insert(&self.path, index, value.into());
    }

    pub fn remove(&self, index: usize) {
        self.engine.array_remove(&self.path, index);
    }

    pub fn swap(&self, a: usize, b: usize) {
        self.engine.array_swap(&self.path, a, b);
    }

    /// Moves the element at `from` to position `to`.
    pub fn move_to(&self, from: usize, to: usize) {
        self.engine.array_move(&self.path, from, to);
    }
}
