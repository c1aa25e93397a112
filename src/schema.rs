//! Explicit shape descriptors for the form data tree.
//!
//! A `Shape` is the schema the accessor tree is built against: a tagged
//! tree classifying every location as a record, a sequence, or a scalar.
//! Shapes are normally inferred from the form's default values, but can be
//! supplied by the caller when the defaults do not cover every field.

use im::HashMap;

use crate::path::FieldPath;
use crate::value::Value;

/// The shape of a location in the form data.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A leaf field: string, number, bool, or nil.
    Scalar,
    /// A record with named child fields.
    Record(HashMap<String, Shape>),
    /// A homogeneous sequence; all elements share one shape.
    Sequence(Box<Shape>),
}

impl Shape {
    /// Infers a shape from a value tree, typically the form's defaults.
    ///
    /// Sequence element shapes are taken from the first element; an empty
    /// sequence infers scalar elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use formtree::schema::Shape;
    /// use formtree::value::Value;
    /// let defaults = Value::from(serde_json::json!({ "a": { "b": "x" } }));
    /// let shape = Shape::infer(&defaults);
    /// assert!(shape.field_names().contains(&"a".to_string()));
    /// ```
    pub fn infer(value: &Value) -> Shape {
        match value {
            Value::Map(map) => Shape::Record(
                map.iter()
                    .map(|(name, child)| (name.clone(), Shape::infer(child)))
                    .collect(),
            ),
            Value::List(items) => {
                let element = items.first().map(Shape::infer).unwrap_or(Shape::Scalar);
                Shape::Sequence(Box::new(element))
            }
            _ => Shape::Scalar,
        }
    }

    /// Looks up the shape at a path, if the schema covers it.
    pub fn at(&self, path: &FieldPath) -> Option<&Shape> {
        let mut current = self;
        for segment in path.segments() {
            current = match current {
                Shape::Record(fields) => fields.get(segment)?,
                // Any numeric segment descends into the element shape.
                Shape::Sequence(element) if segment.parse::<usize>().is_ok() => &**element,
                _ => return None,
            };
        }
        Some(current)
    }

    /// The named child fields of a record shape, sorted for determinism.
    pub fn field_names(&self) -> Vec<String> {
        match self {
            Shape::Record(fields) => {
                let mut names: Vec<String> = fields.keys().cloned().collect();
                names.sort();
                names
            }
            _ => Vec::new(),
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Shape::Sequence(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Shape::Record(_))
    }
}
