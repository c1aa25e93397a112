//! The entry point: engine initialization plus the root field handle.

use std::ops::Deref;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::engine::{FormEngine, MemoryEngine};
use crate::fields::FieldHandle;
use crate::schema::Shape;
use crate::value::Value;

/// Configuration for a new form: the default value tree plus an opaque
/// validation context handed to the engine.
#[derive(Debug, Clone, Default)]
pub struct FormConfig {
    pub default_values: Value,
    pub context: Value,
}

impl FormConfig {
    pub fn new(default_values: impl Into<Value>) -> Self {
        Self {
            default_values: default_values.into(),
            context: Value::Nil,
        }
    }

    pub fn with_context(mut self, context: impl Into<Value>) -> Self {
        self.context = context.into();
        self
    }
}

/// A form: one engine instance plus the accessor tree derived from it.
///
/// The root handle is derived at most once per `Form`; a configuration
/// change means a new engine instance and therefore a new `Form`, which
/// starts with a fresh tree. Within one `Form`, `fields()` always returns
/// the reference-identical root, so handle identity is stable across
/// repeated access.
///
/// `Form` derefs to the engine, so the engine's full native surface
/// (submission, reset, value queries, imperative mutators) is available
/// alongside the tree.
///
/// # Examples
///
/// ```rust
/// use formtree::form::{Form, FormConfig};
/// use formtree::value::Value;
///
/// let form = Form::new(FormConfig::new(Value::from(serde_json::json!({
///     "user": { "name": "ada" }
/// }))));
/// let name = form.fields().child("user").child("name");
/// assert_eq!(name.to_string(), "user.name");
/// ```
pub struct Form<E: FormEngine> {
    engine: Rc<E>,
    shape: Rc<Shape>,
    root: OnceCell<Rc<FieldHandle<E>>>,
}

impl Form<MemoryEngine> {
    /// Initializes a fresh in-process engine from `config` and wraps it.
    pub fn new(config: FormConfig) -> Self {
        let shape = Shape::infer(&config.default_values);
        let engine = MemoryEngine::new(config.default_values, config.context);
        Self::with_engine(Rc::new(engine), shape)
    }
}

impl<E: FormEngine> Form<E> {
    /// Wraps an existing engine instance with a caller-supplied schema.
    pub fn with_engine(engine: Rc<E>, shape: Shape) -> Self {
        Self {
            engine,
            shape: Rc::new(shape),
            root: OnceCell::new(),
        }
    }

    /// The root field handle, derived once for this engine instance.
    pub fn fields(&self) -> Rc<FieldHandle<E>> {
        Rc::clone(self.root.get_or_init(|| {
            FieldHandle::new_root(Rc::clone(&self.engine), Rc::clone(&self.shape))
        }))
    }

    pub fn engine(&self) -> &Rc<E> {
        &self.engine
    }

    /// The schema the tree was built against.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl<E: FormEngine> Deref for Form<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.engine
    }
}
