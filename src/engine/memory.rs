//! The in-process reference engine.
//!
//! `MemoryEngine` keeps the whole form in a persistent value tree and
//! implements the [`FormEngine`](crate::engine::FormEngine) contract with
//! interior mutability: registration, structural-sharing value updates,
//! submission-time validation, error and dirty tracking, and stable
//! element keys for field arrays.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap as StdHashMap};

use im::HashMap;
use regex::Regex;

use crate::engine::{
    Controller, ControllerOptions, ElementKey, FormEngine, RegisterOptions, Registration,
    StateSnapshot,
};
use crate::errors::FieldError;
use crate::path::{FieldPath, WatchResult, WatchTarget};
use crate::value::Value;

// ============================================================================
// ENGINE STATE: everything behind the RefCell
// ============================================================================

#[derive(Debug, Default)]
struct EngineState {
    values: Value,
    registered: BTreeMap<String, RegisteredField>,
    errors: BTreeMap<String, FieldError>,
    touched: BTreeSet<String>,
    focused: Option<String>,
    array_keys: StdHashMap<String, Vec<ElementKey>>,
    next_key: u64,
}

/// A registered field with its pattern compiled once, at registration.
/// A malformed pattern is kept as its compile error so validation can
/// surface it instead of silently passing the field.
#[derive(Debug)]
struct RegisteredField {
    rules: RegisterOptions,
    pattern: Option<Result<Regex, regex::Error>>,
}

impl RegisteredField {
    fn compile(rules: RegisterOptions) -> Self {
        let pattern = rules.pattern.as_deref().map(Regex::new);
        Self { rules, pattern }
    }
}

impl EngineState {
    fn fresh_key(&mut self) -> ElementKey {
        let key = ElementKey(self.next_key);
        self.next_key += 1;
        key
    }

    /// Brings the key list for a sequence in sync with its current length.
    /// Existing keys are preserved; growth mints new keys, shrinkage drops
    /// trailing ones.
    fn sync_keys(&mut self, dotted: &str, len: usize) {
        let mut keys = self.array_keys.remove(dotted).unwrap_or_default();
        while keys.len() < len {
            let key = self.fresh_key();
            keys.push(key);
        }
        keys.truncate(len);
        self.array_keys.insert(dotted.to_string(), keys);
    }
}

// ============================================================================
// MEMORY ENGINE
// ============================================================================

/// A single-threaded, in-process form-state engine.
///
/// Values live in an immutable tree; every write produces a new tree that
/// shares structure with the previous one. Dirty state is derived by
/// comparing touched fields against the defaults the engine was created
/// with.
#[derive(Debug)]
pub struct MemoryEngine {
    defaults: Value,
    context: Value,
    inner: RefCell<EngineState>,
}

impl MemoryEngine {
    pub fn new(defaults: Value, context: Value) -> Self {
        let inner = EngineState {
            values: defaults.clone(),
            ..EngineState::default()
        };
        Self {
            defaults,
            context,
            inner: RefCell::new(inner),
        }
    }

    /// The validation context supplied at initialization.
    pub fn context(&self) -> &Value {
        &self.context
    }

    /// The default value tree supplied at initialization.
    pub fn defaults(&self) -> &Value {
        &self.defaults
    }

    /// The current value tree.
    pub fn get_values(&self) -> Value {
        self.inner.borrow().values.clone()
    }

    /// The dotted path of the field focus was last sent to, if any.
    pub fn focused(&self) -> Option<String> {
        self.inner.borrow().focused.clone()
    }

    /// Validates every registered field and stores the resulting errors.
    /// Returns true when the form is valid.
    pub fn trigger(&self) -> bool {
        let errors = self.run_validation();
        let ok = errors.is_empty();
        self.inner.borrow_mut().errors = errors;
        ok
    }

    /// Submission: validate all registered fields, then either hand back
    /// the committed value tree or the per-field errors.
    pub fn handle_submit(&self) -> Result<Value, BTreeMap<String, FieldError>> {
        let errors = self.run_validation();
        let mut inner = self.inner.borrow_mut();
        inner.errors = errors.clone();
        if errors.is_empty() {
            Ok(inner.values.clone())
        } else {
            Err(errors)
        }
    }

    /// Restores defaults and clears errors, dirty state, focus, and
    /// element keys. Registered rules survive a reset.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.values = self.defaults.clone();
        inner.errors.clear();
        inner.touched.clear();
        inner.focused = None;
        inner.array_keys.clear();
    }

    fn run_validation(&self) -> BTreeMap<String, FieldError> {
        let inner = self.inner.borrow();
        let mut errors = BTreeMap::new();
        for (dotted, field) in &inner.registered {
            let path = FieldPath::from(dotted.as_str());
            let value = get_at(&inner.values, path.segments())
                .cloned()
                .unwrap_or(Value::Nil);
            if let Some(error) = check_rules(field, &value) {
                errors.insert(dotted.clone(), error);
            }
        }
        errors
    }
}

impl FormEngine for MemoryEngine {
    fn register(&self, path: &FieldPath, options: RegisterOptions) -> Registration {
        let name = path.dotted();
        self.inner
            .borrow_mut()
            .registered
            .insert(name.clone(), RegisteredField::compile(options.clone()));
        Registration {
            name,
            rules: options,
        }
    }

    fn get_value(&self, path: &FieldPath) -> Value {
        let inner = self.inner.borrow();
        get_at(&inner.values, path.segments())
            .cloned()
            .unwrap_or(Value::Nil)
    }

    fn set_value(&self, path: &FieldPath, value: Value) {
        let mut inner = self.inner.borrow_mut();
        let next = set_recursive(&inner.values, path.segments(), value);
        inner.values = next;
        inner.touched.insert(path.dotted());
    }

    fn set_error(&self, path: &FieldPath, error: FieldError) {
        self.inner.borrow_mut().errors.insert(path.dotted(), error);
    }

    fn set_focus(&self, path: &FieldPath) {
        self.inner.borrow_mut().focused = Some(path.dotted());
    }

    fn watch(&self, target: &WatchTarget) -> WatchResult {
        let inner = self.inner.borrow();
        match target {
            WatchTarget::All => WatchResult::One(inner.values.clone()),
            WatchTarget::One(dotted) => {
                let path = FieldPath::from(dotted.as_str());
                WatchResult::One(
                    get_at(&inner.values, path.segments())
                        .cloned()
                        .unwrap_or(Value::Nil),
                )
            }
            WatchTarget::Many(dotteds) => WatchResult::Many(
                dotteds
                    .iter()
                    .map(|dotted| {
                        let path = FieldPath::from(dotted.as_str());
                        get_at(&inner.values, path.segments())
                            .cloned()
                            .unwrap_or(Value::Nil)
                    })
                    .collect(),
            ),
        }
    }

    fn controller(&self, path: &FieldPath, options: ControllerOptions) -> Controller {
        let name = path.dotted();
        {
            let mut inner = self.inner.borrow_mut();
            inner
                .registered
                .insert(name.clone(), RegisteredField::compile(options.rules));
            if let Some(default_value) = options.default_value {
                let unset = match get_at(&inner.values, path.segments()) {
                    None => true,
                    Some(current) => current.is_nil(),
                };
                if unset {
                    let next = set_recursive(&inner.values, path.segments(), default_value);
                    inner.values = next;
                }
            }
        }
        let snapshot = self.state();
        let field = snapshot.field(&name);
        Controller {
            value: self.get_value(path),
            is_dirty: field.is_dirty,
            error: field.error,
            name,
        }
    }

    fn state(&self) -> StateSnapshot {
        let inner = self.inner.borrow();
        let dirty_fields = inner
            .touched
            .iter()
            .filter(|dotted| {
                let path = FieldPath::from(dotted.as_str());
                let current = get_at(&inner.values, path.segments());
                let original = get_at(&self.defaults, path.segments());
                current != original
            })
            .cloned()
            .collect();
        StateSnapshot {
            errors: inner.errors.clone(),
            dirty_fields,
        }
    }

    fn array_elements(&self, path: &FieldPath) -> Vec<(ElementKey, Value)> {
        let dotted = path.dotted();
        let mut inner = self.inner.borrow_mut();
        let items = match get_at(&inner.values, path.segments()) {
            Some(Value::List(items)) => items.clone(),
            _ => Vec::new(),
        };
        inner.sync_keys(&dotted, items.len());
        let keys = inner.array_keys[&dotted].clone();
        keys.into_iter().zip(items).collect()
    }

    fn array_append(&self, path: &FieldPath, value: Value) {
        self.mutate_list(path, |items, keys, state| {
            items.push(value);
            keys.push(state.fresh_key());
        });
    }

    fn array_insert(&self, path: &FieldPath, index: usize, value: Value) {
        self.mutate_list(path, |items, keys, state| {
            let index = index.min(items.len());
            items.insert(index, value);
            keys.insert(index, state.fresh_key());
        });
    }

    fn array_remove(&self, path: &FieldPath, index: usize) {
        self.mutate_list(path, |items, keys, _| {
            if index < items.len() {
                items.remove(index);
                keys.remove(index);
            }
        });
    }

    fn array_swap(&self, path: &FieldPath, a: usize, b: usize) {
        self.mutate_list(path, |items, keys, _| {
            if a < items.len() && b < items.len() {
                items.swap(a, b);
                keys.swap(a, b);
            }
        });
    }

    fn array_move(&self, path: &FieldPath, from: usize, to: usize) {
        self.mutate_list(path, |items, keys, _| {
            if from < items.len() && to < items.len() {
                let item = items.remove(from);
                items.insert(to, item);
                let key = keys.remove(from);
                keys.insert(to, key);
            }
        });
    }
}

impl MemoryEngine {
    /// Runs a list mutation with its key list kept in lockstep.
    fn mutate_list<F>(&self, path: &FieldPath, op: F)
    where
        F: FnOnce(&mut Vec<Value>, &mut Vec<ElementKey>, &mut EngineState),
    {
        let dotted = path.dotted();
        let mut inner = self.inner.borrow_mut();
        let mut items = match get_at(&inner.values, path.segments()) {
            Some(Value::List(items)) => items.clone(),
            _ => Vec::new(),
        };
        inner.sync_keys(&dotted, items.len());
        let mut keys = inner.array_keys.remove(&dotted).unwrap_or_default();
        op(&mut items, &mut keys, &mut inner);
        inner.array_keys.insert(dotted.clone(), keys);
        let next = set_recursive(&inner.values, path.segments(), Value::List(items));
        inner.values = next;
        inner.touched.insert(dotted);
    }
}

// ============================================================================
// VALUE TREE WALKING: immutable get/set over nested maps and lists
// ============================================================================

fn get_at<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments {
        current = match current {
            Value::Map(map) => map.get(segment.as_str())?,
            Value::List(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

// Recursive helper for immutable `set`. Numeric segments descend into
// lists, extending with Nil when the index is past the end; everything else
// descends into maps, materializing intermediate maps as needed.
fn set_recursive(current: &Value, segments: &[String], val: Value) -> Value {
    // Base case: the target location. Return the new value.
    if segments.is_empty() {
        return val;
    }

    let key = &segments[0];
    if let (Value::List(items), Ok(index)) = (current, key.parse::<usize>()) {
        let mut items = items.clone();
        while items.len() <= index {
            items.push(Value::Nil);
        }
        let new_child = set_recursive(&items[index], &segments[1..], val);
        items[index] = new_child;
        return Value::List(items);
    }

    let mut map = match current {
        Value::Map(m) => m.clone(),
        // Not a map: materialize one to continue the path.
        _ => HashMap::new(),
    };
    let child = map.get(key.as_str()).cloned().unwrap_or(Value::Nil);
    let new_child = set_recursive(&child, &segments[1..], val);
    map.insert(key.clone(), new_child);
    Value::Map(map)
}

// ============================================================================
// RULE CHECKING
// ============================================================================

fn check_rules(field: &RegisteredField, value: &Value) -> Option<FieldError> {
    let rules = &field.rules;
    if rules.required && is_empty(value) {
        return Some(FieldError::required());
    }
    if let (Some(min), Some(n)) = (rules.min, value.as_number()) {
        if n < min {
            return Some(FieldError::new("min", format!("must be at least {min}")));
        }
    }
    if let (Some(max), Some(n)) = (rules.max, value.as_number()) {
        if n > max {
            return Some(FieldError::new("max", format!("must be at most {max}")));
        }
    }
    if let (Some(min_length), Some(s)) = (rules.min_length, value.as_str()) {
        if s.chars().count() < min_length {
            return Some(FieldError::new(
                "minLength",
                format!("must be at least {min_length} characters"),
            ));
        }
    }
    if let (Some(max_length), Some(s)) = (rules.max_length, value.as_str()) {
        if s.chars().count() > max_length {
            return Some(FieldError::new(
                "maxLength",
                format!("must be at most {max_length} characters"),
            ));
        }
    }
    match (&field.pattern, value.as_str()) {
        // A pattern that never compiled can never pass; report it rather
        // than validating the field as OK.
        (Some(Err(err)), _) => {
            return Some(FieldError::new("pattern", format!("invalid pattern: {err}")));
        }
        (Some(Ok(re)), Some(s)) if !re.is_match(s) => {
            return Some(FieldError::new("pattern", "value does not match pattern"));
        }
        _ => {}
    }
    None
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Nil => true,
        Value::String(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        _ => false,
    }
}
