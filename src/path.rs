//! A canonical, type-safe representation of a path into the form data tree.
//!
//! A `FieldPath` is an ordered sequence of string segments. The engine
//! identifies fields by the segments joined with `.` (the "dotted path").
//! A path is empty only at the root handle.

use std::fmt;

use crate::value::Value;

/// Ordered path segments identifying a location in the nested form data.
///
/// # Examples
///
/// ```rust
/// use formtree::path::FieldPath;
/// let p = FieldPath::root().child("a").child("b").index(0);
/// assert_eq!(p.to_string(), "a.b.0");
/// assert!(!p.is_root());
/// assert!(FieldPath::root().is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath(pub Vec<String>);

impl FieldPath {
    /// The empty path, identifying the whole data tree.
    pub fn root() -> Self {
        FieldPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns a new path one segment deeper.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        FieldPath(segments)
    }

    /// Returns a new path descending into a sequence element.
    pub fn index(&self, index: usize) -> Self {
        self.child(index.to_string())
    }

    /// The dotted-path form the engine uses as a field identifier.
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        if dotted.is_empty() {
            return FieldPath::root();
        }
        FieldPath(dotted.split('.').map(str::to_string).collect())
    }
}

/// A caller-supplied relative path: a single segment or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathArg {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for PathArg {
    fn from(segment: &str) -> Self {
        PathArg::One(segment.to_string())
    }
}

impl From<String> for PathArg {
    fn from(segment: String) -> Self {
        PathArg::One(segment)
    }
}

impl From<Vec<&str>> for PathArg {
    fn from(segments: Vec<&str>) -> Self {
        PathArg::Many(segments.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<String>> for PathArg {
    fn from(segments: Vec<String>) -> Self {
        PathArg::Many(segments)
    }
}

/// The resolved target of a watch-style engine operation.
///
/// `All` is the sentinel for "the entire data tree", produced only when the
/// root handle watches with no relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchTarget {
    All,
    One(String),
    Many(Vec<String>),
}

impl WatchTarget {
    /// Composes a handle's own path with an optional relative path.
    ///
    /// All combinations that occur in practice, and their results:
    ///
    /// - root handle, no relative path: the whole tree (`All`)
    /// - root handle, relative path given: the relative path unchanged
    /// - nested handle, single segment: `<own>.<segment>`
    /// - nested handle, list: every element prefixed with `<own>.`
    /// - nested handle, no relative path: the own path unchanged
    ///
    /// This function never fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use formtree::path::{FieldPath, PathArg, WatchTarget};
    /// let own = FieldPath::from("a.b");
    /// let target = WatchTarget::compose(&own, Some(PathArg::from(vec!["x", "y"])));
    /// assert_eq!(
    ///     target,
    ///     WatchTarget::Many(vec!["a.b.x".to_string(), "a.b.y".to_string()])
    /// );
    /// ```
    pub fn compose(own: &FieldPath, relative: Option<PathArg>) -> WatchTarget {
        match (own.is_root(), relative) {
            (true, None) => WatchTarget::All,
            (true, Some(PathArg::One(segment))) => WatchTarget::One(segment),
            (true, Some(PathArg::Many(segments))) => WatchTarget::Many(segments),
            (false, Some(PathArg::One(segment))) => {
                WatchTarget::One(format!("{}.{}", own.dotted(), segment))
            }
            (false, Some(PathArg::Many(segments))) => {
                let own = own.dotted();
                WatchTarget::Many(
                    segments
                        .into_iter()
                        .map(|segment| format!("{own}.{segment}"))
                        .collect(),
                )
            }
            (false, None) => WatchTarget::One(own.dotted()),
        }
    }
}

/// The value(s) a watch operation yields: one value for a single target,
/// a positional list for a list target.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchResult {
    One(Value),
    Many(Vec<Value>),
}

impl WatchResult {
    /// Unwraps a single-target result.
    pub fn into_one(self) -> Option<Value> {
        match self {
            WatchResult::One(value) => Some(value),
            WatchResult::Many(_) => None,
        }
    }

    /// Unwraps a list-target result.
    pub fn into_many(self) -> Option<Vec<Value>> {
        match self {
            WatchResult::Many(values) => Some(values),
            WatchResult::One(_) => None,
        }
    }
}
