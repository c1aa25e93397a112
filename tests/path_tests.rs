//! Unit tests for path composition and dotted stringification.
//!
//! Composition has exactly six combinations in practice; every one is
//! pinned here, including the list-prefixing cases the watch operation
//! relies on.

use formtree::path::{FieldPath, PathArg, WatchTarget};

#[cfg(test)]
mod composition_tests {
    use super::*;

    #[test]
    fn test_root_with_no_relative_path_is_the_whole_tree() {
        let target = WatchTarget::compose(&FieldPath::root(), None);
        assert_eq!(target, WatchTarget::All);
    }

    #[test]
    fn test_root_with_single_segment_is_unchanged() {
        let target = WatchTarget::compose(&FieldPath::root(), Some(PathArg::from("x")));
        assert_eq!(target, WatchTarget::One("x".to_string()));
    }

    #[test]
    fn test_root_with_list_is_unchanged() {
        let target = WatchTarget::compose(&FieldPath::root(), Some(PathArg::from(vec!["x", "y"])));
        assert_eq!(
            target,
            WatchTarget::Many(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn test_nested_with_single_segment_is_dotted_onto_own_path() {
        let own = FieldPath::from("a.b");
        let target = WatchTarget::compose(&own, Some(PathArg::from("x")));
        assert_eq!(target, WatchTarget::One("a.b.x".to_string()));
    }

    #[test]
    fn test_nested_with_list_prefixes_every_element() {
        let own = FieldPath::from("a.b");
        let target = WatchTarget::compose(&own, Some(PathArg::from(vec!["x", "y"])));
        assert_eq!(
            target,
            WatchTarget::Many(vec!["a.b.x".to_string(), "a.b.y".to_string()])
        );
    }

    #[test]
    fn test_nested_with_no_relative_path_is_own_path() {
        let own = FieldPath::from("a.b");
        let target = WatchTarget::compose(&own, None);
        assert_eq!(target, WatchTarget::One("a.b".to_string()));
    }
}

#[cfg(test)]
mod field_path_tests {
    use super::*;

    #[test]
    fn test_root_is_empty_and_displays_empty() {
        let root = FieldPath::root();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "");
        assert_eq!(root.segments().len(), 0);
    }

    #[test]
    fn test_child_chain_stringifies_to_dotted_path() {
        let path = FieldPath::root().child("a").child("b").index(0).child("c");
        assert_eq!(path.to_string(), "a.b.0.c");
        assert!(!path.is_root());
    }

    #[test]
    fn test_dotted_parse_round_trips() {
        let path = FieldPath::from("users.3.address.street");
        assert_eq!(
            path.segments(),
            &["users", "3", "address", "street"].map(String::from)
        );
        assert_eq!(path.dotted(), "users.3.address.street");
    }

    #[test]
    fn test_empty_string_parses_to_root() {
        assert!(FieldPath::from("").is_root());
    }

    #[test]
    fn test_child_does_not_mutate_the_parent_path() {
        let parent = FieldPath::from("a");
        let _child = parent.child("b");
        assert_eq!(parent.to_string(), "a");
    }
}
