//! Unit tests for field handle identity, the root usage error, and the
//! discriminate operation.

use std::rc::Rc;

use formtree::engine::RegisterOptions;
use formtree::errors::FormError;
use formtree::form::{Form, FormConfig};
use formtree::value::Value;

fn sample_form() -> Form<formtree::engine::MemoryEngine> {
    Form::new(FormConfig::new(Value::from(serde_json::json!({
        "user": { "name": "ada", "age": 36.0 },
        "tags": ["a", "b"]
    }))))
}

#[cfg(test)]
mod identity_tests {
    use super::*;

    #[test]
    fn test_root_handle_is_stable_across_repeated_access() {
        let form = sample_form();
        assert!(Rc::ptr_eq(&form.fields(), &form.fields()));
    }

    #[test]
    fn test_same_child_key_returns_the_identical_handle() {
        let form = sample_form();
        let fields = form.fields();
        let first = fields.child("user");
        let second = fields.child("user");
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_nested_children_are_cached_per_parent() {
        let form = sample_form();
        let user = form.fields().child("user");
        assert!(Rc::ptr_eq(&user.child("name"), &user.child("name")));
    }

    #[test]
    fn test_positional_access_is_cached_by_index() {
        let form = sample_form();
        let tags = form.fields().child("tags");
        assert!(Rc::ptr_eq(&tags.at(1), &tags.at(1)));
    }

    #[test]
    fn test_distinct_keys_yield_distinct_handles() {
        let form = sample_form();
        let fields = form.fields();
        assert!(!Rc::ptr_eq(&fields.child("user"), &fields.child("tags")));
    }

    #[test]
    fn test_new_form_derives_a_new_tree() {
        let a = sample_form();
        let b = sample_form();
        assert!(!Rc::ptr_eq(&a.fields(), &b.fields()));
    }
}

#[cfg(test)]
mod naming_tests {
    use super::*;

    #[test]
    fn test_child_chain_stringifies_to_its_dotted_path() {
        let form = sample_form();
        let handle = form.fields().child("user").child("name");
        assert_eq!(handle.name(), "user.name");
        assert_eq!(handle.to_string(), "user.name");
    }

    #[test]
    fn test_arbitrary_depth_stringification() {
        let form = sample_form();
        let mut handle = form.fields();
        for segment in ["w", "x", "0", "y", "z"] {
            handle = handle.child(segment);
        }
        assert_eq!(handle.name(), "w.x.0.y.z");
    }

    #[test]
    fn test_key_falls_back_to_dotted_path_outside_field_arrays() {
        let form = sample_form();
        let handle = form.fields().child("user").child("age");
        assert_eq!(handle.key(), "user.age");
    }
}

#[cfg(test)]
mod registration_tests {
    use super::*;

    #[test]
    fn test_registering_the_root_is_a_usage_error() {
        let form = sample_form();
        let result = form.fields().register(RegisterOptions::default());
        assert_eq!(result.unwrap_err(), FormError::RootRegistration);
    }

    #[test]
    fn test_registering_the_root_fails_regardless_of_options() {
        let form = sample_form();
        let result = form
            .fields()
            .register(RegisterOptions::required().with_min_length(3));
        assert!(matches!(result, Err(FormError::RootRegistration)));
    }

    #[test]
    fn test_registering_a_field_reports_its_dotted_name() {
        let form = sample_form();
        let registration = form
            .fields()
            .child("user")
            .child("name")
            .register(RegisterOptions::required())
            .unwrap();
        assert_eq!(registration.name, "user.name");
        assert!(registration.rules.required);
    }
}

#[cfg(test)]
mod discriminate_tests {
    use super::*;

    #[test]
    fn test_discriminate_reads_the_live_discriminant_value() {
        let form = Form::new(FormConfig::new(Value::from(serde_json::json!({
            "payment": { "kind": "card", "number": "4111" }
        }))));
        let payment = form.fields().child("payment");
        let (kind, _) = payment.discriminate("kind");
        assert_eq!(kind, Value::String("card".to_string()));

        payment.child("kind").set_value("iban");
        let (kind, _) = payment.discriminate("kind");
        assert_eq!(kind, Value::String("iban".to_string()));
    }

    #[test]
    fn test_discriminate_returns_the_same_handle_reference() {
        let form = sample_form();
        let user = form.fields().child("user");
        let (_, narrowed) = user.discriminate("name");
        assert!(std::ptr::eq(narrowed, &*user));
    }
}

#[cfg(test)]
mod shape_tests {
    use super::*;

    #[test]
    fn test_children_enumerates_schema_fields() {
        let form = sample_form();
        let names: Vec<String> = form
            .fields()
            .child("user")
            .children()
            .iter()
            .map(|h| h.name())
            .collect();
        assert_eq!(names, vec!["user.age".to_string(), "user.name".to_string()]);
    }

    #[test]
    fn test_shape_classifies_records_and_sequences() {
        let form = sample_form();
        assert!(form.fields().shape().is_some_and(|s| s.is_record()));
        assert!(form
            .fields()
            .child("tags")
            .shape()
            .is_some_and(|s| s.is_sequence()));
    }

    #[test]
    fn test_unknown_keys_still_yield_handles() {
        // Child access is open, proxy-style: the schema informs
        // enumeration, it does not gate descent.
        let form = sample_form();
        let handle = form.fields().child("not").child("in").child("schema");
        assert_eq!(handle.name(), "not.in.schema");
        assert!(handle.shape().is_none());
    }
}
