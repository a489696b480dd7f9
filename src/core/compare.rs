//! # Structural Equality
//!
//! Recursive, key-exclusion-aware deep comparison over structured values.
//! The history stack uses it to decide whether a transition is a true
//! revisit or a fresh navigation.
//!
//! Anything `Serialize` can be compared: both operands are first viewed as
//! `serde_json::Value` (the field-enumeration view of record-like types),
//! then compared by tagged dispatch — mappings key by key, sequences
//! index-aligned, everything else as an opaque scalar.

use log::warn;
use serde::Serialize;
use serde_json::Value;

/// Recursion bound for pathological inputs. Country records are finite and
/// non-cyclic, so real data never comes close.
const MAX_DEPTH: usize = 64;

/// Compares two serializable values structurally, ignoring `excluded_keys`
/// at every mapping level.
///
/// Operands that cannot be serialized (or that serialize to different
/// variants) are not equal.
pub fn equals<L: Serialize, R: Serialize>(left: &L, right: &R, excluded_keys: &[&str]) -> bool {
    match (serde_json::to_value(left), serde_json::to_value(right)) {
        (Ok(l), Ok(r)) => deep_equal(&l, &r, excluded_keys),
        _ => false,
    }
}

/// Recursive comparison over already-normalized JSON values.
pub fn deep_equal(left: &Value, right: &Value, excluded_keys: &[&str]) -> bool {
    deep_equal_at(left, right, excluded_keys, 0)
}

fn deep_equal_at(left: &Value, right: &Value, excluded_keys: &[&str], depth: usize) -> bool {
    if depth >= MAX_DEPTH {
        warn!("deep_equal bailing out at depth {depth}");
        return false;
    }

    match (left, right) {
        (Value::Object(l), Value::Object(r)) => {
            // Every non-excluded key on the left must exist on the right
            // with a recursively-equal value.
            for (key, left_value) in l {
                if excluded_keys.contains(&key.as_str()) {
                    continue;
                }
                match r.get(key) {
                    Some(right_value)
                        if deep_equal_at(left_value, right_value, excluded_keys, depth + 1) => {}
                    _ => return false,
                }
            }
            // Symmetric key-set check: the right side may not carry extra
            // non-excluded keys either.
            r.keys()
                .all(|key| excluded_keys.contains(&key.as_str()) || l.contains_key(key))
        }
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len()
                && l.iter()
                    .zip(r)
                    .all(|(a, b)| deep_equal_at(a, b, excluded_keys, depth + 1))
        }
        // Scalars, and mixed variants (mapping vs sequence vs scalar):
        // plain value equality, which is false across variants.
        (l, r) => l == r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_compare_by_value() {
        assert!(deep_equal(&json!(3), &json!(3), &[]));
        assert!(!deep_equal(&json!(3), &json!(4), &[]));
        assert!(deep_equal(&json!("a"), &json!("a"), &[]));
        assert!(!deep_equal(&json!("3"), &json!(3), &[]));
    }

    #[test]
    fn variant_mismatch_is_not_equal() {
        assert!(!deep_equal(&json!({"a": 1}), &json!([1]), &[]));
        assert!(!deep_equal(&json!([1]), &json!(1), &[]));
        assert!(!deep_equal(&json!(null), &json!({}), &[]));
    }

    #[test]
    fn nested_mappings_compare_recursively() {
        let a = json!({"name": {"common": "Chad", "official": "Republic of Chad"}});
        let b = json!({"name": {"common": "Chad", "official": "Republic of Chad"}});
        let c = json!({"name": {"common": "Chad", "official": "Chad"}});
        assert!(deep_equal(&a, &b, &[]));
        assert!(!deep_equal(&a, &c, &[]));
    }

    #[test]
    fn missing_key_on_either_side_is_not_equal() {
        let a = json!({"x": 1, "y": 2});
        let b = json!({"x": 1});
        assert!(!deep_equal(&a, &b, &[]));
        assert!(!deep_equal(&b, &a, &[]));
    }

    #[test]
    fn excluded_keys_are_ignored_on_both_sides() {
        let a = json!({"x": 1, "stamp": 100});
        let b = json!({"x": 1, "stamp": 200});
        let c = json!({"x": 1});
        assert!(deep_equal(&a, &b, &["stamp"]));
        // Exclusion also forgives a key that is absent entirely.
        assert!(deep_equal(&a, &c, &["stamp"]));
        assert!(deep_equal(&c, &a, &["stamp"]));
    }

    #[test]
    fn exclusion_applies_at_every_level() {
        let a = json!({"outer": {"x": 1, "noise": true}});
        let b = json!({"outer": {"x": 1, "noise": false}});
        assert!(deep_equal(&a, &b, &["noise"]));
        assert!(!deep_equal(&a, &b, &[]));
    }

    #[test]
    fn sequences_compare_index_aligned() {
        assert!(deep_equal(&json!([1, 2, 3]), &json!([1, 2, 3]), &[]));
        assert!(!deep_equal(&json!([1, 2, 3]), &json!([1, 3, 2]), &[]));
        assert!(!deep_equal(&json!([1, 2]), &json!([1, 2, 3]), &[]));
    }

    #[test]
    fn equality_is_reflexive() {
        let value = json!({
            "name": {"common": "Aruba"},
            "capital": ["Oranjestad"],
            "area": 180.0,
            "landlocked": false,
        });
        assert!(deep_equal(&value, &value, &[]));
    }

    #[test]
    fn equality_is_symmetric_under_exclusion() {
        let cases = [
            (json!({"a": 1, "b": 2}), json!({"a": 1}), vec!["b"]),
            (json!({"a": 1, "b": 2}), json!({"a": 2}), vec!["b"]),
            (json!([{"k": 1}]), json!([{"k": 1, "j": 2}]), vec!["j"]),
            (json!({"a": [1, 2]}), json!({"a": [1, 2]}), vec![]),
        ];
        for (left, right, excluded) in cases {
            assert_eq!(
                deep_equal(&left, &right, &excluded),
                deep_equal(&right, &left, &excluded),
                "asymmetric for {left} vs {right}"
            );
        }
    }

    #[test]
    fn serializable_structs_compare_through_their_field_view() {
        #[derive(Serialize)]
        struct Marker {
            label: String,
            weight: u32,
        }

        let a = Marker { label: "x".into(), weight: 1 };
        let b = Marker { label: "x".into(), weight: 2 };
        assert!(!equals(&a, &b, &[]));
        assert!(equals(&a, &b, &["weight"]));
    }

    #[test]
    fn depth_guard_rejects_absurd_nesting() {
        let mut value = json!(1);
        for _ in 0..(MAX_DEPTH + 8) {
            value = json!([value]);
        }
        let other = value.clone();
        assert!(!deep_equal(&value, &other, &[]));
    }
}
