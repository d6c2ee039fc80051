// Rust guideline compliant 2026-08-19

//! Unit tests for the API code registry.
//!
//! These tests validate range membership, message-key lookup, override
//! precedence, and the offset helper.

use apikit_core::codes::{is_reserved, BuiltinCode, CodeRegistry};
use std::collections::BTreeMap;

fn registry(min: i32, max: i32) -> CodeRegistry {
    CodeRegistry::new(min, max, &BTreeMap::new()).unwrap()
}

#[test]
fn test_reserved_range_bounds() {
    assert!(is_reserved(0), "0 should be reserved");
    assert!(is_reserved(19), "19 should be reserved");
    assert!(!is_reserved(20), "20 should not be reserved");
    assert!(!is_reserved(-1), "-1 should not be reserved");
}

#[test]
fn test_is_valid_reserved_and_app_ranges() {
    let registry = registry(100, 399);
    assert!(registry.is_valid(0), "OK code should be valid");
    assert!(registry.is_valid(19), "top of reserved range should be valid");
    assert!(registry.is_valid(100), "min_code should be valid");
    assert!(registry.is_valid(399), "max_code should be valid");
    assert!(
        !registry.is_valid(50),
        "code between reserved and app ranges should be invalid"
    );
    assert!(!registry.is_valid(400), "code above max_code should be invalid");
    assert!(!registry.is_valid(-5), "negative code should be invalid");
}

#[test]
fn test_builtin_codes_are_reserved() {
    for code in BuiltinCode::ALL {
        assert!(
            is_reserved(code.code()),
            "built-in code {:?} should lie in the reserved range",
            code
        );
    }
}

#[test]
fn test_builtin_codes_are_unique() {
    let mut codes: Vec<i32> = BuiltinCode::ALL.iter().map(|c| c.code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), BuiltinCode::ALL.len(), "codes should be unique");
}

#[test]
fn test_message_key_builtin() {
    let registry = registry(100, 399);
    assert_eq!(
        registry.message_key(BuiltinCode::Ok.code()).unwrap(),
        Some("apikit.ok")
    );
    assert_eq!(
        registry
            .message_key(BuiltinCode::NoErrorMessage.code())
            .unwrap(),
        Some("apikit.no_error_message")
    );
}

#[test]
fn test_message_key_unmapped_app_code() {
    let registry = registry(100, 399);
    assert_eq!(
        registry.message_key(150).unwrap(),
        None,
        "unmapped valid code should resolve to None"
    );
}

#[test]
fn test_message_key_out_of_range() {
    let registry = registry(100, 399);
    assert!(
        registry.message_key(50).is_err(),
        "out-of-range lookup should be a validation error"
    );
}

#[test]
fn test_reserved_message_key_rejects_app_code() {
    let registry = registry(100, 399);
    assert!(
        registry.reserved_message_key(150).is_err(),
        "reserved lookup should reject application codes"
    );
    assert_eq!(
        registry.reserved_message_key(0).unwrap(),
        Some("apikit.ok")
    );
}

#[test]
fn test_overrides_take_precedence() {
    let mut overrides = BTreeMap::new();
    overrides.insert(150, "api.custom".to_string());
    overrides.insert(BuiltinCode::Ok.code(), "api.my_ok".to_string());
    let registry = CodeRegistry::new(100, 399, &overrides).unwrap();

    assert_eq!(registry.message_key(150).unwrap(), Some("api.custom"));
    assert_eq!(
        registry.message_key(BuiltinCode::Ok.code()).unwrap(),
        Some("api.my_ok"),
        "user override should win over the built-in entry"
    );
}

#[test]
fn test_override_outside_ranges_rejected() {
    let mut overrides = BTreeMap::new();
    overrides.insert(50, "api.gap".to_string());
    assert!(
        CodeRegistry::new(100, 399, &overrides).is_err(),
        "override in the gap between ranges should be rejected"
    );
}

#[test]
fn test_registry_rejects_overlapping_range() {
    assert!(
        CodeRegistry::new(10, 399, &BTreeMap::new()).is_err(),
        "min_code inside the reserved range should be rejected"
    );
}

#[test]
fn test_registry_rejects_empty_range() {
    assert!(
        CodeRegistry::new(399, 100, &BTreeMap::new()).is_err(),
        "inverted range should be rejected"
    );
}

#[test]
fn test_app_code_offset() {
    let registry = registry(100, 399);
    assert_eq!(registry.app_code(0).unwrap(), 100);
    assert_eq!(registry.app_code(299).unwrap(), 399);
    assert!(registry.app_code(300).is_err(), "offset past max_code");
    assert!(registry.app_code(-1).is_err(), "negative offset");
}
