use std::collections::{BTreeMap, HashMap};

use shapeshift::{ConvertError, DefKind, MismatchReason, PathSegment, convert, convert_to, record};
use shapeshift_testhelpers::test;

#[test]
fn destination_entries_are_merged() {
    let src = HashMap::from([("k1".to_string(), 1i32)]);
    let mut dst = HashMap::from([("k1".to_string(), 0i64), ("k2".to_string(), 9)]);
    convert(&src, &mut dst).unwrap();
    assert_eq!(
        dst,
        HashMap::from([("k1".to_string(), 1), ("k2".to_string(), 9)])
    );
}

#[test]
fn keys_and_values_are_coerced() {
    let src = HashMap::from([("1".to_string(), 10u8), ("2".to_string(), 20)]);
    let dst: BTreeMap<u32, String> = convert_to(&src).unwrap();
    assert_eq!(
        dst,
        BTreeMap::from([(1, "10".to_string()), (2, "20".to_string())])
    );
}

#[test]
fn failing_key() {
    let src = BTreeMap::from([("x".to_string(), 1u8)]);
    let mut dst: BTreeMap<u32, u8> = BTreeMap::from([(5, 5)]);
    let err = convert(&src, &mut dst).unwrap_err();
    let ConvertError::Coercion { path, .. } = &err else {
        panic!("expected a coercion failure, got: {err}");
    };
    assert_eq!(path.segments(), [PathSegment::Key]);
    // the half-built entry is not inserted
    assert_eq!(dst, BTreeMap::from([(5, 5)]));
    insta::assert_snapshot!(err, @r#"at {key}: cannot coerce "x" (String) into u32: invalid syntax"#);
}

#[test]
fn failing_value() {
    let src = BTreeMap::from([("a".to_string(), -1i64)]);
    let mut dst: BTreeMap<String, u64> = BTreeMap::new();
    let err = convert(&src, &mut dst).unwrap_err();
    assert!(dst.is_empty());
    insta::assert_snapshot!(err, @"at {value}: cannot coerce -1 (i64) into u64: out of range");
}

#[test]
fn incompatible_values() {
    let err = convert_to::<HashMap<String, Vec<u8>>, HashMap<String, u8>>(&HashMap::new()).unwrap_err();
    assert!(err.is_structural());
    assert!(matches!(
        err,
        ConvertError::StructuralMismatch {
            reason: MismatchReason::Value(_),
            ..
        }
    ));
}

#[test]
fn maps_and_lists_do_not_mix() {
    let err = convert_to::<HashMap<String, u8>, Vec<u8>>(&HashMap::new()).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::StructuralMismatch {
            reason: MismatchReason::IncompatibleKinds {
                src: DefKind::Map,
                dst: DefKind::List,
            },
            ..
        }
    ));
    assert!(err.to_string().ends_with("cannot turn a map into a list"));
}

record! {
    #[derive(Default)]
    struct Stock {
        on_hand: u32,
        reserved: u32,
    }

    #[derive(Default, Debug, PartialEq)]
    struct StockRow {
        on_hand: i64,
        reserved: i64,
    }
}

#[test]
fn maps_of_structs() {
    let src = HashMap::from([
        ("apple".to_string(), Stock { on_hand: 3, reserved: 1 }),
        ("pear".to_string(), Stock { on_hand: 0, reserved: 0 }),
    ]);
    let mut dst = BTreeMap::from([(
        "plum".to_string(),
        StockRow {
            on_hand: 8,
            reserved: 2,
        },
    )]);
    convert(&src, &mut dst).unwrap();
    assert_eq!(dst.len(), 3);
    assert_eq!(
        dst["apple"],
        StockRow {
            on_hand: 3,
            reserved: 1
        }
    );
    assert_eq!(dst["plum"].on_hand, 8);
}
