use shapeshift::{CoercionReason, ConvertError, ScalarType, convert, convert_to};
use shapeshift_testhelpers::test;

fn reason(err: ConvertError) -> CoercionReason {
    match err {
        ConvertError::Coercion { failure, .. } => failure.reason,
        other => panic!("expected a coercion failure, got: {other}"),
    }
}

#[test]
fn int32_to_int64_boundaries() {
    for v in [0i32, 1, -1, i32::MAX, i32::MIN] {
        assert_eq!(convert_to::<i32, i64>(&v).unwrap(), i64::from(v));
    }
}

#[test]
fn int_to_string() {
    let cases = [
        (0i64, "0"),
        (-17, "-17"),
        (i64::MAX, "9223372036854775807"),
        (i64::MIN, "-9223372036854775808"),
    ];
    for (v, expected) in cases {
        assert_eq!(convert_to::<i64, String>(&v).unwrap(), expected);
    }
}

#[test]
fn string_to_float() {
    assert_eq!(convert_to::<String, f64>(&"0".to_string()).unwrap(), 0.0);
    assert_eq!(convert_to::<String, f64>(&"-2.5".to_string()).unwrap(), -2.5);
    assert_eq!(convert_to::<String, f64>(&"1e-3".to_string()).unwrap(), 0.001);
    assert_eq!(
        reason(convert_to::<String, f64>(&String::new()).unwrap_err()),
        CoercionReason::Unparseable
    );
    // no trimming
    assert_eq!(
        reason(convert_to::<String, f64>(&" 1.0".to_string()).unwrap_err()),
        CoercionReason::Unparseable
    );
}

#[test]
fn string_to_int() {
    assert_eq!(convert_to::<&str, u8>(&"255").unwrap(), 255);
    assert_eq!(convert_to::<&str, i128>(&"-1").unwrap(), -1);
    assert_eq!(
        reason(convert_to::<&str, u8>(&"256").unwrap_err()),
        CoercionReason::Unparseable
    );
    assert_eq!(
        reason(convert_to::<&str, u8>(&"-1").unwrap_err()),
        CoercionReason::Unparseable
    );
}

#[test]
fn narrowing_is_range_checked() {
    assert_eq!(convert_to::<i64, i32>(&-5).unwrap(), -5);
    assert_eq!(
        reason(convert_to::<i64, i32>(&(i64::from(i32::MAX) + 1)).unwrap_err()),
        CoercionReason::OutOfRange
    );
    assert_eq!(
        reason(convert_to::<i16, u64>(&-1).unwrap_err()),
        CoercionReason::OutOfRange
    );
}

#[test]
fn floats_truncate_toward_zero() {
    assert_eq!(convert_to::<f64, i64>(&-7.9).unwrap(), -7);
    assert_eq!(convert_to::<f32, u16>(&7.9).unwrap(), 7);
    let err = convert_to::<f64, i64>(&f64::NAN).unwrap_err();
    insta::assert_snapshot!(err, @"cannot coerce NaN (f64) into i64: not a finite number");
}

#[test]
fn f32_to_string_prints_at_f32_width() {
    let cases = [(0.1f32, "0.1"), (-2.5, "-2.5"), (1.0 / 3.0, "0.33333334"), (16_777_216.0, "16777216")];
    for (v, expected) in cases {
        let text = convert_to::<f32, String>(&v).unwrap();
        assert_eq!(text, expected);
        assert_eq!(convert_to::<String, f32>(&text).unwrap(), v);
    }
}

#[test]
fn integer_too_large_for_f32() {
    assert_eq!(convert_to::<u64, f32>(&u64::MAX).unwrap(), u64::MAX as f32);
    let err = convert_to::<u128, f32>(&u128::MAX).unwrap_err();
    insta::assert_snapshot!(err, @"cannot coerce 340282366920938463463374607431768211455 (u128) into f32: out of range");
    assert_eq!(convert_to::<u128, f64>(&u128::MAX).unwrap(), u128::MAX as f64);
}

#[test]
fn booleans() {
    assert!(convert_to::<u8, bool>(&3).unwrap());
    assert_eq!(convert_to::<bool, i32>(&true).unwrap(), 1);
    assert!(!convert_to::<String, bool>(&"false".to_string()).unwrap());
    assert_eq!(convert_to::<bool, String>(&false).unwrap(), "false");
}

#[test]
fn overwrites_the_destination() {
    let mut dst = 5u16;
    convert(&7u8, &mut dst).unwrap();
    assert_eq!(dst, 7);
}

#[test]
fn failed_coercion_leaves_the_destination_alone() {
    let mut dst = 5u8;
    let err = convert(&1000u32, &mut dst).unwrap_err();
    assert!(!err.is_structural());
    assert_eq!(dst, 5);
    insta::assert_snapshot!(err, @"cannot coerce 1000 (u32) into u8: out of range");
}

#[test]
fn unparseable_string_message() {
    let err = convert_to::<&str, i32>(&"12a").unwrap_err();
    insta::assert_snapshot!(err, @r#"cannot coerce "12a" (&str) into i32: invalid syntax"#);
}

#[test]
fn unsupported_pairs_are_structural() {
    let err = convert_to::<bool, f64>(&true).unwrap_err();
    assert!(err.is_structural());
    assert!(matches!(
        err,
        ConvertError::UnsupportedScalarPair {
            src: ScalarType::Bool,
            dst: ScalarType::F64,
        }
    ));
    insta::assert_snapshot!(err, @"no coercion from bool to f64");
}

#[test]
fn borrowed_strings_are_read_only() {
    let mut dst: &'static str = "";
    let err = convert(&"x".to_string(), &mut dst).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::UnsupportedScalarPair {
            src: ScalarType::String,
            dst: ScalarType::Str,
        }
    ));
    let mut copy: &'static str = "";
    convert(&"x", &mut copy).unwrap();
    assert_eq!(copy, "x");
}

#[test]
fn chars() {
    assert_eq!(convert_to::<char, u32>(&'A').unwrap(), 65);
    assert_eq!(convert_to::<u8, char>(&97).unwrap(), 'a');
    assert_eq!(convert_to::<String, char>(&"z".to_string()).unwrap(), 'z');
    assert_eq!(
        reason(convert_to::<String, char>(&"zz".to_string()).unwrap_err()),
        CoercionReason::NotAChar
    );
}
