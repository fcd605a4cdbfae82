use std::sync::Arc;

use shapeshift::{ConvertError, Converter, FieldMappingOptions, Reflect, record};
use shapeshift_testhelpers::test;

record! {
    #[derive(Default, Clone)]
    struct UserIn {
        id: u32,
        first: String,
        last: String,
    }

    #[derive(Default, Debug, PartialEq)]
    struct User {
        id: u64,
        first: String,
        last: String,
        full_name: String,
    }
}

fn user(id: u32, first: &str, last: &str) -> UserIn {
    UserIn {
        id,
        first: first.into(),
        last: last.into(),
    }
}

#[test]
fn plans_are_compiled_once() {
    let converter = Converter::new();
    let mut out = User::default();

    converter.convert(&user(1, "Ada", "Lovelace"), &mut out).unwrap();
    let after_first = converter.compiler().compilations();
    // the record plan, u32 -> u64 and String -> String
    assert_eq!(after_first, 3);

    converter.convert(&user(2, "Alan", "Turing"), &mut out).unwrap();
    assert_eq!(converter.compiler().compilations(), after_first);
    assert_eq!(out.id, 2);

    let a = converter.plan::<UserIn, User>(&FieldMappingOptions::new()).unwrap();
    let b = converter.plan::<UserIn, User>(&FieldMappingOptions::default()).unwrap();
    assert!(Arc::ptr_eq(a.conversion_plan(), b.conversion_plan()));
}

#[test]
fn equal_options_share_a_plan() {
    let converter = Converter::new();
    let first = FieldMappingOptions::new().exclude("last").exclude("first");
    let second = FieldMappingOptions::new().exclude("first").exclude("last");

    let a = converter.plan::<UserIn, User>(&first).unwrap();
    let compiled = converter.compiler().compilations();
    let b = converter.plan::<UserIn, User>(&second).unwrap();
    assert!(Arc::ptr_eq(a.conversion_plan(), b.conversion_plan()));
    assert_eq!(converter.compiler().compilations(), compiled);

    let c = converter
        .plan::<UserIn, User>(&FieldMappingOptions::new().exclude("first"))
        .unwrap();
    assert!(!Arc::ptr_eq(a.conversion_plan(), c.conversion_plan()));
}

#[test]
fn structural_failures_are_cached() {
    let converter = Converter::new();
    let first = converter.convert_to::<Vec<u8>, String>(&vec![1]).unwrap_err();
    let compiled = converter.compiler().compilations();
    let cached = converter.compiler().cached();

    let second = converter.convert_to::<Vec<u8>, String>(&vec![2]).unwrap_err();
    assert!(first.is_structural());
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(converter.compiler().compilations(), compiled);
    assert_eq!(converter.compiler().cached(), cached);
}

#[test]
fn callbacks_fill_in_derived_fields() {
    let converter = Converter::new();
    let mut out = User::default();
    converter
        .convert_with_callback(&user(1, "Grace", "Hopper"), &mut out, |src, dst| {
            dst.full_name = format!("{} {}", src.first, src.last);
        })
        .unwrap();
    assert_eq!(out.full_name, "Grace Hopper");
}

#[test]
fn callbacks_with_options() {
    let options = FieldMappingOptions::new().exclude("last");
    let mut out = User {
        last: "kept".into(),
        ..User::default()
    };
    shapeshift::convert_with_options_and_callback(&user(7, "Grace", "Hopper"), &mut out, &options, |src, dst| {
        dst.full_name = format!("{} {}", src.first, dst.last);
    })
    .unwrap();
    assert_eq!(out.id, 7);
    assert_eq!(out.last, "kept");
    assert_eq!(out.full_name, "Grace kept");
}

#[test]
fn callbacks_do_not_run_after_a_failure() {
    let converter = Converter::new();
    let mut called = false;
    let mut out = 0u8;
    let err = converter
        .convert_with_callback(&300u16, &mut out, |_, _| called = true)
        .unwrap_err();
    assert!(matches!(err, ConvertError::Coercion { .. }));
    assert!(!called);
}

#[test]
fn arrays_with_callbacks() {
    let users = vec![user(1, "Ada", "Lovelace"), user(2, "Alan", "Turing")];
    let mut out: Vec<User> = Vec::new();
    let mut seen = 0;
    shapeshift::convert_array_with_callback(&users, &mut out, |src, dst| {
        seen += 1;
        dst.full_name = format!("{}, {}", src.last, src.first);
    })
    .unwrap();

    assert_eq!(seen, 2);
    assert_eq!(out.len(), 2);
    assert_eq!(out[1].full_name, "Turing, Alan");
    assert_eq!(out[1].id, 2);
}

#[test]
fn arrays_reuse_presized_destinations() {
    let mut out = vec![
        User {
            full_name: "kept".into(),
            ..Default::default()
        },
        User::default(),
    ];
    shapeshift::convert_array(&[user(5, "a", "b"), user(6, "c", "d")], &mut out).unwrap();
    assert_eq!(out[0].id, 5);
    assert_eq!(out[0].full_name, "kept");
}

#[test]
fn arity_mismatch() {
    let converter = Converter::new();
    let err = converter.convert_slice(&[1u8, 2, 3], &mut [0u16; 2]).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::ArityMismatch {
            src_len: 3,
            dst_len: 2
        }
    ));
    insta::assert_snapshot!(err, @"cannot convert 3 values into 2 destinations");

    let mut out = vec![User::default()];
    let err = converter
        .convert_array(&[user(1, "a", "b"), user(2, "c", "d")], &mut out)
        .unwrap_err();
    assert!(matches!(err, ConvertError::ArityMismatch { .. }));
}

#[test]
fn slices_report_the_failing_index() {
    let converter = Converter::new();
    let mut out = [0u8; 3];
    let err = converter
        .convert_slice(&["1", "2", "three"], &mut out)
        .unwrap_err();
    assert_eq!(out, [1, 2, 0]);
    insta::assert_snapshot!(err, @r#"at [2]: cannot coerce "three" (&str) into u8: invalid syntax"#);
}

#[test]
fn slices_with_options() {
    let options = FieldMappingOptions::new().rename("full_name", "first");
    let mut out = [User::default()];
    Converter::global()
        .convert_slice_with_options(&[user(1, "Ada", "L")], &mut out, &options)
        .unwrap();
    assert_eq!(out[0].full_name, "Ada");
}

#[test]
fn absent_values_are_a_no_op() {
    let converter = Converter::new();
    let mut out = 7u64;
    converter.convert_optional::<u32, u64>(None, Some(&mut out)).unwrap();
    assert_eq!(out, 7);
    converter.convert_optional::<u32, u64>(Some(&1), None).unwrap();
    converter.convert_optional(Some(&1u32), Some(&mut out)).unwrap();
    assert_eq!(out, 1);
}

#[test]
fn untyped_plans_check_their_types() {
    let converter = Converter::new();
    let plan = converter.plan::<u8, u16>(&FieldMappingOptions::new()).unwrap();
    let plan = plan.conversion_plan();
    assert!(plan.source_shape().is_type::<u8>());
    assert!(plan.destination_shape().is_type::<u16>());

    let mut out = 0u16;
    plan.apply(&9u8, &mut out).unwrap();
    assert_eq!(out, 9);

    let err = plan.apply(&9u32, &mut out).unwrap_err();
    let ConvertError::WrongShape { expected, actual } = err else {
        panic!("expected a shape error, got: {err}");
    };
    assert_eq!(expected, u8::SHAPE);
    assert_eq!(actual, u32::SHAPE);
}

#[test]
fn free_functions_use_the_global_converter() {
    let out: User = shapeshift::convert_to(&user(1, "x", "y")).unwrap();
    assert_eq!(out.id, 1);

    let options = FieldMappingOptions::new();
    let a = Converter::global().plan::<UserIn, User>(&options).unwrap();
    let b = Converter::global().plan::<UserIn, User>(&options).unwrap();
    assert!(Arc::ptr_eq(a.conversion_plan(), b.conversion_plan()));
}
