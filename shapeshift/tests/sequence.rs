use shapeshift::{
    ConvertError, Converter, FieldMappingOptions, MismatchReason, PlanKind, convert, convert_to,
    record,
};
use shapeshift_testhelpers::test;

#[test]
fn destination_is_replaced_not_merged() {
    let src = vec![1u8, 2, 3];
    let mut dst = vec![9u16, 9, 9, 9];
    convert(&src, &mut dst).unwrap();
    assert_eq!(dst, [1, 2, 3]);
}

#[test]
fn empty_source_empties_the_destination() {
    let mut dst = vec!["a".to_string(), "b".to_string()];
    convert(&Vec::<i32>::new(), &mut dst).unwrap();
    assert!(dst.is_empty());
}

#[test]
fn large_enough_buffers_are_reused() {
    let mut dst: Vec<i64> = Vec::with_capacity(16);
    dst.extend([7, 7]);
    let before = dst.as_ptr();
    convert(&vec![1i32, 2, 3], &mut dst).unwrap();
    assert_eq!(dst, [1, 2, 3]);
    assert_eq!(dst.as_ptr(), before);
}

#[test]
fn small_buffers_grow() {
    let src: Vec<u32> = (0..1000).collect();
    let mut dst = vec![0u64; 2];
    convert(&src, &mut dst).unwrap();
    assert_eq!(dst.len(), 1000);
    assert_eq!(dst[999], 999);
}

#[test]
fn identical_plain_items_are_block_copied() {
    let converter = Converter::new();
    let plan = converter
        .plan::<Vec<u32>, Vec<u32>>(&FieldMappingOptions::new())
        .unwrap();
    assert_eq!(plan.conversion_plan().kind(), PlanKind::Sequence);
    assert!(plan.conversion_plan().is_bitwise());

    let src = vec![u32::MAX, 0, 42];
    let mut dst = vec![1, 2, 3, 4, 5];
    plan.apply(&src, &mut dst).unwrap();
    assert_eq!(dst, src);

    // strings own heap memory, so they are cloned one by one
    let strings = converter
        .plan::<Vec<String>, Vec<String>>(&FieldMappingOptions::new())
        .unwrap();
    assert!(!strings.conversion_plan().is_bitwise());
    let src = vec!["x".to_string(), "y".to_string()];
    let mut dst = Vec::new();
    strings.apply(&src, &mut dst).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn failing_item_reports_its_index() {
    let src = vec!["1".to_string(), "x".to_string(), "3".to_string()];
    let mut dst: Vec<i32> = Vec::new();
    let err = convert(&src, &mut dst).unwrap_err();
    // items before the failure are converted, the rest hold defaults
    assert_eq!(dst, [1, 0, 0]);
    insta::assert_snapshot!(err, @r#"at [1]: cannot coerce "x" (String) into i32: invalid syntax"#);
}

#[test]
fn incompatible_items() {
    let err = convert_to::<Vec<Vec<u8>>, Vec<u8>>(&vec![vec![1]]).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::StructuralMismatch {
            reason: MismatchReason::Element(_),
            ..
        }
    ));
    insta::assert_snapshot!(err, @"no conversion available from alloc::vec::Vec<alloc::vec::Vec<u8>> to alloc::vec::Vec<u8>: items: no conversion available from alloc::vec::Vec<u8> to u8: cannot turn a list into a scalar");
}

record! {
    #[derive(Default)]
    struct Reading {
        sensor: String,
        value: f32,
    }

    #[derive(Default, Debug, PartialEq)]
    struct Sample {
        sensor: String,
        value: f64,
    }
}

#[test]
fn lists_of_structs() {
    let readings = vec![
        Reading {
            sensor: "t1".into(),
            value: 0.5,
        },
        Reading {
            sensor: "t2".into(),
            value: -1.25,
        },
    ];
    let samples: Vec<Sample> = convert_to(&readings).unwrap();
    assert_eq!(
        samples,
        [
            Sample {
                sensor: "t1".into(),
                value: 0.5
            },
            Sample {
                sensor: "t2".into(),
                value: -1.25
            },
        ]
    );
}

record! {
    #[derive(Default)]
    struct RoundedSample {
        sensor: String,
        value: i32,
    }
}

#[test]
fn nested_failure_path() {
    let readings = vec![
        Reading::default(),
        Reading {
            sensor: "t".into(),
            value: f32::NAN,
        },
    ];
    let mut out: Vec<RoundedSample> = Vec::new();
    let err = convert(&readings, &mut out).unwrap_err();
    assert!(!err.is_structural());
    insta::assert_snapshot!(err, @"at [1].value: cannot coerce NaN (f32) into i32: not a finite number");
}
