use shapeshift_core::{Def, DefKind, Reflect, Shape, impl_record, record, shape_of};
use shapeshift_testhelpers::test;

record! {
    #[derive(Default)]
    pub struct Line {
        pub sku: String,
        pub qty: u32,
        pub note: Option<String>,
    }

    #[derive(Default)]
    pub struct Tree {
        pub label: &'static str,
        pub children: Vec<Tree>,
    }
}

#[test]
fn fields_follow_declaration_order() {
    let Def::Struct(sd) = Line::SHAPE.def else {
        panic!("Line should be a struct");
    };
    let names: Vec<_> = sd.fields.iter().map(|f| f.name).collect();
    assert_eq!(names, ["sku", "qty", "note"]);

    let qty = sd.field("qty").unwrap();
    assert_eq!(qty.offset, core::mem::offset_of!(Line, qty));
    assert!(qty.shape().is_type::<u32>());
    assert!(qty.byte_range().end <= Line::SHAPE.layout.size());
    assert!(sd.field("missing").is_none());
}

#[test]
fn recursive_records_resolve_lazily() {
    let Def::Struct(sd) = Tree::SHAPE.def else {
        panic!("Tree should be a struct");
    };
    let children = sd.field("children").unwrap().shape();
    let Def::List(ld) = children.def else {
        panic!("children should be a list");
    };
    assert_eq!(ld.t(), Tree::SHAPE);
}

#[test]
fn shapes_compare_by_type() {
    assert_eq!(shape_of::<Line>(), Line::SHAPE);
    assert_ne!(Line::SHAPE, Tree::SHAPE);
    assert!(!Line::SHAPE.bitwise);
    assert!(u64::SHAPE.bitwise);
    assert!(!String::SHAPE.bitwise);
    assert_eq!(Option::<u8>::SHAPE.def.kind(), DefKind::Option);
    assert!(Option::<u8>::SHAPE.is_indirection());
    assert!(Box::<u8>::SHAPE.is_indirection());
    assert!(!Vec::<u8>::SHAPE.is_indirection());
    assert_eq!(Vec::<u8>::SHAPE.to_string(), "alloc::vec::Vec<u8>");
}

#[allow(dead_code)]
#[derive(Default)]
struct Partial {
    visible: i32,
    hidden: Vec<u8>,
}

impl_record!(Partial { visible: i32 });

#[test]
fn impl_record_lists_only_the_given_fields() {
    let shape: &Shape = Partial::SHAPE;
    let Def::Struct(sd) = shape.def else {
        panic!("Partial should be a struct");
    };
    assert_eq!(sd.fields.len(), 1);
    assert_eq!(sd.fields[0].name, "visible");
    assert_eq!(shape.layout, core::alloc::Layout::new::<Partial>());
}
