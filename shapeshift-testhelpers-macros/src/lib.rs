//! The attribute macro behind `#[shapeshift_testhelpers::test]`.

use proc_macro2::{Delimiter, Group, TokenStream, TokenTree};
use quote::quote;

/// Test attribute macro that sets up tracing before running the test.
///
/// # Usage
///
/// ```ignore
/// use shapeshift_testhelpers::test;
///
/// #[test]
/// fn converts_users() {
///     // tracing is set up already
/// }
/// ```
///
/// A different underlying test attribute can be passed as argument, e.g.
/// `#[shapeshift_testhelpers::test(tokio::test)]`.
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let attr = TokenStream::from(attr);
    let mut tokens: Vec<TokenTree> = TokenStream::from(item).into_iter().collect();

    // the body is the trailing brace group; everything before it is the signature
    let body = match tokens.pop() {
        Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Brace => group,
        _ => {
            return quote! {
                ::core::compile_error!("#[shapeshift_testhelpers::test] expects a function with a body");
            }
            .into();
        }
    };

    let statements = body.stream();
    let mut instrumented = Group::new(
        Delimiter::Brace,
        quote! {
            ::shapeshift_testhelpers::setup();

            #statements
        },
    );
    instrumented.set_span(body.span());
    tokens.push(TokenTree::Group(instrumented));
    let function: TokenStream = tokens.into_iter().collect();

    let test_attr = if attr.is_empty() {
        quote! { #[::core::prelude::rust_2024::test] }
    } else {
        quote! { #[#attr] }
    };

    quote! {
        #test_attr
        #function
    }
    .into()
}
