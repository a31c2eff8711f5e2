//! Procedural macros for mocktest
//!
//! This crate provides the `#[mocktest::test]` attribute macro, which runs a
//! test between `Registry::setup` and `Registry::teardown` so that every
//! expectation registered by the body is verified when it returns.
//!
//! # Example
//!
//! ```rust,ignore
//! use mocktest::prelude::*;
//!
//! #[mocktest::test]
//! fn sends_one_mail(registry: Registry) {
//!     let mailer = registry.mock_wrapper().unwrap();
//!     mailer.expects("send").unwrap().once();
//!     mailer.mock().invoke("send", args!("hi")).unwrap();
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse::Nothing, parse_macro_input, FnArg, ItemFn, Pat, ReturnType, Type};

/// Determines if a function parameter is requesting a Registry.
fn is_registry_param(arg: &FnArg) -> bool {
    if let FnArg::Typed(pat_type) = arg {
        if let Type::Path(type_path) = &*pat_type.ty {
            if let Some(segment) = type_path.path.segments.last() {
                return segment.ident == "Registry";
            }
        }
    }
    false
}

/// Extracts the parameter pattern from a function argument.
fn get_param_name(arg: &FnArg) -> Option<&Pat> {
    if let FnArg::Typed(pat_type) = arg {
        Some(&pat_type.pat)
    } else {
        None
    }
}

/// Test attribute macro that verifies registered expectations.
///
/// The generated test sets up a fresh `Registry`, runs the body, tears the
/// registry down and fails if any expectation was not met. A panic in the
/// body is re-raised after teardown, so the registry never leaks into the
/// next test.
///
/// # Basic Usage
///
/// ```rust,ignore
/// #[mocktest::test]
/// fn test_without_expectations() {
///     assert_eq!(2 + 2, 4);
/// }
/// ```
///
/// # With Registry Injection
///
/// Add a `registry: Registry` parameter to receive the active registry:
///
/// ```rust,ignore
/// use mocktest::prelude::*;
///
/// #[mocktest::test]
/// fn test_with_registry(registry: Registry) {
///     let wrapper = registry.mock_wrapper().unwrap();
///     wrapper.expects("close").unwrap().once();
///     wrapper.mock().invoke("close", args!()).unwrap();
/// }
/// ```
///
/// The attribute takes no arguments. Test functions must be synchronous and
/// may return any type `#[test]` accepts.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    parse_macro_input!(attr as Nothing);
    let input = parse_macro_input!(item as ItemFn);

    expand_test(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_test(input: &ItemFn) -> syn::Result<TokenStream2> {
    let name = &input.sig.ident;
    let body = &input.block;
    let attrs = &input.attrs;
    let vis = &input.vis;
    let output = &input.sig.output;

    if input.sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            &input.sig,
            "#[mocktest::test] functions must not be async",
        ));
    }

    if let Some(other) = input.sig.inputs.iter().find(|arg| !is_registry_param(arg)) {
        return Err(syn::Error::new_spanned(
            other,
            "only a `Registry` parameter can be injected into a test",
        ));
    }
    if input.sig.inputs.len() > 1 {
        return Err(syn::Error::new_spanned(
            &input.sig.inputs,
            "a test can receive at most one `Registry`",
        ));
    }

    // Bind the injected registry inside the test closure
    let registry_init = match input.sig.inputs.first().and_then(get_param_name) {
        Some(registry_name) => quote! {
            let #registry_name: ::mocktest::Registry = __mocktest_injected;
        },
        None => quote! {
            ::core::mem::drop(__mocktest_injected);
        },
    };

    let closure_output = match output {
        ReturnType::Default => quote! {},
        ReturnType::Type(arrow, ty) => quote! { #arrow #ty },
    };

    Ok(quote! {
        #[::core::prelude::v1::test]
        #(#attrs)*
        #vis fn #name() #output {
            let __mocktest_registry = ::mocktest::Registry::new();
            if let ::core::result::Result::Err(err) = __mocktest_registry.setup() {
                panic!("{}", err);
            }

            let __mocktest_injected = __mocktest_registry.clone();
            let __mocktest_outcome = ::std::panic::catch_unwind(
                ::std::panic::AssertUnwindSafe(move || #closure_output {
                    #registry_init
                    #body
                }),
            );

            let __mocktest_verified = __mocktest_registry.teardown();
            match __mocktest_outcome {
                ::core::result::Result::Err(payload) => ::std::panic::resume_unwind(payload),
                ::core::result::Result::Ok(value) => {
                    if let ::core::result::Result::Err(err) = __mocktest_verified {
                        panic!("{}", err);
                    }
                    value
                }
            }
        }
    })
}
