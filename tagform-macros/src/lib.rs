use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod parsed;

use parsed::ParsedForm;

/// Derives `tagform::FormClass` from the type's doc comments.
///
/// The struct's doc block becomes the class doc block, each named field's doc
/// block becomes a property doc block, and `pub` fields are the public
/// properties. Container options:
///
/// - `#[form(prefix = "form:")]` tag prefix used when extracting annotations
/// - `#[form(name = "Signup")]` descriptor name (defaults to the type name)
///
/// Non-generic types also register themselves for `tagform::registered_forms`.
#[proc_macro_derive(FormClass, attributes(form))]
pub fn derive_form_class(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedForm::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
