//! Form auto-registration via the inventory crate.
//!
//! Every non-generic `#[derive(FormClass)]` type submits a [`FormRegistration`],
//! so tools can list and build forms by name without naming the types.

use crate::descriptor::ClassDescriptor;
use crate::errors::Result;
use crate::extractor;
use crate::form::Form;

/// Metadata submitted by the `FormClass` derive macro.
pub struct FormRegistration {
    /// Descriptor name, e.g. "Signup"
    pub type_name: &'static str,
    /// Tag prefix the type's annotations use
    pub tag_prefix: &'static str,
    pub descriptor_fn: fn() -> ClassDescriptor,
}

inventory::collect!(FormRegistration);

impl FormRegistration {
    pub fn descriptor(&self) -> ClassDescriptor {
        (self.descriptor_fn)()
    }

    /// Builds an empty form for the registered type.
    pub fn build(&self) -> Result<Form> {
        extractor::build_from_class(&self.descriptor(), self.tag_prefix)
    }
}

/// All forms linked into the current binary.
pub fn registered_forms() -> impl Iterator<Item = &'static FormRegistration> {
    inventory::iter::<FormRegistration>()
}

/// Looks a registered form up by its descriptor name.
pub fn get_form_by_name(type_name: &str) -> Option<&'static FormRegistration> {
    registered_forms().find(|registration| registration.type_name == type_name)
}
