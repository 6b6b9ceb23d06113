//! tagform core library.
//!
//! Forms are declared with `@tag value` annotations on a type's doc comments
//! (or in a TOML/JSON descriptor), extracted into a [`Form`] of [`Field`]s, and
//! validated against named filters, regular expressions or callbacks.

extern crate self as tagform;

pub mod annotations;
pub mod callbacks;
pub mod descriptor;
pub mod errors;
pub mod examples;
pub mod extractor;
pub mod factory;
pub mod field;
pub mod fieldset;
pub mod filters;
pub mod form;
pub mod options;
pub mod registration;
pub mod submission;
pub mod validators;
pub mod value;

pub use annotations::{AnnotationMap, TagValue, extract_tags};
pub use callbacks::{CallbackRegistration, register_callback};
pub use descriptor::{ClassDescriptor, FormClass, PropertyDescriptor};
pub use errors::*;
pub use extractor::{FormConfig, build_from_class, extract_fields_from_class, extract_form_config};
pub use factory::{FieldFactory, FieldTypeRegistration, create_field, register_field_type};
pub use field::Field;
pub use fieldset::{FieldId, FieldSet};
pub use filters::{FilterRegistration, FilterRegistry, StandardFilters, register_filter};
pub use form::Form;
pub use options::{Callback, OptionValue, Options};
pub use registration::{FormRegistration, get_form_by_name, registered_forms};
pub use submission::Submission;
pub use tagform_macros::FormClass;
pub use value::{FieldValue, UploadedFile};

// Re-export inventory for auto-registration in the derive macro
pub use inventory;
