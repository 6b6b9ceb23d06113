//! Type-tag lookup table for creating fields.

use std::collections::HashMap;
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use log::debug;

use crate::errors::{FormError, Result};
use crate::field::Field;

/// Hook run on every freshly created field of a type.
pub type FieldInit = fn(&mut Field);

/// Field type registered at link time through `inventory`.
pub struct FieldTypeRegistration {
    pub tag: &'static str,
    pub init: FieldInit,
}

inventory::collect!(FieldTypeRegistration);

fn no_init(_: &mut Field) {}

fn checkbox_init(field: &mut Field) {
    field.set_option("type", "checkbox");
}

fn radio_init(field: &mut Field) {
    field.set_option("type", "radio");
}

fn password_init(field: &mut Field) {
    field.set_option("type", "password");
}

fn hidden_init(field: &mut Field) {
    field.set_option("type", "hidden");
}

fn file_init(field: &mut Field) {
    field.set_option("type", "file");
}

fn button_init(field: &mut Field) {
    field.set_option("type", "button");
}

fn submit_init(field: &mut Field) {
    field.set_option("type", "submit");
}

const BUILTIN_TYPES: &[(&str, FieldInit)] = &[
    ("Input", no_init),
    ("Textarea", no_init),
    ("Select", no_init),
    ("Checkbox", checkbox_init),
    ("Radio", radio_init),
    ("Password", password_init),
    ("Hidden", hidden_init),
    ("File", file_init),
    ("Button", button_init),
    ("Submit", submit_init),
];

/// Maps type tags to field initializers.
#[derive(Clone)]
pub struct FieldFactory {
    types: HashMap<String, FieldInit>,
}

impl fmt::Debug for FieldFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldFactory").field("types", &self.tags()).finish()
    }
}

impl FieldFactory {
    /// Factory holding the built-in catalog.
    pub fn new() -> Self {
        let types = BUILTIN_TYPES
            .iter()
            .map(|(tag, init)| (tag.to_string(), *init))
            .collect();
        Self { types }
    }

    /// Built-ins plus every [`FieldTypeRegistration`] linked into the binary.
    pub fn with_registered() -> Self {
        let mut factory = Self::new();
        for registration in inventory::iter::<FieldTypeRegistration>() {
            factory.register(registration.tag, registration.init);
        }
        factory
    }

    /// Adds or replaces a field type.
    pub fn register(&mut self, tag: impl Into<String>, init: FieldInit) {
        let tag = tag.into();
        debug!("registering field type `{tag}`");
        self.types.insert(tag, init);
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.resolve(tag).is_some()
    }

    /// Sorted list of known tags.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.types.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Creates a field of type `tag` named `name`.
    ///
    /// The exact tag is tried first, then the tag with its first letter
    /// upper-cased, so `select` resolves to `Select`.
    pub fn create(&self, tag: &str, name: impl Into<String>) -> Result<Field> {
        let (kind, init) = self.resolve(tag).ok_or_else(|| FormError::UnknownFieldType { tag: tag.to_string() })?;
        let mut field = Field::new(kind, name);
        init(&mut field);
        Ok(field)
    }

    fn resolve(&self, tag: &str) -> Option<(&str, FieldInit)> {
        if let Some((kind, init)) = self.types.get_key_value(tag) {
            return Some((kind.as_str(), *init));
        }
        let capitalized = capitalize(tag);
        self.types
            .get_key_value(capitalized.as_str())
            .map(|(kind, init)| (kind.as_str(), *init))
    }
}

impl Default for FieldFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

static FACTORY: OnceLock<RwLock<FieldFactory>> = OnceLock::new();

fn registry() -> &'static RwLock<FieldFactory> {
    FACTORY.get_or_init(|| RwLock::new(FieldFactory::with_registered()))
}

/// Creates a field through the process-wide factory.
pub fn create_field(tag: &str, name: impl Into<String>) -> Result<Field> {
    registry().read().unwrap_or_else(PoisonError::into_inner).create(tag, name)
}

/// Registers a field type with the process-wide factory. Call during startup.
pub fn register_field_type(tag: impl Into<String>, init: FieldInit) {
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(tag, init);
}

/// Snapshot of the process-wide factory.
pub fn global_factory() -> FieldFactory {
    registry().read().unwrap_or_else(PoisonError::into_inner).clone()
}
