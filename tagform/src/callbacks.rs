//! Named predicates that `validate-with` options can refer to by string.
//!
//! Annotations can only carry text, so `@validate-with is_adult` is resolved
//! against this registry when the field is validated.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use log::debug;

use crate::options::Callback;
use crate::value::FieldValue;

/// Predicate registered at link time through `inventory`.
pub struct CallbackRegistration {
    pub name: &'static str,
    pub predicate: fn(&FieldValue) -> bool,
}

inventory::collect!(CallbackRegistration);

static CALLBACKS: OnceLock<RwLock<HashMap<String, Callback>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, Callback>> {
    CALLBACKS.get_or_init(|| {
        let callbacks = inventory::iter::<CallbackRegistration>()
            .map(|registration| {
                let predicate = registration.predicate;
                (
                    registration.name.to_string(),
                    Callback::new(registration.name, move |value: &FieldValue| predicate(value)),
                )
            })
            .collect();
        RwLock::new(callbacks)
    })
}

/// Registers a named predicate. Call during startup.
pub fn register_callback<F>(name: impl Into<String>, predicate: F)
where
    F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
{
    let name = name.into();
    debug!("registering validation callback `{name}`");
    let callback = Callback::new(name.clone(), predicate);
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, callback);
}

/// Looks up a registered predicate by name.
pub fn resolve(name: &str) -> Option<Callback> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}
