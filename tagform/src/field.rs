//! A single form input: identity, value, options and validation.
//!
//! Parent-dependent identity (fullname, element id) lives on
//! [`crate::fieldset::FieldSet`], which owns the fields a parent index points into.

use log::warn;

use crate::callbacks;
use crate::errors::{ValidationIssue, codes};
use crate::fieldset::FieldId;
use crate::filters::{self, FilterRegistry};
use crate::options::{self, OptionValue, Options};
use crate::value::FieldValue;

/// Option holding the `validate-with` predicate.
pub const VALIDATE_WITH: &str = "validate-with";
/// Option holding a filter name or a `/regexp/`.
pub const VALIDATE: &str = "validate";
/// Flag option making an empty value invalid.
pub const REQUIRED: &str = "required";

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    kind: String,
    name: String,
    parent: Option<FieldId>,
    value: FieldValue,
    options: Options,
    validation_messages: Vec<String>,
}

impl Field {
    /// Creates a bare field. Prefer [`crate::factory::FieldFactory::create`],
    /// which also runs the type's init hook.
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            parent: None,
            value: FieldValue::default(),
            options: Options::new(),
            validation_messages: Vec::new(),
        }
    }

    /// Builder-style variant of [`Field::set_option`].
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set_option(name, value);
        self
    }

    /// The type tag the field was created with.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Index of the enclosing field within its [`crate::fieldset::FieldSet`].
    pub fn parent(&self) -> Option<FieldId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<FieldId>) {
        self.parent = parent;
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<FieldValue>) {
        self.value = value.into();
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Sets one option. A new name goes to the end of the attribute order; an
    /// existing name keeps its position.
    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.options.insert(name.into(), value.into());
    }

    /// Merges `options` into the current ones.
    pub fn set_options<I, K, V>(&mut self, options: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<OptionValue>,
    {
        for (name, value) in options {
            self.set_option(name, value);
        }
    }

    pub fn remove_option(&mut self, name: &str) -> Option<OptionValue> {
        self.options.shift_remove(name)
    }

    /// Drops every option, including a memoized `id`.
    pub fn clear_options(&mut self) {
        self.options.clear();
    }

    /// The `id` option if it has been set or memoized.
    pub fn id_option(&self) -> Option<&str> {
        self.option("id").and_then(OptionValue::as_str)
    }

    /// String options rendered as `name="value"` pairs; see
    /// [`options::attribute_string`].
    pub fn options_as_attribute_string(&self, filter: Option<&[&str]>, exclude: bool) -> String {
        options::attribute_string(&self.options, filter, exclude)
    }

    /// The `class` option followed by `append`, trimmed.
    pub fn css_classes(&self, append: &str) -> String {
        let base = self.option("class").and_then(OptionValue::as_str).unwrap_or_default();
        format!("{base}{append}").trim().to_string()
    }

    /// Messages produced by the most recent validation.
    pub fn validation_messages(&self) -> &[String] {
        &self.validation_messages
    }

    /// Validates against the process-wide filter catalog.
    pub fn is_valid(&mut self) -> bool {
        let filters = filters::global_filters();
        self.is_valid_with(&filters)
    }

    pub fn is_valid_with(&mut self, filters: &dyn FilterRegistry) -> bool {
        self.validate_with(filters).is_ok()
    }

    /// Runs the validation rules, stopping at the first failing one.
    ///
    /// Messages are reset first; a failure leaves exactly one message behind.
    pub fn validate_with(&mut self, filters: &dyn FilterRegistry) -> Result<(), ValidationIssue> {
        self.validation_messages.clear();
        let outcome = self.evaluate(filters);
        if let Err(issue) = &outcome {
            self.validation_messages.push(issue.message.clone());
        }
        outcome
    }

    fn evaluate(&self, filters: &dyn FilterRegistry) -> Result<(), ValidationIssue> {
        let name = &self.name;

        let required = self.option(REQUIRED).is_some_and(OptionValue::is_truthy);
        if required && self.value.is_empty() {
            return Err(self.issue(codes::REQUIRED, format!("{name} is required")));
        }

        if let Some(validate_with) = self.option(VALIDATE_WITH) {
            let (callback_name, passed) = self.run_callback(validate_with);
            if passed {
                return Ok(());
            }
            return Err(self.issue(
                codes::CALLBACK,
                format!("{name} failed to validate because {callback_name}() returned false"),
            ));
        }

        let Some(validate) = self.option(VALIDATE) else {
            return Ok(());
        };

        let passed = match validate.as_str() {
            Some(filter) if filters.has_filter(filter) => {
                filters.apply_named_filter(filter, &self.value, &self.options)
            }
            Some(pattern) if filters::is_regexp_spec(pattern) => filters.apply_regexp_filter(pattern, &self.value),
            _ => {
                return Err(self.issue(
                    codes::RULE,
                    format!("{name} failed to validate because the validation string is neither a filter or a regexp"),
                ));
            }
        };

        if passed {
            Ok(())
        } else {
            Err(self.issue(codes::FILTER, format!("{name} is not valid")))
        }
    }

    /// Calls the `validate-with` predicate with this field's own value.
    fn run_callback(&self, option: &OptionValue) -> (String, bool) {
        match option {
            OptionValue::Callback(callback) => (callback.name().to_string(), callback.call(&self.value)),
            OptionValue::Str(callback_name) => match callbacks::resolve(callback_name) {
                Some(callback) => (callback_name.clone(), callback.call(&self.value)),
                None => {
                    warn!("field `{}` names unknown validation callback `{callback_name}`", self.name);
                    (callback_name.clone(), false)
                }
            },
            other => {
                warn!("field `{}` has a non-callable `{VALIDATE_WITH}` option: {other:?}", self.name);
                (VALIDATE_WITH.to_string(), false)
            }
        }
    }

    fn issue(&self, code: &str, message: String) -> ValidationIssue {
        ValidationIssue::new(self.name.clone(), code, message)
    }
}
