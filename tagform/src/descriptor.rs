//! Ahead-of-time descriptions of form types.
//!
//! A [`ClassDescriptor`] carries exactly what the extractor reads: the type's
//! doc block and its properties with their own doc blocks. It is produced by
//! `#[derive(FormClass)]` or loaded from TOML/JSON configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{FormError, Result};
use crate::extractor;
use crate::form::Form;
use crate::submission::Submission;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Only public properties become fields.
    #[serde(default = "default_public")]
    pub public: bool,
}

fn default_public() -> bool {
    true
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Appends a public property.
    pub fn property(mut self, name: impl Into<String>, doc: impl Into<String>) -> Self {
        self.properties.push(PropertyDescriptor::new(name).with_doc(doc));
        self
    }

    /// The doc block, or an empty string when the type has none.
    pub fn doc_block(&self) -> &str {
        self.doc.as_deref().unwrap_or_default()
    }

    /// Public properties in declaration order.
    pub fn public_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|property| property.public)
    }

    /// Rejects descriptors the extractor cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FormError::descriptor("class name is empty"));
        }
        if let Some(position) = self.properties.iter().position(|property| property.name.trim().is_empty()) {
            return Err(FormError::descriptor(format!(
                "property #{position} of `{}` has no name",
                self.name
            )));
        }
        Ok(())
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Loads a descriptor file; `.json` files are read as JSON, anything else
    /// as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            _ => Self::from_toml_str(&source),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|err| FormError::descriptor(err.to_string()))
    }
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            public: true,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn doc_block(&self) -> &str {
        self.doc.as_deref().unwrap_or_default()
    }
}

/// Types that describe a form through their annotations.
///
/// Usually implemented with `#[derive(FormClass)]`, which turns the type's
/// doc comments into a [`ClassDescriptor`]:
///
/// ```
/// use tagform::{FormClass, Submission};
///
/// /// @template forms/signup.html
/// /// @method post
/// #[derive(FormClass)]
/// pub struct Signup {
///     /// @label Username
///     /// @required
///     pub username: String,
///     /// @field Password
///     /// @validate /^.{8,}$/
///     pub password: String,
/// }
///
/// let submission = Submission::new().field("username", "ada").field("password", "short");
/// let mut form = Signup::build_form(&submission).unwrap();
/// assert_eq!(form.form_template(), Some("forms/signup.html"));
/// assert!(!form.is_valid());
/// assert_eq!(form.validation_messages(), vec!["password is not valid".to_string()]);
/// ```
pub trait FormClass {
    /// Prefix every tag must carry, e.g. `"form:"` for `@form:label`.
    const TAG_PREFIX: &'static str = "";

    fn class_descriptor() -> ClassDescriptor;

    /// Builds an empty form from the type's annotations.
    fn form() -> Result<Form> {
        extractor::build_from_class(&Self::class_descriptor(), Self::TAG_PREFIX)
    }

    /// Builds the form and applies a submission to it.
    fn build_form(submission: &Submission) -> Result<Form> {
        let mut form = Self::form()?;
        form.set_data(submission.merged());
        Ok(form)
    }
}
