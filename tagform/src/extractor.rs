//! Builds forms from the tags found in a [`ClassDescriptor`].

use indexmap::IndexMap;
use log::debug;

use crate::annotations::{self, AnnotationMap};
use crate::descriptor::{ClassDescriptor, PropertyDescriptor};
use crate::errors::Result;
use crate::factory::{self, FieldFactory};
use crate::field::Field;
use crate::form::Form;
use crate::options::{self, Options};

/// Property tag naming the field type.
pub const FIELD_TAG: &str = "field";
/// Property tag naming the collection key.
pub const LABEL_TAG: &str = "label";
/// Property flag excluding the property from the form.
pub const IGNORE_TAG: &str = "ignore";
pub const TEMPLATE_TAG: &str = "template";
pub const FIELD_TEMPLATE_TAG: &str = "field-template";

pub const DEFAULT_FIELD_TYPE: &str = "Input";

/// Class-level settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormConfig {
    pub attributes: Options,
    pub template: Option<String>,
    pub field_template: Option<String>,
}

/// Creates one field per public, non-ignored property, keyed by label.
pub fn extract_fields_from_class(descriptor: &ClassDescriptor, prefix: &str) -> Result<IndexMap<String, Field>> {
    extract_fields_from_class_with(descriptor, prefix, &factory::global_factory())
}

pub fn extract_fields_from_class_with(
    descriptor: &ClassDescriptor,
    prefix: &str,
    factory: &FieldFactory,
) -> Result<IndexMap<String, Field>> {
    descriptor.validate()?;

    let mut fields = IndexMap::new();
    for property in descriptor.public_properties() {
        let mut tags = annotations::extract_tags(property.doc_block(), prefix);
        if tags.contains_key(IGNORE_TAG) {
            debug!("{}::{} is ignored", descriptor.name, property.name);
            continue;
        }
        let (label, field) = property_field(property, &mut tags, factory)?;
        if fields.contains_key(&label) {
            debug!("{}: label `{label}` is declared twice, keeping `{}`", descriptor.name, property.name);
        }
        fields.insert(label, field);
    }
    Ok(fields)
}

fn property_field(
    property: &PropertyDescriptor,
    tags: &mut AnnotationMap,
    factory: &FieldFactory,
) -> Result<(String, Field)> {
    let kind = pop_text(tags, FIELD_TAG).unwrap_or_else(|| DEFAULT_FIELD_TYPE.to_string());
    let label = pop_text(tags, LABEL_TAG).unwrap_or_else(|| property.name.clone());

    let mut field = factory.create(&kind, property.name.as_str())?;
    field.set_options(options::options_from_tags(std::mem::take(tags)));
    debug!(
        "field `{}` ({}) labelled `{label}` with {} option(s)",
        property.name,
        field.kind(),
        field.options().len()
    );
    Ok((label, field))
}

/// Removes `key`, returning its last textual value. A bare flag yields `None`.
fn pop_text(tags: &mut AnnotationMap, key: &str) -> Option<String> {
    tags.shift_remove(key)?.last_text().map(str::to_string)
}

/// Reads the class-level tags.
pub fn extract_form_config(descriptor: &ClassDescriptor, prefix: &str) -> FormConfig {
    let mut tags = annotations::extract_tags(descriptor.doc_block(), prefix);
    let template = pop_text(&mut tags, TEMPLATE_TAG);
    let field_template = pop_text(&mut tags, FIELD_TEMPLATE_TAG);
    FormConfig {
        attributes: options::options_from_tags(tags),
        template,
        field_template,
    }
}

/// Builds a complete form with the process-wide field factory.
pub fn build_from_class(descriptor: &ClassDescriptor, prefix: &str) -> Result<Form> {
    build_from_class_with(descriptor, prefix, &factory::global_factory())
}

pub fn build_from_class_with(descriptor: &ClassDescriptor, prefix: &str, factory: &FieldFactory) -> Result<Form> {
    let fields = extract_fields_from_class_with(descriptor, prefix, factory)?;
    let config = extract_form_config(descriptor, prefix);

    let mut form = Form::new();
    if let Some(template) = config.template {
        form.set_form_template(template);
    }
    if let Some(template) = config.field_template {
        form.set_field_template(template);
    }
    form.set_fields(fields);
    form.set_attributes(config.attributes);

    debug!(
        "built form `{}` with {} field(s)",
        descriptor.name,
        form.field_set().len()
    );
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PropertyDescriptor;
    use crate::errors::FormError;
    use crate::options::OptionValue;

    fn contact() -> ClassDescriptor {
        ClassDescriptor::new("Contact")
            .with_doc("@template forms/contact.html\n@field-template forms/row.html\n@method post\n@class contact")
            .property("email", "@label E-mail\n@validate validate_email\n@required")
            .property("message", "@field Textarea\n@rows 5")
            .property("honeypot", "@ignore")
    }

    #[test]
    fn fields_are_keyed_by_label() {
        let fields = extract_fields_from_class(&contact(), "").unwrap();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["E-mail", "message"]);

        let email = &fields["E-mail"];
        assert_eq!(email.kind(), "Input");
        assert_eq!(email.name(), "email");
        assert_eq!(email.option("validate"), Some(&OptionValue::from("validate_email")));
        assert_eq!(email.option("required"), Some(&OptionValue::Bool(true)));
        assert!(!email.has_option("label"));

        let message = &fields["message"];
        assert_eq!(message.kind(), "Textarea");
        assert!(!message.has_option("field"));
        assert_eq!(message.option("rows"), Some(&OptionValue::from("5")));
    }

    #[test]
    fn private_properties_are_skipped() {
        let mut descriptor = contact();
        descriptor
            .properties
            .push(PropertyDescriptor::new("token").with_doc("@field Hidden").private());
        let fields = extract_fields_from_class(&descriptor, "").unwrap();
        assert!(fields.values().all(|field| field.name() != "token"));
    }

    #[test]
    fn undocumented_properties_become_inputs() {
        let descriptor = ClassDescriptor::new("Plain").property("nickname", "");
        let fields = extract_fields_from_class(&descriptor, "").unwrap();
        assert_eq!(fields["nickname"].kind(), "Input");
        assert!(fields["nickname"].options().is_empty());
    }

    #[test]
    fn duplicate_labels_keep_the_last_property() {
        let descriptor = ClassDescriptor::new("Dupes")
            .property("first", "@label Name")
            .property("second", "@label Name");
        let fields = extract_fields_from_class(&descriptor, "").unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["Name"].name(), "second");
    }

    #[test]
    fn repeated_type_tags_use_the_last_value() {
        let descriptor = ClassDescriptor::new("Twice").property("bio", "@field Input\n@field textarea");
        let fields = extract_fields_from_class(&descriptor, "").unwrap();
        assert_eq!(fields["bio"].kind(), "Textarea");
    }

    #[test]
    fn unknown_types_are_errors() {
        let descriptor = ClassDescriptor::new("Odd").property("when", "@field DatePicker");
        let err = extract_fields_from_class(&descriptor, "").unwrap_err();
        assert!(matches!(err, FormError::UnknownFieldType { ref tag } if tag == "DatePicker"));
    }

    #[test]
    fn broken_descriptors_are_rejected() {
        let descriptor = ClassDescriptor::new("").property("a", "");
        assert!(matches!(
            extract_fields_from_class(&descriptor, ""),
            Err(FormError::Descriptor { .. })
        ));
    }

    #[test]
    fn prefixed_tags_only() {
        let descriptor = ClassDescriptor::new("Prefixed")
            .with_doc("@form:method get\n@method post")
            .property("q", "@form:label Search\n@label Ignored\n@form:required");
        let fields = extract_fields_from_class(&descriptor, "form:").unwrap();
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["Search"]);
        assert_eq!(fields["Search"].option("required"), Some(&OptionValue::Bool(true)));

        let config = extract_form_config(&descriptor, "form:");
        assert_eq!(config.attributes.get("method"), Some(&OptionValue::from("get")));
        assert_eq!(config.attributes.len(), 1);
    }

    #[test]
    fn templates_are_split_from_attributes() {
        let config = extract_form_config(&contact(), "");
        assert_eq!(config.template.as_deref(), Some("forms/contact.html"));
        assert_eq!(config.field_template.as_deref(), Some("forms/row.html"));
        assert_eq!(config.attributes.keys().collect::<Vec<_>>(), vec!["method", "class"]);
    }

    #[test]
    fn builds_complete_forms() {
        let form = build_from_class(&contact(), "").unwrap();
        assert_eq!(form.form_template(), Some("forms/contact.html"));
        assert_eq!(form.field_template(), Some("forms/row.html"));
        assert_eq!(form.attributes_as_string(None, false), r#"method="post" class="contact""#);
        assert_eq!(form.labels().collect::<Vec<_>>(), vec!["E-mail", "message"]);
        assert!(form.field("email").is_some());
    }

    #[test]
    fn custom_factories_supply_types() {
        fn slider(field: &mut Field) {
            field.set_option("type", "range");
        }
        let mut factory = FieldFactory::new();
        factory.register("Slider", slider);

        let descriptor = ClassDescriptor::new("Volume").property("level", "@field slider\n@max 11");
        let form = build_from_class_with(&descriptor, "", &factory).unwrap();
        let level = form.field("level").unwrap();
        assert_eq!(level.kind(), "Slider");
        assert_eq!(level.options_as_attribute_string(None, false), r#"type="range" max="11""#);
    }
}
