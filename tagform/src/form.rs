//! Container tying fields, form attributes and templates together.

use indexmap::IndexMap;
use log::{debug, warn};

use crate::errors::{FormError, Result, ValidationError, ValidationResult};
use crate::field::Field;
use crate::fieldset::{FieldId, FieldSet};
use crate::filters::{self, FilterRegistry};
use crate::options::{self, OptionValue, Options};
use crate::value::FieldValue;

/// A form: labelled top-level fields, their nested children, form-level
/// attributes and template names.
#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: FieldSet,
    labels: IndexMap<String, FieldId>,
    attributes: Options,
    form_template: Option<String>,
    field_template: Option<String>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form_template(&self) -> Option<&str> {
        self.form_template.as_deref()
    }

    pub fn set_form_template(&mut self, template: impl Into<String>) {
        self.form_template = Some(template.into());
    }

    pub fn field_template(&self) -> Option<&str> {
        self.field_template.as_deref()
    }

    pub fn set_field_template(&mut self, template: impl Into<String>) {
        self.field_template = Some(template.into());
    }

    /// Replaces every field with `fields`, keyed by label.
    pub fn set_fields<I, L>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (L, Field)>,
        L: Into<String>,
    {
        self.fields = FieldSet::new();
        self.labels.clear();
        for (label, field) in fields {
            self.add_field(label, field);
        }
    }

    /// Adds a top-level field under `label`. Reusing a label replaces the
    /// field stored there, along with any children nested under it.
    pub fn add_field(&mut self, label: impl Into<String>, field: Field) -> FieldId {
        let label = label.into();
        if let Some(&existing) = self.labels.get(&label)
            && self.fields.get(existing).is_some()
        {
            debug!("label `{label}` reassigned to field `{}`", field.name());
            if let Err(err) = self.fields.replace(existing, field) {
                warn!("could not replace field under label `{label}`: {err}");
            }
            return existing;
        }
        let id = self.fields.insert(field);
        self.labels.insert(label, id);
        id
    }

    /// Adds `field` nested under `parent`. Children carry no label; address
    /// them by fullname.
    pub fn add_child(&mut self, parent: FieldId, field: Field) -> Result<FieldId> {
        let id = self.fields.insert(field);
        self.fields.set_parent(id, Some(parent))?;
        Ok(id)
    }

    /// Labelled top-level fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldId, &Field)> {
        self.labels.iter().filter_map(|(label, &id)| {
            let field = self.fields.get(id)?;
            Some((label.as_str(), id, field))
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    pub fn field_set(&self) -> &FieldSet {
        &self.fields
    }

    pub fn field_set_mut(&mut self) -> &mut FieldSet {
        &mut self.fields
    }

    /// Looks a field up by fullname (`name` for top-level fields).
    pub fn field(&self, fullname: &str) -> Option<&Field> {
        self.fields.get(self.field_id(fullname)?)
    }

    pub fn field_mut(&mut self, fullname: &str) -> Option<&mut Field> {
        let id = self.field_id(fullname)?;
        self.fields.get_mut(id)
    }

    pub fn field_id(&self, fullname: &str) -> Option<FieldId> {
        self.fields.find_by_fullname(fullname)
    }

    pub fn field_by_label(&self, label: &str) -> Option<&Field> {
        self.fields.get(*self.labels.get(label)?)
    }

    /// Current value of the field with this fullname.
    pub fn value(&self, fullname: &str) -> Option<&FieldValue> {
        self.field(fullname).map(Field::value)
    }

    pub fn set_value(&mut self, fullname: &str, value: impl Into<FieldValue>) -> Result<()> {
        let field = self.field_mut(fullname).ok_or_else(|| FormError::UnknownField {
            name: fullname.to_string(),
        })?;
        field.set_value(value);
        Ok(())
    }

    /// Copies submitted values onto the fields whose fullname matches each
    /// key. Keys without a field are ignored.
    pub fn set_data<I, K, V>(&mut self, data: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        for (key, value) in data {
            let key = key.as_ref();
            match self.field_mut(key) {
                Some(field) => field.set_value(value),
                None => debug!("ignoring submitted value for unknown field `{key}`"),
            }
        }
    }

    /// Every field's value keyed by fullname.
    pub fn data(&self) -> IndexMap<String, FieldValue> {
        self.fields
            .iter()
            .filter_map(|(id, field)| Some((self.fields.fullname(id)?, field.value().clone())))
            .collect()
    }

    pub fn attributes(&self) -> &Options {
        &self.attributes
    }

    pub fn set_attributes(&mut self, attributes: Options) {
        self.attributes = attributes;
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attributes_as_string(&self, filter: Option<&[&str]>, exclude: bool) -> String {
        options::attribute_string(&self.attributes, filter, exclude)
    }

    pub fn fullname(&self, id: FieldId) -> Option<String> {
        self.fields.fullname(id)
    }

    pub fn element_id(&mut self, id: FieldId) -> Option<String> {
        self.fields.element_id(id)
    }

    /// Validates every field against the process-wide filter catalog.
    pub fn is_valid(&mut self) -> bool {
        let filters = filters::global_filters();
        self.is_valid_with(&filters)
    }

    /// Validates every field; one failing field does not stop the others.
    pub fn is_valid_with(&mut self, filters: &dyn FilterRegistry) -> bool {
        self.validate_with(filters).is_ok()
    }

    pub fn validate(&mut self) -> ValidationResult<()> {
        let filters = filters::global_filters();
        self.validate_with(&filters)
    }

    /// Like [`Form::is_valid_with`], reporting issues keyed by fullname.
    pub fn validate_with(&mut self, filters: &dyn FilterRegistry) -> ValidationResult<()> {
        let fullnames: Vec<Option<String>> = self.fields.iter().map(|(id, _)| self.fields.fullname(id)).collect();
        let mut issues = Vec::new();
        for ((_, field), fullname) in self.fields.iter_mut().zip(fullnames) {
            if let Err(mut issue) = field.validate_with(filters) {
                if let Some(fullname) = fullname {
                    issue.field = fullname;
                }
                issues.push(issue);
            }
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }

    /// Messages left by the last validation, in field order.
    pub fn validation_messages(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|(_, field)| field.validation_messages().iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::codes;
    use crate::field::{REQUIRED, VALIDATE};
    use crate::filters::StandardFilters;
    use crate::value::UploadedFile;

    fn address_form() -> (Form, FieldId) {
        let mut form = Form::new();
        form.add_field("Name", Field::new("Input", "name").with_option(REQUIRED, true));
        let address = form.add_field("Address", Field::new("Input", "address"));
        form.add_child(address, Field::new("Input", "city").with_option(REQUIRED, true))
            .unwrap();
        form.add_child(address, Field::new("Input", "zip").with_option(VALIDATE, "/^[0-9]{5}$/"))
            .unwrap();
        (form, address)
    }

    #[test]
    fn set_data_matches_fullnames() {
        let (mut form, _) = address_form();
        form.set_data([("name", "Ada"), ("address[city]", "London"), ("unknown", "x")]);
        assert_eq!(form.value("name"), Some(&FieldValue::from("Ada")));
        assert_eq!(form.value("address[city]"), Some(&FieldValue::from("London")));
        assert_eq!(form.value("city"), None);
        assert_eq!(form.data().keys().collect::<Vec<_>>(), vec!["name", "address", "address[city]", "address[zip]"]);
    }

    #[test]
    fn validation_runs_every_field() {
        let (mut form, _) = address_form();
        form.set_data([("address[zip]", "12ab")]);
        let filters = StandardFilters::new();
        assert!(!form.is_valid_with(&filters));
        assert_eq!(
            form.validation_messages(),
            vec!["name is required", "city is required", "zip is not valid"]
        );

        let err = form.validate_with(&filters).unwrap_err();
        let fields: Vec<_> = err.issues.iter().map(|issue| issue.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "address[city]", "address[zip]"]);
        assert_eq!(err.issues[2].code, codes::FILTER);
    }

    #[test]
    fn callbacks_may_register_filters_during_form_validation() {
        let mut form = Form::new();
        form.add_field(
            "Code",
            Field::new("Input", "code").with_option(
                crate::field::VALIDATE_WITH,
                crate::options::Callback::new("registers", |_: &FieldValue| {
                    filters::register_filter("form_test_registered_late", |_, _| true);
                    true
                }),
            ),
        );
        assert!(form.is_valid());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn valid_forms_clear_messages() {
        let (mut form, _) = address_form();
        assert!(!form.is_valid());
        form.set_data([("name", "Ada"), ("address[city]", "Paris"), ("address[zip]", "75001")]);
        assert!(form.is_valid());
        assert!(form.validation_messages().is_empty());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn labels_index_top_level_fields() {
        let (form, address) = address_form();
        assert_eq!(form.labels().collect::<Vec<_>>(), vec!["Name", "Address"]);
        assert_eq!(form.field_by_label("Address").map(Field::name), Some("address"));
        assert_eq!(form.fields().nth(1).map(|(_, id, _)| id), Some(address));
        assert_eq!(form.field_set().children(address).count(), 2);
    }

    #[test]
    fn reused_labels_replace_fields() {
        let mut form = Form::new();
        let first = form.add_field("Email", Field::new("Input", "email"));
        let second = form.add_field("Email", Field::new("Input", "contact_email"));
        assert_eq!(first, second);
        assert_eq!(form.field_set().len(), 1);
        assert_eq!(form.field_by_label("Email").map(Field::name), Some("contact_email"));
    }

    #[test]
    fn replaced_fields_take_no_parent_from_another_form() {
        let (source, _) = address_form();
        let city = source.field("address[city]").cloned().unwrap();
        assert!(city.parent().is_some());

        let mut form = Form::new();
        let first = form.add_field("Town", city.clone());
        let second = form.add_field("Town", city);
        assert_eq!(first, second);
        assert_eq!(form.field_set().parent(first), None);
        assert_eq!(form.fullname(first).as_deref(), Some("city"));
        assert_eq!(form.data().keys().collect::<Vec<_>>(), vec!["city"]);
    }

    #[test]
    fn replaced_fields_drop_the_old_children() {
        let (mut form, address) = address_form();
        let replaced = form.add_field("Address", Field::new("Input", "email"));
        assert_eq!(replaced, address);
        assert_eq!(form.field_set().children(address).count(), 0);
        assert_eq!(form.data().keys().collect::<Vec<_>>(), vec!["name", "email"]);
        assert!(form.field("email[city]").is_none());
    }

    #[test]
    fn element_ids_follow_nesting() {
        let (mut form, address) = address_form();
        let city = form.field_id("address[city]").unwrap();
        assert_eq!(form.element_id(city).as_deref(), Some("address_city"));
        assert_eq!(form.fullname(city).as_deref(), Some("address[city]"));
        assert_eq!(form.field_set().get(address).unwrap().id_option(), Some("address"));
    }

    #[test]
    fn uploads_are_stored_as_values() {
        let mut form = Form::new();
        form.add_field("Avatar", Field::new("File", "avatar"));
        let upload = UploadedFile::new("me.png", "/tmp/up", 3);
        form.set_data([("avatar", FieldValue::from(upload.clone()))]);
        assert_eq!(form.value("avatar").and_then(FieldValue::as_file), Some(&upload));
    }

    #[test]
    fn set_value_reports_unknown_fields() {
        let mut form = Form::new();
        assert!(matches!(
            form.set_value("ghost", "boo"),
            Err(FormError::UnknownField { ref name }) if name == "ghost"
        ));
    }

    #[test]
    fn attributes_render_like_field_options() {
        let mut form = Form::new();
        form.set_attribute("method", "post");
        form.set_attribute("novalidate", true);
        form.set_attribute("action", "/signup");
        assert_eq!(form.attributes_as_string(None, false), r#"method="post" action="/signup""#);
        assert_eq!(form.attributes_as_string(Some(&["action"]), true), r#"method="post""#);
    }
}
