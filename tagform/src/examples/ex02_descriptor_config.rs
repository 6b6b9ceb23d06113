use anyhow::{Context, Result};

use crate::extractor::{self, FormConfig};
use crate::{ClassDescriptor, OptionValue, Submission};

const CONTACT: &str = r#"
name = "Contact"
doc = """
@form:template contact.html
@form:method post
@form:action /contact
"""

[[properties]]
name = "email"
doc = """
@form:label Your e-mail
@form:validate validate_email
@form:placeholder you@example.com
"""

[[properties]]
name = "topic"
doc = """
@form:field select
@form:class wide
@form:class tall
"""

[[properties]]
name = "message"
doc = """
@form:field Textarea
@form:required
@form:rows 6
"""

[[properties]]
name = "internal_note"
public = false
doc = "@form:field Hidden"
"#;

/// Example 02 – a form declared in a TOML descriptor with a tag prefix.
pub fn run() -> Result<()> {
    let descriptor = ClassDescriptor::from_toml_str(CONTACT)?;
    assert_eq!(descriptor.properties.len(), 4);

    let FormConfig {
        attributes,
        template,
        field_template,
    } = extractor::extract_form_config(&descriptor, "form:");
    assert_eq!(template.as_deref(), Some("contact.html"));
    assert_eq!(field_template, None);
    assert_eq!(attributes.keys().collect::<Vec<_>>(), vec!["method", "action"]);

    // Under another prefix none of the tags match.
    let unprefixed = extractor::extract_fields_from_class(&descriptor, "admin:")?;
    assert!(unprefixed.values().all(|field| field.kind() == "Input" && field.options().is_empty()));

    let fields = extractor::extract_fields_from_class(&descriptor, "form:")?;
    assert_eq!(
        fields.keys().collect::<Vec<_>>(),
        vec!["Your e-mail", "topic", "message"]
    );
    let topic = &fields["topic"];
    assert_eq!(topic.kind(), "Select");
    assert_eq!(
        topic.option("class"),
        Some(&OptionValue::List(vec!["wide".into(), "tall".into()])),
        "repeated tags collect into a list"
    );
    // Only string options render as attributes.
    assert_eq!(topic.options_as_attribute_string(None, false), "");

    let mut form = extractor::build_from_class(&descriptor, "form:")?;
    assert_eq!(form.attributes_as_string(None, false), r#"method="post" action="/contact""#);
    let email = form.field("email").context("email field")?;
    assert_eq!(
        email.options_as_attribute_string(Some(&["placeholder"]), false),
        r#"placeholder="you@example.com""#
    );

    form.set_data(
        Submission::new()
            .field("email", "not-an-address")
            .field("message", "Hello")
            .merged(),
    );
    assert!(!form.is_valid());
    assert_eq!(form.validation_messages(), vec!["email is not valid"]);

    form.set_value("email", "ada@example.com")?;
    assert!(form.is_valid());

    // Descriptors survive a trip through their own configuration format.
    let rendered = descriptor.to_toml_string()?;
    assert_eq!(ClassDescriptor::from_toml_str(&rendered)?, descriptor);

    let json = ClassDescriptor::from_json_str(
        r#"{"name": "Ping", "properties": [{"name": "host", "doc": "@required"}]}"#,
    )?;
    let mut ping = extractor::build_from_class(&json, "")?;
    assert!(!ping.is_valid());
    assert_eq!(ping.validation_messages(), vec!["host is required"]);

    Ok(())
}
