use anyhow::{Context, Result};

use crate::field::VALIDATE_WITH;
use crate::{
    Callback, CallbackRegistration, ClassDescriptor, Field, FieldTypeRegistration, FieldValue, Options, codes,
    create_field, extractor, register_callback, register_filter,
};

fn is_postcode(value: &str, options: &Options) -> bool {
    let country = options.get("country").and_then(|country| country.as_str()).unwrap_or("US");
    match country {
        "US" => value.len() == 5 && value.chars().all(|c| c.is_ascii_digit()),
        _ => !value.trim().is_empty(),
    }
}

fn is_even(value: &FieldValue) -> bool {
    value
        .as_text()
        .and_then(|text| text.parse::<i64>().ok())
        .is_some_and(|number| number % 2 == 0)
}

fn color_init(field: &mut Field) {
    field.set_option("type", "color");
}

inventory::submit! {
    CallbackRegistration {
        name: "is_even",
        predicate: is_even,
    }
}

inventory::submit! {
    FieldTypeRegistration {
        tag: "ColorPicker",
        init: color_init,
    }
}

/// Example 04 – filters, callbacks and field types supplied by the application.
pub fn run() -> Result<()> {
    register_filter("postcode", is_postcode);
    register_callback("is_adult", |value: &FieldValue| {
        value
            .as_text()
            .and_then(|text| text.parse::<u32>().ok())
            .is_some_and(|age| age >= 18)
    });

    let descriptor = ClassDescriptor::new("Order")
        .property("zip", "@validate postcode")
        .property("age", "@validate-with is_adult")
        .property("quantity", "@validate-with is_even")
        .property("coupon", "@validate-with no_such_callback")
        .property("accent", "@field ColorPicker")
        .property("note", "@validate neither a filter nor a regexp");
    let mut form = extractor::build_from_class(&descriptor, "")?;

    let accent = form.field("accent").context("accent field")?;
    assert_eq!(accent.kind(), "ColorPicker");
    assert_eq!(accent.options_as_attribute_string(None, false), r#"type="color""#);

    form.set_data([("zip", "9021"), ("age", "17"), ("quantity", "3"), ("note", "hi")]);
    let err = match form.validate() {
        Ok(()) => anyhow::bail!("the order must not validate"),
        Err(err) => err,
    };
    let codes_by_field: Vec<_> = err
        .issues
        .iter()
        .map(|issue| (issue.field.as_str(), issue.code.as_str()))
        .collect();
    assert_eq!(
        codes_by_field,
        vec![
            ("zip", codes::FILTER),
            ("age", codes::CALLBACK),
            ("quantity", codes::CALLBACK),
            ("coupon", codes::CALLBACK),
            ("note", codes::RULE),
        ]
    );
    assert_eq!(
        err.issues[1].message,
        "age failed to validate because is_adult() returned false"
    );
    assert_eq!(
        err.issues[4].message,
        "note failed to validate because the validation string is neither a filter or a regexp"
    );

    form.set_data([("zip", "90210"), ("age", "42"), ("quantity", "4")]);
    assert!(!form.is_valid());
    let messages = form.validation_messages();
    assert_eq!(messages.len(), 2, "coupon and note still fail: {messages:?}");

    // Options read by a filter come from the same field.
    let mut zip = create_field("Input", "zip")?.with_option("validate", "postcode").with_option("country", "UK");
    zip.set_value("SW1A 1AA");
    assert!(zip.is_valid());

    // A callback can also be attached directly, bypassing the registry.
    let mut pin = create_field("Password", "pin")?.with_option(
        VALIDATE_WITH,
        Callback::new("four_digits", |value: &FieldValue| {
            value.as_text().is_some_and(|text| text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()))
        }),
    );
    pin.set_value("12a4");
    assert!(!pin.is_valid());
    assert_eq!(
        pin.validation_messages(),
        ["pin failed to validate because four_digits() returned false"]
    );
    pin.set_value("1234");
    assert!(pin.is_valid());

    Ok(())
}
