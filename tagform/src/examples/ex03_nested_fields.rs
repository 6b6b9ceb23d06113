use anyhow::{Context, Result};

use crate::field::{REQUIRED, VALIDATE};
use crate::{FieldValue, Form, FormError, Submission, create_field};

/// Example 03 – fields nested under other fields, addressed by fullname.
pub fn run() -> Result<()> {
    let mut form = Form::new();
    form.set_attribute("method", "post");

    let customer = form.add_field("Customer", create_field("Input", "customer")?);
    form.add_child(customer, create_field("Input", "name")?.with_option(REQUIRED, true))?;
    let address = form.add_child(customer, create_field("Input", "address")?)?;
    let city = form.add_child(address, create_field("input", "city")?.with_option(REQUIRED, true))?;
    let zip = form.add_child(
        address,
        create_field("Input", "zip")?.with_option(VALIDATE, "/^[0-9]{4,5}$/"),
    )?;

    assert_eq!(form.fullname(city).as_deref(), Some("customer[address][city]"));
    assert_eq!(form.fullname(customer).as_deref(), Some("customer"));

    // Element ids join parent ids and stick once computed.
    assert_eq!(form.element_id(zip).as_deref(), Some("customer_address_zip"));
    let address_field = form.field_set().get(address).context("address field")?;
    assert_eq!(address_field.id_option(), Some("customer_address"));

    // An explicit id on the parent is honoured by children computed later.
    form.field_set_mut()
        .get_mut(customer)
        .context("customer field")?
        .set_option("id", "buyer");
    assert_eq!(form.element_id(city).as_deref(), Some("customer_address_city"));

    let name = form.field_id("customer[name]").context("customer[name]")?;
    assert_eq!(form.element_id(name).as_deref(), Some("buyer_name"));

    // A field cannot end up inside its own subtree.
    let cycle = form.field_set_mut().set_parent(customer, Some(zip));
    assert!(matches!(cycle, Err(FormError::ParentCycle { .. })));

    let submission: Submission = [
        ("customer[name]", "Ada Lovelace"),
        ("customer[address][city]", "London"),
        ("customer[address][zip]", "1815"),
        ("city", "not nested"),
    ]
    .into_iter()
    .collect();
    form.set_data(submission.merged());

    assert_eq!(
        form.value("customer[address][city]"),
        Some(&FieldValue::from("London"))
    );
    assert!(form.field("city").is_none(), "children are only reachable by fullname");
    assert!(form.is_valid(), "messages: {:?}", form.validation_messages());

    form.set_value("customer[address][zip]", "SW1A")?;
    let err = match form.validate() {
        Ok(()) => anyhow::bail!("a malformed zip must not validate"),
        Err(err) => err,
    };
    assert_eq!(err.issues.len(), 1);
    assert_eq!(err.issues[0].field, "customer[address][zip]");
    assert_eq!(err.messages(), vec!["zip is not valid"]);

    // Only labelled top-level fields are listed.
    assert_eq!(form.fields().count(), 1);
    assert_eq!(form.field_set().children(customer).count(), 2);

    Ok(())
}
