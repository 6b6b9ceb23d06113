use anyhow::{Context, Result, bail};

use crate::{FormClass, Submission, codes};

/// @template forms/register.html
/// @field-template forms/row.html
/// @method post
/// @class register
#[derive(FormClass)]
#[allow(dead_code)]
pub struct Registration {
    /// @label Username
    /// @required
    /// @maxlength 32
    pub username: String,
    /// @label E-mail
    /// @validate validate_email
    pub email: String,
    /// @field Password
    /// @validate /^.{8,}$/
    pub password: String,
    /// @field Checkbox
    /// @label Accept the terms
    /// @required
    pub terms: String,
    /// Untagged docs still make a plain input.
    pub created_by: String,
    /// @ignore
    pub csrf_token: String,
    /// @required
    secret: String,
}

/// Example 01 – a form declared on a struct's doc comments.
pub fn run() -> Result<()> {
    let descriptor = Registration::class_descriptor();
    assert_eq!(descriptor.name, "Registration");
    assert_eq!(descriptor.public_properties().count(), 6, "private fields are not properties");

    let mut form = Registration::form()?;
    assert_eq!(form.form_template(), Some("forms/register.html"));
    assert_eq!(form.field_template(), Some("forms/row.html"));
    assert_eq!(form.attributes_as_string(None, false), r#"method="post" class="register""#);
    assert_eq!(
        form.labels().collect::<Vec<_>>(),
        vec!["Username", "E-mail", "password", "Accept the terms", "created_by"],
        "@ignore and private fields are skipped"
    );

    let password = form.field("password").context("password field")?;
    assert_eq!(password.kind(), "Password");
    assert_eq!(
        password.options_as_attribute_string(Some(&["validate"]), true),
        r#"type="password""#
    );

    // Nothing submitted yet: required fields fail, the others stay quiet.
    assert!(!form.is_valid());
    let Err(err) = form.validate() else {
        bail!("an empty registration must not validate");
    };
    let issues = err.issues;
    let failing: Vec<_> = issues.iter().map(|issue| issue.field.as_str()).collect();
    assert_eq!(failing, vec!["username", "email", "password", "terms"]);
    assert_eq!(issues.iter().filter(|issue| issue.code == codes::REQUIRED).count(), 2);

    let submission = Submission::new()
        .field("username", "ada")
        .field("email", "ada@example.com")
        .field("password", "correct horse")
        .field("terms", "1")
        .field("not_a_field", "ignored");
    let mut form = Registration::build_form(&submission)?;
    assert!(form.is_valid(), "messages: {:?}", form.validation_messages());
    assert_eq!(form.value("username").and_then(|value| value.as_text()), Some("ada"));
    assert_eq!(form.data().len(), 5);

    let mut weak = Registration::build_form(&submission.clone().field("password", "short"))?;
    assert!(!weak.is_valid());
    assert_eq!(weak.validation_messages(), vec!["password is not valid"]);

    Ok(())
}
