use anyhow::{Context, Result};

use crate::{FieldValue, FormClass, Submission, UploadedFile, codes, register_callback};

/// @method post
/// @enctype multipart/form-data
#[derive(FormClass)]
#[form(prefix = "form:")]
#[allow(dead_code)]
pub struct Avatar {
    /// @form:field File
    /// @form:required
    /// @form:validate-with small_png
    pub picture: String,
    /// @form:field File
    /// @form:validate /\.pdf$/
    pub resume: String,
    /// @form:label Caption
    pub caption: String,
}

/// Example 05 – uploaded files as field values.
pub fn run() -> Result<()> {
    register_callback("small_png", |value: &FieldValue| {
        value
            .as_file()
            .is_some_and(|file| file.mime_type.as_deref() == Some("image/png") && file.size <= 1024 * 1024)
    });

    let mut form = Avatar::form()?;
    let picture = form.field("picture").context("picture field")?;
    assert_eq!(picture.kind(), "File");
    assert_eq!(picture.option("type").and_then(|value| value.as_str()), Some("file"));
    // Unprefixed class tags are not form attributes.
    assert!(form.attributes().is_empty());

    // An upload slot with no file chosen is empty.
    form.set_data([("picture", FieldValue::from(UploadedFile::default()))]);
    assert!(!form.is_valid());
    let err = match form.validate() {
        Ok(()) => anyhow::bail!("a missing picture must fail"),
        Err(err) => err,
    };
    assert_eq!(err.issues[0].code, codes::REQUIRED);

    let png = UploadedFile::new("me.png", "/tmp/uploads/0001", 2048).with_mime_type("image/png");
    let submission = Submission::new()
        .field("picture", "C:\\fakepath\\me.png")
        .file("picture", png.clone())
        .file("resume", UploadedFile::new("cv.pdf", "/tmp/uploads/0002", 4096))
        .field("caption", "Me, smiling");
    let mut form = Avatar::build_form(&submission)?;

    // The upload wins over the text value submitted under the same name.
    assert_eq!(form.value("picture").and_then(FieldValue::as_file), Some(&png));
    assert_eq!(form.value("Caption"), None, "values are keyed by name, not label");
    assert_eq!(form.value("caption"), Some(&FieldValue::from("Me, smiling")));

    // The callback receives the upload itself; regexps never accept uploads.
    assert!(!form.is_valid());
    assert_eq!(form.validation_messages(), vec!["resume is not valid"]);

    // Text values are still matched against the pattern.
    let mut linked = Avatar::build_form(&Submission::new().file("picture", png).field("resume", "cv.pdf"))?;
    assert!(linked.is_valid(), "messages: {:?}", linked.validation_messages());

    Ok(())
}
