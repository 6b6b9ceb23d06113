//! Integration tests that run every library example.
//!
//! Examples that register filters or callbacks touch process-wide registries,
//! so they run serially.

use serial_test::serial;

#[test]
#[serial]
fn ex01_declarative_form() {
    tagform::examples::ex01_declarative_form::run().expect("example should succeed");
}

#[test]
#[serial]
fn ex02_descriptor_config() {
    tagform::examples::ex02_descriptor_config::run().expect("example should succeed");
}

#[test]
#[serial]
fn ex03_nested_fields() {
    tagform::examples::ex03_nested_fields::run().expect("example should succeed");
}

#[test]
#[serial]
fn ex04_custom_validation() {
    tagform::examples::ex04_custom_validation::run().expect("example should succeed");
}

#[test]
#[serial]
fn ex05_file_uploads() {
    tagform::examples::ex05_file_uploads::run().expect("example should succeed");
}
