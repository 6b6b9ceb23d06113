//! Runnable walkthroughs of the library, exercised by `tests/examples.rs`.

pub mod ex01_declarative_form;
pub mod ex02_descriptor_config;
pub mod ex03_nested_fields;
pub mod ex04_custom_validation;
pub mod ex05_file_uploads;
