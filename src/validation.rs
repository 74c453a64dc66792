//! The field-level validation pipeline.
//!
//! For each field descriptor, the raw value is looked up, handed to
//! [`clean_field_value`] for coercion and validation, and the result is
//! recorded as either a cleaned value or a field-scoped error. Errors
//! accumulate rather than short-circuiting, so all field failures are
//! reported at once.

use std::collections::HashMap;

use crate::config::ValidationConfig;
use crate::error::ValidationError;
use crate::fields::{clean_field_value, FieldDef};
use crate::value::{RawValue, Value};

/// Runs the coercion+validation pipeline over all fields.
///
/// `raw_data` is keyed by declared field name (source remapping happens at
/// bind time). A field is recorded in exactly one of `cleaned_data` or
/// `errors`, never both.
pub fn clean_fields(
    field_defs: &[FieldDef],
    raw_data: &HashMap<String, RawValue>,
    config: &ValidationConfig,
    cleaned_data: &mut HashMap<String, Value>,
    errors: &mut HashMap<String, ValidationError>,
) {
    for field in field_defs {
        let raw = raw_data.get(&field.name);
        match clean_field_value(field, raw, config) {
            Ok(value) => {
                cleaned_data.insert(field.name.clone(), value);
            }
            Err(error) => {
                tracing::debug!(field = %field.name, code = %error.code, "field failed validation");
                errors.insert(field.name.clone(), error);
            }
        }
    }
}
