//! The form driver: binds raw input to field definitions and runs the
//! validation pipeline over every field.
//!
//! A [`Form`] holds a list of [`FieldDef`]s and a [`ValidationConfig`].
//! Binding resolves each field's source key against a [`FormData`] mapping
//! (the input mapping is never mutated); validation cleans every field,
//! accumulating one error per failing field and never aborting siblings.

use std::collections::HashMap;

use crate::config::ValidationConfig;
use crate::error::ValidationError;
use crate::fields::FieldDef;
use crate::validation;
use crate::value::{RawValue, Value};

/// A raw input mapping from key to untyped value, owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    values: HashMap<String, RawValue>,
}

impl FormData {
    /// Creates an empty `FormData`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw value under the given key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the raw value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.values.get(key)
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no keys are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for FormData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A bound collection of fields over one raw input instance.
///
/// # Examples
///
/// ```
/// use rest_form_fields::fields::{FieldDef, FieldKind};
/// use rest_form_fields::form::{Form, FormData};
/// use rest_form_fields::value::Value;
///
/// let mut form = Form::new(vec![
///     FieldDef::new("int_field", FieldKind::Id { with_zero: false }).source("intField"),
/// ]);
/// form.bind(&FormData::new().with("intField", "123"));
/// assert!(form.is_valid());
/// assert_eq!(form.cleaned_data().get("int_field"), Some(&Value::Int(123)));
/// ```
pub struct Form {
    field_defs: Vec<FieldDef>,
    config: ValidationConfig,
    bound: bool,
    raw_data: HashMap<String, RawValue>,
    errors: HashMap<String, ValidationError>,
    cleaned_data: HashMap<String, Value>,
}

impl Form {
    /// Creates a new `Form` with the given field definitions and the
    /// default configuration.
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self {
            field_defs: fields,
            config: ValidationConfig::default(),
            bound: false,
            raw_data: HashMap::new(),
            errors: HashMap::new(),
            cleaned_data: HashMap::new(),
        }
    }

    /// Sets the validation configuration.
    #[must_use]
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the form's field definitions.
    pub fn fields(&self) -> &[FieldDef] {
        &self.field_defs
    }

    /// Binds raw input data to this form.
    ///
    /// For each field, the value is read from the field's source key (or
    /// its name when no source is set). The input mapping itself is left
    /// untouched.
    pub fn bind(&mut self, data: &FormData) {
        self.bound = true;
        self.raw_data.clear();
        self.errors.clear();
        self.cleaned_data.clear();

        for field in &self.field_defs {
            if let Some(value) = data.get(field.data_key()) {
                self.raw_data.insert(field.name.clone(), value.clone());
            }
        }
    }

    /// Returns `true` if this form has been bound to data.
    pub const fn is_bound(&self) -> bool {
        self.bound
    }

    /// Validates every field. Returns `true` if all fields are valid.
    ///
    /// All fields are evaluated on every call; errors accumulate per field
    /// and one field's failure never skips its siblings. After this call,
    /// [`errors`](Self::errors) and [`cleaned_data`](Self::cleaned_data)
    /// are populated.
    pub fn is_valid(&mut self) -> bool {
        if !self.bound {
            return false;
        }

        self.errors.clear();
        self.cleaned_data.clear();

        validation::clean_fields(
            &self.field_defs,
            &self.raw_data,
            &self.config,
            &mut self.cleaned_data,
            &mut self.errors,
        );

        if self.errors.is_empty() {
            tracing::debug!(fields = self.field_defs.len(), "form validated");
            true
        } else {
            tracing::debug!(
                fields = self.field_defs.len(),
                failed = self.errors.len(),
                "form validation failed"
            );
            false
        }
    }

    /// Returns per-field validation errors, keyed by field name.
    pub const fn errors(&self) -> &HashMap<String, ValidationError> {
        &self.errors
    }

    /// Returns the cleaned (validated and coerced) data, keyed by field
    /// name. Populated only for fields that validated successfully.
    pub const fn cleaned_data(&self) -> &HashMap<String, Value> {
        &self.cleaned_data
    }
}
