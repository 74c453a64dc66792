//! # rest-form-fields
//!
//! REST-API-oriented input-validation fields: strict null handling, JSON
//! decoding, array parsing, id/timestamp/datetime coercion, and file
//! constraints.
//!
//! Each [`FieldDef`](fields::FieldDef) is a narrow coercion+validation rule
//! applied to one value of an untyped input record. A [`Form`](form::Form)
//! binds a raw input mapping (with optional `source` key remapping) to a
//! set of field definitions, cleans every field, and exposes typed cleaned
//! data plus field-scoped errors with machine-readable reason codes.
//!
//! ```
//! use rest_form_fields::{ErrorCode, FieldDef, FieldKind, Form, FormData, Value};
//!
//! let mut form = Form::new(vec![
//!     FieldDef::new("int_field", FieldKind::Id { with_zero: false }).source("intField"),
//!     FieldDef::new("tags", FieldKind::array()).required(false),
//! ]);
//! form.bind(&FormData::new().with("intField", "123").with("tags", "a,b,c"));
//! assert!(form.is_valid());
//! assert_eq!(form.cleaned_data()["int_field"], Value::Int(123));
//!
//! form.bind(&FormData::new().with("intField", "-5"));
//! assert!(!form.is_valid());
//! assert_eq!(form.errors()["int_field"].code, ErrorCode::InvalidValue);
//! ```

pub mod config;
pub mod error;
pub mod fields;
pub mod files;
pub mod form;
pub mod validation;
pub mod value;

pub use config::ValidationConfig;
pub use error::{ErrorCode, ValidationError};
pub use fields::{clean_field_value, FieldDef, FieldKind};
pub use files::UploadedFile;
pub use form::{Form, FormData};
pub use value::{RawValue, Value};
