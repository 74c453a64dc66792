//! Field definitions and type-level validation.
//!
//! Each [`FieldDef`] describes a single input field: its name, the input key
//! it reads from, whether it is required, an optional initial value, and a
//! [`FieldKind`] carrying the type-specific constraint set. The
//! [`clean_field_value`] function dispatches on the kind and runs the
//! coercion and validation stages in order, short-circuiting with a typed
//! [`ValidationError`] on the first failing stage.
//!
//! The deep wrapper hierarchies of checkbox-oriented form systems are
//! flattened here into shared stage helpers (`coerce_int`, `check_id`,
//! `parse_array_items`, ...) composed by the dispatch arms, so an id-set
//! field reuses the exact same integer and id stages as a plain id field.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ValidationConfig;
use crate::error::{ErrorCode, ValidationError};
use crate::value::{RawValue, Value};

/// Default clip length for truncated char fields.
pub const DEFAULT_TRUNCATE_LENGTH: usize = 255;

/// Default strptime-style mask for date-time fields.
pub const DEFAULT_DATETIME_MASK: &str = "%Y-%m-%dT%H:%M:%S";

/// Default mask for date fields.
pub const DEFAULT_DATE_MASK: &str = "%Y-%m-%d";

/// Default mask for month fields.
pub const DEFAULT_MONTH_MASK: &str = "%Y-%m";

/// Upper bound accepted for epoch-second timestamps (i32::MAX).
pub const TIMESTAMP_MAX: f64 = 2_147_483_647.0;

/// Date unit labels accepted by [`FieldKind::date_unit`].
pub const DATE_UNIT_CHOICES: [&str; 3] = ["hour", "day", "week"];

static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]*$").expect("valid regex"));
static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{6}$").expect("valid regex"));
static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid regex")
});
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$").expect("valid regex")
});

/// Defines the type of a field, including type-specific parameters.
///
/// Each variant carries the constraint set needed for coercing and
/// validating one raw input value. [`clean_field_value`] dispatches on this
/// enum to run the pipeline stages.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A plain character (string) field.
    Char,
    /// A string field matched against a regular expression.
    ///
    /// The compiled expression stays accessible through
    /// [`FieldDef::pattern`], so callers can re-apply it to the cleaned
    /// string and extract named groups.
    Regex {
        /// The compiled pattern the value must match.
        regex: Regex,
    },
    /// A single-choice field over `(value, display_label)` pairs.
    Choice {
        /// Available choices.
        choices: Vec<(String, String)>,
    },
    /// A string field unconditionally clipped to a maximum length.
    ///
    /// Overlength input is truncated, never rejected. `None` disables
    /// clipping.
    Truncated {
        /// Number of characters to keep.
        truncate_length: Option<usize>,
    },
    /// A lowercase hexadecimal string.
    Hex,
    /// A color as exactly six lowercase hex characters.
    Color,
    /// A hyphenated lowercase UUID string.
    Uuid,
    /// An http(s) URL.
    Url {
        /// Whether underscores are permitted in the host name.
        with_underscore_domain: bool,
    },
    /// An IANA timezone name (e.g. `Europe/Moscow`).
    Timezone,
    /// An e-mail address, lowercased before validation.
    Email,
    /// An integer field with optional bounds.
    Integer {
        /// Minimum allowed value.
        min_value: Option<i64>,
        /// Maximum allowed value.
        max_value: Option<i64>,
    },
    /// A floating-point field.
    Float,
    /// An integer that must be positive (or non-negative with `with_zero`).
    PositiveInteger {
        /// Whether zero is allowed.
        with_zero: bool,
    },
    /// A positive integer additionally bounded above by
    /// [`ValidationConfig::id_max_value`].
    Id {
        /// Whether zero is allowed.
        with_zero: bool,
    },
    /// Numeric epoch seconds converted to a UTC date-time.
    Timestamp {
        /// When `false`, values later than the configured current time are
        /// rejected.
        in_future: bool,
    },
    /// A string parsed into a UTC date-time with a strptime-style mask.
    DateTime {
        /// The parse mask.
        mask: String,
    },
    /// A string parsed into a date.
    Date {
        /// The parse mask.
        mask: String,
    },
    /// A year-month string normalized to the first day of that month.
    Month {
        /// The parse mask.
        mask: String,
    },
    /// A tri-state boolean: absent maps to null, not false.
    Boolean,
    /// A JSON value, decoded from text if necessary and optionally checked
    /// against a JSON Schema.
    Json {
        /// Optional JSON Schema the decoded value must satisfy.
        schema: Option<serde_json::Value>,
    },
    /// An array accepted as a native sequence, a JSON-encoded array string,
    /// or a comma-separated string (tried in that order).
    Array {
        /// Minimum number of items.
        min_items: usize,
        /// Maximum number of items.
        max_items: Option<usize>,
        /// Optional JSON Schema each item must satisfy independently.
        item_schema: Option<serde_json::Value>,
    },
    /// An array whose every element passes the id stages.
    IdArray {
        /// Minimum number of items.
        min_items: usize,
        /// Maximum number of items.
        max_items: Option<usize>,
    },
    /// An id array with duplicate elements removed.
    IdSet {
        /// Minimum number of items, counted before deduplication.
        min_items: usize,
        /// Maximum number of items, counted before deduplication.
        max_items: Option<usize>,
    },
    /// An uploaded file with size and extension constraints.
    File {
        /// Maximum allowed size in bytes.
        max_size: Option<u64>,
        /// Allowed file extensions, compared case-insensitively.
        valid_extensions: Option<Vec<String>>,
    },
}

impl FieldKind {
    /// A single-choice field from plain labels: each label is both the
    /// stored value and the display label.
    pub fn choice<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice {
            choices: labels
                .into_iter()
                .map(|l| {
                    let l = l.into();
                    (l.clone(), l)
                })
                .collect(),
        }
    }

    /// A truncated char field with the default clip length of 255.
    pub const fn truncated() -> Self {
        Self::Truncated {
            truncate_length: Some(DEFAULT_TRUNCATE_LENGTH),
        }
    }

    /// A date-time field with the default `%Y-%m-%dT%H:%M:%S` mask.
    pub fn datetime() -> Self {
        Self::DateTime {
            mask: DEFAULT_DATETIME_MASK.to_string(),
        }
    }

    /// A date field with the default `%Y-%m-%d` mask.
    pub fn date() -> Self {
        Self::Date {
            mask: DEFAULT_DATE_MASK.to_string(),
        }
    }

    /// A month field with the default `%Y-%m` mask.
    pub fn month() -> Self {
        Self::Month {
            mask: DEFAULT_MONTH_MASK.to_string(),
        }
    }

    /// A choice field over the date units `hour`, `day`, and `week`.
    pub fn date_unit() -> Self {
        Self::choice(DATE_UNIT_CHOICES)
    }

    /// A plain array field with no bounds and no item schema.
    pub const fn array() -> Self {
        Self::Array {
            min_items: 0,
            max_items: None,
            item_schema: None,
        }
    }
}

/// Complete definition of one input field.
///
/// Descriptors are immutable once built and shared read-only across
/// validation calls; the pipeline never mutates them.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// The declared field name: cleaned data and errors are keyed by it.
    pub name: String,
    /// The field kind, controlling coercion and validation.
    pub kind: FieldKind,
    /// Optional input key to read instead of `name`.
    pub source: Option<String>,
    /// Whether this field is required.
    pub required: bool,
    /// Fallback value returned when input is absent and the field is
    /// optional.
    pub initial: Option<Value>,
    /// Custom error messages keyed by error code string.
    pub error_messages: HashMap<String, String>,
}

impl FieldDef {
    /// Creates a new `FieldDef`. The field is required by default.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            source: None,
            required: true,
            initial: None,
            error_messages: HashMap::new(),
        }
    }

    /// Sets whether this field is required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the input key this field reads from, instead of its name.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the initial value.
    pub fn initial(mut self, value: Value) -> Self {
        self.initial = Some(value);
        self
    }

    /// Sets a custom error message for a given code.
    pub fn error_message(mut self, code: ErrorCode, msg: impl Into<String>) -> Self {
        self.error_messages.insert(code.as_str().to_string(), msg.into());
        self
    }

    /// The input key this field reads from: `source` if set, else `name`.
    pub fn data_key(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.name)
    }

    /// The compiled pattern of a regex field, for caller-side capture
    /// extraction from the cleaned string.
    pub const fn pattern(&self) -> Option<&Regex> {
        match &self.kind {
            FieldKind::Regex { regex } => Some(regex),
            _ => None,
        }
    }
}

/// Builds a field-scoped error, honoring the field's custom message
/// overrides for the given code.
fn field_error(field: &FieldDef, code: ErrorCode, message: impl Into<String>) -> ValidationError {
    let message = field
        .error_messages
        .get(code.as_str())
        .cloned()
        .unwrap_or_else(|| message.into());
    ValidationError::new(code, message)
}

// ── Shared coercion stages ─────────────────────────────────────────────

fn coerce_string(field: &FieldDef, raw: &RawValue) -> Result<String, ValidationError> {
    match raw {
        RawValue::Str(s) => Ok(s.clone()),
        RawValue::Int(i) => Ok(i.to_string()),
        RawValue::Float(f) => Ok(f.to_string()),
        RawValue::Bool(b) => Ok(b.to_string()),
        RawValue::Json(serde_json::Value::String(s)) => Ok(s.clone()),
        RawValue::Json(serde_json::Value::Number(n)) => Ok(n.to_string()),
        RawValue::Json(serde_json::Value::Bool(b)) => Ok(b.to_string()),
        _ => Err(field_error(
            field,
            ErrorCode::InvalidFormat,
            "Enter a valid string.",
        )),
    }
}

fn coerce_int(field: &FieldDef, raw: &RawValue) -> Result<i64, ValidationError> {
    let invalid = || field_error(field, ErrorCode::InvalidNumber, "Enter a whole number.");
    match raw {
        RawValue::Int(i) => Ok(*i),
        RawValue::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
        RawValue::Str(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        RawValue::Json(serde_json::Value::Number(n)) => n.as_i64().ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

fn coerce_float(field: &FieldDef, raw: &RawValue) -> Result<f64, ValidationError> {
    let invalid = || field_error(field, ErrorCode::InvalidNumber, "Enter a number.");
    match raw {
        RawValue::Int(i) => Ok(*i as f64),
        RawValue::Float(f) => Ok(*f),
        RawValue::Str(s) => s.trim().parse::<f64>().map_err(|_| invalid()),
        RawValue::Json(serde_json::Value::Number(n)) => n.as_f64().ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

fn check_min(field: &FieldDef, n: i64, min: i64) -> Result<(), ValidationError> {
    if n < min {
        return Err(field_error(
            field,
            ErrorCode::InvalidValue,
            format!("Ensure this value is greater than or equal to {min}."),
        ));
    }
    Ok(())
}

fn check_max(field: &FieldDef, n: i64, max: i64) -> Result<(), ValidationError> {
    if n > max {
        return Err(field_error(
            field,
            ErrorCode::InvalidValue,
            format!("Ensure this value is less than or equal to {max}."),
        ));
    }
    Ok(())
}

/// The id stage: positive (or non-negative) and below the configured
/// maximum. Reused by the id field and by id-collection elements.
fn check_id(
    field: &FieldDef,
    n: i64,
    with_zero: bool,
    config: &ValidationConfig,
) -> Result<i64, ValidationError> {
    check_min(field, n, if with_zero { 0 } else { 1 })?;
    if let Some(max) = config.id_max_value {
        check_max(field, n, max)?;
    }
    Ok(n)
}

fn check_pattern(
    field: &FieldDef,
    value: &str,
    regex: &Regex,
    message: impl Into<String>,
) -> Result<(), ValidationError> {
    if regex.is_match(value) {
        Ok(())
    } else {
        Err(field_error(field, ErrorCode::InvalidFormat, message))
    }
}

/// Parses a string against a strptime-style mask. Masks without a day
/// component (e.g. `%Y-%m`) default to the first of the month; masks
/// without a time component default to midnight.
fn parse_with_mask(value: &str, mask: &str) -> Option<NaiveDateTime> {
    use chrono::format::{parse, Parsed, StrftimeItems};

    let mut parsed = Parsed::new();
    parse(&mut parsed, value, StrftimeItems::new(mask)).ok()?;
    let _ = parsed.set_day(1);
    let date = parsed.to_naive_date().ok()?;
    let time = parsed.to_naive_time().unwrap_or(NaiveTime::MIN);
    Some(date.and_time(time))
}

fn check_schema(
    field: &FieldDef,
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Result<(), ValidationError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| {
        field_error(
            field,
            ErrorCode::InvalidSchema,
            format!("Invalid JSON schema: {e}"),
        )
    })?;
    if let Err(err) = validator.validate(instance) {
        return Err(field_error(field, ErrorCode::InvalidSchema, err.to_string()));
    }
    Ok(())
}

fn decode_json(field: &FieldDef, raw: &RawValue) -> Result<serde_json::Value, ValidationError> {
    match raw {
        RawValue::Json(v) => match v {
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Ok(v.clone()),
            other => Err(field_error(
                field,
                ErrorCode::InvalidJson,
                format!("Invalid JSON value [{other}]"),
            )),
        },
        RawValue::Str(s) => serde_json::from_str(s).map_err(|e| {
            field_error(field, ErrorCode::InvalidJson, format!("JSON was not parsed [{e}]"))
        }),
        other => Err(field_error(
            field,
            ErrorCode::InvalidJson,
            format!("Invalid JSON value [{other:?}]"),
        )),
    }
}

/// Array shape detectors, tried in priority order: native JSON array,
/// JSON-encoded array string, comma-separated string. Whitespace around
/// comma-separated elements is trimmed.
fn parse_array_items(
    field: &FieldDef,
    raw: &RawValue,
    integer_items: bool,
) -> Result<Vec<serde_json::Value>, ValidationError> {
    let not_object = || {
        field_error(
            field,
            ErrorCode::InvalidJson,
            "Value is expected to be a JSON array, not an object.",
        )
    };
    match raw {
        RawValue::Json(serde_json::Value::Array(items)) => Ok(items.clone()),
        RawValue::Json(serde_json::Value::Object(_)) => Err(not_object()),
        RawValue::Str(s) if s.starts_with('[') || s.ends_with(']') => {
            let decoded: serde_json::Value = serde_json::from_str(s).map_err(|e| {
                field_error(field, ErrorCode::InvalidJson, format!("JSON was not parsed [{e}]"))
            })?;
            match decoded {
                serde_json::Value::Array(items) => Ok(items),
                serde_json::Value::Object(_) => Err(not_object()),
                other => Err(field_error(
                    field,
                    ErrorCode::InvalidJson,
                    format!("Invalid JSON value [{other}]"),
                )),
            }
        }
        RawValue::Str(s) if s.starts_with('{') && s.ends_with('}') => Err(not_object()),
        RawValue::Str(s) => {
            let parts = s.split(',').map(str::trim);
            if integer_items {
                parts
                    .map(|p| {
                        p.parse::<i64>().map(serde_json::Value::from).map_err(|_| {
                            field_error(
                                field,
                                ErrorCode::InvalidNumber,
                                "Enter an array of whole numbers.",
                            )
                        })
                    })
                    .collect()
            } else {
                Ok(parts
                    .map(|p| serde_json::Value::String(p.to_string()))
                    .collect())
            }
        }
        other => Err(field_error(
            field,
            ErrorCode::InvalidJson,
            format!("Invalid JSON value [{other:?}]"),
        )),
    }
}

fn check_item_bounds(
    field: &FieldDef,
    len: usize,
    min_items: usize,
    max_items: Option<usize>,
) -> Result<(), ValidationError> {
    if len < min_items {
        return Err(field_error(
            field,
            ErrorCode::TooFewItems,
            format!("Ensure this array has at least {min_items} items (it has {len})."),
        ));
    }
    if let Some(max) = max_items {
        if len > max {
            return Err(field_error(
                field,
                ErrorCode::TooManyItems,
                format!("Ensure this array has at most {max} items (it has {len})."),
            ));
        }
    }
    Ok(())
}

/// Parses an id array: array shapes with integer items, bounds, then the
/// id stage on every element. The first failing element aborts with its
/// error, prefixed with the element index.
fn clean_id_items(
    field: &FieldDef,
    raw: &RawValue,
    min_items: usize,
    max_items: Option<usize>,
    config: &ValidationConfig,
) -> Result<Vec<i64>, ValidationError> {
    let items = parse_array_items(field, raw, true)?;
    check_item_bounds(field, items.len(), min_items, max_items)?;
    let mut ids = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        // Numeric strings coerce the same way standalone id input does.
        let n = match item {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            field_error(
                field,
                ErrorCode::InvalidNumber,
                format!("Item {i}: enter a whole number."),
            )
        })?;
        let id = check_id(field, n, false, config)
            .map_err(|e| ValidationError::new(e.code, format!("Item {i}: {}", e.message)))?;
        ids.push(id);
    }
    Ok(ids)
}

// ── Pipeline dispatch ──────────────────────────────────────────────────

/// Cleans (coerces and validates) one raw input value into a typed
/// [`Value`].
///
/// Presence normalization runs first: an absent key and an explicit empty
/// string are both absence. Absence on a required field reports
/// [`ErrorCode::Required`]; absence on an optional field yields the
/// field's initial value (or [`Value::Null`]). The boolean field is the
/// one exception: an explicit empty string is falsy input, not absence.
///
/// The pipeline is pure: the same descriptor, raw value, and configuration
/// always produce the same cleaned value or the same error.
pub fn clean_field_value(
    field: &FieldDef,
    raw: Option<&RawValue>,
    config: &ValidationConfig,
) -> Result<Value, ValidationError> {
    let empty_is_absent = !matches!(field.kind, FieldKind::Boolean);
    let present = match raw {
        Some(v) if empty_is_absent && v.is_empty_str() => None,
        other => other,
    };

    let Some(raw) = present else {
        if field.required {
            return Err(field_error(
                field,
                ErrorCode::Required,
                "This field is required.",
            ));
        }
        return Ok(field.initial.clone().unwrap_or(Value::Null));
    };

    match &field.kind {
        FieldKind::Char => Ok(Value::String(coerce_string(field, raw)?)),

        FieldKind::Regex { regex } => {
            let s = coerce_string(field, raw)?;
            check_pattern(
                field,
                &s,
                regex,
                format!("Value does not match pattern \"{regex}\"."),
            )?;
            Ok(Value::String(s))
        }

        FieldKind::Choice { choices } => {
            let s = coerce_string(field, raw)?;
            if choices.iter().any(|(v, _)| v == &s) {
                Ok(Value::String(s))
            } else {
                Err(field_error(
                    field,
                    ErrorCode::InvalidChoice,
                    format!("Select a valid choice. {s} is not one of the available choices."),
                ))
            }
        }

        FieldKind::Truncated { truncate_length } => {
            let s = coerce_string(field, raw)?;
            let clipped = match truncate_length {
                Some(n) if s.chars().count() > *n => s.chars().take(*n).collect(),
                _ => s,
            };
            Ok(Value::String(clipped))
        }

        FieldKind::Hex => {
            let s = coerce_string(field, raw)?;
            check_pattern(
                field,
                &s,
                &HEX_RE,
                "Field can contain only lowercase hexadecimal characters (0-9, a-f).",
            )?;
            Ok(Value::String(s))
        }

        FieldKind::Color => {
            let s = coerce_string(field, raw)?;
            check_pattern(field, &s, &COLOR_RE, format!("Color '{s}' is invalid."))?;
            Ok(Value::String(s))
        }

        FieldKind::Uuid => {
            let s = coerce_string(field, raw)?;
            check_pattern(field, &s, &UUID_RE, "Enter a valid UUID.")?;
            Ok(Value::String(s))
        }

        FieldKind::Url {
            with_underscore_domain,
        } => {
            let s = coerce_string(field, raw)?.trim().to_string();
            let invalid = || field_error(field, ErrorCode::InvalidFormat, "Enter a valid URL.");
            let parsed = url::Url::parse(&s).map_err(|_| invalid())?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(invalid());
            }
            let host = parsed.host_str().ok_or_else(invalid)?;
            if !with_underscore_domain && host.contains('_') {
                return Err(invalid());
            }
            Ok(Value::String(s))
        }

        FieldKind::Timezone => {
            let s = coerce_string(field, raw)?;
            if s.parse::<chrono_tz::Tz>().is_err() {
                return Err(field_error(
                    field,
                    ErrorCode::InvalidFormat,
                    format!("Invalid timezone '{s}'."),
                ));
            }
            Ok(Value::String(s))
        }

        FieldKind::Email => {
            let s = coerce_string(field, raw)?.to_lowercase();
            check_pattern(field, &s, &EMAIL_RE, "Enter a valid email address.")?;
            Ok(Value::String(s))
        }

        FieldKind::Integer {
            min_value,
            max_value,
        } => {
            let n = coerce_int(field, raw)?;
            if let Some(min) = min_value {
                check_min(field, n, *min)?;
            }
            if let Some(max) = max_value {
                check_max(field, n, *max)?;
            }
            Ok(Value::Int(n))
        }

        FieldKind::Float => Ok(Value::Float(coerce_float(field, raw)?)),

        FieldKind::PositiveInteger { with_zero } => {
            let n = coerce_int(field, raw)?;
            check_min(field, n, if *with_zero { 0 } else { 1 })?;
            Ok(Value::Int(n))
        }

        FieldKind::Id { with_zero } => {
            let n = coerce_int(field, raw)?;
            Ok(Value::Int(check_id(field, n, *with_zero, config)?))
        }

        FieldKind::Timestamp { in_future } => {
            let ts = coerce_float(field, raw)?;
            if !(0.0..=TIMESTAMP_MAX).contains(&ts) {
                return Err(field_error(
                    field,
                    ErrorCode::InvalidValue,
                    format!("Ensure this value is between 0 and {TIMESTAMP_MAX}."),
                ));
            }
            let secs = ts.trunc() as i64;
            let nanos = (ts.fract() * 1e9).round() as u32;
            let dt = chrono::DateTime::from_timestamp(secs, nanos).ok_or_else(|| {
                field_error(field, ErrorCode::InvalidValue, "Enter a valid timestamp.")
            })?;
            if !in_future && dt > (config.now)() {
                return Err(field_error(
                    field,
                    ErrorCode::InvalidValue,
                    "Timestamp cannot be in the future.",
                ));
            }
            Ok(Value::DateTime(dt))
        }

        FieldKind::DateTime { mask } => {
            let s = coerce_string(field, raw)?;
            let dt = parse_with_mask(&s, mask).ok_or_else(|| {
                field_error(
                    field,
                    ErrorCode::InvalidFormat,
                    format!("Invalid value format ({mask})."),
                )
            })?;
            Ok(Value::DateTime(dt.and_utc()))
        }

        FieldKind::Date { mask } => {
            let s = coerce_string(field, raw)?;
            let dt = parse_with_mask(&s, mask).ok_or_else(|| {
                field_error(
                    field,
                    ErrorCode::InvalidFormat,
                    format!("Invalid value format ({mask})."),
                )
            })?;
            Ok(Value::Date(dt.date()))
        }

        FieldKind::Month { mask } => {
            let s = coerce_string(field, raw)?;
            let dt = parse_with_mask(&s, mask).ok_or_else(|| {
                field_error(
                    field,
                    ErrorCode::InvalidFormat,
                    format!("Invalid value format ({mask})."),
                )
            })?;
            let date = dt.date();
            Ok(Value::Date(date.with_day(1).unwrap_or(date)))
        }

        FieldKind::Boolean => {
            let val = match raw {
                RawValue::Str(s) => {
                    let lower = s.to_lowercase();
                    !(lower.is_empty() || lower == "false" || lower == "0")
                }
                other => other.is_truthy(),
            };
            Ok(Value::Bool(val))
        }

        FieldKind::Json { schema } => {
            let decoded = decode_json(field, raw)?;
            if let Some(schema) = schema {
                check_schema(field, schema, &decoded)?;
            }
            Ok(Value::Json(decoded))
        }

        FieldKind::Array {
            min_items,
            max_items,
            item_schema,
        } => {
            let integer_items = item_schema
                .as_ref()
                .and_then(|s| s.get("type"))
                .and_then(serde_json::Value::as_str)
                == Some("integer");
            let items = parse_array_items(field, raw, integer_items)?;
            check_item_bounds(field, items.len(), *min_items, *max_items)?;
            if let Some(schema) = item_schema {
                for (i, item) in items.iter().enumerate() {
                    check_schema(field, schema, item).map_err(|e| {
                        ValidationError::new(e.code, format!("Item {i}: {}", e.message))
                    })?;
                }
            }
            Ok(Value::Json(serde_json::Value::Array(items)))
        }

        FieldKind::IdArray {
            min_items,
            max_items,
        } => {
            let ids = clean_id_items(field, raw, *min_items, *max_items, config)?;
            Ok(Value::List(ids.into_iter().map(Value::Int).collect()))
        }

        FieldKind::IdSet {
            min_items,
            max_items,
        } => {
            let mut ids = clean_id_items(field, raw, *min_items, *max_items, config)?;
            let mut seen = HashSet::new();
            ids.retain(|id| seen.insert(*id));
            Ok(Value::List(ids.into_iter().map(Value::Int).collect()))
        }

        FieldKind::File {
            max_size,
            valid_extensions,
        } => {
            let RawValue::File(file) = raw else {
                return Err(field_error(
                    field,
                    ErrorCode::InvalidFormat,
                    "Upload a valid file.",
                ));
            };
            if let Some(exts) = valid_extensions {
                let ext = file.extension().unwrap_or_default();
                if !exts.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
                    return Err(field_error(
                        field,
                        ErrorCode::InvalidExtension,
                        format!(
                            "File extension '{ext}' is not allowed. Allowed extensions: {}.",
                            exts.join(", ")
                        ),
                    ));
                }
            }
            if let Some(max) = max_size {
                if file.size > *max {
                    return Err(field_error(
                        field,
                        ErrorCode::FileTooLarge,
                        format!(
                            "File size exceeds maximum of {max} bytes ({} given).",
                            file.size
                        ),
                    ));
                }
            }
            Ok(Value::File(file.clone()))
        }
    }
}
