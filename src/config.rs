//! Pipeline-wide validation configuration.
//!
//! The id fields' upper bound and the timestamp field's current-time source
//! are supplied explicitly at pipeline construction rather than read from
//! ambient global state, so tests can pin both.

use chrono::{DateTime, Utc};

/// Configuration shared by every field cleaned in one pipeline.
///
/// # Examples
///
/// ```
/// use rest_form_fields::config::ValidationConfig;
///
/// let config = ValidationConfig::default().with_id_max_value(1_000_000);
/// assert_eq!(config.id_max_value, Some(1_000_000));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ValidationConfig {
    /// Upper bound for id fields and id-collection elements.
    /// `None` leaves ids unbounded above.
    pub id_max_value: Option<i64>,
    /// Current-time source for the timestamp field's future check.
    pub now: fn() -> DateTime<Utc>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            id_max_value: None,
            now: Utc::now,
        }
    }
}

impl ValidationConfig {
    /// Sets the upper bound for id fields.
    #[must_use]
    pub const fn with_id_max_value(mut self, max: i64) -> Self {
        self.id_max_value = Some(max);
        self
    }

    /// Sets the current-time source used by the timestamp future check.
    #[must_use]
    pub fn with_now(mut self, now: fn() -> DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}
