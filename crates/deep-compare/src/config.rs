//! Per-call comparison settings.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reflect::Field;

static DEFAULT_CONFIG: Lazy<Config> = Lazy::new(Config::default);

/// Settings applied to one comparison.
///
/// A `Config` is never mutated by a comparison, so one instance can be
/// shared between threads and reused across calls. Every field is optional
/// when deserializing, which lets test harnesses keep it in fixtures:
///
/// ```
/// let config: deep_compare::Config =
///     serde_json::from_str(r#"{ "observe_field_tag": "cmp" }"#).unwrap();
/// assert!(!config.ignore_array_order);
/// assert_eq!(config.tag_name(), Some("cmp"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Match sequence elements as a multiset instead of by index.
    pub ignore_array_order: bool,
    /// Name of the field annotation consulted for per-field rules.
    pub observe_field_tag: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared process-wide default, used by the free functions.
    pub fn default_ref() -> &'static Config {
        &DEFAULT_CONFIG
    }

    pub fn with_ignore_array_order(mut self, ignore: bool) -> Self {
        self.ignore_array_order = ignore;
        self
    }

    pub fn with_field_tag(mut self, tag: impl Into<String>) -> Self {
        self.observe_field_tag = Some(tag.into());
        self
    }

    /// The configured tag name. An empty name means no tag.
    pub fn tag_name(&self) -> Option<&str> {
        self.observe_field_tag
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    pub(crate) fn field_rule(&self, field: &Field<'_>) -> FieldRule {
        match self.tag_name() {
            Some(name) => FieldRule::from_tag(field.tag(name)),
            None => FieldRule::Compare,
        }
    }
}

/// How a struct field takes part in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Compare,
    /// `"-"`: the field is ignored.
    Skip,
    /// `"+"`: only zero versus non-zero is compared.
    ZeroOnly,
}

impl FieldRule {
    pub fn from_tag(value: Option<&str>) -> Self {
        match value {
            Some("-") => FieldRule::Skip,
            Some("+") => FieldRule::ZeroOnly,
            _ => FieldRule::Compare,
        }
    }
}

/// Invalid settings on the configuration surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown color mode '{value}': expected one of auto, always, never")]
    UnknownColorMode { value: String },

    #[error("String window must be at least 1 byte wide")]
    EmptyStringWindow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::Record;

    #[test]
    fn test_field_rule_from_tag() {
        assert_eq!(FieldRule::from_tag(Some("-")), FieldRule::Skip);
        assert_eq!(FieldRule::from_tag(Some("+")), FieldRule::ZeroOnly);
        assert_eq!(FieldRule::from_tag(Some("omitempty")), FieldRule::Compare);
        assert_eq!(FieldRule::from_tag(None), FieldRule::Compare);
    }

    #[test]
    fn test_field_rule_requires_configured_tag() {
        let value = 1u8;
        let record = Record::new().tagged_field("id", &value, &[("cmp", "-")]);
        let field = &record.fields()[0];

        assert_eq!(Config::new().field_rule(field), FieldRule::Compare);
        assert_eq!(Config::new().with_field_tag("").field_rule(field), FieldRule::Compare);
        assert_eq!(Config::new().with_field_tag("json").field_rule(field), FieldRule::Compare);
        assert_eq!(Config::new().with_field_tag("cmp").field_rule(field), FieldRule::Skip);
    }

    #[test]
    fn test_default_ref_is_default() {
        assert_eq!(Config::default_ref(), &Config::default());
        assert!(std::ptr::eq(Config::default_ref(), Config::default_ref()));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{"ignore_array_order": true}"#).unwrap();
        assert!(config.ignore_array_order);
        assert_eq!(config.tag_name(), None);
    }
}
