//! Decoder configuration types
//!
//! This module defines the small set of knobs the decoder library exposes.
//! Anything about fetching pages or choosing output formats belongs to the
//! application layer.

use crate::convert::TimestampZone;
use serde::{Deserialize, Serialize};

/// What to do with a SMART attribute id missing from the revision's registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownAttributePolicy {
    /// Keep the item and show a placeholder name
    #[default]
    Placeholder,
    /// Same as `Placeholder`, and log a warning for every such id
    Warn,
}

/// Configuration for the decoder library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Handling of unregistered attribute ids
    #[serde(default)]
    pub unknown_attributes: UnknownAttributePolicy,

    /// Timezone used to render device timestamps
    #[serde(default)]
    pub timestamp_zone: TimestampZone,

    /// Name shown for unknown attributes
    #[serde(default = "default_placeholder")]
    pub unknown_placeholder: String,
}

fn default_placeholder() -> String {
    "unknown".to_string()
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            unknown_attributes: UnknownAttributePolicy::default(),
            timestamp_zone: TimestampZone::default(),
            unknown_placeholder: default_placeholder(),
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the unknown attribute policy
    pub fn with_unknown_attributes(mut self, policy: UnknownAttributePolicy) -> Self {
        self.unknown_attributes = policy;
        self
    }

    /// Builder method: set the timestamp timezone
    pub fn with_timestamp_zone(mut self, zone: TimestampZone) -> Self {
        self.timestamp_zone = zone;
        self
    }

    /// Builder method: set the placeholder name for unknown attributes
    pub fn with_unknown_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.unknown_placeholder = placeholder.into();
        self
    }
}
