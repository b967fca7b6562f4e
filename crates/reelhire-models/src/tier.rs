//! Plan tiers and feature entitlements.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Plan tier enumeration.
///
/// Multi-segment composition, image overlays and audio mixing are
/// Premium features; Standard sessions are degraded rather than
/// rejected when they request them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Standard,
    Premium,
}

impl PlanTier {
    /// Parse from string (case-insensitive). Unknown values map to Standard.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "premium" => PlanTier::Premium,
            _ => PlanTier::Standard,
        }
    }

    /// Get the tier name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Standard => "standard",
            PlanTier::Premium => "premium",
        }
    }

    /// Whether multi-segment composition is available.
    pub fn can_compose_segments(&self) -> bool {
        matches!(self, PlanTier::Premium)
    }

    /// Whether image overlay (watermark) parameters are available.
    pub fn can_overlay(&self) -> bool {
        matches!(self, PlanTier::Premium)
    }

    /// Whether audio-mix parameters are available.
    pub fn can_mix_audio(&self) -> bool {
        matches!(self, PlanTier::Premium)
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Format bytes as human-readable string (KB, MB, GB).
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
