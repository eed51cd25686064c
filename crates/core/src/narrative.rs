//! Typed view of `narrative_styles.config`.
//!
//! The text-generation component keys styles by id (e.g. `"status"`) and reads
//! `tone`, `max_chars`, and `persona` from the config document. The store does
//! not validate these keys; this type supplies the conventional fallbacks when
//! a style or a key is missing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeConfig {
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_max_chars")]
    pub max_chars: u32,
    #[serde(default = "default_persona")]
    pub persona: String,
}

fn default_tone() -> String {
    "neutral".into()
}

fn default_max_chars() -> u32 {
    240
}

fn default_persona() -> String {
    "narrator".into()
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        NarrativeConfig {
            tone: default_tone(),
            max_chars: default_max_chars(),
            persona: default_persona(),
        }
    }
}

impl NarrativeConfig {
    /// Parse a raw config document, falling back to defaults for missing or
    /// malformed keys rather than erroring.
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_config_round_trips() {
        let cfg = NarrativeConfig::from_value(json!({
            "tone": "urgent",
            "max_chars": 180,
            "persona": "battle_observer",
        }));
        assert_eq!(cfg.tone, "urgent");
        assert_eq!(cfg.max_chars, 180);
        assert_eq!(cfg.persona, "battle_observer");
    }

    #[test]
    fn missing_keys_fall_back() {
        let cfg = NarrativeConfig::from_value(json!({ "tone": "grim" }));
        assert_eq!(cfg.tone, "grim");
        assert_eq!(cfg.max_chars, 240);
        assert_eq!(cfg.persona, "narrator");
    }

    #[test]
    fn garbage_falls_back_entirely() {
        let cfg = NarrativeConfig::from_value(json!([1, 2, 3]));
        assert_eq!(cfg, NarrativeConfig::default());
    }
}
