//! Preset catalog and custom preset construction

use serde::{Deserialize, Serialize};

/// Identifier of the synthetic preset built from user-chosen minutes
pub const CUSTOM_PRESET_ID: &str = "custom";

/// Bounds for custom minute values
pub const MIN_CUSTOM_MINUTES: u32 = 1;
pub const MAX_CUSTOM_MINUTES: u32 = 120;

/// Named duration template with display metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub label: String,
    pub minutes: u32,
    pub description: String,
    /// Display color token, no effect on timing
    pub accent: String,
}

impl Preset {
    fn named(id: &str, label: &str, minutes: u32, description: &str, accent: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            minutes,
            description: description.to_string(),
            accent: accent.to_string(),
        }
    }

    /// Build the synthetic custom preset from an unvalidated minute value
    pub fn custom(raw_minutes: f64) -> Self {
        let minutes = clamp_custom_minutes(raw_minutes);
        Self::named(
            CUSTOM_PRESET_ID,
            "Custom",
            minutes,
            &format!("Your own {}-minute session", minutes),
            "amber",
        )
    }

    /// Full configured duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.minutes) * 60_000
    }

    pub fn is_custom(&self) -> bool {
        self.id == CUSTOM_PRESET_ID
    }
}

/// The preset a fresh timer starts on
pub fn default_preset() -> Preset {
    Preset::named(
        "deep-focus",
        "Deep Focus",
        50,
        "Long uninterrupted block for demanding work",
        "indigo",
    )
}

/// The fixed preset catalog, in display order. The first entry is [`default_preset`].
pub fn catalog() -> Vec<Preset> {
    vec![
        default_preset(),
        Preset::named(
            "pomodoro",
            "Pomodoro",
            25,
            "Classic sprint, pairs well with a short break",
            "tomato",
        ),
        Preset::named(
            "short-break",
            "Short Break",
            5,
            "Stand up, stretch, look away from the screen",
            "mint",
        ),
        Preset::named(
            "long-break",
            "Long Break",
            15,
            "Restorative pause after a few sprints",
            "sky",
        ),
    ]
}

/// Look up a catalog preset by id
pub fn find_preset(id: &str) -> Option<Preset> {
    catalog().into_iter().find(|preset| preset.id == id)
}

/// Coerce a raw minute value into the custom range, rounding to the nearest integer
pub fn clamp_custom_minutes(raw: f64) -> u32 {
    if raw.is_nan() {
        return MIN_CUSTOM_MINUTES;
    }
    let rounded = raw.round().clamp(MIN_CUSTOM_MINUTES as f64, MAX_CUSTOM_MINUTES as f64);
    rounded as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let presets = catalog();
        let ids: HashSet<_> = presets.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), presets.len());
        assert!(!ids.contains(CUSTOM_PRESET_ID));
    }

    #[test]
    fn test_first_preset_is_deep_focus() {
        let first = &catalog()[0];
        assert_eq!(first.label, "Deep Focus");
        assert_eq!(first.minutes, 50);
    }

    #[test]
    fn test_find_preset() {
        assert_eq!(find_preset("pomodoro").map(|p| p.minutes), Some(25));
        assert!(find_preset("nap").is_none());
    }

    #[test]
    fn test_clamp_custom_minutes() {
        assert_eq!(clamp_custom_minutes(0.0), 1);
        assert_eq!(clamp_custom_minutes(-30.0), 1);
        assert_eq!(clamp_custom_minutes(150.0), 120);
        assert_eq!(clamp_custom_minutes(42.4), 42);
        assert_eq!(clamp_custom_minutes(42.5), 43);
        assert_eq!(clamp_custom_minutes(0.6), 1);
        assert_eq!(clamp_custom_minutes(f64::NAN), 1);
        assert_eq!(clamp_custom_minutes(f64::INFINITY), 120);
        assert_eq!(clamp_custom_minutes(f64::NEG_INFINITY), 1);
    }

    #[test]
    fn test_custom_preset_duration() {
        let preset = Preset::custom(7.0);
        assert!(preset.is_custom());
        assert_eq!(preset.duration_ms(), 420_000);
    }

    #[test]
    fn test_custom_preset_clamps_raw_minutes() {
        assert_eq!(Preset::custom(0.0).minutes, 1);
        assert_eq!(Preset::custom(500.0).minutes, 120);
        assert_eq!(Preset::custom(2.4).description, "Your own 2-minute session");
    }

    #[test]
    fn test_default_preset_heads_catalog() {
        assert_eq!(catalog()[0], default_preset());
    }
}
