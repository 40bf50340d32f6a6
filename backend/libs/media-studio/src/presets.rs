//! Output presets
//!
//! A fixed table of named render targets. The table is `'static` and never
//! mutated, so it is shared freely. The first entry is the default selection.
use serde::Serialize;

use crate::error::{Result, StudioError};

/// Named output target for a rendered asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    /// Encoded as "W:H"
    pub aspect_ratio: &'static str,
}

static PRESETS: [Preset; 4] = [
    Preset {
        name: "Instagram Square (1:1)",
        width: 1080,
        height: 1080,
        aspect_ratio: "1:1",
    },
    Preset {
        name: "Instagram Portrait (4:5)",
        width: 1080,
        height: 1350,
        aspect_ratio: "4:5",
    },
    Preset {
        name: "Twitter Post (16:9)",
        width: 1200,
        height: 675,
        aspect_ratio: "16:9",
    },
    Preset {
        name: "Twitter Header (3:1)",
        width: 1500,
        height: 500,
        aspect_ratio: "3:1",
    },
];

/// Look up a preset by its exact name
pub fn get(name: &str) -> Result<&'static Preset> {
    PRESETS
        .iter()
        .find(|preset| preset.name == name)
        .ok_or_else(|| StudioError::UnknownPreset(name.to_string()))
}

/// Preset names in declaration order
pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|preset| preset.name)
}

/// All presets in declaration order
pub fn all() -> &'static [Preset] {
    &PRESETS
}

/// The initial selection
pub fn default_preset() -> &'static Preset {
    &PRESETS[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_declared_values() {
        let expected = [
            ("Instagram Square (1:1)", 1080, 1080, "1:1"),
            ("Instagram Portrait (4:5)", 1080, 1350, "4:5"),
            ("Twitter Post (16:9)", 1200, 675, "16:9"),
            ("Twitter Header (3:1)", 1500, 500, "3:1"),
        ];

        for (name, width, height, ratio) in expected {
            let preset = get(name).unwrap();
            assert_eq!(preset.name, name);
            assert_eq!(preset.width, width);
            assert_eq!(preset.height, height);
            assert_eq!(preset.aspect_ratio, ratio);
        }
    }

    #[test]
    fn test_unknown_preset() {
        let err = get("nonexistent").unwrap_err();
        assert_eq!(err, StudioError::UnknownPreset("nonexistent".to_string()));
    }

    #[test]
    fn test_lookup_is_exact() {
        assert!(get("instagram square (1:1)").is_err());
        assert!(get(" Instagram Square (1:1)").is_err());
    }

    #[test]
    fn test_names_follow_declaration_order() {
        let names: Vec<_> = names().collect();
        assert_eq!(
            names,
            vec![
                "Instagram Square (1:1)",
                "Instagram Portrait (4:5)",
                "Twitter Post (16:9)",
                "Twitter Header (3:1)",
            ]
        );
    }

    #[test]
    fn test_default_is_first() {
        assert_eq!(default_preset(), &all()[0]);
        assert_eq!(default_preset().name, "Instagram Square (1:1)");
    }

    #[test]
    fn test_names_are_unique_and_dimensions_positive() {
        let mut seen = std::collections::HashSet::new();
        for preset in all() {
            assert!(seen.insert(preset.name), "duplicate preset {}", preset.name);
            assert!(preset.width > 0 && preset.height > 0);
        }
    }
}
