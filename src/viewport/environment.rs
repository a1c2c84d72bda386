//! Environment lighting presets
//!
//! Each preset is a sky/ground fill pair plus the background gradient. The
//! fill goes into the rasterizer as a hemisphere light.

use crate::rasterizer::{Color, Light};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentPreset {
    Apartment,
    #[default]
    City,
    Dawn,
    Forest,
    Lobby,
    Night,
    Park,
    Studio,
    Sunset,
    Warehouse,
}

/// Colors and strength of a preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentLight {
    pub sky: Color,
    pub ground: Color,
    pub intensity: f32,
    pub background_top: Color,
    pub background_bottom: Color,
}

impl EnvironmentPreset {
    pub const ALL: [EnvironmentPreset; 10] = [
        EnvironmentPreset::Apartment,
        EnvironmentPreset::City,
        EnvironmentPreset::Dawn,
        EnvironmentPreset::Forest,
        EnvironmentPreset::Lobby,
        EnvironmentPreset::Night,
        EnvironmentPreset::Park,
        EnvironmentPreset::Studio,
        EnvironmentPreset::Sunset,
        EnvironmentPreset::Warehouse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnvironmentPreset::Apartment => "apartment",
            EnvironmentPreset::City => "city",
            EnvironmentPreset::Dawn => "dawn",
            EnvironmentPreset::Forest => "forest",
            EnvironmentPreset::Lobby => "lobby",
            EnvironmentPreset::Night => "night",
            EnvironmentPreset::Park => "park",
            EnvironmentPreset::Studio => "studio",
            EnvironmentPreset::Sunset => "sunset",
            EnvironmentPreset::Warehouse => "warehouse",
        }
    }

    pub fn light(self) -> EnvironmentLight {
        let (sky, ground, intensity) = match self {
            EnvironmentPreset::Apartment => (Color::new(255, 236, 214), Color::new(120, 96, 80), 0.27),
            EnvironmentPreset::City => (Color::new(214, 226, 240), Color::new(110, 108, 104), 0.3),
            EnvironmentPreset::Dawn => (Color::new(255, 200, 170), Color::new(90, 80, 100), 0.24),
            EnvironmentPreset::Forest => (Color::new(200, 230, 190), Color::new(70, 90, 50), 0.24),
            EnvironmentPreset::Lobby => (Color::new(255, 240, 220), Color::new(130, 110, 90), 0.3),
            EnvironmentPreset::Night => (Color::new(90, 110, 160), Color::new(20, 20, 30), 0.18),
            EnvironmentPreset::Park => (Color::new(210, 235, 255), Color::new(90, 110, 70), 0.3),
            EnvironmentPreset::Studio => (Color::new(255, 255, 255), Color::new(150, 150, 150), 0.33),
            EnvironmentPreset::Sunset => (Color::new(255, 180, 130), Color::new(80, 60, 70), 0.27),
            EnvironmentPreset::Warehouse => (Color::new(230, 225, 215), Color::new(100, 95, 90), 0.27),
        };
        EnvironmentLight {
            sky,
            ground,
            intensity,
            background_top: sky.lerp(Color::WHITE, 0.5),
            background_bottom: sky.lerp(ground, 0.35),
        }
    }

    /// Hemisphere fill light for the rasterizer
    pub fn fill_light(self) -> Light {
        let env = self.light();
        let mut light = Light::hemisphere(env.sky, env.ground, env.intensity);
        light.name = format!("Environment ({})", self.name());
        light
    }
}

impl fmt::Display for EnvironmentPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown environment preset '{0}'")]
pub struct UnknownPreset(pub String);

impl FromStr for EnvironmentPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        EnvironmentPreset::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::LightType;

    #[test]
    fn test_parse_names() {
        for preset in EnvironmentPreset::ALL {
            assert_eq!(preset.name().parse::<EnvironmentPreset>(), Ok(preset));
        }
        assert_eq!("City".parse::<EnvironmentPreset>(), Ok(EnvironmentPreset::City));
        assert!("mars".parse::<EnvironmentPreset>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let preset: EnvironmentPreset = ron::from_str("sunset").unwrap();
        assert_eq!(preset, EnvironmentPreset::Sunset);
        assert_eq!(ron::to_string(&EnvironmentPreset::City).unwrap(), "city");
    }

    #[test]
    fn test_fill_light_is_hemisphere() {
        let light = EnvironmentPreset::default().fill_light();
        assert!(matches!(light.light_type, LightType::Hemisphere { .. }));
        assert!(light.intensity > 0.0);
    }
}
