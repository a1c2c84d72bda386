//! Identifiers and color values held by the scene store

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a material slot in the model. Hover, selection and recoloring
/// are all keyed by this name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(String);

impl MaterialId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MaterialId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for MaterialId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MaterialId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Color as written by the user: a CSS-style hex string.
///
/// Values are stored exactly as given. Nothing is validated on write; a
/// string that does not parse simply has no RGB value when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build a `#rrggbb` string from 8-bit channels
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(format!("#{:02x}{:02x}{:02x}", r, g, b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (alpha is ignored).
    /// The leading `#` is optional. Returns `None` for anything else.
    pub fn to_rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.0.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Some((r * 17, g * 17, b * 17))
            }
            6 | 8 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => None,
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HexColor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!(HexColor::from("#ff0000").to_rgb(), Some((255, 0, 0)));
        assert_eq!(HexColor::from("#0f8").to_rgb(), Some((0, 255, 136)));
        assert_eq!(HexColor::from("12abEF").to_rgb(), Some((0x12, 0xab, 0xef)));
        assert_eq!(HexColor::from("#11223380").to_rgb(), Some((0x11, 0x22, 0x33)));
    }

    #[test]
    fn test_malformed_is_kept_but_has_no_rgb() {
        let c = HexColor::from("not a color");
        assert_eq!(c.as_str(), "not a color");
        assert_eq!(c.to_rgb(), None);
        assert_eq!(HexColor::from("#12345").to_rgb(), None);
        assert_eq!(HexColor::from("#ééé").to_rgb(), None);
    }

    #[test]
    fn test_from_rgb_formats_lowercase() {
        assert_eq!(HexColor::from_rgb(255, 10, 171).as_str(), "#ff0aab");
    }
}
