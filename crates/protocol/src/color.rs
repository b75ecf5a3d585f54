use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have 6 hex digits: {0:?}")]
    Length(String),
    #[error("invalid hex digit in color: {0:?}")]
    Digit(String),
}

/// An opaque `#RRGGBB` color token carried by chains and particles.
///
/// `Copy`, so handing a chain's color to a pooled particle is a plain
/// byte copy. Serializes as its hex string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for HexColor {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(digits) = s.strip_prefix('#') else {
            return Err(HexColorError::MissingHash(s.to_string()));
        };
        if digits.len() != 6 {
            return Err(HexColorError::Length(s.to_string()));
        }
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| HexColorError::Digit(s.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

// --- Serde ---

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_case() {
        let c: HexColor = "#14f195".parse().expect("valid color");
        assert_eq!(c, HexColor::rgb(0x14, 0xF1, 0x95));
        assert_eq!(c.to_string(), "#14F195");
    }

    #[test]
    fn rejects_malformed() {
        assert!(matches!(
            "F7931A".parse::<HexColor>(),
            Err(HexColorError::MissingHash(_))
        ));
        assert!(matches!(
            "#F793".parse::<HexColor>(),
            Err(HexColorError::Length(_))
        ));
        assert!(matches!(
            "#F7931G".parse::<HexColor>(),
            Err(HexColorError::Digit(_))
        ));
        // Multi-byte characters must not panic on slicing.
        assert!("#é1234".parse::<HexColor>().is_err());
    }

    #[test]
    fn serde_as_string() {
        let c = HexColor::rgb(0xF7, 0x93, 0x1A);
        let json = serde_json::to_string(&c).expect("serialize");
        assert_eq!(json, "\"#F7931A\"");
        let back: HexColor = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, c);
        assert!(serde_json::from_str::<HexColor>("\"orange\"").is_err());
    }
}
