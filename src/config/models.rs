use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::validate::{COORDINATE_PAIR, HEX_COLOR};

/// Raised when a raw string does not have the shape of a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueParseError {
    #[error("expected '(x, y)' with non-negative integer coordinates, got '{0}'")]
    Coordinates(String),
    #[error("expected '#RRGGBB', got '{0}'")]
    Color(String),
}

/// An absolute screen position, parsed from `(x, y)`.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl FromStr for ScreenPoint {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueParseError::Coordinates(s.to_string());
        let caps = COORDINATE_PAIR.captures(s).ok_or_else(invalid)?;
        // The pattern guarantees digits; only overflow can fail here.
        let x = caps[1].parse().map_err(|_| invalid())?;
        let y = caps[2].parse().map_err(|_| invalid())?;
        Ok(Self { x, y })
    }
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A color as read from the screen, parsed from `#RRGGBB`.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FromStr for Rgb {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = HEX_COLOR
            .captures(s)
            .ok_or_else(|| ValueParseError::Color(s.to_string()))?;
        let packed = u32::from_str_radix(&caps[1], 16)
            .map_err(|_| ValueParseError::Color(s.to_string()))?;
        let [_, r, g, b] = packed.to_be_bytes();
        Ok(Self { r, g, b })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
