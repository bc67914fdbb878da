//! Token value model.
//!
//! Design-tool exports carry loosely typed values. They are parsed into the
//! closed [`TokenValue`] sum so that every comparator shares one equality
//! ([`TokenValue::same_as`]) instead of comparing serialized text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single token value.
///
/// Deserialization is shape-driven (untagged): `null`, booleans, numbers and
/// strings map to scalars; objects with exactly `r`/`g`/`b` (and optional `a`)
/// become [`ColorValue`]; `{"type": "VARIABLE_ALIAS", "id": ...}` becomes an
/// [`VariableAlias`]; any other object is a composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum TokenValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Color(ColorValue),
    Alias(VariableAlias),
    List(Vec<TokenValue>),
    Composite(BTreeMap<String, TokenValue>),
}

impl TokenValue {
    /// Canonical deep equality used by every comparator.
    ///
    /// Structural, not referential: composites compare key-by-key in sorted
    /// order and colors compare with a missing alpha treated as opaque.
    pub fn same_as(&self, other: &TokenValue) -> bool {
        self == other
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::String(value.to_string())
    }
}

impl From<f64> for TokenValue {
    fn from(value: f64) -> Self {
        TokenValue::Number(value)
    }
}

impl From<bool> for TokenValue {
    fn from(value: bool) -> Self {
        TokenValue::Bool(value)
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Null => write!(f, "null"),
            TokenValue::Bool(b) => write!(f, "{}", b),
            TokenValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            TokenValue::Number(n) => write!(f, "{}", n),
            TokenValue::String(s) => write!(f, "{}", s),
            TokenValue::Color(c) => write!(f, "{}", c.to_hex()),
            TokenValue::Alias(a) => write!(f, "{{alias:{}}}", a.id),
            TokenValue::List(_) | TokenValue::Composite(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

/// RGBA color with channels in `0.0..=1.0`, as exported by the design tool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorValue {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

impl ColorValue {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: None }
    }

    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    /// Alpha channel, defaulting to fully opaque
    pub fn alpha(&self) -> f64 {
        self.a.unwrap_or(1.0)
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque
    pub fn to_hex(&self) -> String {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let rgb = format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        );
        if self.alpha() < 1.0 {
            format!("{}{:02x}", rgb, channel(self.alpha()))
        } else {
            rgb
        }
    }
}

impl PartialEq for ColorValue {
    fn eq(&self, other: &Self) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b && self.alpha() == other.alpha()
    }
}

/// Reference to another variable by its stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableAlias {
    #[serde(rename = "type")]
    pub kind: AliasKind,
    pub id: String,
}

impl VariableAlias {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            kind: AliasKind::VariableAlias,
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasKind {
    #[serde(rename = "VARIABLE_ALIAS")]
    VariableAlias,
}
