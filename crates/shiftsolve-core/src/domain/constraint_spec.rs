//! Constraint configuration entries.

use std::collections::BTreeMap;

/// A configuration value for a constraint's `parameters` map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    StrList(Vec<String>),
}

impl ParamValue {
    pub fn as_positive_int(&self) -> Option<u32> {
        match self {
            ParamValue::Int(i) if *i > 0 => Some(*i as u32),
            _ => None,
        }
    }

    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::StrList(v) => Some(v),
            _ => None,
        }
    }
}

/// A single constraint's configuration entry.
///
/// Entries absent from the configuration map default to
/// `{enabled: true, is_hard: true, weight: 100, parameters: {}}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintSpec {
    #[cfg_attr(feature = "serde", serde(default = "default_enabled"))]
    pub enabled: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_is_hard"))]
    pub is_hard: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: BTreeMap<String, ParamValue>,
}

#[allow(dead_code)]
fn default_enabled() -> bool {
    true
}
#[allow(dead_code)]
fn default_is_hard() -> bool {
    true
}
#[allow(dead_code)]
fn default_weight() -> u32 {
    100
}

impl Default for ConstraintSpec {
    fn default() -> Self {
        ConstraintSpec {
            enabled: true,
            is_hard: true,
            weight: 100,
            parameters: BTreeMap::new(),
        }
    }
}

impl ConstraintSpec {
    pub fn get_param(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }
}
