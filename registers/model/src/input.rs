// Licensed under the Apache-2.0 license

//! Serde representation of a register description document.
//!
//! Every key is optional at this level, and every value falls back to a
//! raw [`serde_json::Value`] when it has the wrong type, so that missing,
//! unknown and mistyped keys can be reported against the entity they belong
//! to (see [`crate::Module::elaborate`]) rather than as an anonymous serde
//! error.
//!
//! ```text
//! {
//!   "name": "uart", "description": "...", "width": 32,
//!   "registers": [
//!     { "name": "ctrl", "description": "...", "access": "read-write",
//!       "addressOffset": "0x10", "reset": 0,
//!       "fields": [
//!         { "name": "enable", "description": "...", "bitWidth": 1,
//!           "bitOffset": 0, "reset": 1, "access": "read-write",
//!           "selfClear": true, "userWriteStrobe": "no" } ] } ]
//! }
//! ```

use crate::error::{Entity, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An integer that may be written as a JSON number, a `"0x.."` hex
/// string, or a decimal string.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntValue {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl IntValue {
    /// Decodes the value as an unsigned integer.
    pub fn to_u64(&self) -> std::result::Result<u64, String> {
        match self {
            IntValue::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Ok(v)
                } else if n.as_i64().is_some() {
                    Err(format!("negative value {n}"))
                } else {
                    Err(format!("{n} is not an integer"))
                }
            }
            IntValue::Text(s) => {
                let trimmed = s.trim();
                let parsed = match trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                {
                    Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
                    None => trimmed.replace('_', "").parse::<u64>(),
                };
                parsed.map_err(|_| format!("'{s}' is not a valid integer"))
            }
            IntValue::Other(v) => Err(format!("expected an integer, found {v}")),
        }
    }
}

impl From<u64> for IntValue {
    fn from(val: u64) -> Self {
        IntValue::Number(val.into())
    }
}

/// A flag that may be written as a boolean, an integer or a string.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl FlagValue {
    /// Decodes `true`/`false`, `1`/`0` and `"yes"`/`"no"`.
    pub fn to_bool(&self) -> std::result::Result<bool, String> {
        match self {
            FlagValue::Bool(b) => Ok(*b),
            FlagValue::Number(n) => match n.as_u64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(format!("{n} is not 0 or 1")),
            },
            FlagValue::Text(s) => match s.as_str() {
                "yes" => Ok(true),
                "no" => Ok(false),
                _ => Err(format!("'{s}' is not 'yes' or 'no'")),
            },
            FlagValue::Other(v) => Err(format!("expected a flag, found {v}")),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(val: bool) -> Self {
        FlagValue::Bool(val)
    }
}

/// A string-valued key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Text(String),
    Other(serde_json::Value),
}

impl TextValue {
    /// The string, or `None` if the document held another type.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TextValue::Text(s) => Some(s),
            TextValue::Other(_) => None,
        }
    }

    pub fn to_text(&self) -> std::result::Result<&str, String> {
        match self {
            TextValue::Text(s) => Ok(s),
            TextValue::Other(v) => Err(format!("expected a string, found {v}")),
        }
    }
}

impl From<&str> for TextValue {
    fn from(val: &str) -> Self {
        TextValue::Text(val.to_string())
    }
}

/// A list of registers or fields.
///
/// A list holding anything other than objects falls back to
/// [`ListValue::Other`] as a whole.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListValue<T> {
    List(Vec<T>),
    Other(serde_json::Value),
}

impl<T> ListValue<T> {
    pub fn to_list(&self) -> std::result::Result<&[T], String> {
        match self {
            ListValue::List(items) => Ok(items),
            ListValue::Other(v) => Err(format!("expected a list of objects, found {v}")),
        }
    }
}

impl<T> From<Vec<T>> for ListValue<T> {
    fn from(val: Vec<T>) -> Self {
        ListValue::List(val)
    }
}

/// Unknown keys collected for error reporting.
pub type UnknownKeys = BTreeMap<String, serde_json::Value>;

/// Top-level module description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleDesc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TextValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<TextValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<IntValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registers: Option<ListValue<RegisterDesc>>,
    #[serde(flatten)]
    pub unknown: UnknownKeys,
}

/// Register description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterDesc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TextValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<TextValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<TextValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_offset: Option<IntValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset: Option<IntValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ListValue<FieldDesc>>,
    #[serde(flatten)]
    pub unknown: UnknownKeys,
}

/// Field description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldDesc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<TextValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<TextValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_width: Option<IntValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_offset: Option<IntValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset: Option<IntValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<TextValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_clear: Option<FlagValue>,
    /// Legacy spelling: 0 clears the field, 1 sets it.
    #[serde(rename = "selfClear/Set", skip_serializing_if = "Option::is_none")]
    pub self_clear_set: Option<FlagValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_write_strobe: Option<FlagValue>,
    #[serde(flatten)]
    pub unknown: UnknownKeys,
}

impl ModuleDesc {
    /// Decodes a JSON document.
    ///
    /// Non-ASCII characters are rejected up front since none of the
    /// output grammars accept them in identifiers or comments.
    pub fn from_json(text: &str) -> Result<Self> {
        check_ascii(text)?;
        serde_json::from_str(text)
            .map_err(|e| Error::structural(Entity::module(""), format!("invalid document: {e}")))
    }

    /// Encodes this description as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        let name = self.name.as_ref().and_then(TextValue::as_str).unwrap_or_default();
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::structural(Entity::module(name), format!("cannot encode: {e}")))
    }
}

fn check_ascii(text: &str) -> Result<()> {
    for (line_idx, line) in text.lines().enumerate() {
        if let Some(c) = line.chars().find(|c| !c.is_ascii()) {
            return Err(Error::structural(
                Entity::module(""),
                format!(
                    "non-ascii character '{c}' in line {}; only ASCII input is supported",
                    line_idx + 1
                ),
            ));
        }
    }
    Ok(())
}
