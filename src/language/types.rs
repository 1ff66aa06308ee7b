//! Values held in a parsed configuration

use serde::{Serialize, Serializer};

use super::Document;

/// One value in a configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text, quoted on output when it needs to be.
    Str(String),
    /// Text reproduced exactly as it was found; never quoted on output.
    Raw(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    /// The key is present but has no value. Only valid as a dict value.
    Eol,
    List(Vec<Value>),
    Dict(Document),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) | Value::Raw(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Document> {
        match self {
            Value::Dict(document) => Some(document),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_eol(&self) -> bool {
        matches!(self, Value::Eol)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Str(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Str(text)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Int(number)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Float(number)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        Value::Dict(document)
    }
}

// Both kinds of text become JSON strings; a missing value and `none` both
// become null.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(text) | Value::Raw(text) => serializer.serialize_str(text),
            Value::Int(number) => serializer.serialize_i64(*number),
            Value::Float(number) => serializer.serialize_f64(*number),
            Value::Bool(flag) => serializer.serialize_bool(*flag),
            Value::None | Value::Eol => serializer.serialize_unit(),
            Value::List(items) => serializer.collect_seq(items),
            Value::Dict(document) => document.serialize(serializer),
        }
    }
}
