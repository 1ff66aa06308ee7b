//! Ordered mapping from configuration keys to values

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use super::{DocumentError, Value};

/// How many levels [`Document::format`] descends by default.
pub const DEFAULT_FORMAT_DEPTH: usize = 10;

/// A parsed configuration, or one block within it. Keys are unique and keep
/// the order they were inserted in. Values are shared between a document
/// and the views derived from it, and copied only when modified.
#[derive(Debug, Clone, Default)]
pub struct Document {
    entries: IndexMap<String, Arc<Value>>,
    inline: bool,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    /// An inline document is spliced into its parent when encoded: no braces
    /// of its own, its first entry on the parent's line.
    pub fn inline() -> Document {
        Document {
            entries: IndexMap::new(),
            inline: true,
        }
    }

    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Add an entry. If the key is already present its value is replaced
    /// where it stands and the old value returned.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries
            .insert(key.into(), Arc::new(value.into()))
            .map(Arc::unwrap_or_clone)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .get(key)
            .map(|value| &**value)
    }

    /// Mutable access to a value. A value shared with another document is
    /// copied first, so the other document is unaffected.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .get_mut(key)
            .map(Arc::make_mut)
    }

    /// Remove an entry, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries
            .shift_remove(key)
            .map(Arc::unwrap_or_clone)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), &**value))
    }

    pub fn first(&self) -> Option<(&str, &Value)> {
        self.entries
            .first()
            .map(|(key, value)| (key.as_str(), &**value))
    }

    /// The entries whose keys match a shell wildcard pattern. `*` matches
    /// across `/`, so `ltm pool *` finds pools in every partition.
    pub fn glob(&self, pattern: &str) -> Result<Document, DocumentError> {
        let pattern = compile_glob(pattern)?;
        Ok(self.filter(|key| pattern.matches(key)))
    }

    /// The entries whose keys match a regular expression at their start.
    pub fn matching(&self, pattern: &str) -> Result<Document, DocumentError> {
        let re = regex::Regex::new(&format!("^(?:{})", pattern)).map_err(|error| {
            DocumentError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: error.to_string(),
            }
        })?;
        Ok(self.filter(|key| re.is_match(key)))
    }

    /// The last word of every key matching a wildcard pattern; for keys
    /// like `ltm pool /Common/p1` that is the object's name.
    pub fn glob_keys(&self, pattern: &str) -> Result<Vec<&str>, DocumentError> {
        let pattern = compile_glob(pattern)?;
        Ok(self
            .keys()
            .filter(|key| pattern.matches(key))
            .map(|key| {
                key.rsplit(' ')
                    .next()
                    .unwrap_or(key)
            })
            .collect())
    }

    /// A copy with `old` renamed to `new`, in the same position, along with
    /// the value held under it.
    pub fn rename_key(&self, old: &str, new: &str) -> Result<(Document, Value), DocumentError> {
        let value = match self.get(old) {
            Some(value) => value.clone(),
            None => return Err(DocumentError::KeyNotFound(old.to_string())),
        };
        if old != new && self.contains_key(new) {
            return Err(DocumentError::DuplicateKey(new.to_string()));
        }

        let entries = self
            .entries
            .iter()
            .map(|(key, value)| {
                let key = if key == old { new } else { key.as_str() };
                (key.to_string(), Arc::clone(value))
            })
            .collect();

        let document = Document {
            entries,
            inline: self.inline,
        };
        Ok((document, value))
    }

    /// A copy with `%(name)s` placeholders replaced from `bindings`, in keys
    /// and in text values, down to `max_depth` levels. `%%` becomes `%`; any
    /// other `%` is left alone.
    pub fn format(
        &self,
        bindings: &HashMap<String, String>,
        max_depth: usize,
    ) -> Result<Document, DocumentError> {
        self.format_at(bindings, 0, max_depth)
    }

    fn format_at(
        &self,
        bindings: &HashMap<String, String>,
        depth: usize,
        max_depth: usize,
    ) -> Result<Document, DocumentError> {
        if depth >= max_depth {
            return Ok(self.clone());
        }

        let mut result = Document {
            entries: IndexMap::with_capacity(self.len()),
            inline: self.inline,
        };

        for (key, value) in &self.entries {
            let key = substitute(key, bindings)?;
            let value = match &**value {
                Value::Str(_) | Value::Raw(_) | Value::List(_) | Value::Dict(_) => {
                    Arc::new(value.formatted(bindings, depth + 1, max_depth)?)
                }
                _ => Arc::clone(value),
            };
            result
                .entries
                .insert(key, value);
        }

        Ok(result)
    }

    /// The configuration text for this document.
    pub fn dumps(&self) -> String {
        crate::formatting::encode(self)
    }

    fn filter<P>(&self, predicate: P) -> Document
    where
        P: Fn(&str) -> bool,
    {
        let entries = self
            .entries
            .iter()
            .filter(|(key, _)| predicate(key))
            .map(|(key, value)| (key.clone(), Arc::clone(value)))
            .collect();

        Document {
            entries,
            inline: false,
        }
    }
}

impl Value {
    fn formatted(
        &self,
        bindings: &HashMap<String, String>,
        depth: usize,
        max_depth: usize,
    ) -> Result<Value, DocumentError> {
        if depth >= max_depth {
            return Ok(self.clone());
        }

        let value = match self {
            Value::Str(text) => Value::Str(substitute(text, bindings)?),
            Value::Raw(text) => Value::Raw(substitute(text, bindings)?),
            Value::List(items) => Value::List(
                items
                    .iter()
                    .map(|item| item.formatted(bindings, depth + 1, max_depth))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Dict(document) => Value::Dict(document.format_at(bindings, depth, max_depth)?),
            other => other.clone(),
        };

        Ok(value)
    }
}

// Entries are compared in order; two documents holding the same entries in
// a different order are different configurations.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.inline == other.inline
            && self.len() == other.len()
            && self
                .iter()
                .eq(other.iter())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

fn compile_glob(pattern: &str) -> Result<glob::Pattern, DocumentError> {
    glob::Pattern::new(pattern).map_err(|error| DocumentError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: error
            .msg
            .to_string(),
    })
}

fn substitute(text: &str, bindings: &HashMap<String, String>) -> Result<String, DocumentError> {
    if !text.contains('%') {
        return Ok(text.to_string());
    }

    let re = crate::compile!(r"^%\(([^)]*)\)[sdir]");

    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(i) = rest.find('%') {
        result.push_str(&rest[..i]);
        let tail = &rest[i..];

        if tail.starts_with("%%") {
            result.push('%');
            rest = &tail[2..];
        } else if let Some(captures) = re.captures(tail) {
            let name = &captures[1];
            let value = bindings
                .get(name)
                .ok_or_else(|| DocumentError::MissingBinding(name.to_string()))?;
            result.push_str(value);
            rest = &tail[captures[0].len()..];
        } else {
            result.push('%');
            rest = &tail[1..];
        }
    }

    result.push_str(rest);
    Ok(result)
}
