//! Typed result values and the per-invocation slot container.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ParseError;

/// A parsed value stored in a result slot.
///
/// Entities with `nargs == 1` store a scalar; every other arity stores a
/// [`List`](Value::List) in input order. Options store [`Flag`](Value::Flag).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Unconverted text.
    String(String),
    /// Parsed integer.
    Integer(i64),
    /// Parsed float.
    Float(f64),
    /// Path that passed its filesystem check.
    Path(PathBuf),
    /// Values of a multi-token entity.
    List(Vec<Value>),
    /// Option presence.
    Flag(bool),
}

impl Value {
    /// The text of a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number of an `Integer` value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The number of a `Float` value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// The path of a `Path` value.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// The items of a `List` value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Renders the value back into the tokens it was parsed from.
    pub fn to_tokens(&self) -> Vec<String> {
        match self {
            Self::String(s) => vec![s.clone()],
            Self::Integer(n) => vec![n.to_string()],
            Self::Float(n) => vec![n.to_string()],
            Self::Path(p) => vec![p.to_string_lossy().into_owned()],
            Self::List(items) => items.iter().flat_map(Value::to_tokens).collect(),
            Self::Flag(_) => Vec::new(),
        }
    }
}

/// Result container for one command invocation, indexed by slot.
///
/// Created by the command runner with one empty entry per declared field,
/// handed to the command handler and dropped once the handler returns.
///
/// # Examples
///
/// ```
/// use argtree_engine::{Slots, Value};
///
/// let slots = Slots::new(2);
/// assert_eq!(slots.len(), 2);
/// assert!(slots.get(0).is_none());
/// assert!(!slots.flag(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slots {
    values: Vec<Option<Value>>,
}

impl Slots {
    /// Creates `fields` empty slots.
    pub fn new(fields: usize) -> Self {
        Self {
            values: vec![None; fields],
        }
    }

    /// Like [`new`](Self::new), reporting allocation failure instead of
    /// aborting.
    pub(crate) fn try_new(fields: usize) -> Result<Self, ParseError> {
        let mut values = Vec::new();
        values
            .try_reserve_exact(fields)
            .map_err(|_| ParseError::AllocationFailure)?;
        values.resize(fields, None);
        Ok(Self { values })
    }

    pub(crate) fn set(&mut self, slot: usize, value: Value) {
        self.values[slot] = Some(value);
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the command declares no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value in `slot`, or `None` if it was not filled.
    pub fn get(&self, slot: usize) -> Option<&Value> {
        self.values.get(slot).and_then(Option::as_ref)
    }

    /// Whether `slot` holds a value.
    pub fn is_set(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    /// Whether the option in `slot` was given.
    pub fn flag(&self, slot: usize) -> bool {
        matches!(self.get(slot), Some(Value::Flag(true)))
    }

    /// Text in `slot`.
    pub fn string(&self, slot: usize) -> Option<&str> {
        self.get(slot).and_then(Value::as_str)
    }

    /// Integer in `slot`.
    pub fn integer(&self, slot: usize) -> Option<i64> {
        self.get(slot).and_then(Value::as_integer)
    }

    /// Float in `slot`.
    pub fn float(&self, slot: usize) -> Option<f64> {
        self.get(slot).and_then(Value::as_float)
    }

    /// Path in `slot`.
    pub fn path(&self, slot: usize) -> Option<&Path> {
        self.get(slot).and_then(Value::as_path)
    }

    /// List in `slot`.
    pub fn list(&self, slot: usize) -> Option<&[Value]> {
        self.get(slot).and_then(Value::as_list)
    }

    /// Texts of a list of strings in `slot`.
    pub fn strings(&self, slot: usize) -> Option<Vec<&str>> {
        self.list(slot)?.iter().map(Value::as_str).collect()
    }

    /// Iterates over `(slot, value)` for every filled slot.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Value)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(slot, value)| value.as_ref().map(|v| (slot, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let mut slots = Slots::new(4);
        slots.set(0, Value::String("app.bin".into()));
        slots.set(1, Value::List(vec![Value::Integer(3), Value::Integer(4)]));
        slots.set(3, Value::Flag(true));

        assert_eq!(slots.string(0), Some("app.bin"));
        assert_eq!(slots.integer(0), None);
        assert_eq!(slots.list(1).map(<[Value]>::len), Some(2));
        assert_eq!(slots.strings(1), None);
        assert!(!slots.is_set(2));
        assert!(slots.flag(3));
        assert_eq!(slots.iter().map(|(slot, _)| slot).collect::<Vec<_>>(), vec![0, 1, 3]);
    }

    #[test]
    fn test_value_tokens() {
        let value = Value::List(vec![
            Value::String("-x".into()),
            Value::Float(2.5),
            Value::Path(PathBuf::from("/tmp")),
        ]);
        assert_eq!(value.to_tokens(), vec!["-x", "2.5", "/tmp"]);
        assert!(Value::Flag(true).to_tokens().is_empty());
    }

    #[test]
    fn test_value_serializes_untagged() {
        let value = Value::List(vec![Value::Integer(1), Value::String("two".into())]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[1,"two"]"#);
        assert_eq!(serde_json::to_string(&Value::Flag(true)).unwrap(), "true");
    }

    #[test]
    fn test_try_new_matches_new() {
        assert_eq!(Slots::try_new(3).unwrap(), Slots::new(3));
    }
}
