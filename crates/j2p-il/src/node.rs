//! A single, dynamically-tagged IL AST node.

use serde_json::Value;
use std::fmt;

/// §7.1: the only error category the IL layer itself raises — a
/// structurally invalid `ast` argument never reaches the transformer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IlError {
    NotAnObject,
    MissingProgramRoot,
    MissingField(&'static str),
}

impl fmt::Display for IlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IlError::NotAnObject => write!(f, "Invalid AST"),
            IlError::MissingProgramRoot => write!(f, "Invalid AST"),
            IlError::MissingField(name) => write!(f, "IL node is missing field `{name}`"),
        }
    }
}

impl std::error::Error for IlError {}

/// A node in the IL AST, kept as a thin tagged wrapper over a JSON value
/// rather than an exhaustive closed enum.
///
/// The distilled contract (§6) only promises that "every node has a `type`
/// tag" — it does not define a closed grammar of IL node shapes, because
/// the IL AST is produced by an external, versioned upstream component
/// (§1: "Deliberately out of scope"). Modeling every field of every
/// upstream node kind here would either drift out of sync with that
/// component or require guessing at shapes the spec never pins down.
/// Instead, `j2p-transform` pattern-matches on [`IlNode::kind`] and reads
/// only the fields each lowering rule documents needing; anything it
/// doesn't recognize falls through to the `UNHANDLED_EXPRESSION_<Type>`
/// policy of §4.3.7/§7.3.
#[derive(Debug, Clone, PartialEq)]
pub struct IlNode(Value);

impl IlNode {
    pub fn from_value(value: Value) -> Self {
        IlNode(value)
    }

    /// The node's `type` tag, e.g. `"CallExpression"`.
    pub fn kind(&self) -> &str {
        self.0.get("type").and_then(Value::as_str).unwrap_or("Unknown")
    }

    pub fn get(&self, field: &str) -> Option<IlNode> {
        let value = self.0.get(field)?;
        if value.is_null() {
            return None;
        }
        Some(IlNode(value.clone()))
    }

    pub fn get_array(&self, field: &str) -> Vec<IlNode> {
        self.0
            .get(field)
            .and_then(Value::as_array)
            .map(|items| items.iter().cloned().map(IlNode).collect())
            .unwrap_or_default()
    }

    pub fn get_str<'a>(&'a self, field: &str) -> Option<&'a str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn get_bool(&self, field: &str) -> bool {
        self.0.get(field).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn is_present(&self, field: &str) -> bool {
        matches!(self.0.get(field), Some(v) if !v.is_null())
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }

    /// Reads a `Literal` node's numeric `value` field, as opposed to
    /// [`IlNode::as_f64`] which only matches a bare JSON number at this
    /// node's own position.
    pub fn literal_f64(&self) -> Option<f64> {
        self.0.get("value").and_then(Value::as_f64)
    }

    pub fn as_bool_value(&self) -> Option<bool> {
        self.0.as_bool()
    }

    pub fn as_str_value(&self) -> Option<&str> {
        self.0.as_str()
    }

    pub fn is_null_value(&self) -> bool {
        self.0.is_null()
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }
}
