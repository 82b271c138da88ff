//! The IL AST root (§6: "a root `Program` with `body` being an ordered
//! sequence of top-level items").

use crate::node::{IlError, IlNode};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<IlNode>,
}

impl Program {
    pub fn from_value(value: Value) -> Result<Self, IlError> {
        let obj = value.as_object().ok_or(IlError::NotAnObject)?;
        if obj.get("type").and_then(Value::as_str) != Some("Program") {
            return Err(IlError::MissingProgramRoot);
        }
        let body = obj
            .get("body")
            .and_then(Value::as_array)
            .ok_or(IlError::MissingField("body"))?
            .iter()
            .cloned()
            .map(IlNode::from_value)
            .collect();
        Ok(Program { body })
    }

    pub fn from_json_str(source: &str) -> Result<Self, IlError> {
        let value: Value = serde_json::from_str(source).map_err(|_| IlError::NotAnObject)?;
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_object_ast() {
        let err = Program::from_value(json!("not an object")).unwrap_err();
        assert_eq!(err, IlError::NotAnObject);
    }

    #[test]
    fn rejects_missing_program_root() {
        let err = Program::from_value(json!({"type": "File"})).unwrap_err();
        assert_eq!(err, IlError::MissingProgramRoot);
    }

    #[test]
    fn accepts_empty_program() {
        let program = Program::from_value(json!({"type": "Program", "body": []})).unwrap();
        assert!(program.body.is_empty());
    }

    #[test]
    fn parses_top_level_items() {
        let program = Program::from_value(json!({
            "type": "Program",
            "body": [
                {"type": "VariableDeclaration", "kind": "const"},
                {"type": "FunctionDeclaration", "id": {"type": "Identifier", "name": "f"}}
            ]
        }))
        .unwrap();
        assert_eq!(program.body.len(), 2);
        assert_eq!(program.body[0].kind(), "VariableDeclaration");
    }
}
