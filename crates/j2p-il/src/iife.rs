//! IIFE/UMD wrapper recognition (§4.3.1, §9 "IIFE unwrapping").
//!
//! The source domain wraps whole files in UMD/IIFE patterns. This module
//! only recognizes the shape syntactically; `j2p-transform` decides what
//! to do with the lifted statements.

use crate::node::IlNode;

/// True when `node` is `ExpressionStatement(CallExpression(FunctionExpression(...)))`
/// (optionally with a factory-argument form), the classic IIFE/UMD wrapper
/// shape.
pub fn is_iife_wrapper(node: &IlNode) -> bool {
    if node.kind() != "ExpressionStatement" {
        return false;
    }
    let Some(expr) = node.get("expression") else {
        return false;
    };
    is_iife_call(&expr)
}

fn is_iife_call(expr: &IlNode) -> bool {
    if expr.kind() != "CallExpression" {
        return false;
    }
    let Some(callee) = expr.get("callee") else {
        return false;
    };
    matches!(callee.kind(), "FunctionExpression" | "ArrowFunctionExpression")
}

/// Lifts the statements inside the IIFE's factory body to file scope. A
/// trailing `return` at that level is discarded (§4.3.1: "Returns at that
/// level are discarded").
pub fn unwrap_iife_body(node: &IlNode) -> Vec<IlNode> {
    let Some(expr) = node.get("expression") else {
        return Vec::new();
    };
    let Some(callee) = expr.get("callee") else {
        return Vec::new();
    };
    let Some(body) = callee.get("body") else {
        return Vec::new();
    };
    body.get_array("body")
        .into_iter()
        .filter(|stmt| stmt.kind() != "ReturnStatement")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty_block() -> serde_json::Value {
        json!({"type": "BlockStatement", "body": []})
    }

    #[test]
    fn recognizes_classic_iife() {
        let node = IlNode::from_value(json!({
            "type": "ExpressionStatement",
            "expression": {
                "type": "CallExpression",
                "callee": {"type": "FunctionExpression", "params": [], "body": empty_block()},
                "arguments": []
            }
        }));
        assert!(is_iife_wrapper(&node));
    }

    #[test]
    fn recognizes_arrow_iife() {
        let node = IlNode::from_value(json!({
            "type": "ExpressionStatement",
            "expression": {
                "type": "CallExpression",
                "callee": {"type": "ArrowFunctionExpression", "params": [], "body": empty_block()},
                "arguments": []
            }
        }));
        assert!(is_iife_wrapper(&node));
    }

    #[test]
    fn rejects_plain_call() {
        let node = IlNode::from_value(json!({
            "type": "ExpressionStatement",
            "expression": {
                "type": "CallExpression",
                "callee": {"type": "Identifier", "name": "foo"},
                "arguments": []
            }
        }));
        assert!(!is_iife_wrapper(&node));
    }

    #[test]
    fn rejects_non_expression_statement() {
        let node = IlNode::from_value(json!({"type": "VariableDeclaration"}));
        assert!(!is_iife_wrapper(&node));
    }

    #[test]
    fn unwrap_drops_trailing_return_only() {
        let node = IlNode::from_value(json!({
            "type": "ExpressionStatement",
            "expression": {
                "type": "CallExpression",
                "callee": {
                    "type": "FunctionExpression",
                    "params": [],
                    "body": {"type": "BlockStatement", "body": [
                        {"type": "VariableDeclaration", "kind": "const"},
                        {"type": "ReturnStatement", "argument": null}
                    ]}
                },
                "arguments": []
            }
        }));
        let lifted = unwrap_iife_body(&node);
        assert_eq!(lifted.len(), 1);
        assert_eq!(lifted[0].kind(), "VariableDeclaration");
    }
}
