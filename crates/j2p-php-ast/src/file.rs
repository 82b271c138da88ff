//! The file-level container node (§3.1 "File").

use crate::decl::{Class, Const, Enum, Interface, Trait};
use crate::expr::Expression;
use crate::stmt::FunctionDecl;

#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UseDeclaration {
    pub path: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopLevelItem {
    DocComment(String),
    Class(Class),
    Interface(Interface),
    Trait(Trait),
    Enum(Enum),
    Function(FunctionDecl),
    Const(Const),
    /// A module-level initializer statement (e.g. the body of an unwrapped
    /// IIFE that doesn't fit any other top-level shape).
    ExpressionStatement(Expression),
    RawCode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub strict_types: bool,
    pub namespace: Option<Namespace>,
    pub uses: Vec<UseDeclaration>,
    pub items: Vec<TopLevelItem>,
}

impl File {
    pub fn new() -> Self {
        File {
            strict_types: true,
            namespace: None,
            uses: Vec::new(),
            items: Vec::new(),
        }
    }
}

impl Default for File {
    fn default() -> Self {
        File::new()
    }
}
