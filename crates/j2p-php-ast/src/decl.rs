//! PHP declaration nodes: classes, interfaces, traits, enums, and their
//! members (§3.1 "Declarations").

use crate::expr::{Expression, Parameter};
use crate::stmt::Block;
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Default for Visibility {
    fn default() -> Self {
        // §3.1: "methods default to `public`".
        Visibility::Public
    }
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_readonly: bool,
    pub ty: Option<Type>,
    pub name: String,
    pub default_value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<Type>,
    /// `None` for abstract / interface methods.
    pub body: Option<Block>,
    pub doc_comment: Option<String>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Method {
            visibility: Visibility::Public,
            is_static: false,
            is_final: false,
            is_abstract: false,
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            body: Some(Block::default()),
            doc_comment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Const {
    pub visibility: Visibility,
    pub name: String,
    pub ty: Option<Type>,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Class {
    pub name: String,
    pub is_final: bool,
    pub is_abstract: bool,
    pub is_readonly: bool,
    pub extends_class: Option<String>,
    pub implements_interfaces: Vec<String>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    pub doc_comment: Option<String>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Class {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Interface {
    pub name: String,
    pub extends_interfaces: Vec<String>,
    pub methods: Vec<Method>,
    pub consts: Vec<Const>,
    pub doc_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trait {
    pub name: String,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    pub doc_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumCase {
    pub name: String,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Enum {
    pub name: String,
    pub backing_type: Option<Type>,
    pub cases: Vec<EnumCase>,
    pub implements_interfaces: Vec<String>,
    pub methods: Vec<Method>,
    pub doc_comment: Option<String>,
}
