//! The owned GML abstract syntax tree.
//!
//! A parse yields one [`Node`] with a `Program` kind that owns all subtrees
//! by value. The `type` tags produced by serialization are the stable wire
//! format downstream tools key off; adding fields is a minor change, removing
//! or renaming a tag is breaking.

use serde_derive::Serialize;

use crate::location::{Location, LocationRange};
use crate::trivia::Comment;

pub type ScopeId = u32;

/// A single AST node: the tagged payload plus its source range.
///
/// `start`/`end` are absent when the caller disables locations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Location>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, start: None, end: None }
    }

    pub fn with_range(kind: NodeKind, start: Location, end: Location) -> Self {
        Self { kind, start: Some(start), end: Some(end) }
    }

    /// The node's `type` tag as serialized.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

/// A value copy of a declaration's whereabouts, stamped on references when
/// identifier metadata is enabled. Not a pointer into the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Location>,
    pub scope_id: ScopeId,
}

/// The closed enumeration of node kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum NodeKind {
    // Programs and blocks
    Program {
        body: Vec<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        comments: Option<Vec<Comment>>,
    },
    BlockStatement {
        body: Vec<Node>,
    },

    // Statements
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    DoUntilStatement {
        body: Box<Node>,
        test: Box<Node>,
    },
    WhileStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    ForStatement {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    RepeatStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    WithStatement {
        object: Box<Node>,
        body: Box<Node>,
    },
    SwitchStatement {
        discriminant: Box<Node>,
        cases: Vec<Node>,
    },
    SwitchCase {
        test: Option<Box<Node>>,
        body: Vec<Node>,
    },
    ContinueStatement {},
    BreakStatement {},
    ExitStatement {},
    ReturnStatement {
        argument: Option<Box<Node>>,
    },
    ThrowStatement {
        argument: Option<Box<Node>>,
    },
    TryStatement {
        block: Box<Node>,
        handler: Option<Box<Node>>,
        finalizer: Option<Box<Node>>,
    },
    CatchClause {
        param: Option<Box<Node>>,
        body: Box<Node>,
    },
    Finalizer {
        body: Box<Node>,
    },
    DeleteStatement {
        argument: Box<Node>,
    },
    ExpressionStatement {
        expression: Box<Node>,
    },
    IdentifierStatement {
        name: Box<Node>,
    },
    MacroDeclaration {
        name: Box<Node>,
        tokens: String,
    },
    DefineStatement {
        replacement_directive: String,
        name: String,
    },
    RegionStatement {
        name: Option<String>,
    },
    EndRegionStatement {
        name: Option<String>,
    },
    GlobalVarStatement {
        declarations: Vec<Node>,
        kind: String,
    },
    EnumDeclaration {
        name: Box<Node>,
        members: Vec<Node>,
        has_trailing_comma: bool,
    },
    EnumMember {
        name: Box<Node>,
        initializer: Option<Box<Node>>,
    },
    VariableDeclaration {
        declarations: Vec<Node>,
        kind: String,
    },
    VariableDeclarator {
        id: Box<Node>,
        init: Option<Box<Node>>,
    },
    IncDecStatement {
        operator: String,
        prefix: bool,
        argument: Box<Node>,
    },

    // Expressions
    AssignmentExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryExpression {
        operator: String,
        prefix: bool,
        argument: Box<Node>,
    },
    IncDecExpression {
        operator: String,
        prefix: bool,
        argument: Box<Node>,
    },
    TernaryExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    CallExpression {
        object: Box<Node>,
        arguments: Vec<Node>,
    },
    NewExpression {
        expression: Box<Node>,
        arguments: Vec<Node>,
    },
    MemberDotExpression {
        object: Box<Node>,
        property: Box<Node>,
    },
    MemberIndexExpression {
        object: Box<Node>,
        property: Vec<Node>,
        accessor: String,
    },
    ParenthesizedExpression {
        expression: Box<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        synthetic: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<String>,
    },
    Identifier {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_global_identifier: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        scope_id: Option<ScopeId>,
        #[serde(skip_serializing_if = "Option::is_none")]
        declaration: Option<DeclarationRef>,
        #[serde(skip_serializing_if = "Option::is_none")]
        classifications: Option<Vec<String>>,
    },
    Literal {
        value: String,
    },
    TemplateStringExpression {
        atoms: Vec<Node>,
    },
    TemplateStringText {
        value: String,
    },
    ArrayExpression {
        elements: Vec<Node>,
        has_trailing_comma: bool,
    },
    StructExpression {
        properties: Vec<Node>,
        has_trailing_comma: bool,
    },
    Property {
        name: Box<Node>,
        value: Box<Node>,
    },
    FunctionDeclaration {
        id: Option<Box<Node>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        id_location: Option<LocationRange>,
        params: Vec<Node>,
        body: Box<Node>,
        has_trailing_comma: bool,
    },
    ConstructorDeclaration {
        id: Option<Box<Node>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        id_location: Option<LocationRange>,
        params: Vec<Node>,
        body: Box<Node>,
        parent: Option<Box<Node>>,
        has_trailing_comma: bool,
    },
    ConstructorParentClause {
        id: Box<Node>,
        params: Vec<Node>,
        has_trailing_comma: bool,
    },
    InheritanceClause {
        id: Box<Node>,
        arguments: Vec<Node>,
    },
    StructDeclaration {
        id: Option<Box<Node>>,
        params: Vec<Node>,
        body: Box<Node>,
        parent: Option<Box<Node>>,
    },
    DefaultParameter {
        left: Box<Node>,
        right: Box<Node>,
    },
    MissingOptionalArgument {},
}

impl NodeKind {
    /// The serialized `type` tag for this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::BlockStatement { .. } => "BlockStatement",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::DoUntilStatement { .. } => "DoUntilStatement",
            NodeKind::WhileStatement { .. } => "WhileStatement",
            NodeKind::ForStatement { .. } => "ForStatement",
            NodeKind::RepeatStatement { .. } => "RepeatStatement",
            NodeKind::WithStatement { .. } => "WithStatement",
            NodeKind::SwitchStatement { .. } => "SwitchStatement",
            NodeKind::SwitchCase { .. } => "SwitchCase",
            NodeKind::ContinueStatement {} => "ContinueStatement",
            NodeKind::BreakStatement {} => "BreakStatement",
            NodeKind::ExitStatement {} => "ExitStatement",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::ThrowStatement { .. } => "ThrowStatement",
            NodeKind::TryStatement { .. } => "TryStatement",
            NodeKind::CatchClause { .. } => "CatchClause",
            NodeKind::Finalizer { .. } => "Finalizer",
            NodeKind::DeleteStatement { .. } => "DeleteStatement",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::IdentifierStatement { .. } => "IdentifierStatement",
            NodeKind::MacroDeclaration { .. } => "MacroDeclaration",
            NodeKind::DefineStatement { .. } => "DefineStatement",
            NodeKind::RegionStatement { .. } => "RegionStatement",
            NodeKind::EndRegionStatement { .. } => "EndRegionStatement",
            NodeKind::GlobalVarStatement { .. } => "GlobalVarStatement",
            NodeKind::EnumDeclaration { .. } => "EnumDeclaration",
            NodeKind::EnumMember { .. } => "EnumMember",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::VariableDeclarator { .. } => "VariableDeclarator",
            NodeKind::IncDecStatement { .. } => "IncDecStatement",
            NodeKind::AssignmentExpression { .. } => "AssignmentExpression",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::IncDecExpression { .. } => "IncDecExpression",
            NodeKind::TernaryExpression { .. } => "TernaryExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::NewExpression { .. } => "NewExpression",
            NodeKind::MemberDotExpression { .. } => "MemberDotExpression",
            NodeKind::MemberIndexExpression { .. } => "MemberIndexExpression",
            NodeKind::ParenthesizedExpression { .. } => "ParenthesizedExpression",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::TemplateStringExpression { .. } => "TemplateStringExpression",
            NodeKind::TemplateStringText { .. } => "TemplateStringText",
            NodeKind::ArrayExpression { .. } => "ArrayExpression",
            NodeKind::StructExpression { .. } => "StructExpression",
            NodeKind::Property { .. } => "Property",
            NodeKind::FunctionDeclaration { .. } => "FunctionDeclaration",
            NodeKind::ConstructorDeclaration { .. } => "ConstructorDeclaration",
            NodeKind::ConstructorParentClause { .. } => "ConstructorParentClause",
            NodeKind::InheritanceClause { .. } => "InheritanceClause",
            NodeKind::StructDeclaration { .. } => "StructDeclaration",
            NodeKind::DefaultParameter { .. } => "DefaultParameter",
            NodeKind::MissingOptionalArgument {} => "MissingOptionalArgument",
        }
    }

    /// Convenience constructor for a plain identifier with no metadata.
    pub fn identifier(name: impl Into<String>) -> NodeKind {
        NodeKind::Identifier {
            name: name.into(),
            is_global_identifier: None,
            scope_id: None,
            declaration: None,
            classifications: None,
        }
    }
}
