//! AST node definitions.
//!
//! Expressions and statements are closed sum types; passes match on them
//! exhaustively. Child links are arena references and node lists are arena
//! slices. Nothing in a built tree is mutable, so it can be shared across
//! threads by reference.

use crate::types::*;
use rlox_core::intern::InternedString;
use rlox_core::text::TextRange;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all AST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeData {
    pub id: NodeId,
    pub range: TextRange,
}

impl NodeData {
    pub fn new(id: NodeId, range: TextRange) -> Self {
        Self { id, range }
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

// ============================================================================
// Identifier
// ============================================================================

/// A name as written in the source.
#[derive(Debug, Clone, Copy)]
pub struct Identifier<'a> {
    pub data: NodeData,
    /// The interned name, used for all comparisons.
    pub text: InternedString,
    /// The name as text, used in messages.
    pub name: &'a str,
}

impl Identifier<'_> {
    #[inline]
    pub fn range(&self) -> TextRange {
        self.data.range
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug)]
pub enum Expr<'a> {
    Literal(LiteralExpr<'a>),
    Variable(VariableExpr<'a>),
    Assign(AssignExpr<'a>),
    Binary(BinaryExpr<'a>),
    Unary(UnaryExpr<'a>),
    Logical(LogicalExpr<'a>),
    Call(CallExpr<'a>),
    Get(GetExpr<'a>),
    Set(SetExpr<'a>),
    Grouping(GroupingExpr<'a>),
    Conditional(ConditionalExpr<'a>),
    This(ThisExpr),
    Super(SuperExpr<'a>),
}

impl<'a> Expr<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Expr::Literal(n) => &n.data,
            Expr::Variable(n) => &n.data,
            Expr::Assign(n) => &n.data,
            Expr::Binary(n) => &n.data,
            Expr::Unary(n) => &n.data,
            Expr::Logical(n) => &n.data,
            Expr::Call(n) => &n.data,
            Expr::Get(n) => &n.data,
            Expr::Set(n) => &n.data,
            Expr::Grouping(n) => &n.data,
            Expr::Conditional(n) => &n.data,
            Expr::This(n) => &n.data,
            Expr::Super(n) => &n.data,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.data().id
    }

    #[inline]
    pub fn range(&self) -> TextRange {
        self.data().range
    }
}

#[derive(Debug)]
pub struct LiteralExpr<'a> {
    pub data: NodeData,
    pub value: LiteralValue<'a>,
}

/// A read of a variable. Its `data.id` is the reference-site identity.
#[derive(Debug, Clone, Copy)]
pub struct VariableExpr<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
}

/// `name = value`. Its `data.id` is the reference-site identity of `name`.
#[derive(Debug)]
pub struct AssignExpr<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub value: &'a Expr<'a>,
}

#[derive(Debug)]
pub struct BinaryExpr<'a> {
    pub data: NodeData,
    pub left: &'a Expr<'a>,
    pub operator: BinaryOperator,
    pub right: &'a Expr<'a>,
}

#[derive(Debug)]
pub struct UnaryExpr<'a> {
    pub data: NodeData,
    pub operator: UnaryOperator,
    pub operand: &'a Expr<'a>,
}

#[derive(Debug)]
pub struct LogicalExpr<'a> {
    pub data: NodeData,
    pub left: &'a Expr<'a>,
    pub operator: LogicalOperator,
    pub right: &'a Expr<'a>,
}

#[derive(Debug)]
pub struct CallExpr<'a> {
    pub data: NodeData,
    pub callee: &'a Expr<'a>,
    pub arguments: NodeList<'a, &'a Expr<'a>>,
}

/// `object.name`
#[derive(Debug)]
pub struct GetExpr<'a> {
    pub data: NodeData,
    pub object: &'a Expr<'a>,
    pub name: Identifier<'a>,
}

/// `object.name = value`
#[derive(Debug)]
pub struct SetExpr<'a> {
    pub data: NodeData,
    pub object: &'a Expr<'a>,
    pub name: Identifier<'a>,
    pub value: &'a Expr<'a>,
}

#[derive(Debug)]
pub struct GroupingExpr<'a> {
    pub data: NodeData,
    pub expression: &'a Expr<'a>,
}

/// `condition ? then_branch : else_branch`
#[derive(Debug)]
pub struct ConditionalExpr<'a> {
    pub data: NodeData,
    pub condition: &'a Expr<'a>,
    pub then_branch: &'a Expr<'a>,
    pub else_branch: &'a Expr<'a>,
}

#[derive(Debug)]
pub struct ThisExpr {
    pub data: NodeData,
    pub keyword: TextRange,
}

/// `super.method`
#[derive(Debug)]
pub struct SuperExpr<'a> {
    pub data: NodeData,
    pub keyword: TextRange,
    pub method: Identifier<'a>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug)]
pub enum Stmt<'a> {
    Expression(ExpressionStatement<'a>),
    Print(PrintStatement<'a>),
    Var(VarDeclaration<'a>),
    /// A braced block that opens its own scope.
    Block(Block<'a>),
    /// A statement sequence that runs in the enclosing scope.
    Unscoped(Block<'a>),
    If(IfStatement<'a>),
    While(WhileStatement<'a>),
    For(ForStatement<'a>),
    Return(ReturnStatement<'a>),
    Function(FunctionDeclaration<'a>),
    Class(ClassDeclaration<'a>),
}

impl<'a> Stmt<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Stmt::Expression(n) => &n.data,
            Stmt::Print(n) => &n.data,
            Stmt::Var(n) => &n.data,
            Stmt::Block(n) | Stmt::Unscoped(n) => &n.data,
            Stmt::If(n) => &n.data,
            Stmt::While(n) => &n.data,
            Stmt::For(n) => &n.data,
            Stmt::Return(n) => &n.data,
            Stmt::Function(n) => &n.data,
            Stmt::Class(n) => &n.data,
        }
    }

    #[inline]
    pub fn range(&self) -> TextRange {
        self.data().range
    }
}

#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expr<'a>,
}

#[derive(Debug)]
pub struct PrintStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expr<'a>,
}

/// `var name = initializer;`
#[derive(Debug)]
pub struct VarDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub initializer: Option<&'a Expr<'a>>,
}

#[derive(Debug)]
pub struct Block<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Stmt<'a>>,
}

#[derive(Debug)]
pub struct IfStatement<'a> {
    pub data: NodeData,
    pub condition: &'a Expr<'a>,
    pub then_branch: &'a Stmt<'a>,
    pub else_branch: Option<&'a Stmt<'a>>,
}

#[derive(Debug)]
pub struct WhileStatement<'a> {
    pub data: NodeData,
    pub condition: &'a Expr<'a>,
    pub body: &'a Stmt<'a>,
}

/// A C-style loop. Every clause may be absent.
#[derive(Debug)]
pub struct ForStatement<'a> {
    pub data: NodeData,
    pub initializer: Option<&'a Stmt<'a>>,
    pub condition: Option<&'a Expr<'a>>,
    pub increment: Option<&'a Expr<'a>>,
    pub body: Option<&'a Stmt<'a>>,
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub data: NodeData,
    pub keyword: TextRange,
    pub value: Option<&'a Expr<'a>>,
}

/// A named function. Also used for class methods.
///
/// The body is resolved inside the parameter scope, so it is a bare
/// statement list rather than a [`Block`].
#[derive(Debug)]
pub struct FunctionDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub parameters: NodeList<'a, Identifier<'a>>,
    pub body: NodeList<'a, Stmt<'a>>,
}

#[derive(Debug)]
pub struct ClassDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub superclass: Option<VariableExpr<'a>>,
    pub methods: NodeList<'a, FunctionDeclaration<'a>>,
}

// ============================================================================
// Program
// ============================================================================

/// The root of a parsed source file.
#[derive(Debug)]
pub struct Program<'a> {
    pub file_name: &'a str,
    pub statements: NodeList<'a, Stmt<'a>>,
}
