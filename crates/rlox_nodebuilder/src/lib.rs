//! rlox_nodebuilder: AST node construction.
//!
//! [`NodeFactory`] allocates nodes in an [`AstArena`], hands out fresh
//! [`NodeId`]s and assigns source ranges. A parser can call it with the real
//! token positions (see [`NodeFactory::set_cursor`]); tests and benches let it
//! lay tokens out one after another.
//!
//! # Example
//! ```
//! use rlox_core::{AstArena, StringInterner};
//! use rlox_nodebuilder::NodeFactory;
//!
//! let arena = AstArena::new();
//! let interner = StringInterner::new();
//! let f = NodeFactory::new(&arena, &interner);
//!
//! // { var a = 1; print a; }
//! let program = f.program("main.lox", vec![f.block(vec![
//!     f.var("a", Some(f.number(1.0))),
//!     f.print(f.variable("a")),
//! ])]);
//! assert_eq!(program.statements.len(), 1);
//! ```

use rlox_ast::*;
use rlox_core::intern::StringInterner;
use rlox_core::text::{TextPos, TextRange};
use rlox_core::AstArena;
use std::cell::Cell;

/// Every call hands out new ids. A returned node placed in a tree more than
/// once keeps a single id, so the resolver records one entry for it.
pub struct NodeFactory<'a> {
    arena: &'a AstArena,
    interner: StringInterner,
    next_id: Cell<u32>,
    /// Where the next synthesized token starts.
    cursor: Cell<TextPos>,
}

impl<'a> NodeFactory<'a> {
    pub fn new(arena: &'a AstArena, interner: &StringInterner) -> Self {
        Self {
            arena,
            interner: interner.clone(),
            next_id: Cell::new(0),
            cursor: Cell::new(0),
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Number of node ids handed out so far.
    pub fn node_count(&self) -> u32 {
        self.next_id.get()
    }

    /// Place the next token at `pos`.
    pub fn set_cursor(&self, pos: TextPos) {
        self.cursor.set(pos);
    }

    fn next_node_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId(id)
    }

    /// Claim a token of `len` bytes at the cursor, leaving one byte of gap.
    fn token(&self, len: usize) -> TextRange {
        let pos = self.cursor.get();
        let end = pos + len as TextPos;
        self.cursor.set(end + 1);
        TextRange::new(pos, end)
    }

    fn node(&self, range: TextRange) -> NodeData {
        NodeData::new(self.next_node_id(), range)
    }

    fn expr(&self, expr: Expr<'a>) -> &'a Expr<'a> {
        self.arena.alloc(expr)
    }

    fn stmt(&self, stmt: Stmt<'a>) -> &'a Stmt<'a> {
        self.arena.alloc(stmt)
    }

    fn list<T>(&self, items: Vec<T>) -> NodeList<'a, T> {
        self.arena.alloc_slice(items)
    }

    // ========================================================================
    // Names
    // ========================================================================

    pub fn identifier(&self, name: &str) -> Identifier<'a> {
        let range = self.token(name.len());
        Identifier {
            data: self.node(range),
            text: self.interner.intern(name),
            name: self.arena.alloc_str(name),
        }
    }

    pub fn variable_expr(&self, name: &str) -> VariableExpr<'a> {
        let name = self.identifier(name);
        VariableExpr {
            data: self.node(name.range()),
            name,
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn literal(&self, value: LiteralValue<'a>, len: usize) -> &'a Expr<'a> {
        let range = self.token(len);
        self.expr(Expr::Literal(LiteralExpr {
            data: self.node(range),
            value,
        }))
    }

    pub fn nil(&self) -> &'a Expr<'a> {
        self.literal(LiteralValue::Nil, 3)
    }

    pub fn bool(&self, value: bool) -> &'a Expr<'a> {
        self.literal(LiteralValue::Bool(value), if value { 4 } else { 5 })
    }

    pub fn number(&self, value: f64) -> &'a Expr<'a> {
        self.literal(LiteralValue::Number(value), value.to_string().len())
    }

    pub fn string(&self, value: &str) -> &'a Expr<'a> {
        let text = self.arena.alloc_str(value);
        self.literal(LiteralValue::String(text), value.len() + 2)
    }

    pub fn variable(&self, name: &str) -> &'a Expr<'a> {
        self.expr(Expr::Variable(self.variable_expr(name)))
    }

    pub fn assign(&self, name: &str, value: &'a Expr<'a>) -> &'a Expr<'a> {
        let name = self.identifier(name);
        self.expr(Expr::Assign(AssignExpr {
            data: self.node(name.range().cover(value.range())),
            name,
            value,
        }))
    }

    pub fn binary(&self, left: &'a Expr<'a>, operator: BinaryOperator, right: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(Expr::Binary(BinaryExpr {
            data: self.node(left.range().cover(right.range())),
            left,
            operator,
            right,
        }))
    }

    pub fn unary(&self, operator: UnaryOperator, operand: &'a Expr<'a>) -> &'a Expr<'a> {
        let op = self.token(operator.as_str().len());
        self.expr(Expr::Unary(UnaryExpr {
            data: self.node(op.cover(operand.range())),
            operator,
            operand,
        }))
    }

    pub fn logical(&self, left: &'a Expr<'a>, operator: LogicalOperator, right: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(Expr::Logical(LogicalExpr {
            data: self.node(left.range().cover(right.range())),
            left,
            operator,
            right,
        }))
    }

    pub fn call(&self, callee: &'a Expr<'a>, arguments: Vec<&'a Expr<'a>>) -> &'a Expr<'a> {
        let close = self.token(1);
        self.expr(Expr::Call(CallExpr {
            data: self.node(callee.range().cover(close)),
            callee,
            arguments: self.list(arguments),
        }))
    }

    pub fn get(&self, object: &'a Expr<'a>, name: &str) -> &'a Expr<'a> {
        let name = self.identifier(name);
        self.expr(Expr::Get(GetExpr {
            data: self.node(object.range().cover(name.range())),
            object,
            name,
        }))
    }

    pub fn set(&self, object: &'a Expr<'a>, name: &str, value: &'a Expr<'a>) -> &'a Expr<'a> {
        let name = self.identifier(name);
        let range = object.range().cover(name.range()).cover(value.range());
        self.expr(Expr::Set(SetExpr {
            data: self.node(range),
            object,
            name,
            value,
        }))
    }

    pub fn grouping(&self, expression: &'a Expr<'a>) -> &'a Expr<'a> {
        self.expr(Expr::Grouping(GroupingExpr {
            data: self.node(expression.range()),
            expression,
        }))
    }

    pub fn conditional(
        &self,
        condition: &'a Expr<'a>,
        then_branch: &'a Expr<'a>,
        else_branch: &'a Expr<'a>,
    ) -> &'a Expr<'a> {
        let range = condition.range().cover(then_branch.range()).cover(else_branch.range());
        self.expr(Expr::Conditional(ConditionalExpr {
            data: self.node(range),
            condition,
            then_branch,
            else_branch,
        }))
    }

    pub fn this(&self) -> &'a Expr<'a> {
        let keyword = self.token(4);
        self.expr(Expr::This(ThisExpr {
            data: self.node(keyword),
            keyword,
        }))
    }

    /// `super.method`
    pub fn super_(&self, method: &str) -> &'a Expr<'a> {
        let keyword = self.token(5);
        let method = self.identifier(method);
        self.expr(Expr::Super(SuperExpr {
            data: self.node(keyword.cover(method.range())),
            keyword,
            method,
        }))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn expression(&self, expression: &'a Expr<'a>) -> Stmt<'a> {
        Stmt::Expression(ExpressionStatement {
            data: self.node(expression.range()),
            expression,
        })
    }

    pub fn print(&self, expression: &'a Expr<'a>) -> Stmt<'a> {
        let keyword = self.token(5);
        Stmt::Print(PrintStatement {
            data: self.node(keyword.cover(expression.range())),
            expression,
        })
    }

    pub fn var(&self, name: &str, initializer: Option<&'a Expr<'a>>) -> Stmt<'a> {
        let name = self.identifier(name);
        let range = initializer.map_or(name.range(), |init| name.range().cover(init.range()));
        Stmt::Var(VarDeclaration {
            data: self.node(range),
            name,
            initializer,
        })
    }

    fn block_node(&self, statements: Vec<Stmt<'a>>) -> Block<'a> {
        let open = self.token(1);
        let range = statements.iter().fold(open, |acc, s| acc.cover(s.range()));
        Block {
            data: self.node(range),
            statements: self.list(statements),
        }
    }

    /// A braced block with its own scope.
    pub fn block(&self, statements: Vec<Stmt<'a>>) -> Stmt<'a> {
        Stmt::Block(self.block_node(statements))
    }

    /// A statement sequence sharing the enclosing scope.
    pub fn unscoped(&self, statements: Vec<Stmt<'a>>) -> Stmt<'a> {
        Stmt::Unscoped(self.block_node(statements))
    }

    pub fn if_(&self, condition: &'a Expr<'a>, then_branch: Stmt<'a>, else_branch: Option<Stmt<'a>>) -> Stmt<'a> {
        let keyword = self.token(2);
        let mut range = keyword.cover(condition.range()).cover(then_branch.range());
        if let Some(ref e) = else_branch {
            range = range.cover(e.range());
        }
        Stmt::If(IfStatement {
            data: self.node(range),
            condition,
            then_branch: self.stmt(then_branch),
            else_branch: else_branch.map(|s| self.stmt(s)),
        })
    }

    pub fn while_(&self, condition: &'a Expr<'a>, body: Stmt<'a>) -> Stmt<'a> {
        let keyword = self.token(5);
        Stmt::While(WhileStatement {
            data: self.node(keyword.cover(condition.range()).cover(body.range())),
            condition,
            body: self.stmt(body),
        })
    }

    pub fn for_(
        &self,
        initializer: Option<Stmt<'a>>,
        condition: Option<&'a Expr<'a>>,
        increment: Option<&'a Expr<'a>>,
        body: Option<Stmt<'a>>,
    ) -> Stmt<'a> {
        let mut range = self.token(3);
        let clauses = [
            initializer.as_ref().map(Stmt::range),
            condition.map(Expr::range),
            increment.map(Expr::range),
            body.as_ref().map(Stmt::range),
        ];
        for clause in clauses.into_iter().flatten() {
            range = range.cover(clause);
        }
        Stmt::For(ForStatement {
            data: self.node(range),
            initializer: initializer.map(|s| self.stmt(s)),
            condition,
            increment,
            body: body.map(|s| self.stmt(s)),
        })
    }

    pub fn return_(&self, value: Option<&'a Expr<'a>>) -> Stmt<'a> {
        let keyword = self.token(6);
        Stmt::Return(ReturnStatement {
            data: self.node(value.map_or(keyword, |v| keyword.cover(v.range()))),
            keyword,
            value,
        })
    }

    pub fn function_decl(&self, name: &str, parameters: &[&str], body: Vec<Stmt<'a>>) -> FunctionDeclaration<'a> {
        let name = self.identifier(name);
        let parameters: Vec<_> = parameters.iter().map(|p| self.identifier(p)).collect();
        let range = body.iter().fold(name.range(), |acc, s| acc.cover(s.range()));
        FunctionDeclaration {
            data: self.node(range),
            name,
            parameters: self.list(parameters),
            body: self.list(body),
        }
    }

    pub fn function(&self, name: &str, parameters: &[&str], body: Vec<Stmt<'a>>) -> Stmt<'a> {
        Stmt::Function(self.function_decl(name, parameters, body))
    }

    pub fn class(&self, name: &str, superclass: Option<&str>, methods: Vec<FunctionDeclaration<'a>>) -> Stmt<'a> {
        let name = self.identifier(name);
        let superclass = superclass.map(|s| self.variable_expr(s));
        let range = methods.iter().fold(name.range(), |acc, m| acc.cover(m.data.range));
        Stmt::Class(ClassDeclaration {
            data: self.node(range),
            name,
            superclass,
            methods: self.list(methods),
        })
    }

    pub fn program(&self, file_name: &str, statements: Vec<Stmt<'a>>) -> Program<'a> {
        Program {
            file_name: self.arena.alloc_str(file_name),
            statements: self.list(statements),
        }
    }
}
