//! The resolver implementation.
//!
//! One depth-first walk over the program. Handles:
//! - Scope push/pop for blocks, functions and classes
//! - Declare/define ordering, which catches `var a = a;` in a local scope
//! - Hop counts for variable reads, assignments, `this` and `super`
//! - `return` placement, checked against the enclosing function kind
//! - `this`/`super` placement, checked against the enclosing class kind
//! - Self-inheriting classes
//! - Optional warnings for locals that are never read
//!
//! Sibling order is the evaluation order and must not change: it is what
//! makes a function visible to its own body and a variable invisible to its
//! own initializer.

use crate::context::{ClassKind, Context, FunctionKind};
use crate::locals::BindingRegistry;
use crate::scope::{Access, BindingKind, ScopeStack};
use rlox_ast::node::*;
use rlox_ast::types::NodeId;
use rlox_core::intern::{InternedString, StringInterner};
use rlox_core::text::TextRange;
use rlox_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use rlox_options::ResolverOptions;
use tracing::{debug, trace};

/// Resolves one program against a [`BindingRegistry`].
///
/// Language errors are collected, never returned as `Err`: the walk always
/// runs to the end so every static error in the program is reported.
pub struct Resolver<'r, R: BindingRegistry + ?Sized> {
    registry: &'r mut R,
    scopes: ScopeStack,
    diagnostics: DiagnosticCollection,
    interner: StringInterner,
    this_name: InternedString,
    super_name: InternedString,
    initializer_name: InternedString,
    report_unused_locals: bool,
    file_name: Option<String>,
}

impl<'r, R: BindingRegistry + ?Sized> Resolver<'r, R> {
    /// `interner` must be the one the program's identifiers were interned with.
    pub fn new(registry: &'r mut R, interner: &StringInterner, options: &ResolverOptions) -> Self {
        Self {
            registry,
            scopes: ScopeStack::new(),
            diagnostics: DiagnosticCollection::new(),
            interner: interner.clone(),
            this_name: interner.intern_static("this"),
            super_name: interner.intern_static("super"),
            initializer_name: interner.intern(&options.initializer_name),
            report_unused_locals: options.report_unused_locals,
            file_name: None,
        }
    }

    /// Take diagnostics from the resolver.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Resolve a whole program. Diagnostics carry the program's file name.
    pub fn resolve_program(&mut self, program: &Program<'_>) {
        self.file_name = Some(program.file_name.to_string());
        debug!(
            file = program.file_name,
            statements = program.statements.len(),
            "resolving program"
        );
        self.resolve_statements(program.statements);
        debug!(
            file = program.file_name,
            errors = self.diagnostics.error_count(),
            warnings = self.diagnostics.warning_count(),
            "resolved program"
        );
    }

    /// Resolve top-level statements, starting outside any function or class.
    pub fn resolve_statements(&mut self, statements: &[Stmt<'_>]) {
        debug_assert!(self.scopes.is_empty());
        self.resolve_block(statements, Context::TOP_LEVEL);
        debug_assert!(self.scopes.is_empty(), "unbalanced scopes after resolution");
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    fn begin_scope(&mut self) {
        self.scopes.begin_scope();
    }

    fn end_scope(&mut self) {
        let scope = self.scopes.end_scope();
        if !self.report_unused_locals {
            return;
        }
        let mut unread: Vec<_> = scope
            .iter()
            .chain(scope.displaced())
            .filter(|(_, b)| b.kind == BindingKind::Variable && !b.read)
            .map(|(name, b)| (b.range, name))
            .collect();
        unread.sort_by_key(|(range, _)| range.pos);
        for (range, name) in unread {
            let text = self.interner.resolve(name).to_string();
            self.report(range, &messages::LOCAL_VARIABLE_0_IS_NEVER_READ, &[&text]);
        }
    }

    fn resolve_local(&mut self, site: NodeId, name: InternedString, access: Access) {
        if let Some(hops) = self.scopes.resolve(name, access) {
            trace!(site = site.0, name = self.interner.resolve(name), hops, "resolved local");
            self.registry.record_resolution(site, hops);
        }
    }

    fn report(&mut self, range: TextRange, message: &DiagnosticMessage, args: &[&str]) {
        let mut diagnostic = Diagnostic::with_span(range.to_span(), message, args);
        if let Some(ref file) = self.file_name {
            diagnostic = diagnostic.in_file(file.clone());
        }
        debug!(code = message.code, pos = range.pos, "{}", diagnostic.message_text);
        self.diagnostics.add(diagnostic);
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn resolve_block(&mut self, statements: &[Stmt<'_>], cx: Context) {
        for statement in statements {
            self.resolve_stmt(statement, cx);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt<'_>, cx: Context) {
        match stmt {
            Stmt::Expression(n) => self.resolve_expr(n.expression, cx),
            Stmt::Print(n) => self.resolve_expr(n.expression, cx),
            Stmt::Var(n) => self.resolve_var_declaration(n, cx),
            Stmt::Block(n) => {
                self.begin_scope();
                self.resolve_block(n.statements, cx);
                self.end_scope();
            }
            Stmt::Unscoped(n) => self.resolve_block(n.statements, cx),
            Stmt::If(n) => {
                self.resolve_expr(n.condition, cx);
                self.resolve_stmt(n.then_branch, cx);
                if let Some(else_branch) = n.else_branch {
                    self.resolve_stmt(else_branch, cx);
                }
            }
            Stmt::While(n) => {
                self.resolve_expr(n.condition, cx);
                self.resolve_stmt(n.body, cx);
            }
            Stmt::For(n) => self.resolve_for_statement(n, cx),
            Stmt::Return(n) => self.resolve_return_statement(n, cx),
            Stmt::Function(n) => {
                // Defined before the body so the function can call itself.
                self.scopes.declare(n.name.text, BindingKind::Function, n.name.range());
                self.scopes.define(n.name.text);
                self.resolve_function(n, FunctionKind::Function, cx);
            }
            Stmt::Class(n) => self.resolve_class(n, cx),
        }
    }

    fn resolve_var_declaration(&mut self, node: &VarDeclaration<'_>, cx: Context) {
        self.scopes.declare(node.name.text, BindingKind::Variable, node.name.range());
        if let Some(initializer) = node.initializer {
            self.resolve_expr(initializer, cx);
        }
        self.scopes.define(node.name.text);
    }

    fn resolve_for_statement(&mut self, node: &ForStatement<'_>, cx: Context) {
        if let Some(initializer) = node.initializer {
            self.resolve_stmt(initializer, cx);
        }
        if let Some(condition) = node.condition {
            self.resolve_expr(condition, cx);
        }
        if let Some(body) = node.body {
            self.resolve_stmt(body, cx);
        }
        if let Some(increment) = node.increment {
            self.resolve_expr(increment, cx);
        }
    }

    fn resolve_return_statement(&mut self, node: &ReturnStatement<'_>, cx: Context) {
        match cx.function {
            FunctionKind::None => {
                self.report(node.keyword, &messages::CANNOT_RETURN_FROM_TOP_LEVEL_CODE, &[]);
            }
            // A bare `return;` is fine: it still yields `this`.
            FunctionKind::Initializer if node.value.is_some() => {
                self.report(node.keyword, &messages::CANNOT_RETURN_A_VALUE_FROM_AN_INITIALIZER, &[]);
            }
            _ => {}
        }
        if let Some(value) = node.value {
            self.resolve_expr(value, cx);
        }
    }

    fn resolve_function(&mut self, node: &FunctionDeclaration<'_>, kind: FunctionKind, cx: Context) {
        let cx = cx.in_function(kind);
        self.begin_scope();
        for param in node.parameters {
            self.scopes.declare(param.text, BindingKind::Parameter, param.range());
            self.scopes.define(param.text);
        }
        self.resolve_block(node.body, cx);
        self.end_scope();
    }

    fn resolve_class(&mut self, node: &ClassDeclaration<'_>, cx: Context) {
        let mut class_cx = cx.in_class(ClassKind::Class);
        self.scopes.declare(node.name.text, BindingKind::Class, node.name.range());
        self.scopes.define(node.name.text);

        if let Some(ref superclass) = node.superclass {
            class_cx = cx.in_class(ClassKind::Subclass);
            if superclass.name.text == node.name.text {
                self.report(superclass.name.range(), &messages::A_CLASS_CANNOT_INHERIT_FROM_ITSELF, &[]);
            }
            // Resolved before `super` exists, so it binds in the enclosing scope.
            self.resolve_variable(superclass);

            self.begin_scope();
            self.scopes.bind_implicit(self.super_name, superclass.name.range());
        }

        self.begin_scope();
        self.scopes.bind_implicit(self.this_name, node.name.range());

        for method in node.methods {
            let kind = if method.name.text == self.initializer_name {
                FunctionKind::Initializer
            } else {
                FunctionKind::Method
            };
            self.resolve_function(method, kind, class_cx);
        }

        self.end_scope();
        if node.superclass.is_some() {
            self.end_scope();
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn resolve_expr(&mut self, expr: &Expr<'_>, cx: Context) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Variable(n) => self.resolve_variable(n),
            Expr::Assign(n) => {
                self.resolve_expr(n.value, cx);
                self.resolve_local(n.data.id, n.name.text, Access::Write);
            }
            Expr::Binary(n) => {
                self.resolve_expr(n.left, cx);
                self.resolve_expr(n.right, cx);
            }
            Expr::Unary(n) => self.resolve_expr(n.operand, cx),
            Expr::Logical(n) => {
                self.resolve_expr(n.left, cx);
                self.resolve_expr(n.right, cx);
            }
            Expr::Call(n) => {
                self.resolve_expr(n.callee, cx);
                for argument in n.arguments {
                    self.resolve_expr(argument, cx);
                }
            }
            Expr::Get(n) => self.resolve_expr(n.object, cx),
            Expr::Set(n) => {
                self.resolve_expr(n.value, cx);
                self.resolve_expr(n.object, cx);
            }
            Expr::Grouping(n) => self.resolve_expr(n.expression, cx),
            Expr::Conditional(n) => {
                self.resolve_expr(n.condition, cx);
                self.resolve_expr(n.then_branch, cx);
                self.resolve_expr(n.else_branch, cx);
            }
            Expr::This(n) => {
                if cx.class == ClassKind::None {
                    self.report(n.keyword, &messages::CANNOT_USE_THIS_OUTSIDE_OF_A_CLASS, &[]);
                    return;
                }
                self.resolve_local(n.data.id, self.this_name, Access::Read);
            }
            Expr::Super(n) => match cx.class {
                ClassKind::None => {
                    self.report(n.keyword, &messages::CANNOT_USE_SUPER_OUTSIDE_OF_A_CLASS, &[]);
                }
                ClassKind::Class => {
                    self.report(n.keyword, &messages::CANNOT_USE_SUPER_IN_A_CLASS_WITH_NO_SUPERCLASS, &[]);
                }
                ClassKind::Subclass => {
                    self.resolve_local(n.data.id, self.super_name, Access::Read);
                }
            },
        }
    }

    fn resolve_variable(&mut self, node: &VariableExpr<'_>) {
        if self.scopes.is_declared_but_undefined(node.name.text) {
            self.report(
                node.name.range(),
                &messages::CANNOT_READ_LOCAL_VARIABLE_0_IN_ITS_OWN_INITIALIZER,
                &[node.name.name],
            );
        }
        // Resolved even after an error so the rest of the walk is unaffected.
        self.resolve_local(node.data.id, node.name.text, Access::Read);
    }
}

/// Resolve `program` into `registry` and return the diagnostics.
pub fn resolve_program<R: BindingRegistry + ?Sized>(
    program: &Program<'_>,
    registry: &mut R,
    interner: &StringInterner,
    options: &ResolverOptions,
) -> DiagnosticCollection {
    let mut resolver = Resolver::new(registry, interner, options);
    resolver.resolve_program(program);
    resolver.take_diagnostics()
}
