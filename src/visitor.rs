use crate::report::{ClassRecord, FunctionRecord};
use crate::utils::LineIndex;
use rustpython_ast::{self as ast, Arguments, Expr, Stmt};

/// Resolves a decorator or base-class expression to a single display name.
///
/// Precedence: a bare identifier resolves to itself, an attribute access
/// (`a.b`) to the trailing attribute, and a call expression (`f(...)`) to
/// its callee resolved the same way, ignoring the call's arguments.
/// Any other expression form yields nothing. This is a deliberately lossy
/// simplification for documentation purposes, not semantic analysis.
pub fn resolve_display_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Name(node) => Some(node.id.to_string()),
        Expr::Attribute(node) => Some(node.attr.to_string()),
        Expr::Call(node) => resolve_display_name(&node.func),
        _ => None,
    }
}

/// The visitor that extracts documentation metadata from one parsed file.
///
/// The walk is exhaustive: every statement body at every nesting depth is
/// visited, so a function defined inside a method or an import inside an
/// `if` block is collected just like a top-level one. Nesting is
/// intentionally flattened: a method lands both in `functions` and under
/// its owning class's `methods`.
pub struct ModuleVisitor<'a> {
    /// Every function definition seen, at any depth, in visit order.
    pub functions: Vec<FunctionRecord>,
    /// Every class definition seen, at any depth, in visit order.
    pub classes: Vec<ClassRecord>,
    /// Raw import strings seen anywhere in the file.
    pub imports: Vec<String>,
    /// Leading path segments of imported modules, pending the
    /// standard-library exclusion filter applied at the end of the run.
    pub dependency_candidates: Vec<String>,
    /// Helper for line number mapping.
    line_index: &'a LineIndex,
}

impl<'a> ModuleVisitor<'a> {
    /// Creates a new `ModuleVisitor`.
    pub fn new(line_index: &'a LineIndex) -> Self {
        Self {
            functions: Vec::new(),
            classes: Vec::new(),
            imports: Vec::new(),
            dependency_candidates: Vec::new(),
            line_index,
        }
    }

    /// Visits every statement of a parsed module body.
    pub fn visit_module(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    /// Visits a statement node.
    ///
    /// Declarations can only appear in statement position, so recursing
    /// through every statement body is enough to see all of them; there is
    /// no need to descend into expressions (a lambda body holds no `def`).
    pub fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            // Function definitions, sync and async alike.
            Stmt::FunctionDef(node) => {
                let record = self.function_record(
                    &node.name,
                    &node.args,
                    &node.body,
                    &node.decorator_list,
                    node.range.start(),
                );
                self.functions.push(record);
                // Nested defs/classes/imports inside the body count too.
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncFunctionDef(node) => {
                let record = self.function_record(
                    &node.name,
                    &node.args,
                    &node.body,
                    &node.decorator_list,
                    node.range.start(),
                );
                self.functions.push(record);
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            // Class definitions.
            Stmt::ClassDef(node) => {
                let bases = node
                    .bases
                    .iter()
                    .filter_map(resolve_display_name)
                    .collect();

                // Methods are the class body's direct function definitions
                // only. The recursion below re-visits them so they also
                // appear in the flattened `functions` list.
                let mut methods = Vec::new();
                for item in &node.body {
                    match item {
                        Stmt::FunctionDef(method) => methods.push(self.function_record(
                            &method.name,
                            &method.args,
                            &method.body,
                            &method.decorator_list,
                            method.range.start(),
                        )),
                        Stmt::AsyncFunctionDef(method) => methods.push(self.function_record(
                            &method.name,
                            &method.args,
                            &method.body,
                            &method.decorator_list,
                            method.range.start(),
                        )),
                        _ => {}
                    }
                }

                self.classes.push(ClassRecord {
                    name: node.name.to_string(),
                    methods,
                    docstring: docstring_of(&node.body),
                    lineno: self.line_index.line_index(node.range.start()),
                    bases,
                });

                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            // Plain imports: record the full dotted name and register its
            // leading segment as a dependency candidate.
            Stmt::Import(node) => {
                for alias in &node.names {
                    self.imports.push(alias.name.to_string());
                    self.add_candidate(&alias.name);
                }
            }
            // From-imports: record "<module>.<symbol>" per imported symbol.
            // A relative import (`from . import x`, `from .sub import x`)
            // refers to the current package, so it never yields an external
            // dependency candidate.
            Stmt::ImportFrom(node) => {
                let relative = node.level.as_ref().map_or(false, |level| level.to_u32() > 0);
                match &node.module {
                    Some(module) => {
                        if !relative {
                            self.add_candidate(module.as_str());
                        }
                        for alias in &node.names {
                            self.imports.push(format!("{}.{}", module, alias.name));
                        }
                    }
                    None => {
                        for alias in &node.names {
                            self.imports.push(alias.name.to_string());
                        }
                    }
                }
            }
            // Compound statements: traverse bodies recursively so
            // declarations hidden in control flow are still found.
            Stmt::If(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::For(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncFor(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::While(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::With(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncWith(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::Try(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for handler in &node.handlers {
                    if let ast::ExceptHandler::ExceptHandler(handler_node) = handler {
                        for stmt in &handler_node.body {
                            self.visit_stmt(stmt);
                        }
                    }
                }
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
                for stmt in &node.finalbody {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::TryStar(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for handler in &node.handlers {
                    if let ast::ExceptHandler::ExceptHandler(handler_node) = handler {
                        for stmt in &handler_node.body {
                            self.visit_stmt(stmt);
                        }
                    }
                }
                for stmt in &node.orelse {
                    self.visit_stmt(stmt);
                }
                for stmt in &node.finalbody {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::Match(node) => {
                for case in &node.cases {
                    for stmt in &case.body {
                        self.visit_stmt(stmt);
                    }
                }
            }
            _ => {}
        }
    }

    /// Builds a FunctionRecord from the pieces shared by `def` and
    /// `async def` nodes.
    fn function_record(
        &self,
        name: &str,
        args: &Arguments,
        body: &[Stmt],
        decorator_list: &[Expr],
        range_start: rustpython_ast::TextSize,
    ) -> FunctionRecord {
        // Positional parameters in declaration order: positional-only
        // parameters first, then the regular ones.
        let mut names = Vec::new();
        let mut defaults_count = 0;
        for arg in args.posonlyargs.iter().chain(&args.args) {
            names.push(arg.def.arg.to_string());
            if arg.default.is_some() {
                defaults_count += 1;
            }
        }

        let decorators = decorator_list
            .iter()
            .filter_map(resolve_display_name)
            .collect();

        FunctionRecord {
            name: name.to_string(),
            args: names,
            defaults_count,
            docstring: docstring_of(body),
            lineno: self.line_index.line_index(range_start),
            decorators,
        }
    }

    /// Registers the leading dot-separated segment of a module path as an
    /// external dependency candidate.
    fn add_candidate(&mut self, module_path: &str) {
        if let Some(head) = module_path.split('.').next() {
            if !head.is_empty() {
                self.dependency_candidates.push(head.to_string());
            }
        }
    }
}

/// Extracts a docstring: the leading statement of a body when it is a bare
/// string literal expression.
fn docstring_of(body: &[Stmt]) -> Option<String> {
    if let Some(Stmt::Expr(expr_stmt)) = body.first() {
        if let Expr::Constant(constant) = &*expr_stmt.value {
            if let ast::Constant::Str(s) = &constant.value {
                return Some(s.trim().to_string());
            }
        }
    }
    None
}
