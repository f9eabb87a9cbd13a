//! rlox_driver: Resolution sessions.
//!
//! Owns the options and the interner shared by every program in a session,
//! runs the resolver over one program or many, and decides whether a
//! resolved program may be executed.

use rayon::prelude::*;
use rlox_ast::Program;
use rlox_core::intern::StringInterner;
use rlox_core::text::LineMap;
use rlox_diagnostics::DiagnosticCollection;
use rlox_options::{OptionsError, ProjectConfig, ResolverOptions};
use rlox_resolver::Locals;
use std::path::Path;
use tracing::debug;

/// A resolution session.
///
/// Programs resolved by a session must have been built with its
/// [`interner`](Session::interner), since names are compared by interned key.
#[derive(Debug, Clone, Default)]
pub struct Session {
    options: ResolverOptions,
    interner: StringInterner,
    /// Source files named by the project file, if the session came from one.
    files: Vec<String>,
}

impl Session {
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            options,
            interner: StringInterner::new(),
            files: Vec::new(),
        }
    }

    /// Create a session from the `resolverOptions` and `files` of a project file.
    pub fn from_project_config(config: &ProjectConfig) -> Self {
        Self {
            files: config.files.clone().unwrap_or_default(),
            ..Self::new(config.resolver_options())
        }
    }

    /// Load an `rlox.json` project file and create a session from it.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let config = rlox_options::read_project_config(path)?;
        Ok(Self::from_project_config(&config))
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// The project's source files, in the order the project file lists them.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Resolve one program against a fresh registry.
    pub fn resolve(&self, program: &Program<'_>) -> ResolvedProgram {
        let mut locals = Locals::new();
        let diagnostics =
            rlox_resolver::resolve_program(program, &mut locals, &self.interner, &self.options);
        ResolvedProgram {
            file_name: program.file_name.to_string(),
            locals,
            diagnostics,
        }
    }

    /// Resolve independent programs in parallel. Results are in input order.
    pub fn resolve_all(&self, programs: &[Program<'_>]) -> Vec<ResolvedProgram> {
        let results: Vec<ResolvedProgram> =
            programs.par_iter().map(|program| self.resolve(program)).collect();
        debug!(
            programs = results.len(),
            failed = results.iter().filter(|r| !r.can_execute()).count(),
            "resolved batch"
        );
        results
    }
}

/// The outcome of resolving one program.
#[derive(Debug, Clone)]
pub struct ResolvedProgram {
    pub file_name: String,
    /// Hop count per local reference site, for the interpreter.
    pub locals: Locals,
    pub diagnostics: DiagnosticCollection,
}

impl ResolvedProgram {
    /// False if resolution produced any error. Warnings do not block execution.
    pub fn can_execute(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    /// Render every diagnostic as `file:line:col: category LOXnnnn: message`.
    pub fn render_diagnostics(&self, source_text: &str) -> Vec<String> {
        let line_map = LineMap::new(source_text);
        self.diagnostics
            .diagnostics()
            .iter()
            .map(|diagnostic| diagnostic.render(&line_map))
            .collect()
    }
}
