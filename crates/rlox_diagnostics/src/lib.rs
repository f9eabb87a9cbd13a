//! rlox_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Static errors are values, not control flow. Passes push [`Diagnostic`]s
//! into a [`DiagnosticCollection`] and keep going, so a single run surfaces
//! every problem. Whoever owns the collection decides what to do about them.

use rlox_core::text::{LineMap, TextSpan};
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// Stable numeric code, rendered as `LOX{code}`.
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The message template. May contain `{0}`, `{1}`, ... placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file the diagnostic belongs to, if known.
    pub file: Option<String>,
    /// The offending token.
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a diagnostic attached to a source span.
    pub fn with_span(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: Some(span),
            ..Self::new(message, args)
        }
    }

    /// Attach a file name.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Render as `file:line:col: category LOXnnnn: message`, with 1-based
    /// line and column looked up in `line_map`.
    pub fn render(&self, line_map: &LineMap<'_>) -> String {
        let mut out = String::new();
        if let Some(ref file) = self.file {
            out.push_str(file);
            out.push(':');
        }
        if let Some(span) = self.span {
            let lc = line_map.line_and_column_of(span.start);
            out.push_str(&format!("{}:{}:", lc.line + 1, lc.column + 1));
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!(
            "{} LOX{}: {}",
            self.category, self.code, self.message_text
        ));
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(
            f,
            "{} LOX{}: {}",
            self.category, self.code, self.message_text
        )
    }
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// The diagnostics sink. Preserves report order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.len() - self.error_count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Diagnostics carrying the given code, in report order.
    pub fn with_code(&self, code: u32) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort diagnostics by file and position. Stable, so diagnostics at the
    /// same position keep their report order.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.file.cmp(&b.file).then_with(|| {
                let a_pos = a.span.map(|s| s.start).unwrap_or(0);
                let b_pos = b.span.map(|s| s.start).unwrap_or(0);
                a_pos.cmp(&b_pos)
            })
        });
    }
}

// ============================================================================
// Diagnostic messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Resolver errors (3000-3099)
    // ========================================================================
    pub const CANNOT_READ_LOCAL_VARIABLE_0_IN_ITS_OWN_INITIALIZER: DiagnosticMessage = diag!(3001, Error, "Cannot read local variable '{0}' in its own initializer.");
    pub const CANNOT_RETURN_FROM_TOP_LEVEL_CODE: DiagnosticMessage = diag!(3002, Error, "Cannot return from top-level code.");
    pub const CANNOT_RETURN_A_VALUE_FROM_AN_INITIALIZER: DiagnosticMessage = diag!(3003, Error, "Cannot return a value from an initializer.");
    pub const CANNOT_USE_THIS_OUTSIDE_OF_A_CLASS: DiagnosticMessage = diag!(3004, Error, "Cannot use 'this' outside of a class.");
    pub const CANNOT_USE_SUPER_OUTSIDE_OF_A_CLASS: DiagnosticMessage = diag!(3005, Error, "Cannot use 'super' outside of a class.");
    pub const CANNOT_USE_SUPER_IN_A_CLASS_WITH_NO_SUPERCLASS: DiagnosticMessage = diag!(3006, Error, "Cannot use 'super' in a class with no superclass.");
    pub const A_CLASS_CANNOT_INHERIT_FROM_ITSELF: DiagnosticMessage = diag!(3007, Error, "A class cannot inherit from itself.");

    // ========================================================================
    // Resolver warnings (3100-3199)
    // ========================================================================
    pub const LOCAL_VARIABLE_0_IS_NEVER_READ: DiagnosticMessage = diag!(3101, Warning, "Local variable '{0}' is never read.");
}
