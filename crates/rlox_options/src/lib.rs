//! rlox_options: Resolver configuration.
//!
//! Options are read from JSON, either on their own or nested under
//! `resolverOptions` in an `rlox.json` project file:
//!
//! ```json
//! {
//!   "files": ["main.lox"],
//!   "resolverOptions": { "initializerName": "init", "reportUnusedLocals": true }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The method name that marks a class initializer unless configured otherwise.
pub const DEFAULT_INITIALIZER_NAME: &str = "init";

/// Options for the resolver pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ResolverOptions {
    /// Methods with this name are resolved as initializers.
    pub initializer_name: String,
    /// Warn about local variables that are declared but never read.
    pub report_unused_locals: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            initializer_name: DEFAULT_INITIALIZER_NAME.to_string(),
            report_unused_locals: false,
        }
    }
}

impl ResolverOptions {
    fn validate(self) -> Result<Self, OptionsError> {
        let name = self.initializer_name.as_str();
        let is_identifier = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !is_identifier {
            return Err(OptionsError::InvalidInitializerName(self.initializer_name));
        }
        Ok(self)
    }
}

/// The `rlox.json` project file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub files: Option<Vec<String>>,
    pub resolver_options: Option<ResolverOptions>,
}

impl ProjectConfig {
    /// The configured resolver options, or the defaults.
    pub fn resolver_options(&self) -> ResolverOptions {
        self.resolver_options.clone().unwrap_or_default()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("initializer name '{0}' is not an identifier")]
    InvalidInitializerName(String),
}

/// Parse standalone resolver options.
pub fn parse_options(content: &str) -> Result<ResolverOptions, OptionsError> {
    let options: ResolverOptions = serde_json::from_str(content)?;
    options.validate()
}

/// Parse an `rlox.json` project file.
pub fn parse_project_config(content: &str) -> Result<ProjectConfig, OptionsError> {
    let mut config: ProjectConfig = serde_json::from_str(content)?;
    if let Some(options) = config.resolver_options.take() {
        config.resolver_options = Some(options.validate()?);
    }
    Ok(config)
}

fn read(path: &Path) -> Result<String, OptionsError> {
    std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_options_file(path: impl AsRef<Path>) -> Result<ResolverOptions, OptionsError> {
    parse_options(&read(path.as_ref())?)
}

pub fn read_project_config(path: impl AsRef<Path>) -> Result<ProjectConfig, OptionsError> {
    parse_project_config(&read(path.as_ref())?)
}
