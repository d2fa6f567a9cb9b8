//! Error types for the transpiler.
//!
//! Structural problems (missing entry point, wrong file kind, missing output
//! scaffold) and resolution ambiguities (duplicate routes, colliding import
//! names) are all surfaced as typed failures. Nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_NOT_A_DOCUMENT: &str = "T-ERR-DOC-EXT";
pub const ERR_SOURCE_NOT_FOUND: &str = "T-ERR-DOC-MISSING";
pub const ERR_ENTRY_POINT_MISSING: &str = "T-ERR-ENTRY";
pub const ERR_OUTPUT_SCAFFOLD: &str = "T-ERR-SCAFFOLD";
pub const ERR_TAG_MISMATCH: &str = "T-ERR-TAG-ALIGN";
pub const ERR_DUPLICATE_ROUTE: &str = "T-ERR-ROUTE-DUP";
pub const ERR_DUPLICATE_COMPONENT: &str = "T-ERR-ROUTE-NAME";
pub const ERR_OUTPUT_COLLISION: &str = "T-ERR-OUTPUT-DUP";
pub const ERR_IMPORT_COLLISION: &str = "T-ERR-IMPORT-DUP";
pub const ERR_INVALID_OUTPUT: &str = "T-ERR-OUTPUT";
pub const ERR_IO: &str = "T-ERR-IO";
pub const ERR_CONFIG: &str = "T-ERR-CONFIG";
pub const ERR_WALK: &str = "T-ERR-WALK";

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSPILE ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum TranspileError {
    /// The document pipeline was handed a file without the document extension.
    #[error("{} is not an HTML document", .path.display())]
    NotADocument { path: PathBuf },

    #[error("{} file not found", .path.display())]
    SourceNotFound { path: PathBuf },

    #[error("entry point file doesn't exist at {}", .path.display())]
    EntryPointMissing { path: PathBuf },

    /// The output root has to be scaffolded by the project generator first.
    #[error(
        "output directory {} is missing; create the project scaffold before transpiling",
        .path.display()
    )]
    OutputScaffoldMissing { path: PathBuf },

    /// A final tag descriptor does not line up with the record it was derived from.
    #[error("tag record {index} is <{expected}> but its final descriptor is <{found}>")]
    TagMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error(
        "route '{key}' is produced by both {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateRoute {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Two route keys sanitize to the same router component identifier.
    #[error(
        "router component '{name}' is generated for both {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateComponentName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Two files (or a file and the router) map onto the same output path.
    #[error("output {} is claimed by both {first} and {second}", .path.display())]
    OutputCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("import name '{name}' is generated for both '{first}' and '{second}'")]
    ImportCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("generated component for {} is invalid: {}", .path.display(), .messages.join("; "))]
    InvalidOutput { path: PathBuf, messages: Vec<String> },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),
}

impl TranspileError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TranspileError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable short code for the error, suitable for tooling output.
    pub fn code(&self) -> &'static str {
        match self {
            TranspileError::NotADocument { .. } => ERR_NOT_A_DOCUMENT,
            TranspileError::SourceNotFound { .. } => ERR_SOURCE_NOT_FOUND,
            TranspileError::EntryPointMissing { .. } => ERR_ENTRY_POINT_MISSING,
            TranspileError::OutputScaffoldMissing { .. } => ERR_OUTPUT_SCAFFOLD,
            TranspileError::TagMismatch { .. } => ERR_TAG_MISMATCH,
            TranspileError::DuplicateRoute { .. } => ERR_DUPLICATE_ROUTE,
            TranspileError::DuplicateComponentName { .. } => ERR_DUPLICATE_COMPONENT,
            TranspileError::OutputCollision { .. } => ERR_OUTPUT_COLLISION,
            TranspileError::ImportCollision { .. } => ERR_IMPORT_COLLISION,
            TranspileError::InvalidOutput { .. } => ERR_INVALID_OUTPUT,
            TranspileError::Io { .. } => ERR_IO,
            TranspileError::Config(_) => ERR_CONFIG,
            TranspileError::Walk(_) => ERR_WALK,
        }
    }
}

pub type Result<T, E = TranspileError> = std::result::Result<T, E>;
