//! Output writing.
//!
//! Files are built in memory and moved into place from a temporary file in the
//! destination directory, so a failed transpile never leaves a partial file.

use log::debug;
use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{Result, TranspileError};

/// Write `contents` to `path` atomically, creating parent directories.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| TranspileError::io(parent, e))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| TranspileError::io(parent, e))?;
    tmp.write_all(contents)
        .map_err(|e| TranspileError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| TranspileError::io(path, e.error))?;
    Ok(())
}

/// Copy a non-document file byte for byte.
pub fn copy_verbatim(from: &Path, to: &Path) -> Result<()> {
    let bytes = fs::read(from).map_err(|e| TranspileError::io(from, e))?;
    write_atomic(to, &bytes)
}

// ═══════════════════════════════════════════════════════════════════════════════
// FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Post-write "reformat this file" pass over a generated component.
pub trait FileFormatter {
    fn format_file(&self, path: &Path) -> Result<()>;
}

/// Leaves files as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl FileFormatter for NoopFormatter {
    fn format_file(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Reprints files through oxc's code generator.
///
/// Files that fail to parse are left untouched; verification is a separate step.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcFormatter;

impl FileFormatter for OxcFormatter {
    fn format_file(&self, path: &Path) -> Result<()> {
        let source = fs::read_to_string(path).map_err(|e| TranspileError::io(path, e))?;

        let allocator = Allocator::default();
        let source_type = SourceType::default().with_module(true).with_jsx(true);
        let ret = Parser::new(&allocator, &source, source_type).parse();
        if !ret.errors.is_empty() {
            debug!("Skipping format of {}: {} parse errors", path.display(), ret.errors.len());
            return Ok(());
        }

        let printed = Codegen::new().build(&ret.program).code;
        if printed != source {
            write_atomic(path, printed.as_bytes())?;
        }
        Ok(())
    }
}
