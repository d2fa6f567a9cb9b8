//! # Project Walker
//!
//! Drives the document pipeline over a whole source tree, or one file at a
//! time for watcher-driven incremental runs.
//!
//! - Non-document files are copied verbatim to the mirrored output path.
//! - Documents are transpiled into components; every document except the
//!   entry point registers a route.
//! - The router entry file is written once per full walk, or on demand via
//!   [`Transpiler::write_router`] in incremental mode.
//! - No two files share an output path; the router file and the entry
//!   component are reserved before anything else is claimed.

use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::codegen::{component_name_for, ContentSerializer};
use crate::config::{TranspileConfig, DOCUMENT_EXTENSION, ENTRY_COMPONENT_NAME};
use crate::error::{Result, TranspileError};
use crate::output::{copy_verbatim, write_atomic, FileFormatter, NoopFormatter};
use crate::props_map::PropsMap;
use crate::routes::{RouteEntry, RouteTable};
use crate::verify::verify_component;

// ═══════════════════════════════════════════════════════════════════════════════
// REPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FileKind {
    Component,
    Copied,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Relative to the source root.
    pub source: PathBuf,
    pub output: PathBuf,
    pub kind: FileKind,
    pub component_name: Option<String>,
    pub route_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkReport {
    pub components: Vec<FileReport>,
    pub copied: Vec<FileReport>,
    pub routes: Vec<RouteEntry>,
    pub router_file: Option<PathBuf>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

/// State shared by every file transpiled in one project walk.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub config: TranspileConfig,
    pub props: PropsMap,
    pub routes: RouteTable,
}

impl ProjectContext {
    pub fn new(config: TranspileConfig) -> Self {
        let props = PropsMap::with_overrides(&config.props_overrides);
        Self {
            config,
            props,
            routes: RouteTable::new(),
        }
    }

    fn is_entry_point(&self, rel_path: &Path) -> bool {
        rel_path == Path::new(&self.config.entry_point)
    }

    /// Mirrored output path for a source file relative to the source root.
    pub fn output_path_for(&self, rel_path: &Path) -> PathBuf {
        let mirrored = self.config.output_root().join(rel_path);
        if !is_document(rel_path) {
            return mirrored;
        }

        let stem = if self.is_entry_point(rel_path) {
            ENTRY_COMPONENT_NAME.to_string()
        } else {
            rel_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        mirrored.with_file_name(format!("{}.{}", stem, self.config.component_extension))
    }
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
        .unwrap_or(false)
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT CLAIMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Who an output path belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputClaim {
    Router,
    Source(PathBuf),
}

impl fmt::Display for OutputClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputClaim::Router => write!(f, "the router file"),
            OutputClaim::Source(path) => write!(f, "{}", path.display()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSPILER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Transpiler<F: FileFormatter = NoopFormatter> {
    ctx: ProjectContext,
    formatter: F,
    /// Output path -> owner. The router file and the entry component are
    /// reserved up front so no other source can overwrite them.
    claims: HashMap<PathBuf, OutputClaim>,
}

impl Transpiler<NoopFormatter> {
    pub fn new(config: TranspileConfig) -> Self {
        Self::with_formatter(config, NoopFormatter)
    }
}

impl<F: FileFormatter> Transpiler<F> {
    pub fn with_formatter(config: TranspileConfig, formatter: F) -> Self {
        let mut transpiler = Self {
            ctx: ProjectContext::new(config),
            formatter,
            claims: HashMap::new(),
        };
        transpiler.reset_claims();
        transpiler
    }

    pub fn context(&self) -> &ProjectContext {
        &self.ctx
    }

    pub fn routes(&self) -> &RouteTable {
        &self.ctx.routes
    }

    /// Full pass over the source tree. The route table starts empty and the
    /// router file is written once at the end.
    pub fn transpile_project(&mut self) -> Result<WalkReport> {
        let entry = self.ctx.config.entry_point_path();
        if !entry.is_file() {
            return Err(TranspileError::EntryPointMissing { path: entry });
        }
        self.check_output_root()?;

        self.ctx.routes = RouteTable::new();
        self.reset_claims();
        let mut report = WalkReport::default();

        let src_dir = self.ctx.config.src_dir.clone();
        let dest_dir = self.ctx.config.dest_dir.clone();
        let walker = WalkDir::new(&src_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !e.path().starts_with(&dest_dir));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let file = self.transpile_file(entry.path())?;
            match file.kind {
                FileKind::Component => report.components.push(file),
                FileKind::Copied => report.copied.push(file),
            }
        }

        report.routes = self.ctx.routes.entries().cloned().collect();
        report.router_file = Some(self.write_router()?);

        info!(
            "Transpiled {} documents, copied {} files, {} routes",
            report.components.len(),
            report.copied.len(),
            report.routes.len()
        );
        Ok(report)
    }

    /// Process one source file: copy it, or transpile it if it is a document.
    ///
    /// `path` may be relative to the source root or include it.
    pub fn transpile_file(&mut self, path: &Path) -> Result<FileReport> {
        let (abs, rel) = self.locate(path)?;

        if is_document(&rel) {
            return self.run_document(&abs, &rel);
        }

        if !abs.is_file() {
            return Err(TranspileError::SourceNotFound { path: abs });
        }
        let output = self.ctx.output_path_for(&rel);
        self.claim(&output, &rel)?;
        info!("Copying {} -> {}", abs.display(), output.display());
        copy_verbatim(&abs, &output)?;

        Ok(FileReport {
            source: rel,
            output,
            kind: FileKind::Copied,
            component_name: None,
            route_key: None,
        })
    }

    /// Run the document pipeline on one file. Unlike [`Self::transpile_file`]
    /// this rejects anything that is not an HTML document.
    pub fn transpile_document(&mut self, path: &Path) -> Result<FileReport> {
        let (abs, rel) = self.locate(path)?;
        if !is_document(&rel) {
            return Err(TranspileError::NotADocument { path: abs });
        }
        self.run_document(&abs, &rel)
    }

    fn run_document(&mut self, abs: &Path, rel: &Path) -> Result<FileReport> {
        let html = match fs::read_to_string(abs) {
            Ok(html) => html,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TranspileError::SourceNotFound {
                    path: abs.to_path_buf(),
                })
            }
            Err(e) => return Err(TranspileError::io(abs, e)),
        };
        self.check_output_root()?;

        let is_entry = self.ctx.is_entry_point(rel);
        let component_name = component_name_for(rel, is_entry);
        let output = self.ctx.output_path_for(rel);
        self.claim(&output, rel)?;

        let component = ContentSerializer::new(&self.ctx.props, &self.ctx.config.src_dir)
            .serialize(&html, rel, &component_name)?;
        if self.ctx.config.verify_output {
            verify_component(&output, &component.code)?;
        }

        info!("Transpiling {} -> {}", abs.display(), output.display());
        write_atomic(&output, component.code.as_bytes())?;
        self.formatter.format_file(&output)?;

        let route_key = if is_entry {
            None
        } else {
            let entry = RouteEntry::for_source(rel);
            let key = entry.route_key.clone();
            self.ctx.routes.register(entry)?;
            Some(key)
        };

        Ok(FileReport {
            source: rel.to_path_buf(),
            output,
            kind: FileKind::Component,
            component_name: Some(component.component_name),
            route_key,
        })
    }

    /// Drop the mirrored output (and route) of a deleted source file.
    /// Returns the removed output path, if there was one.
    pub fn remove_file(&mut self, path: &Path) -> Result<Option<PathBuf>> {
        let (_, rel) = self.locate(path)?;
        if is_document(&rel) {
            self.ctx.routes.remove_source(&rel);
        }

        let output = self.ctx.output_path_for(&rel);
        if !self.ctx.is_entry_point(&rel)
            && self.claims.get(&output) == Some(&OutputClaim::Source(rel.clone()))
        {
            self.claims.remove(&output);
        }
        match fs::remove_file(&output) {
            Ok(()) => {
                info!("Removed {}", output.display());
                Ok(Some(output))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TranspileError::io(&output, e)),
        }
    }

    /// Render the accumulated route table into the router entry file.
    pub fn write_router(&self) -> Result<PathBuf> {
        self.check_output_root()?;
        let path = self.router_path();

        let code = self.ctx.routes.render_router();
        if self.ctx.config.verify_output {
            verify_component(&path, &code)?;
        }
        write_atomic(&path, code.as_bytes())?;
        self.formatter.format_file(&path)?;
        info!("Wrote router with {} routes to {}", self.ctx.routes.len(), path.display());
        Ok(path)
    }

    fn router_path(&self) -> PathBuf {
        self.ctx
            .config
            .output_root()
            .join(self.ctx.config.router_file_name())
    }

    fn reset_claims(&mut self) {
        let router = self.router_path();
        let entry = PathBuf::from(&self.ctx.config.entry_point);
        let entry_output = self.ctx.output_path_for(&entry);

        self.claims.clear();
        self.claims.insert(router, OutputClaim::Router);
        self.claims.insert(entry_output, OutputClaim::Source(entry));
    }

    /// Record `source` as the owner of `output`. Re-claiming by the same
    /// source is fine; anything else is a collision.
    fn claim(&mut self, output: &Path, source: &Path) -> Result<()> {
        let claim = OutputClaim::Source(source.to_path_buf());
        match self.claims.get(output) {
            Some(existing) if *existing != claim => Err(TranspileError::OutputCollision {
                path: output.to_path_buf(),
                first: existing.to_string(),
                second: claim.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.claims.insert(output.to_path_buf(), claim);
                Ok(())
            }
        }
    }

    fn check_output_root(&self) -> Result<()> {
        let root = self.ctx.config.output_root();
        if root.is_dir() {
            Ok(())
        } else {
            Err(TranspileError::OutputScaffoldMissing { path: root })
        }
    }

    /// Absolute path and path relative to the source root.
    fn locate(&self, path: &Path) -> Result<(PathBuf, PathBuf)> {
        let src_dir = &self.ctx.config.src_dir;
        let abs = if path.starts_with(src_dir) {
            path.to_path_buf()
        } else if path.is_relative() {
            src_dir.join(path)
        } else {
            return Err(TranspileError::SourceNotFound {
                path: path.to_path_buf(),
            });
        };

        let rel = abs
            .strip_prefix(src_dir)
            .map(Path::to_path_buf)
            .map_err(|_| TranspileError::SourceNotFound { path: abs.clone() })?;
        Ok((abs, rel))
    }
}
