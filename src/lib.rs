//! # HTML → React Transpiler
//!
//! Converts a tree of static HTML documents into React function components
//! plus a router entry file.
//!
//! ## Pipeline Invariants
//!
//! 1. **Stable Node Ids**: every element gets its arena id at parse time. Tag
//!    records, final descriptors and tree mutation are all addressed by that
//!    id, never by position or attribute equality.
//!
//! 2. **Exhaustive Tag Dispatch**: images, external scripts, inline scripts,
//!    styles, stylesheet links, other links and anchors are a closed
//!    [`mapper::TagKind`] set; everything else passes through.
//!
//! 3. **Relocated Bodies**: `<style>` and src-less JavaScript `<script>`
//!    subtrees are extracted before mapping. Styles land in the `Helmet`
//!    wrapper as template literals, scripts run once inside `useEffect`.
//!
//! 4. **Referenced Imports**: every bound import variable is referenced in the
//!    emitted markup. Generated components and the router are parsed with oxc
//!    before they are written (`verifyOutput`).
//!
//! 5. **Unique Routes**: one route per non-entry document; a key or router
//!    component name claimed by two different sources is an error
//!    (T-ERR-ROUTE-DUP, T-ERR-ROUTE-NAME).
//!
//! 6. **Atomic Output**: files are written to a temporary sibling and renamed
//!    into place. Every output path has a single owner (T-ERR-OUTPUT-DUP).

#[cfg(feature = "napi")]
use napi_derive::napi;

pub mod attributes;
pub mod codegen;
pub mod config;
pub mod document;
pub mod error;
pub mod links;
pub mod mapper;
pub mod mutate;
pub mod output;
pub mod props_map;
pub mod routes;
pub mod verify;
pub mod walker;

#[cfg(test)]
mod pipeline_tests;

pub use attributes::{parse_tag_records, AttributesParser, TagRecord};
pub use codegen::{component_name_for, ContentSerializer, GeneratedComponent};
pub use config::TranspileConfig;
pub use document::Document;
pub use error::{Result, TranspileError};
pub use mapper::{FinalTagRecord, ImportBinding, ReactCodeMapper, ReactMap, TagAction, TagKind};
pub use mutate::TreeMutator;
pub use output::{FileFormatter, NoopFormatter, OxcFormatter};
pub use props_map::PropsMap;
pub use routes::{RouteEntry, RouteTable};
pub use walker::{FileKind, FileReport, ProjectContext, Transpiler, WalkReport};

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn to_napi_error(e: TranspileError) -> napi::Error {
    napi::Error::from_reason(format!("[{}] {}", e.code(), e))
}

/// Transpile a whole project described by a `config.json` payload.
#[cfg(feature = "napi")]
#[napi]
pub fn transpile_project_native(config_json: String) -> napi::Result<serde_json::Value> {
    let config = TranspileConfig::from_json_str(&config_json).map_err(to_napi_error)?;
    let report = Transpiler::with_formatter(config, OxcFormatter)
        .transpile_project()
        .map_err(to_napi_error)?;
    serde_json::to_value(report).map_err(|e| napi::Error::from_reason(e.to_string()))
}

/// Transpile or copy a single file, e.g. in response to a watcher event.
///
/// Routes are only known for this one file, so the router file is left alone.
#[cfg(feature = "napi")]
#[napi]
pub fn transpile_file_native(config_json: String, file_path: String) -> napi::Result<serde_json::Value> {
    let config = TranspileConfig::from_json_str(&config_json).map_err(to_napi_error)?;
    let report = Transpiler::with_formatter(config, OxcFormatter)
        .transpile_file(std::path::Path::new(&file_path))
        .map_err(to_napi_error)?;
    serde_json::to_value(report).map_err(|e| napi::Error::from_reason(e.to_string()))
}
