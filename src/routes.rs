//! Route table accumulated over one project walk and rendered into the
//! router entry file.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::config::ENTRY_COMPONENT_NAME;
use crate::error::{Result, TranspileError};
use crate::links::sanitize_identifier;

const PAGE_COMPONENT_PREFIX: &str = "Page_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub route_key: String,
    /// Specifier of the page component, relative to the router file.
    pub import_path: String,
    pub component_name: String,
    /// Source document the entry was registered from, relative to the source root.
    pub source: PathBuf,
}

impl RouteEntry {
    pub fn for_source(rel_path: &Path) -> Self {
        let route_key = route_key_for(rel_path);
        let import_path = format!("./{}", module_path_for(rel_path));
        let component_name = format!(
            "{}{}",
            PAGE_COMPONENT_PREFIX,
            sanitize_identifier(&route_key).to_uppercase()
        );

        RouteEntry {
            route_key,
            import_path,
            component_name,
            source: rel_path.to_path_buf(),
        }
    }
}

/// `b/index.html` -> `b`, `b/c.html` -> `b/c`, `a.html` -> `a`.
pub fn route_key_for(rel_path: &Path) -> String {
    let mut segments = normal_segments(rel_path.parent().unwrap_or_else(|| Path::new("")));
    let stem = rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem != "index" || segments.is_empty() {
        segments.push(stem);
    }
    segments.join("/")
}

/// Extension-less module path mirroring the source path: `b/index.html` -> `b/index`.
pub fn module_path_for(rel_path: &Path) -> String {
    normal_segments(&rel_path.with_extension("")).join("/")
}

fn normal_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTE TABLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Keyed by route key, so rendering order is deterministic.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteTable {
    entries: BTreeMap<String, RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page. Re-registering the same source replaces its entry;
    /// a different source claiming an existing key or component name is
    /// rejected.
    pub fn register(&mut self, entry: RouteEntry) -> Result<()> {
        if let Some(existing) = self.entries.get(&entry.route_key) {
            if existing.source != entry.source {
                return Err(TranspileError::DuplicateRoute {
                    key: entry.route_key.clone(),
                    first: existing.source.clone(),
                    second: entry.source.clone(),
                });
            }
        }
        // Sanitizing is lossy, so distinct keys can still share a name.
        if let Some(existing) = self
            .entries
            .values()
            .find(|e| e.component_name == entry.component_name && e.source != entry.source)
        {
            return Err(TranspileError::DuplicateComponentName {
                name: entry.component_name.clone(),
                first: existing.source.clone(),
                second: entry.source.clone(),
            });
        }
        self.entries.insert(entry.route_key.clone(), entry);
        Ok(())
    }

    /// Drop the entry registered from `source`, if any.
    pub fn remove_source(&mut self, source: &Path) -> Option<RouteEntry> {
        let key = self
            .entries
            .iter()
            .find(|(_, entry)| entry.source == source)
            .map(|(key, _)| key.clone())?;
        self.entries.remove(&key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source text of the router entry file.
    pub fn render_router(&self) -> String {
        let mut code = String::new();

        code.push_str("import React from 'react';\n");
        code.push_str("import { BrowserRouter as Router, Switch, Route } from 'react-router-dom';\n");
        code.push_str(&format!(
            "import {} from './{}';\n",
            ENTRY_COMPONENT_NAME, ENTRY_COMPONENT_NAME
        ));
        for entry in self.entries() {
            code.push_str(&format!(
                "import {} from '{}';\n",
                entry.component_name, entry.import_path
            ));
        }

        code.push_str("\nfunction AppRouter() {\n  return (\n    <Router>\n      <Switch>\n");
        for entry in self.entries() {
            code.push_str(&format!(
                "        <Route exact path=\"/{}\" component={{{}}} />\n",
                entry.route_key, entry.component_name
            ));
        }
        code.push_str(&format!(
            "        <Route component={{{}}} />\n",
            ENTRY_COMPONENT_NAME
        ));
        code.push_str("      </Switch>\n    </Router>\n  );\n}\n\nexport default AppRouter;\n");

        code
    }
}
