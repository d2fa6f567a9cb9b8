//! # React Code Mapper
//!
//! Turns the ordered tag records of one document into final tag descriptors
//! plus the import list the component needs.
//!
//! Per tag:
//! 1. Attribute keys go through the props map; `style` and inline `on*`
//!    handlers are dropped.
//! 2. The tag is classified into a [`TagKind`] and handled exhaustively.
//! 3. Internal references become import bindings (or router targets for
//!    anchors); external ones pass through unchanged.
//!
//! This stage never fails. Malformed input (a `link` without `rel`, an `img`
//! without `src`) falls back to pass-through or deletion.

use log::{debug, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::attributes::TagRecord;
use crate::document::{Attrs, NodeId};
use crate::error::{Result, TranspileError};
use crate::links::{route_path_for, sanitize_identifier, split_fragment, LinkResolver, Resolution};
use crate::props_map::{is_event_handler, is_valid_jsx_attr_name, PropsMap};

/// Attribute carrying the router target on a rewritten anchor.
pub const NAVIGATION_TARGET_ATTR: &str = "to";

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBinding {
    pub variable_name: String,
    pub import_path: String,
    /// False for side-effect-only imports such as stylesheets.
    pub bound_variable: bool,
}

impl ImportBinding {
    pub fn to_statement(&self) -> String {
        if self.bound_variable {
            format!("import {} from '{}';", self.variable_name, self.import_path)
        } else {
            format!("import '{}';", self.import_path)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagAction {
    Keep(Attrs),
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinalTagRecord {
    /// Same id as the originating record.
    pub id: NodeId,
    pub tag_name: String,
    pub action: TagAction,
    /// Set on anchors rewritten to client-side navigation.
    pub navigation: bool,
    /// Attributes whose value is a bound import placeholder, to be emitted as
    /// an expression rather than a string.
    pub bound_attrs: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReactMap {
    pub tags: Vec<FinalTagRecord>,
    pub imports: Vec<ImportBinding>,
    /// At least one anchor became a navigation link.
    pub uses_navigation: bool,
}

impl ReactMap {
    /// Reject two different import paths that sanitize to the same name.
    pub fn check_import_names(&self) -> Result<()> {
        for (i, binding) in self.imports.iter().enumerate() {
            if !binding.bound_variable {
                continue;
            }
            let clash = self.imports[..i].iter().find(|earlier| {
                earlier.bound_variable
                    && earlier.variable_name == binding.variable_name
                    && earlier.import_path != binding.import_path
            });
            if let Some(earlier) = clash {
                return Err(TranspileError::ImportCollision {
                    name: binding.variable_name.clone(),
                    first: earlier.import_path.clone(),
                    second: binding.import_path.clone(),
                });
            }
        }
        Ok(())
    }

    /// Names of bound import variables, in first-seen order.
    pub fn variables(&self) -> Vec<&str> {
        self.imports
            .iter()
            .filter(|imp| imp.bound_variable)
            .map(|imp| imp.variable_name.as_str())
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TAG CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Image,
    ExternalScript,
    InlineScript,
    Style,
    StylesheetLink,
    OtherLink,
    Anchor,
    Passthrough,
}

impl TagKind {
    pub fn classify(tag_name: &str, attrs: &Attrs) -> Self {
        match tag_name {
            "img" => TagKind::Image,
            "script" if attrs.contains_key("src") => TagKind::ExternalScript,
            "script" => TagKind::InlineScript,
            "style" => TagKind::Style,
            "link" if is_stylesheet(attrs) => TagKind::StylesheetLink,
            "link" => TagKind::OtherLink,
            "a" => TagKind::Anchor,
            _ => TagKind::Passthrough,
        }
    }
}

fn is_stylesheet(attrs: &Attrs) -> bool {
    attrs
        .get("rel")
        .map(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        })
        .unwrap_or(false)
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAPPER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ReactCodeMapper<'a> {
    props: &'a PropsMap,
    resolver: LinkResolver<'a>,
    imports: Vec<ImportBinding>,
    uses_navigation: bool,
}

impl<'a> ReactCodeMapper<'a> {
    /// `current_dir` is the directory of the file being mapped, relative to `src_root`.
    pub fn new(props: &'a PropsMap, src_root: &'a Path, current_dir: impl Into<PathBuf>) -> Self {
        Self {
            props,
            resolver: LinkResolver::new(src_root, current_dir),
            imports: Vec::new(),
            uses_navigation: false,
        }
    }

    pub fn map(mut self, records: &[TagRecord]) -> ReactMap {
        let tags = records.iter().map(|record| self.map_tag(record)).collect();

        ReactMap {
            tags,
            imports: self.imports,
            uses_navigation: self.uses_navigation,
        }
    }

    fn map_tag(&mut self, record: &TagRecord) -> FinalTagRecord {
        let attrs = self.react_attrs(&record.tag_name, &record.attrs);
        let mut navigation = false;
        let mut bound_attrs = Vec::new();

        let action = match TagKind::classify(&record.tag_name, &record.attrs) {
            TagKind::Image | TagKind::ExternalScript => {
                TagAction::Keep(self.attrs_with_import(attrs, "src", &mut bound_attrs))
            }
            // Bodies are relocated by the serializer
            TagKind::InlineScript | TagKind::Style => TagAction::Delete,
            TagKind::StylesheetLink => {
                if let Some(href) = attrs.get("href") {
                    self.side_effect_import(href);
                }
                TagAction::Delete
            }
            TagKind::OtherLink => TagAction::Delete,
            TagKind::Anchor => {
                let (attrs, is_nav) = self.anchor_attrs(attrs);
                navigation = is_nav;
                TagAction::Keep(attrs)
            }
            TagKind::Passthrough => TagAction::Keep(attrs),
        };

        FinalTagRecord {
            id: record.id,
            tag_name: record.tag_name.clone(),
            action,
            navigation,
            bound_attrs,
        }
    }

    /// Rename keys through the props map, dropping `style`, inline handlers
    /// and names JSX cannot express.
    fn react_attrs(&self, tag_name: &str, attrs: &Attrs) -> Attrs {
        let mut out = Attrs::new();
        for (key, value) in attrs {
            if key == "style" || is_event_handler(key) {
                continue;
            }
            let renamed = self.props.rename(key);
            if !is_valid_jsx_attr_name(renamed) {
                warn!("Dropping attribute '{}' on <{}>: not a valid JSX prop name", key, tag_name);
                continue;
            }
            out.insert(renamed.to_string(), value.clone());
        }
        out
    }

    /// Replace `link_attr` with a bound-variable placeholder if it resolves
    /// inside the source tree.
    fn attrs_with_import(
        &mut self,
        mut attrs: Attrs,
        link_attr: &str,
        bound_attrs: &mut Vec<String>,
    ) -> Attrs {
        let Some(reference) = attrs.get(link_attr).cloned() else {
            return attrs;
        };

        if let Resolution::Internal(target) = self.resolver.resolve(&reference) {
            let variable_name = sanitize_identifier(&reference);
            debug!("Resolved '{}' -> import {} from '{}'", reference, variable_name, target.import_path);
            self.push_import(ImportBinding {
                variable_name: variable_name.clone(),
                import_path: target.import_path,
                bound_variable: true,
            });
            attrs.insert(link_attr.to_string(), placeholder(&variable_name));
            bound_attrs.push(link_attr.to_string());
        }

        attrs
    }

    fn side_effect_import(&mut self, reference: &str) {
        if let Resolution::Internal(target) = self.resolver.resolve(reference) {
            debug!("Resolved stylesheet '{}' -> import '{}'", reference, target.import_path);
            self.push_import(ImportBinding {
                variable_name: sanitize_identifier(reference),
                import_path: target.import_path,
                bound_variable: false,
            });
        }
    }

    /// Anchors pointing at an internal document become `{ to: route }`.
    fn anchor_attrs(&mut self, attrs: Attrs) -> (Attrs, bool) {
        let Some(href) = attrs.get("href").cloned() else {
            return (attrs, false);
        };

        let (path, fragment) = split_fragment(&href);
        if path.is_empty() {
            return (attrs, false);
        }

        match self.resolver.resolve(path) {
            Resolution::Internal(target) if target.is_document => {
                let route = format!("{}{}", route_path_for(&target.target), fragment);
                debug!("Anchor '{}' -> route '{}'", href, route);
                self.uses_navigation = true;

                let rewritten = attrs
                    .into_iter()
                    .map(|(key, value)| {
                        if key == "href" {
                            (NAVIGATION_TARGET_ATTR.to_string(), route.clone())
                        } else {
                            (key, value)
                        }
                    })
                    .collect();
                (rewritten, true)
            }
            _ => (attrs, false),
        }
    }

    /// Repeated references to the same file share one import.
    fn push_import(&mut self, binding: ImportBinding) {
        if !self.imports.contains(&binding) {
            self.imports.push(binding);
        }
    }
}

/// Placeholder written into an attribute value for a bound import variable.
pub fn placeholder(variable_name: &str) -> String {
    format!("{{{}}}", variable_name)
}
