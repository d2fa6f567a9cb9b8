//! # Component Codegen
//!
//! Turns one HTML document into the source text of a React function component.
//!
//! ## Pipeline
//!
//! 1. Parse into the owned [`Document`] arena.
//! 2. Extract `<style>` and src-less JavaScript `<script>` subtrees (detached,
//!    kept in order). Data scripts such as JSON-LD stay in the tree and are
//!    deleted by the mapper like any other inline script.
//! 3. Collect tag records on the remaining tree, map them, apply them by id.
//! 4. Promote `<head>` into the `Helmet` metadata wrapper and move the
//!    extracted styles into it.
//! 5. Write the wrapper and the body children as JSX.
//! 6. Assemble imports, the component function and its default export.
//!
//! Bound import placeholders are resolved per attribute while writing JSX:
//! only the attributes the mapper bound to an import become expressions, so
//! author text that happens to look like a placeholder stays a string.

use log::debug;
use std::collections::HashSet;
use std::path::Path;

use crate::attributes::AttributesParser;
use crate::config::ENTRY_COMPONENT_NAME;
use crate::document::{Attrs, Document, NodeId, NodeKind};
use crate::error::Result;
use crate::links::sanitize_identifier;
use crate::mapper::{ImportBinding, ReactCodeMapper};
use crate::mutate::TreeMutator;
use crate::props_map::{is_boolean_prop, is_valid_jsx_attr_name, PropsMap};

pub const METADATA_WRAPPER_TAG: &str = "Helmet";

const REACT_IMPORT: &str = "import React from 'react';";
const REACT_EFFECT_IMPORT: &str = "import React, { useEffect } from 'react';";
const HELMET_IMPORT: &str = "import Helmet from 'react-helmet';";
const LINK_IMPORT: &str = "import { Link } from 'react-router-dom';";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// `type` values (MIME essence, lower-cased) of scripts that run as classic JavaScript.
const JAVASCRIPT_MIME_TYPES: &[&str] = &[
    "application/ecmascript",
    "application/javascript",
    "application/x-ecmascript",
    "application/x-javascript",
    "text/ecmascript",
    "text/javascript",
    "text/javascript1.0",
    "text/javascript1.1",
    "text/javascript1.2",
    "text/javascript1.3",
    "text/javascript1.4",
    "text/javascript1.5",
    "text/jscript",
    "text/livescript",
    "text/x-ecmascript",
    "text/x-javascript",
];

/// Elements whose text children keep their exact whitespace.
const RAW_TEXT_ELEMENTS: &[&str] = &["pre", "textarea", "script", "noscript"];

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct GeneratedComponent {
    pub component_name: String,
    pub code: String,
    pub imports: Vec<ImportBinding>,
    pub uses_navigation: bool,
    pub has_metadata: bool,
    pub inline_scripts: usize,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERIALIZER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ContentSerializer<'a> {
    props: &'a PropsMap,
    src_root: &'a Path,
}

impl<'a> ContentSerializer<'a> {
    pub fn new(props: &'a PropsMap, src_root: &'a Path) -> Self {
        Self { props, src_root }
    }

    /// Generate the component for `html`, whose location relative to the
    /// source root is `rel_path`.
    pub fn serialize(
        &self,
        html: &str,
        rel_path: &Path,
        component_name: &str,
    ) -> Result<GeneratedComponent> {
        let mut doc = Document::parse(html);

        let (styles, scripts) = extract_relocated(&mut doc);

        let records = AttributesParser::collect(&doc);
        let current_dir = rel_path.parent().unwrap_or_else(|| Path::new(""));
        let map = ReactCodeMapper::new(self.props, self.src_root, current_dir).map(&records);
        map.check_import_names()?;
        let touched = TreeMutator::apply(&mut doc, &records, &map.tags)?;
        debug!(
            "{}: {} tags, {} mutated, {} imports",
            rel_path.display(),
            records.len(),
            touched,
            map.imports.len()
        );

        let wrapper = promote_metadata_wrapper(&mut doc, &styles);

        let bound: HashSet<(NodeId, &str)> = map
            .tags
            .iter()
            .flat_map(|tag| tag.bound_attrs.iter().map(move |attr| (tag.id, attr.as_str())))
            .collect();
        let writer = JsxWriter {
            doc: &doc,
            bound: &bound,
        };

        let mut markup = String::new();
        if let Some(wrapper) = wrapper {
            writer.write_node(wrapper, &mut markup);
        }
        if let Some(body) = doc.find_first("body") {
            for &child in doc.children(body) {
                let mut part = String::new();
                writer.write_node(child, &mut part);
                markup.push_str(part.trim());
            }
        }

        let mut import_lines = Vec::new();
        import_lines.push(if scripts.is_empty() {
            REACT_IMPORT.to_string()
        } else {
            REACT_EFFECT_IMPORT.to_string()
        });
        if wrapper.is_some() {
            import_lines.push(HELMET_IMPORT.to_string());
        }
        if map.uses_navigation {
            import_lines.push(LINK_IMPORT.to_string());
        }
        import_lines.extend(map.imports.iter().map(ImportBinding::to_statement));

        let code = assemble(component_name, &import_lines, &scripts, &markup);

        Ok(GeneratedComponent {
            component_name: component_name.to_string(),
            code,
            imports: map.imports,
            uses_navigation: map.uses_navigation,
            has_metadata: wrapper.is_some(),
            inline_scripts: scripts.len(),
        })
    }
}

/// Detach every `<style>` and every classic `<script>` without `src`. Returns
/// the style element ids and the inline script bodies, both in document order.
fn extract_relocated(doc: &mut Document) -> (Vec<NodeId>, Vec<String>) {
    let mut styles = Vec::new();
    let mut scripts = Vec::new();

    for id in doc.elements() {
        match (doc.tag(id), doc.attrs(id)) {
            (Some("style"), _) => styles.push(id),
            (Some("script"), Some(attrs)) if !attrs.contains_key("src") => {
                if is_classic_script(attrs) {
                    scripts.push(id);
                } else {
                    debug!("not running inline script of type {:?}", attrs.get("type"));
                }
            }
            _ => {}
        }
    }

    for &id in styles.iter().chain(&scripts) {
        doc.detach(id);
    }

    let bodies = scripts.iter().map(|&id| doc.text_content(id)).collect();
    (styles, bodies)
}

/// No `type`, an empty one, or a JavaScript MIME type. Modules, import maps
/// and data blocks don't fit inside an effect callback.
fn is_classic_script(attrs: &Attrs) -> bool {
    let Some(kind) = attrs.get("type") else {
        return true;
    };
    let essence = kind.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    essence.is_empty() || JAVASCRIPT_MIME_TYPES.contains(&essence.as_str())
}

/// Rename `<head>` to the wrapper and move the extracted styles into it.
///
/// html5ever always synthesizes a head, so an empty one (only whitespace left
/// after mutation) yields no wrapper unless there are styles to carry.
fn promote_metadata_wrapper(doc: &mut Document, styles: &[NodeId]) -> Option<NodeId> {
    let head = doc.find_first("head");
    let head_has_content = head
        .map(|head| {
            doc.children(head).iter().any(|&child| match &doc.node(child).kind {
                NodeKind::Text(text) => !text.trim().is_empty(),
                _ => true,
            })
        })
        .unwrap_or(false);

    if !head_has_content && styles.is_empty() {
        return None;
    }

    let wrapper = match head {
        Some(head) => {
            doc.rename(head, METADATA_WRAPPER_TAG);
            head
        }
        None => doc.create_element(METADATA_WRAPPER_TAG),
    };
    for &style in styles {
        doc.append_child(wrapper, style);
    }
    Some(wrapper)
}

fn assemble(
    component_name: &str,
    import_lines: &[String],
    scripts: &[String],
    markup: &str,
) -> String {
    let mut code = String::new();

    for line in import_lines {
        code.push_str(line);
        code.push('\n');
    }
    code.push('\n');

    code.push_str(&format!("function {}() {{\n", component_name));
    if !scripts.is_empty() {
        code.push_str("  useEffect(() => {\n");
        code.push_str(&scripts.join("\n"));
        code.push_str("\n  }, []);\n\n");
    }
    code.push_str(&format!("  return (\n    <>{}</>\n  );\n}}\n\n", markup));
    code.push_str(&format!("export default {};\n", component_name));

    code
}

/// Component name for a document: the entry point is always `App`, anything
/// else is its sanitized base name with the first letter upper-cased.
pub fn component_name_for(rel_path: &Path, is_entry: bool) -> String {
    if is_entry {
        return ENTRY_COMPONENT_NAME.to_string();
    }
    let stem = rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = sanitize_identifier(&stem);

    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSX WRITER
// ═══════════════════════════════════════════════════════════════════════════════

struct JsxWriter<'d> {
    doc: &'d Document,
    /// `(element, attribute)` pairs holding a bound import placeholder.
    bound: &'d HashSet<(NodeId, &'d str)>,
}

impl<'d> JsxWriter<'d> {
    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.doc.node(id).kind {
            NodeKind::Text(text) => out.push_str(&escape_jsx_text(text)),
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attrs {
                    if !is_valid_jsx_attr_name(key) {
                        continue;
                    }
                    out.push(' ');
                    out.push_str(key);
                    if value.is_empty() && is_boolean_prop(key) {
                        continue;
                    }
                    if self.bound.contains(&(id, key.as_str())) {
                        out.push('=');
                        out.push_str(value);
                    } else {
                        out.push_str("=\"");
                        out.push_str(&escape_jsx_attr(value));
                        out.push('"');
                    }
                }

                let children = self.doc.children(id);
                if children.is_empty() && VOID_ELEMENTS.contains(&tag.as_str()) {
                    out.push_str("/>");
                    return;
                }
                out.push('>');

                if tag == "style" {
                    out.push_str("{`");
                    out.push_str(&escape_template_literal(&self.doc.text_content(id)));
                    out.push_str("`}");
                } else if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                    for &child in children {
                        match &self.doc.node(child).kind {
                            NodeKind::Text(text) => out.push_str(&string_expression(text)),
                            _ => self.write_node(child, out),
                        }
                    }
                } else {
                    for &child in children {
                        self.write_node(child, out);
                    }
                }

                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            NodeKind::Document => {
                for &child in self.doc.children(id) {
                    self.write_node(child, out);
                }
            }
        }
    }
}

fn escape_jsx_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_jsx_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

fn string_expression(text: &str) -> String {
    // Serializing a str cannot fail
    let literal = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
    format!("{{{}}}", literal)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
