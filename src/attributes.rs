//! Attributes Parser
//!
//! Produces the ordered `(tag name, attributes)` sequence consumed by the code
//! mapper. Each record carries the `NodeId` of the element it came from, so
//! the mapper's output can be applied back onto the tree by id instead of by
//! position or attribute equality.

use serde::Serialize;

use crate::document::{Attrs, Document, NodeId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    /// Stable sequence index: the element's id in the document arena.
    pub id: NodeId,
    pub tag_name: String,
    pub attrs: Attrs,
}

pub struct AttributesParser;

impl AttributesParser {
    /// Records for every attached element, in document pre-order.
    pub fn collect(doc: &Document) -> Vec<TagRecord> {
        doc.elements()
            .into_iter()
            .filter_map(|id| {
                let tag_name = doc.tag(id)?.to_string();
                let attrs = doc.attrs(id).cloned().unwrap_or_default();
                Some(TagRecord {
                    id,
                    tag_name,
                    attrs,
                })
            })
            .collect()
    }
}

/// Parse HTML text and return its tag records. Malformed markup yields a
/// best-effort sequence rather than an error.
pub fn parse_tag_records(html: &str) -> Vec<TagRecord> {
    AttributesParser::collect(&Document::parse(html))
}
