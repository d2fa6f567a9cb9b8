//! Tree Mutator
//!
//! Applies the mapper's final tag descriptors back onto the document. Every
//! descriptor carries the `NodeId` of the element it was derived from, so
//! lookup is a direct index into the arena; no attribute matching is involved
//! and identical sibling elements are never confused.

use log::debug;

use crate::attributes::TagRecord;
use crate::document::Document;
use crate::error::{Result, TranspileError};
use crate::mapper::{FinalTagRecord, TagAction, NAVIGATION_TARGET_ATTR};

/// Element name an internal anchor is renamed to.
pub const NAVIGATION_LINK_TAG: &str = "Link";

pub struct TreeMutator;

impl TreeMutator {
    /// Apply `finals` (index-aligned with `records`) to `doc`.
    ///
    /// Returns the number of elements touched.
    pub fn apply(
        doc: &mut Document,
        records: &[TagRecord],
        finals: &[FinalTagRecord],
    ) -> Result<usize> {
        if records.len() != finals.len() {
            return Err(TranspileError::TagMismatch {
                index: records.len().min(finals.len()),
                expected: format!("{} records", records.len()),
                found: format!("{} descriptors", finals.len()),
            });
        }

        let mut touched = 0;

        for (index, (record, fin)) in records.iter().zip(finals).enumerate() {
            let aligned = record.id == fin.id
                && record.tag_name == fin.tag_name
                && doc.tag(record.id) == Some(record.tag_name.as_str());
            if !aligned {
                return Err(TranspileError::TagMismatch {
                    index,
                    expected: record.tag_name.clone(),
                    found: fin.tag_name.clone(),
                });
            }

            match &fin.action {
                TagAction::Delete => {
                    debug!("Removing <{}> (node {})", record.tag_name, record.id);
                    doc.detach(record.id);
                    touched += 1;
                }
                TagAction::Keep(attrs) => {
                    let mut changed = false;
                    if *attrs != record.attrs {
                        doc.set_attrs(record.id, attrs.clone());
                        changed = true;
                    }
                    if fin.navigation && attrs.contains_key(NAVIGATION_TARGET_ATTR) {
                        debug!(
                            "Renaming <{}> (node {}) to <{}>",
                            record.tag_name, record.id, NAVIGATION_LINK_TAG
                        );
                        doc.rename(record.id, NAVIGATION_LINK_TAG);
                        changed = true;
                    }
                    if changed {
                        touched += 1;
                    }
                }
            }
        }

        Ok(touched)
    }
}
