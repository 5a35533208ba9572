// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for Understory Element Tree.
//!
//! ## Feature
//!
//! Enable with `element_tree_adapter`.
//!
//! ## Notes
//!
//! A [`Document`] already knows every element's parent, so it can serve directly as the
//! [`ParentLookup`] for [`router::dispatch_for`](crate::router::dispatch_for).
//! Detached elements produce routes that start at the detached subtree root.

use understory_element_tree::{Document, ElementId};

use crate::types::ParentLookup;

impl ParentLookup<ElementId> for Document {
    fn parent_of(&self, node: &ElementId) -> Option<ElementId> {
        Document::parent_of(self, *node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router;
    use crate::types::Phase;
    use alloc::vec;
    use alloc::vec::Vec;
    use understory_element_tree::Element;

    #[test]
    fn route_follows_document_ancestry() {
        let mut doc = Document::new();
        let root = doc.root();
        let body = doc.body();
        let button = doc.insert(Some(body), Element::new("button"));

        let seq = router::dispatch_for(button, &doc);
        let steps: Vec<_> = seq.iter().map(|d| (d.phase, d.node)).collect();
        assert_eq!(
            steps,
            vec![
                (Phase::Capture, root),
                (Phase::Capture, body),
                (Phase::Target, button),
                (Phase::Bubble, body),
                (Phase::Bubble, root),
            ]
        );
    }

    #[test]
    fn detached_element_routes_to_itself() {
        let mut doc = Document::new();
        let loose = doc.insert(None, Element::new("div"));
        let seq = router::dispatch_for(loose, &doc);
        assert_eq!(seq.len(), 1);
        assert_eq!(seq[0].phase, Phase::Target);
    }
}
