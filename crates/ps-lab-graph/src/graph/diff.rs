//! Enter/update/exit classification between two render passes
//!
//! Nodes are matched by `NodeKey`; links are matched by the key of their
//! child endpoint (every link has exactly one child).

use std::collections::HashSet;

use super::tree::NodeKey;

/// Keys entering, staying, and leaving between two passes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDiff {
    /// Present now, absent before (current order)
    pub entered: Vec<NodeKey>,
    /// Present in both passes (current order)
    pub updated: Vec<NodeKey>,
    /// Present before, absent now (sorted)
    pub exited: Vec<NodeKey>,
}

impl KeyDiff {
    pub fn compute<'a>(
        previous: &HashSet<NodeKey>,
        current: impl IntoIterator<Item = &'a NodeKey>,
    ) -> Self {
        let mut diff = Self::default();
        let mut seen: HashSet<&NodeKey> = HashSet::new();

        for key in current {
            if !seen.insert(key) {
                continue;
            }
            if previous.contains(key) {
                diff.updated.push(key.clone());
            } else {
                diff.entered.push(key.clone());
            }
        }

        diff.exited = previous
            .iter()
            .filter(|key| !seen.contains(*key))
            .cloned()
            .collect();
        diff.exited.sort();
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }
}

/// Outcome of one render pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderDiff {
    pub nodes: KeyDiff,
    pub links: KeyDiff,
}
