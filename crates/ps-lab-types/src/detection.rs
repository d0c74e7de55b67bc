//! Detection results
//!
//! A detection request returns the permission sets that matched, each tagged
//! with the groups (`includedIn`) through which it was reached. Entries may
//! themselves nest, so consumers walk `children` too.
//!
//! A user-scoped search returns one hierarchy object instead of an array;
//! it deserializes as a single entry.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::hierarchy::RawNode;

/// Ids the renderer should emphasize after a filter pass
pub type HighlightedIds = BTreeSet<String>;

/// Collection of detected entries, immutable once received
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct DetectionResult {
    entries: Vec<RawNode>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireDetection {
    Many(Vec<RawNode>),
    One(Box<RawNode>),
}

impl<'de> Deserialize<'de> for DetectionResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = match WireDetection::deserialize(deserializer)? {
            WireDetection::Many(entries) => entries,
            WireDetection::One(entry) => vec![*entry],
        };
        Ok(Self { entries })
    }
}

impl DetectionResult {
    pub fn new(entries: Vec<RawNode>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RawNode] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawNode> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<RawNode> {
        self.entries
    }
}

impl From<Vec<RawNode>> for DetectionResult {
    fn from(entries: Vec<RawNode>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<RawNode> for DetectionResult {
    fn from_iter<T: IntoIterator<Item = RawNode>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DetectionResult {
    type Item = &'a RawNode;
    type IntoIter = std::slice::Iter<'a, RawNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
