//! Permission-set containment hierarchy
//!
//! Two representations live here:
//!
//! - [`RawNode`] - the lenient wire shape the backend sends (any node, any depth)
//! - [`Node`] - the classified tree: `Root | Branch | Group | PermissionSet`
//!
//! Classification happens exactly once in [`Node::from_raw`]. Everything
//! downstream matches on the variant instead of probing for fields.

use serde::{Deserialize, Deserializer, Serialize};

/// Name of the root child that holds permission-set groups
pub const GROUPS_BRANCH_NAME: &str = "Permission Set Groups";

/// Name of the root child that holds standalone permission sets
pub const STANDALONE_BRANCH_NAME: &str = "Standalone Permission Sets";

// ============================================================================
// WIRE SHAPE
// ============================================================================

/// A hierarchy (or detection) node as received from the backend
///
/// The same shape is used for the full hierarchy and for detection entries,
/// which additionally carry `includedIn`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_set_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
    /// Group ids through which a detected permission set was reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_in: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<RawNode>,
    /// Fields this crate does not model, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RawNode>>::deserialize(deserializer)?.unwrap_or_default())
}

impl RawNode {
    /// Create a bare node with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a detection-style entry: id plus the groups it was reached through
    pub fn detected<I, S>(id: impl Into<String>, included_in: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        Self {
            name: id.clone(),
            permission_set_id: Some(id),
            included_in: Some(included_in.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// The identifying id: `permissionSetId` wins over `id` when both are present
    pub fn identifying_id(&self) -> Option<&str> {
        self.permission_set_id.as_deref().or(self.id.as_deref())
    }

    /// True when the entry was matched directly, not only through some group
    pub fn is_directly_matched(&self) -> bool {
        self.included_in.as_ref().map_or(true, Vec::is_empty)
    }

    pub fn with_children(mut self, children: Vec<RawNode>) -> Self {
        self.children = children;
        self
    }
}

// ============================================================================
// CLASSIFIED TREE
// ============================================================================

/// Which top-level category a branch node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    /// "Permission Set Groups"
    Groups,
    /// "Standalone Permission Sets"
    Standalone,
    /// Any other root child; carried through but never filtered
    Other,
}

impl BranchKind {
    /// Classify a root child by its exact name
    pub fn from_name(name: &str) -> Self {
        match name {
            GROUPS_BRANCH_NAME => BranchKind::Groups,
            STANDALONE_BRANCH_NAME => BranchKind::Standalone,
            _ => BranchKind::Other,
        }
    }

    /// Canonical display name, if the kind has one
    pub fn canonical_name(&self) -> Option<&'static str> {
        match self {
            BranchKind::Groups => Some(GROUPS_BRANCH_NAME),
            BranchKind::Standalone => Some(STANDALONE_BRANCH_NAME),
            BranchKind::Other => None,
        }
    }
}

/// Discriminant of a [`Node`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Branch(BranchKind),
    Group,
    PermissionSet,
}

/// Optional descriptive fields shown in tooltips
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeMetadata {
    pub description: Option<String>,
    pub status: Option<String>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
    /// Backend timestamp, kept as sent (formatting is a rendering concern)
    pub last_modified_date: Option<String>,
    /// Backend record type tag (`type` on the wire)
    pub record_type: Option<String>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Which wire key carried a node's identifying id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdField {
    #[default]
    Id,
    PermissionSetId,
}

/// Fields shared by every node variant
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeData {
    /// Identifying id (unique across the tree when present)
    pub id: Option<String>,
    /// Key the id is written back under
    pub id_field: IdField,
    /// API name
    pub name: String,
    /// Human label
    pub label: Option<String>,
    pub metadata: NodeMetadata,
}

impl NodeData {
    pub fn new(id: Option<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    fn from_raw(raw: &mut RawNode) -> Self {
        let (id, id_field) = match raw.permission_set_id.take() {
            Some(id) => (Some(id), IdField::PermissionSetId),
            None => (raw.id.take(), IdField::Id),
        };
        Self {
            id,
            id_field,
            name: std::mem::take(&mut raw.name),
            label: raw.label.take(),
            metadata: NodeMetadata {
                description: raw.description.take(),
                status: raw.status.take(),
                created_by: raw.created_by.take(),
                last_modified_by: raw.last_modified_by.take(),
                last_modified_date: raw.last_modified_date.take(),
                record_type: raw.node_type.take(),
                extra: std::mem::take(&mut raw.extra),
            },
        }
    }

    fn to_raw(&self, children: Vec<RawNode>) -> RawNode {
        let (id, permission_set_id) = match self.id_field {
            IdField::Id => (self.id.clone(), None),
            IdField::PermissionSetId => (None, self.id.clone()),
        };
        RawNode {
            name: self.name.clone(),
            id,
            permission_set_id,
            label: self.label.clone(),
            node_type: self.metadata.record_type.clone(),
            description: self.metadata.description.clone(),
            status: self.metadata.status.clone(),
            created_by: self.metadata.created_by.clone(),
            last_modified_by: self.metadata.last_modified_by.clone(),
            last_modified_date: self.metadata.last_modified_date.clone(),
            included_in: None,
            children,
            extra: self.metadata.extra.clone(),
        }
    }
}

/// A classified hierarchy node
///
/// The tree is owned: cloning a `Node` deep-copies the whole subtree, so a
/// filtered copy never aliases the baseline it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub enum Node {
    /// Synthetic top node owning the branches
    Root { data: NodeData, children: Vec<Node> },
    /// Named category owned by the root
    Branch {
        kind: BranchKind,
        data: NodeData,
        children: Vec<Node>,
    },
    /// Permission-set group; children are permission sets
    Group { data: NodeData, children: Vec<Node> },
    /// Permission set (leaf in the full hierarchy, may nest in contextual trees)
    PermissionSet { data: NodeData, children: Vec<Node> },
}

impl Node {
    // ------------------------------------------------------------------
    // Construction helpers
    // ------------------------------------------------------------------

    pub fn root(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Root {
            data: NodeData::new(None, name),
            children,
        }
    }

    /// Branch with its canonical name (`Other` branches get an empty name)
    pub fn branch(kind: BranchKind, children: Vec<Node>) -> Self {
        let name = kind.canonical_name().unwrap_or_default();
        Node::Branch {
            kind,
            data: NodeData::new(None, name),
            children,
        }
    }

    pub fn group(id: impl Into<String>, name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Group {
            data: NodeData::new(Some(id.into()), name),
            children,
        }
    }

    pub fn permission_set(id: impl Into<String>, name: impl Into<String>) -> Self {
        Node::PermissionSet {
            data: NodeData::new(Some(id.into()), name),
            children: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data_mut().label = Some(label.into());
        self
    }

    pub fn with_metadata(mut self, metadata: NodeMetadata) -> Self {
        self.data_mut().metadata = metadata;
        self
    }

    /// Replace the children, keeping everything else
    pub fn with_children(mut self, new_children: Vec<Node>) -> Self {
        *self.children_mut() = new_children;
        self
    }

    /// Copy of this node without any children
    pub fn leaf_copy(&self) -> Self {
        let data = self.data().clone();
        match self {
            Node::Root { .. } => Node::Root {
                data,
                children: Vec::new(),
            },
            Node::Branch { kind, .. } => Node::Branch {
                kind: *kind,
                data,
                children: Vec::new(),
            },
            Node::Group { .. } => Node::Group {
                data,
                children: Vec::new(),
            },
            Node::PermissionSet { .. } => Node::PermissionSet {
                data,
                children: Vec::new(),
            },
        }
    }

    // ------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------

    /// Classify a raw hierarchy document whose top node is the root
    pub fn from_raw(mut raw: RawNode) -> Self {
        let children = std::mem::take(&mut raw.children)
            .into_iter()
            .map(Self::branch_from_raw)
            .collect();
        Node::Root {
            data: NodeData::from_raw(&mut raw),
            children,
        }
    }

    fn branch_from_raw(mut raw: RawNode) -> Self {
        let kind = BranchKind::from_name(&raw.name);
        let children = std::mem::take(&mut raw.children)
            .into_iter()
            .map(|child| match kind {
                BranchKind::Groups => Self::group_from_raw(child),
                _ => Self::permission_set_from_raw(child),
            })
            .collect();
        Node::Branch {
            kind,
            data: NodeData::from_raw(&mut raw),
            children,
        }
    }

    fn group_from_raw(mut raw: RawNode) -> Self {
        let children = std::mem::take(&mut raw.children)
            .into_iter()
            .map(Self::permission_set_from_raw)
            .collect();
        Node::Group {
            data: NodeData::from_raw(&mut raw),
            children,
        }
    }

    /// Classify a raw node as a permission set (recursively)
    pub fn permission_set_from_raw(mut raw: RawNode) -> Self {
        let children = std::mem::take(&mut raw.children)
            .into_iter()
            .map(Self::permission_set_from_raw)
            .collect();
        Node::PermissionSet {
            data: NodeData::from_raw(&mut raw),
            children,
        }
    }

    /// Back to the wire shape
    pub fn to_raw(&self) -> RawNode {
        let children = self.children().iter().map(Node::to_raw).collect();
        self.data().to_raw(children)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Root { .. } => NodeKind::Root,
            Node::Branch { kind, .. } => NodeKind::Branch(*kind),
            Node::Group { .. } => NodeKind::Group,
            Node::PermissionSet { .. } => NodeKind::PermissionSet,
        }
    }

    pub fn data(&self) -> &NodeData {
        match self {
            Node::Root { data, .. }
            | Node::Branch { data, .. }
            | Node::Group { data, .. }
            | Node::PermissionSet { data, .. } => data,
        }
    }

    fn data_mut(&mut self) -> &mut NodeData {
        match self {
            Node::Root { data, .. }
            | Node::Branch { data, .. }
            | Node::Group { data, .. }
            | Node::PermissionSet { data, .. } => data,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Root { children, .. }
            | Node::Branch { children, .. }
            | Node::Group { children, .. }
            | Node::PermissionSet { children, .. } => children,
        }
    }

    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self {
            Node::Root { children, .. }
            | Node::Branch { children, .. }
            | Node::Group { children, .. }
            | Node::PermissionSet { children, .. } => children,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.data().id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.data().name
    }

    pub fn label(&self) -> Option<&str> {
        self.data().label.as_deref()
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.data().metadata
    }

    /// "Label (ApiName)" when a label exists, otherwise the API name
    pub fn display_label(&self) -> String {
        match self.label() {
            Some(label) => format!("{} ({})", label, self.name()),
            None => self.name().to_string(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// The root child of the given kind, if present
    pub fn branch_of(&self, wanted: BranchKind) -> Option<&Node> {
        self.children()
            .iter()
            .find(|child| child.kind() == NodeKind::Branch(wanted))
    }

    /// Total number of nodes in this subtree (including self)
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(Node::subtree_len).sum::<usize>()
    }
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        Node::from_raw(raw)
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        node.to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "name": "Org",
        "children": [
            {
                "name": "Permission Set Groups",
                "children": [
                    {
                        "name": "Sales_Bundle",
                        "permissionSetId": "0PG1",
                        "label": "Sales Bundle",
                        "children": [
                            { "name": "Sales_Read", "permissionSetId": "0PS1" }
                        ]
                    }
                ]
            },
            {
                "name": "Standalone Permission Sets",
                "children": [
                    {
                        "name": "Api_Only",
                        "id": "0PS2",
                        "status": "Active",
                        "lastModifiedDate": "2025-04-16T10:00:00.000+0000",
                        "children": null
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_from_raw_classifies_by_position() {
        let node: Node = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(node.kind(), NodeKind::Root);
        let groups = node.branch_of(BranchKind::Groups).unwrap();
        assert_eq!(groups.children()[0].kind(), NodeKind::Group);
        assert_eq!(groups.children()[0].id(), Some("0PG1"));
        assert_eq!(
            groups.children()[0].children()[0].kind(),
            NodeKind::PermissionSet
        );

        let standalone = node.branch_of(BranchKind::Standalone).unwrap();
        let ps = &standalone.children()[0];
        assert_eq!(ps.kind(), NodeKind::PermissionSet);
        assert_eq!(ps.id(), Some("0PS2"));
        assert_eq!(ps.metadata().status.as_deref(), Some("Active"));
        assert!(!ps.has_children());
    }

    #[test]
    fn test_unknown_branch_is_other() {
        let raw = RawNode::named("root").with_children(vec![RawNode::named("Muting")]);
        let node = Node::from_raw(raw);
        assert_eq!(
            node.children()[0].kind(),
            NodeKind::Branch(BranchKind::Other)
        );
    }

    #[test]
    fn test_permission_set_id_wins_over_id() {
        let raw: RawNode =
            serde_json::from_str(r#"{"name":"x","id":"a","permissionSetId":"b"}"#).unwrap();
        assert_eq!(raw.identifying_id(), Some("b"));
    }

    #[test]
    fn test_directly_matched() {
        assert!(RawNode::detected("a", Vec::<String>::new()).is_directly_matched());
        assert!(RawNode::named("a").is_directly_matched());
        assert!(!RawNode::detected("a", ["g"]).is_directly_matched());
    }

    #[test]
    fn test_display_label() {
        let ps = Node::permission_set("1", "Sales_Read").with_label("Sales Read");
        assert_eq!(ps.display_label(), "Sales Read (Sales_Read)");
        assert_eq!(Node::permission_set("2", "Plain").display_label(), "Plain");
    }

    #[test]
    fn test_round_trip_preserves_shape() {
        let node: Node = serde_json::from_str(SAMPLE).unwrap();
        let json = serde_json::to_value(&node).unwrap();
        let again: Node = serde_json::from_value(json).unwrap();
        assert_eq!(node, again);
        assert_eq!(node.subtree_len(), 6);
    }

    #[test]
    fn test_id_written_back_under_its_wire_key() {
        let node: Node = serde_json::from_str(SAMPLE).unwrap();
        let json = serde_json::to_value(&node).unwrap();

        let group = &json["children"][0]["children"][0];
        assert_eq!(group["permissionSetId"], "0PG1");
        assert!(group.get("id").is_none());
        let standalone = &json["children"][1]["children"][0];
        assert_eq!(standalone["id"], "0PS2");
        assert!(standalone.get("permissionSetId").is_none());
    }

    #[test]
    fn test_leaf_copy_drops_children() {
        let group = Node::group("g", "G", vec![Node::permission_set("a", "A")]);
        let copy = group.leaf_copy();
        assert_eq!(copy.id(), Some("g"));
        assert!(copy.children().is_empty());
        assert_eq!(group.children().len(), 1);
    }
}
