//! Property tests for the hierarchy filter
//!
//! Hierarchies are generated from fixed id pools so detections, group
//! memberships and name filters overlap often enough to be interesting.

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use ps_lab::{
    collect_ids, filter, BranchKind, DetectionResult, FilterOutcome, FilterPayload, Node,
    NodeKind, PermissionType, RawNode,
};

const GROUPED_POOL: usize = 6;
const STANDALONE_POOL: usize = 4;
const MAX_GROUPS: usize = 4;

fn grouped_id(i: usize) -> String {
    format!("0PS{i}")
}

fn standalone_id(i: usize) -> String {
    format!("0SA{i}")
}

fn group_id(g: usize) -> String {
    format!("0PG{g}")
}

fn group_name(g: usize) -> String {
    format!("Group_{g}")
}

fn build_hierarchy(groups: &[Vec<bool>], standalone: &[bool]) -> Node {
    let groups = groups
        .iter()
        .enumerate()
        .map(|(g, members)| {
            let children = members
                .iter()
                .enumerate()
                .filter(|(_, member)| **member)
                .map(|(i, _)| Node::permission_set(grouped_id(i), format!("Grouped_{i}")))
                .collect();
            Node::group(group_id(g), group_name(g), children)
        })
        .collect();
    let standalone = standalone
        .iter()
        .enumerate()
        .filter(|(_, present)| **present)
        .map(|(i, _)| Node::permission_set(standalone_id(i), format!("Standalone_{i}")))
        .collect();

    Node::root(
        "Org",
        vec![
            Node::branch(BranchKind::Groups, groups),
            Node::branch(BranchKind::Standalone, standalone),
        ],
    )
}

fn hierarchy_strategy() -> impl Strategy<Value = Node> {
    (
        prop::collection::vec(prop::collection::vec(any::<bool>(), GROUPED_POOL), 0..=MAX_GROUPS),
        prop::collection::vec(any::<bool>(), STANDALONE_POOL),
    )
        .prop_map(|(groups, standalone)| build_hierarchy(&groups, &standalone))
}

/// Per pool id: detected or not, and through which groups
fn detection_strategy() -> impl Strategy<Value = DetectionResult> {
    prop::collection::vec(
        (any::<bool>(), prop::collection::vec(any::<bool>(), MAX_GROUPS)),
        GROUPED_POOL + STANDALONE_POOL,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .filter(|(_, (detected, _))| *detected)
            .map(|(i, (_, via))| {
                let id = if i < GROUPED_POOL {
                    grouped_id(i)
                } else {
                    standalone_id(i - GROUPED_POOL)
                };
                let included_in: Vec<String> = via
                    .iter()
                    .enumerate()
                    .filter(|(_, member)| **member)
                    .map(|(g, _)| group_id(g))
                    .collect();
                RawNode::detected(id, included_in)
            })
            .collect()
    })
}

fn payload_strategy() -> impl Strategy<Value = FilterPayload> {
    (
        prop::option::of(prop_oneof![
            Just(PermissionType::PermissionSetGroup),
            Just(PermissionType::PermissionSet),
            Just(PermissionType::User),
        ]),
        prop::collection::vec(any::<bool>(), MAX_GROUPS + STANDALONE_POOL),
    )
        .prop_map(|(permission_type, mask)| {
            let names: Vec<String> = mask
                .iter()
                .enumerate()
                .filter(|(_, picked)| **picked)
                .map(|(i, _)| {
                    if i < MAX_GROUPS {
                        group_name(i)
                    } else {
                        format!("Standalone_{}", i - MAX_GROUPS)
                    }
                })
                .collect();
            let joined = (!names.is_empty()).then(|| names.join(","));
            FilterPayload::new(permission_type, joined.as_deref())
        })
}

fn tree_ids(outcome: &FilterOutcome) -> BTreeSet<String> {
    outcome
        .filtered_tree
        .as_ref()
        .map(|tree| collect_ids(std::iter::once(tree)))
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn prop_highlighted_ids_are_in_the_tree(
        hierarchy in hierarchy_strategy(),
        detection in detection_strategy(),
        payload in payload_strategy(),
    ) {
        let outcome = filter(Some(&hierarchy), &detection, &payload);
        let ids = tree_ids(&outcome);
        prop_assert!(outcome.highlighted_ids.is_subset(&ids));
        if outcome.filtered_tree.is_none() {
            prop_assert!(outcome.highlighted_ids.is_empty());
        }
    }

    #[test]
    fn prop_filtered_tree_is_a_subset_of_the_hierarchy(
        hierarchy in hierarchy_strategy(),
        detection in detection_strategy(),
        payload in payload_strategy(),
    ) {
        let outcome = filter(Some(&hierarchy), &detection, &payload);
        let all = collect_ids(std::iter::once(&hierarchy));
        prop_assert!(tree_ids(&outcome).is_subset(&all));
    }

    #[test]
    fn prop_refiltering_is_idempotent(
        hierarchy in hierarchy_strategy(),
        detection in detection_strategy(),
        payload in payload_strategy(),
    ) {
        let first = filter(Some(&hierarchy), &detection, &payload);
        if let Some(tree) = first.filtered_tree.as_ref() {
            let second = filter(Some(tree), &detection, &payload);
            prop_assert_eq!(&second.highlighted_ids, &first.highlighted_ids);
            prop_assert_eq!(&second.filtered_tree, &first.filtered_tree);
        }
    }

    #[test]
    fn prop_group_search_keeps_only_named_groups(
        hierarchy in hierarchy_strategy(),
        detection in detection_strategy(),
        mask in prop::collection::vec(any::<bool>(), MAX_GROUPS),
    ) {
        let names: Vec<String> = mask
            .iter()
            .enumerate()
            .filter(|(_, picked)| **picked)
            .map(|(g, _)| group_name(g))
            .collect();
        prop_assume!(!names.is_empty());
        let payload = FilterPayload::groups(Some(&names.join(",")));

        let outcome = filter(Some(&hierarchy), &detection, &payload);
        if let Some(tree) = outcome.filtered_tree.as_ref() {
            prop_assert!(tree.branch_of(BranchKind::Standalone).is_none());
            let groups = tree.branch_of(BranchKind::Groups).map(Node::children).unwrap_or(&[]);
            for group in groups {
                prop_assert_eq!(group.kind(), NodeKind::Group);
                prop_assert!(names.iter().any(|name| name == group.name()));
            }
        }
    }

    #[test]
    fn prop_empty_detection_is_empty_outcome(
        hierarchy in hierarchy_strategy(),
        payload in payload_strategy(),
    ) {
        let outcome = filter(Some(&hierarchy), &DetectionResult::default(), &payload);
        prop_assert_eq!(outcome, FilterOutcome::empty());
    }

    #[test]
    fn prop_collect_ids_finds_every_id(parents in prop::collection::vec(0usize..64, 0..40)) {
        // Random nesting; every third node has no id
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); parents.len() + 1];
        for (i, &choice) in parents.iter().enumerate() {
            children[choice % (i + 1)].push(i + 1);
        }
        fn raw(i: usize, children: &[Vec<usize>]) -> RawNode {
            let mut node = RawNode::named(format!("n{i}"));
            if i % 3 != 0 {
                node.id = Some(format!("id{i}"));
            }
            node.with_children(children[i].iter().map(|&c| raw(c, children)).collect())
        }
        let detection = DetectionResult::new(vec![raw(0, &children)]);

        let expected: BTreeSet<String> = (0..=parents.len())
            .filter(|i| i % 3 != 0)
            .map(|i| format!("id{i}"))
            .collect();
        prop_assert_eq!(collect_ids(&detection), expected);
    }
}

#[test]
fn test_example_unset_payload() {
    let hierarchy = build_hierarchy(
        &[vec![true, true, false, false, false, false]],
        &[true, false, false, false],
    );
    let detection = DetectionResult::new(vec![
        RawNode::detected(grouped_id(0), [group_id(0)]),
        RawNode::detected(standalone_id(0), Vec::<String>::new()),
    ]);

    let outcome = filter(Some(&hierarchy), &detection, &FilterPayload::default());

    let expected = build_hierarchy(
        &[vec![true, false, false, false, false, false]],
        &[true, false, false, false],
    );
    assert_eq!(outcome.filtered_tree, Some(expected));
    let highlighted: BTreeSet<String> = [group_id(0), grouped_id(0), standalone_id(0)]
        .into_iter()
        .collect();
    assert_eq!(outcome.highlighted_ids, highlighted);
}

#[test]
fn test_standalone_reached_through_a_group_is_not_shown() {
    let hierarchy = build_hierarchy(&[], &[true, false, false, false]);
    let detection = DetectionResult::new(vec![RawNode::detected(standalone_id(0), [group_id(0)])]);

    let outcome = filter(Some(&hierarchy), &detection, &FilterPayload::default());
    assert_eq!(outcome, FilterOutcome::empty());
}

#[test]
fn test_filter_from_wire_json() {
    let hierarchy: Node = serde_json::from_str(
        r#"{
            "name": "Org",
            "children": [
                {"name": "Permission Set Groups", "children": [
                    {"name": "Sales", "id": "0PG1", "children": [
                        {"name": "Sales_Rep", "id": "0PS1"},
                        {"name": "Sales_Mgr", "id": "0PS2", "children": null}
                    ]}
                ]},
                {"name": "Standalone Permission Sets"}
            ]
        }"#,
    )
    .unwrap();
    let detection: DetectionResult =
        serde_json::from_str(r#"[{"permissionSetId": "0PS2", "includedIn": ["0PG1"]}]"#).unwrap();

    let outcome = filter(Some(&hierarchy), &detection, &FilterPayload::groups(Some("Sales")));
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(
        json["filteredTree"]["children"][0]["children"][0]["children"][0]["name"],
        "Sales_Mgr"
    );
    assert_eq!(json["highlightedIds"], serde_json::json!(["0PG1", "0PS2"]));
}
