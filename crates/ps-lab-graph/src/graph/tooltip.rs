//! Hover tooltip content and placement
//!
//! Content is derived from node metadata only for concrete permission sets;
//! structural nodes (root, branches, groups) never show a tooltip.

use chrono::{DateTime, FixedOffset, Local};
use egui::{Pos2, Vec2};
use ps_lab_types::{NodeData, NodeKind};

use super::config::TooltipSettings;
use super::tree::NodeKey;

/// Wire `type` values that mark structural records
const STRUCTURAL_RECORD_TYPES: [&str; 3] = ["PSG", "PS", "parentNode"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipLine {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub lines: Vec<TooltipLine>,
}

impl TooltipContent {
    /// `None` for anything but a concrete permission set
    pub fn for_node(kind: NodeKind, data: &NodeData) -> Option<Self> {
        if kind != NodeKind::PermissionSet {
            return None;
        }
        let meta = &data.metadata;
        if meta
            .record_type
            .as_deref()
            .is_some_and(|t| STRUCTURAL_RECORD_TYPES.contains(&t))
        {
            return None;
        }

        let api_name = Some(data.name.as_str()).filter(|n| !n.is_empty());
        let name = data
            .label
            .as_deref()
            .filter(|l| !l.is_empty())
            .or(api_name);

        let mut lines = vec![
            TooltipLine {
                label: "Name",
                value: name.unwrap_or("N/A").to_string(),
            },
            TooltipLine {
                label: "API Name",
                value: api_name.unwrap_or("N/A").to_string(),
            },
        ];

        let optional = [
            ("Description", meta.description.clone()),
            ("Status", meta.status.clone()),
            ("Created By", meta.created_by.clone()),
            ("Modified By", meta.last_modified_by.clone()),
            (
                "Modified Date",
                meta.last_modified_date.as_deref().map(format_modified_date),
            ),
        ];
        lines.extend(optional.into_iter().filter_map(|(label, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|value| TooltipLine { label, value })
        }));

        Some(Self { lines })
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{}: {}", line.label, line.value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Size estimate used for placement before the text is laid out
    pub fn estimated_size(&self, settings: &TooltipSettings) -> Vec2 {
        Vec2::new(
            settings.max_width,
            self.lines.len() as f32 * settings.line_height + 2.0 * settings.padding,
        )
    }
}

/// Render a backend timestamp in the local timezone.
///
/// Unparseable input is returned unchanged.
pub fn format_modified_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| {
            ts.with_timezone(&Local)
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string()
        })
        .unwrap_or_else(|| raw.to_string())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

/// Top-left corner of the tooltip in content coordinates.
///
/// `pointer` is relative to the visible container, `scroll` is how far the
/// container has scrolled. The tooltip sits below-right of the pointer and
/// flips above it when it would overflow the container's bottom edge.
pub fn place_tooltip(
    pointer: Pos2,
    tooltip_size: Vec2,
    container_height: f32,
    scroll: Vec2,
    settings: &TooltipSettings,
) -> Pos2 {
    let y = if pointer.y + tooltip_size.y + settings.offset_y > container_height {
        pointer.y + scroll.y - tooltip_size.y - settings.offset_y / 2.0
    } else {
        pointer.y + scroll.y + settings.offset_y
    };
    Pos2::new(pointer.x + scroll.x + settings.offset_x, y)
}

/// What the widget currently shows on hover
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipState {
    pub node: Option<NodeKey>,
    pub content: Option<TooltipContent>,
    pub position: Pos2,
}

impl TooltipState {
    pub fn is_visible(&self) -> bool {
        self.content.is_some()
    }

    pub fn show(&mut self, node: NodeKey, content: TooltipContent, position: Pos2) {
        self.node = Some(node);
        self.content = Some(content);
        self.position = position;
    }

    pub fn hide(&mut self) {
        self.node = None;
        self.content = None;
    }
}
