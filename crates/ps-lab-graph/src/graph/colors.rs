//! Color palette for the hierarchy tree

use egui::Color32;

// =============================================================================
// NODES
// =============================================================================

/// Fill for nodes whose children are collapsed
pub const COLLAPSED_FILL: Color32 = Color32::from_rgb(0x29, 0xf6, 0x0d); // Bright green
/// Fill for leaves and expanded nodes
pub const DEFAULT_FILL: Color32 = Color32::from_rgb(0x99, 0x99, 0x99); // Gray
/// Border drawn around highlighted nodes
pub const HIGHLIGHT_STROKE: Color32 = Color32::from_rgb(0x60, 0x6c, 0x38); // Olive

pub fn node_fill(has_hidden_children: bool) -> Color32 {
    if has_hidden_children {
        COLLAPSED_FILL
    } else {
        DEFAULT_FILL
    }
}

// =============================================================================
// LINKS
// =============================================================================

pub const LINK_STROKE: Color32 = Color32::from_rgb(0x75, 0x92, 0xe7); // Periwinkle
pub const LINK_OPACITY: f32 = 0.4;
pub const LINK_WIDTH: f32 = 1.5;

// =============================================================================
// LABELS & TOOLTIP
// =============================================================================

pub const LABEL_TEXT: Color32 = Color32::from_rgb(0x1b, 0x1b, 0x1b);
pub const LABEL_HALO: Color32 = Color32::WHITE;
pub const TOOLTIP_BACKGROUND: Color32 = Color32::from_rgba_premultiplied(242, 242, 242, 242); // White @ 0.95
pub const TOOLTIP_BORDER: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);
pub const TOOLTIP_TEXT: Color32 = Color32::from_rgb(0x22, 0x22, 0x22);

/// Scale a color's alpha by `opacity` (used for fade transitions)
pub fn faded(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_fill() {
        assert_eq!(node_fill(true), COLLAPSED_FILL);
        assert_eq!(node_fill(false), DEFAULT_FILL);
    }

    #[test]
    fn test_faded_bounds() {
        assert_eq!(faded(LINK_STROKE, 1.0), LINK_STROKE);
        assert_eq!(faded(LINK_STROKE, 0.0).a(), 0);
        assert_eq!(faded(LINK_STROKE, 7.0), LINK_STROKE);
    }
}
