//! egui painting for the hierarchy tree
//!
//! Draw order: links, then nodes (glyph + wrapped label), then the tooltip.

use egui::{Align2, FontId, Pos2, Rect, Shape, Stroke, Vec2};

use super::colors;
use super::config::TreeSettings;
use super::scene::{LinkSprite, NodeSprite, Scene};
use super::text_wrap::{wrap_label, PainterTextMeasure};
use super::tooltip::TooltipContent;
use super::viewport::ScreenTransform;

/// Number of segments used to approximate a link curve
const CURVE_SEGMENTS: usize = 16;

/// Horizontal cubic Bézier between two points
///
/// Control points sit at the horizontal midpoint, level with each endpoint,
/// so links leave and enter nodes horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkCurve {
    pub from: Pos2,
    pub to: Pos2,
}

impl LinkCurve {
    pub fn new(from: Pos2, to: Pos2) -> Self {
        Self { from, to }
    }

    fn control_points(&self) -> [Pos2; 4] {
        let mid_x = (self.from.x + self.to.x) / 2.0;
        [
            self.from,
            Pos2::new(mid_x, self.from.y),
            Pos2::new(mid_x, self.to.y),
            self.to,
        ]
    }

    pub fn point_at(&self, t: f32) -> Pos2 {
        let [p0, p1, p2, p3] = self.control_points();
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Pos2::new(
            a * p0.x + b * p1.x + c * p2.x + d * p3.x,
            a * p0.y + b * p1.y + c * p2.y + d * p3.y,
        )
    }

    pub fn points(&self) -> Vec<Pos2> {
        (0..=CURVE_SEGMENTS)
            .map(|i| self.point_at(i as f32 / CURVE_SEGMENTS as f32))
            .collect()
    }
}

/// Paints a `Scene` through one frame's transform
pub struct TreePainter<'a> {
    painter: &'a egui::Painter,
    transform: ScreenTransform,
    settings: &'a TreeSettings,
    wrap_width: f32,
}

impl<'a> TreePainter<'a> {
    pub fn new(
        painter: &'a egui::Painter,
        transform: ScreenTransform,
        settings: &'a TreeSettings,
        wrap_width: f32,
    ) -> Self {
        Self {
            painter,
            transform,
            settings,
            wrap_width,
        }
    }

    pub fn paint_scene(&self, scene: &Scene) {
        for link in scene.links() {
            self.paint_link(link);
        }
        for node in scene.nodes_in_draw_order() {
            self.paint_node(node);
        }
    }

    fn paint_link(&self, link: &LinkSprite) {
        let curve = LinkCurve::new(
            self.transform.to_screen(link.source.get()),
            self.transform.to_screen(link.target.get()),
        );
        let stroke = Stroke::new(
            colors::LINK_WIDTH,
            colors::faded(colors::LINK_STROKE, colors::LINK_OPACITY),
        );
        self.painter.add(Shape::line(curve.points(), stroke));
    }

    fn paint_node(&self, node: &NodeSprite) {
        let opacity = node.opacity.get();
        if opacity <= 0.0 {
            return;
        }
        let center = self.transform.to_screen(node.position.get());
        let metrics = &self.settings.node;

        let fill = colors::faded(colors::node_fill(node.style.has_hidden_children), opacity);
        if node.style.highlighted {
            self.painter.circle(
                center,
                metrics.highlight_radius,
                fill,
                Stroke::new(
                    metrics.highlight_stroke_width,
                    colors::faded(colors::HIGHLIGHT_STROKE, opacity),
                ),
            );
        } else {
            self.painter.circle_filled(center, metrics.radius, fill);
        }

        self.paint_label(node, center, opacity);
    }

    /// Collapsed nodes put their label on the left, everything else right
    fn paint_label(&self, node: &NodeSprite, center: Pos2, opacity: f32) {
        let metrics = &self.settings.node;
        let font = FontId::proportional(metrics.font_size);
        let measure = PainterTextMeasure {
            painter: self.painter,
            font: font.clone(),
        };
        let lines = wrap_label(&node.style.label, self.wrap_width, &measure);

        let (anchor, dx) = if node.style.has_hidden_children {
            (Align2::RIGHT_CENTER, -metrics.label_offset)
        } else {
            (Align2::LEFT_CENTER, metrics.label_offset)
        };
        let text_color = colors::faded(colors::LABEL_TEXT, opacity);
        let halo_color = colors::faded(colors::LABEL_HALO, opacity);
        let line_height = metrics.line_height();

        // First line centres on the glyph, continuation lines hang below
        for (i, line) in lines.iter().enumerate() {
            let pos = center + Vec2::new(dx, i as f32 * line_height);
            for offset in [
                Vec2::new(-1.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, -1.0),
                Vec2::new(0.0, 1.0),
            ] {
                self.painter
                    .text(pos + offset, anchor, line, font.clone(), halo_color);
            }
            self.painter.text(pos, anchor, line, font.clone(), text_color);
        }
    }

    /// Tooltip at `top_left` (screen coordinates)
    pub fn paint_tooltip(&self, top_left: Pos2, content: &TooltipContent) {
        let tooltip = &self.settings.tooltip;
        let font = FontId::proportional(self.settings.node.font_size + 2.0);

        let galleys: Vec<_> = content
            .lines
            .iter()
            .map(|line| {
                self.painter.layout(
                    format!("{}: {}", line.label, line.value),
                    font.clone(),
                    colors::TOOLTIP_TEXT,
                    tooltip.max_width - 2.0 * tooltip.padding,
                )
            })
            .collect();

        let text_width = galleys
            .iter()
            .map(|g| g.size().x)
            .fold(0.0_f32, f32::max);
        let text_height: f32 = galleys
            .iter()
            .map(|g| g.size().y.max(tooltip.line_height))
            .sum();
        let rect = Rect::from_min_size(
            top_left,
            Vec2::new(text_width, text_height) + Vec2::splat(2.0 * tooltip.padding),
        );

        self.painter.rect_filled(rect, 4.0, colors::TOOLTIP_BACKGROUND);
        self.painter
            .rect_stroke(rect, 4.0, Stroke::new(1.0, colors::TOOLTIP_BORDER));

        let mut cursor = rect.min + Vec2::splat(tooltip.padding);
        for galley in galleys {
            let advance = galley.size().y.max(tooltip.line_height);
            self.painter.galley(cursor, galley, colors::TOOLTIP_TEXT);
            cursor.y += advance;
        }
    }
}
