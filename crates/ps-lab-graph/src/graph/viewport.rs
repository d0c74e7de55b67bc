//! Drawing-surface sizing and world/screen mapping
//!
//! The drawing surface is resized after every layout so that it exactly
//! covers the visible breadth extent plus vertical margins.

use egui::{Pos2, Rect, Vec2};

use super::animation::TweenF32;
use super::config::{Margin, TreeSettings};
use super::layout::BreadthExtent;

/// Visible region of world space, in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    /// World breadth shown at the top edge of the surface
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    /// `height = bottom - top + margins`, origin at `top - margin.top`
    pub fn fit(extent: BreadthExtent, width: f32, margin: &Margin) -> Self {
        Self {
            min_y: extent.top - margin.top,
            width,
            height: extent.span() + margin.top + margin.bottom,
        }
    }
}

/// Animated view box (origin and height follow layout changes)
#[derive(Debug, Clone)]
pub struct AnimatedViewBox {
    min_y: TweenF32,
    height: TweenF32,
    width: f32,
}

impl AnimatedViewBox {
    pub fn new(view_box: ViewBox) -> Self {
        Self {
            min_y: TweenF32::new(view_box.min_y),
            height: TweenF32::new(view_box.height),
            width: view_box.width,
        }
    }

    pub fn retarget(&mut self, view_box: ViewBox, duration: f32) {
        self.min_y.retarget(view_box.min_y, duration);
        self.height.retarget(view_box.height, duration);
        self.width = view_box.width;
    }

    pub fn tick(&mut self, dt: f32) {
        self.min_y.tick(dt);
        self.height.tick(dt);
    }

    pub fn get(&self) -> ViewBox {
        ViewBox {
            min_y: self.min_y.get(),
            width: self.width,
            height: self.height.get(),
        }
    }

    pub fn target(&self) -> ViewBox {
        ViewBox {
            min_y: self.min_y.target(),
            width: self.width,
            height: self.height.target(),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.min_y.is_animating() || self.height.is_animating()
    }
}

/// World ↔ screen mapping for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    offset: Vec2,
}

impl ScreenTransform {
    /// Root column sits `initial_left_margin` in from the surface's left edge
    pub fn new(surface: Rect, view_box: &ViewBox, settings: &TreeSettings) -> Self {
        Self {
            offset: surface.min.to_vec2()
                + Vec2::new(settings.initial_left_margin, -view_box.min_y),
        }
    }

    pub fn to_screen(&self, world: Pos2) -> Pos2 {
        world + self.offset
    }

    pub fn to_world(&self, screen: Pos2) -> Pos2 {
        screen - self.offset
    }
}
