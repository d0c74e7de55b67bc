//! Tree widget settings
//!
//! Loaded from `config/tree_settings.yaml` (embedded at compile time) the
//! first time `global_settings()` is called. Missing keys fall back to the
//! compiled defaults; an unreadable file falls back entirely, with a warning.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

const EMBEDDED_SETTINGS: &str = include_str!("../../config/tree_settings.yaml");

/// Global settings instance (lazy-loaded)
static SETTINGS: OnceLock<TreeSettings> = OnceLock::new();

/// Get the global tree settings (loads on first access)
pub fn global_settings() -> &'static TreeSettings {
    SETTINGS.get_or_init(|| {
        TreeSettings::from_yaml_str(EMBEDDED_SETTINGS).unwrap_or_else(|e| {
            tracing::warn!("Failed to load tree settings: {}, using defaults", e);
            TreeSettings::default()
        })
    })
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tree settings YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid tree setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 10.0,
            bottom: 10.0,
            left: 10.0,
        }
    }
}

/// Node glyph and label metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSettings {
    pub radius: f32,
    /// Radius used for highlighted nodes
    pub highlight_radius: f32,
    pub highlight_stroke_width: f32,
    /// Pointer distance within which a node counts as hit
    pub hit_radius: f32,
    /// Gap between the glyph and its label
    pub label_offset: f32,
    pub font_size: f32,
    /// Line advance for wrapped labels, in ems
    pub line_height_em: f32,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            radius: 3.0,
            highlight_radius: 4.5,
            highlight_stroke_width: 2.0,
            hit_radius: 8.0,
            label_offset: 8.0,
            font_size: 10.0,
            line_height_em: 1.1,
        }
    }
}

impl NodeSettings {
    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_height_em
    }
}

/// Label wrap width policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapSettings {
    pub min_width: f32,
    /// Fraction of the depth spacing a label may occupy
    pub spacing_factor: f32,
    /// Used when no depth spacing is known yet
    pub fallback_width: f32,
}

impl Default for WrapSettings {
    fn default() -> Self {
        Self {
            min_width: 50.0,
            spacing_factor: 0.9,
            fallback_width: 90.0,
        }
    }
}

impl WrapSettings {
    /// `max(min_width, spacing_factor * depth_spacing)`, or the fallback.
    pub fn width_for(&self, depth_spacing: Option<f32>) -> f32 {
        match depth_spacing {
            Some(dy) if dy > 0.0 => (self.spacing_factor * dy).max(self.min_width),
            _ => self.fallback_width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipSettings {
    pub offset_x: f32,
    pub offset_y: f32,
    pub padding: f32,
    pub line_height: f32,
    pub max_width: f32,
}

impl Default for TooltipSettings {
    fn default() -> Self {
        Self {
            offset_x: 15.0,
            offset_y: 20.0,
            padding: 8.0,
            line_height: 16.0,
            max_width: 320.0,
        }
    }
}

/// Everything the tree widget needs to lay out and draw itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    pub margin: Margin,
    /// Breadth-axis distance between siblings
    pub node_spacing: f32,
    /// Number of depth columns the container width is divided into
    pub depth_budget: f32,
    /// Container width assumed when none is reported
    pub fallback_width: f32,
    pub initial_left_margin: f32,
    pub transition_ms: u64,
    pub node: NodeSettings,
    pub wrap: WrapSettings,
    pub tooltip: TooltipSettings,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            node_spacing: 25.0,
            depth_budget: 6.0,
            fallback_width: 928.0,
            initial_left_margin: 120.0,
            transition_ms: 250,
            node: NodeSettings::default(),
            wrap: WrapSettings::default(),
            tooltip: TooltipSettings::default(),
        }
    }
}

impl TreeSettings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.depth_budget <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "depth_budget",
                reason: format!("must be positive, got {}", self.depth_budget),
            });
        }
        if self.node_spacing <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "node_spacing",
                reason: format!("must be positive, got {}", self.node_spacing),
            });
        }
        Ok(())
    }

    /// Transition duration in seconds
    pub fn transition_secs(&self) -> f32 {
        self.transition_ms as f32 / 1000.0
    }

    /// Depth-axis distance between levels for a container of `width`.
    ///
    /// A non-positive width uses `fallback_width`.
    pub fn depth_spacing_for(&self, width: f32) -> f32 {
        let width = if width > 0.0 {
            width
        } else {
            self.fallback_width
        };
        (width - self.margin.right - self.margin.left) / self.depth_budget
    }
}
