//! Fixed-duration tweens for tree transitions
//!
//! Every enter/update/exit transition runs for the same configured duration,
//! so values are eased over time rather than driven by springs.
//!
//! - Animation state is UI-only
//! - No callbacks - values are polled each frame via `get()`
//! - Call `tick(dt)` once per frame, then render with `get()` values
//!
//! Retargeting a tween mid-flight restarts it from the value it currently
//! shows. The most recent transition on a value always wins.

use egui::Pos2;

/// Easing curve applied to normalized progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Symmetric cubic ease-in-out
    #[default]
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

// =============================================================================
// TWEEN F32
// =============================================================================

/// Animated f32 value eased over a fixed duration
///
/// # Usage
/// ```ignore
/// let mut opacity = TweenF32::new(0.0);
/// opacity.retarget(1.0, 0.25);
///
/// // Each frame:
/// opacity.tick(dt);
/// let current = opacity.get();
/// ```
#[derive(Debug, Clone)]
pub struct TweenF32 {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

impl TweenF32 {
    /// At rest on `value`
    pub fn new(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            elapsed: 0.0,
            duration: 0.0,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Start animating toward `target` from the value currently shown.
    ///
    /// A non-positive duration jumps straight to the target.
    pub fn retarget(&mut self, target: f32, duration: f32) {
        if duration <= 0.0 {
            self.set_immediate(target);
            return;
        }
        self.from = self.get();
        self.to = target;
        self.elapsed = 0.0;
        self.duration = duration;
    }

    /// Jump immediately to value (no animation)
    pub fn set_immediate(&mut self, value: f32) {
        self.from = value;
        self.to = value;
        self.elapsed = 0.0;
        self.duration = 0.0;
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if self.is_animating() {
            self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        }
    }

    /// Normalized progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    pub fn get(&self) -> f32 {
        let t = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * t
    }

    pub fn is_animating(&self) -> bool {
        self.elapsed < self.duration
    }
}

// =============================================================================
// TWEEN POS2
// =============================================================================

/// Animated position (both axes share timing)
#[derive(Debug, Clone)]
pub struct TweenPos2 {
    pub x: TweenF32,
    pub y: TweenF32,
}

impl TweenPos2 {
    pub fn new(pos: Pos2) -> Self {
        Self {
            x: TweenF32::new(pos.x),
            y: TweenF32::new(pos.y),
        }
    }

    pub fn retarget(&mut self, target: Pos2, duration: f32) {
        self.x.retarget(target.x, duration);
        self.y.retarget(target.y, duration);
    }

    pub fn set_immediate(&mut self, pos: Pos2) {
        self.x.set_immediate(pos.x);
        self.y.set_immediate(pos.y);
    }

    pub fn target(&self) -> Pos2 {
        Pos2::new(self.x.target(), self.y.target())
    }

    pub fn tick(&mut self, dt: f32) {
        self.x.tick(dt);
        self.y.tick(dt);
    }

    pub fn get(&self) -> Pos2 {
        Pos2::new(self.x.get(), self.y.get())
    }

    pub fn is_animating(&self) -> bool {
        self.x.is_animating() || self.y.is_animating()
    }
}

// =============================================================================
// TESTS
// =============================================================================
