//! Highlight style and animation descriptors.
//!
//! These are handed verbatim to the rendering surface. The engine never
//! draws anything itself; it only computes the animation phase and the
//! alpha/scale modulation that goes with it.

use serde::{Deserialize, Serialize};

/// Shape of the cursor highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    #[default]
    Ring,
    Crosshair,
    Spotlight,
}

impl Shape {
    pub fn all() -> &'static [Shape] {
        &[Shape::Circle, Shape::Ring, Shape::Crosshair, Shape::Spotlight]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Shape::Circle => "Filled Circle",
            Shape::Ring => "Ring",
            Shape::Crosshair => "Crosshair",
            Shape::Spotlight => "Spotlight",
        }
    }
}

/// RGBA color with 8-bit channels and a float alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        // Orange
        Self {
            r: 255,
            g: 149,
            b: 0,
            a: 1.0,
        }
    }
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as floats in `[0.0, 1.0]`.
    pub fn to_rgba_f64(&self) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64,
        )
    }
}

/// Border style for ring and crosshair shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Visual descriptor of the highlight shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorStyle {
    pub shape: Shape,
    /// Diameter in logical pixels.
    pub size: f64,
    pub color: Color,
    pub border_weight: f64,
    pub border_style: BorderStyle,
    pub glow_enabled: bool,
    pub glow_intensity: f64,
    pub glow_radius: f64,
}

impl Default for CursorStyle {
    fn default() -> Self {
        Self {
            shape: Shape::Ring,
            size: 60.0,
            color: Color::default(),
            border_weight: 4.0,
            border_style: BorderStyle::Solid,
            glow_enabled: true,
            glow_intensity: 0.5,
            glow_radius: 10.0,
        }
    }
}

/// Animation applied to the highlight while it is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnimationType {
    None,
    #[default]
    Pulse,
    Ripple,
    Fade,
    Scale,
}

impl AnimationType {
    pub fn all() -> &'static [AnimationType] {
        &[
            AnimationType::None,
            AnimationType::Pulse,
            AnimationType::Ripple,
            AnimationType::Fade,
            AnimationType::Scale,
        ]
    }
}

/// Easing curve applied to raw animation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Apply the curve to a progress value in `[0.0, 1.0]`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Animation timing for a highlight session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSpec {
    pub animation_type: AnimationType,
    /// Length of one animation cycle in seconds.
    pub cycle_secs: f64,
    pub easing: Easing,
    /// Number of cycles to play; 0 repeats for the whole session.
    pub repeat_count: u32,
    /// Play every odd cycle backwards.
    pub auto_reverse: bool,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            animation_type: AnimationType::Pulse,
            cycle_secs: 0.8,
            easing: Easing::EaseInOut,
            repeat_count: 3,
            auto_reverse: true,
        }
    }
}

impl AnimationSpec {
    /// Eased animation phase in `[0.0, 1.0]` after `elapsed_secs`.
    pub fn phase(&self, elapsed_secs: f64) -> f64 {
        if self.animation_type == AnimationType::None || self.cycle_secs <= 0.0 {
            return 1.0;
        }

        let elapsed = elapsed_secs.max(0.0);
        let cycle = (elapsed / self.cycle_secs) as u32;
        if self.repeat_count > 0 && cycle >= self.repeat_count {
            return 1.0;
        }

        let raw = (elapsed % self.cycle_secs) / self.cycle_secs;
        let progress = if self.auto_reverse && cycle % 2 == 1 {
            1.0 - raw
        } else {
            raw
        };

        self.easing.apply(progress)
    }

    /// `(alpha, scale)` multipliers for the given phase.
    pub fn modulation(&self, phase: f64) -> (f64, f64) {
        let p = phase.clamp(0.0, 1.0);
        match self.animation_type {
            AnimationType::None => (1.0, 1.0),
            AnimationType::Pulse => (0.3 + 0.7 * (1.0 - p), 1.0),
            AnimationType::Fade => (1.0 - p * 0.7, 1.0),
            AnimationType::Scale => (1.0, 0.8 + 0.4 * (1.0 - p)),
            AnimationType::Ripple => (1.0 - p, 1.0 + p * 0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert!((easing.apply(0.0)).abs() < 1e-9);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_phase_auto_reverse() {
        let spec = AnimationSpec {
            easing: Easing::Linear,
            cycle_secs: 1.0,
            repeat_count: 0,
            ..Default::default()
        };
        assert!((spec.phase(0.25) - 0.25).abs() < 1e-9);
        assert!((spec.phase(1.25) - 0.75).abs() < 1e-9);
        assert!((spec.phase(2.25) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_phase_settles_after_repeat_count() {
        let spec = AnimationSpec::default();
        assert_eq!(spec.phase(spec.cycle_secs * 3.0 + 0.1), 1.0);
    }

    #[test]
    fn test_phase_without_animation() {
        let spec = AnimationSpec {
            animation_type: AnimationType::None,
            ..Default::default()
        };
        assert_eq!(spec.phase(0.3), 1.0);
        assert_eq!(spec.modulation(0.3), (1.0, 1.0));
    }

    #[test]
    fn test_style_serde_defaults_fill_missing_fields() {
        let style: CursorStyle = serde_json::from_str(r#"{"shape":"crosshair","size":80.0}"#)
            .expect("partial style should deserialize");
        assert_eq!(style.shape, Shape::Crosshair);
        assert_eq!(style.size, 80.0);
        assert_eq!(style.color, Color::default());
    }

    proptest! {
        #[test]
        fn phase_stays_in_unit_range(elapsed in 0.0f64..60.0, cycle in 0.05f64..3.0, repeat in 0u32..5) {
            let spec = AnimationSpec { cycle_secs: cycle, repeat_count: repeat, ..Default::default() };
            let phase = spec.phase(elapsed);
            prop_assert!((0.0..=1.0).contains(&phase));
            let (alpha, scale) = spec.modulation(phase);
            prop_assert!(alpha >= 0.0 && alpha <= 1.0);
            prop_assert!(scale > 0.0);
        }
    }
}
