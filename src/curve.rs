//! Heart curve evaluation.
//!
//! Two shapes are supported behind [`CurveShape`]:
//!
//! * [`ImplicitHeart`] traces `|x|^(2/3) ± sqrt(5 - x²)·sin(hπx)` as two open
//!   branches over `x ∈ [-√5, √5]`, one sample per horizontal CSS pixel.
//! * [`ParametricHeart`] traces the classic `16·sin³t` heart as one closed
//!   path whose size follows `h`.
//!
//! Evaluation is pure: a frame is plain data (paths, stroke style, sparkles)
//! that the web layer strokes onto a canvas.

use std::f64::consts::{PI, TAU};

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::clock::ParameterClock;
use crate::palette::Hsl;

/// Radicand constant of the implicit heart; the curve is real for `x² <= 5`.
pub const IMPLICIT_RADICAND: f64 = 5.0;

pub const IMPLICIT_H_BASE: f64 = 2.25;
pub const IMPLICIT_H_AMPLITUDE: f64 = 1.75;
pub const IMPLICIT_BREATHING_SPEED: f64 = 0.5;
pub const IMPLICIT_TIME_STEP: f64 = 0.02;
/// Sparkles appear once `h` rises past this.
pub const IMPLICIT_SPARKLE_THRESHOLD: f64 = 2.5;

pub const PARAMETRIC_H_MIN: f64 = 0.0;
pub const PARAMETRIC_H_MAX: f64 = 1.0;
pub const PARAMETRIC_H_STEP: f64 = 0.01;
pub const PARAMETRIC_T_STEP: f64 = 0.02;
pub const PARAMETRIC_SPARKLE_THRESHOLD: f64 = 0.6;

const HUE_BASE: f64 = 330.0;
const HUE_SHIFT: f64 = 20.0;
const LIGHTNESS_BASE: f64 = 55.0;
const LIGHTNESS_SHIFT: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Drawing surface size in CSS pixels plus the device pixel ratio used to
/// size the backing store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// A surface that has not been laid out yet has no usable area.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Backing store size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).max(0.0).round() as u32,
            (self.height * self.pixel_ratio).max(0.0).round() as u32,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    Upper,
    Lower,
}

/// `|x|^(2/3) ± sqrt(5 - x²)·sin(hπx)`, or `None` where the radicand is
/// negative.
pub fn implicit_y(x: f64, h: f64, branch: Branch) -> Option<f64> {
    let inner = IMPLICIT_RADICAND - x * x;
    if inner < 0.0 {
        return None;
    }
    let core = x.abs().powf(2.0 / 3.0);
    let oscillation = inner.sqrt() * (h * PI * x).sin();
    Some(match branch {
        Branch::Upper => core + oscillation,
        Branch::Lower => core - oscillation,
    })
}

/// `(16·sin³t, -(13cos t - 5cos 2t - 2cos 3t - cos 4t))` in curve units,
/// y pointing down.
pub fn parametric_point(t: f64) -> Point2 {
    let x = 16.0 * t.sin().powi(3);
    let y = -(13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
    Point2::new(x, y)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub points: Vec<Point2>,
    pub closed: bool,
}

/// Radial glow painted behind the curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Halo {
    pub radius: f64,
    pub inner_alpha: f64,
    pub mid_alpha: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveStyle {
    pub color: Hsl,
    pub line_width: f64,
    pub glow: f64,
    pub halo: Halo,
    /// Whether the backdrop carries the graph-paper grid and axes.
    pub grid: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sparkle {
    pub center: Point2,
    pub radius: f64,
    pub alpha: f64,
}

/// Everything needed to draw one frame of the heart.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveFrame {
    pub h: f64,
    pub paths: Vec<Path>,
    pub style: CurveStyle,
    pub sparkles: Vec<Sparkle>,
}

pub trait CurveShape {
    /// Update law this shape animates `h` with.
    fn clock(&self) -> ParameterClock;

    fn trace(&self, h: f64, view: &Viewport) -> Vec<Path>;

    fn style(&self, h: f64, view: &Viewport) -> CurveStyle;

    fn sparkles(&self, h: f64, view: &Viewport, rng: &mut dyn RngCore) -> Vec<Sparkle>;

    /// Evaluates a full frame, or `None` for a surface without area.
    fn evaluate(&self, h: f64, view: &Viewport, rng: &mut dyn RngCore) -> Option<CurveFrame> {
        if view.is_degenerate() {
            return None;
        }
        Some(CurveFrame {
            h,
            paths: self.trace(h, view),
            style: self.style(h, view),
            sparkles: self.sparkles(h, view, rng),
        })
    }
}

fn scatter(
    count: usize,
    center: Point2,
    radius: (f64, f64),
    rng: &mut dyn RngCore,
) -> Vec<Sparkle> {
    (0..count)
        .map(|_| {
            let angle = rng.gen::<f64>() * TAU;
            let distance = radius.0 + rng.gen::<f64>() * (radius.1 - radius.0);
            Sparkle {
                center: Point2::new(
                    center.x + angle.cos() * distance,
                    center.y + angle.sin() * distance,
                ),
                radius: 2.0 + rng.gen::<f64>() * 2.0,
                alpha: 0.5 + rng.gen::<f64>() * 0.5,
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImplicitHeart;

impl ImplicitHeart {
    pub const H_MIN: f64 = IMPLICIT_H_BASE - IMPLICIT_H_AMPLITUDE;
    pub const H_MAX: f64 = IMPLICIT_H_BASE + IMPLICIT_H_AMPLITUDE;

    /// CSS pixels per curve unit.
    pub fn scale(view: &Viewport) -> f64 {
        view.min_side() / 6.0
    }

    fn branch(&self, h: f64, view: &Viewport, branch: Branch) -> Path {
        let center = view.center();
        let scale = Self::scale(view);
        let domain = IMPLICIT_RADICAND.sqrt();
        let columns = view.width.floor() as usize;
        let points = (0..=columns)
            .filter_map(|px| {
                let px = px as f64;
                let x = (px - center.x) / scale;
                if x.abs() > domain {
                    return None;
                }
                let y = implicit_y(x, h, branch)?;
                Some(Point2::new(px, center.y - y * scale))
            })
            .collect();
        Path {
            points,
            closed: false,
        }
    }
}

impl CurveShape for ImplicitHeart {
    fn clock(&self) -> ParameterClock {
        ParameterClock::breathing(
            IMPLICIT_H_BASE,
            IMPLICIT_H_AMPLITUDE,
            IMPLICIT_BREATHING_SPEED,
            IMPLICIT_TIME_STEP,
        )
    }

    fn trace(&self, h: f64, view: &Viewport) -> Vec<Path> {
        vec![
            self.branch(h, view, Branch::Upper),
            self.branch(h, view, Branch::Lower),
        ]
    }

    fn style(&self, h: f64, view: &Viewport) -> CurveStyle {
        let lift = h - Self::H_MIN;
        let k = (lift / (Self::H_MAX - Self::H_MIN)).clamp(0.0, 1.0);
        CurveStyle {
            color: Hsl::new(
                HUE_BASE + k * HUE_SHIFT,
                100.0,
                LIGHTNESS_BASE + k * LIGHTNESS_SHIFT,
            ),
            line_width: 2.0 + lift * 0.5,
            glow: 10.0 + lift * 8.0,
            halo: Halo {
                radius: Self::scale(view) * 2.0,
                inner_alpha: 0.1 + lift * 0.05,
                mid_alpha: 0.05 + lift * 0.03,
            },
            grid: true,
        }
    }

    fn sparkles(&self, h: f64, view: &Viewport, rng: &mut dyn RngCore) -> Vec<Sparkle> {
        if h <= IMPLICIT_SPARKLE_THRESHOLD {
            return Vec::new();
        }
        let count = ((h - IMPLICIT_SPARKLE_THRESHOLD) * 5.0).floor() as usize;
        let scale = Self::scale(view);
        scatter(count, view.center(), (scale * 0.8, scale * 2.0), rng)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParametricHeart;

impl ParametricHeart {
    /// Vertical midpoint of the curve in curve units.
    const Y_MID: f64 = 2.5;

    /// CSS pixels per curve unit at parameter `h`.
    pub fn unit(h: f64, view: &Viewport) -> f64 {
        view.min_side() / 40.0 * (0.9 + 0.2 * h)
    }
}

impl CurveShape for ParametricHeart {
    fn clock(&self) -> ParameterClock {
        ParameterClock::ping_pong(PARAMETRIC_H_MIN, PARAMETRIC_H_MAX, PARAMETRIC_H_STEP)
    }

    fn trace(&self, h: f64, view: &Viewport) -> Vec<Path> {
        let center = view.center();
        let unit = Self::unit(h, view);
        let steps = (TAU / PARAMETRIC_T_STEP).ceil() as usize;
        let points = (0..=steps)
            .map(|i| {
                let t = (i as f64 * PARAMETRIC_T_STEP).min(TAU);
                let p = parametric_point(t);
                Point2::new(center.x + p.x * unit, center.y + (p.y - Self::Y_MID) * unit)
            })
            .collect();
        vec![Path {
            points,
            closed: true,
        }]
    }

    fn style(&self, h: f64, view: &Viewport) -> CurveStyle {
        let k = h.clamp(PARAMETRIC_H_MIN, PARAMETRIC_H_MAX);
        CurveStyle {
            color: Hsl::new(
                HUE_BASE + k * HUE_SHIFT,
                100.0,
                LIGHTNESS_BASE + k * LIGHTNESS_SHIFT,
            ),
            line_width: 2.0 + 2.0 * k,
            glow: 10.0 + 20.0 * k,
            halo: Halo {
                radius: Self::unit(h, view) * 20.0,
                inner_alpha: 0.1 + 0.15 * k,
                mid_alpha: 0.05 + 0.1 * k,
            },
            grid: false,
        }
    }

    fn sparkles(&self, h: f64, view: &Viewport, rng: &mut dyn RngCore) -> Vec<Sparkle> {
        if h <= PARAMETRIC_SPARKLE_THRESHOLD {
            return Vec::new();
        }
        let count = ((h - PARAMETRIC_SPARKLE_THRESHOLD) * 15.0).floor() as usize;
        let reach = Self::unit(h, view) * 16.0;
        scatter(count, view.center(), (reach, reach * 1.4), rng)
    }
}

/// Which heart the equation scene animates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeartVariant {
    #[default]
    Implicit,
    Parametric,
}

impl CurveShape for HeartVariant {
    fn clock(&self) -> ParameterClock {
        match self {
            Self::Implicit => ImplicitHeart.clock(),
            Self::Parametric => ParametricHeart.clock(),
        }
    }

    fn trace(&self, h: f64, view: &Viewport) -> Vec<Path> {
        match self {
            Self::Implicit => ImplicitHeart.trace(h, view),
            Self::Parametric => ParametricHeart.trace(h, view),
        }
    }

    fn style(&self, h: f64, view: &Viewport) -> CurveStyle {
        match self {
            Self::Implicit => ImplicitHeart.style(h, view),
            Self::Parametric => ParametricHeart.style(h, view),
        }
    }

    fn sparkles(&self, h: f64, view: &Viewport, rng: &mut dyn RngCore) -> Vec<Sparkle> {
        match self {
            Self::Implicit => ImplicitHeart.sparkles(h, view, rng),
            Self::Parametric => ParametricHeart.sparkles(h, view, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn implicit_is_undefined_outside_the_radicand() {
        assert!(implicit_y(2.3, 2.25, Branch::Upper).is_none());
        assert!(implicit_y(-2.3, 2.25, Branch::Lower).is_none());
        assert!(implicit_y(2.236, 2.25, Branch::Upper).is_some());
    }

    #[test]
    fn branches_meet_at_the_domain_edge() {
        let edge = 2.236_067_9;
        let upper = implicit_y(edge, 3.0, Branch::Upper).unwrap();
        let lower = implicit_y(edge, 3.0, Branch::Lower).unwrap();
        assert!((upper - lower).abs() < 2e-3);
    }

    #[test]
    fn parametric_top_and_tip() {
        let tip = parametric_point(PI);
        assert!(tip.x.abs() < 1e-9);
        assert!((tip.y - 17.0).abs() < 1e-9);
        let notch = parametric_point(0.0);
        assert!((notch.y + 5.0).abs() < 1e-9);
    }

    #[test]
    fn implicit_trace_stays_inside_the_domain_columns() {
        let view = Viewport::new(600.0, 300.0, 1.0);
        let scale = ImplicitHeart::scale(&view);
        let paths = ImplicitHeart.trace(2.25, &view);
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert!(!path.closed);
            assert!(!path.points.is_empty());
            for p in &path.points {
                let x = (p.x - view.center().x) / scale;
                assert!(x.abs() <= IMPLICIT_RADICAND.sqrt());
            }
        }
    }

    #[test]
    fn parametric_trace_is_closed_and_grows_with_h() {
        let view = Viewport::new(400.0, 400.0, 2.0);
        let small = &ParametricHeart.trace(0.0, &view)[0];
        let large = &ParametricHeart.trace(1.0, &view)[0];
        assert!(small.closed);
        let width = |p: &Path| {
            let xs = p.points.iter().map(|p| p.x);
            xs.clone().fold(f64::MIN, f64::max) - xs.fold(f64::MAX, f64::min)
        };
        assert!(width(large) > width(small));
    }

    #[test]
    fn intensity_rises_with_h() {
        let view = Viewport::new(300.0, 300.0, 1.0);
        let low = ImplicitHeart.style(0.5, &view);
        let high = ImplicitHeart.style(4.0, &view);
        assert!(high.line_width > low.line_width);
        assert!(high.glow > low.glow);
        assert!(high.halo.inner_alpha > low.halo.inner_alpha);
        assert_eq!(low.color, Hsl::new(330.0, 100.0, 55.0));
        assert_eq!(high.color, Hsl::new(350.0, 100.0, 65.0));
    }

    #[test]
    fn sparkles_only_above_threshold() {
        let view = Viewport::new(300.0, 300.0, 1.0);
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(ImplicitHeart.sparkles(2.5, &view, &mut rng).is_empty());
        assert_eq!(ImplicitHeart.sparkles(4.0, &view, &mut rng).len(), 7);
        assert!(ParametricHeart.sparkles(0.5, &view, &mut rng).is_empty());
        assert_eq!(ParametricHeart.sparkles(1.0, &view, &mut rng).len(), 6);
    }

    #[test]
    fn degenerate_view_yields_no_frame() {
        let mut rng = SmallRng::seed_from_u64(1);
        let empty = Viewport::new(0.0, 240.0, 1.0);
        assert!(HeartVariant::Implicit.evaluate(2.25, &empty, &mut rng).is_none());
        assert!(HeartVariant::Parametric.evaluate(0.5, &empty, &mut rng).is_none());
        let nan = Viewport::new(f64::NAN, 10.0, 1.0);
        assert!(nan.is_degenerate());
    }

    #[test]
    fn variant_parses_from_lowercase() {
        let v: HeartVariant = serde_json::from_str("\"parametric\"").unwrap();
        assert_eq!(v, HeartVariant::Parametric);
        assert_eq!(HeartVariant::default(), HeartVariant::Implicit);
    }

    #[test]
    fn viewport_backing_size_follows_pixel_ratio() {
        assert_eq!(Viewport::new(300.0, 150.0, 2.0).backing_size(), (600, 300));
        assert_eq!(Viewport::new(300.0, 150.0, 0.0).pixel_ratio, 1.0);
    }
}
