//! Cancellable per-frame animation.
//!
//! A running loop is represented by a handle whose `Drop` cancels the
//! scheduled frame (the web layer wraps `gloo::render::AnimationFrame`).
//! [`AnimationSlot`] owns at most one such handle per surface, so starting
//! a loop always replaces the previous one instead of running beside it.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::clock::ParameterClock;
use crate::curve::{CurveFrame, CurveShape, HeartVariant, Viewport};

/// Single-owner home for a live loop handle.
#[derive(Debug)]
pub struct AnimationSlot<H> {
    live: Option<H>,
    starts: u64,
}

impl<H> Default for AnimationSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> AnimationSlot<H> {
    pub const fn new() -> Self {
        Self {
            live: None,
            starts: 0,
        }
    }

    /// Cancels any live loop, then installs the one built by `spawn`.
    pub fn start(&mut self, spawn: impl FnOnce() -> H) {
        self.stop();
        self.live = Some(spawn());
        self.starts += 1;
    }

    /// Cancels the live loop. Returns `false` when nothing was running.
    pub fn stop(&mut self) -> bool {
        self.live.take().is_some()
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Number of loops started through this slot over its lifetime.
    pub fn starts(&self) -> u64 {
        self.starts
    }
}

/// Per-frame state of the heart equation scene.
///
/// Each call to [`HeartAnimation::frame`] reads `h` from the clock, advances
/// the clock and evaluates the active shape.
pub struct HeartAnimation {
    variant: HeartVariant,
    clock: ParameterClock,
    rng: SmallRng,
}

impl HeartAnimation {
    pub fn new(variant: HeartVariant, seed: u64) -> Self {
        Self {
            variant,
            clock: variant.clock(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn variant(&self) -> HeartVariant {
        self.variant
    }

    /// `h` the next frame will be drawn with.
    pub fn h(&self) -> f64 {
        self.clock.current()
    }

    pub fn clock(&self) -> &ParameterClock {
        &self.clock
    }

    /// Evaluates the next frame. A surface without area is a no-op frame:
    /// nothing is drawn and the clock does not move.
    pub fn frame(&mut self, view: &Viewport) -> Option<CurveFrame> {
        if view.is_degenerate() {
            return None;
        }
        let h = self.clock.tick();
        self.variant.evaluate(h, view, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Probe(Rc<Cell<i32>>);

    impl Probe {
        fn new(live: &Rc<Cell<i32>>) -> Self {
            live.set(live.get() + 1);
            Self(Rc::clone(live))
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    #[test]
    fn stop_twice_is_a_no_op() {
        let live = Rc::new(Cell::new(0));
        let mut slot = AnimationSlot::new();
        slot.start(|| Probe::new(&live));
        assert!(slot.stop());
        assert!(!slot.stop());
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn restart_never_duplicates_the_loop() {
        let live = Rc::new(Cell::new(0));
        let mut slot = AnimationSlot::new();
        slot.start(|| Probe::new(&live));
        slot.start(|| Probe::new(&live));
        assert_eq!(live.get(), 1);
        slot.stop();
        slot.start(|| Probe::new(&live));
        assert_eq!(live.get(), 1);
        assert_eq!(slot.starts(), 3);
    }

    #[test]
    fn old_loop_is_cancelled_before_the_new_one_spawns() {
        let live = Rc::new(Cell::new(0));
        let mut slot = AnimationSlot::new();
        slot.start(|| Probe::new(&live));
        let seen = Rc::clone(&live);
        slot.start(|| {
            assert_eq!(seen.get(), 0);
            Probe::new(&seen)
        });
        assert!(slot.is_live());
    }

    #[test]
    fn degenerate_frames_hold_the_clock() {
        let mut anim = HeartAnimation::new(HeartVariant::Implicit, 3);
        let empty = Viewport::new(0.0, 0.0, 1.0);
        assert!(anim.frame(&empty).is_none());
        assert_eq!(anim.h(), 2.25);

        let view = Viewport::new(320.0, 240.0, 1.0);
        let frame = anim.frame(&view).unwrap();
        assert_eq!(frame.h, 2.25);
        assert!(anim.h() != 2.25);
    }

    #[test]
    fn parametric_animation_bounces() {
        let mut anim = HeartAnimation::new(HeartVariant::Parametric, 3);
        let view = Viewport::new(200.0, 200.0, 1.0);
        let hs: Vec<f64> = (0..150).filter_map(|_| anim.frame(&view)).map(|f| f.h).collect();
        assert!(hs.iter().all(|h| (0.0..=1.0).contains(h)));
        assert_eq!(hs.iter().cloned().fold(f64::MIN, f64::max), 1.0);
        assert_eq!(anim.clock().is_increasing(), Some(false));
    }
}
