//! Particle fields: ambient dust, finale confetti and the candle blow burst.
//!
//! Each field owns its bodies and its RNG and advances one fixed frame per
//! [`Simulation::step`]. Dust and confetti recycle bodies by wrapping them
//! back to the far edge; burst bodies expire after a fixed lifetime.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::curve::Point2;
use crate::palette;

pub const CONFETTI_SPAWN_Y: f64 = -20.0;
/// One second at the assumed 60 frames per second.
pub const BURST_LIFETIME_FRAMES: u32 = 60;

pub trait Simulation {
    type Body;

    fn step(&mut self);

    fn bodies(&self) -> &[Self::Body];

    /// New surface size in CSS pixels.
    fn resize(&mut self, width: f64, height: f64);
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dust {
    pub pos: Point2,
    pub size: f64,
    pub rise: f64,
    pub drift: f64,
    pub opacity: f64,
    pub color: &'static str,
}

/// Slow upward drift behind every scene.
pub struct DustField {
    width: f64,
    height: f64,
    bodies: Vec<Dust>,
    rng: SmallRng,
}

impl DustField {
    pub fn new(count: usize, width: f64, height: f64, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let bodies = (0..count)
            .map(|_| Dust {
                pos: Point2::new(rng.gen::<f64>() * width, rng.gen::<f64>() * height),
                size: rng.gen::<f64>() * 2.0 + 0.5,
                rise: rng.gen::<f64>() * 0.5 + 0.1,
                drift: (rng.gen::<f64>() - 0.5) * 0.3,
                opacity: rng.gen::<f64>() * 0.5 + 0.2,
                color: palette::DUST[usize::from(rng.gen::<bool>())],
            })
            .collect();
        Self {
            width,
            height,
            bodies,
            rng,
        }
    }
}

impl Simulation for DustField {
    type Body = Dust;

    fn step(&mut self) {
        for dust in &mut self.bodies {
            dust.pos.y -= dust.rise;
            dust.pos.x += dust.drift;
            if dust.pos.y < 0.0 {
                dust.pos.y = self.height;
                dust.pos.x = self.rng.gen::<f64>() * self.width;
            }
        }
    }

    fn bodies(&self) -> &[Dust] {
        &self.bodies
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfettiShape {
    Strip,
    Disc,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Confetti {
    pub pos: Point2,
    pub size: f64,
    pub fall: f64,
    pub drift: f64,
    /// Degrees.
    pub rotation: f64,
    pub spin: f64,
    pub color: &'static str,
    pub shape: ConfettiShape,
}

pub struct ConfettiField {
    width: f64,
    height: f64,
    bodies: Vec<Confetti>,
    rng: SmallRng,
}

impl ConfettiField {
    pub fn new(count: usize, width: f64, height: f64, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let bodies = (0..count)
            .map(|_| Confetti {
                pos: Point2::new(rng.gen::<f64>() * width, CONFETTI_SPAWN_Y),
                size: rng.gen::<f64>() * 10.0 + 5.0,
                fall: rng.gen::<f64>() * 3.0 + 2.0,
                drift: (rng.gen::<f64>() - 0.5) * 4.0,
                rotation: rng.gen::<f64>() * 360.0,
                spin: (rng.gen::<f64>() - 0.5) * 10.0,
                color: palette::CONFETTI[rng.gen_range(0..palette::CONFETTI.len())],
                shape: if rng.gen::<bool>() {
                    ConfettiShape::Strip
                } else {
                    ConfettiShape::Disc
                },
            })
            .collect();
        Self {
            width,
            height,
            bodies,
            rng,
        }
    }
}

impl Simulation for ConfettiField {
    type Body = Confetti;

    fn step(&mut self) {
        for piece in &mut self.bodies {
            piece.pos.y += piece.fall;
            piece.pos.x += piece.drift;
            piece.rotation += piece.spin;
            if piece.pos.y > self.height {
                piece.pos.y = CONFETTI_SPAWN_Y;
                piece.pos.x = self.rng.gen::<f64>() * self.width;
            }
        }
    }

    fn bodies(&self) -> &[Confetti] {
        &self.bodies
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ember {
    /// Final displacement from the burst origin.
    pub target: Point2,
    pub age: u32,
    pub color: &'static str,
}

impl Ember {
    pub const RADIUS: f64 = 4.0;

    /// Eased-out progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let t = (f64::from(self.age) / f64::from(BURST_LIFETIME_FRAMES)).min(1.0);
        1.0 - (1.0 - t).powi(3)
    }

    pub fn position(&self, origin: Point2) -> Point2 {
        let p = self.progress();
        Point2::new(origin.x + self.target.x * p, origin.y + self.target.y * p)
    }

    pub fn opacity(&self) -> f64 {
        1.0 - self.progress()
    }

    pub fn scale(&self) -> f64 {
        1.0 - 0.5 * self.progress()
    }
}

/// One-shot puff of embers when the candles are blown out.
pub struct BlowBurst {
    origin: Point2,
    bodies: Vec<Ember>,
}

impl BlowBurst {
    pub fn new(count: usize, width: f64, height: f64, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let bodies = (0..count)
            .map(|_| {
                let spread = rng.gen::<f64>();
                let lift = rng.gen::<f64>();
                Ember {
                    target: Point2::new((spread - 0.5) * 200.0, -lift * 200.0 - 50.0),
                    age: 0,
                    color: palette::BURST[rng.gen_range(0..palette::BURST.len())],
                }
            })
            .collect();
        Self {
            origin: Point2::new(width / 2.0, height / 2.0),
            bodies,
        }
    }

    pub fn origin(&self) -> Point2 {
        self.origin
    }

    pub fn is_spent(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl Simulation for BlowBurst {
    type Body = Ember;

    fn step(&mut self) {
        for ember in &mut self.bodies {
            ember.age += 1;
        }
        self.bodies.retain(|ember| ember.age < BURST_LIFETIME_FRAMES);
    }

    fn bodies(&self) -> &[Ember] {
        &self.bodies
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.origin = Point2::new(width / 2.0, height / 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dust_wraps_to_the_bottom() {
        let mut field = DustField::new(100, 800.0, 600.0, 11);
        for _ in 0..10_000 {
            field.step();
            for dust in field.bodies() {
                assert!(dust.pos.y >= 0.0 && dust.pos.y <= 600.0);
            }
        }
        assert_eq!(field.bodies().len(), 100);
    }

    #[test]
    fn dust_traits_stay_in_range() {
        let field = DustField::new(200, 100.0, 100.0, 5);
        for dust in field.bodies() {
            assert!((0.5..2.5).contains(&dust.size));
            assert!((0.1..0.6).contains(&dust.rise));
            assert!((0.2..0.7).contains(&dust.opacity));
            assert!(palette::DUST.contains(&dust.color));
        }
    }

    #[test]
    fn confetti_recycles_to_the_top() {
        let mut field = ConfettiField::new(150, 400.0, 300.0, 2);
        assert!(field.bodies().iter().all(|c| c.pos.y == CONFETTI_SPAWN_Y));
        for _ in 0..1_000 {
            field.step();
        }
        assert_eq!(field.bodies().len(), 150);
        assert!(field.bodies().iter().all(|c| c.pos.y <= 300.0));
    }

    #[test]
    fn confetti_uses_the_new_height_after_resize() {
        let mut field = ConfettiField::new(20, 400.0, 300.0, 2);
        field.resize(400.0, 50.0);
        for _ in 0..200 {
            field.step();
            assert!(field.bodies().iter().all(|c| c.pos.y <= 50.0));
        }
    }

    #[test]
    fn burst_expires_after_its_lifetime() {
        let mut burst = BlowBurst::new(30, 200.0, 200.0, 9);
        assert_eq!(burst.bodies().len(), 30);
        for _ in 0..BURST_LIFETIME_FRAMES - 1 {
            burst.step();
        }
        assert!(!burst.is_spent());
        burst.step();
        assert!(burst.is_spent());
    }

    #[test]
    fn embers_fly_up_and_fade() {
        let burst = BlowBurst::new(30, 200.0, 200.0, 4);
        for ember in burst.bodies() {
            assert!(ember.target.y <= -50.0 && ember.target.y >= -250.0);
            assert!(ember.target.x.abs() <= 100.0);
        }
        let mut ember = burst.bodies()[0].clone();
        let start = ember.position(burst.origin());
        assert_eq!(start, burst.origin());
        ember.age = BURST_LIFETIME_FRAMES;
        assert_eq!(ember.opacity(), 0.0);
        let end = ember.position(burst.origin());
        assert!(end.y < start.y);
    }
}
