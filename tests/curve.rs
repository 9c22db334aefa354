use std::f64::consts::PI;

use greeting_wasm::clock::ParameterClock;
use greeting_wasm::curve::{
    implicit_y, Branch, CurveShape, HeartVariant, ImplicitHeart, ParametricHeart, Viewport,
    PARAMETRIC_H_MAX, PARAMETRIC_H_MIN, PARAMETRIC_H_STEP,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn branches_differ_by_twice_the_oscillation() {
    for &h in &[0.5, 1.0, 2.25, 3.7] {
        for i in -22..=22 {
            let x = f64::from(i) / 10.0;
            let upper = implicit_y(x, h, Branch::Upper).unwrap();
            let lower = implicit_y(x, h, Branch::Lower).unwrap();
            let expected = 2.0 * (5.0 - x * x).sqrt() * (h * PI * x).sin();
            assert!((upper - lower - expected).abs() < 1e-9, "x={x} h={h}");
        }
    }
}

#[test]
fn origin_is_on_both_branches() {
    assert_eq!(implicit_y(0.0, 2.25, Branch::Upper), Some(0.0));
    assert_eq!(implicit_y(0.0, 2.25, Branch::Lower), Some(0.0));
}

#[test]
fn known_sample_at_x_one() {
    let y = implicit_y(1.0, 2.25, Branch::Upper).unwrap();
    assert!((y - (1.0 + 2.0 * (2.25 * PI).sin())).abs() < 1e-12);
}

#[test]
fn ping_pong_stays_in_bounds_and_reverses_at_them() {
    let mut clock = ParameterClock::ping_pong(PARAMETRIC_H_MIN, PARAMETRIC_H_MAX, PARAMETRIC_H_STEP);
    let mut previous = clock.tick();
    let mut reversals = 0;
    let mut rising = true;
    for _ in 0..1000 {
        let h = clock.tick();
        assert!((PARAMETRIC_H_MIN..=PARAMETRIC_H_MAX).contains(&h));
        let now_rising = h > previous;
        if now_rising != rising {
            // only turn around at a bound
            assert!(
                (previous - PARAMETRIC_H_MAX).abs() < 1e-9 || (previous - PARAMETRIC_H_MIN).abs() < 1e-9,
                "reversed at {previous}"
            );
            reversals += 1;
            rising = now_rising;
        }
        previous = h;
    }
    assert!(reversals >= 8);
}

#[test]
fn degenerate_surface_draws_nothing() {
    let mut rng = SmallRng::seed_from_u64(1);
    let empty = Viewport::new(0.0, 300.0, 2.0);
    assert!(ImplicitHeart.evaluate(2.0, &empty, &mut rng).is_none());
    assert!(ParametricHeart.evaluate(0.5, &empty, &mut rng).is_none());
}

#[test]
fn both_variants_trace_inside_the_surface() {
    let mut rng = SmallRng::seed_from_u64(3);
    let view = Viewport::new(400.0, 300.0, 1.0);
    for (variant, h) in [(HeartVariant::Implicit, 3.5), (HeartVariant::Parametric, 0.8)] {
        let frame = variant.evaluate(h, &view, &mut rng).unwrap();
        assert!(!frame.paths.is_empty());
        for p in frame.paths.iter().flat_map(|path| &path.points) {
            assert!((0.0..=view.width).contains(&p.x), "{variant:?} x={}", p.x);
        }
    }
}
