//! Per-frame motion integration
//!
//! Frame-driven, not fixed-timestep: each step advances position by velocity
//! scaled by the frame delta, reflects inelastically at the inset bounds, and
//! jitters the velocity so a fly never settles into a periodic path.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Fly, SessionState};
use crate::consts::*;

/// Advance a single fly by `dt` seconds.
///
/// Order matters: integrate, clamp-and-reflect at the bounds, then perturb
/// and cap the velocity. The position is always inside the inset bounds when
/// this returns.
pub fn step(fly: &mut Fly, rng: &mut Pcg32, dt: f32) {
    fly.pos += fly.vel * dt;

    if fly.pos.x < BOUNDS_X_MIN {
        fly.pos.x = BOUNDS_X_MIN;
        fly.vel.x = -fly.vel.x;
    } else if fly.pos.x > BOUNDS_X_MAX {
        fly.pos.x = BOUNDS_X_MAX;
        fly.vel.x = -fly.vel.x;
    }
    if fly.pos.y < BOUNDS_Y_MIN {
        fly.pos.y = BOUNDS_Y_MIN;
        fly.vel.y = -fly.vel.y;
    } else if fly.pos.y > BOUNDS_Y_MAX {
        fly.pos.y = BOUNDS_Y_MAX;
        fly.vel.y = -fly.vel.y;
    }

    fly.vel.x = (fly.vel.x + rng.random_range(-FLY_JITTER..=FLY_JITTER))
        .clamp(-FLY_MAX_AXIS_SPEED, FLY_MAX_AXIS_SPEED);
    fly.vel.y = (fly.vel.y + rng.random_range(-FLY_JITTER..=FLY_JITTER))
        .clamp(-FLY_MAX_AXIS_SPEED, FLY_MAX_AXIS_SPEED);
}

/// Advance every live fly by `dt` seconds
pub fn integrate(state: &mut SessionState, dt: f32) {
    for fly in state.flies.iter_mut() {
        step(fly, &mut state.rng, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::make_fly;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn in_bounds(fly: &Fly) -> bool {
        (BOUNDS_X_MIN..=BOUNDS_X_MAX).contains(&fly.pos.x)
            && (BOUNDS_Y_MIN..=BOUNDS_Y_MAX).contains(&fly.pos.y)
    }

    #[test]
    fn test_step_reflects_at_lower_bound() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut fly = make_fly(1, &mut rng, 0.0);
        fly.pos.x = BOUNDS_X_MIN + 0.01;
        fly.vel.x = -FLY_MAX_AXIS_SPEED;

        step(&mut fly, &mut rng, 1.0 / 60.0);
        assert_eq!(fly.pos.x, BOUNDS_X_MIN);
        // Reflected away from the edge (jitter is far smaller than the cap)
        assert!(fly.vel.x > 0.0);
    }

    #[test]
    fn test_step_reflects_at_upper_bound() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut fly = make_fly(1, &mut rng, 0.0);
        fly.pos.y = BOUNDS_Y_MAX - 0.01;
        fly.vel.y = FLY_MAX_AXIS_SPEED;

        step(&mut fly, &mut rng, 1.0 / 60.0);
        assert_eq!(fly.pos.y, BOUNDS_Y_MAX);
        assert!(fly.vel.y < 0.0);
    }

    proptest! {
        #[test]
        fn prop_position_stays_in_bounds(seed in any::<u64>(), steps in 1usize..2000) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut fly = make_fly(1, &mut rng, 0.0);
            for _ in 0..steps {
                step(&mut fly, &mut rng, 1.0 / 60.0);
                prop_assert!(in_bounds(&fly));
            }
        }

        #[test]
        fn prop_velocity_never_exceeds_axis_cap(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut fly = make_fly(1, &mut rng, 0.0);
            for _ in 0..500 {
                step(&mut fly, &mut rng, 1.0 / 60.0);
                prop_assert!(fly.vel.x.abs() <= FLY_MAX_AXIS_SPEED);
                prop_assert!(fly.vel.y.abs() <= FLY_MAX_AXIS_SPEED);
            }
        }
    }
}
