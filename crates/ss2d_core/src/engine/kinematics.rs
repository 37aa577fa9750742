//! Decaying-motion kinematics
//!
//! Pure functions over position, velocity and per-cycle decay. Everything here
//! is deterministic and free of world state so callers can use it inside
//! search loops.

use super::geom::{asin_deg, AngleDeg, Vec2};
use crate::models::world::GameModeType;

/// Number of cycles covered by a dash distance table.
pub const DASH_TABLE_LEN: usize = 50;

const DECAY_EPS: f64 = 1.0e-9;

/// Position after `n` cycles of motion with velocity decaying by `decay` per cycle.
///
/// Closed form of `pos + Σ_{i<n} vel·decay^i`.
pub fn step_point(pos: Vec2, vel: Vec2, decay: f64, n: u32) -> Vec2 {
    if n == 0 {
        return pos;
    }
    let factor = if (1.0 - decay).abs() < DECAY_EPS {
        n as f64
    } else {
        (1.0 - decay.powi(n as i32)) / (1.0 - decay)
    };
    pos + vel * factor
}

/// Total displacement once the velocity has fully decayed.
pub fn final_travel(vel: Vec2, decay: f64) -> Vec2 {
    vel / (1.0 - decay)
}

/// Resting point of a decaying object.
pub fn final_point(pos: Vec2, vel: Vec2, decay: f64) -> Vec2 {
    pos + final_travel(vel, decay)
}

/// First term of a geometric series from its sum, ratio and length.
pub fn first_term_of_geom_series(sum: f64, ratio: f64, len: u32) -> f64 {
    if len == 0 {
        return 0.0;
    }
    if (1.0 - ratio).abs() < DECAY_EPS {
        return sum / len as f64;
    }
    sum * (1.0 - ratio) / (1.0 - ratio.powi(len as i32))
}

/// First term of a geometric series whose last term and sum are known.
///
/// Answers "how fast must the ball leave so it still moves at `last_term`
/// after covering `sum`".
pub fn first_term_of_geom_series_last(last_term: f64, sum: f64, ratio: f64) -> f64 {
    if last_term.abs() <= 0.001 {
        return sum * (1.0 - ratio);
    }
    if ratio <= 0.0 {
        return last_term;
    }
    let inverse = 1.0 / ratio;
    let tmp = 1.0 + sum * (inverse - 1.0) / last_term;
    if tmp < 0.001 || (inverse - 1.0).abs() < DECAY_EPS {
        return last_term;
    }
    last_term * inverse.powf(tmp.ln() / inverse.ln())
}

/// Length of a geometric series, or `None` when no length reaches `sum`.
pub fn length_of_geom_series(first_term: f64, sum: f64, ratio: f64) -> Option<f64> {
    if first_term <= 1.0e-5 || sum < 0.0 || ratio < 0.0 {
        return None;
    }
    if sum <= 1.0e-5 {
        return Some(0.0);
    }
    if (1.0 - ratio).abs() < DECAY_EPS {
        return Some(sum / first_term);
    }
    let tmp = 1.0 + sum * (ratio - 1.0) / first_term;
    if tmp <= 1.0e-5 {
        return None;
    }
    Some(tmp.ln() / ratio.ln())
}

/// Cycles a ball kicked at `first_speed` needs to cover `dist`.
pub fn ball_move_steps(first_speed: f64, dist: f64, decay: f64) -> Option<u32> {
    length_of_geom_series(first_speed, dist, decay).map(|len| (len - 1.0e-9).ceil().max(0.0) as u32)
}

/// Kick speed that covers `dist` in exactly `steps` cycles.
pub fn first_ball_speed(dist: f64, steps: u32, decay: f64) -> f64 {
    first_term_of_geom_series(dist, decay, steps)
}

/// Kicks needed to accelerate the ball to `speed`. Restarts always use one.
pub fn predict_kick_count(mode: GameModeType, speed: f64) -> u32 {
    if mode != GameModeType::PlayOn && !mode.is_penalty_kick_mode() {
        return 1;
    }
    if speed > 2.5 {
        3
    } else if speed > 1.5 {
        2
    } else {
        1
    }
}

/// Dash power that keeps a player moving at `speed`.
pub fn dash_power_to_keep_speed(speed: f64, decay: f64, dash_power_rate: f64, effort: f64) -> f64 {
    let rate = dash_power_rate * effort;
    if rate <= 0.0 {
        return 0.0;
    }
    speed * (1.0 - decay) / rate
}

/// Angle a player can turn this cycle at `speed`.
pub fn effective_turn(max_moment: f64, speed: f64, inertia_moment: f64) -> f64 {
    max_moment / (1.0 + inertia_moment * speed)
}

/// Turn cost model for one actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnModel {
    pub max_moment: f64,
    pub inertia_moment: f64,
    pub decay: f64,
}

impl TurnModel {
    /// Cycles spent turning before the body points close enough to the target.
    ///
    /// The tolerated angle is `max(15°, asin(dist_thr / target_dist))`; any
    /// heading works when the target is already inside `dist_thr`.
    pub fn turn_cycles(&self, speed: f64, angle_diff: f64, dist_thr: f64, target_dist: f64) -> u32 {
        let margin = if dist_thr < target_dist {
            asin_deg(dist_thr / target_dist).max(15.0)
        } else {
            180.0
        };
        let mut remaining = angle_diff.abs();
        let mut speed = speed;
        let mut cycles = 0;
        while remaining > margin && cycles < 100 {
            let turn = effective_turn(self.max_moment, speed, self.inertia_moment);
            if turn <= DECAY_EPS {
                break;
            }
            remaining -= turn;
            speed *= self.decay;
            cycles += 1;
        }
        cycles
    }
}

/// Fold a turn onto a back dash when backing up is cheaper than turning around.
pub fn back_dash_angle(angle_diff: f64, target_dist: f64, min_dash_power: f64, max_dash_power: f64) -> f64 {
    let diff = angle_diff.abs();
    if target_dist < 5.0 && diff > 90.0 && min_dash_power < -max_dash_power + 1.0 {
        (diff - 180.0).abs()
    } else {
        diff
    }
}

/// Cumulative distance covered by full-power dashes from a standstill.
#[derive(Debug, Clone, PartialEq)]
pub struct DashDistanceTable {
    distances: Vec<f64>,
    real_speed_max: f64,
}

impl DashDistanceTable {
    pub fn build(accel_max: f64, speed_max: f64, decay: f64, real_speed_max: f64) -> Self {
        let mut distances = Vec::with_capacity(DASH_TABLE_LEN);
        let mut speed = 0.0;
        let mut dist = 0.0;
        for _ in 0..DASH_TABLE_LEN {
            let accel = if speed + accel_max > speed_max {
                speed_max - speed
            } else {
                accel_max
            };
            speed += accel;
            dist += speed;
            distances.push(dist);
            speed *= decay;
        }
        Self {
            distances,
            real_speed_max,
        }
    }

    /// Distance covered after `cycles` dashes.
    pub fn distance_after(&self, cycles: usize) -> f64 {
        if cycles == 0 {
            return 0.0;
        }
        match self.distances.get(cycles - 1) {
            Some(d) => *d,
            None => {
                let last = self.distances.last().copied().unwrap_or(0.0);
                last + (cycles - self.distances.len()) as f64 * self.real_speed_max
            }
        }
    }

    /// Dash cycles needed to cover `dist`, extrapolating at top speed past the table.
    pub fn cycles_to_reach(&self, dist: f64) -> u32 {
        if dist <= 0.001 {
            return 0;
        }
        if let Some(i) = self.distances.iter().position(|d| *d >= dist - 0.001) {
            return i as u32 + 1;
        }
        let last = self.distances.last().copied().unwrap_or(0.0);
        if self.real_speed_max <= 0.0 {
            return u32::MAX;
        }
        self.distances.len() as u32 + ((dist - last) / self.real_speed_max).ceil() as u32
    }
}

/// Extra distance an unseen actor may have covered since it was last observed.
pub fn virtual_dash_distance(pos_count: u32, seen_pos_count: u32, real_speed_max: f64) -> f64 {
    let count = pos_count.min(seen_pos_count).min(10);
    let max_speed = real_speed_max * 0.8;
    (0..count)
        .map(|i| {
            let i = i as f64;
            max_speed * (-(i * i) / 15.0).exp()
        })
        .sum()
}

/// Rough lower bound on reach cycles for a ball moving along `ball_dir`.
///
/// Returns `None` when the actor sits behind the ball's start point along its
/// direction of travel.
pub fn estimate_min_reach_cycle(player: Vec2, speed_max: f64, ball_first: Vec2, ball_dir: AngleDeg) -> Option<u32> {
    let rel = (player - ball_first).rotated(-ball_dir.degree());
    if rel.x < -1.0 {
        return None;
    }
    if speed_max <= 0.0 {
        return Some(1);
    }
    Some(((rel.abs_y() / speed_max) as u32).max(1))
}


#[cfg(all(test, feature = "proptest"))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn step_point_zero_is_identity(x in -60.0f64..60.0, y in -40.0f64..40.0,
                                       vx in -3.0f64..3.0, vy in -3.0f64..3.0, decay in 0.1f64..0.99) {
            let p = Vec2::new(x, y);
            prop_assert_eq!(step_point(p, Vec2::new(vx, vy), decay, 0), p);
        }

        #[test]
        fn step_point_approaches_final_point(vx in -3.0f64..3.0, vy in -3.0f64..3.0, decay in 0.1f64..0.9) {
            let vel = Vec2::new(vx, vy);
            let far = step_point(Vec2::ZERO, vel, decay, 200);
            prop_assert!(far.dist(final_point(Vec2::ZERO, vel, decay)) < 1e-6);
        }

        #[test]
        fn dash_cycles_monotonic(d1 in 0.0f64..80.0, extra in 0.0f64..20.0) {
            let table = DashDistanceTable::build(0.6, 1.05, 0.4, 1.0);
            prop_assert!(table.cycles_to_reach(d1) <= table.cycles_to_reach(d1 + extra));
        }
    }
}
