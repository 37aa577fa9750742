//! Strategic home positions
//!
//! A [`PositionStrategy`] answers "where should slot N stand right now".
//! [`StarterStrategy`] maps the predicted ball position linearly into a
//! per-slot rectangle, the simplest formation that still follows the ball.

use super::geom::Vec2;
use super::kinematics::step_point;
use super::reach::InterceptTable;
use crate::models::server_param::ServerParam;
use crate::models::world::{GameModeType, WorldSnapshot};

/// Highest uniform number on a team.
pub const MAX_SLOT: u8 = 11;

/// Formation query used by positioning, blocking and kicker selection.
pub trait PositionStrategy: Send + Sync {
    /// Recompute the formation for the current cycle.
    fn update(&mut self, wm: &WorldSnapshot, sp: &ServerParam, intercept: &InterceptTable);

    /// Home position of `unum` for this cycle.
    fn position(&self, unum: u8) -> Vec2;

    /// Second-lowest home x; defenders do not chase past it.
    fn offside_line(&self) -> f64 {
        let mut xs: Vec<f64> = (1..=MAX_SLOT).map(|u| self.position(u).x).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        xs.get(1).or_else(|| xs.first()).copied().unwrap_or(0.0)
    }
}

/// Area a slot may occupy, as (min_x, max_x, min_y, max_y).
type SlotRect = (f64, f64, f64, f64);

const SLOT_RECTS: [SlotRect; MAX_SLOT as usize] = [
    (-20.0, -10.0, -2.0, 2.0),
    (-22.5, 18.0, -13.0, 2.0),
    (-22.5, 18.0, -2.0, 13.0),
    (-36.0, -5.0, -20.0, -8.0),
    (-38.0, -8.0, -8.0, 8.0),
    (-36.0, -5.0, 8.0, 20.0),
    (-25.0, 20.0, -25.0, -5.0),
    (-20.0, 25.0, -8.0, 8.0),
    (-25.0, 20.0, 5.0, 25.0),
    (-10.0, 35.0, -15.0, 0.0),
    (-10.0, 35.0, 0.0, 15.0),
];

const KICKOFF_LAYOUT: [Vec2; MAX_SLOT as usize] = [
    Vec2::new(-10.0, 0.0),
    Vec2::new(-10.0, -10.0),
    Vec2::new(-10.0, 10.0),
    Vec2::new(-30.0, -12.0),
    Vec2::new(-32.0, 0.0),
    Vec2::new(-30.0, 12.0),
    Vec2::new(-18.0, -22.0),
    Vec2::new(-22.0, 0.0),
    Vec2::new(-18.0, 22.0),
    Vec2::new(-1.0, -14.0),
    Vec2::new(-1.0, 14.0),
];

/// Ball-following rectangle formation.
#[derive(Debug, Clone)]
pub struct StarterStrategy {
    poses: [Vec2; MAX_SLOT as usize],
}

impl Default for StarterStrategy {
    fn default() -> Self {
        Self { poses: KICKOFF_LAYOUT }
    }
}

impl StarterStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ball position the formation should react to: where the first
    /// reacher will meet it in open play and goal kicks, else where it is.
    fn predict_ball_position(wm: &WorldSnapshot, sp: &ServerParam, intercept: &InterceptTable) -> Vec2 {
        let step = match wm.game_mode.kind {
            GameModeType::PlayOn | GameModeType::GoalKick => intercept
                .first_teammate_reach_steps()
                .min(intercept.first_opponent_reach_steps())
                .min(intercept.self_reach_steps())
                .min(1000),
            _ => 0,
        };
        step_point(wm.ball.position, wm.ball.velocity, sp.ball_decay, step)
    }

    fn set_dynamic_positions(&mut self, ball: Vec2, sp: &ServerParam) {
        let nx = (ball.x + sp.pitch_half_length) / (sp.pitch_half_length * 2.0);
        let ny = (ball.y + sp.pitch_half_width) / (sp.pitch_half_width * 2.0);
        for (pose, &(min_x, max_x, min_y, max_y)) in self.poses.iter_mut().zip(SLOT_RECTS.iter()) {
            *pose = Vec2::new((max_x - min_x) * nx + min_x, (max_y - min_y) * ny + min_y);
        }
    }

    fn apply_offside_rule(&mut self, wm: &WorldSnapshot, sp: &ServerParam, intercept: &InterceptTable) {
        if !sp.use_offside {
            return;
        }
        let kickoff_mode = matches!(wm.game_mode.kind, GameModeType::BeforeKickOff | GameModeType::AfterGoal);
        let max_x = if sp.kickoff_offside && kickoff_mode {
            0.0
        } else {
            let mut line = wm.offside_line_x;
            let mate_step = intercept.first_teammate_reach_steps();
            if mate_step < 50 {
                let trap = step_point(wm.ball.position, wm.ball.velocity, sp.ball_decay, mate_step);
                line = line.max(trap.x);
            }
            line - 1.0
        };
        for pose in self.poses.iter_mut() {
            pose.x = pose.x.min(max_x);
        }
    }
}

impl PositionStrategy for StarterStrategy {
    fn update(&mut self, wm: &WorldSnapshot, sp: &ServerParam, intercept: &InterceptTable) {
        match wm.game_mode.kind {
            GameModeType::BeforeKickOff | GameModeType::AfterGoal => self.poses = KICKOFF_LAYOUT,
            _ => {
                let ball = Self::predict_ball_position(wm, sp, intercept);
                self.set_dynamic_positions(ball, sp);
            }
        }
        self.apply_offside_rule(wm, sp, intercept);
    }

    fn position(&self, unum: u8) -> Vec2 {
        match unum {
            1..=MAX_SLOT => self.poses[unum as usize - 1],
            _ => {
                log::warn!("no home position for unum {}", unum);
                Vec2::ZERO
            }
        }
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ReachConfig;
    use crate::models::player_type::PlayerTypeTable;
    use crate::models::world::GameMode;

    fn updated(wm: &WorldSnapshot) -> StarterStrategy {
        let sp = ServerParam::default();
        let table = InterceptTable::build(wm, &sp, &PlayerTypeTable::new(&sp), &ReachConfig::default());
        let mut strategy = StarterStrategy::new();
        strategy.update(wm, &sp, &table);
        strategy
    }

    #[test]
    fn test_kickoff_layout_is_own_half() {
        let mut wm = WorldSnapshot::default();
        wm.game_mode = GameMode::new(GameModeType::BeforeKickOff, wm.our_side);
        let strategy = updated(&wm);
        assert_eq!(strategy.position(2), Vec2::new(-10.0, -10.0));
        for unum in 1..=MAX_SLOT {
            assert!(strategy.position(unum).x < 0.0, "slot {} crosses halfway", unum);
        }
    }

    #[test]
    fn test_centre_ball_maps_to_rect_middle() {
        let mut wm = WorldSnapshot::default();
        wm.offside_line_x = 40.0;
        let strategy = updated(&wm);
        let p = strategy.position(1);
        assert!((p.x + 15.0).abs() < 1e-9, "x was {}", p.x);
        assert!(p.y.abs() < 1e-9);
        let p3 = strategy.position(3);
        assert!((p3.x + 2.25).abs() < 1e-9);
        assert!((p3.y - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_offside_clamp() {
        let mut wm = WorldSnapshot::default();
        wm.ball.position = Vec2::new(50.0, 0.0);
        wm.offside_line_x = 10.0;
        let strategy = updated(&wm);
        for unum in 1..=MAX_SLOT {
            assert!(strategy.position(unum).x <= 9.0 + 1e-9, "slot {} past the offside line", unum);
        }
    }

    #[test]
    fn test_offside_line_is_second_lowest() {
        let strategy = StarterStrategy::new();
        assert!((strategy.offside_line() + 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_slot_is_origin() {
        let strategy = StarterStrategy::new();
        assert_eq!(strategy.position(0), Vec2::ZERO);
        assert_eq!(strategy.position(12), Vec2::ZERO);
    }
}
