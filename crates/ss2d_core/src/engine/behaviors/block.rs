//! Block the dribble lane of the opponent who reaches the ball first
//!
//! The carrier is assumed to dribble at a constant speed toward our goal
//! once it controls the ball. Walking that path cycle by cycle, the first
//! field player of ours who can stand on a point in time takes the block.

use super::Behavior;
use crate::engine::action_queue::Action;
use crate::engine::config::BlockConfig;
use crate::engine::context::DecisionContext;
use crate::engine::geom::Vec2;
use crate::engine::kinematics::step_point;
use crate::models::server_param::ServerParam;
use crate::models::world::WorldSnapshot;

/// Who covers the carrier's path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockOutcome {
    /// Self gets to `point` in time.
    SelfBlocks { point: Vec2, cycle: u32 },
    /// A teammate is there first.
    TeammateCovers { unum: i32, cycle: u32 },
    /// The path leaves the pitch before anyone gets there.
    NoBlock,
}

/// Walk the carrier's predicted path starting at `opp_min`.
pub fn plan_block(
    wm: &WorldSnapshot,
    sp: &ServerParam,
    cfg: &BlockConfig,
    home_offside_line: f64,
    opp_min: u32,
) -> BlockOutcome {
    let intercept_pos = step_point(wm.ball.position, wm.ball.velocity, sp.ball_decay, opp_min);
    let dribble_vel = Vec2::polar(cfg.dribble_speed, (sp.our_goal() - intercept_pos).th());

    let me = wm.me.unum as i32;
    let mut blockers: Vec<(i32, Vec2)> = wm
        .valid_teammates()
        .filter(|p| !p.is_goalie)
        .map(|p| (p.unum, p.position))
        .collect();
    if !wm.me.is_goalie {
        blockers.push((me, wm.me.position));
    }
    blockers.sort_by_key(|(unum, _)| *unum);

    let is_defender = wm.me.unum <= cfg.defender_max_unum;
    let mut ball = intercept_pos;
    for cycle in opp_min + 1..opp_min + cfg.horizon {
        ball += dribble_vel;
        if ball.abs_x() > sp.pitch_half_length || ball.abs_y() > sp.pitch_half_width {
            log::debug!("block: carrier path leaves the pitch at cycle {}", cycle);
            return BlockOutcome::NoBlock;
        }
        if is_defender && ball.x > home_offside_line + cfg.defender_offside_buffer {
            continue;
        }
        for &(unum, pos) in &blockers {
            // whole cycles at one unit per cycle
            let block_cycles = pos.dist(ball).floor() as u32;
            if block_cycles <= cycle {
                return if unum == me {
                    BlockOutcome::SelfBlocks { point: ball, cycle }
                } else {
                    BlockOutcome::TeammateCovers { unum, cycle }
                };
            }
        }
    }
    BlockOutcome::NoBlock
}

pub struct BlockBehavior;

impl Behavior for BlockBehavior {
    fn name(&self) -> &'static str {
        "block"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        let self_min = ctx.intercept.self_reach_steps();
        let mate_min = ctx.intercept.first_teammate_reach_steps();
        let opp_min = ctx.intercept.first_opponent_reach_steps();
        if opp_min >= self_min.min(mate_min) {
            return None;
        }
        let cfg = &ctx.config.block;
        match plan_block(ctx.wm, ctx.sp, cfg, ctx.strategy.offside_line(), opp_min) {
            BlockOutcome::SelfBlocks { point, cycle } => {
                log::debug!("block: self covers ({:.2}, {:.2}) at cycle {}", point.x, point.y, cycle);
                Some(vec![
                    Action::GoToPoint {
                        target: point,
                        distance_threshold: cfg.dist_thr,
                        max_dash_power: ctx.sp.max_dash_power,
                    },
                    Action::NeckTurnToBallOrScan { count_threshold: 0 },
                ])
            }
            BlockOutcome::TeammateCovers { unum, cycle } => {
                log::debug!("block: teammate {} covers at cycle {}", unum, cycle);
                None
            }
            BlockOutcome::NoBlock => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{Fixture, SnapshotBuilder};

    fn slow_ball_params() -> ServerParam {
        ServerParam { ball_decay: 0.96, ..ServerParam::default() }
    }

    #[test]
    fn test_teammate_covers_before_self() {
        // carrier meets the ball at x=2.8816 and dribbles back at 0.7 per cycle
        let wm = SnapshotBuilder::new()
            .me_unum(7)
            .me_at(Vec2::new(1.4816, 7.2))
            .ball_at(Vec2::ZERO)
            .ball_vel(Vec2::new(1.0, 0.0))
            .teammate(4, Vec2::new(1.4816, -5.0))
            .build();
        let outcome = plan_block(&wm, &slow_ball_params(), &BlockConfig::default(), -30.0, 3);
        assert_eq!(outcome, BlockOutcome::TeammateCovers { unum: 4, cycle: 5 });
    }

    #[test]
    fn test_self_blocks_when_closest() {
        let wm = SnapshotBuilder::new()
            .me_at(Vec2::new(0.0, 3.0))
            .ball_at(Vec2::ZERO)
            .ball_vel(Vec2::new(1.0, 0.0))
            .teammate(4, Vec2::new(1.4816, -20.0))
            .build();
        match plan_block(&wm, &slow_ball_params(), &BlockConfig::default(), -30.0, 3) {
            BlockOutcome::SelfBlocks { point, cycle } => {
                assert!(cycle >= 4);
                assert!(point.y.abs() < 1e-9, "point stays on the dribble line");
            }
            other => panic!("expected self block, got {:?}", other),
        }
    }

    #[test]
    fn test_goalie_never_blocks() {
        let wm = SnapshotBuilder::new()
            .me_at(Vec2::new(-50.0, 30.0))
            .ball_at(Vec2::ZERO)
            .ball_vel(Vec2::new(1.0, 0.0))
            .goalie_teammate(1, Vec2::new(2.0, 0.5))
            .build();
        let outcome = plan_block(&wm, &slow_ball_params(), &BlockConfig::default(), -30.0, 3);
        assert!(!matches!(outcome, BlockOutcome::TeammateCovers { unum: 1, .. }));
    }

    #[test]
    fn test_behavior_not_applicable_when_self_faster() {
        let wm = SnapshotBuilder::new()
            .ball_at(Vec2::new(1.0, 0.0))
            .opponent(9, Vec2::new(10.0, 0.0))
            .build();
        let fx = Fixture::new(wm);
        assert!(BlockBehavior.evaluate(&fx.ctx()).is_none());
    }

    #[test]
    fn test_behavior_commits_go_to_point() {
        let wm = SnapshotBuilder::new()
            .me_at(Vec2::new(-15.0, 2.0))
            .ball_at(Vec2::new(0.0, 0.0))
            .opponent(9, Vec2::new(0.5, 0.0))
            .build();
        let fx = Fixture::new(wm);
        let actions = BlockBehavior.evaluate(&fx.ctx()).unwrap();
        assert!(matches!(actions[0], Action::GoToPoint { .. }));
    }
}
