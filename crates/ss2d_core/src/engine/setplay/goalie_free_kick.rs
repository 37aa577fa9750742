//! Goalkeeper during restarts

use super::{kick_wait, IndirectFreeKickPlay};
use crate::engine::action_queue::Action;
use crate::engine::behaviors::goalie::basic_move;
use crate::engine::behaviors::{Behavior, ClearBehavior, PassBehavior};
use crate::engine::context::DecisionContext;
use crate::engine::geom::Vec2;
use crate::models::world::GameModeType;

/// Restart routine for the keeper: distribute after a catch, otherwise guard
/// the goal as in open play.
pub struct GoalieFreeKick;

impl GoalieFreeKick {
    fn distribute(ctx: &DecisionContext) -> Vec<Action> {
        kick_wait(ctx, Action::TurnToBall { cycle: 1 })
            .or_else(|| PassBehavior.evaluate(ctx))
            .or_else(|| ClearBehavior.evaluate(ctx))
            .unwrap_or_else(|| vec![Action::TurnToBall { cycle: 1 }])
    }
}

impl Behavior for GoalieFreeKick {
    fn name(&self) -> &'static str {
        "goalie_free_kick"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        let wm = ctx.wm;
        match wm.game_mode.kind {
            GameModeType::BackPass | GameModeType::IndFreeKick => IndirectFreeKickPlay.evaluate(ctx),
            GameModeType::BeforeKickOff | GameModeType::AfterGoal => Some(vec![
                Action::Move { target: Vec2::new(-ctx.sp.pitch_half_length + 2.5, 0.0) },
                Action::TurnToBall { cycle: 1 },
            ]),
            GameModeType::GoalieCatch if wm.is_our_set_play() && wm.me.is_kickable => {
                log::debug!("goalie: distributing after catch, set play count {}", wm.set_play_count);
                Some(Self::distribute(ctx))
            }
            _ => Some(basic_move(ctx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{Fixture, SnapshotBuilder};

    fn keeper_with_ball() -> SnapshotBuilder {
        SnapshotBuilder::new()
            .goalie()
            .our_mode(GameModeType::GoalieCatch)
            .me_at(Vec2::new(-47.0, 3.0))
            .ball_at(Vec2::new(-46.5, 3.0))
            .kickable()
    }

    #[test]
    fn test_before_kickoff_moves_into_goal() {
        let wm = SnapshotBuilder::new().goalie().our_mode(GameModeType::BeforeKickOff).build();
        let fx = Fixture::new(wm);
        assert_eq!(GoalieFreeKick.evaluate(&fx.ctx()).unwrap()[0], Action::Move { target: Vec2::new(-50.0, 0.0) });
    }

    #[test]
    fn test_waits_after_catch() {
        let wm = keeper_with_ball()
            .cycle(30)
            .with(|wm| {
                wm.set_play_count = 2;
                wm.last_set_play_start_time = 28;
            })
            .build();
        let fx = Fixture::new(wm);
        assert_eq!(GoalieFreeKick.evaluate(&fx.ctx()), Some(vec![Action::TurnToBall { cycle: 1 }]));
    }

    #[test]
    fn test_clears_when_time_runs_out() {
        let wm = keeper_with_ball()
            .cycle(200)
            .with(|wm| {
                wm.set_play_count = 96;
                wm.last_set_play_start_time = 100;
            })
            .build();
        let fx = Fixture::new(wm);
        let actions = GoalieFreeKick.evaluate(&fx.ctx()).unwrap();
        match actions[0] {
            Action::SmartKick { target, .. } => assert_eq!(target, Vec2::new(-52.5, 20.0)),
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_their_restart_holds_bisector() {
        let wm = SnapshotBuilder::new()
            .goalie()
            .their_mode(GameModeType::FreeKick)
            .me_at(Vec2::new(-50.0, 0.0))
            .ball_at(Vec2::new(-20.0, 0.0))
            .build();
        let fx = Fixture::new(wm);
        assert!(matches!(GoalieFreeKick.evaluate(&fx.ctx()).unwrap()[0], Action::GoToPoint { .. }));
    }
}
