//! Our direct free kick and the other restarts awarded to us

use super::{evade_target, go_to_placed_ball, is_kicker, kick_wait, lead_point, max_kick_speed};
use crate::engine::action_queue::Action;
use crate::engine::behaviors::{Behavior, ClearBehavior, PassBehavior};
use crate::engine::context::DecisionContext;

const SHORT_PASS_SPEED: f64 = 2.3;

pub struct FreeKickPlay;

impl FreeKickPlay {
    /// Short pass to the teammate closest to self.
    fn kick_to_nearest_teammate(ctx: &DecisionContext) -> Option<Vec<Action>> {
        let (mate, dist) = ctx.wm.nearest_teammate_to_self()?;
        if dist >= 20.0 || (mate.position.x <= -30.0 && dist >= 10.0) {
            return None;
        }
        let target = lead_point(ctx, mate);
        log::debug!("freekick: short pass to {} at ({:.2}, {:.2})", mate.unum, target.x, target.y);
        Some(vec![Action::KickOneStep {
            target,
            first_speed: SHORT_PASS_SPEED.min(max_kick_speed(ctx)),
        }])
    }

    fn kick(ctx: &DecisionContext) -> Vec<Action> {
        go_to_placed_ball(ctx, 0.0)
            .or_else(|| kick_wait(ctx, Action::TurnToBall { cycle: 1 }))
            .or_else(|| PassBehavior.evaluate(ctx))
            .or_else(|| Self::kick_to_nearest_teammate(ctx))
            .or_else(|| {
                ((ctx.wm.ball_angle_from_self() - ctx.wm.me.body_direction).abs() > 1.5)
                    .then(|| vec![Action::TurnToBall { cycle: 1 }])
            })
            .or_else(|| ClearBehavior.evaluate(ctx))
            .unwrap_or_else(|| vec![Action::TurnToBall { cycle: 1 }])
    }

    fn position(ctx: &DecisionContext) -> Vec<Action> {
        let wm = ctx.wm;
        let mut target = ctx.home_position();
        let marked = wm.nearest_opponent_to_self().map_or(false, |(_, d)| d < 3.0);
        if wm.set_play_count > 0 && wm.me.stamina > ctx.sp.stamina_max * 0.9 && marked {
            target = evade_target(ctx, target);
        }
        target.x = target.x.min(wm.offside_line_x - 0.5);
        vec![
            Action::GoToPoint {
                target,
                distance_threshold: ctx.ball_dist_threshold(0.07, 1.0),
                max_dash_power: 50.0,
            },
            Action::TurnToBall { cycle: 1 },
        ]
    }
}

impl Behavior for FreeKickPlay {
    fn name(&self) -> &'static str {
        "freekick"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        Some(if is_kicker(ctx) { Self::kick(ctx) } else { Self::position(ctx) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geom::Vec2;
    use crate::engine::test_fixtures::{Fixture, SnapshotBuilder};
    use crate::models::world::GameModeType;

    #[test]
    fn test_non_kicker_respects_offside_line() {
        let wm = SnapshotBuilder::new()
            .our_mode(GameModeType::FreeKick)
            .me_unum(10)
            .ball_at(Vec2::new(30.0, 0.0))
            .with(|wm| wm.offside_line_x = 10.0)
            .build();
        let fx = Fixture::new(wm);
        match FreeKickPlay.evaluate(&fx.ctx()).unwrap()[0] {
            Action::GoToPoint { target, max_dash_power, .. } => {
                assert!(target.x <= 9.5 + 1e-9);
                assert!((max_dash_power - 50.0).abs() < 1e-9);
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_short_pass_to_nearest_teammate() {
        let wm = SnapshotBuilder::new()
            .our_mode(GameModeType::FreeKick)
            .me_at(Vec2::new(-0.4, 0.0))
            .teammate(9, Vec2::new(5.0, 3.0))
            .opponent(3, Vec2::new(2.5, 1.5))
            .build();
        let fx = Fixture::new(wm);
        let actions = FreeKickPlay::kick_to_nearest_teammate(&fx.ctx()).unwrap();
        match actions[0] {
            Action::KickOneStep { target, first_speed } => {
                assert!((target.x - 5.5).abs() < 1e-9);
                assert!((first_speed - 2.3_f64.min(0.027 * 100.0)).abs() < 1e-9);
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_far_defender_not_targeted() {
        let wm = SnapshotBuilder::new()
            .our_mode(GameModeType::FreeKick)
            .me_at(Vec2::new(-20.0, 0.0))
            .ball_at(Vec2::new(-19.6, 0.0))
            .teammate(4, Vec2::new(-35.0, 5.0))
            .build();
        let fx = Fixture::new(wm);
        assert!(FreeKickPlay::kick_to_nearest_teammate(&fx.ctx()).is_none());
    }
}
