//! Kick planning for the ball holder
//!
//! Stages run in a fixed order and the first one that applies decides the
//! cycle: shoot, pass (only while an opponent is close), dribble, hold
//! (only while no opponent is close), clear. Later stages never add a second
//! kick on top of an earlier one.

use super::{first_applicable, Behavior, ClearBehavior, DribbleBehavior, HoldBehavior, PassBehavior, ShootBehavior};
use crate::engine::action_queue::Action;
use crate::engine::context::DecisionContext;

/// Pass stage gated on opponent pressure.
struct PressuredPass;

impl Behavior for PressuredPass {
    fn name(&self) -> &'static str {
        "pass"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        let within = ctx.config.kick_planner.pass_when_opponent_within;
        match ctx.wm.nearest_opponent_to_self() {
            Some((_, dist)) if dist < within => PassBehavior.evaluate(ctx),
            _ => None,
        }
    }
}

pub struct KickPlanner;

impl Behavior for KickPlanner {
    fn name(&self) -> &'static str {
        "kick_planner"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        let stages: [&dyn Behavior; 5] = [
            &ShootBehavior,
            &PressuredPass,
            &DribbleBehavior,
            &HoldBehavior,
            &ClearBehavior,
        ];
        let (stage, actions) = first_applicable(&stages, ctx)?;
        log::debug!("kick_planner: {} decides", stage);
        Some(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geom::Vec2;
    use crate::engine::test_fixtures::{Fixture, SnapshotBuilder};

    fn kick_target(actions: &[Action]) -> Vec2 {
        match actions[0] {
            Action::SmartKick { target, .. } | Action::KickOneStep { target, .. } => target,
            ref other => panic!("expected a kick, got {:?}", other),
        }
    }

    #[test]
    fn test_shoot_comes_before_pass_and_dribble() {
        let wm = SnapshotBuilder::new()
            .me_at(Vec2::new(43.5, 2.0))
            .ball_at(Vec2::new(44.0, 2.0))
            .kickable()
            .teammate(9, Vec2::new(48.0, -10.0))
            .opponent(4, Vec2::new(30.0, 10.0))
            .build();
        let fx = Fixture::new(wm);
        let actions = KickPlanner.evaluate(&fx.ctx()).unwrap();
        assert_eq!(actions.len(), 1, "exactly one kick is planned");
        let target = kick_target(&actions);
        assert!((target.x - 52.5).abs() < 1e-9, "shot goes to the goal line");
    }

    #[test]
    fn test_pass_under_pressure() {
        let wm = SnapshotBuilder::new()
            .me_at(Vec2::new(-0.5, 0.0))
            .ball_at(Vec2::ZERO)
            .kickable()
            .teammate(9, Vec2::new(12.0, -15.0))
            .opponent(4, Vec2::new(3.0, 0.5))
            .build();
        let fx = Fixture::new(wm);
        assert_eq!(kick_target(&KickPlanner.evaluate(&fx.ctx()).unwrap()), Vec2::new(12.0, -15.0));
    }

    #[test]
    fn test_dribble_when_unpressed() {
        let wm = SnapshotBuilder::new()
            .me_at(Vec2::new(-0.5, 0.0))
            .ball_at(Vec2::ZERO)
            .kickable()
            .teammate(9, Vec2::new(12.0, -15.0))
            .opponent(4, Vec2::new(-20.0, 20.0))
            .build();
        let fx = Fixture::new(wm);
        let target = kick_target(&KickPlanner.evaluate(&fx.ctx()).unwrap());
        assert!((target.x - 3.0).abs() < 1e-9, "dribble toward goal, got {:?}", target);
    }

    #[test]
    fn test_clear_when_boxed_in() {
        let wm = SnapshotBuilder::new()
            .me_at(Vec2::new(-30.3, 15.0))
            .ball_at(Vec2::new(-30.0, 15.0))
            .kickable()
            .opponent(4, Vec2::new(-28.0, 15.0))
            .opponent(5, Vec2::new(-28.1, 15.7))
            .opponent(6, Vec2::new(-28.2, 13.7))
            .build();
        let fx = Fixture::new(wm);
        assert_eq!(kick_target(&KickPlanner.evaluate(&fx.ctx()).unwrap()), Vec2::new(-30.0, 34.0));
    }
}
