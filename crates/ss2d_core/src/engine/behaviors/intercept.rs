//! Chase the ball when self is among the first to reach it

use super::Behavior;
use crate::engine::action_queue::Action;
use crate::engine::context::DecisionContext;

pub struct InterceptBehavior;

impl InterceptBehavior {
    /// No teammate holds the ball and self gets there soon, or no later than
    /// teammates and within the opponent margin.
    pub fn should_chase(ctx: &DecisionContext) -> bool {
        let cfg = &ctx.config.intercept;
        let self_min = ctx.intercept.self_reach_steps();
        let mate_min = ctx.intercept.first_teammate_reach_steps();
        let opp_min = ctx.intercept.first_opponent_reach_steps();
        if ctx.wm.kickable_teammate_exists() {
            return false;
        }
        self_min <= cfg.near_reach || (self_min <= mate_min && self_min < opp_min.saturating_add(cfg.opponent_margin))
    }
}

impl Behavior for InterceptBehavior {
    fn name(&self) -> &'static str {
        "intercept"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        if !Self::should_chase(ctx) {
            return None;
        }
        Some(vec![
            Action::Intercept { save_recovery: true },
            Action::NeckOffensiveIntercept,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geom::Vec2;
    use crate::engine::test_fixtures::{Fixture, SnapshotBuilder};

    #[test]
    fn test_chases_loose_ball_nearby() {
        let wm = SnapshotBuilder::new().ball_at(Vec2::new(2.0, 0.0)).build();
        let fx = Fixture::new(wm);
        let actions = InterceptBehavior.evaluate(&fx.ctx()).unwrap();
        assert_eq!(actions[0], Action::Intercept { save_recovery: true });
        assert_eq!(actions[1], Action::NeckOffensiveIntercept);
    }

    #[test]
    fn test_leaves_ball_to_faster_teammate() {
        let wm = SnapshotBuilder::new()
            .me_at(Vec2::new(-20.0, 0.0))
            .ball_at(Vec2::new(10.0, 0.0))
            .teammate(9, Vec2::new(9.0, 0.0))
            .build();
        let fx = Fixture::new(wm);
        assert!(InterceptBehavior.evaluate(&fx.ctx()).is_none());
    }

    #[test]
    fn test_kickable_teammate_blocks_chase() {
        let wm = SnapshotBuilder::new()
            .ball_at(Vec2::new(1.5, 0.0))
            .with(|wm| {
                wm.teammates.push(crate::models::world::PlayerObject {
                    unum: 8,
                    position: Vec2::new(2.0, 0.0),
                    is_kickable: true,
                    ..Default::default()
                })
            })
            .build();
        let fx = Fixture::new(wm);
        assert!(!InterceptBehavior::should_chase(&fx.ctx()));
    }
}
