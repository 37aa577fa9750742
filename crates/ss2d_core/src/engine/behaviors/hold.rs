//! Keep the ball away from opponents when nobody is pressing

use super::Behavior;
use crate::engine::action_queue::Action;
use crate::engine::context::DecisionContext;

pub struct HoldBehavior;

impl Behavior for HoldBehavior {
    fn name(&self) -> &'static str {
        "hold"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        let threshold = ctx.config.kick_planner.hold_when_opponent_beyond;
        match ctx.wm.nearest_opponent_to_self() {
            Some((_, dist)) if dist <= threshold => None,
            _ => Some(vec![Action::HoldBall]),
        }
    }
}
