//! Our kick-off

use super::{go_to_placed_ball, kick_wait, max_kick_speed, set_play_dash_power};
use crate::engine::action_queue::Action;
use crate::engine::behaviors::{Behavior, PassBehavior};
use crate::engine::context::DecisionContext;
use crate::engine::geom::Vec2;

pub struct KickOffPlay;

impl KickOffPlay {
    /// Nobody stands nearer the ball than self.
    fn is_taker(ctx: &DecisionContext) -> bool {
        match ctx.teammates_from_ball().first() {
            Some((_, dist)) => *dist > ctx.wm.ball_dist_from_self(),
            None => true,
        }
    }

    fn kick(ctx: &DecisionContext) -> Vec<Action> {
        if let Some(actions) = go_to_placed_ball(ctx, 0.0)
            .or_else(|| kick_wait(ctx, Action::TurnToBall { cycle: 1 }))
            .or_else(|| PassBehavior.evaluate(ctx))
        {
            return actions;
        }
        let speed = max_kick_speed(ctx);
        log::debug!("kickoff: back to (-20, 0) at {:.2}", speed);
        vec![Action::SmartKick {
            target: Vec2::new(-20.0, 0.0),
            first_speed: speed,
            first_speed_threshold: speed * 0.96,
            max_steps: 1,
        }]
    }

    fn position(ctx: &DecisionContext) -> Vec<Action> {
        let mut target = ctx.home_position();
        target.x = target.x.min(-0.5);
        vec![
            Action::GoToPoint {
                target,
                distance_threshold: ctx.ball_dist_threshold(0.07, 1.0),
                max_dash_power: set_play_dash_power(ctx),
            },
            Action::TurnToBall { cycle: 1 },
        ]
    }
}

impl Behavior for KickOffPlay {
    fn name(&self) -> &'static str {
        "kickoff"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        Some(if Self::is_taker(ctx) { Self::kick(ctx) } else { Self::position(ctx) })
    }
}
