//! Short dribble along the freest of three headings toward goal

use super::Behavior;
use crate::engine::action_queue::Action;
use crate::engine::context::DecisionContext;
use crate::engine::geom::{Sector2, Vec2};

pub struct DribbleBehavior;

impl DribbleBehavior {
    /// Open dribble targets around the ball, goal bearing first.
    pub fn open_targets(ctx: &DecisionContext) -> Vec<Vec2> {
        let cfg = &ctx.config.dribble;
        let ball = ctx.ball();
        let bearing = (ctx.sp.their_goal() - ball).th();
        [0.0, -cfg.heading_spread, cfg.heading_spread]
            .iter()
            .map(|offset| bearing + *offset)
            .filter(|heading| {
                let corridor = Sector2::around(ball, 0.0, cfg.radius, *heading, cfg.sector_half_angle);
                !ctx.exists_opponent_in(&corridor)
            })
            .map(|heading| ball + Vec2::polar(cfg.radius, heading))
            .collect()
    }
}

impl Behavior for DribbleBehavior {
    fn name(&self) -> &'static str {
        "dribble"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        let goal = ctx.sp.their_goal();
        let target = Self::open_targets(ctx)
            .into_iter()
            .min_by(|a, b| a.dist(goal).total_cmp(&b.dist(goal)))?;
        let cfg = &ctx.config.dribble;
        log::debug!("dribble: to ({:.2}, {:.2})", target.x, target.y);
        Some(vec![Action::SmartKick {
            target,
            first_speed: cfg.first_speed,
            first_speed_threshold: cfg.first_speed_threshold,
            max_steps: cfg.max_steps,
        }])
    }
}
