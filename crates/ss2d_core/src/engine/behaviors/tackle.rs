//! Tackle when the ball is about to be lost or is heading into our goal

use super::Behavior;
use crate::engine::action_queue::Action;
use crate::engine::context::DecisionContext;
use crate::engine::geom::{Line2, Ray2, Vec2};
use crate::engine::kinematics::step_point;
use crate::models::world::CardType;

pub struct TackleBehavior;

impl TackleBehavior {
    /// Success probability to use and whether it comes from a foul tackle.
    fn probability(ctx: &DecisionContext) -> (f64, bool) {
        let me = &ctx.wm.me;
        let ball = ctx.ball();
        let buffer = ctx.config.tackle.foul_line_buffer;
        let outside_box = ball.x > ctx.sp.our_penalty_area_line_x() + buffer
            || ball.abs_y() > ctx.sp.penalty_area_half_width + buffer;
        if me.card == CardType::NoCard && outside_box && me.tackle_probability < me.foul_probability {
            (me.foul_probability, true)
        } else {
            (me.tackle_probability, false)
        }
    }

    /// The ball stops past our goal line inside the goal mouth.
    fn ball_heading_into_goal(ctx: &DecisionContext) -> bool {
        let sp = ctx.sp;
        let reach_point = step_point(ctx.ball(), ctx.ball_vel(), sp.ball_decay, ctx.intercept.self_reach_steps());
        if reach_point.x >= -sp.pitch_half_length {
            return false;
        }
        let goal_line = Line2::through(
            Vec2::new(-sp.pitch_half_length, 10.0),
            Vec2::new(-sp.pitch_half_length, -10.0),
        );
        Ray2::new(ctx.ball(), ctx.ball_vel().th())
            .intersection(&goal_line)
            .map_or(false, |p| p.abs_y() < sp.goal_width / 2.0 + 1.0)
    }

    fn situation_calls_for_tackle(ctx: &DecisionContext) -> bool {
        let cfg = &ctx.config.tackle;
        let self_min = ctx.intercept.self_reach_steps();
        let mate_min = ctx.intercept.first_teammate_reach_steps();
        let opp_min = ctx.intercept.first_opponent_reach_steps();

        if opp_min < cfg.urgent_opponent_reach || Self::ball_heading_into_goal(ctx) {
            return true;
        }
        if opp_min.saturating_add(cfg.opponent_lead) < self_min && opp_min.saturating_add(cfg.opponent_lead) < mate_min {
            return true;
        }
        let their_goal = ctx.sp.their_goal();
        let facing = ((their_goal - ctx.self_pos()).th() - ctx.wm.me.body_direction).abs();
        self_min >= cfg.goal_guard_self_min
            && ctx.ball().dist2(their_goal) < cfg.goal_guard_dist * cfg.goal_guard_dist
            && facing < cfg.goal_guard_facing
    }
}

impl Behavior for TackleBehavior {
    fn name(&self) -> &'static str {
        "tackle"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        let cfg = &ctx.config.tackle;
        let (probability, foul) = Self::probability(ctx);
        if probability < cfg.min_probability || !Self::situation_calls_for_tackle(ctx) {
            return None;
        }

        let body = ctx.wm.me.body_direction.abs();
        if body < cfg.body_threshold {
            log::debug!("tackle: forward, p={:.2} foul={}", probability, foul);
            return Some(vec![Action::Tackle { power_or_dir: ctx.sp.max_tackle_power, foul }]);
        }
        let back_power = -ctx.sp.max_back_tackle_power;
        if back_power < 0.0 && body > 180.0 - cfg.body_threshold {
            log::debug!("tackle: backward, p={:.2}", probability);
            return Some(vec![Action::Tackle { power_or_dir: back_power, foul: false }]);
        }
        None
    }
}
