//! Our goal kick
//!
//! The kicker places the ball, then either passes or lofts it to the far
//! flank outside our box. Once the ball has left the goal area but the mode
//! has not switched yet, the kicker chases its own kick.

use super::{ball_final_point, evade_target, go_to_placed_ball, is_kicker, kick_wait, set_play_dash_power};
use crate::engine::action_queue::Action;
use crate::engine::behaviors::{Behavior, ClearBehavior, PassBehavior};
use crate::engine::context::DecisionContext;
use crate::engine::geom::Vec2;
use crate::engine::kinematics::{first_term_of_geom_series_last, step_point};

pub struct GoalKickPlay;

impl GoalKickPlay {
    fn ball_in_goal_area(ctx: &DecisionContext, half_width: f64) -> bool {
        let ball = ctx.ball();
        ball.x < -ctx.sp.pitch_half_length + ctx.sp.goal_area_length + 1.0 && ball.abs_y() < half_width + 1.0
    }

    /// Follow-up once the ball is out of the goal area.
    fn second_kick(ctx: &DecisionContext) -> Option<Vec<Action>> {
        if Self::ball_in_goal_area(ctx, ctx.sp.goal_width * 0.5) {
            return None;
        }
        if ctx.wm.me.is_kickable {
            return PassBehavior.evaluate(ctx).or_else(|| ClearBehavior.evaluate(ctx));
        }
        Self::intercept(ctx).or_else(|| {
            Some(vec![
                Action::GoToPoint {
                    target: ball_final_point(ctx),
                    distance_threshold: 2.0,
                    max_dash_power: ctx.sp.max_dash_power,
                },
                Action::TurnToPoint { target: Vec2::ZERO, cycle: 2 },
            ])
        })
    }

    /// Chase a ball we reach first when it is slow or drifting wide.
    fn intercept(ctx: &DecisionContext) -> Option<Vec<Action>> {
        let sp = ctx.sp;
        if Self::ball_in_goal_area(ctx, sp.goal_area_width * 0.5) || ctx.wm.me.is_kickable {
            return None;
        }
        let self_min = ctx.intercept.self_reach_steps();
        if self_min > ctx.intercept.first_teammate_reach_steps() {
            return None;
        }
        let trap = step_point(ctx.ball(), ctx.ball_vel(), sp.ball_decay, self_min);
        let wide = trap.x > sp.our_penalty_area_line_x() - 8.0 && trap.abs_y() > sp.penalty_area_half_width - 5.0;
        (wide || ctx.ball_vel().r2() < 0.25).then(|| vec![Action::Intercept { save_recovery: true }])
    }

    /// Raw kick toward the far corner of our penalty area's front edge.
    fn kick_to_far_side(ctx: &DecisionContext) -> Option<Vec<Action>> {
        let sp = ctx.sp;
        let me = &ctx.wm.me;
        if me.kick_rate <= 0.0 {
            return None;
        }
        let ball = ctx.ball();
        let side = if ball.y > 0.0 { -1.0 } else { 1.0 };
        let target = Vec2::new(sp.our_penalty_area_line_x() - 5.0, sp.penalty_area_half_width * side);
        let speed = first_term_of_geom_series_last(0.7, ball.dist(target), sp.ball_decay)
            .min(sp.ball_speed_max)
            .min(me.kick_rate * sp.max_power);
        let accel = (target - ball).with_length(speed);
        let power = sp.max_power.min(accel.r() / me.kick_rate);
        log::debug!("goal kick: far side ({:.1}, {:.1}) power {:.1}", target.x, target.y, power);
        Some(vec![Action::Kick {
            power,
            relative_direction: (accel.th() - me.body_direction).degree(),
        }])
    }

    fn kick(ctx: &DecisionContext) -> Vec<Action> {
        let drop_ball_time = ctx.sp.drop_ball_time;
        Self::second_kick(ctx)
            .or_else(|| go_to_placed_ball(ctx, 0.0))
            .or_else(|| kick_wait(ctx, Action::TurnToBall { cycle: 1 }))
            .or_else(|| PassBehavior.evaluate(ctx))
            .or_else(|| Self::kick_to_far_side(ctx))
            .or_else(|| {
                (ctx.real_set_play_count() <= drop_ball_time.saturating_sub(10))
                    .then(|| vec![Action::TurnToBall { cycle: 1 }])
            })
            .or_else(|| ClearBehavior.evaluate(ctx))
            .unwrap_or_else(|| vec![Action::TurnToBall { cycle: 1 }])
    }

    fn position(ctx: &DecisionContext) -> Vec<Action> {
        if let Some(actions) = Self::intercept(ctx) {
            return actions;
        }
        let wm = ctx.wm;
        let sp = ctx.sp;
        let mut target = ctx.home_position();
        target.y += ctx.ball().y * 0.5;
        let limit = sp.pitch_half_width - 1.0;
        target.y = target.y.clamp(-limit, limit);

        let marked = wm.nearest_opponent_to_self().map_or(false, |(_, d)| d < 3.0);
        if wm.me.stamina > sp.stamina_max * 0.9 && marked {
            target = evade_target(ctx, target);
        }
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

impl Behavior for GoalKickPlay {
    fn name(&self) -> &'static str {
        "goal_kick"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        Some(if is_kicker(ctx) { Self::kick(ctx) } else { Self::position(ctx) })
    }
}
