//! Positioning during the opponents' goal kick
//!
//! Forwards wait just outside their penalty area on the line the ball will
//! leave it, ready to press the first touch.

use super::set_play_dash_power;
use crate::engine::action_queue::Action;
use crate::engine::behaviors::Behavior;
use crate::engine::context::DecisionContext;
use crate::engine::geom::{Ray2, Rect2, Vec2};
use crate::engine::kinematics::step_point;

pub struct TheirGoalKickMove;

impl TheirGoalKickMove {
    fn expanded_penalty_area(ctx: &DecisionContext, margin: f64) -> Rect2 {
        let sp = ctx.sp;
        Rect2::from_corners(
            Vec2::new(sp.their_penalty_area_line_x() - margin, -sp.penalty_area_half_width - margin),
            Vec2::new(sp.pitch_half_length + margin, sp.penalty_area_half_width + margin),
        )
    }

    /// Go for a kicked ball we can reach soon outside their box.
    fn chase_ball(ctx: &DecisionContext) -> Option<Vec<Action>> {
        let sp = ctx.sp;
        if ctx.ball_vel().r() < 0.2 {
            return None;
        }
        let self_min = ctx.intercept.self_reach_steps();
        if self_min > 10 {
            return None;
        }
        let reach_point = step_point(ctx.ball(), ctx.ball_vel(), sp.ball_decay, self_min);
        let area = Self::expanded_penalty_area(ctx, 1.0);
        if area.contains(reach_point) {
            return None;
        }
        let me = ctx.self_pos();
        let pen_x = area.min.x;
        if reach_point.x > pen_x && me.x < pen_x && me.abs_y() < area.max.y - 0.5 {
            return None;
        }
        Some(vec![Action::Intercept { save_recovery: true }])
    }

    /// Where the ball is expected to leave their penalty area.
    fn exit_point(ctx: &DecisionContext) -> Option<Vec2> {
        let sp = ctx.sp;
        let ball = ctx.ball();
        let vel = ctx.ball_vel();
        if vel.r() > 0.2 {
            Self::expanded_penalty_area(ctx, 0.75).exit_point(&Ray2::new(ball, vel.th()))
        } else if ball.x > sp.their_penalty_area_line_x() + 7.0 && ball.abs_y() < sp.goal_width / 2.0 + 2.0 {
            None
        } else {
            Some(Vec2::new(sp.their_penalty_area_line_x() - 0.76, ball.y))
        }
    }

    fn wait_at_exit(ctx: &DecisionContext) -> Option<Vec<Action>> {
        let sp = ctx.sp;
        let me = ctx.self_pos();
        let mut target = Self::exit_point(ctx)?;
        if let Some((_, mate_dist)) = ctx.teammate_nearest_to(target) {
            if mate_dist < me.dist(target) {
                return None;
            }
        }

        let side = if me.y < 0.0 { -1.0 } else { 1.0 };
        if target.x < sp.their_penalty_area_line_x() && me.x > sp.their_penalty_area_line_x() - 0.5 {
            target.y = (sp.penalty_area_half_width - 0.5) * side;
        } else if target.y > sp.penalty_area_half_width && me.abs_y() < sp.penalty_area_half_width + 0.5 {
            target.y = (sp.penalty_area_half_width + 0.5) * side;
        }
        log::debug!("their goal kick: wait at ({:.2}, {:.2})", target.x, target.y);
        Some(vec![
            Action::GoToPoint {
                target,
                distance_threshold: ctx.ball_dist_threshold(0.07, 1.0),
                max_dash_power: ctx.safety_dash_power(sp.max_dash_power),
            },
            Action::TurnToBall { cycle: 0 },
        ])
    }

    fn normal_move(ctx: &DecisionContext) -> Vec<Action> {
        let sp = ctx.sp;
        let ball = ctx.ball();
        let mut target = ctx.home_position();
        if target.x > 25.0 && (target.y * ball.y < 0.0 || target.abs_y() < 10.0) {
            target.y += (ball.y - target.y) * 0.4;
        }
        let me = ctx.self_pos();
        if me.x > sp.their_penalty_area_line_x() && target.abs_y() < sp.penalty_area_half_width {
            let y = sp.penalty_area_half_width + 0.5;
            target.y = if me.y < 0.0 { -y } else { y };
        }
        vec![
            Action::GoToPoint {
                target,
                distance_threshold: ctx.ball_dist_threshold(0.07, 1.0),
                max_dash_power: set_play_dash_power(ctx),
            },
            Action::TurnToBall { cycle: 0 },
        ]
    }
}

impl Behavior for TheirGoalKickMove {
    fn name(&self) -> &'static str {
        "their_goal_kick"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        Self::chase_ball(ctx)
            .or_else(|| Self::wait_at_exit(ctx))
            .or_else(|| Some(Self::normal_move(ctx)))
    }
}
