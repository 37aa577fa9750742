//! Indirect free kicks, back passes and fouls just outside our box
//!
//! The kicker looks for a teammate in front of goal first since a direct
//! shot cannot score.

use super::{avoid_circle_point, go_to_placed_ball, is_kicker, kick_wait, max_kick_speed};
use crate::engine::action_queue::Action;
use crate::engine::behaviors::{Behavior, PassBehavior};
use crate::engine::context::DecisionContext;
use crate::engine::geom::Vec2;
use crate::engine::kinematics::{first_term_of_geom_series, first_term_of_geom_series_last, length_of_geom_series};
use crate::models::world::{GameModeType, PlayerObject};

pub struct IndirectFreeKickPlay;

impl IndirectFreeKickPlay {
    /// Aim point in front of goal, level with self.
    fn goal_aim(ctx: &DecisionContext) -> Vec2 {
        Vec2::new(ctx.sp.pitch_half_length, ctx.self_pos().y * 0.8)
    }

    /// Teammates within passing range of the ball that are onside.
    fn receivers<'a>(ctx: &DecisionContext<'a>) -> impl Iterator<Item = (&'a PlayerObject, f64)> {
        let offside = ctx.wm.offside_line_x;
        ctx.teammates_from_ball()
            .into_iter()
            .filter(move |(p, d)| (1.5..=20.0).contains(d) && p.position.x <= offside)
    }

    /// Square ball to a teammate standing in front of their goal.
    fn kick_to_shooter(ctx: &DecisionContext) -> Option<Vec<Action>> {
        let sp = ctx.sp;
        let ball = ctx.ball();
        let goal = Self::goal_aim(ctx);
        let (receiver, _) = Self::receivers(ctx)
            .filter(|(p, _)| p.position.x >= ball.x - 3.0 && p.position.abs_y() <= sp.goal_width * 0.25)
            .filter_map(|(p, d)| {
                let goal_dist = p.position.dist(goal);
                (goal_dist <= 16.0).then_some((p, goal_dist * 0.4 + d * 0.6))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let max_speed = max_kick_speed(ctx);
        let target = receiver.position + receiver.velocity + Vec2::new(0.6, 0.0);
        let dist = ball.dist(target);
        let speed = match length_of_geom_series(max_speed, dist, sp.ball_decay) {
            Some(len) => first_term_of_geom_series(dist, sp.ball_decay, len.ceil() as u32).min(max_speed),
            None => max_speed,
        };
        log::debug!("indirect: shooter {} at ({:.2}, {:.2})", receiver.unum, target.x, target.y);
        Some(vec![Action::KickOneStep { target, first_speed: speed }])
    }

    /// Blind kick across the goal mouth when nobody is around to receive.
    fn kick_without_receiver(ctx: &DecisionContext) -> Option<Vec<Action>> {
        let sp = ctx.sp;
        let isolated = match ctx.teammates_from_ball().first() {
            None => true,
            Some((p, _)) => p.position.dist(ctx.self_pos()) > 35.0 || p.position.x < -30.0,
        };
        if !isolated {
            return None;
        }
        let side = if ctx.wm.cycle % 2 == 0 { -1.0 } else { 1.0 };
        Some(vec![Action::KickOneStep {
            target: Vec2::new(sp.pitch_half_length, side * (sp.goal_width / 2.0 - 0.8)),
            first_speed: max_kick_speed(ctx),
        }])
    }

    fn kick_to_teammate_nearest_goal(ctx: &DecisionContext) -> Option<Vec<Action>> {
        let me = ctx.self_pos();
        let goal = Self::goal_aim(ctx);
        let (target, dist) = match Self::receivers(ctx)
            .map(|(p, d)| (p, p.position.dist(goal) + d))
            .min_by(|a, b| a.1.total_cmp(&b.1))
        {
            Some((p, _)) => (p.position + Vec2::new(0.6, 0.0), p.position.dist(me)),
            None => {
                let (p, d) = ctx.wm.nearest_teammate_to_self()?;
                (p.position, d)
            }
        };
        let speed = first_term_of_geom_series_last(1.8, dist, ctx.sp.ball_decay).min(max_kick_speed(ctx));
        Some(vec![Action::KickOneStep { target, first_speed: speed }])
    }

    fn kick(ctx: &DecisionContext) -> Vec<Action> {
        go_to_placed_ball(ctx, 0.0)
            .or_else(|| kick_wait(ctx, Action::TurnToBall { cycle: 1 }))
            .or_else(|| Self::kick_to_shooter(ctx))
            .or_else(|| PassBehavior.evaluate(ctx))
            .or_else(|| {
                (ctx.wm.set_play_count <= 3)
                    .then(|| vec![Action::TurnToPoint { target: Vec2::new(50.0, 0.0), cycle: 2 }])
            })
            .or_else(|| Self::kick_without_receiver(ctx))
            .or_else(|| Self::kick_to_teammate_nearest_goal(ctx))
            .unwrap_or_else(|| vec![Action::TurnToBall { cycle: 1 }])
    }

    fn offense_move(ctx: &DecisionContext) -> Vec<Action> {
        let offside = ctx.wm.offside_line_x;
        let mut target = ctx.home_position();
        target.x = target.x.min(offside - 1.0);
        if let Some((mate, dist)) = ctx.teammate_nearest_to(target) {
            if dist < 2.5 {
                target += (target - mate.position).with_length(2.5);
                target.x = target.x.min(offside - 1.0);
            }
        }
        let turn_point = (Vec2::new(ctx.sp.pitch_half_length, 0.0) + ctx.ball()) * 0.5;
        vec![
            Action::GoToPoint {
                target,
                distance_threshold: ctx.ball_dist_threshold(0.07, 0.5),
                max_dash_power: ctx.safety_dash_power(ctx.sp.max_dash_power),
            },
            Action::TurnToPoint { target: turn_point, cycle: 2 },
            Action::NeckTurnToBallOrScan { count_threshold: 0 },
        ]
    }

    /// Keep the required distance from the ball, hugging the goal line when
    /// the restart is inside our goal area.
    fn defense_point(ctx: &DecisionContext, target: Vec2) -> Vec2 {
        let sp = ctx.sp;
        let ball = ctx.ball();
        let me = ctx.self_pos();
        let half_goal = sp.goal_width / 2.0;
        let radius = if ctx.wm.game_mode.kind == GameModeType::BackPass {
            sp.goal_area_length + 0.5
        } else {
            sp.center_circle_r + 0.5
        };

        let mut point = target;
        if point.x < -sp.pitch_half_length + 3.0 && point.abs_y() < half_goal {
            while point.x < ball.x && point.x > -sp.pitch_half_length && ball.dist(point) < radius {
                point.x = (point.x - sp.pitch_half_length) * 0.5 - 0.01;
            }
        }
        let in_goal = point.x < -sp.pitch_half_length + 0.5
            && point.abs_y() < half_goal + 0.5
            && me.x < -sp.pitch_half_length
            && me.abs_y() < half_goal;
        if in_goal {
            return point;
        }
        if ball.dist(point) < radius {
            point = ball + (point - ball).with_length(radius);
        }
        avoid_circle_point(ctx, point, radius)
    }

    fn defense_move(ctx: &DecisionContext) -> Vec<Action> {
        let target = ctx.home_position();
        let mut adjusted = Self::defense_point(ctx, target);
        let dist_thr = ctx.ball_dist_threshold(0.07, 0.5);
        if adjusted != target && ctx.ball().dist(target) > 10.0 && ctx.self_final_point().dist(adjusted) < dist_thr {
            adjusted = target;
        }
        vec![
            Action::GoToPoint {
                target: adjusted,
                distance_threshold: dist_thr,
                max_dash_power: ctx.safety_dash_power(ctx.sp.max_dash_power),
            },
            Action::TurnToBall { cycle: 1 },
        ]
    }
}

impl Behavior for IndirectFreeKickPlay {
    fn name(&self) -> &'static str {
        "indirect_freekick"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        Some(if !ctx.wm.is_our_set_play() {
            Self::defense_move(ctx)
        } else if is_kicker(ctx) {
            Self::kick(ctx)
        } else {
            Self::offense_move(ctx)
        })
    }
}
