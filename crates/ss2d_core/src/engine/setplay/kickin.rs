//! Our kick-in and corner kick

use super::{
    evade_target, go_to_placed_ball, is_kicker, kick_wait, lead_point, max_kick_speed, restart_pass_speed,
    set_play_dash_power,
};
use crate::engine::action_queue::Action;
use crate::engine::behaviors::{Behavior, ClearBehavior, PassBehavior};
use crate::engine::context::DecisionContext;
use crate::engine::geom::Vec2;

pub struct KickInPlay;

impl KickInPlay {
    fn kick_to_nearest_teammate(ctx: &DecisionContext) -> Option<Vec<Action>> {
        let sp = ctx.sp;
        let (mate, dist) = ctx.teammate_nearest_to(ctx.ball())?;
        if dist >= 10.0 || mate.position.abs_x() >= sp.pitch_half_length || mate.position.abs_y() >= sp.pitch_half_width {
            return None;
        }
        let target = lead_point(ctx, mate);
        let first_speed = restart_pass_speed(ctx, ctx.ball().dist(target));
        log::debug!("kickin: to {} at {:.2}", mate.unum, first_speed);
        Some(vec![Action::KickOneStep { target, first_speed }])
    }

    /// Long ball into the far corner on self's side.
    fn corner_target(ctx: &DecisionContext) -> Vec2 {
        let sp = ctx.sp;
        let me = ctx.self_pos();
        let y = (sp.pitch_half_width - 5.0) * (1.0 - me.x / sp.pitch_half_length);
        Vec2::new(sp.pitch_half_length - 2.0, if me.y < 0.0 { -y } else { y })
    }

    fn kick(ctx: &DecisionContext) -> Vec<Action> {
        let place_angle = if ctx.ball().y > 0.0 { -90.0 } else { 90.0 };
        go_to_placed_ball(ctx, place_angle)
            .or_else(|| kick_wait(ctx, Action::TurnToBall { cycle: 1 }))
            .or_else(|| PassBehavior.evaluate(ctx))
            .or_else(|| Self::kick_to_nearest_teammate(ctx))
            .or_else(|| {
                ((ctx.wm.ball_angle_from_self() - ctx.wm.me.body_direction).abs() > 1.5)
                    .then(|| vec![Action::TurnToBall { cycle: 1 }])
            })
            .or_else(|| (ctx.self_pos().x < 20.0).then(|| ClearBehavior.evaluate(ctx)).flatten())
            .unwrap_or_else(|| {
                vec![Action::KickOneStep {
                    target: Self::corner_target(ctx),
                    first_speed: ctx.sp.ball_speed_max.min(max_kick_speed(ctx)),
                }]
            })
    }

    fn position(ctx: &DecisionContext) -> Vec<Action> {
        let wm = ctx.wm;
        let mut target = ctx.home_position();
        if wm.me.stamina > ctx.sp.stamina_max * 0.9 {
            let crowded = wm.nearest_opponent_to_self().map_or(false, |(opp, _)| opp.position.dist(target) < 3.0);
            if crowded {
                target = evade_target(ctx, target);
            }
        }
        let kicker_ball_dist = ctx.teammates_from_ball().first().map_or(1000.0, |(_, d)| *d);
        let face = if kicker_ball_dist > 1.0 {
            Action::Turn { relative_direction: 120.0 }
        } else {
            Action::TurnToBall { cycle: 1 }
        };
        vec![
            Action::GoToPoint {
                target,
                distance_threshold: ctx.ball_dist_threshold(0.07, 1.0),
                max_dash_power: set_play_dash_power(ctx),
            },
            face,
        ]
    }
}

impl Behavior for KickInPlay {
    fn name(&self) -> &'static str {
        "kickin"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        Some(if is_kicker(ctx) { Self::kick(ctx) } else { Self::position(ctx) })
    }
}
