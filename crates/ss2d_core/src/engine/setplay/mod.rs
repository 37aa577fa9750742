//! Dead-ball restarts
//!
//! [`SetPlayBehavior`] picks the routine for the current referee mode. The
//! routines share the helpers below: kicker selection, the kick-wait gate,
//! stamina-aware dash power and paths around the restricted circle that the
//! defending side must respect.
//!
//! Every routine is first-applicable: the first step that yields actions
//! decides the cycle.
//!
//! `game_mode.side` always names the team awarded the restart.

pub mod freekick;
pub mod goal_kick;
pub mod goalie_free_kick;
pub mod indirect_freekick;
pub mod kickin;
pub mod kickoff;
pub mod their_goal_kick;

pub use freekick::FreeKickPlay;
pub use goal_kick::GoalKickPlay;
pub use goalie_free_kick::GoalieFreeKick;
pub use indirect_freekick::IndirectFreeKickPlay;
pub use kickin::KickInPlay;
pub use kickoff::KickOffPlay;
pub use their_goal_kick::TheirGoalKickMove;

use super::action_queue::Action;
use super::behaviors::Behavior;
use super::context::DecisionContext;
use super::geom::{AngleDeg, Circle2, Vec2};
use super::kinematics::{
    dash_power_to_keep_speed, final_point, first_term_of_geom_series, first_term_of_geom_series_last,
    length_of_geom_series,
};
use crate::models::world::{GameModeType, PlayerObject};

/// Restart routing for field players.
pub struct SetPlayBehavior;

impl Behavior for SetPlayBehavior {
    fn name(&self) -> &'static str {
        "set_play"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        let wm = ctx.wm;
        let sp = ctx.sp;
        let ours = wm.is_our_set_play();
        let ball = ctx.ball();
        let routine: &dyn Behavior = match wm.game_mode.kind {
            GameModeType::BeforeKickOff | GameModeType::AfterGoal => {
                return Some(vec![Action::Move { target: ctx.home_position() }, Action::TurnToBall { cycle: 1 }]);
            }
            GameModeType::KickOff if ours => &KickOffPlay,
            GameModeType::KickIn | GameModeType::CornerKick if ours => &KickInPlay,
            GameModeType::GoalKick if ours => &GoalKickPlay,
            GameModeType::GoalKick => &TheirGoalKickMove,
            GameModeType::BackPass | GameModeType::IndFreeKick => &IndirectFreeKickPlay,
            GameModeType::FoulCharge | GameModeType::FoulPush
                if (ball.x - sp.our_penalty_area_line_x()).abs() < 1.0
                    && ball.abs_y() < sp.penalty_area_half_width + 1.0 =>
            {
                &IndirectFreeKickPlay
            }
            _ if ours => &FreeKickPlay,
            _ => return Some(basic_their_move(ctx)),
        };
        log::debug!("set play: {:?} -> {}", wm.game_mode.kind, routine.name());
        routine.evaluate(ctx)
    }
}

/// Whether self is the designated kicker: the slot among the first few
/// whose home lies nearest the ball.
pub fn is_kicker(ctx: &DecisionContext) -> bool {
    let wm = ctx.wm;
    let ball = ctx.ball();
    let goalie = ctx.our_goalie_unum();
    let goalie_catch = wm.game_mode.kind == GameModeType::GoalieCatch;

    let mut best: Option<(u8, f64)> = None;
    for unum in 1..=ctx.config.setplay.kicker_slots {
        let is_goalie_slot = goalie == Some(unum as i32);
        let home = if is_goalie_slot {
            if !goalie_catch {
                continue;
            }
            if wm.me.unum == unum {
                wm.me.position
            } else {
                match wm.teammate(unum as i32) {
                    Some(p) => p.position,
                    None => continue,
                }
            }
        } else {
            ctx.strategy.position(unum)
        };
        let dist = home.dist(ball);
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((unum, dist));
        }
    }
    best.map_or(false, |(unum, _)| unum == wm.me.unum)
}

/// Holding on to a restart because we lead late in the game.
pub fn is_delaying_tactics(ctx: &DecisionContext) -> bool {
    let wm = ctx.wm;
    let sp = ctx.sp;
    let wait_buf = if wm.game_mode.kind == GameModeType::GoalKick { 15 } else { 2 };
    if ctx.real_set_play_count() >= sp.drop_ball_time.saturating_sub(wait_buf) {
        return false;
    }
    if wm.cycle < sp.normal_time_cycles().saturating_sub(500) {
        return false;
    }
    wm.our_score > wm.their_score && wm.our_score - wm.their_score <= 1
}

/// Wait before taking the kick, performing `action` meanwhile.
pub fn kick_wait(ctx: &DecisionContext, action: Action) -> Option<Vec<Action>> {
    let wm = ctx.wm;
    let sp = ctx.sp;
    if ctx.real_set_play_count() >= sp.drop_ball_time.saturating_sub(5) {
        return None;
    }
    let wait = if is_delaying_tactics(ctx) || ctx.teammates_from_ball().len() < 9 || wm.set_play_count <= 3 {
        true
    } else if wm.set_play_count >= 15 && wm.see_time == wm.cycle && wm.me.stamina > sp.stamina_max * 0.6 {
        false
    } else {
        wm.see_time != wm.cycle || wm.me.stamina < sp.stamina_max * 0.9
    };
    wait.then(|| vec![action])
}

/// Dash power while repositioning during a restart.
pub fn set_play_dash_power(ctx: &DecisionContext) -> f64 {
    let wm = ctx.wm;
    let sp = ctx.sp;
    let safety = ctx.safety_dash_power(sp.max_dash_power);
    if wm.is_our_set_play() {
        return safety;
    }
    let home = ctx.home_position();
    if home.x <= wm.me.position.x {
        return safety;
    }
    if ctx.ball().x < -30.0 && home.x < ctx.ball().x {
        return safety;
    }
    let stamina = wm.me.stamina;
    let rate = if stamina > sp.stamina_max * 0.8 {
        1.5 * stamina / sp.stamina_max
    } else {
        (0.9 * (stamina - sp.recover_dec_thr_value()) / sp.stamina_max).max(0.0)
    };
    ctx.self_type().player_type.stamina_inc_max * wm.me.recovery * rate
}

/// Whether the straight path to `target` stays clear of `circle`.
pub fn can_go_to(ctx: &DecisionContext, circle: &Circle2, target: Vec2) -> bool {
    let me = ctx.self_pos();
    match circle.segment_intersections(me, target) {
        0 => true,
        1 => ((target - me).th() - ctx.wm.ball_angle_from_self()).abs() > 80.0,
        _ => false,
    }
}

/// `target`, or the first point around the ball at `radius` reachable
/// without crossing the circle.
pub fn avoid_circle_point(ctx: &DecisionContext, target: Vec2, radius: f64) -> Vec2 {
    let sp = ctx.sp;
    let ball = ctx.ball();
    let circle = Circle2::new(ball, radius);
    if can_go_to(ctx, &circle, target) {
        return target;
    }
    let target_angle = (target - ctx.self_pos()).th();
    let step = if ctx.wm.ball_angle_from_self().is_left_of(target_angle) { 1.0 } else { -1.0 };
    for i in 1..6 {
        let candidate = ball + Vec2::polar(radius + 1.0, AngleDeg::new(30.0 * i as f64 * step));
        if candidate.abs_x() > sp.pitch_half_length + sp.pitch_margin - 1.0
            || candidate.abs_y() > sp.pitch_half_width + sp.pitch_margin - 1.0
        {
            break;
        }
        if can_go_to(ctx, &circle, candidate) {
            return candidate;
        }
    }
    target
}

/// Approach the stopped ball so that self ends up behind it facing
/// `place_angle`. `None` once in place.
pub fn go_to_placed_ball(ctx: &DecisionContext, place_angle: f64) -> Option<Vec<Action>> {
    let wm = ctx.wm;
    let sp = ctx.sp;
    let profile = &ctx.self_type().player_type;
    let margin = ctx.config.setplay.dir_margin;
    let ball_angle = wm.ball_angle_from_self();
    let angle_diff = (ball_angle - AngleDeg::new(place_angle)).abs();
    let ball_dist = wm.ball_dist_from_self();
    if angle_diff < margin && ball_dist < profile.player_size + sp.ball_size + 0.08 {
        return None;
    }

    let sub_target = ctx.ball() + Vec2::polar(2.0, AngleDeg::new(place_angle + 180.0));
    if angle_diff > margin {
        return Some(vec![Action::GoToPoint {
            target: sub_target,
            distance_threshold: 0.1,
            max_dash_power: 50.0,
        }]);
    }
    if (ball_angle - wm.me.body_direction).abs() > 1.5 {
        return Some(vec![Action::TurnToBall { cycle: 1 }]);
    }
    let power = if ball_dist > 2.0 {
        set_play_dash_power(ctx)
    } else {
        dash_power_to_keep_speed(profile.player_size, profile.player_decay, profile.dash_power_rate, wm.me.effort)
    };
    Some(vec![Action::Dash { power, relative_direction: 0.0 }])
}

/// Rotate `target` around the ball periodically while an opponent marks it.
pub fn evade_target(ctx: &DecisionContext, target: Vec2) -> Vec2 {
    let cfg = &ctx.config.setplay;
    let add = (ctx.ball() - target).with_length(cfg.evade_length);
    let third = (cfg.evade_window / 3).max(1);
    let phase = ctx.wm.cycle % cfg.evade_window.max(1);
    let nudged = if phase < third {
        target
    } else if phase < third * 2 {
        target + add.rotated(90.0)
    } else {
        target + add.rotated(-90.0)
    };
    ctx.sp.pitch().clamp(nudged)
}

/// Kick speed for a short set-play pass over `dist`.
pub fn restart_pass_speed(ctx: &DecisionContext, dist: f64) -> f64 {
    let sp = ctx.sp;
    let max_speed = max_kick_speed(ctx);
    let steps = length_of_geom_series(max_speed, dist, sp.ball_decay)
        .map_or(u32::MAX, |len| len.ceil() as u32);
    let speed = if steps > 3 {
        first_term_of_geom_series(dist, sp.ball_decay, steps)
    } else {
        first_term_of_geom_series_last(1.4, dist, sp.ball_decay)
    };
    speed.min(max_speed)
}

pub fn max_kick_speed(ctx: &DecisionContext) -> f64 {
    ctx.wm.me.kick_rate * ctx.sp.max_power
}

/// Where `p` stops if it stops dashing, shifted half a unit upfield.
pub fn lead_point(ctx: &DecisionContext, p: &PlayerObject) -> Vec2 {
    ctx.player_final_point(p) + Vec2::new(0.5, 0.0)
}

/// Move for the opponents' restarts: keep out of the exclusion circle.
pub fn basic_their_move(ctx: &DecisionContext) -> Vec<Action> {
    let wm = ctx.wm;
    let sp = ctx.sp;
    let keep_away = ctx.config.setplay.their_keep_away;
    let ball = ctx.ball();
    let mut target = ctx.home_position();

    let ball_to_target = target - ball;
    if ball_to_target.r() < keep_away {
        let x_diff = (keep_away * keep_away - ball_to_target.y * ball_to_target.y).max(0.0).sqrt();
        target.x = ball.x - x_diff;
        if target.x < -45.0 {
            target = ball + ball_to_target.with_length(keep_away);
        }
    }
    if wm.game_mode.kind == GameModeType::KickOff && sp.kickoff_offside {
        target.x = target.x.min(-1.0e-5);
    }

    let radius = sp.center_circle_r + ctx.self_type().player_type.player_size;
    let mut adjusted = avoid_circle_point(ctx, target, radius);
    let dist_thr = ctx.ball_dist_threshold(0.1, 0.7);
    if adjusted != target && ball.dist(target) > 10.0 && ctx.self_final_point().dist(adjusted) < dist_thr {
        adjusted = target;
    }

    let ball_angle = wm.ball_angle_from_self();
    let face = if ball.y < 0.0 { ball_angle + 90.0 } else { ball_angle - 90.0 };
    vec![
        Action::GoToPoint {
            target: adjusted,
            distance_threshold: dist_thr,
            max_dash_power: set_play_dash_power(ctx),
        },
        Action::TurnToAngle { angle: face.degree() },
    ]
}

/// Ball final point, used by the second touch of a goal kick.
pub fn ball_final_point(ctx: &DecisionContext) -> Vec2 {
    final_point(ctx.ball(), ctx.ball_vel(), ctx.sp.ball_decay)
}

// ========== Tests ==========
