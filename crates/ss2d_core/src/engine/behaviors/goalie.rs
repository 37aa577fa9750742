//! Goalkeeper play: catch, clear, slide chase and bisector positioning
//!
//! The keeper stands on the bisector of the angle the goal mouth spans from
//! the ball, far enough out to cover both posts but never behind the catch
//! margin on the goal line.

use super::{Behavior, ClearBehavior};
use crate::engine::action_queue::Action;
use crate::engine::context::DecisionContext;
use crate::engine::geom::{AngleDeg, Line2, Ray2, Rect2, Vec2};
use crate::engine::kinematics::{final_point, step_point};
use crate::models::server_param::ServerParam;
use crate::models::world::GameModeType;

const DANGER_ANGLE: f64 = 21.0;

/// Our penalty area shrunk by one unit on the three open sides.
pub fn catch_zone(sp: &ServerParam) -> Rect2 {
    Rect2::from_corners(
        Vec2::new(-sp.pitch_half_length, -sp.penalty_area_half_width + 1.0),
        Vec2::new(sp.our_penalty_area_line_x() - 1.0, sp.penalty_area_half_width - 1.0),
    )
}

/// Where the keeper should stand against a ball at `ball`.
pub fn goalie_move_position(sp: &ServerParam, ball: Vec2, my_pos: Vec2) -> Vec2 {
    let half_goal = sp.goal_width / 2.0;
    let min_x = -sp.pitch_half_length + sp.catch_area_l * 0.9;

    if ball.x < -49.0 {
        return Vec2::new(min_x, ball.y.clamp(-half_goal, half_goal));
    }

    let post_l = Vec2::new(-sp.pitch_half_length, -half_goal);
    let post_r = Vec2::new(-sp.pitch_half_length, half_goal);
    let line_dir = AngleDeg::bisect((post_r - ball).th(), (post_l - ball).th());
    let goal_line = Line2::through(post_l, post_r);

    let Some(intersection) = Line2::from_angle(ball, line_dir).intersection(&goal_line) else {
        let y = if ball.x > 0.0 {
            post_l.y
        } else if ball.x < 0.0 {
            post_r.y
        } else {
            0.0
        };
        return Vec2::new(min_x, y);
    };

    let spread = half_goal.atan2(sp.penalty_area_length - 2.5);
    let post_gap = (Line2::through(ball, post_l).dist(intersection) + Line2::through(ball, post_r).dist(intersection)) * 0.5;
    let mut dist = (post_gap / spread.sin()).max(half_goal);
    dist = dist.min(ball.dist(intersection) + 1.5);

    let error = (line_dir - (intersection - my_pos).th()).abs();
    if error > DANGER_ANGLE {
        dist *= 1.0 - ((error - DANGER_ANGLE) / (180.0 - DANGER_ANGLE)) * 0.5;
    }

    let mut result = intersection + (ball - intersection).with_length(dist);
    if result.x < min_x {
        result.x = min_x;
    }
    result
}

/// Catch when the ball is in reach inside the catch zone.
pub fn catch_ball(ctx: &DecisionContext) -> Option<Vec<Action>> {
    let sp = ctx.sp;
    let catchable = ctx.wm.ball_dist_from_self() < sp.catchable_area() - 0.05;
    (catchable && catch_zone(sp).contains(ctx.ball())).then(|| vec![Action::Catch])
}

/// The moving ball crosses our goal line inside the mouth.
pub fn shot_on_goal(ctx: &DecisionContext) -> bool {
    let sp = ctx.sp;
    let (ball, vel) = (ctx.ball(), ctx.ball_vel());
    if vel.r2() < 0.01 || final_point(ball, vel, sp.ball_decay).x > -sp.pitch_half_length {
        return false;
    }
    let goal_line = Line2::through(
        Vec2::new(-sp.pitch_half_length, -10.0),
        Vec2::new(-sp.pitch_half_length, 10.0),
    );
    Ray2::new(ball, vel.th())
        .intersection(&goal_line)
        .map_or(false, |p| p.abs_y() < sp.goal_width / 2.0 + 1.0)
}

/// Side-step along the goal line to meet a shot.
pub fn slide_chase(ctx: &DecisionContext) -> Vec<Action> {
    let me = &ctx.wm.me;
    let body = me.body_direction;
    if (body.abs() - 90.0).abs() > 2.0 {
        let y = if body.degree() < 0.0 { -100.0 } else { 100.0 };
        return vec![Action::TurnToPoint { target: Vec2::new(me.position.x, y), cycle: 2 }];
    }

    let ball_ray = Ray2::new(ctx.ball(), ctx.ball_vel().th());
    let ball_line = Line2::from_angle(ball_ray.origin, ball_ray.dir);
    let my_line = Line2::from_angle(me.position, body);
    let crossing = my_line.intersection(&ball_line).filter(|p| ball_ray.in_right_dir(*p));
    let Some(crossing) = crossing else {
        return vec![Action::Intercept { save_recovery: false }];
    };

    if me.position.dist(crossing) < ctx.sp.catch_area_l * 0.7 {
        return vec![Action::StopDash { save_recovery: false }];
    }
    let toward = (crossing - me.position).th();
    let power = if (toward - body).abs() > 90.0 {
        ctx.sp.min_dash_power
    } else {
        ctx.sp.max_dash_power
    };
    log::debug!("goalie: slide chase to ({:.2}, {:.2}) power {}", crossing.x, crossing.y, power);
    vec![Action::Dash { power, relative_direction: 0.0 }]
}

/// Intercept dangerous balls in the box, otherwise hold the bisector.
pub fn basic_move(ctx: &DecisionContext) -> Vec<Action> {
    let sp = ctx.sp;
    let self_min = ctx.intercept.self_reach_steps();
    let opp_min = ctx.intercept.first_opponent_reach_steps();
    let reach_point = step_point(ctx.ball(), ctx.ball_vel(), sp.ball_decay, self_min);
    if catch_zone(sp).contains(reach_point) && (opp_min < self_min || self_min <= 4) {
        return vec![Action::Intercept { save_recovery: true }, Action::NeckTurnToBall];
    }

    let reference = match ctx.wm.nearest_opponent_to_ball() {
        Some((opp, _)) if ctx.wm.kickable_opponent_exists() => opp.position + opp.velocity,
        _ => step_point(ctx.ball(), ctx.ball_vel(), sp.ball_decay, 3),
    };
    let target = goalie_move_position(sp, reference, ctx.self_pos());

    let ball_angle = ctx.wm.ball_angle_from_self();
    let face = if ball_angle.is_left_of(ctx.wm.me.body_direction) {
        ball_angle + 90.0
    } else {
        ball_angle - 90.0
    };
    vec![
        Action::GoToPoint {
            target,
            distance_threshold: 0.5,
            max_dash_power: sp.max_dash_power,
        },
        Action::TurnToAngle { angle: face.degree() },
        Action::NeckTurnToBall,
    ]
}

/// Open-play goalkeeper. Always applicable.
pub struct GoalieBehavior;

impl Behavior for GoalieBehavior {
    fn name(&self) -> &'static str {
        "goalie"
    }

    fn evaluate(&self, ctx: &DecisionContext) -> Option<Vec<Action>> {
        if ctx.wm.game_mode.kind == GameModeType::PlayOn {
            if let Some(actions) = catch_ball(ctx) {
                log::debug!("goalie: catch at dist {:.2}", ctx.wm.ball_dist_from_self());
                return Some(actions);
            }
        }
        if ctx.wm.me.is_kickable {
            return ClearBehavior.evaluate(ctx);
        }
        if shot_on_goal(ctx) {
            let mut actions = slide_chase(ctx);
            actions.push(Action::NeckTurnToBall);
            return Some(actions);
        }
        Some(basic_move(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{Fixture, SnapshotBuilder};

    #[test]
    fn test_centre_ball_keeps_keeper_on_axis() {
        let sp = ServerParam::default();
        let pos = goalie_move_position(&sp, Vec2::new(-12.5, 0.0), Vec2::new(-50.0, 0.0));
        assert!((pos.x + 37.08).abs() < 0.01, "x was {}", pos.x);
        assert!(pos.y.abs() < 1e-6, "keeper drifted to y={}", pos.y);
    }

    #[test]
    fn test_ball_on_goal_line_clamps_to_mouth() {
        let sp = ServerParam::default();
        let pos = goalie_move_position(&sp, Vec2::new(-51.0, 15.0), Vec2::new(-50.0, 0.0));
        assert!((pos.x - (-52.5 + 1.2 * 0.9)).abs() < 1e-9);
        assert!((pos.y - 7.01).abs() < 1e-9);
    }

    #[test]
    fn test_wide_ball_shifts_toward_near_post() {
        let sp = ServerParam::default();
        let ball = Vec2::new(-40.0, 15.0);
        let pos = goalie_move_position(&sp, ball, Vec2::new(-50.0, 0.0));
        assert!(pos.y > 0.0 && pos.y < ball.y);
        assert!(pos.x >= -52.5 + 1.2 * 0.9 && pos.x < ball.x);
    }

    #[test]
    fn test_catch_close_ball_in_box() {
        let wm = SnapshotBuilder::new()
            .goalie()
            .me_at(Vec2::new(-48.0, 0.0))
            .ball_at(Vec2::new(-47.0, 0.5))
            .build();
        let fx = Fixture::new(wm);
        assert_eq!(GoalieBehavior.evaluate(&fx.ctx()), Some(vec![Action::Catch]));
    }

    #[test]
    fn test_kickable_keeper_clears() {
        let wm = SnapshotBuilder::new()
            .goalie()
            .me_at(Vec2::new(-30.0, 0.0))
            .ball_at(Vec2::new(-29.5, 0.0))
            .kickable()
            .build();
        let fx = Fixture::new(wm);
        let actions = GoalieBehavior.evaluate(&fx.ctx()).unwrap();
        assert!(matches!(actions[0], Action::SmartKick { .. }));
    }

    #[test]
    fn test_slide_chase_dashes_backward_along_body_line() {
        let wm = SnapshotBuilder::new()
            .goalie()
            .me_at(Vec2::new(-51.0, 0.0))
            .body(90.0)
            .ball_at(Vec2::new(-45.0, -3.0))
            .ball_vel(Vec2::new(-2.0, 0.5))
            .build();
        let fx = Fixture::new(wm);
        assert!(shot_on_goal(&fx.ctx()));
        assert_eq!(slide_chase(&fx.ctx()), vec![Action::Dash { power: -100.0, relative_direction: 0.0 }]);
    }

    #[test]
    fn test_slide_chase_turns_sideways_first() {
        let wm = SnapshotBuilder::new()
            .goalie()
            .me_at(Vec2::new(-51.0, 0.0))
            .body(-30.0)
            .ball_at(Vec2::new(-45.0, -3.0))
            .ball_vel(Vec2::new(-2.0, 0.5))
            .build();
        let fx = Fixture::new(wm);
        assert_eq!(
            slide_chase(&fx.ctx()),
            vec![Action::TurnToPoint { target: Vec2::new(-51.0, -100.0), cycle: 2 }]
        );
    }

    #[test]
    fn test_basic_move_positions_on_bisector() {
        let wm = SnapshotBuilder::new()
            .goalie()
            .me_at(Vec2::new(-50.0, 0.0))
            .ball_at(Vec2::new(-12.5, 0.0))
            .opponent(9, Vec2::new(-12.0, 0.0))
            .build();
        let fx = Fixture::new(wm);
        let actions = GoalieBehavior.evaluate(&fx.ctx()).unwrap();
        match actions[0] {
            Action::GoToPoint { target, .. } => assert!((target.x + 37.08).abs() < 0.01),
            ref other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(actions[1], Action::TurnToAngle { .. }));
    }
}
