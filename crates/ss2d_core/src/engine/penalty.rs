//! Penalty shoot-out
//!
//! Only the designated taker and the keepers act; everyone else waits in a
//! line near the centre spot. With multiple kicks allowed the taker dribbles
//! in and shoots once a side of the goal is out of the keeper's reach,
//! otherwise it gets a single shot at the corner away from the keeper.

use super::action_queue::Action;
use super::behaviors::goalie::{basic_move, catch_ball, slide_chase};
use super::behaviors::{Behavior, ClearBehavior, DribbleBehavior};
use super::context::DecisionContext;
use super::decision::AgentMemory;
use super::geom::Vec2;
use super::kinematics::first_term_of_geom_series_last;
use super::setplay::go_to_placed_ball;
use crate::models::world::{GameModeType, PlayerObject};

/// Cycles the taker keeps dribbling toward one side before switching.
pub const DRIBBLE_STREAK: i32 = 20;

const GOALIE_SPEED: f64 = 1.0;

/// Shoot-out routine. Holds no state of its own; the dribble side streak
/// lives in [`AgentMemory`].
pub struct PenaltyKick;

impl PenaltyKick {
    pub fn decide(&self, ctx: &DecisionContext, memory: &mut AgentMemory) -> Vec<Action> {
        let wm = ctx.wm;
        let state = &wm.penalty_kick_state;
        let our_turn = state.current_taker_side == wm.our_side;
        let taker = our_turn && state.is_kick_taker;
        let keeper = !our_turn && wm.me.is_goalie;

        let actions = match wm.game_mode.kind {
            GameModeType::PenaltySetup if taker => Some(kicker_setup(ctx)),
            GameModeType::PenaltySetup | GameModeType::PenaltyReady if keeper => Some(goalie_setup(ctx)),
            GameModeType::PenaltyReady if taker => Some(kicker_ready(ctx, memory)),
            GameModeType::PenaltyTaken if taker => Some(kicker(ctx, memory)),
            GameModeType::PenaltyTaken if keeper => Some(goalie(ctx)),
            GameModeType::PenaltyScore | GameModeType::PenaltyMiss if our_turn && wm.me.is_goalie => {
                Some(goalie_setup(ctx))
            }
            _ => None,
        };
        actions.unwrap_or_else(|| wait(ctx))
    }
}

/// Players not involved line up along the halfway area; keepers watch.
fn wait(ctx: &DecisionContext) -> Vec<Action> {
    if ctx.wm.me.is_goalie {
        return vec![Action::TurnToBall { cycle: 2 }];
    }
    let target = Vec2::new(-2.0, -9.8 + 1.5 * f64::from(ctx.wm.me.unum));
    vec![
        Action::GoToPoint {
            target,
            distance_threshold: 0.3,
            max_dash_power: ctx.sp.max_dash_power,
        },
        Action::TurnToBall { cycle: 1 },
    ]
}

fn kicker_setup(ctx: &DecisionContext) -> Vec<Action> {
    go_to_placed_ball(ctx, 0.0)
        .unwrap_or_else(|| vec![Action::TurnToPoint { target: ctx.sp.their_goal(), cycle: 2 }])
}

fn kicker_ready(ctx: &DecisionContext, memory: &mut AgentMemory) -> Vec<Action> {
    let wm = ctx.wm;
    let sp = ctx.sp;
    let elapsed = wm.cycle.saturating_sub(wm.penalty_kick_state.cycle);
    let tired = wm.me.stamina < sp.stamina_max - 10.0 && elapsed > sp.pen_ready_wait.saturating_sub(3);
    if tired || !wm.me.is_kickable {
        return kicker_setup(ctx);
    }
    kicker(ctx, memory)
}

fn kicker(ctx: &DecisionContext, memory: &mut AgentMemory) -> Vec<Action> {
    let wm = ctx.wm;
    let sp = ctx.sp;
    if !sp.pen_allow_mult_kicks {
        return one_kick_shoot(ctx).unwrap_or_else(|| wait(ctx));
    }
    if !wm.me.is_kickable {
        return vec![
            Action::Intercept { save_recovery: true },
            Action::GoToPoint {
                target: ctx.ball(),
                distance_threshold: 0.4,
                max_dash_power: sp.max_dash_power,
            },
        ];
    }
    let elapsed = wm.cycle.saturating_sub(wm.penalty_kick_state.cycle);
    if elapsed > sp.pen_taken_wait.saturating_sub(25) {
        if let Some(actions) = one_kick_shoot(ctx) {
            log::debug!("penalty: out of time, single shot");
            return actions;
        }
    }
    if let Some((target, speed)) = shoot_target(ctx) {
        log::debug!("penalty: shoot ({:.2}, {:.2}) at {:.2}", target.x, target.y, speed);
        return vec![Action::SmartKick {
            target,
            first_speed: speed,
            first_speed_threshold: speed * 0.96,
            max_steps: 2,
        }];
    }
    dribble(ctx, memory)
}

/// Straight shot at the corner the keeper leaves open.
fn one_kick_shoot(ctx: &DecisionContext) -> Option<Vec<Action>> {
    let wm = ctx.wm;
    let sp = ctx.sp;
    if !sp.pen_allow_mult_kicks && ctx.ball_vel().r() > 0.3 {
        return None;
    }
    if !wm.me.is_kickable {
        return Some(vec![Action::GoToPoint {
            target: ctx.ball(),
            distance_threshold: 0.4,
            max_dash_power: sp.max_dash_power,
        }]);
    }
    let goalie = wm.their_goalie();
    if (wm.ball_angle_from_self() - wm.me.body_direction).abs() > 3.0 {
        let look_at = goalie.map_or(sp.their_goal(), |g| g.position);
        return Some(vec![Action::TurnToBall { cycle: 2 }, Action::NeckTurnToPoint { target: look_at }]);
    }
    let mut target = sp.their_goal();
    if let Some(g) = goalie {
        target.y = sp.goal_width / 2.0 - 1.0;
        if g.position.abs_y() > 0.5 && g.position.y > 0.0 {
            target.y = -target.y;
        }
    }
    Some(vec![Action::KickOneStep { target, first_speed: sp.ball_speed_max }])
}

/// Whether the keeper, moving at full speed from `goalie_next`, gets to the
/// ball kicked toward `target` at `speed` before it crosses the goal line.
fn goalie_reaches(ctx: &DecisionContext, goalie_next: Vec2, goalie_buf: f64, speed: f64, target: Vec2) -> bool {
    let sp = ctx.sp;
    let ball = ctx.ball();
    let mut vel = (target - ball).with_length(speed);
    let mut pos = ball + vel;
    vel = vel * sp.ball_decay;
    let mut cycle = 0.0;
    while pos.abs_x() < sp.pitch_half_length {
        if goalie_next.dist(pos) < GOALIE_SPEED * cycle + goalie_buf {
            return true;
        }
        if vel.r() < 0.01 {
            return true;
        }
        pos += vel;
        vel = vel * sp.ball_decay;
        cycle += 1.0;
    }
    false
}

/// Slowest shot at either post that beats the keeper, if any.
fn shoot_target(ctx: &DecisionContext) -> Option<(Vec2, f64)> {
    let sp = ctx.sp;
    let ball = ctx.ball();
    let goal = sp.their_goal();
    if goal.dist(ball) > 35.0 {
        return None;
    }
    let Some(goalie) = ctx.wm.their_goalie() else {
        return Some((goal, sp.ball_speed_max));
    };

    let post_buf = 1.0 + ((sp.pitch_half_length - ctx.self_pos().abs_x()) * 0.1).min(2.0);
    let half_goal = sp.goal_width / 2.0;
    let shots = [
        Vec2::new(sp.pitch_half_length, -half_goal + post_buf),
        Vec2::new(sp.pitch_half_length, half_goal - post_buf),
    ];
    let goalie_buf = GOALIE_SPEED * f64::from(goalie.pos_count.min(5)) + sp.catch_area_l + 0.2;
    let goalie_next = goalie.position + goalie.velocity;

    let mut best: Option<(Vec2, f64)> = None;
    for target in shots {
        let mut speed = ((ball.dist(target) + 5.0) * (1.0 - sp.ball_decay)).max(1.2);
        loop {
            let over_max = speed >= sp.ball_speed_max;
            speed = speed.min(sp.ball_speed_max);
            if !goalie_reaches(ctx, goalie_next, goalie_buf, speed, target) {
                if best.map_or(true, |(_, s)| speed < s) {
                    best = Some((target, speed));
                }
                break;
            }
            if over_max {
                break;
            }
            speed += 0.4;
        }
    }
    best
}

/// Keeper's effective distance, discounted by how stale its position is.
fn goalie_distance(goalie: Option<&PlayerObject>, from: Vec2) -> f64 {
    goalie.map_or(200.0, |g| g.position.dist(from) - GOALIE_SPEED * f64::from(g.pos_count.min(5)))
}

/// Advance the side streak: count down toward zero, then flip sides.
fn step_streak(count: i32) -> i32 {
    match count {
        1 => -DRIBBLE_STREAK,
        -1 => DRIBBLE_STREAK,
        c if c > 0 => c - 1,
        c => c + 1,
    }
}

fn dribble(ctx: &DecisionContext, memory: &mut AgentMemory) -> Vec<Action> {
    let sp = ctx.sp;
    let me = ctx.self_pos();
    let goalie = ctx.wm.their_goalie();
    let penalty_abs_x = sp.their_penalty_area_line_x();
    let goalie_dist = goalie_distance(goalie, me);
    let goalie_abs_x = goalie.map_or(200.0, |g| g.position.abs_x());
    let side_y = sp.goal_width / 2.0 + 4.0;

    let mut target = sp.their_goal();
    let far_and_free = me.abs_x() < penalty_abs_x - 3.0 && goalie_dist > 10.0;
    if !far_and_free && goalie_abs_x > me.abs_x() {
        if goalie_dist < 4.0 {
            memory.penalty_dribble_count = step_streak(memory.penalty_dribble_count);
        }
        target.y = if memory.penalty_dribble_count > 0 {
            if me.y < -side_y + 2.0 { side_y } else { -side_y }
        } else if me.y > side_y - 2.0 {
            -side_y
        } else {
            side_y
        };
        target.x = (goalie_abs_x + 1.0).max(penalty_abs_x - 2.0).min(sp.pitch_half_length - 4.0);
    }

    if let Some(g) = goalie {
        if goalie_dist < 5.0 {
            let goalie_angle = (g.position - me).th();
            if ((target - me).th() - goalie_angle).abs() < 80.0 {
                let swerve = if me.y > 0.0 { 55.0 } else { -55.0 };
                target = me + Vec2::polar(10.0, goalie_angle + swerve);
            }
        }
    }

    let rel = target - me;
    let buf = if target.abs_x() < penalty_abs_x { 4.0 } else { 2.0 };
    let lane_clear = goalie.map_or(true, |g| g.position.dist(target) > rel.r() - buf);
    if rel.abs_x() < 5.0 && lane_clear {
        if (rel.th() - ctx.wm.me.body_direction).abs() < 5.0 {
            let speed = first_term_of_geom_series_last(0.5, rel.r(), sp.ball_decay).min(sp.ball_speed_max);
            return vec![Action::SmartKick {
                target,
                first_speed: speed,
                first_speed_threshold: speed * 0.96,
                max_steps: 3,
            }];
        }
        return vec![Action::TurnToPoint { target, cycle: 2 }];
    }
    DribbleBehavior.evaluate(ctx).unwrap_or_else(|| vec![Action::HoldBall])
}

/// Stand on the allowed line in front of our goal, facing the pitch.
fn goalie_setup(ctx: &DecisionContext) -> Vec<Action> {
    let sp = ctx.sp;
    let mut actions = vec![Action::GoToPoint {
        target: Vec2::new(-sp.pitch_half_length + sp.pen_max_goalie_dist_x - 0.1, 0.0),
        distance_threshold: 0.5,
        max_dash_power: sp.max_dash_power,
    }];
    if ctx.wm.me.body_direction.abs() > 2.0 {
        actions.push(Action::TurnToPoint { target: Vec2::ZERO, cycle: 2 });
    }
    actions
}

fn goalie(ctx: &DecisionContext) -> Vec<Action> {
    let sp = ctx.sp;
    if let Some(actions) = catch_ball(ctx) {
        return actions;
    }
    if ctx.wm.me.is_kickable {
        if let Some(actions) = ClearBehavior.evaluate(ctx) {
            return actions;
        }
    }
    if !sp.pen_allow_mult_kicks {
        let vel = ctx.ball_vel();
        if vel.r2() < 0.01 && ctx.ball().abs_x() < sp.pitch_half_length - sp.pen_dist_x - 1.0 {
            return goalie_setup(ctx);
        }
        if vel.r2() > 0.01 {
            return slide_chase(ctx);
        }
    }
    basic_move(ctx)
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_fixtures::{Fixture, SnapshotBuilder};
    use crate::models::server_param::ServerParam;
    use crate::models::world::{PenaltyKickState, Side};

    fn our_kick(kind: GameModeType, taker: bool) -> SnapshotBuilder {
        SnapshotBuilder::new().our_mode(kind).with(move |wm| {
            wm.penalty_kick_state = PenaltyKickState {
                current_taker_side: Side::Left,
                is_kick_taker: taker,
                cycle: 0,
            };
        })
    }

    fn their_kick(kind: GameModeType) -> SnapshotBuilder {
        SnapshotBuilder::new().their_mode(kind).goalie().with(|wm| {
            wm.penalty_kick_state = PenaltyKickState {
                current_taker_side: Side::Right,
                is_kick_taker: false,
                cycle: 0,
            };
        })
    }

    #[test]
    fn test_bystanders_line_up() {
        let fx = Fixture::new(our_kick(GameModeType::PenaltyTaken, false).build());
        let actions = PenaltyKick.decide(&fx.ctx(), &mut AgentMemory::default());
        match actions[0] {
            Action::GoToPoint { target, distance_threshold, .. } => {
                assert!(target.dist(Vec2::new(-2.0, 0.7)) < 1e-9);
                assert!((distance_threshold - 0.3).abs() < 1e-9);
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_keeper_setup_line() {
        let wm = their_kick(GameModeType::PenaltySetup).body(45.0).build();
        let fx = Fixture::new(wm);
        let actions = PenaltyKick.decide(&fx.ctx(), &mut AgentMemory::default());
        match actions[0] {
            Action::GoToPoint { target, .. } => assert!(target.dist(Vec2::new(-38.6, 0.0)) < 1e-9),
            ref other => panic!("unexpected {:?}", other),
        }
        assert_eq!(actions[1], Action::TurnToPoint { target: Vec2::ZERO, cycle: 2 });
    }

    #[test]
    fn test_shoot_without_keeper_aims_centre() {
        let wm = our_kick(GameModeType::PenaltyTaken, true)
            .me_at(Vec2::new(41.2, 0.0))
            .ball_at(Vec2::new(41.5, 0.0))
            .build();
        let fx = Fixture::new(wm);
        assert_eq!(shoot_target(&fx.ctx()), Some((Vec2::new(52.5, 0.0), 3.0)));
    }

    #[test]
    fn test_shoot_picks_open_side_slowest() {
        let wm = our_kick(GameModeType::PenaltyTaken, true)
            .me_at(Vec2::new(41.2, 0.0))
            .ball_at(Vec2::new(41.5, 0.0))
            .opponent_goalie(Vec2::new(45.0, 12.0))
            .build();
        let fx = Fixture::new(wm);
        let (target, speed) = shoot_target(&fx.ctx()).unwrap();
        assert!(target.y < 0.0, "far post expected, got {:?}", target);
        assert!((speed - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_single_kick_goes_away_from_keeper() {
        let mut sp = ServerParam::default();
        sp.pen_allow_mult_kicks = false;
        let wm = our_kick(GameModeType::PenaltyTaken, true)
            .me_at(Vec2::new(41.2, 0.0))
            .ball_at(Vec2::new(41.5, 0.0))
            .kickable()
            .opponent_goalie(Vec2::new(52.0, 1.0))
            .build();
        let fx = Fixture::with_server_param(wm, sp);
        let actions = PenaltyKick.decide(&fx.ctx(), &mut AgentMemory::default());
        match actions[0] {
            Action::KickOneStep { target, first_speed } => {
                assert!(target.dist(Vec2::new(52.5, -6.01)) < 1e-9);
                assert!((first_speed - 3.0).abs() < 1e-9);
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_dribble_streak_flips_near_keeper() {
        let wm = our_kick(GameModeType::PenaltyTaken, true)
            .me_at(Vec2::new(40.0, 0.0))
            .ball_at(Vec2::new(40.3, 0.0))
            .kickable()
            .opponent_goalie(Vec2::new(43.0, 0.0))
            .build();
        let fx = Fixture::new(wm);
        let mut memory = AgentMemory { penalty_dribble_count: 1, ..AgentMemory::default() };
        PenaltyKick.decide(&fx.ctx(), &mut memory);
        assert_eq!(memory.penalty_dribble_count, -DRIBBLE_STREAK);
    }

    #[test]
    fn test_streak_counts_toward_zero() {
        assert_eq!(step_streak(5), 4);
        assert_eq!(step_streak(-5), -4);
        assert_eq!(step_streak(-1), DRIBBLE_STREAK);
    }
}
